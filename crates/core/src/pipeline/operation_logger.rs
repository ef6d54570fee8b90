use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for editing events.
///
/// Use cases report through this trait so the CLI, a GUI, or a test can
/// each observe an edit run without changing the orchestration code.
pub trait OperationLogger: Send {
    /// Report step-level progress through an operation list.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long one named operation took.
    fn timing(&mut self, operation: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. pixels cleared, history depth).
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullOperationLogger;

impl OperationLogger for NullOperationLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _operation: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI logger that tracks per-operation timing and metrics and prints a
/// summary when the run completes.
pub struct StdoutOperationLogger {
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_steps: usize,
    messages: Vec<String>,
}

impl StdoutOperationLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            total_steps: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = Vec::new();

        lines.push(format!(
            "Edit summary ({} operations, {:.2}s total):",
            self.total_steps,
            elapsed_ms / 1000.0
        ));

        let mut operations: Vec<_> = self.timings.keys().collect();
        operations.sort();
        for operation in operations {
            let durations = &self.timings[operation];
            let total_ms: f64 = durations.iter().sum();
            let runs = durations.len();
            lines.push(format!(
                "  {operation:20}: {runs}x  total {total_ms:8.1}ms"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let total: f64 = values.iter().sum();
            lines.push(format!("  {name}: {total:.0}"));
        }

        if !self.messages.is_empty() {
            lines.push("Notes:".to_string());
            lines.extend(self.messages.iter().map(|m| format!("  {m}")));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, operation: &str) -> Option<&[f64]> {
        self.timings.get(operation).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for StdoutOperationLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationLogger for StdoutOperationLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_steps = total;
        if total > 0 {
            log::info!("Step {current}/{total}");
        }
    }

    fn timing(&mut self, operation: &str, duration_ms: f64) {
        self.timings
            .entry(operation.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ── NullOperationLogger ──

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullOperationLogger;
        logger.progress(1, 3);
        logger.timing("vintage", 5.0);
        logger.metric("cleared", 12.0);
        logger.info("hello");
        logger.summary();
    }

    // ── StdoutOperationLogger ──

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutOperationLogger::new();
        logger.timing("vintage", 20.0);
        logger.timing("vintage", 30.0);
        logger.timing("posterize", 5.0);

        let vintage = logger.timings_for("vintage").unwrap();
        assert_eq!(vintage.len(), 2);
        assert_relative_eq!(vintage[1], 30.0);
        assert_eq!(logger.timings_for("posterize").unwrap().len(), 1);
        assert!(logger.timings_for("sketch").is_none());
    }

    #[test]
    fn test_metric_records_values() {
        let mut logger = StdoutOperationLogger::new();
        logger.metric("cleared", 3.0);
        logger.metric("cleared", 4.0);
        assert_eq!(logger.metrics_for("cleared").unwrap(), &[3.0, 4.0]);
    }

    #[test]
    fn test_summary_lists_operations_and_metrics() {
        let mut logger = StdoutOperationLogger::new();
        logger.progress(2, 2);
        logger.timing("vintage", 20.0);
        logger.timing("remove-background", 5.0);
        logger.metric("cleared", 3.0);
        logger.metric("cleared", 4.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Edit summary (2 operations"));
        assert!(summary.contains("vintage"));
        assert!(summary.contains("remove-background"));
        assert!(summary.contains("cleared: 7"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutOperationLogger::default().summary_string().is_none());
    }

    #[test]
    fn test_summary_ends_with_info_notes() {
        let mut logger = StdoutOperationLogger::new();
        logger.timing("sketch", 2.0);
        logger.info("Loaded in.png (4x4)");
        logger.info("Wrote out.png");

        let summary = logger.summary_string().unwrap();
        assert!(summary.ends_with("Notes:\n  Loaded in.png (4x4)\n  Wrote out.png"));
    }

    #[test]
    fn test_info_alone_does_not_produce_summary() {
        let mut logger = StdoutOperationLogger::new();
        logger.info("Wrote out.png");
        assert!(logger.summary_string().is_none());
    }
}
