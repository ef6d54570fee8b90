use std::path::Path;
use std::time::Instant;

use crate::filtering::infrastructure::filter_factory::FilterSettings;
use crate::history::history_stack::HistoryStack;
use crate::imaging::domain::image_io::{ImageReader, ImageWriter};
use crate::pipeline::edit_operation::EditOperation;
use crate::pipeline::edit_session::{EditSession, OperationOutcome};
use crate::pipeline::operation_logger::OperationLogger;
use crate::shared::constants::DEFAULT_HISTORY_MEMORY_BYTES;

/// Single-image editing pipeline: read → apply operations in order → write.
pub struct EditImageUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    operations: Vec<EditOperation>,
    filter_settings: FilterSettings,
    history_capacity: usize,
    history_memory_bytes: Option<usize>,
    logger: Box<dyn OperationLogger>,
}

impl EditImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        operations: Vec<EditOperation>,
        filter_settings: FilterSettings,
        history_capacity: usize,
        logger: Box<dyn OperationLogger>,
    ) -> Self {
        Self {
            reader,
            writer,
            operations,
            filter_settings,
            history_capacity,
            history_memory_bytes: Some(DEFAULT_HISTORY_MEMORY_BYTES),
            logger,
        }
    }

    /// Caps the bytes held by history snapshots; `None` lifts the cap.
    pub fn with_history_memory_limit(mut self, max_bytes: Option<usize>) -> Self {
        self.history_memory_bytes = max_bytes;
        self
    }

    /// Reads `input_path`, applies every operation, and writes the result.
    ///
    /// Stops at the first failing operation; nothing is written in that case.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let buffer = self.reader.read(input_path)?;
        self.logger.info(&format!(
            "Loaded {} ({}x{})",
            input_path.display(),
            buffer.width(),
            buffer.height()
        ));

        let history =
            HistoryStack::new(self.history_capacity).with_memory_limit(self.history_memory_bytes);
        let mut session = EditSession::with_history(buffer, history)
            .with_filter_settings(self.filter_settings.clone());

        let total = self.operations.len();
        for (step, operation) in self.operations.iter().enumerate() {
            let label = operation.label();
            let start = Instant::now();
            let outcome = session
                .apply(operation)
                .map_err(|e| format!("{label} failed: {e}"))?;
            self.logger
                .timing(&label, start.elapsed().as_secs_f64() * 1000.0);
            self.logger.progress(step + 1, total);
            record_outcome(self.logger.as_mut(), &outcome);
        }

        self.logger
            .metric("history_entries", session.history().len() as f64);
        self.writer.write(output_path, session.buffer())?;
        self.logger
            .info(&format!("Wrote {}", output_path.display()));
        self.logger.summary();

        Ok(())
    }
}

fn record_outcome(logger: &mut dyn OperationLogger, outcome: &OperationOutcome) {
    match outcome {
        OperationOutcome::BackgroundRemoved(report) => {
            logger.metric("pixels_cleared", report.cleared as f64);
            logger.metric("pixels_feathered", report.feathered as f64);
        }
        OperationOutcome::SelectionChanged { pixel_count, .. } => {
            logger.metric("pixels_selected", *pixel_count as f64);
        }
        OperationOutcome::Filtered { .. }
        | OperationOutcome::PresetApplied { .. }
        | OperationOutcome::Copied { .. }
        | OperationOutcome::Pasted { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::infrastructure::filter_factory::FilterKind;
    use crate::imaging::domain::image_io::ImageIoError;
    use crate::segmentation::domain::background_remover::{BackgroundMethod, BackgroundSettings};
    use crate::shared::pixel_buffer::PixelBuffer;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // ── Stubs ──

    struct StubImageReader {
        buffer: PixelBuffer,
    }

    impl ImageReader for StubImageReader {
        fn read(&self, _path: &Path) -> Result<PixelBuffer, ImageIoError> {
            Ok(self.buffer.clone())
        }
    }

    struct StubImageWriter {
        written: Arc<Mutex<Vec<(PathBuf, PixelBuffer)>>>,
    }

    impl StubImageWriter {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ImageWriter for StubImageWriter {
        fn write(&self, path: &Path, buffer: &PixelBuffer) -> Result<(), ImageIoError> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), buffer.clone()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        timings: Arc<Mutex<Vec<String>>>,
        metrics: Arc<Mutex<Vec<(String, f64)>>>,
    }

    impl OperationLogger for RecordingLogger {
        fn progress(&mut self, _current: usize, _total: usize) {}
        fn timing(&mut self, operation: &str, _duration_ms: f64) {
            self.timings.lock().unwrap().push(operation.to_string());
        }
        fn metric(&mut self, name: &str, value: f64) {
            self.metrics.lock().unwrap().push((name.to_string(), value));
        }
        fn info(&mut self, _message: &str) {}
    }

    // ── Helpers ──

    fn use_case(
        input: PixelBuffer,
        operations: Vec<EditOperation>,
        writer: StubImageWriter,
        logger: RecordingLogger,
    ) -> EditImageUseCase {
        EditImageUseCase::new(
            Box::new(StubImageReader { buffer: input }),
            Box::new(writer),
            operations,
            FilterSettings::default(),
            10,
            Box::new(logger),
        )
    }

    // ── Tests ──

    #[test]
    fn test_applies_operations_in_order_and_writes() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let logger = RecordingLogger::default();
        let timings = logger.timings.clone();

        let mut uc = use_case(
            PixelBuffer::filled(3, 2, [100, 100, 100, 255]),
            vec![
                EditOperation::filter(FilterKind::Negative),
                EditOperation::filter(FilterKind::Rotate90),
            ],
            writer,
            logger,
        );
        uc.execute(Path::new("in.png"), Path::new("out.png")).unwrap();

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("out.png"));
        assert_eq!((written[0].1.width(), written[0].1.height()), (2, 3));
        assert_eq!(written[0].1.pixel(0, 0), [155, 155, 155, 255]);
        assert_eq!(*timings.lock().unwrap(), vec!["negative", "rotate-90"]);
    }

    #[test]
    fn test_no_operations_writes_input_unchanged() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let input = PixelBuffer::filled(4, 4, [1, 2, 3, 4]);

        let mut uc = use_case(input.clone(), vec![], writer, RecordingLogger::default());
        uc.execute(Path::new("in.png"), Path::new("out.png")).unwrap();

        assert_eq!(written.lock().unwrap()[0].1, input);
    }

    #[test]
    fn test_background_counts_reach_logger() {
        let logger = RecordingLogger::default();
        let metrics = logger.metrics.clone();
        let mut input = PixelBuffer::filled(2, 2, [250, 250, 250, 255]);
        input.set_pixel(0, 0, [0, 0, 0, 255]);

        let mut uc = use_case(
            input,
            vec![EditOperation::RemoveBackground {
                settings: BackgroundSettings {
                    method: BackgroundMethod::Simple,
                    ..BackgroundSettings::default()
                },
            }],
            StubImageWriter::new(),
            logger,
        );
        uc.execute(Path::new("in.png"), Path::new("out.png")).unwrap();

        let metrics = metrics.lock().unwrap();
        assert!(metrics.contains(&("pixels_cleared".to_string(), 3.0)));
        assert!(metrics.contains(&("history_entries".to_string(), 2.0)));
    }

    #[test]
    fn test_history_memory_limit_evicts_old_snapshots() {
        let ops = vec![
            EditOperation::filter(FilterKind::Negative),
            EditOperation::filter(FilterKind::Grayscale),
            EditOperation::filter(FilterKind::Solarize),
        ];
        let input = PixelBuffer::filled(2, 2, [90, 90, 90, 255]);

        let logger = RecordingLogger::default();
        let metrics = logger.metrics.clone();
        let mut uc = use_case(input.clone(), ops.clone(), StubImageWriter::new(), logger);
        uc.execute(Path::new("in.png"), Path::new("out.png")).unwrap();
        assert!(metrics.lock().unwrap().contains(&("history_entries".to_string(), 4.0)));

        // Each 2x2 snapshot costs 16 bytes plus its label.
        let logger = RecordingLogger::default();
        let metrics = logger.metrics.clone();
        let mut uc = use_case(input, ops, StubImageWriter::new(), logger)
            .with_history_memory_limit(Some(60));
        uc.execute(Path::new("in.png"), Path::new("out.png")).unwrap();
        assert!(metrics.lock().unwrap().contains(&("history_entries".to_string(), 2.0)));
    }

    #[test]
    fn test_failed_operation_skips_write() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();

        let mut uc = use_case(
            PixelBuffer::filled(2, 2, [0, 0, 0, 255]),
            vec![EditOperation::Paste],
            writer,
            RecordingLogger::default(),
        );
        let err = uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap_err();

        assert!(err.to_string().contains("paste failed"));
        assert!(written.lock().unwrap().is_empty());
    }
}
