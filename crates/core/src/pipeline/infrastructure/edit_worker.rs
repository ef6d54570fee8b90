use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};

use crate::pipeline::edit_operation::EditOperation;
use crate::pipeline::edit_session::{EditSession, OperationOutcome};
use crate::shared::pixel_buffer::PixelBuffer;

/// Identifies one submitted request. Ids increase in submission order.
pub type JobId = u64;

enum WorkerCommand {
    Apply(JobId, EditOperation),
    Undo(JobId),
    Redo(JobId),
    JumpTo(JobId, usize),
}

/// Messages sent from the worker thread back to the caller.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    Applied {
        job: JobId,
        label: String,
        outcome: OperationOutcome,
        duration_ms: f64,
        /// Newest history snapshot after the operation.
        image: Option<Arc<PixelBuffer>>,
    },
    /// Undo, redo or a history jump finished; `moved` is false when there
    /// was no entry to move to.
    HistoryMoved {
        job: JobId,
        moved: bool,
        image: Option<Arc<PixelBuffer>>,
    },
    Failed {
        job: JobId,
        label: String,
        error: String,
    },
    Cancelled {
        job: JobId,
    },
}

impl WorkerMessage {
    pub fn job(&self) -> JobId {
        match self {
            WorkerMessage::Applied { job, .. }
            | WorkerMessage::HistoryMoved { job, .. }
            | WorkerMessage::Failed { job, .. }
            | WorkerMessage::Cancelled { job } => *job,
        }
    }
}

/// Runs an [`EditSession`] on a dedicated thread.
///
/// Requests are processed one at a time in submission order and every
/// request produces exactly one [`WorkerMessage`], so the caller can keep a
/// responsive UI while long kernels run.
pub struct EditWorker {
    commands: Sender<WorkerCommand>,
    messages: Receiver<WorkerMessage>,
    next_job: JobId,
    /// Jobs with an id below this are skipped.
    cancel_before: Arc<AtomicU64>,
    handle: JoinHandle<EditSession>,
}

impl EditWorker {
    pub fn spawn(session: EditSession) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<WorkerCommand>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<WorkerMessage>();
        let cancel_before = Arc::new(AtomicU64::new(0));
        let cancel_clone = cancel_before.clone();

        let handle = thread::spawn(move || run_worker(session, &cmd_rx, &msg_tx, &cancel_clone));

        Self {
            commands: cmd_tx,
            messages: msg_rx,
            next_job: 0,
            cancel_before,
            handle,
        }
    }

    pub fn submit(&mut self, operation: EditOperation) -> JobId {
        self.send(|job| WorkerCommand::Apply(job, operation))
    }

    pub fn undo(&mut self) -> JobId {
        self.send(WorkerCommand::Undo)
    }

    pub fn redo(&mut self) -> JobId {
        self.send(WorkerCommand::Redo)
    }

    /// Restores history entry `index`, 0 being the opening snapshot.
    pub fn jump_to(&mut self, index: usize) -> JobId {
        self.send(|job| WorkerCommand::JumpTo(job, index))
    }

    /// Skips every request submitted so far that has not started yet.
    /// Skipped requests answer with [`WorkerMessage::Cancelled`].
    pub fn cancel_pending(&self) {
        self.cancel_before.store(self.next_job, Ordering::Relaxed);
    }

    pub fn messages(&self) -> &Receiver<WorkerMessage> {
        &self.messages
    }

    /// Stops accepting work, waits for queued requests to finish, and
    /// returns the session. `None` if the worker thread panicked.
    pub fn shutdown(self) -> Option<EditSession> {
        let EditWorker {
            commands, handle, ..
        } = self;
        drop(commands);
        handle.join().ok()
    }

    fn send(&mut self, make: impl FnOnce(JobId) -> WorkerCommand) -> JobId {
        let job = self.next_job;
        self.next_job += 1;
        if self.commands.send(make(job)).is_err() {
            log::warn!("Edit worker is gone; job {job} dropped");
        }
        job
    }
}

fn run_worker(
    mut session: EditSession,
    commands: &Receiver<WorkerCommand>,
    messages: &Sender<WorkerMessage>,
    cancel_before: &AtomicU64,
) -> EditSession {
    for command in commands.iter() {
        let message = handle_command(&mut session, command, cancel_before);
        // Keep draining even if the caller dropped the receiver.
        let _ = messages.send(message);
    }
    log::debug!("Edit worker stopped");
    session
}

fn handle_command(
    session: &mut EditSession,
    command: WorkerCommand,
    cancel_before: &AtomicU64,
) -> WorkerMessage {
    let job = match &command {
        WorkerCommand::Apply(job, _)
        | WorkerCommand::Undo(job)
        | WorkerCommand::Redo(job)
        | WorkerCommand::JumpTo(job, _) => *job,
    };
    if job < cancel_before.load(Ordering::Relaxed) {
        log::debug!("Skipping cancelled job {job}");
        return WorkerMessage::Cancelled { job };
    }

    match command {
        WorkerCommand::Apply(job, operation) => {
            let label = operation.label();
            let start = Instant::now();
            match session.apply(&operation) {
                Ok(outcome) => WorkerMessage::Applied {
                    job,
                    label,
                    outcome,
                    duration_ms: start.elapsed().as_secs_f64() * 1000.0,
                    image: session.snapshot(),
                },
                Err(e) => {
                    log::warn!("{label} failed: {e}");
                    WorkerMessage::Failed {
                        job,
                        label,
                        error: e.to_string(),
                    }
                }
            }
        }
        WorkerCommand::Undo(job) => WorkerMessage::HistoryMoved {
            job,
            moved: session.undo(),
            image: session.snapshot(),
        },
        WorkerCommand::Redo(job) => WorkerMessage::HistoryMoved {
            job,
            moved: session.redo(),
            image: session.snapshot(),
        },
        WorkerCommand::JumpTo(job, index) => WorkerMessage::HistoryMoved {
            job,
            moved: session.jump_to(index),
            image: session.snapshot(),
        },
    }
}
