use reelsmith_core::{GenerationProgress, GenerationStatus};

/// Receives a progress snapshot at every state transition of a run.
///
/// Called synchronously from the run; keep it cheap.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: GenerationProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(GenerationProgress) + Send + Sync,
{
    fn on_progress(&self, progress: GenerationProgress) {
        self(progress)
    }
}

/// Forwards snapshots to a sink, refusing anything after a terminal status.
pub(crate) struct ProgressReporter<'a> {
    sink: &'a dyn ProgressSink,
    last_status: GenerationStatus,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(sink: &'a dyn ProgressSink) -> Self {
        Self {
            sink,
            last_status: GenerationStatus::Idle,
        }
    }

    pub(crate) fn emit(&mut self, progress: GenerationProgress) {
        if self.last_status.is_terminal() {
            tracing::warn!(
                previous = %self.last_status,
                dropped = %progress.status,
                "Ignoring progress update after terminal status"
            );
            return;
        }
        self.last_status = progress.status;
        self.sink.on_progress(progress);
    }
}
