//! Closure-backed progress observer.

use crate::domain::job::JobStage;
use crate::domain::simulated_job::SimulatedJob;
use crate::ports::progress_port::ProgressPort;

pub struct CallbackProgress<F, G> {
    on_progress: F,
    on_complete: G,
}

impl<F, G> CallbackProgress<F, G>
where
    F: FnMut(u8) + Send + 'static,
    G: FnMut() + Send + 'static,
{
    pub fn new(on_progress: F, on_complete: G) -> Self {
        Self {
            on_progress,
            on_complete,
        }
    }
}

impl<F, G> ProgressPort for CallbackProgress<F, G>
where
    F: FnMut(u8) + Send + 'static,
    G: FnMut() + Send + 'static,
{
    fn on_progress(&mut self, percent: u8) {
        (self.on_progress)(percent);
    }

    fn on_complete(&mut self) {
        (self.on_complete)();
    }
}

impl<F, G> SimulatedJob<CallbackProgress<F, G>>
where
    F: FnMut(u8) + Send + 'static,
    G: FnMut() + Send + 'static,
{
    pub fn with_callbacks(stage: JobStage, on_progress: F, on_complete: G) -> Self {
        SimulatedJob::new(stage, CallbackProgress::new(on_progress, on_complete))
    }
}
