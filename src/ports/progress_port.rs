//! Observer port for simulated job progress.

/// Receives the externally visible effects of a
/// [`SimulatedJob`](crate::domain::simulated_job::SimulatedJob).
///
/// Calls arrive on the job's timer task while the job's state lock is held,
/// so implementations must not call back into the same job.
pub trait ProgressPort: Send + 'static {
    fn on_progress(&mut self, percent: u8);

    fn on_complete(&mut self);
}
