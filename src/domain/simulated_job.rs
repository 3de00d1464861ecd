//! Timer-driven simulated job.
//!
//! One spawned task walks the milestones in order, sleeping until
//! `started_at + delay_ms` for each. Every delivery re-checks the
//! [`JobMachine`] under the shared lock and calls the observer before
//! releasing it, so a `cancel()` either happens before a delivery (which is
//! then dropped) or after it. The timer task is aborted on cancel, reset,
//! and drop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use crate::domain::error::FoliolabError;
use crate::domain::job::{JobMachine, JobStage, JobState, Milestone};
use crate::ports::progress_port::ProgressPort;

struct Shared<P> {
    machine: JobMachine,
    observer: P,
    state_tx: watch::Sender<JobState>,
}

impl<P> Shared<P> {
    fn publish(&self) {
        self.state_tx.send_replace(self.machine.state());
    }
}

fn lock<P>(shared: &Mutex<Shared<P>>) -> MutexGuard<'_, Shared<P>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SimulatedJob<P: ProgressPort> {
    shared: Arc<Mutex<Shared<P>>>,
    state_rx: watch::Receiver<JobState>,
    timer: Option<JoinHandle<()>>,
}

impl<P: ProgressPort> SimulatedJob<P> {
    pub fn new(stage: JobStage, observer: P) -> Self {
        let (state_tx, state_rx) = watch::channel(JobState::Idle);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                machine: JobMachine::new(stage),
                observer,
                state_tx,
            })),
            state_rx,
            timer: None,
        }
    }

    /// Start the milestone timer on the current tokio runtime.
    ///
    /// Fails with `Conflict` unless the job is `Idle`; an already running
    /// timer chain is left untouched.
    pub fn start(&mut self) -> Result<(), FoliolabError> {
        let handle = Handle::try_current().map_err(|_| FoliolabError::NoRuntime)?;

        let (generation, milestones) = {
            let mut shared = lock(&self.shared);
            let generation = shared.machine.start()?;
            shared.publish();
            (generation, shared.machine.stage().milestones().to_vec())
        };

        if let Some(previous) = self.timer.take() {
            previous.abort();
        }

        info!(generation, milestones = milestones.len(), "simulated job started");
        let started_at = Instant::now();
        let shared = Arc::clone(&self.shared);
        self.timer = Some(handle.spawn(run_milestones(
            shared,
            generation,
            started_at,
            milestones,
        )));
        Ok(())
    }

    /// Cancel a running job. Returns whether a transition happened; calling
    /// it on an idle, completed or cancelled job does nothing.
    pub fn cancel(&mut self) -> bool {
        let cancelled = {
            let mut shared = lock(&self.shared);
            let cancelled = shared.machine.cancel();
            if cancelled {
                shared.publish();
            }
            cancelled
        };

        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if cancelled {
            info!("simulated job cancelled");
        }
        cancelled
    }

    /// Return a terminal job to `Idle` so it can be started again.
    pub fn reset(&mut self) -> Result<(), FoliolabError> {
        {
            let mut shared = lock(&self.shared);
            shared.machine.reset()?;
            shared.publish();
        }
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        Ok(())
    }

    pub fn state(&self) -> JobState {
        lock(&self.shared).machine.state()
    }

    /// Every state transition is published on this channel.
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state_rx.clone()
    }

    /// Resolve once the job reaches `Completed` or `Cancelled`.
    /// Never resolves for a job that is not started.
    pub async fn wait(&self) -> JobState {
        let mut rx = self.state_rx.clone();
        match rx.wait_for(JobState::is_terminal).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        }
    }
}

impl<P: ProgressPort> Drop for SimulatedJob<P> {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_milestones<P: ProgressPort>(
    shared: Arc<Mutex<Shared<P>>>,
    generation: u64,
    started_at: Instant,
    milestones: Vec<Milestone>,
) {
    for (index, milestone) in milestones.iter().enumerate() {
        sleep_until(started_at + Duration::from_millis(milestone.delay_ms)).await;

        let mut guard = lock(&shared);
        let shared = &mut *guard;

        let Some(percent) = shared.machine.advance(generation, index) else {
            debug!(generation, index, "dropping stale milestone");
            return;
        };
        shared.publish();
        debug!(generation, percent, "milestone reached");
        shared.observer.on_progress(percent);

        if index + 1 == milestones.len() && shared.machine.complete(generation) {
            shared.publish();
            shared.observer.on_complete();
            info!(generation, "simulated job completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl ProgressPort for Silent {
        fn on_progress(&mut self, _percent: u8) {}
        fn on_complete(&mut self) {}
    }

    #[test]
    fn start_outside_runtime_fails_and_stays_idle() {
        let mut job = SimulatedJob::new(JobStage::default(), Silent);
        assert!(matches!(job.start(), Err(FoliolabError::NoRuntime)));
        assert_eq!(job.state(), JobState::Idle);
    }

    #[test]
    fn cancel_before_start_is_noop() {
        let mut job = SimulatedJob::new(JobStage::default(), Silent);
        assert!(!job.cancel());
        assert_eq!(job.state(), JobState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_each_transition() {
        let mut job = SimulatedJob::new(JobStage::default(), Silent);
        let mut rx = job.subscribe();
        job.start().unwrap();

        assert_eq!(*rx.borrow_and_update(), JobState::Running(0));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), JobState::Running(20));

        assert_eq!(job.wait().await, JobState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_after_cancel_allows_restart() {
        let mut job = SimulatedJob::new(JobStage::default(), Silent);
        job.start().unwrap();
        assert!(job.cancel());
        assert!(job.start().is_err());

        job.reset().unwrap();
        job.start().unwrap();
        assert_eq!(job.wait().await, JobState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_while_running_conflicts() {
        let mut job = SimulatedJob::new(JobStage::default(), Silent);
        job.start().unwrap();
        assert!(matches!(job.reset(), Err(FoliolabError::Conflict { .. })));
        assert_eq!(job.state(), JobState::Running(0));
    }
}
