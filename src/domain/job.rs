//! Staged progress definition and the job state machine.
//!
//! [`JobMachine`] holds every transition rule; the timer-driven
//! [`SimulatedJob`](crate::domain::simulated_job::SimulatedJob) only calls
//! into it while holding its lock.

use std::fmt;

use crate::domain::error::FoliolabError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    pub threshold_percent: u8,
    /// Offset from job start, not from the previous milestone.
    pub delay_ms: u64,
}

impl Milestone {
    pub const fn new(threshold_percent: u8, delay_ms: u64) -> Self {
        Self {
            threshold_percent,
            delay_ms,
        }
    }
}

/// Ordered milestones: thresholds in `1..=100`, strictly increasing, last is 100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStage {
    milestones: Vec<Milestone>,
}

impl JobStage {
    pub fn new(milestones: Vec<Milestone>) -> Result<Self, FoliolabError> {
        if milestones.is_empty() {
            return Err(FoliolabError::InvalidStage {
                index: 0,
                reason: "stage has no milestones".into(),
            });
        }

        let mut previous = 0u8;
        for (index, m) in milestones.iter().enumerate() {
            if m.threshold_percent == 0 || m.threshold_percent > 100 {
                return Err(FoliolabError::InvalidStage {
                    index,
                    reason: format!("threshold {} outside 1..=100", m.threshold_percent),
                });
            }
            if m.threshold_percent <= previous {
                return Err(FoliolabError::InvalidStage {
                    index,
                    reason: format!(
                        "threshold {} does not exceed previous {}",
                        m.threshold_percent, previous
                    ),
                });
            }
            previous = m.threshold_percent;
        }

        if previous != 100 {
            return Err(FoliolabError::InvalidStage {
                index: milestones.len() - 1,
                reason: "final threshold must be 100".into(),
            });
        }

        Ok(Self { milestones })
    }

    /// Parse `threshold:delay_ms` pairs separated by commas,
    /// e.g. `20:800, 45:1600, 100:4000`.
    pub fn parse(input: &str) -> Result<Self, FoliolabError> {
        let mut milestones = Vec::new();

        for (index, token) in input.split(',').enumerate() {
            let trimmed = token.trim();
            let invalid = |reason: String| FoliolabError::InvalidStage { index, reason };

            let (threshold, delay) = trimmed
                .split_once(':')
                .ok_or_else(|| invalid(format!("expected threshold:delay_ms, got '{trimmed}'")))?;
            let threshold_percent: u8 = threshold
                .trim()
                .parse()
                .map_err(|_| invalid(format!("invalid threshold '{}'", threshold.trim())))?;
            let delay_ms: u64 = delay
                .trim()
                .parse()
                .map_err(|_| invalid(format!("invalid delay '{}'", delay.trim())))?;

            milestones.push(Milestone {
                threshold_percent,
                delay_ms,
            });
        }

        Self::new(milestones)
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// Time from start until the final milestone fires.
    pub fn total_delay_ms(&self) -> u64 {
        self.milestones.iter().map(|m| m.delay_ms).max().unwrap_or(0)
    }
}

impl Default for JobStage {
    /// Five steps, 800ms apart.
    fn default() -> Self {
        Self {
            milestones: vec![
                Milestone::new(20, 800),
                Milestone::new(45, 1600),
                Milestone::new(70, 2400),
                Milestone::new(85, 3200),
                Milestone::new(100, 4000),
            ],
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .milestones
            .iter()
            .map(|m| format!("{}:{}", m.threshold_percent, m.delay_ms))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running(u8),
    Completed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Cancelled)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Idle => write!(f, "idle"),
            JobState::Running(p) => write!(f, "running ({p}%)"),
            JobState::Completed => write!(f, "completed"),
            JobState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Status shown alongside the progress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    LoadingMarketData,
    ComputingCorrelations,
    OptimizingWeights,
    FinalizingResults,
}

impl ProgressPhase {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=29 => ProgressPhase::LoadingMarketData,
            30..=59 => ProgressPhase::ComputingCorrelations,
            60..=89 => ProgressPhase::OptimizingWeights,
            _ => ProgressPhase::FinalizingResults,
        }
    }
}

impl fmt::Display for ProgressPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProgressPhase::LoadingMarketData => "loading market data",
            ProgressPhase::ComputingCorrelations => "computing correlations",
            ProgressPhase::OptimizingWeights => "optimizing weights",
            ProgressPhase::FinalizingResults => "finalizing results",
        };
        write!(f, "{label}")
    }
}

/// Synchronous transition table for one job owner.
///
/// `generation` increments on every start so deliveries scheduled for an
/// earlier run are rejected; `cursor` is the index of the next milestone.
#[derive(Debug, Clone)]
pub struct JobMachine {
    stage: JobStage,
    state: JobState,
    cursor: usize,
    generation: u64,
}

impl JobMachine {
    pub fn new(stage: JobStage) -> Self {
        Self {
            stage,
            state: JobState::Idle,
            cursor: 0,
            generation: 0,
        }
    }

    pub fn stage(&self) -> &JobStage {
        &self.stage
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&mut self) -> Result<u64, FoliolabError> {
        if self.state != JobState::Idle {
            return Err(FoliolabError::Conflict {
                state: self.state,
                action: "start",
            });
        }
        self.generation += 1;
        self.cursor = 0;
        self.state = JobState::Running(0);
        Ok(self.generation)
    }

    /// Deliver milestone `index` of run `generation`. Returns the percent
    /// to report, or `None` if the delivery is stale or out of order.
    pub fn advance(&mut self, generation: u64, index: usize) -> Option<u8> {
        if generation != self.generation || index != self.cursor {
            return None;
        }
        let JobState::Running(current) = self.state else {
            return None;
        };
        let milestone = self.stage.milestones.get(index)?;
        if milestone.threshold_percent <= current {
            return None;
        }

        self.cursor += 1;
        self.state = JobState::Running(milestone.threshold_percent);
        Some(milestone.threshold_percent)
    }

    /// `Running(100)` with every milestone delivered becomes `Completed`.
    pub fn complete(&mut self, generation: u64) -> bool {
        if generation != self.generation
            || self.state != JobState::Running(100)
            || self.cursor != self.stage.len()
        {
            return false;
        }
        self.state = JobState::Completed;
        true
    }

    pub fn cancel(&mut self) -> bool {
        match self.state {
            JobState::Running(p) if p < 100 => {
                self.state = JobState::Cancelled;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) -> Result<(), FoliolabError> {
        match self.state {
            JobState::Running(_) => Err(FoliolabError::Conflict {
                state: self.state,
                action: "reset",
            }),
            _ => {
                self.state = JobState::Idle;
                self.cursor = 0;
                Ok(())
            }
        }
    }
}
