//! Domain error types.

use crate::domain::job::JobState;

/// Top-level error type for foliolab.
#[derive(Debug, thiserror::Error)]
pub enum FoliolabError {
    #[error("running peak {running_peak} at index {index} is not positive; drawdown is undefined")]
    Domain { index: usize, running_peak: f64 },

    #[error("drawdown at index {index} is not finite (value {value}, running peak {running_peak})")]
    NonFiniteDrawdown {
        index: usize,
        value: f64,
        running_peak: f64,
    },

    #[error("job is {state}; cannot {action}")]
    Conflict { state: JobState, action: &'static str },

    #[error("invalid series at point {index}: {reason}")]
    InvalidSeries { index: usize, reason: String },

    #[error("invalid stage at milestone {index}: {reason}")]
    InvalidStage { index: usize, reason: String },

    #[error("invalid allocation: {reason}")]
    InvalidAllocation { reason: String },

    #[error("no tokio runtime available to drive the job timer")]
    NoRuntime,

    #[error("unknown portfolio: {0}")]
    UnknownPortfolio(String),

    #[error("unknown optimization method: {0}")]
    UnknownMethod(String),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FoliolabError> for std::process::ExitCode {
    fn from(err: &FoliolabError) -> Self {
        let code: u8 = match err {
            FoliolabError::Io(_) | FoliolabError::Report { .. } => 1,
            FoliolabError::ConfigParse { .. }
            | FoliolabError::ConfigMissing { .. }
            | FoliolabError::ConfigInvalid { .. } => 2,
            FoliolabError::Data { .. } => 3,
            FoliolabError::Domain { .. }
            | FoliolabError::NonFiniteDrawdown { .. }
            | FoliolabError::InvalidSeries { .. }
            | FoliolabError::InvalidStage { .. }
            | FoliolabError::InvalidAllocation { .. }
            | FoliolabError::UnknownPortfolio(_)
            | FoliolabError::UnknownMethod(_) => 4,
            FoliolabError::Conflict { .. } | FoliolabError::NoRuntime => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn domain_error_message_names_index_and_peak() {
        let err = FoliolabError::Domain {
            index: 0,
            running_peak: 0.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("index 0"));
        assert!(msg.contains("not positive"));
    }

    #[test]
    fn conflict_message_includes_state() {
        let err = FoliolabError::Conflict {
            state: JobState::Running(45),
            action: "start",
        };
        assert_eq!(err.to_string(), "job is running (45%); cannot start");
    }

    #[test]
    fn exit_codes_by_category() {
        let config = FoliolabError::ConfigMissing {
            section: "job".into(),
            key: "milestones".into(),
        };
        assert_eq!(ExitCode::from(&config), ExitCode::from(2));

        let data = FoliolabError::Data {
            reason: "missing".into(),
        };
        assert_eq!(ExitCode::from(&data), ExitCode::from(3));

        let unknown = FoliolabError::UnknownPortfolio("x".into());
        assert_eq!(ExitCode::from(&unknown), ExitCode::from(4));

        assert_eq!(ExitCode::from(&FoliolabError::NoRuntime), ExitCode::from(5));
    }
}
