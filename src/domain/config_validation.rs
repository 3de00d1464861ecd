//! Configuration validation.
//!
//! Checks every config value before a command uses it.

use std::path::Path;

use crate::domain::error::FoliolabError;
use crate::domain::job::JobStage;
use crate::logging;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), FoliolabError> {
    job_stage_from_config(config)?;
    validate_series_config(config)?;
    validate_report_config(config)?;
    validate_logging_config(config)?;
    Ok(())
}

/// The `[job] milestones` stage, or the default stage when the key is absent.
pub fn job_stage_from_config(config: &dyn ConfigPort) -> Result<JobStage, FoliolabError> {
    match config.get_string("job", "milestones") {
        None => Ok(JobStage::default()),
        Some(raw) => JobStage::parse(&raw).map_err(|e| FoliolabError::ConfigInvalid {
            section: "job".to_string(),
            key: "milestones".to_string(),
            reason: e.to_string(),
        }),
    }
}

pub fn validate_series_config(config: &dyn ConfigPort) -> Result<(), FoliolabError> {
    validate_directory(config, "series", "data_dir")
}

pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), FoliolabError> {
    validate_directory(config, "report", "output_dir")
}

pub fn validate_logging_config(config: &dyn ConfigPort) -> Result<(), FoliolabError> {
    if let Some(format) = config.get_string("logging", "format") {
        logging::config_format(&format)?;
    }
    Ok(())
}

fn validate_directory(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), FoliolabError> {
    if let Some(dir) = config.get_string(section, key) {
        if dir.trim().is_empty() {
            return Err(FoliolabError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !Path::new(dir.trim()).is_dir() {
            return Err(FoliolabError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("{} is not a directory", dir.trim()),
            });
        }
    }
    Ok(())
}
