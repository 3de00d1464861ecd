//! Core domain types and logic.

pub mod allocation;
pub mod catalogue;
pub mod config_validation;
pub mod drawdown;
pub mod error;
pub mod job;
pub mod series;
pub mod simulated_job;
