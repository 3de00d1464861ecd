//! Concrete adapter implementations for ports.

pub mod callback_progress;
pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod svg_chart_adapter;
pub mod terminal_progress;
