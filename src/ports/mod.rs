//! Port traits: the seams between domain logic and the outside world.

pub mod config_port;
pub mod progress_port;
pub mod report_port;
pub mod series_port;
