//! Value series source port trait.

use crate::domain::error::FoliolabError;
use crate::domain::series::ValueSeries;
use chrono::NaiveDate;

pub trait SeriesPort {
    fn load_series(&self, name: &str) -> Result<ValueSeries<NaiveDate>, FoliolabError>;

    fn list_series(&self) -> Result<Vec<String>, FoliolabError>;
}
