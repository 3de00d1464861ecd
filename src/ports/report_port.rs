//! Report generation port trait.

use std::fmt::Display;

use crate::domain::drawdown::{self, DrawdownPoint};
use crate::domain::error::FoliolabError;
use crate::domain::series::ValueSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownRow {
    pub timestamp: String,
    pub value: f64,
    pub running_peak: f64,
    pub drawdown_pct: f64,
}

/// A value series joined with its drawdowns, timestamps rendered as text.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownReport {
    pub title: String,
    pub rows: Vec<DrawdownRow>,
    pub max_drawdown_pct: Option<f64>,
}

impl DrawdownReport {
    pub fn build<K: Ord + Clone + Display>(
        title: &str,
        series: &ValueSeries<K>,
        drawdowns: &[DrawdownPoint<K>],
    ) -> Self {
        let rows = series
            .points()
            .iter()
            .zip(drawdowns)
            .map(|(point, dd)| DrawdownRow {
                timestamp: dd.timestamp.to_string(),
                value: point.value,
                running_peak: dd.running_peak,
                drawdown_pct: dd.drawdown_pct,
            })
            .collect();

        Self {
            title: title.to_string(),
            rows,
            max_drawdown_pct: drawdown::summarize(drawdowns).map(|s| s.max_drawdown_pct),
        }
    }
}

/// Port for writing drawdown reports.
pub trait ReportPort {
    fn write_drawdown(&self, report: &DrawdownReport, output_path: &str)
    -> Result<(), FoliolabError>;
}
