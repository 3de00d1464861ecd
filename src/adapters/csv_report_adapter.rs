//! CSV drawdown report adapter.

use crate::domain::error::FoliolabError;
use crate::ports::report_port::{DrawdownReport, ReportPort};

pub const HEADER: [&str; 4] = ["timestamp", "value", "running_peak", "drawdown_pct"];

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn render(report: &DrawdownReport) -> Result<String, FoliolabError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        let to_report_err = |e: csv::Error| FoliolabError::Report {
            reason: format!("CSV write error: {e}"),
        };

        wtr.write_record(HEADER).map_err(to_report_err)?;
        for row in &report.rows {
            wtr.write_record([
                row.timestamp.clone(),
                format!("{:.4}", row.value),
                format!("{:.4}", row.running_peak),
                format!("{:.4}", row.drawdown_pct),
            ])
            .map_err(to_report_err)?;
        }

        let bytes = wtr.into_inner().map_err(|e| FoliolabError::Report {
            reason: format!("CSV flush error: {e}"),
        })?;
        String::from_utf8(bytes).map_err(|e| FoliolabError::Report {
            reason: e.to_string(),
        })
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_drawdown(&self, report: &DrawdownReport, output_path: &str) -> Result<(), FoliolabError> {
        let content = Self::render(report)?;
        std::fs::write(output_path, content)?;
        Ok(())
    }
}
