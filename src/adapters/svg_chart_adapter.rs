//! SVG chart rendering for drawdown reports.
//!
//! Produces a standalone SVG with two panels: the value line on top and the
//! drawdown area (0% at the top edge, deepest drawdown at the bottom) below.

use crate::domain::error::FoliolabError;
use crate::ports::report_port::{DrawdownReport, ReportPort};

const WIDTH: f64 = 600.0;
const VALUE_HEIGHT: f64 = 220.0;
const DRAWDOWN_HEIGHT: f64 = 140.0;
const PADDING: f64 = 40.0;

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn render(report: &DrawdownReport) -> String {
        if report.rows.is_empty() {
            return String::new();
        }

        let height = VALUE_HEIGHT + DRAWDOWN_HEIGHT;
        let plot_width = WIDTH - 2.0 * PADDING;
        let scale_x = if report.rows.len() > 1 {
            plot_width / (report.rows.len() - 1) as f64
        } else {
            0.0
        };
        let x_at = |i: usize| PADDING + i as f64 * scale_x;

        // Value panel
        let min_value = report.rows.iter().map(|r| r.value).fold(f64::INFINITY, f64::min);
        let max_value = report
            .rows
            .iter()
            .map(|r| r.value)
            .fold(f64::NEG_INFINITY, f64::max);
        let value_plot = VALUE_HEIGHT - 2.0 * PADDING;
        let range = max_value - min_value;
        let scale_value = if range > 0.0 { value_plot / range } else { 1.0 };

        let value_points: Vec<String> = report
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let y = VALUE_HEIGHT - PADDING - (r.value - min_value) * scale_value;
                format!("{:.1},{:.1}", x_at(i), y)
            })
            .collect();

        // Drawdown panel
        let deepest = report
            .rows
            .iter()
            .map(|r| r.drawdown_pct)
            .fold(0.0_f64, f64::min);
        let dd_top = VALUE_HEIGHT + PADDING / 2.0;
        let dd_plot = DRAWDOWN_HEIGHT - PADDING;
        let scale_dd = if deepest < 0.0 { dd_plot / -deepest } else { 0.0 };

        let mut area_points = vec![format!("{:.1},{:.1}", x_at(0), dd_top)];
        area_points.extend(report.rows.iter().enumerate().map(|(i, r)| {
            let y = dd_top - r.drawdown_pct * scale_dd;
            format!("{:.1},{:.1}", x_at(i), y)
        }));
        area_points.push(format!("{:.1},{:.1}", x_at(report.rows.len() - 1), dd_top));

        let caption = match report.max_drawdown_pct {
            Some(max) => format!("{} (max drawdown {:.2}%)", escape(&report.title), max),
            None => escape(&report.title),
        };

        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
  <rect width="100%" height="100%" fill="white"/>
  <text x="{pad:.0}" y="{title_y:.0}" font-family="sans-serif" font-size="14">{caption}</text>
  <line x1="{pad:.0}" y1="{value_bottom:.0}" x2="{right:.0}" y2="{value_bottom:.0}" stroke="#999"/>
  <polyline fill="none" stroke="#2563eb" stroke-width="2" points="{values}"/>
  <line x1="{pad:.0}" y1="{dd_top:.0}" x2="{right:.0}" y2="{dd_top:.0}" stroke="#999"/>
  <polygon fill="#dc2626" fill-opacity="0.3" stroke="#dc2626" points="{area}"/>
  <text x="{pad:.0}" y="{dd_label_y:.0}" font-family="sans-serif" font-size="11">{deepest:.1}%</text>
</svg>
"##,
            w = WIDTH,
            h = height,
            pad = PADDING,
            title_y = PADDING / 2.0,
            value_bottom = VALUE_HEIGHT - PADDING,
            right = WIDTH - PADDING,
            values = value_points.join(" "),
            area = area_points.join(" "),
            dd_label_y = dd_top + dd_plot + 12.0,
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl ReportPort for SvgChartAdapter {
    fn write_drawdown(&self, report: &DrawdownReport, output_path: &str) -> Result<(), FoliolabError> {
        let svg = Self::render(report);
        if svg.is_empty() {
            return Err(FoliolabError::Report {
                reason: "cannot chart an empty series".into(),
            });
        }
        std::fs::write(output_path, svg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::drawdown;
    use crate::domain::series::ValueSeries;

    fn report(values: &[f64]) -> DrawdownReport {
        let series = ValueSeries::from_values(values).unwrap();
        let points = drawdown::compute(&series).unwrap();
        DrawdownReport::build("Growth <80/20>", &series, &points)
    }

    #[test]
    fn empty_report_renders_nothing() {
        assert!(SvgChartAdapter::render(&report(&[])).is_empty());
    }

    #[test]
    fn svg_has_both_panels() {
        let svg = SvgChartAdapter::render(&report(&[100.0, 105.0, 103.0, 108.0, 96.0]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("-11.1%"));
        assert!(svg.contains("max drawdown -11.11%"));
    }

    #[test]
    fn title_is_escaped() {
        let svg = SvgChartAdapter::render(&report(&[1.0, 2.0]));
        assert!(svg.contains("Growth &lt;80/20&gt;"));
    }

    #[test]
    fn single_point_renders() {
        let svg = SvgChartAdapter::render(&report(&[42.0]));
        assert!(svg.contains("0.0%"));
    }

    #[test]
    fn write_empty_is_report_error() {
        let result = SvgChartAdapter.write_drawdown(&report(&[]), "/tmp/never.svg");
        assert!(matches!(result, Err(FoliolabError::Report { .. })));
    }
}
