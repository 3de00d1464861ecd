//! Running-peak drawdown series.
//!
//! A single left-to-right scan keeps the prefix maximum; each point's
//! drawdown is its percentage distance below that peak.

use crate::domain::error::FoliolabError;
use crate::domain::series::ValueSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownPoint<K> {
    pub timestamp: K,
    pub running_peak: f64,
    /// Always `<= 0`; exactly `0.0` at or above the running peak.
    pub drawdown_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownSummary<K> {
    /// Deepest drawdown, `<= 0`.
    pub max_drawdown_pct: f64,
    pub trough: K,
    pub peak_value: f64,
    /// Longest run of consecutive points below the running peak.
    pub longest_underwater: usize,
}

pub fn compute<K: Ord + Clone>(
    series: &ValueSeries<K>,
) -> Result<Vec<DrawdownPoint<K>>, FoliolabError> {
    let mut out = Vec::with_capacity(series.len());
    let mut peak = f64::NEG_INFINITY;

    for (index, point) in series.points().iter().enumerate() {
        if point.value > peak {
            peak = point.value;
        }
        if peak <= 0.0 {
            return Err(FoliolabError::Domain {
                index,
                running_peak: peak,
            });
        }

        let drawdown_pct = if point.value >= peak {
            0.0
        } else {
            ((point.value - peak) / peak * 100.0).min(0.0)
        };
        if !drawdown_pct.is_finite() {
            return Err(FoliolabError::NonFiniteDrawdown {
                index,
                value: point.value,
                running_peak: peak,
            });
        }

        out.push(DrawdownPoint {
            timestamp: point.timestamp.clone(),
            running_peak: peak,
            drawdown_pct,
        });
    }

    Ok(out)
}

pub fn summarize<K: Clone>(points: &[DrawdownPoint<K>]) -> Option<DrawdownSummary<K>> {
    let first = points.first()?;

    let mut deepest = first;
    let mut longest = 0usize;
    let mut current = 0usize;

    for point in points {
        if point.drawdown_pct < deepest.drawdown_pct {
            deepest = point;
        }
        if point.drawdown_pct < 0.0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    Some(DrawdownSummary {
        max_drawdown_pct: deepest.drawdown_pct,
        trough: deepest.timestamp.clone(),
        peak_value: deepest.running_peak,
        longest_underwater: longest,
    })
}
