//! Value time series.

use crate::domain::error::FoliolabError;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint<K> {
    pub timestamp: K,
    pub value: f64,
}

/// Points ordered by strictly ascending timestamp with finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSeries<K> {
    points: Vec<TimeSeriesPoint<K>>,
}

impl<K: Ord + Clone> ValueSeries<K> {
    pub fn new(points: Vec<TimeSeriesPoint<K>>) -> Result<Self, FoliolabError> {
        for (index, point) in points.iter().enumerate() {
            if !point.value.is_finite() {
                return Err(FoliolabError::InvalidSeries {
                    index,
                    reason: format!("value {} is not finite", point.value),
                });
            }
            if index > 0 && points[index - 1].timestamp >= point.timestamp {
                return Err(FoliolabError::InvalidSeries {
                    index,
                    reason: "timestamps must be strictly ascending".into(),
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[TimeSeriesPoint<K>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

impl ValueSeries<usize> {
    /// Index-keyed series, timestamps `0..values.len()`.
    pub fn from_values(values: &[f64]) -> Result<Self, FoliolabError> {
        Self::new(
            values
                .iter()
                .enumerate()
                .map(|(timestamp, &value)| TimeSeriesPoint { timestamp, value })
                .collect(),
        )
    }
}
