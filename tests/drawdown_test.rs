//! Drawdown series properties over generated value paths.

use approx::assert_relative_eq;
use foliolab::domain::drawdown::{self, DrawdownPoint};
use foliolab::domain::error::FoliolabError;
use foliolab::domain::series::{TimeSeriesPoint, ValueSeries};
use proptest::prelude::*;

fn drawdowns(values: &[f64]) -> Vec<DrawdownPoint<usize>> {
    drawdown::compute(&ValueSeries::from_values(values).unwrap()).unwrap()
}

fn positive_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01f64..1_000_000.0, 0..64)
}

proptest! {
    #[test]
    fn output_matches_input_shape(values in positive_values()) {
        let points = drawdowns(&values);
        prop_assert_eq!(points.len(), values.len());
        for (i, p) in points.iter().enumerate() {
            prop_assert_eq!(p.timestamp, i);
        }
    }

    #[test]
    fn running_peak_is_prefix_maximum(values in positive_values()) {
        let points = drawdowns(&values);
        let mut expected = f64::NEG_INFINITY;
        for (value, point) in values.iter().zip(&points) {
            expected = expected.max(*value);
            prop_assert_eq!(point.running_peak, expected);
            prop_assert!(point.running_peak >= *value);
        }
        for pair in points.windows(2) {
            prop_assert!(pair[1].running_peak >= pair[0].running_peak);
        }
    }

    #[test]
    fn drawdown_is_never_positive(values in positive_values()) {
        for (value, point) in values.iter().zip(drawdowns(&values)) {
            prop_assert!(point.drawdown_pct <= 0.0);
            prop_assert!(point.drawdown_pct >= -100.0);
            prop_assert_eq!(point.drawdown_pct == 0.0, *value == point.running_peak);
        }
    }

    #[test]
    fn compute_is_deterministic(values in positive_values()) {
        prop_assert_eq!(drawdowns(&values), drawdowns(&values));
    }

    #[test]
    fn summary_depth_is_minimum_drawdown(values in prop::collection::vec(0.01f64..1_000.0, 1..64)) {
        let points = drawdowns(&values);
        let summary = drawdown::summarize(&points).unwrap();
        let min = points.iter().map(|p| p.drawdown_pct).fold(0.0_f64, f64::min);
        prop_assert_eq!(summary.max_drawdown_pct, min);
        prop_assert!(summary.longest_underwater < points.len().max(1));
    }
}

#[test]
fn worked_example() {
    let points = drawdowns(&[100.0, 105.0, 103.0, 108.0, 96.0]);
    let peaks: Vec<f64> = points.iter().map(|p| p.running_peak).collect();
    assert_eq!(peaks, vec![100.0, 105.0, 105.0, 108.0, 108.0]);

    assert_eq!(points[0].drawdown_pct, 0.0);
    assert_eq!(points[1].drawdown_pct, 0.0);
    assert_relative_eq!(points[2].drawdown_pct, -1.904_761_9, epsilon = 1e-6);
    assert_eq!(points[3].drawdown_pct, 0.0);
    assert_relative_eq!(points[4].drawdown_pct, -11.111_111, epsilon = 1e-6);
}

#[test]
fn monotonic_rise_has_no_drawdown() {
    let points = drawdowns(&[1.0, 2.0, 3.0, 4.0]);
    assert!(points.iter().all(|p| p.drawdown_pct == 0.0));
    assert!(drawdown::summarize(&points).unwrap().longest_underwater == 0);
}

#[test]
fn empty_series_gives_empty_output() {
    assert!(drawdowns(&[]).is_empty());
    assert!(drawdown::summarize::<usize>(&[]).is_none());
}

#[test]
fn zero_peak_is_a_domain_error() {
    let series = ValueSeries::from_values(&[0.0, 5.0]).unwrap();
    assert!(matches!(
        drawdown::compute(&series),
        Err(FoliolabError::Domain { index: 0, .. })
    ));
}

#[test]
fn negative_start_is_a_domain_error() {
    let series = ValueSeries::from_values(&[-3.0, -1.0, 4.0]).unwrap();
    assert!(matches!(
        drawdown::compute(&series),
        Err(FoliolabError::Domain { index: 0, .. })
    ));
}

#[test]
fn non_finite_drawdown_fails_fast() {
    for values in [[1e308, -1e308], [1e-300, -1e10]] {
        let series = ValueSeries::from_values(&values).unwrap();
        match drawdown::compute(&series) {
            Err(FoliolabError::NonFiniteDrawdown { index, running_peak, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(running_peak, values[0]);
            }
            other => panic!("expected a non-finite drawdown error, got {other:?}"),
        }
    }
}

#[test]
fn date_keyed_series() {
    use chrono::NaiveDate;

    let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    let series = ValueSeries::new(vec![
        TimeSeriesPoint { timestamp: day(2), value: 50.0 },
        TimeSeriesPoint { timestamp: day(3), value: 40.0 },
        TimeSeriesPoint { timestamp: day(5), value: 45.0 },
    ])
    .unwrap();

    let points = drawdown::compute(&series).unwrap();
    assert_eq!(points[2].timestamp, day(5));
    assert_relative_eq!(points[1].drawdown_pct, -20.0);
    assert_relative_eq!(points[2].drawdown_pct, -10.0);

    let summary = drawdown::summarize(&points).unwrap();
    assert_eq!(summary.trough, day(3));
    assert_eq!(summary.longest_underwater, 2);
}
