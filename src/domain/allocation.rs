//! Asset allocations and their before/after comparison.

use std::fmt;

use crate::domain::error::FoliolabError;

const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetClass {
    Stocks,
    Bonds,
    Reits,
    Commodities,
    Tips,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::Reits,
        AssetClass::Commodities,
        AssetClass::Tips,
    ];
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetClass::Stocks => "Stocks",
            AssetClass::Bonds => "Bonds",
            AssetClass::Reits => "REITs",
            AssetClass::Commodities => "Commodities",
            AssetClass::Tips => "TIPS",
        };
        write!(f, "{name}")
    }
}

/// Percentage weights per asset class, summing to 100.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    weights: Vec<(AssetClass, f64)>,
}

impl Allocation {
    pub fn new(weights: &[(AssetClass, f64)]) -> Result<Self, FoliolabError> {
        let mut sorted = weights.to_vec();
        sorted.sort_by_key(|(asset, _)| *asset);

        for pair in sorted.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(FoliolabError::InvalidAllocation {
                    reason: format!("{} listed twice", pair[0].0),
                });
            }
        }
        for (asset, weight) in &sorted {
            if !(0.0..=100.0).contains(weight) {
                return Err(FoliolabError::InvalidAllocation {
                    reason: format!("{asset} weight {weight} outside 0..=100"),
                });
            }
        }

        let total: f64 = sorted.iter().map(|(_, w)| w).sum();
        if (total - 100.0).abs() > WEIGHT_TOLERANCE {
            return Err(FoliolabError::InvalidAllocation {
                reason: format!("weights sum to {total}, expected 100"),
            });
        }

        Ok(Self { weights: sorted })
    }

    /// Weight of `asset`, zero when absent.
    pub fn weight(&self, asset: AssetClass) -> f64 {
        self.weights
            .iter()
            .find(|(a, _)| *a == asset)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    pub fn weights(&self) -> &[(AssetClass, f64)] {
        &self.weights
    }

    pub fn contains(&self, asset: AssetClass) -> bool {
        self.weights.iter().any(|(a, _)| *a == asset)
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .weights
            .iter()
            .map(|(asset, w)| format!("{w}% {asset}"))
            .collect();
        write!(f, "{}", parts.join(" / "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationChange {
    pub asset: AssetClass,
    pub original: f64,
    pub optimized: f64,
    pub change: f64,
}

/// One row per asset class held in either allocation, in canonical order.
pub fn compare(original: &Allocation, optimized: &Allocation) -> Vec<AllocationChange> {
    AssetClass::ALL
        .iter()
        .filter(|&&asset| original.contains(asset) || optimized.contains(asset))
        .map(|&asset| {
            let before = original.weight(asset);
            let after = optimized.weight(asset);
            AllocationChange {
                asset,
                original: before,
                optimized: after,
                change: after - before,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn valid_allocation_sorted_canonically() {
        let alloc = Allocation::new(&[(AssetClass::Bonds, 20.0), (AssetClass::Stocks, 80.0)]).unwrap();
        assert_eq!(alloc.weights()[0].0, AssetClass::Stocks);
        assert_eq!(alloc.to_string(), "80% Stocks / 20% Bonds");
    }

    #[test]
    fn fractional_weights_accepted() {
        let alloc = Allocation::new(&[
            (AssetClass::Stocks, 30.0),
            (AssetClass::Bonds, 40.0),
            (AssetClass::Commodities, 15.0),
            (AssetClass::Tips, 7.5),
            (AssetClass::Reits, 7.5),
        ])
        .unwrap();
        assert_relative_eq!(alloc.weight(AssetClass::Tips), 7.5);
    }

    #[test]
    fn rejects_bad_total() {
        let err = Allocation::new(&[(AssetClass::Stocks, 80.0)]).unwrap_err();
        assert!(err.to_string().contains("sum to 80"));
    }

    #[test]
    fn rejects_negative_weight() {
        assert!(Allocation::new(&[(AssetClass::Stocks, 110.0), (AssetClass::Bonds, -10.0)]).is_err());
    }

    #[test]
    fn rejects_duplicate_asset() {
        let err = Allocation::new(&[(AssetClass::Stocks, 50.0), (AssetClass::Stocks, 50.0)]).unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn compare_covers_union_of_assets() {
        let original = Allocation::new(&[(AssetClass::Stocks, 80.0), (AssetClass::Bonds, 20.0)]).unwrap();
        let optimized = Allocation::new(&[
            (AssetClass::Stocks, 75.0),
            (AssetClass::Bonds, 15.0),
            (AssetClass::Reits, 10.0),
        ])
        .unwrap();

        let rows = compare(&original, &optimized);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].asset, AssetClass::Stocks);
        assert_relative_eq!(rows[0].change, -5.0);
        assert_eq!(rows[1].asset, AssetClass::Bonds);
        assert_relative_eq!(rows[1].change, -5.0);
        assert_eq!(rows[2].asset, AssetClass::Reits);
        assert_relative_eq!(rows[2].original, 0.0);
        assert_relative_eq!(rows[2].change, 10.0);
    }

    #[test]
    fn compare_identical_has_zero_changes() {
        let alloc = Allocation::new(&[(AssetClass::Stocks, 100.0)]).unwrap();
        let rows = compare(&alloc, &alloc);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].change, 0.0);
    }
}
