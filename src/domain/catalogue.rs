//! Pre-built portfolios and the optimization methods offered for them.
//!
//! Method entries are descriptive labels; no optimization is computed.

use std::fmt;
use std::str::FromStr;

use crate::domain::allocation::{Allocation, AssetClass};
use crate::domain::error::FoliolabError;
use crate::domain::series::ValueSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Philosophy {
    Growth,
    AllSeasons,
}

impl fmt::Display for Philosophy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Philosophy::Growth => write!(f, "growth"),
            Philosophy::AllSeasons => write!(f, "all-seasons"),
        }
    }
}

impl FromStr for Philosophy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "growth" => Ok(Philosophy::Growth),
            "all-seasons" | "allseasons" => Ok(Philosophy::AllSeasons),
            other => Err(format!("unknown philosophy '{other}' (expected growth or all-seasons)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub philosophy: Philosophy,
    pub risk: RiskLevel,
    /// Expected annual return range, percent.
    pub expected_return: (f64, f64),
    pub original: &'static [(AssetClass, f64)],
    pub optimized: &'static [(AssetClass, f64)],
    /// Twelve-step illustrative value path starting at 100.
    pub sample_values: &'static [f64],
}

impl PortfolioProfile {
    /// Growth portfolios go through the simulated optimization; the
    /// all-seasons portfolio goes straight to results.
    pub fn requires_optimization(&self) -> bool {
        self.philosophy == Philosophy::Growth
    }

    pub fn original_allocation(&self) -> Result<Allocation, FoliolabError> {
        Allocation::new(self.original)
    }

    pub fn optimized_allocation(&self) -> Result<Allocation, FoliolabError> {
        Allocation::new(self.optimized)
    }

    pub fn sample_series(&self) -> Result<ValueSeries<usize>, FoliolabError> {
        ValueSeries::from_values(self.sample_values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Simple,
    Advanced,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Simple => write!(f, "simple"),
            Complexity::Advanced => write!(f, "advanced"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationMethod {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub complexity: Complexity,
    /// Advertised improvement range, percent.
    pub expected_improvement: (f64, f64),
}

pub const DEFAULT_PORTFOLIO: &str = "growth-80-20";
pub const DEFAULT_METHOD: &str = "sharpe";

static PORTFOLIOS: [PortfolioProfile; 4] = [
    PortfolioProfile {
        id: "growth-80-20",
        name: "Growth 80/20",
        description: "80% stocks, 20% bonds; balanced for beginners",
        philosophy: Philosophy::Growth,
        risk: RiskLevel::Medium,
        expected_return: (7.0, 9.0),
        original: &[(AssetClass::Stocks, 80.0), (AssetClass::Bonds, 20.0)],
        optimized: &[
            (AssetClass::Stocks, 75.0),
            (AssetClass::Bonds, 15.0),
            (AssetClass::Reits, 10.0),
        ],
        sample_values: &[
            100.0, 105.0, 103.0, 108.0, 112.0, 110.0, 118.0, 125.0, 122.0, 130.0, 135.0, 140.0,
        ],
    },
    PortfolioProfile {
        id: "growth-90-10",
        name: "Growth 90/10",
        description: "90% stocks, 10% bonds; more aggressive",
        philosophy: Philosophy::Growth,
        risk: RiskLevel::High,
        expected_return: (8.0, 11.0),
        original: &[(AssetClass::Stocks, 90.0), (AssetClass::Bonds, 10.0)],
        optimized: &[
            (AssetClass::Stocks, 85.0),
            (AssetClass::Bonds, 8.0),
            (AssetClass::Reits, 7.0),
        ],
        sample_values: &[
            100.0, 102.0, 98.0, 110.0, 115.0, 108.0, 125.0, 130.0, 118.0, 135.0, 142.0, 150.0,
        ],
    },
    PortfolioProfile {
        id: "growth-100",
        name: "Growth 100%",
        description: "100% stocks; maximum growth",
        philosophy: Philosophy::Growth,
        risk: RiskLevel::High,
        expected_return: (9.0, 12.0),
        original: &[(AssetClass::Stocks, 100.0)],
        optimized: &[(AssetClass::Stocks, 92.0), (AssetClass::Reits, 8.0)],
        sample_values: &[
            100.0, 98.0, 95.0, 112.0, 118.0, 105.0, 128.0, 135.0, 115.0, 140.0, 148.0, 160.0,
        ],
    },
    PortfolioProfile {
        id: "all-seasons",
        name: "All-Seasons",
        description: "Diversified across economic environments",
        philosophy: Philosophy::AllSeasons,
        risk: RiskLevel::Low,
        expected_return: (6.0, 8.0),
        original: &[
            (AssetClass::Stocks, 30.0),
            (AssetClass::Bonds, 40.0),
            (AssetClass::Commodities, 15.0),
            (AssetClass::Tips, 7.5),
            (AssetClass::Reits, 7.5),
        ],
        optimized: &[
            (AssetClass::Stocks, 30.0),
            (AssetClass::Bonds, 40.0),
            (AssetClass::Commodities, 15.0),
            (AssetClass::Tips, 7.5),
            (AssetClass::Reits, 7.5),
        ],
        sample_values: &[
            100.0, 102.0, 104.0, 103.0, 106.0, 108.0, 107.0, 110.0, 112.0, 115.0, 118.0, 120.0,
        ],
    },
];

static METHODS: [OptimizationMethod; 4] = [
    OptimizationMethod {
        id: "sharpe",
        name: "Maximum Sharpe Ratio",
        description: "Maximises risk-adjusted return",
        complexity: Complexity::Simple,
        expected_improvement: (15.0, 25.0),
    },
    OptimizationMethod {
        id: "min-variance",
        name: "Minimum Variance",
        description: "Minimises portfolio volatility for cautious investors",
        complexity: Complexity::Simple,
        expected_improvement: (10.0, 20.0),
    },
    OptimizationMethod {
        id: "black-litterman",
        name: "Black-Litterman",
        description: "Blends market equilibrium with investor views",
        complexity: Complexity::Advanced,
        expected_improvement: (20.0, 35.0),
    },
    OptimizationMethod {
        id: "risk-parity",
        name: "Risk Parity",
        description: "Balances each asset's contribution to risk",
        complexity: Complexity::Advanced,
        expected_improvement: (25.0, 40.0),
    },
];

pub fn portfolios() -> &'static [PortfolioProfile] {
    &PORTFOLIOS
}

pub fn find_portfolio(id: &str) -> Result<&'static PortfolioProfile, FoliolabError> {
    PORTFOLIOS
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| FoliolabError::UnknownPortfolio(id.to_string()))
}

/// All portfolios when `philosophy` is `None`.
pub fn by_philosophy(philosophy: Option<Philosophy>) -> Vec<&'static PortfolioProfile> {
    PORTFOLIOS
        .iter()
        .filter(|p| philosophy.is_none_or(|ph| p.philosophy == ph))
        .collect()
}

pub fn methods() -> &'static [OptimizationMethod] {
    &METHODS
}

pub fn find_method(id: &str) -> Result<&'static OptimizationMethod, FoliolabError> {
    METHODS
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| FoliolabError::UnknownMethod(id.to_string()))
}
