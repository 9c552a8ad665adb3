use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tire compounds available to a strategy. Serialized capitalized
/// ("Soft", "Medium", ...) to match the wire format of strategy records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TireCompound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
}

impl TireCompound {
    pub const ALL: [TireCompound; 5] = [
        TireCompound::Soft,
        TireCompound::Medium,
        TireCompound::Hard,
        TireCompound::Intermediate,
        TireCompound::Wet,
    ];

    /// Baseline stint length in laps, before the weather adjustment.
    pub fn base_stint_laps(self) -> u32 {
        match self {
            TireCompound::Soft => 15,
            TireCompound::Medium => 25,
            TireCompound::Hard => 35,
            TireCompound::Intermediate => 20,
            TireCompound::Wet => 18,
        }
    }

    /// Relative hardness rank used for compound-progression scoring.
    /// Rain tires rank alongside the soft end of the dry range.
    pub fn hardness(self) -> u8 {
        match self {
            TireCompound::Soft => 1,
            TireCompound::Medium => 2,
            TireCompound::Hard => 3,
            TireCompound::Intermediate => 2,
            TireCompound::Wet => 1,
        }
    }
}

impl fmt::Display for TireCompound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TireCompound::Soft => "Soft",
            TireCompound::Medium => "Medium",
            TireCompound::Hard => "Hard",
            TireCompound::Intermediate => "Intermediate",
            TireCompound::Wet => "Wet",
        };
        write!(f, "{name}")
    }
}

/// Track-level weather condition for a race. A single condition holds for the
/// whole distance; lap-by-lap forecasting belongs to the weather provider
/// upstream of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Dry,
    Intermediate,
    Wet,
}

impl Weather {
    /// Scalar applied to the base lap time. Reduced grip makes every lap
    /// proportionally slower.
    pub fn lap_time_multiplier(self) -> f64 {
        match self {
            Weather::Dry => 1.0,
            Weather::Intermediate => 1.08,
            Weather::Wet => 1.15,
        }
    }

    /// Scalar applied to a compound's baseline stint length.
    pub fn stint_length_multiplier(self) -> f64 {
        match self {
            Weather::Dry => 1.0,
            Weather::Intermediate => 0.9,
            Weather::Wet => 0.8,
        }
    }

    /// Compound performance multiplier under this condition. Applies
    /// uniformly to all compounds.
    pub fn tire_performance_multiplier(self) -> f64 {
        match self {
            Weather::Dry => 1.0,
            Weather::Intermediate => 0.8,
            Weather::Wet => 0.6,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weather::Dry => "dry",
            Weather::Intermediate => "intermediate",
            Weather::Wet => "wet",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Weather {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dry" => Ok(Weather::Dry),
            "intermediate" => Ok(Weather::Intermediate),
            "wet" => Ok(Weather::Wet),
            other => Err(format!("unknown weather {other:?}")),
        }
    }
}

/// Coarse behavioral modifier scaling lap time and risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverStyle {
    Conservative,
    Balanced,
    Aggressive,
}

impl DriverStyle {
    /// Scalar applied to the base lap time. Aggressive drivers lap faster,
    /// conservative drivers slower.
    pub fn pace_multiplier(self) -> f64 {
        match self {
            DriverStyle::Conservative => 1.02,
            DriverStyle::Balanced => 1.0,
            DriverStyle::Aggressive => 0.98,
        }
    }

    /// Additive contribution to the strategy risk score.
    pub fn risk_weight(self) -> f64 {
        match self {
            DriverStyle::Conservative => 0.05,
            DriverStyle::Balanced => 0.0,
            DriverStyle::Aggressive => 0.15,
        }
    }
}

impl fmt::Display for DriverStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverStyle::Conservative => "conservative",
            DriverStyle::Balanced => "balanced",
            DriverStyle::Aggressive => "aggressive",
        };
        write!(f, "{name}")
    }
}

/// Three-level verdict shared by the wear, weather, and risk analyses.
/// Ordered so that `max` picks the more severe level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{name}")
    }
}
