use serde::{Deserialize, Serialize};

use crate::types::{DriverStyle, TireCompound};

/// A candidate race plan: where to stop, what to fit, how hard to push.
///
/// `tires` is expected to carry one compound per stint
/// (`pit_stops.len() + 1` entries), but the engine tolerates shorter lists
/// by clamping the active-tire index rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    /// Lap numbers (1-based) at which the car pits, in race order.
    pub pit_stops: Vec<u32>,
    /// Compound fitted for each stint, in stint order.
    pub tires: Vec<TireCompound>,
    pub driver_style: DriverStyle,
}

impl Strategy {
    pub fn new(
        name: impl Into<String>,
        pit_stops: Vec<u32>,
        tires: Vec<TireCompound>,
        driver_style: DriverStyle,
    ) -> Self {
        Strategy { name: name.into(), pit_stops, tires, driver_style }
    }

    /// The compound sequence rendered for human-facing summaries,
    /// e.g. "Medium → Hard → Medium".
    pub fn tire_sequence(&self) -> String {
        self.tires
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// Shape heuristics over a strategy definition, independent of any
/// simulation run. Scores are fractions in [0, 1].
#[derive(Debug, Clone, Serialize)]
pub struct StrategyPerformance {
    /// Fraction of compound transitions that do not step softer.
    pub tire_efficiency: f64,
    /// Fraction of consecutive pit-stop gaps inside the 15..=25 lap window.
    pub pit_stop_timing: f64,
    pub overall_score: f64,
    pub recommendations: Vec<String>,
}

/// Score a strategy's shape: compound progression and pit spacing.
/// Single-element inputs score zero for the corresponding term, as there is
/// no transition or gap to judge.
pub fn performance_profile(strategy: &Strategy) -> StrategyPerformance {
    let tire_efficiency = if strategy.tires.len() >= 2 {
        let sensible = strategy
            .tires
            .windows(2)
            .filter(|pair| pair[1].hardness() >= pair[0].hardness())
            .count();
        sensible as f64 / (strategy.tires.len() - 1) as f64
    } else {
        0.0
    };

    let pit_stop_timing = if strategy.pit_stops.len() >= 2 {
        let well_spaced = strategy
            .pit_stops
            .windows(2)
            .filter(|pair| {
                let gap = pair[1].saturating_sub(pair[0]);
                (15..=25).contains(&gap)
            })
            .count();
        well_spaced as f64 / (strategy.pit_stops.len() - 1) as f64
    } else {
        0.0
    };

    let overall_score = (tire_efficiency + pit_stop_timing) / 2.0;

    let mut recommendations = Vec::new();
    if tire_efficiency < 0.5 {
        recommendations.push("Consider more logical tire compound progression".to_string());
    }
    if pit_stop_timing < 0.5 {
        recommendations.push("Optimize pit stop spacing for better tire management".to_string());
    }
    if strategy.driver_style == DriverStyle::Aggressive && strategy.tires.len() > 2 {
        recommendations.push(
            "Aggressive driving with multiple compounds may lead to high tire wear".to_string(),
        );
    }

    StrategyPerformance { tire_efficiency, pit_stop_timing, overall_score, recommendations }
}
