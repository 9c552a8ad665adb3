use std::cmp::Ordering;
use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::analysis::{self, TireWearAnalysis, WeatherImpact};
use crate::simulation::{self, RaceSimulation};
use crate::strategy::Strategy;
use crate::track::TrackDescriptor;
use crate::types::{DriverStyle, RiskLevel, TireCompound, Weather};

/// A total-time spread beyond this many seconds is worth calling out.
const TIME_SPREAD_NOTABLE: f64 = 5.0;
/// Beyond this the spread is a high-impact difference.
const TIME_SPREAD_HIGH: f64 = 10.0;
/// A risk-score spread beyond this is worth calling out.
const RISK_SPREAD_NOTABLE: f64 = 0.2;
/// Risk-bucket boundaries: above is high, below the lower bound is low.
const RISK_HIGH: f64 = 0.6;
const RISK_LOW: f64 = 0.3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("at least 2 strategies are required for comparison, got {0}")]
    NotEnoughStrategies(usize),
    #[error("num_simulations must be at least 1")]
    NoSimulations,
}

/// Aggregated metrics for one strategy across its simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyComparisonEntry {
    pub name: String,
    /// Mean total race time across runs.
    pub total_time: f64,
    pub pit_stops: Vec<u32>,
    pub tires: Vec<TireCompound>,
    pub driver_style: DriverStyle,
    pub best_lap: f64,
    pub average_lap: f64,
    pub risk_score: f64,
    pub tire_wear_analysis: TireWearAnalysis,
    pub weather_impact: WeatherImpact,
}

#[derive(Debug, Clone, Serialize)]
pub struct Winner {
    pub name: String,
    pub total_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    TimeDifference,
    TireStrategy,
    RiskDifference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Medium,
    High,
}

/// One notable difference across the compared strategies.
#[derive(Debug, Clone, Serialize)]
pub struct Difference {
    pub kind: DifferenceKind,
    pub description: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Risk bucketing across the strategy set.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAnalysis {
    pub high_risk_strategies: usize,
    pub medium_risk_strategies: usize,
    pub low_risk_strategies: usize,
    pub average_risk: f64,
    pub risk_distribution: RiskDistribution,
}

/// Full outcome of a strategy comparison. Built fresh per call; entries keep
/// the input order.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub strategies: Vec<StrategyComparisonEntry>,
    pub winner: Winner,
    pub key_differences: Vec<Difference>,
    pub optimization_suggestions: Vec<String>,
    pub risk_analysis: RiskAnalysis,
}

/// Compare strategies by running each `num_simulations` times and averaging.
///
/// Strategies are evaluated in parallel, each from its own generator seeded
/// `seed + index`, so the result is reproducible for a given seed regardless
/// of scheduling. Requires at least two strategies and one run per strategy.
pub fn compare(
    strategies: &[Strategy],
    weather: Weather,
    track: &TrackDescriptor,
    num_simulations: usize,
    seed: u64,
) -> Result<ComparisonResult, CompareError> {
    if strategies.len() < 2 {
        return Err(CompareError::NotEnoughStrategies(strategies.len()));
    }
    if num_simulations == 0 {
        return Err(CompareError::NoSimulations);
    }

    let entries: Vec<StrategyComparisonEntry> = strategies
        .par_iter()
        .enumerate()
        .map(|(idx, strategy)| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed.wrapping_add(idx as u64));
            evaluate_strategy(strategy, weather, track, num_simulations, &mut rng)
        })
        .collect();

    // First minimum wins ties.
    let winner = entries
        .iter()
        .min_by(|a, b| a.total_time.partial_cmp(&b.total_time).unwrap_or(Ordering::Equal))
        .map(|e| Winner { name: e.name.clone(), total_time: e.total_time })
        .expect("at least two entries");

    let key_differences = key_differences(&entries);
    let optimization_suggestions = optimization_suggestions(&entries);
    let risk_analysis = risk_analysis(&entries);

    Ok(ComparisonResult {
        strategies: entries,
        winner,
        key_differences,
        optimization_suggestions,
        risk_analysis,
    })
}

fn evaluate_strategy(
    strategy: &Strategy,
    weather: Weather,
    track: &TrackDescriptor,
    num_simulations: usize,
    rng: &mut ChaCha20Rng,
) -> StrategyComparisonEntry {
    let runs: Vec<RaceSimulation> =
        (0..num_simulations).map(|_| simulation::simulate(strategy, weather, track, rng)).collect();

    let total_times: Vec<f64> = runs.iter().map(|r| r.total_time).collect();
    let all_lap_times: Vec<f64> = runs.iter().flat_map(|r| r.lap_times()).collect();
    let best_lap = all_lap_times.iter().copied().fold(f64::INFINITY, f64::min);

    let risk_score = analysis::risk_score(strategy, &runs);
    let tire_wear_analysis = analysis::analyze_tire_wear(strategy, weather, track);
    let weather_impact = analysis::analyze_weather_impact(strategy, weather, rng);

    let total_time = analysis::mean(&total_times);
    log::debug!(
        "evaluated {:?}: mean total {total_time:.1}s over {num_simulations} runs, risk {risk_score:.2}",
        strategy.name,
    );

    StrategyComparisonEntry {
        name: strategy.name.clone(),
        total_time,
        pit_stops: strategy.pit_stops.clone(),
        tires: strategy.tires.clone(),
        driver_style: strategy.driver_style,
        best_lap,
        average_lap: analysis::mean(&all_lap_times),
        risk_score,
        tire_wear_analysis,
        weather_impact,
    }
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    max - min
}

fn key_differences(entries: &[StrategyComparisonEntry]) -> Vec<Difference> {
    let mut differences = Vec::new();
    if entries.len() < 2 {
        return differences;
    }

    let time_spread = spread(entries.iter().map(|e| e.total_time));
    if time_spread > TIME_SPREAD_NOTABLE {
        differences.push(Difference {
            kind: DifferenceKind::TimeDifference,
            description: format!(
                "Time difference between fastest and slowest strategy: {time_spread:.1}s"
            ),
            impact: if time_spread > TIME_SPREAD_HIGH { Impact::High } else { Impact::Medium },
        });
    }

    let distinct_sequences: HashSet<&[TireCompound]> =
        entries.iter().map(|e| e.tires.as_slice()).collect();
    if distinct_sequences.len() > 1 {
        differences.push(Difference {
            kind: DifferenceKind::TireStrategy,
            description: "Different tire compound strategies used".to_string(),
            impact: Impact::Medium,
        });
    }

    let risk_spread = spread(entries.iter().map(|e| e.risk_score));
    if risk_spread > RISK_SPREAD_NOTABLE {
        differences.push(Difference {
            kind: DifferenceKind::RiskDifference,
            description: format!(
                "Significant risk difference between strategies: {risk_spread:.2}"
            ),
            impact: Impact::Medium,
        });
    }

    differences
}

fn optimization_suggestions(entries: &[StrategyComparisonEntry]) -> Vec<String> {
    fn push_unique(suggestions: &mut Vec<String>, text: &str) {
        if !suggestions.iter().any(|s| s == text) {
            suggestions.push(text.to_string());
        }
    }

    let mut suggestions: Vec<String> = Vec::new();

    if entries.iter().any(|e| e.tire_wear_analysis.overall_wear_risk == RiskLevel::High) {
        push_unique(
            &mut suggestions,
            "Consider reducing aggressive tire compounds to minimize wear risk",
        );
    }

    if entries.iter().any(|e| e.pit_stops.len() > 2) {
        push_unique(
            &mut suggestions,
            "Consider reducing number of pit stops to minimize time loss",
        );
    }

    if entries.iter().any(|e| e.weather_impact.weather_risk == RiskLevel::High) {
        push_unique(
            &mut suggestions,
            "Include weather-adaptive tire compounds for changing conditions",
        );
    }

    if entries.iter().any(|e| e.risk_score > RISK_HIGH) {
        push_unique(
            &mut suggestions,
            "Consider more conservative driver style to reduce risk",
        );
    }

    suggestions
}

fn risk_analysis(entries: &[StrategyComparisonEntry]) -> RiskAnalysis {
    let high = entries.iter().filter(|e| e.risk_score > RISK_HIGH).count();
    let medium = entries
        .iter()
        .filter(|e| e.risk_score >= RISK_LOW && e.risk_score <= RISK_HIGH)
        .count();
    let low = entries.iter().filter(|e| e.risk_score < RISK_LOW).count();
    let scores: Vec<f64> = entries.iter().map(|e| e.risk_score).collect();

    RiskAnalysis {
        high_risk_strategies: high,
        medium_risk_strategies: medium,
        low_risk_strategies: low,
        average_risk: analysis::mean(&scores),
        risk_distribution: RiskDistribution { high, medium, low },
    }
}
