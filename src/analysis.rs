use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use crate::simulation::RaceSimulation;
use crate::strategy::Strategy;
use crate::track::TrackDescriptor;
use crate::types::{RiskLevel, TireCompound, Weather};

/// Per-compound verdict within a tire-wear analysis.
#[derive(Debug, Clone, Serialize)]
pub struct TireStintAnalysis {
    pub stint_length: u32,
    pub degradation_factor: f64,
    pub wear_risk: RiskLevel,
    pub optimal_stint_length: u32,
}

/// Stint accounting and per-compound degradation verdicts for one strategy.
#[derive(Debug, Clone, Serialize)]
pub struct TireWearAnalysis {
    pub stint_lengths: Vec<u32>,
    /// Keyed by compound; a compound fitted twice keeps its last stint's
    /// entry.
    pub tire_analysis: BTreeMap<TireCompound, TireStintAnalysis>,
    pub overall_wear_risk: RiskLevel,
}

/// Suitability of one compound under the race weather.
#[derive(Debug, Clone, Serialize)]
pub struct TireSuitability {
    pub performance_multiplier: f64,
    pub suitability: Suitability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suitability {
    Optimal,
    Suboptimal,
}

/// Weather exposure of a strategy: pit-window events and compound fit.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherImpact {
    /// Count of weather events hitting a pit window. Drawn as a single
    /// Bernoulli event with p = 0.3, a placeholder for forecast-driven
    /// detection.
    pub weather_events_during_pits: u32,
    pub tire_suitability: BTreeMap<TireCompound, TireSuitability>,
    pub weather_risk: RiskLevel,
}

/// Stint lengths implied by a pit-stop schedule over a race distance.
/// Entry `i` is the lap count between stop `i-1` (or the start) and stop `i`
/// (or the finish); out-of-order or out-of-range stops saturate to zero.
pub fn stint_lengths(pit_stops: &[u32], total_laps: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(pit_stops.len() + 1);
    for i in 0..=pit_stops.len() {
        let length = if i == 0 {
            pit_stops.first().copied().unwrap_or(total_laps)
        } else if i == pit_stops.len() {
            total_laps.saturating_sub(pit_stops[pit_stops.len() - 1])
        } else {
            pit_stops[i].saturating_sub(pit_stops[i - 1])
        };
        out.push(length);
    }
    out
}

/// Analyze the wear profile of a strategy on a track under a weather
/// condition: stint lengths, per-compound degradation verdicts, and an
/// overall verdict across the set.
pub fn analyze_tire_wear(
    strategy: &Strategy,
    weather: Weather,
    track: &TrackDescriptor,
) -> TireWearAnalysis {
    let stints = stint_lengths(&strategy.pit_stops, track.total_laps);

    let mut tire_analysis = BTreeMap::new();
    for (i, &tire) in strategy.tires.iter().enumerate() {
        if i >= stints.len() {
            break;
        }
        let degradation = track.degradation(tire);
        let wear_risk = if degradation > 1.2 {
            RiskLevel::High
        } else if degradation > 1.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
        let optimal_stint_length =
            (tire.base_stint_laps() as f64 * weather.stint_length_multiplier()).floor() as u32;
        tire_analysis.insert(
            tire,
            TireStintAnalysis {
                stint_length: stints[i],
                degradation_factor: degradation,
                wear_risk,
                optimal_stint_length,
            },
        );
    }

    let overall_wear_risk = overall_wear_risk(&tire_analysis);
    TireWearAnalysis { stint_lengths: stints, tire_analysis, overall_wear_risk }
}

fn overall_wear_risk(tire_analysis: &BTreeMap<TireCompound, TireStintAnalysis>) -> RiskLevel {
    let high = tire_analysis.values().filter(|a| a.wear_risk == RiskLevel::High).count();
    let medium = tire_analysis.values().filter(|a| a.wear_risk == RiskLevel::Medium).count();
    if high > 0 {
        RiskLevel::High
    } else if medium > 1 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Analyze how the race weather bears on a strategy's compounds and pit
/// windows.
pub fn analyze_weather_impact(
    strategy: &Strategy,
    weather: Weather,
    rng: &mut impl Rng,
) -> WeatherImpact {
    let weather_events_during_pits = if rng.random_bool(0.3) { 1 } else { 0 };

    let mut tire_suitability = BTreeMap::new();
    for &tire in &strategy.tires {
        let performance_multiplier = weather.tire_performance_multiplier();
        let suitability = if performance_multiplier > 0.8 {
            Suitability::Optimal
        } else {
            Suitability::Suboptimal
        };
        tire_suitability.insert(tire, TireSuitability { performance_multiplier, suitability });
    }

    let weather_risk = if weather_events_during_pits > 1 {
        RiskLevel::High
    } else if weather_events_during_pits > 0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    WeatherImpact { weather_events_during_pits, tire_suitability, weather_risk }
}

/// Composite [0, 1] risk score for a strategy over its simulated runs.
///
/// Adds a variance term (capped at 0.3), a wear term, a complexity term for
/// three or more stops, and the driver-style weight, then clamps at 1.0.
/// The wear term is pinned to the dry Silverstone reference profile
/// regardless of the runs' actual conditions, reproducing the observed
/// scoring behavior.
pub fn risk_score(strategy: &Strategy, runs: &[RaceSimulation]) -> f64 {
    let total_times: Vec<f64> = runs.iter().map(|r| r.total_time).collect();
    let mut score = (population_variance(&total_times) / 1000.0).min(0.3);

    let wear = analyze_tire_wear(strategy, Weather::Dry, &TrackDescriptor::silverstone());
    score += match wear.overall_wear_risk {
        RiskLevel::High => 0.3,
        RiskLevel::Medium => 0.15,
        RiskLevel::Low => 0.0,
    };

    if strategy.pit_stops.len() > 2 {
        score += 0.2;
    }
    score += strategy.driver_style.risk_weight();

    score.min(1.0)
}

/// Arithmetic mean; zero for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (mean squared deviation); zero below two samples.
pub(crate) fn population_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}
