use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;
use crate::types::DriverStyle::{Aggressive, Balanced, Conservative};
use crate::types::TireCompound::{Hard, Medium, Soft};
use crate::types::Weather;

/// Everything one comparison run needs. The CLI starts from `canonical()`
/// and applies flag overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub seed: u64,
    pub track_id: String,
    pub weather: Weather,
    pub num_simulations: usize,
    pub strategies: Vec<Strategy>,
}

impl RunConfig {
    /// Default run: the four sample strategies on a dry Silverstone,
    /// five simulations each.
    pub fn canonical() -> Self {
        RunConfig {
            seed: 42,
            track_id: "silverstone".to_string(),
            weather: Weather::Dry,
            num_simulations: 5,
            strategies: sample_strategies(),
        }
    }
}

/// The standard demo set: one entry per archetype (aggressive, conservative,
/// balanced, one-stop).
pub fn sample_strategies() -> Vec<Strategy> {
    vec![
        Strategy::new(
            "Aggressive Soft Strategy",
            vec![12, 28],
            vec![Soft, Soft, Medium],
            Aggressive,
        ),
        Strategy::new(
            "Conservative Hard Strategy",
            vec![20, 40],
            vec![Medium, Hard, Hard],
            Conservative,
        ),
        Strategy::new(
            "Balanced Strategy",
            vec![15, 35],
            vec![Medium, Hard, Medium],
            Balanced,
        ),
        Strategy::new("One-Stop Strategy", vec![25], vec![Medium, Hard], Conservative),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_config_is_comparable() {
        let config = RunConfig::canonical();
        assert_eq!(config.seed, 42);
        assert_eq!(config.track_id, "silverstone");
        assert!(config.strategies.len() >= 2);
        assert!(config.num_simulations >= 1);
    }

    #[test]
    fn sample_strategies_fit_their_stints() {
        // Each sample carries one compound per stint.
        for strategy in sample_strategies() {
            assert_eq!(strategy.tires.len(), strategy.pit_stops.len() + 1, "{}", strategy.name);
        }
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = RunConfig::canonical();
        let json = serde_json::to_string(&config).unwrap();
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.strategies.len(), config.strategies.len());
        assert_eq!(back.weather, config.weather);
    }
}
