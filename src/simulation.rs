use rand::Rng;
use serde::Serialize;

use crate::strategy::Strategy;
use crate::track::TrackDescriptor;
use crate::types::{TireCompound, Weather};

/// Fixed time cost of one pit stop. Added to the running total, not to the
/// lap in which the stop happens.
pub const PIT_STOP_SECONDS: f64 = 25.0;

/// Seconds of lap time per lap number, a proxy for fuel burn-off.
const FUEL_LOAD_IMPACT: f64 = 0.02;

/// Seconds of lap time per unit of accumulated tire wear.
const TIRE_WEAR_IMPACT: f64 = 0.1;

/// Width of the uniform lap-time noise band, centered on zero.
const LAP_NOISE_SPAN: f64 = 0.5;

/// Wear accumulated per lap: WEAR_PER_LAP_MIN plus a uniform draw from
/// [0, WEAR_PER_LAP_SPAN).
const WEAR_PER_LAP_MIN: f64 = 1.5;
const WEAR_PER_LAP_SPAN: f64 = 0.5;

/// Telemetry for one completed lap. `tire_wear` is the accumulator value
/// after the lap, reset to near-fresh on the lap following a stop.
#[derive(Debug, Clone, Serialize)]
pub struct LapRecord {
    pub lap: u32,
    pub lap_time: f64,
    pub tire_wear: f64,
    /// Compound in use for this lap.
    pub tire: TireCompound,
}

/// One full race run for a single strategy.
#[derive(Debug, Clone, Serialize)]
pub struct RaceSimulation {
    pub laps: Vec<LapRecord>,
    /// Sum of all lap times plus all pit-stop penalties.
    pub total_time: f64,
}

impl RaceSimulation {
    pub fn lap_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.laps.iter().map(|l| l.lap_time)
    }

    /// Human-readable run summary for the single-run entry point.
    pub fn analysis(&self, strategy: &Strategy) -> String {
        format!(
            "Simulated {} laps with {} pit stops using {} compounds.",
            self.laps.len(),
            strategy.pit_stops.len(),
            strategy.tire_sequence(),
        )
    }
}

/// Run one race under `strategy` on `track` in the given `weather`.
///
/// Per lap: pit if scheduled (reset wear, advance the tire pointer clamped to
/// the last fitted compound, charge the stop penalty), then price the lap off
/// the track record plus fuel and wear costs, scaled by the weather and
/// driver multipliers, with bounded uniform noise on top. Wear accrues after
/// the lap is timed.
///
/// Every draw comes from `rng`, so a seeded generator reproduces the run.
pub fn simulate(
    strategy: &Strategy,
    weather: Weather,
    track: &TrackDescriptor,
    rng: &mut impl Rng,
) -> RaceSimulation {
    // An empty tire list degrades to a single Medium stint instead of failing.
    let default_tires = [TireCompound::Medium];
    let tires: &[TireCompound] =
        if strategy.tires.is_empty() { &default_tires } else { &strategy.tires };

    let weather_mult = weather.lap_time_multiplier();
    let driver_mult = strategy.driver_style.pace_multiplier();

    let mut laps = Vec::with_capacity(track.total_laps as usize);
    let mut total_time = 0.0;
    let mut tire_wear = 0.0;
    let mut tire_idx = 0usize;

    for lap in 1..=track.total_laps {
        if strategy.pit_stops.contains(&lap) {
            tire_wear = 0.0;
            tire_idx = (tire_idx + 1).min(tires.len() - 1);
            total_time += PIT_STOP_SECONDS;
        }

        let fuel_impact = lap as f64 * FUEL_LOAD_IMPACT;
        let tire_impact = tire_wear * TIRE_WEAR_IMPACT;
        let base = (track.lap_record + fuel_impact + tire_impact) * weather_mult * driver_mult;
        let lap_time = base + (rng.random::<f64>() - 0.5) * LAP_NOISE_SPAN;

        total_time += lap_time;
        tire_wear += WEAR_PER_LAP_MIN + rng.random::<f64>() * WEAR_PER_LAP_SPAN;

        laps.push(LapRecord { lap, lap_time, tire_wear, tire: tires[tire_idx] });
    }

    RaceSimulation { laps, total_time }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;
    use super::Strategy;
    use crate::types::DriverStyle;
    use crate::types::TireCompound::{Hard, Medium, Soft};

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(42)
    }

    fn balanced_two_stop() -> Strategy {
        Strategy::new(
            "Balanced Strategy",
            vec![15, 35],
            vec![Medium, Hard, Medium],
            DriverStyle::Balanced,
        )
    }

    fn mean_lap_time(runs: u32, weather: Weather, style: DriverStyle, seed: u64) -> f64 {
        let mut strategy = balanced_two_stop();
        strategy.driver_style = style;
        let track = TrackDescriptor::silverstone();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut sum = 0.0;
        let mut count = 0usize;
        for _ in 0..runs {
            let run = simulate(&strategy, weather, &track, &mut rng);
            sum += run.lap_times().sum::<f64>();
            count += run.laps.len();
        }
        sum / count as f64
    }

    #[test]
    fn run_covers_every_lap_of_the_track() {
        let track = TrackDescriptor::silverstone();
        let run = simulate(&balanced_two_stop(), Weather::Dry, &track, &mut rng());
        assert_eq!(run.laps.len(), track.total_laps as usize);
        for (i, lap) in run.laps.iter().enumerate() {
            assert_eq!(lap.lap, i as u32 + 1);
        }
    }

    #[test]
    fn total_time_is_lap_sum_plus_pit_penalties() {
        let strategy = balanced_two_stop();
        let track = TrackDescriptor::silverstone();
        let run = simulate(&strategy, Weather::Dry, &track, &mut rng());
        let expected =
            run.lap_times().sum::<f64>() + PIT_STOP_SECONDS * strategy.pit_stops.len() as f64;
        assert_relative_eq!(run.total_time, expected, max_relative = 1e-12);
    }

    #[test]
    fn total_time_within_loose_physical_bounds() {
        // 52 laps at the 78.871 s record, at worst 25 % slower plus stop time.
        let track = TrackDescriptor::silverstone();
        let run = simulate(&balanced_two_stop(), Weather::Dry, &track, &mut rng());
        let floor = 52.0 * 78.871;
        let ceiling = 52.0 * 78.871 * 1.25 + 60.0;
        assert!(
            run.total_time > floor && run.total_time < ceiling,
            "total {} outside [{floor}, {ceiling}]",
            run.total_time
        );
    }

    #[test]
    fn short_tire_list_clamps_instead_of_panicking() {
        // Four stops but only two compounds: every stint past the second
        // stays on the last fitted compound.
        let strategy = Strategy::new(
            "understocked",
            vec![10, 20, 30, 40],
            vec![Soft, Medium],
            DriverStyle::Balanced,
        );
        let track = TrackDescriptor::silverstone();
        let run = simulate(&strategy, Weather::Dry, &track, &mut rng());
        assert_eq!(run.laps.len(), 52);
        assert!(run.laps.iter().skip(20).all(|l| l.tire == Medium));
    }

    #[test]
    fn empty_tire_list_runs_a_medium_stint() {
        let strategy = Strategy::new("no tires", vec![], vec![], DriverStyle::Balanced);
        let track = TrackDescriptor::silverstone();
        let run = simulate(&strategy, Weather::Dry, &track, &mut rng());
        assert!(run.laps.iter().all(|l| l.tire == Medium));
    }

    #[test]
    fn pit_stop_resets_wear() {
        let strategy = balanced_two_stop();
        let track = TrackDescriptor::silverstone();
        let run = simulate(&strategy, Weather::Dry, &track, &mut rng());
        // Lap 15 pits before running, so its post-lap wear is one lap's worth,
        // well below the 14 laps accumulated by lap 14.
        let before = run.laps[13].tire_wear;
        let after = run.laps[14].tire_wear;
        assert!(after < before, "wear {after} should drop below {before} after the stop");
        assert!(after < 2.5);
    }

    #[test]
    fn wear_grows_monotonically_without_stops() {
        let strategy = Strategy::new("one stint", vec![], vec![Hard], DriverStyle::Conservative);
        let track = TrackDescriptor::silverstone();
        let run = simulate(&strategy, Weather::Dry, &track, &mut rng());
        for pair in run.laps.windows(2) {
            assert!(pair[1].tire_wear > pair[0].tire_wear);
        }
    }

    #[test]
    fn pit_on_lap_one_is_legal() {
        let strategy =
            Strategy::new("early dive", vec![1], vec![Soft, Hard], DriverStyle::Balanced);
        let track = TrackDescriptor::silverstone();
        let run = simulate(&strategy, Weather::Dry, &track, &mut rng());
        assert_eq!(run.laps.len(), 52);
        // The stop happens before lap 1 is driven, so the whole race runs on
        // the second compound.
        assert!(run.laps.iter().all(|l| l.tire == Hard));
    }

    #[test]
    fn wet_running_is_slower_than_dry() {
        // Averaged over enough laps that the ±0.25 s noise cannot flip the
        // 15 % weather penalty.
        let dry = mean_lap_time(20, Weather::Dry, DriverStyle::Balanced, 7);
        let wet = mean_lap_time(20, Weather::Wet, DriverStyle::Balanced, 7);
        assert!(wet > dry * 1.10, "wet mean {wet} not clearly above dry mean {dry}");
    }

    #[test]
    fn aggressive_laps_faster_than_conservative() {
        let aggressive = mean_lap_time(20, Weather::Dry, DriverStyle::Aggressive, 11);
        let conservative = mean_lap_time(20, Weather::Dry, DriverStyle::Conservative, 11);
        assert!(aggressive < conservative);
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let strategy = balanced_two_stop();
        let track = TrackDescriptor::silverstone();
        let a = simulate(&strategy, Weather::Dry, &track, &mut rng());
        let b = simulate(&strategy, Weather::Dry, &track, &mut rng());
        assert_eq!(a.total_time, b.total_time);
        assert!(a.lap_times().zip(b.lap_times()).all(|(x, y)| x == y));
    }

    #[test]
    fn analysis_summarizes_the_run() {
        let strategy = balanced_two_stop();
        let track = TrackDescriptor::silverstone();
        let run = simulate(&strategy, Weather::Dry, &track, &mut rng());
        assert_eq!(
            run.analysis(&strategy),
            "Simulated 52 laps with 2 pit stops using Medium → Hard → Medium compounds."
        );
    }

    proptest! {
        /// Any pit-stop layout and any non-empty tire list completes the full
        /// distance with finite times and never indexes past the tire list.
        #[test]
        fn arbitrary_strategies_complete(
            pit_stops in proptest::collection::vec(1u32..=52, 0..6),
            n_tires in 1usize..5,
            style_idx in 0usize..3,
            seed in 0u64..1_000,
        ) {
            let styles = [DriverStyle::Conservative, DriverStyle::Balanced, DriverStyle::Aggressive];
            let tires: Vec<TireCompound> =
                TireCompound::ALL.iter().copied().cycle().take(n_tires).collect();
            let strategy = Strategy::new("prop", pit_stops, tires, styles[style_idx]);
            let track = TrackDescriptor::silverstone();
            let mut rng = ChaCha20Rng::seed_from_u64(seed);

            let run = simulate(&strategy, Weather::Dry, &track, &mut rng);
            prop_assert_eq!(run.laps.len(), track.total_laps as usize);
            prop_assert!(run.total_time.is_finite() && run.total_time > 0.0);
            for lap in &run.laps {
                prop_assert!(strategy.tires.contains(&lap.tire));
            }
        }
    }
}
