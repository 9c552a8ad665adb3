use std::fs::File;
use std::io::{BufWriter, Write};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use pitwall::comparison::{self, ComparisonResult};
use pitwall::config::RunConfig;
use pitwall::simulation;
use pitwall::strategy::{self, Strategy};
use pitwall::track::{TrackCatalog, TrackDescriptor};

/// Upper bound on runs per strategy; anything above is clamped. This is the
/// request-validation concern that sits outside the engine proper.
const MAX_SIMULATIONS: usize = 1_000;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = RunConfig::canonical();
    let mut single = false;
    let mut list_tracks = false;
    let mut output_path: Option<String> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("--seed requires a u64");
            }
            "--track" => {
                i += 1;
                config.track_id = args[i].clone();
            }
            "--weather" => {
                i += 1;
                config.weather = args[i].parse().expect("--weather requires dry|intermediate|wet");
            }
            "--sims" => {
                i += 1;
                config.num_simulations =
                    args[i].parse().expect("--sims requires a positive integer");
            }
            "--strategies" => {
                i += 1;
                config.strategies = load_strategies(&args[i]);
            }
            "--output" => {
                i += 1;
                output_path = Some(args[i].clone());
            }
            "--single" => single = true,
            "--tracks" => list_tracks = true,
            "--quiet" => quiet = true,
            other => eprintln!("ignoring unknown argument {other:?}"),
        }
        i += 1;
    }

    if config.num_simulations > MAX_SIMULATIONS {
        log::warn!(
            "clamping num_simulations from {} to {MAX_SIMULATIONS}",
            config.num_simulations
        );
        config.num_simulations = MAX_SIMULATIONS;
    }

    let catalog = TrackCatalog::new();

    if list_tracks {
        print_tracks(&catalog);
        return;
    }

    let track = catalog.get(&config.track_id);

    if single {
        run_single(&config, track, quiet, output_path.as_deref());
        return;
    }

    let result = match comparison::compare(
        &config.strategies,
        config.weather,
        track,
        config.num_simulations,
        config.seed,
    ) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("comparison failed: {e}");
            std::process::exit(2);
        }
    };

    if let Some(path) = &output_path {
        write_json(path, &result);
        if !quiet {
            println!("Comparison written to {path}");
        }
    }

    if !quiet {
        print_comparison(&config, &result);
    }
}

fn load_strategies(path: &str) -> Vec<Strategy> {
    let file = File::open(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));
    serde_json::from_reader(file).unwrap_or_else(|e| panic!("invalid strategy file {path}: {e}"))
}

fn write_json<T: serde::Serialize>(path: &str, value: &T) {
    let file = File::create(path).unwrap_or_else(|e| panic!("failed to create {path}: {e}"));
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).expect("failed to serialize output");
    writeln!(writer).expect("failed to write newline");
}

fn run_single(
    config: &RunConfig,
    track: &TrackDescriptor,
    quiet: bool,
    output_path: Option<&str>,
) {
    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);

    let mut reports = Vec::new();
    for plan in &config.strategies {
        let run = simulation::simulate(plan, config.weather, track, &mut rng);
        let analysis = run.analysis(plan);
        let profile = strategy::performance_profile(plan);
        if !quiet {
            println!(
                "{:<28} total {:>8.1}s  best lap {:>6.2}s  shape {:.2}  {analysis}",
                plan.name,
                run.total_time,
                run.lap_times().fold(f64::INFINITY, f64::min),
                profile.overall_score,
            );
        }
        reports.push(serde_json::json!({
            "name": plan.name,
            "simulation": run.laps,
            "total_time": run.total_time,
            "strategy_analysis": analysis,
            "performance": profile,
        }));
    }

    if let Some(path) = output_path {
        write_json(path, &reports);
        if !quiet {
            println!("Runs written to {path}");
        }
    }
}

fn print_tracks(catalog: &TrackCatalog) {
    println!(
        "{:<12} | {:<38} | {:<13} | {:>4} | {:>8}",
        "Id", "Name", "Country", "Laps", "Record"
    );
    println!("{}", "-".repeat(88));
    for track in catalog.list() {
        println!(
            "{:<12} | {:<38} | {:<13} | {:>4} | {:>7.3}s",
            track.id, track.name, track.country, track.total_laps, track.lap_record
        );
    }
}

fn print_comparison(config: &RunConfig, result: &ComparisonResult) {
    println!(
        "\n=== Strategy comparison ({}, {}, {} runs/strategy, seed {}) ===",
        config.track_id, config.weather, config.num_simulations, config.seed
    );
    println!(
        "{:<28} | {:>9} | {:>7} | {:>7} | {:>5} | {:>6} | {:>5}",
        "Strategy", "Total(s)", "Best", "AvgLap", "Risk", "Wear", "Stops"
    );
    println!("{}", "-".repeat(86));
    for entry in &result.strategies {
        println!(
            "{:<28} | {:>9.1} | {:>7.2} | {:>7.2} | {:>5.2} | {:>6} | {:>5}",
            entry.name,
            entry.total_time,
            entry.best_lap,
            entry.average_lap,
            entry.risk_score,
            entry.tire_wear_analysis.overall_wear_risk,
            entry.pit_stops.len(),
        );
    }

    println!("\nWinner: {} ({:.1}s)", result.winner.name, result.winner.total_time);

    if !result.key_differences.is_empty() {
        println!("\nKey differences:");
        for diff in &result.key_differences {
            println!("  [{:?}] {}", diff.impact, diff.description);
        }
    }

    if !result.optimization_suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &result.optimization_suggestions {
            println!("  - {suggestion}");
        }
    }

    let ra = &result.risk_analysis;
    println!(
        "\nRisk: {} high / {} medium / {} low, average {:.2}",
        ra.high_risk_strategies, ra.medium_risk_strategies, ra.low_risk_strategies, ra.average_risk
    );
}
