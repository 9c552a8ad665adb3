//! Race strategy simulation and comparison engine.
//!
//! The crate models a single car running a full race distance under a given
//! strategy (pit-stop laps, tire sequence, driver style) and environmental
//! conditions (track, weather). One run produces lap-by-lap telemetry and a
//! total race time; the comparison layer averages repeated runs per strategy,
//! ranks the candidates, and derives differences, suggestions, and a risk
//! summary across the set.
//!
//! All randomness flows through an injected `rand::Rng`, so any computation
//! is reproducible given a seed.

pub mod analysis;
pub mod comparison;
pub mod config;
pub mod simulation;
pub mod strategy;
pub mod track;
pub mod types;
