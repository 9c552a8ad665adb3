use std::collections::HashMap;

use serde::Serialize;

use crate::types::TireCompound;

/// Track id the catalog falls back to when a lookup misses. Keeping the
/// simulation runnable beats failing the request.
pub const FALLBACK_TRACK: &str = "silverstone";

/// Static parameters of one circuit. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct TrackDescriptor {
    pub id: String,
    pub name: String,
    pub country: String,
    pub circuit_length_km: f64,
    pub total_laps: u32,
    /// Fastest recorded race lap in seconds; the base of the lap-time model.
    pub lap_record: f64,
    /// Per-compound degradation factor, roughly 0.6 (gentle) to 1.5 (brutal).
    pub tire_degradation: HashMap<TireCompound, f64>,
}

impl TrackDescriptor {
    /// Degradation factor for a compound, neutral 1.0 when the table has no
    /// entry for it.
    pub fn degradation(&self, compound: TireCompound) -> f64 {
        self.tire_degradation.get(&compound).copied().unwrap_or(1.0)
    }

    /// The Silverstone profile. Doubles as the catalog fallback and as the
    /// fixed reference circuit of the wear term in risk scoring.
    pub fn silverstone() -> Self {
        build_track(
            "silverstone",
            "Silverstone Circuit",
            "Great Britain",
            5.891,
            52,
            78.871,
            [1.0, 1.1, 1.2, 1.0, 1.2],
        )
    }
}

fn build_track(
    id: &str,
    name: &str,
    country: &str,
    circuit_length_km: f64,
    total_laps: u32,
    lap_record: f64,
    degradation: [f64; 5],
) -> TrackDescriptor {
    let tire_degradation = TireCompound::ALL
        .iter()
        .copied()
        .zip(degradation)
        .collect();
    TrackDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        circuit_length_km,
        total_laps,
        lap_record,
        tire_degradation,
    }
}

/// Built-in circuit profiles. Degradation arrays are ordered
/// Soft, Medium, Hard, Intermediate, Wet.
fn builtin_tracks() -> Vec<TrackDescriptor> {
    vec![
        build_track(
            "monaco",
            "Circuit de Monaco",
            "Monaco",
            3.337,
            78,
            71.381,
            [0.7, 0.8, 0.9, 1.0, 1.1],
        ),
        TrackDescriptor::silverstone(),
        build_track(
            "spa",
            "Circuit de Spa-Francorchamps",
            "Belgium",
            7.004,
            44,
            103.588,
            [1.3, 1.4, 1.5, 1.1, 1.3],
        ),
        build_track(
            "monza",
            "Autodromo Nazionale di Monza",
            "Italy",
            5.793,
            53,
            80.872,
            [0.6, 0.7, 0.8, 1.0, 1.1],
        ),
        build_track(
            "suzuka",
            "Suzuka International Racing Course",
            "Japan",
            5.807,
            53,
            81.581,
            [1.1, 1.2, 1.3, 1.0, 1.2],
        ),
    ]
}

/// One row of the track listing exposed to callers picking a circuit.
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    pub country: String,
    pub circuit_length_km: f64,
    pub total_laps: u32,
    pub lap_record: f64,
}

/// Lookup table from track id to descriptor. Read-only after construction,
/// safe to share across concurrent simulations.
pub struct TrackCatalog {
    tracks: HashMap<String, TrackDescriptor>,
}

impl Default for TrackCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackCatalog {
    pub fn new() -> Self {
        let tracks = builtin_tracks()
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();
        TrackCatalog { tracks }
    }

    /// Resolve a track id. Unknown ids resolve to the fallback circuit so a
    /// simulation request never dies on a bad id; the miss is logged as a
    /// degraded-mode condition.
    pub fn get(&self, id: &str) -> &TrackDescriptor {
        match self.tracks.get(id) {
            Some(track) => track,
            None => {
                log::warn!("unknown track id {id:?}, falling back to {FALLBACK_TRACK}");
                &self.tracks[FALLBACK_TRACK]
            }
        }
    }

    /// Summaries of every catalog entry, sorted by id for stable output.
    pub fn list(&self) -> Vec<TrackSummary> {
        let mut out: Vec<TrackSummary> = self
            .tracks
            .values()
            .map(|t| TrackSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                country: t.country.clone(),
                circuit_length_km: t.circuit_length_km,
                total_laps: t.total_laps,
                lap_record: t.lap_record,
            })
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_holds_all_builtin_circuits() {
        let catalog = TrackCatalog::new();
        for id in ["monaco", "silverstone", "spa", "monza", "suzuka"] {
            assert_eq!(catalog.get(id).id, id);
        }
        assert_eq!(catalog.list().len(), 5);
    }

    #[test]
    fn unknown_id_falls_back_to_silverstone() {
        let catalog = TrackCatalog::new();
        let track = catalog.get("interlagos");
        assert_eq!(track.id, FALLBACK_TRACK);
        assert_eq!(track.total_laps, 52);
    }

    #[test]
    fn silverstone_reference_numbers() {
        let track = TrackDescriptor::silverstone();
        assert_eq!(track.total_laps, 52);
        assert_eq!(track.lap_record, 78.871);
        assert_eq!(track.degradation(TireCompound::Hard), 1.2);
        assert_eq!(track.degradation(TireCompound::Soft), 1.0);
    }

    #[test]
    fn every_track_covers_every_compound() {
        for track in builtin_tracks() {
            for compound in TireCompound::ALL {
                assert!(
                    track.tire_degradation.contains_key(&compound),
                    "{} missing {compound}",
                    track.id
                );
            }
        }
    }

    #[test]
    fn degradation_defaults_to_neutral() {
        let mut track = TrackDescriptor::silverstone();
        track.tire_degradation.remove(&TireCompound::Wet);
        assert_eq!(track.degradation(TireCompound::Wet), 1.0);
    }

    #[test]
    fn listing_is_sorted_by_id() {
        let ids: Vec<String> = TrackCatalog::new().list().into_iter().map(|t| t.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
