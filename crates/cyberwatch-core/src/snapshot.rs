//! Point-in-time dashboard snapshots, exportable as JSON.
//!
//! A snapshot captures what the dashboard is showing: selected scenario,
//! gauge value, counters, live entity counts, and the visible audit feed.
//! Snapshots are written one file per capture into a target directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{Engine, EngineStats};
use crate::risk::RiskTier;
use crate::scenario::ThreatLevel;

/// Serializable capture of the dashboard state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub id: String,
    /// Wall-clock capture time, milliseconds since the Unix epoch.
    pub captured_at_ms: u64,
    /// Simulation clock at capture, milliseconds.
    pub clock_ms: f64,
    pub scenario_id: String,
    pub scenario_title: String,
    pub threat_level: ThreatLevel,
    pub gauge: f64,
    pub tier: RiskTier,
    pub latency_ms: u64,
    pub stats: EngineStats,
    pub live_packets: usize,
    pub live_beams: usize,
    pub live_heat_points: usize,
    pub audit: Vec<String>,
}

impl Engine {
    /// Capture the current dashboard state.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let captured_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        DashboardSnapshot {
            id: Uuid::new_v4().to_string(),
            captured_at_ms,
            clock_ms: self.clock_ms(),
            scenario_id: self.scenario().id.clone(),
            scenario_title: self.scenario().title.clone(),
            threat_level: self.scenario().threat_level,
            gauge: self.gauge(),
            tier: self.tier(),
            latency_ms: self.latency_ms(),
            stats: *self.stats(),
            live_packets: self.packets().len(),
            live_beams: self.beams().len(),
            live_heat_points: self.heat().len(),
            audit: self.audit().iter().map(|e| e.text.clone()).collect(),
        }
    }
}

/// Write a snapshot as pretty JSON into `dir`, creating the directory if
/// needed. The file name combines the capture time and a short id prefix.
pub fn write_snapshot(snapshot: &DashboardSnapshot, dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let short_id = &snapshot.id[..8.min(snapshot.id.len())];
    let path = dir.join(format!("{}-{}.json", snapshot.captured_at_ms, short_id));

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_engine_state() {
        let mut engine = Engine::with_defaults(Some(5));
        engine.apply_scenario("breach");
        for _ in 0..30 {
            engine.advance(1.0);
        }

        let snap = engine.snapshot();
        assert_eq!(snap.scenario_id, "breach");
        assert_eq!(snap.threat_level, ThreatLevel::High);
        assert_eq!(snap.live_packets, engine.packets().len());
        assert!((0.0..=100.0).contains(&snap.gauge));
        assert!(!snap.id.is_empty());
    }

    #[test]
    fn snapshot_round_trips_and_writes() {
        let engine = Engine::with_defaults(Some(5));
        let snap = engine.snapshot();

        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(&snap, dir.path()).unwrap();
        assert!(path.exists());

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: DashboardSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.id, snap.id);
        assert_eq!(parsed.scenario_id, snap.scenario_id);
    }

    #[test]
    fn write_creates_missing_directory() {
        let engine = Engine::with_defaults(Some(5));
        let snap = engine.snapshot();

        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = write_snapshot(&snap, &nested).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}
