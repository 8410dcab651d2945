//! Integration tests for cyberwatch-core.
//!
//! These exercise the full pipeline: scenario selection -> risk application
//! -> traffic simulation -> entity lifetimes -> snapshot export.

use cyberwatch_core::{
    DEFAULT_SCENARIO, Engine, JITTER_MAX, RiskTier, ScenarioStore, compute_risk, write_snapshot,
};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn every_unknown_id_falls_back_without_raising() {
    let mut engine = Engine::with_defaults(Some(1));
    for bogus in ["", "breach!", "Breach", "safe-user", "☃", "0"] {
        engine.apply_scenario(bogus);
        assert_eq!(engine.scenario().id, DEFAULT_SCENARIO);
    }
}

#[test]
fn risk_clamped_for_every_store_entry_and_extreme_jitter() {
    let store = ScenarioStore::builtin();
    for s in store.iter() {
        for jitter in [0.0, JITTER_MAX, -100.0, 1e12] {
            let r = compute_risk(s.anomaly_score, s.access_level, jitter);
            assert!((0.0..=100.0).contains(&r), "{}: {r}", s.id);
        }
    }
}

#[test]
fn breach_lands_in_high_tier_over_trials() {
    // anomaly 95, access 3: 66.5 + 18 + [0, 6) of jitter. The median over
    // many trials must clear the HIGH band at 75.
    let store = ScenarioStore::builtin();
    let breach = store.get("breach");
    let mut rng = StdRng::seed_from_u64(2024);

    let mut values: Vec<f64> = (0..1000)
        .map(|_| {
            let jitter = rng.random_range(0.0..JITTER_MAX);
            compute_risk(breach.anomaly_score, breach.access_level, jitter)
        })
        .collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let median = values[values.len() / 2];
    assert!(median > 75.0, "median {median} not in HIGH tier");
    assert_eq!(RiskTier::from_value(median), RiskTier::High);

    let high = values.iter().filter(|v| **v > 75.0).count();
    assert!(high > 500, "only {high}/1000 trials landed HIGH");
}

#[test]
fn long_run_keeps_every_entity_population_bounded() {
    let mut engine = Engine::with_defaults(Some(77));
    engine.apply_scenario("breach");

    let mut max_packets = 0;
    let mut max_heat = 0;
    let mut max_beams = 0;
    // Two minutes of simulated time at one-frame steps.
    for _ in 0..7200 {
        engine.advance(1.0);
        max_packets = max_packets.max(engine.packets().len());
        max_heat = max_heat.max(engine.heat().len());
        max_beams = max_beams.max(engine.beams().len());
    }

    // Transient lifetimes are bounded, so populations reach a plateau well
    // below anything resembling a leak.
    assert!(max_packets < 2000, "packets grew to {max_packets}");
    assert!(max_heat < 5000, "heat points grew to {max_heat}");
    assert!(max_beams < 2000, "beams grew to {max_beams}");

    // After the spawner is silenced, every remaining entity drains away.
    engine.set_packet_rate(0.0);
    for _ in 0..7200 {
        engine.advance(1.0);
    }
    assert!(engine.packets().is_empty());
    assert!(engine.beams().is_empty());
    assert!(engine.heat().is_empty());
}

#[test]
fn audit_feed_bounded_at_dashboard_push_rates() {
    let mut engine = Engine::with_defaults(Some(5));
    engine.set_packet_rate(0.0);

    // One risk replay every 6 simulated seconds, slower than the expiry
    // window, for 10 minutes.
    let mut max_len = 0;
    for _ in 0..100 {
        engine.compute_risk_and_apply();
        for _ in 0..360 {
            engine.advance(1.0);
        }
        max_len = max_len.max(engine.audit().len());
    }
    assert!(max_len <= 3, "audit feed reached {max_len} entries");
}

#[test]
fn scenario_switch_mid_flight_is_clean() {
    let mut engine = Engine::with_defaults(Some(11));
    for _ in 0..30 {
        engine.advance(1.0);
    }
    engine.apply_scenario("suspicious");
    assert_eq!(engine.scenario().id, "suspicious");
    // The burst replaced in-flight packets; the clock kept running.
    assert!(!engine.packets().is_empty());
    assert!(engine.clock_ms() > 0.0);
    for _ in 0..30 {
        engine.advance(1.0);
    }
    assert!((0.0..=100.0).contains(&engine.gauge()));
}

#[test]
fn snapshot_export_after_full_session() {
    let mut engine = Engine::with_defaults(Some(3));
    engine.apply_scenario("breach");
    engine.start_tour();
    for _ in 0..600 {
        engine.advance(1.0);
    }

    let snap = engine.snapshot();
    assert_eq!(snap.scenario_id, "breach");
    assert!(snap.stats.packets_spawned > 0);
    assert!(snap.stats.beams_fired > 0);

    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(&snap, dir.path()).unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.contains("\"scenario_id\": \"breach\""));
}
