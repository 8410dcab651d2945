//! `cyberwatch assess` — repeated risk computations for one scenario.
//!
//! Every computation is independent and jittered, so the useful output is
//! the spread: a tier histogram and the median value over N trials.

use std::fs::File;
use std::io::{BufWriter, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cyberwatch_core::{JITTER_MAX, RiskTier, ScenarioStore, compute_risk};

/// Tier tallies plus the sorted trial values.
pub struct TrialReport {
    pub scenario_id: String,
    pub trials: usize,
    pub low: usize,
    pub elevated: usize,
    pub high: usize,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Run the trials against the store entry for `scenario` (default fallback
/// applies) using the provided rng.
pub fn run_trials(store: &ScenarioStore, scenario: &str, trials: usize, rng: &mut StdRng) -> TrialReport {
    let s = store.get(scenario);
    let mut values: Vec<f64> = (0..trials.max(1))
        .map(|_| {
            let jitter = rng.random_range(0.0..JITTER_MAX);
            compute_risk(s.anomaly_score, s.access_level, jitter)
        })
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let mut low = 0;
    let mut elevated = 0;
    let mut high = 0;
    for v in &values {
        match RiskTier::from_value(*v) {
            RiskTier::Low => low += 1,
            RiskTier::Elevated => elevated += 1,
            RiskTier::High => high += 1,
        }
    }

    TrialReport {
        scenario_id: s.id.clone(),
        trials: values.len(),
        low,
        elevated,
        high,
        median: values[values.len() / 2],
        min: values[0],
        max: values[values.len() - 1],
    }
}

pub fn run(scenario: &str, trials: usize, seed: Option<u64>, output: Option<&str>) {
    let store = ScenarioStore::builtin();
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let report = run_trials(&store, scenario, trials, &mut rng);

    println!("Risk assessment: {} ({} trials)\n", report.scenario_id, report.trials);
    print_bar("LOW", report.low, report.trials);
    print_bar("ELEVATED", report.elevated, report.trials);
    print_bar("HIGH", report.high, report.trials);
    println!(
        "\nmedian {:.1}  min {:.1}  max {:.1}  tier {}",
        report.median,
        report.min,
        report.max,
        RiskTier::from_value(report.median)
    );

    if let Some(path) = output {
        if let Err(e) = write_report(&report, path) {
            eprintln!("Error writing report: {e}");
            std::process::exit(1);
        }
        println!("Report written to {path}");
    }
}

fn print_bar(label: &str, count: usize, total: usize) {
    let frac = count as f64 / total.max(1) as f64;
    let filled = (frac * 40.0).round() as usize;
    println!(
        "  {label:<9} {:>5}  [{}{}] {:.0}%",
        count,
        "#".repeat(filled),
        " ".repeat(40 - filled),
        frac * 100.0
    );
}

fn write_report(report: &TrialReport, path: &str) -> std::io::Result<()> {
    let json = serde_json::json!({
        "scenario": report.scenario_id,
        "trials": report.trials,
        "tiers": { "low": report.low, "elevated": report.elevated, "high": report.high },
        "median": report.median,
        "min": report.min,
        "max": report.max,
    });
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &json)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breach_trials_are_mostly_high() {
        let store = ScenarioStore::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_trials(&store, "breach", 1000, &mut rng);
        assert_eq!(report.trials, 1000);
        assert!(report.high > 500, "only {}/1000 HIGH", report.high);
        assert!(report.median > 75.0);
    }

    #[test]
    fn safe_user_trials_stay_low() {
        let store = ScenarioStore::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_trials(&store, "safe_user", 500, &mut rng);
        assert_eq!(report.low, 500);
        assert_eq!(report.high, 0);
    }

    #[test]
    fn tallies_sum_to_trials() {
        let store = ScenarioStore::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_trials(&store, "suspicious", 777, &mut rng);
        assert_eq!(report.low + report.elevated + report.high, 777);
    }

    #[test]
    fn zero_trials_still_produces_one() {
        let store = ScenarioStore::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_trials(&store, "safe_user", 0, &mut rng);
        assert_eq!(report.trials, 1);
    }

    #[test]
    fn unknown_scenario_assessed_as_default() {
        let store = ScenarioStore::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_trials(&store, "mystery", 10, &mut rng);
        assert_eq!(report.scenario_id, cyberwatch_core::DEFAULT_SCENARIO);
    }

    #[test]
    fn report_writes_valid_json() {
        let store = ScenarioStore::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_trials(&store, "breach", 50, &mut rng);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&report, path.to_str().unwrap()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["scenario"], "breach");
        assert_eq!(v["trials"], 50);
    }
}
