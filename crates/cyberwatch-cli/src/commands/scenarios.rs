//! `cyberwatch scenarios` — list the builtin catalog and policy set.

use cyberwatch_core::{ScenarioStore, builtin_policies};

pub fn run(json: bool) {
    let store = ScenarioStore::builtin();

    if json {
        let all: Vec<_> = store.iter().collect();
        match serde_json::to_string_pretty(&all) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error serializing catalog: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Scenarios ({}):\n", store.len());
    println!(
        "{:<12} {:<8} {:>7} {:>6} {:>8} {:>5}  {}",
        "ID", "THREAT", "ANOMALY", "ACCESS", "LATENCY", "RATE", "TITLE"
    );
    println!("{}", "-".repeat(76));
    for s in store.iter() {
        println!(
            "{:<12} {:<8} {:>7.0} {:>6.0} {:>6}ms {:>5.0}  {}",
            s.id,
            s.threat_level.to_string(),
            s.anomaly_score,
            s.access_level,
            s.expected_latency_ms,
            s.packet_rate,
            s.title
        );
    }

    println!("\nActive policies:\n");
    for p in builtin_policies() {
        let status = if p.active { "ACTIVE" } else { "INACTIVE" };
        println!("  \u{2705} {:<30} {status}", p.name);
    }
}
