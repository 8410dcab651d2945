//! `cyberwatch replay` — run a scenario headless for a fixed frame count.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cyberwatch_core::write_snapshot;

use super::make_engine;

pub fn run(
    scenario: &str,
    ticks: u64,
    rate: Option<f64>,
    seed: Option<u64>,
    output: Option<&str>,
    verbose: bool,
) {
    let mut engine = make_engine(scenario, seed);
    if let Some(r) = rate {
        engine.set_packet_rate(r);
    }

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        log::warn!("no Ctrl+C handler: {e}");
    }

    println!("Replaying scenario");
    println!("  Scenario:  {} ({})", engine.scenario().id, engine.scenario().title);
    println!("  Threat:    {}", engine.scenario().threat_level);
    println!("  Rate:      {:.1} (packets)", engine.packet_rate());
    println!("  Frames:    {ticks}");
    println!();

    let mut seen_audit = engine.audit().total_pushed();
    for frame in 0..ticks {
        if !running.load(Ordering::SeqCst) {
            println!("\nInterrupted at frame {frame}");
            break;
        }

        engine.advance(1.0);

        if verbose {
            let total = engine.audit().total_pushed();
            let fresh = (total - seen_audit) as usize;
            if fresh > 0 {
                let live = engine.audit().len();
                for entry in engine.audit().iter().skip(live.saturating_sub(fresh)) {
                    println!("  [{:>7.1}ms] {}", entry.born_ms, entry.text);
                }
                seen_audit = total;
            }
        } else if frame % 120 == 0 {
            print!(
                "\r  frame {frame:<7} packets {:<5} beams {:<5} heat {:<5}",
                engine.packets().len(),
                engine.beams().len(),
                engine.heat().len()
            );
            let _ = std::io::Write::flush(&mut std::io::stdout());
        }
    }

    let stats = *engine.stats();
    println!("\n\nRun complete");
    println!("  Sim time:        {:.1}s", engine.clock_ms() / 1000.0);
    println!("  Packets spawned: {}", stats.packets_spawned);
    println!("  Packets arrived: {}", stats.packets_arrived);
    println!("  Beams fired:     {}", stats.beams_fired);
    println!("  Audit events:    {}", engine.audit().total_pushed());
    println!(
        "  Gauge:           {:.0} ({})",
        engine.gauge(),
        engine.tier()
    );

    if let Some(dir) = output {
        let snap = engine.snapshot();
        match write_snapshot(&snap, std::path::Path::new(dir)) {
            Ok(path) => println!("  Snapshot:        {}", path.display()),
            Err(e) => {
                eprintln!("Error writing snapshot: {e}");
                std::process::exit(1);
            }
        }
    }
}
