//! `cyberwatch tour` — timed walkthrough of the authentication flow.
//!
//! Prints one step every `step_ms` of wall time. Ctrl+C flips the
//! cooperative flag; the current wait still elapses before the loop
//! observes it and stops.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use cyberwatch_core::builtin_flow;

pub fn run(step_ms: u64) {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        log::warn!("no Ctrl+C handler: {e}");
    }

    let steps = builtin_flow();
    println!("Guided tour: {} steps, {step_ms}ms apart (Ctrl+C to stop)\n", steps.len());

    for (i, step) in steps.iter().enumerate() {
        if !running.load(Ordering::SeqCst) {
            println!("\nTour stopped");
            return;
        }

        println!("[{}/{}] {}", i + 1, steps.len(), step.title);
        println!("        {}", step.details);

        // Wait in small slices so a stop request is observed at the next
        // step boundary rather than after a full sleep.
        let deadline = Instant::now() + Duration::from_millis(step_ms);
        while Instant::now() < deadline && running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    println!("\nTour complete");
}
