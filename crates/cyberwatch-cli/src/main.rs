//! CLI for cyberwatch — a security operations center demo in your terminal.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cyberwatch")]
#[command(about = "cyberwatch — a security operations center demo in your terminal")]
#[command(version = cyberwatch_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the builtin scenarios and active security policies
    Scenarios {
        /// Print the catalog as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run repeated risk assessments for a scenario and show the tier spread
    Assess {
        /// Scenario id (unknown ids use the default scenario)
        #[arg(long, default_value = "safe_user")]
        scenario: String,

        /// Number of independent risk computations
        #[arg(long, default_value = "1000")]
        trials: usize,

        /// Seed for the jitter stream (omit for OS randomness)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the full trial report as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Replay a scenario headless for a fixed number of frames
    Replay {
        /// Scenario id (unknown ids use the default scenario)
        #[arg(long, default_value = "breach")]
        scenario: String,

        /// Number of simulation frames to run (one frame is ~16.7ms)
        #[arg(long, default_value = "600")]
        ticks: u64,

        /// Override the scenario's packet rate
        #[arg(long)]
        rate: Option<f64>,

        /// Seed for a deterministic run (omit for OS randomness)
        #[arg(long)]
        seed: Option<u64>,

        /// Write a dashboard snapshot into this directory when done
        #[arg(long)]
        output: Option<String>,

        /// Print each audit line as it lands
        #[arg(long)]
        verbose: bool,
    },

    /// Walk the authentication flow as a timed guided tour
    Tour {
        /// Milliseconds between tour steps
        #[arg(long, default_value = "1700")]
        step_ms: u64,
    },

    /// Live interactive dashboard (TUI)
    Dashboard {
        /// Refresh interval in milliseconds
        #[arg(long, default_value = "33")]
        refresh: u64,

        /// Scenario to start with
        #[arg(long, default_value = "safe_user")]
        scenario: String,

        /// Seed for a deterministic session (omit for OS randomness)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scenarios { json } => commands::scenarios::run(json),
        Commands::Assess {
            scenario,
            trials,
            seed,
            output,
        } => commands::assess::run(&scenario, trials, seed, output.as_deref()),
        Commands::Replay {
            scenario,
            ticks,
            rate,
            seed,
            output,
            verbose,
        } => commands::replay::run(&scenario, ticks, rate, seed, output.as_deref(), verbose),
        Commands::Tour { step_ms } => commands::tour::run(step_ms),
        Commands::Dashboard {
            refresh,
            scenario,
            seed,
        } => commands::dashboard::run(refresh, &scenario, seed),
    }
}
