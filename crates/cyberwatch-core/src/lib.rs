//! # cyberwatch-core
//!
//! **A security operations center you can carry in a terminal.**
//!
//! `cyberwatch-core` is the simulation engine behind the CyberWatch demo
//! console. Everything it shows is pre-authored scenario data replayed
//! through a deterministic scheduler: traffic packets between topology
//! nodes, policy beam flashes, a decaying threat-surface heatmap, a live
//! risk gauge, and an auto-expiring audit feed.
//!
//! ## Quick Start
//!
//! ```
//! use cyberwatch_core::Engine;
//!
//! // Seeded engine over the reference topology and builtin scenarios
//! let mut engine = Engine::with_defaults(Some(42));
//! engine.apply_scenario("breach");
//!
//! // Step the simulation: 60 frames is one second of simulated time
//! for _ in 0..60 {
//!     engine.advance(1.0);
//! }
//!
//! assert!(engine.gauge() <= 100.0);
//! println!("risk {:.0} ({})", engine.gauge(), engine.tier());
//! ```
//!
//! ## Architecture
//!
//! Scenario store -> engine `advance(dt)` -> transient entities -> renderer
//!
//! The engine is the single context object owning every piece of mutable
//! state; rendering is a pure read between steps. All transient entities
//! (packets, beams, heat points, audit lines) carry bounded, self-terminating
//! lifetimes, so a long-running dashboard never accumulates state. Risk
//! values are cosmetic: a clamped linear blend of scenario inputs plus
//! uniform jitter, recomputed independently on every request.

pub mod audit;
pub mod engine;
pub mod entity;
pub mod flow;
pub mod risk;
pub mod scenario;
pub mod snapshot;
pub mod topology;

pub use audit::{AuditEntry, AuditFeed, AuditPhase};
pub use engine::{Engine, EngineStats, FRAME_MS, MAX_FRAME_DT};
pub use entity::{Beam, HeatPoint, Packet, SignalColor};
pub use flow::{FlowStep, FlowStepper, TourState, builtin_flow};
pub use risk::{JITTER_MAX, RiskTier, beam_color, beam_count, compute_risk};
pub use scenario::{
    DEFAULT_SCENARIO, EventSeverity, Policy, RiskProfile, Scenario, ScenarioStore, ScriptedEvent,
    ThreatLevel, builtin_policies,
};
pub use snapshot::{DashboardSnapshot, write_snapshot};
pub use topology::{Edge, Node, NodeKind, Topology};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
