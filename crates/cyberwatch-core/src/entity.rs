//! Transient visual entities: packets, beams, heat points.
//!
//! Every entity carries its own lifetime state and self-terminates; the
//! engine only has to advance and prune. There is no cross-entity
//! consistency requirement.

use serde::{Deserialize, Serialize};

/// Tier color shared by packets and beams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalColor {
    Cyan,
    Amber,
    Red,
}

impl std::fmt::Display for SignalColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cyan => write!(f, "cyan"),
            Self::Amber => write!(f, "amber"),
            Self::Red => write!(f, "red"),
        }
    }
}

/// Squared arrival radius: a packet within 3 world units of its target dies.
pub const ARRIVAL_RADIUS_SQ: f64 = 9.0;

/// A traffic particle moving in a straight line toward a fixed target.
///
/// Velocity is in world units per frame; the spawner derives it from the
/// angle to the target, so distance to the target shrinks every step at
/// normal frame deltas.
#[derive(Debug, Clone, Copy)]
pub struct Packet {
    pub x: f64,
    pub y: f64,
    pub tx: f64,
    pub ty: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: SignalColor,
}

impl Packet {
    /// Aim a packet from `(x, y)` at `(tx, ty)` at `speed` units per frame.
    pub fn aimed(x: f64, y: f64, tx: f64, ty: f64, speed: f64, color: SignalColor) -> Self {
        let angle = (ty - y).atan2(tx - x);
        Self {
            x,
            y,
            tx,
            ty,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            color,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }

    pub fn dist_sq_to_target(&self) -> f64 {
        let dx = self.x - self.tx;
        let dy = self.y - self.ty;
        dx * dx + dy * dy
    }

    pub fn arrived(&self) -> bool {
        self.dist_sq_to_target() < ARRIVAL_RADIUS_SQ
    }
}

/// A short-lived flash between two points, fading linearly over its duration.
#[derive(Debug, Clone, Copy)]
pub struct Beam {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub born_ms: f64,
    pub duration_ms: f64,
    pub color: SignalColor,
}

impl Beam {
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.born_ms >= self.duration_ms
    }

    /// Remaining opacity in [0, 1].
    pub fn alpha(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 0.0;
        }
        (1.0 - (now_ms - self.born_ms) / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// Multiplicative intensity decay applied once per simulation frame.
pub const HEAT_INTENSITY_DECAY: f64 = 0.985;
/// Linear time-to-live decrement per simulation frame. The step assumes a
/// 16ms frame budget and is deliberately not scaled by measured delta time.
pub const HEAT_TTL_STEP_MS: f64 = 16.0;
/// Intensity below this is invisible; the point is pruned.
pub const HEAT_INTENSITY_FLOOR: f64 = 0.02;

/// A decaying intensity sample feeding the threat-surface heatmap.
#[derive(Debug, Clone, Copy)]
pub struct HeatPoint {
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
    pub ttl_ms: f64,
}

impl HeatPoint {
    pub fn new(x: f64, y: f64, intensity: f64, ttl_ms: f64) -> Self {
        Self {
            x,
            y,
            intensity,
            ttl_ms,
        }
    }

    /// One frame of dual decay: multiplicative on intensity, linear on ttl.
    pub fn decay(&mut self) {
        self.ttl_ms -= HEAT_TTL_STEP_MS;
        self.intensity *= HEAT_INTENSITY_DECAY;
    }

    pub fn dead(&self) -> bool {
        self.ttl_ms <= 0.0 || self.intensity < HEAT_INTENSITY_FLOOR
    }
}
