//! Risk gauge computation: pure scoring plus tier mappings.
//!
//! Each computation is independent; there is no history, smoothing, or
//! hysteresis. Callers sample the jitter term so the function itself stays
//! deterministic and testable.

use serde::{Deserialize, Serialize};

use crate::entity::SignalColor;

/// Upper bound (exclusive) of the uniform jitter callers add per computation.
pub const JITTER_MAX: f64 = 6.0;

/// Map anomaly score and access level to a clamped [0, 100] risk value.
pub fn compute_risk(anomaly_score: f64, access_level: f64, jitter: f64) -> f64 {
    (anomaly_score * 0.7 + access_level * 6.0 + jitter).clamp(0.0, 100.0)
}

/// Gauge tier bands. The gauge turns red above 75 and amber above 45.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Elevated,
    High,
}

impl RiskTier {
    pub fn from_value(risk: f64) -> Self {
        if risk > 75.0 {
            Self::High
        } else if risk > 45.0 {
            Self::Elevated
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Elevated => write!(f, "ELEVATED"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Beam color for a computed risk value. Note the red threshold here is 70,
/// not the gauge's 75; the two bands are intentionally distinct.
pub fn beam_color(risk: f64) -> SignalColor {
    if risk > 70.0 {
        SignalColor::Red
    } else if risk > 45.0 {
        SignalColor::Amber
    } else {
        SignalColor::Cyan
    }
}

/// Number of policy beams to flash for a computed risk value: one per 20
/// points, clamped to [1, 6].
pub fn beam_count(risk: f64) -> usize {
    (risk / 20.0).round().clamp(1.0, 6.0) as usize
}
