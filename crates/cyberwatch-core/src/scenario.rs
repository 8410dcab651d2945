//! Scenario catalog: named bundles of display and risk parameters.
//!
//! Each scenario is immutable once defined. Selection is a lookup into the
//! store; an unknown id silently resolves to the default scenario instead of
//! signaling an error.

use serde::{Deserialize, Serialize};

/// Headline threat classification shown next to a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Severity tag on a scripted timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSeverity {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One entry in a scenario's scripted event timeline, fired `delay_ms` after
/// the scenario is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub severity: EventSeverity,
    pub message: String,
    pub delay_ms: u64,
}

impl ScriptedEvent {
    fn new(severity: EventSeverity, message: &str, delay_ms: u64) -> Self {
        Self {
            severity,
            message: message.to_string(),
            delay_ms,
        }
    }
}

/// Per-dimension display risk levels (0-100), independent of the live gauge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskProfile {
    pub auth: f64,
    pub network: f64,
    pub data: f64,
}

/// A named bundle of mock risk and display parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub threat_level: ThreatLevel,
    /// Nominal 0-100 anomaly input to the risk gauge.
    pub anomaly_score: f64,
    /// Privilege weight of the simulated actor.
    pub access_level: f64,
    pub expected_latency_ms: u64,
    /// Baseline packet spawn rate for the traffic simulator.
    pub packet_rate: f64,
    /// 0-1 scale factor shown on the threat-surface panel.
    pub heatmap_intensity: f64,
    pub risk_profile: RiskProfile,
    /// Node ids a policy replay walks, in order.
    pub policy_path: Vec<String>,
    pub events: Vec<ScriptedEvent>,
}

/// Id of the scenario every unknown lookup falls back to.
pub const DEFAULT_SCENARIO: &str = "safe_user";

/// Lookup table from scenario id to its parameter bundle.
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    scenarios: Vec<Scenario>,
}

impl ScenarioStore {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// The three canned scenarios, one per threat tier.
    pub fn builtin() -> Self {
        use EventSeverity::{Error, Info, Success, Warning};

        let safe_user = Scenario {
            id: DEFAULT_SCENARIO.to_string(),
            title: "Normal Authentication".to_string(),
            description: "A known user signs in from a trusted device and \
                          location. All policy checks pass on the first attempt."
                .to_string(),
            threat_level: ThreatLevel::Low,
            anomaly_score: 12.0,
            access_level: 1.0,
            expected_latency_ms: 120,
            packet_rate: 4.0,
            heatmap_intensity: 0.3,
            risk_profile: RiskProfile {
                auth: 25.0,
                network: 15.0,
                data: 10.0,
            },
            policy_path: ids(&["firewall", "gateway", "auth", "db"]),
            events: vec![
                ScriptedEvent::new(Info, "User authentication request received", 0),
                ScriptedEvent::new(Success, "Credentials validated successfully", 1000),
                ScriptedEvent::new(Success, "MFA token verified", 2000),
                ScriptedEvent::new(Success, "Access granted to user", 3000),
            ],
        };

        let suspicious = Scenario {
            id: "suspicious".to_string(),
            title: "Suspicious Activity Detected".to_string(),
            description: "Sign-in from an unusual location with repeated \
                          credential failures. Secondary verification is forced."
                .to_string(),
            threat_level: ThreatLevel::Medium,
            anomaly_score: 58.0,
            access_level: 2.0,
            expected_latency_ms: 340,
            packet_rate: 9.0,
            heatmap_intensity: 0.6,
            risk_profile: RiskProfile {
                auth: 65.0,
                network: 45.0,
                data: 30.0,
            },
            policy_path: ids(&["firewall", "gateway", "auth", "monitor"]),
            events: vec![
                ScriptedEvent::new(Warning, "Unusual login location detected", 0),
                ScriptedEvent::new(Warning, "Multiple failed authentication attempts", 1000),
                ScriptedEvent::new(Warning, "Triggering additional verification", 2000),
                ScriptedEvent::new(Info, "Security team notified", 3000),
                ScriptedEvent::new(Success, "User verified via secondary channel", 4500),
            ],
        };

        let breach = Scenario {
            id: "breach".to_string(),
            title: "Breach Attempt".to_string(),
            description: "Automated credential stuffing against the auth \
                          perimeter. Containment and lockout engage in stages."
                .to_string(),
            threat_level: ThreatLevel::High,
            anomaly_score: 95.0,
            access_level: 3.0,
            expected_latency_ms: 620,
            packet_rate: 14.0,
            heatmap_intensity: 0.95,
            risk_profile: RiskProfile {
                auth: 95.0,
                network: 85.0,
                data: 70.0,
            },
            policy_path: ids(&["firewall", "monitor", "auth"]),
            events: vec![
                ScriptedEvent::new(Error, "ALERT: Credential stuffing attack detected", 0),
                ScriptedEvent::new(Error, "Source IP blacklisted: 203.0.113.42", 800),
                ScriptedEvent::new(Error, "Automated login patterns identified", 1600),
                ScriptedEvent::new(Warning, "Firewall rules updated", 2400),
                ScriptedEvent::new(Warning, "Affected accounts locked", 3200),
                ScriptedEvent::new(Info, "Incident response team activated", 4000),
                ScriptedEvent::new(Success, "Threat neutralized - system secured", 5500),
            ],
        };

        Self::new(vec![safe_user, suspicious, breach])
    }

    /// Look up a scenario by id, falling back to the default on a miss.
    pub fn get(&self, id: &str) -> &Scenario {
        if let Some(s) = self.scenarios.iter().find(|s| s.id == id) {
            return s;
        }
        log::debug!("unknown scenario '{id}', using default '{DEFAULT_SCENARIO}'");
        self.default_scenario()
    }

    /// The fallback scenario. The builtin store always carries it; a custom
    /// store falls back to its first entry.
    pub fn default_scenario(&self) -> &Scenario {
        self.scenarios
            .iter()
            .find(|s| s.id == DEFAULT_SCENARIO)
            .unwrap_or(&self.scenarios[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// A deployed security policy shown on the policies panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// The fixed policy set displayed alongside the topology.
pub fn builtin_policies() -> Vec<Policy> {
    [
        ("mfa", "Multi-Factor Authentication"),
        ("geo", "Geo-Fencing Policy"),
        ("rate", "Rate Limiting"),
        ("encrypt", "End-to-End Encryption"),
    ]
    .iter()
    .map(|(id, name)| Policy {
        id: (*id).to_string(),
        name: (*name).to_string(),
        active: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_three_tiers() {
        let store = ScenarioStore::builtin();
        assert_eq!(store.len(), 3);
        let levels: Vec<ThreatLevel> = store.iter().map(|s| s.threat_level).collect();
        assert!(levels.contains(&ThreatLevel::Low));
        assert!(levels.contains(&ThreatLevel::Medium));
        assert!(levels.contains(&ThreatLevel::High));
    }

    #[test]
    fn lookup_by_id() {
        let store = ScenarioStore::builtin();
        let s = store.get("breach");
        assert_eq!(s.title, "Breach Attempt");
        assert!((s.anomaly_score - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        let store = ScenarioStore::builtin();
        for bogus in ["", "nope", "BREACH", "breach "] {
            let s = store.get(bogus);
            assert_eq!(s.id, DEFAULT_SCENARIO, "'{bogus}' should fall back");
        }
    }

    #[test]
    fn timelines_are_ordered_by_delay() {
        let store = ScenarioStore::builtin();
        for s in store.iter() {
            let delays: Vec<u64> = s.events.iter().map(|e| e.delay_ms).collect();
            let mut sorted = delays.clone();
            sorted.sort_unstable();
            assert_eq!(delays, sorted, "{} timeline out of order", s.id);
        }
    }

    #[test]
    fn policy_paths_reference_soc_nodes() {
        let topo = crate::topology::Topology::soc();
        let store = ScenarioStore::builtin();
        for s in store.iter() {
            for id in &s.policy_path {
                assert!(topo.node(id).is_some(), "{}: unknown node {id}", s.id);
            }
        }
    }

    #[test]
    fn builtin_policies_all_active() {
        let policies = builtin_policies();
        assert_eq!(policies.len(), 4);
        assert!(policies.iter().all(|p| p.active));
    }
}
