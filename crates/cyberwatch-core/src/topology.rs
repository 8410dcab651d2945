//! Fixed network topology: typed nodes, undirected connections, lookup.
//!
//! The node and edge sets are defined at construction and never mutated.
//! Coordinates live in a 440x220 world space; renderers scale to their own
//! surface. Unknown node ids resolve to a random node rather than an error,
//! so a misspelled endpoint degrades to visual noise instead of a failure.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Role of a node in the monitored network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Firewall,
    Gateway,
    Auth,
    Database,
    Client,
    Monitor,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Firewall => write!(f, "firewall"),
            Self::Gateway => write!(f, "gateway"),
            Self::Auth => write!(f, "auth"),
            Self::Database => write!(f, "database"),
            Self::Client => write!(f, "client"),
            Self::Monitor => write!(f, "monitor"),
        }
    }
}

/// A single infrastructure node with a fixed world position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl Node {
    fn new(id: &str, kind: NodeKind, label: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            kind,
            label: label.to_string(),
            x,
            y,
        }
    }
}

/// An undirected connection between two nodes, by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// The full node/edge graph. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Topology {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// The reference SOC network: perimeter chain on the top row, client pool
    /// below, monitor above the auth server.
    pub fn soc() -> Self {
        let nodes = vec![
            Node::new("firewall", NodeKind::Firewall, "FIREWALL", 88.0, 66.0),
            Node::new("gateway", NodeKind::Gateway, "GATEWAY", 176.0, 66.0),
            Node::new("auth", NodeKind::Auth, "AUTH SERVER", 264.0, 66.0),
            Node::new("db", NodeKind::Database, "DATABASE", 352.0, 66.0),
            Node::new("client1", NodeKind::Client, "CLIENT-01", 132.0, 154.0),
            Node::new("client2", NodeKind::Client, "CLIENT-02", 220.0, 154.0),
            Node::new("client3", NodeKind::Client, "CLIENT-03", 308.0, 154.0),
            Node::new("monitor", NodeKind::Monitor, "SOC", 220.0, 22.0),
        ];
        let edges = [
            ("firewall", "gateway"),
            ("gateway", "auth"),
            ("auth", "db"),
            ("client1", "gateway"),
            ("client2", "gateway"),
            ("client3", "gateway"),
            ("monitor", "auth"),
        ]
        .iter()
        .map(|(a, b)| Edge {
            from: (*a).to_string(),
            to: (*b).to_string(),
        })
        .collect();

        Self::new(nodes, edges)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a node by id, falling back to a random node when the id is
    /// unknown. Returns `None` only for an empty topology.
    pub fn node_or_random<R: Rng>(&self, id: &str, rng: &mut R) -> Option<&Node> {
        self.node(id).or_else(|| self.random_node(rng))
    }

    pub fn random_node<R: Rng>(&self, rng: &mut R) -> Option<&Node> {
        if self.nodes.is_empty() {
            return None;
        }
        let i = rng.random_range(0..self.nodes.len());
        Some(&self.nodes[i])
    }

    pub fn random_edge<R: Rng>(&self, rng: &mut R) -> Option<&Edge> {
        if self.edges.is_empty() {
            return None;
        }
        let i = rng.random_range(0..self.edges.len());
        Some(&self.edges[i])
    }

    /// Pick two distinct random nodes. `None` when fewer than two exist.
    pub fn random_pair<R: Rng>(&self, rng: &mut R) -> Option<(&Node, &Node)> {
        if self.nodes.len() < 2 {
            return None;
        }
        let a = rng.random_range(0..self.nodes.len());
        let mut b = rng.random_range(0..self.nodes.len());
        if a == b {
            b = (b + 1) % self.nodes.len();
        }
        Some((&self.nodes[a], &self.nodes[b]))
    }

    /// Resolve both endpoints of an edge.
    pub fn endpoints(&self, edge: &Edge) -> Option<(&Node, &Node)> {
        Some((self.node(&edge.from)?, self.node(&edge.to)?))
    }
}
