//! Append-only, auto-expiring audit feed.
//!
//! Entries stay fully visible for 4.5s, fade for a further 0.9s, then drop.
//! There is no size cap: the feed only stays bounded when pushes arrive
//! slower than the expiry window. High-frequency callers can grow it.

use std::collections::VecDeque;

/// How long an entry is shown at full opacity.
pub const VISIBLE_MS: f64 = 4500.0;
/// Fade-out window after the visible period, before removal.
pub const FADE_MS: f64 = 900.0;

/// Display phase of a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditPhase {
    Visible,
    Fading,
}

/// A single feed line with its insertion timestamp (simulation clock).
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub text: String,
    pub born_ms: f64,
}

impl AuditEntry {
    pub fn phase(&self, now_ms: f64) -> AuditPhase {
        if now_ms - self.born_ms < VISIBLE_MS {
            AuditPhase::Visible
        } else {
            AuditPhase::Fading
        }
    }

    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.born_ms >= VISIBLE_MS + FADE_MS
    }
}

/// The visible event feed. Insertion order is display order, oldest first.
#[derive(Debug, Default)]
pub struct AuditFeed {
    entries: VecDeque<AuditEntry>,
    total_pushed: u64,
}

impl AuditFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry immediately; it expires on its own via [`expire`].
    ///
    /// [`expire`]: AuditFeed::expire
    pub fn push(&mut self, text: impl Into<String>, now_ms: f64) {
        self.entries.push_back(AuditEntry {
            text: text.into(),
            born_ms: now_ms,
        });
        self.total_pushed += 1;
    }

    /// Drop entries whose visible + fade window has elapsed.
    pub fn expire(&mut self, now_ms: f64) {
        while let Some(front) = self.entries.front() {
            if front.expired(now_ms) {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lifetime count of pushes, unaffected by expiry.
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed
    }
}
