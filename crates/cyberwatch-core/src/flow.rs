//! Authentication flow stepper and the guided tour that walks it.
//!
//! The stepper is a play/pause/step carousel over a fixed step list, driven
//! by the simulation clock. The tour automates the same walk: one step every
//! 1.7s with policy beams and an audit line, cancellable via a plain flag
//! that is only checked at step boundaries (cooperative, non-preemptive).

/// One stage of the zero-trust authentication walkthrough.
#[derive(Debug, Clone, Copy)]
pub struct FlowStep {
    pub title: &'static str,
    pub details: &'static str,
}

/// The fixed authentication flow, in order.
pub fn builtin_flow() -> &'static [FlowStep] {
    &[
        FlowStep {
            title: "Identity Request",
            details: "Client initiates sign-in and presents its identity assertion.",
        },
        FlowStep {
            title: "Credential Validation",
            details: "Directory verifies the credential against the identity store.",
        },
        FlowStep {
            title: "MFA Challenge",
            details: "A second factor is requested and verified out-of-band.",
        },
        FlowStep {
            title: "Policy Evaluation",
            details: "Context is checked against geo-fencing and rate limits.",
        },
        FlowStep {
            title: "Session Grant",
            details: "A scoped session token is issued and continuously monitored.",
        },
    ]
}

/// Default milliseconds between automatic flow advances.
pub const FLOW_INTERVAL_MS: f64 = 1000.0;

/// Carousel state over [`builtin_flow`]. All timing uses the engine clock.
#[derive(Debug)]
pub struct FlowStepper {
    steps: &'static [FlowStep],
    index: usize,
    playing: bool,
    interval_ms: f64,
    next_at_ms: f64,
}

impl FlowStepper {
    pub fn new() -> Self {
        Self {
            steps: builtin_flow(),
            index: 0,
            playing: false,
            interval_ms: FLOW_INTERVAL_MS,
            next_at_ms: 0.0,
        }
    }

    pub fn steps(&self) -> &'static [FlowStep] {
        self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &FlowStep {
        &self.steps[self.index]
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self, now_ms: f64) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.next_at_ms = now_ms + self.interval_ms;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jump to a step, clamped to the valid range.
    pub fn step_to(&mut self, index: usize) {
        self.index = index.min(self.steps.len() - 1);
    }

    /// Advance one step, wrapping at the end.
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.steps.len();
    }

    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms.max(1.0);
    }

    /// Clock-driven advance; returns true when a step fired.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if !self.playing || now_ms < self.next_at_ms {
            return false;
        }
        self.next();
        self.next_at_ms = now_ms + self.interval_ms;
        true
    }
}

impl Default for FlowStepper {
    fn default() -> Self {
        Self::new()
    }
}

/// Milliseconds between guided tour steps.
pub const TOUR_STEP_MS: f64 = 1700.0;
/// Policy beams flashed per tour step.
pub const TOUR_BEAMS_PER_STEP: usize = 3;
/// Duration of each tour beam.
pub const TOUR_BEAM_MS: f64 = 900.0;
/// Probability a tour beam renders amber instead of cyan.
pub const TOUR_AMBER_PROB: f64 = 0.4;

/// Guided tour progression over the flow steps.
///
/// `running` is the cooperative cancellation flag: clearing it stops the
/// tour at the next step boundary, not mid-wait.
#[derive(Debug, Default)]
pub struct TourState {
    running: bool,
    step: usize,
    next_at_ms: f64,
}

impl TourState {
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Arm the tour; the first step fires on the next clock check.
    pub fn start(&mut self, now_ms: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.step = 0;
        self.next_at_ms = now_ms;
    }

    /// Request cancellation. Takes effect at the next step boundary.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Returns the step index due to fire at `now_ms`, if any, and schedules
    /// the next one. The caller applies the step's side effects.
    pub fn due_step(&mut self, now_ms: f64, total_steps: usize) -> Option<usize> {
        if !self.running || now_ms < self.next_at_ms {
            return None;
        }
        let fired = self.step;
        self.step += 1;
        if self.step >= total_steps {
            self.running = false;
        } else {
            self.next_at_ms = now_ms + TOUR_STEP_MS;
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepper_wraps_and_clamps() {
        let mut flow = FlowStepper::new();
        let last = flow.steps().len() - 1;
        flow.step_to(999);
        assert_eq!(flow.index(), last);
        flow.next();
        assert_eq!(flow.index(), 0);
    }

    #[test]
    fn stepper_ticks_on_interval() {
        let mut flow = FlowStepper::new();
        flow.play(0.0);
        assert!(!flow.tick(999.0));
        assert!(flow.tick(1000.0));
        assert_eq!(flow.index(), 1);
        // Next fire is rescheduled relative to the fire time.
        assert!(!flow.tick(1999.0));
        assert!(flow.tick(2000.0));
    }

    #[test]
    fn paused_stepper_never_ticks() {
        let mut flow = FlowStepper::new();
        flow.play(0.0);
        flow.pause();
        assert!(!flow.tick(1e9));
        assert_eq!(flow.index(), 0);
    }

    #[test]
    fn tour_walks_every_step_then_finishes() {
        let mut tour = TourState::default();
        tour.start(0.0);
        let total = builtin_flow().len();
        let mut fired = Vec::new();
        let mut now = 0.0;
        for _ in 0..total * 3 {
            if let Some(i) = tour.due_step(now, total) {
                fired.push(i);
            }
            now += TOUR_STEP_MS;
        }
        assert_eq!(fired, (0..total).collect::<Vec<_>>());
        assert!(!tour.running());
    }

    #[test]
    fn tour_cancellation_lands_on_step_boundary() {
        let mut tour = TourState::default();
        tour.start(0.0);
        let total = builtin_flow().len();
        assert_eq!(tour.due_step(0.0, total), Some(0));
        // Cancel mid-wait: the pending delay still elapses, but no further
        // step fires once the flag is observed.
        tour.stop();
        assert_eq!(tour.due_step(TOUR_STEP_MS, total), None);
        assert_eq!(tour.due_step(1e9, total), None);
    }

    #[test]
    fn tour_restart_begins_at_first_step() {
        let mut tour = TourState::default();
        let total = builtin_flow().len();
        tour.start(0.0);
        assert_eq!(tour.due_step(0.0, total), Some(0));
        assert_eq!(tour.due_step(TOUR_STEP_MS, total), Some(1));
        tour.stop();
        tour.start(5000.0);
        assert_eq!(tour.due_step(5000.0, total), Some(0));
    }
}
