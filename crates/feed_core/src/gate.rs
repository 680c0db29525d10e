use crate::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Rejected,
}

impl GateDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, GateDecision::Allowed)
    }
}

/// Fixed-window decision: allowed when no request was ever accepted or when at
/// least `min_interval_ms` elapsed since the last accepted one.
///
/// A `now` earlier than `last_accepted_at` counts as zero elapsed time.
pub fn try_acquire(
    now: Millis,
    last_accepted_at: Option<Millis>,
    min_interval_ms: Millis,
) -> GateDecision {
    match last_accepted_at {
        None => GateDecision::Allowed,
        Some(last) if now.saturating_sub(last) >= min_interval_ms => GateDecision::Allowed,
        Some(_) => GateDecision::Rejected,
    }
}

/// Process-wide outbound request gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchGate {
    min_interval_ms: Millis,
    last_accepted_at: Option<Millis>,
}

impl FetchGate {
    pub fn new(min_interval_ms: Millis) -> Self {
        Self {
            min_interval_ms,
            last_accepted_at: None,
        }
    }

    /// Check-then-set: records `now` as the last accepted time when allowed.
    pub fn acquire(&mut self, now: Millis) -> GateDecision {
        let decision = try_acquire(now, self.last_accepted_at, self.min_interval_ms);
        if decision.is_allowed() {
            self.last_accepted_at = Some(now);
        }
        decision
    }

    /// Time left until `acquire` would pass; zero when it would pass now.
    pub fn remaining(&self, now: Millis) -> Millis {
        match self.last_accepted_at {
            None => 0,
            Some(last) => self
                .min_interval_ms
                .saturating_sub(now.saturating_sub(last)),
        }
    }

    pub fn last_accepted_at(&self) -> Option<Millis> {
        self.last_accepted_at
    }

    pub fn min_interval_ms(&self) -> Millis {
        self.min_interval_ms
    }
}
