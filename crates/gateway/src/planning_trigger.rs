//! The 20-second cooldown gate on recommendation generation. Grounded on
//! `original_source`'s
//! `coordinator.py::_maybe_generate_recommendations`. The remaining
//! gating conditions (unaddressed critical incidents, pending-action
//! count, resource availability) are graph queries the coordinator
//! performs directly; this type only owns the timer.

use chrono::{DateTime, Duration, Utc};

/// Maximum number of pending (undecided) recommendations allowed before
/// new ones stop being generated, to avoid flooding the operator queue.
pub const MAX_PENDING_ACTIONS: usize = 3;

#[derive(Debug)]
pub struct PlanningTrigger {
    cooldown: Duration,
    last_call: Option<DateTime<Utc>>,
}

impl PlanningTrigger {
    const COOLDOWN_SECONDS: i64 = 20;

    #[must_use]
    pub fn new() -> Self {
        Self {
            cooldown: Duration::seconds(Self::COOLDOWN_SECONDS),
            last_call: None,
        }
    }

    /// Whether enough time has passed since the last recommendation was
    /// generated to consider generating another.
    #[must_use]
    pub fn ready(&self, now: DateTime<Utc>) -> bool {
        match self.last_call {
            None => true,
            Some(last) => now - last >= self.cooldown,
        }
    }

    pub fn record_call(&mut self, now: DateTime<Utc>) {
        self.last_call = Some(now);
    }
}

impl Default for PlanningTrigger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_before_any_call_and_blocked_immediately_after() {
        let mut trigger = PlanningTrigger::new();
        let now = Utc::now();
        assert!(trigger.ready(now));

        trigger.record_call(now);
        assert!(!trigger.ready(now + Duration::seconds(5)));
        assert!(trigger.ready(now + Duration::seconds(21)));
    }
}
