//! Sliding-window admission control for the expensive generation endpoint.
//!
//! Counting and recording are one atomic step under a single lock: two
//! concurrent requests from the same key cannot both observe `limit - 1`
//! admissions and both slip through.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const DEFAULT_LIMIT: usize = 5;
const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Outcome of asking the gate to admit one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    /// Denied, with whole seconds until the oldest counted admission leaves
    /// the window. Always at least 1 so clients never busy-loop on zero.
    Denied { retry_after_secs: u64 },
}

/// Per-key sliding window limiter. Keys are whatever identity the caller
/// derives for a client; admission history lives in process memory only.
pub struct RequestGate {
    limit: usize,
    window: Duration,
    admissions: Mutex<HashMap<String, Vec<Instant>>>,
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_WINDOW)
    }
}

impl RequestGate {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            admissions: Mutex::new(HashMap::new()),
        }
    }

    pub fn admit(&self, key: &str) -> GateDecision {
        self.admit_at(key, Instant::now())
    }

    fn admit_at(&self, key: &str, now: Instant) -> GateDecision {
        let mut guard = self.admissions.lock().expect("gate mutex poisoned");
        let history = guard.entry(key.to_string()).or_default();

        history.retain(|stamp| now.duration_since(*stamp) < self.window);

        let decision = if history.len() >= self.limit {
            // A zero-limit gate has no oldest admission; the full window is
            // the honest wait.
            let remaining = match history.first() {
                Some(oldest) => self.window.saturating_sub(now.duration_since(*oldest)),
                None => self.window,
            };
            let retry_after_secs = remaining.as_secs_f64().ceil().max(1.0) as u64;
            GateDecision::Denied { retry_after_secs }
        } else {
            history.push(now);
            GateDecision::Allowed
        };

        if history.is_empty() {
            guard.remove(key);
        }
        decision
    }
}
