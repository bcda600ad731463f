use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Two monotonic logical timestamps. Never reads the wall clock; callers
/// (CLI, tests) advance it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioClock {
    now: DateTime<Utc>,
    previous: DateTime<Utc>,
}

impl ScenarioClock {
    /// Start a clock at `t`, with `previous` equal to `now` (so nothing is
    /// "new" until the first `advance`/`set`).
    pub fn starting_at(t: DateTime<Utc>) -> Self {
        Self {
            now: t,
            previous: t,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn previous(&self) -> DateTime<Utc> {
        self.previous
    }

    /// `previous = now; now = t`.
    pub fn set(&mut self, t: DateTime<Utc>) {
        self.previous = self.now;
        self.now = t;
    }

    /// Shorthand for `set(now + hours)`.
    pub fn advance(&mut self, hours: f64) {
        let delta = chrono::Duration::milliseconds((hours * 3_600_000.0) as i64);
        self.set(self.now + delta);
    }

    /// `previous < ts <= now`.
    pub fn is_new(&self, ts: DateTime<Utc>) -> bool {
        self.previous < ts && ts <= self.now
    }
}
