use hifitime::Duration;

/// One-shot countdown in simulated time. At most one countdown is pending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespawnTimer {
    limit: Duration,
    remaining: Option<Duration>,
}

impl RespawnTimer {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            remaining: None,
        }
    }

    pub fn from_milliseconds(limit_ms: f64) -> Self {
        Self::new(Duration::from_milliseconds(limit_ms))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Arms the countdown. Returns false if one is already pending.
    pub fn start(&mut self) -> bool {
        if self.remaining.is_some() {
            return false;
        }
        self.remaining = Some(self.limit);
        true
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Counts down by `dt` seconds. Returns true exactly once, on the tick it expires.
    pub fn advance(&mut self, dt: f64) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };

        let next = remaining - Duration::from_seconds(dt);
        if next <= Duration::ZERO {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(next);
            false
        }
    }
}
