//! Per-connection chat rate limiting.
//!
//! Each connection owns one [`RateLimitWindow`]. The window opens on the first
//! chat attempt and is replaced once `now - window_start` exceeds the policy
//! duration. Inside a window, attempts are counted until the cap is reached;
//! attempts past the cap are refused and do not consume quota.

use super::value_object::Timestamp;

/// Accepted chat events allowed per window.
pub const DEFAULT_CHAT_MESSAGES_PER_WINDOW: u32 = 30;
/// Window length in milliseconds.
pub const DEFAULT_CHAT_WINDOW_MILLIS: i64 = 10_000;

/// Limits applied to every connection's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_messages: u32,
    pub window_millis: i64,
}

impl RateLimitPolicy {
    pub fn new(max_messages: u32, window_millis: i64) -> Self {
        Self {
            max_messages,
            window_millis,
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_MESSAGES_PER_WINDOW, DEFAULT_CHAT_WINDOW_MILLIS)
    }
}

/// Outcome of a single check-and-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Attempt counted. `remaining` is what is left in the current window.
    Allowed { remaining: u32 },
    /// Cap reached. The window is replaced after `retry_after_millis`.
    Limited { retry_after_millis: i64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitWindow {
    count: u32,
    window_start: Option<Timestamp>,
}

impl RateLimitWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the policy at `now` and, when allowed, record the attempt.
    pub fn check_and_record(
        &mut self,
        policy: &RateLimitPolicy,
        now: Timestamp,
    ) -> RateLimitDecision {
        let window_start = match self.window_start {
            Some(start) if now.value() - start.value() <= policy.window_millis => start,
            _ => {
                self.window_start = Some(now);
                self.count = 0;
                now
            }
        };

        if self.count >= policy.max_messages {
            let elapsed = now.value() - window_start.value();
            return RateLimitDecision::Limited {
                retry_after_millis: (policy.window_millis - elapsed + 1).max(0),
            };
        }

        self.count += 1;
        RateLimitDecision::Allowed {
            remaining: policy.max_messages - self.count,
        }
    }

    /// Attempts counted in the current window.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn window_start(&self) -> Option<Timestamp> {
        self.window_start
    }
}
