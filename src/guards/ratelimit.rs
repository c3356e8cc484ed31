//! Per-user action rate limiter.
//!
//! Sliding-window tracker over an in-memory DashMap. Used for manager
//! commands and hosted-bot messages alike.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Outcome of recording an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    /// Over the limit. `first` is true for the first rejection in the
    /// current window, so callers can notify once instead of spamming.
    Limited { first: bool },
}

/// Per-user action timestamps within the rate window.
#[derive(Debug, Default)]
struct UserActions {
    times: Vec<Instant>,
    notified: bool,
}

/// Global action tracker (in-memory, lock-free).
#[derive(Clone)]
pub struct ActionTracker {
    data: Arc<DashMap<u64, UserActions>>,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// Record an action and check the limit.
    ///
    /// Rejected actions are not recorded, so a flooding user regains
    /// access as soon as the window drains.
    pub fn record(&self, user_id: u64, max_actions: u32, window_secs: u32) -> Verdict {
        let now = Instant::now();
        let window = Duration::from_secs(window_secs as u64);

        let mut entry = self.data.entry(user_id).or_default();

        // Drop actions that fell out of the window
        entry.times.retain(|&t| now.duration_since(t) < window);

        if entry.times.len() >= max_actions as usize {
            let first = !entry.notified;
            entry.notified = true;
            return Verdict::Limited { first };
        }

        entry.times.push(now);
        entry.notified = false;
        Verdict::Allowed
    }

    /// Forget a user's history.
    #[allow(dead_code)]
    pub fn reset_user(&self, user_id: u64) {
        self.data.remove(&user_id);
    }
}

impl Default for ActionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let tracker = ActionTracker::new();
        for _ in 0..5 {
            assert_eq!(tracker.record(1, 5, 10), Verdict::Allowed);
        }
        assert_eq!(tracker.record(1, 5, 10), Verdict::Limited { first: true });
        // Subsequent rejections are no longer "first"
        assert_eq!(tracker.record(1, 5, 10), Verdict::Limited { first: false });
    }

    #[test]
    fn test_users_are_independent() {
        let tracker = ActionTracker::new();
        for _ in 0..5 {
            assert_eq!(tracker.record(1, 5, 10), Verdict::Allowed);
        }
        assert_eq!(tracker.record(2, 5, 10), Verdict::Allowed);
    }

    #[test]
    fn test_reset_user() {
        let tracker = ActionTracker::new();
        for _ in 0..5 {
            tracker.record(1, 5, 10);
        }
        assert!(matches!(tracker.record(1, 5, 10), Verdict::Limited { .. }));

        tracker.reset_user(1);
        assert_eq!(tracker.record(1, 5, 10), Verdict::Allowed);
    }

    #[test]
    fn test_window_drains() {
        let tracker = ActionTracker::new();
        // Zero-length window: every previous action is already expired
        assert_eq!(tracker.record(1, 1, 0), Verdict::Allowed);
        assert_eq!(tracker.record(1, 1, 0), Verdict::Allowed);
    }
}
