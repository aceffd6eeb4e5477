use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// Opportunistic purge threshold; keeps the map bounded by live callers.
const MAX_TRACKED_KEYS: usize = 10_000;

struct Window {
    count: u32,
    reset_at: Instant,
}

/// Per-caller sliding-window admission control.
///
/// Single-process by design: each worker keeps its own counters. A
/// multi-instance deployment needs a shared counter store instead.
pub struct SlidingWindowLimiter {
    limit: u32,
    window: Duration,
    entries: Mutex<HashMap<String, Window>>,
}

impl SlidingWindowLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject one request for the given caller key.
    ///
    /// Never fails: an unknown or expired key starts a fresh window with
    /// count 1. A rejection does not mutate the window.
    pub fn admit(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("rate limiter poisoned");

        if entries.len() > MAX_TRACKED_KEYS {
            entries.retain(|_, w| now <= w.reset_at);
        }

        match entries.get_mut(key) {
            Some(w) if now <= w.reset_at => {
                if w.count >= self.limit {
                    return false;
                }
                w.count += 1;
                true
            }
            _ => {
                entries.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_request_over_limit() {
        let limiter = SlidingWindowLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.admit("10.0.0.1"));
        assert!(limiter.admit("10.0.0.1"));
        assert!(limiter.admit("10.0.0.1"));
        assert!(!limiter.admit("10.0.0.1"));
        // other callers are unaffected
        assert!(limiter.admit("10.0.0.2"));
    }

    #[test]
    fn window_expiry_resets_counter() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_millis(30));
        assert!(limiter.admit("k"));
        assert!(!limiter.admit("k"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(limiter.admit("k"));
    }

    #[test]
    fn rejection_does_not_extend_window() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_millis(30));
        assert!(limiter.admit("k"));
        for _ in 0..5 {
            assert!(!limiter.admit("k"));
        }
        std::thread::sleep(Duration::from_millis(40));
        assert!(limiter.admit("k"));
    }
}
