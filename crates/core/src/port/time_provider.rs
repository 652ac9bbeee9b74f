// Time Provider Port (for testability)

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Fixed clock that advances by `step` on every read (tests)
pub struct SteppingTimeProvider {
    next: std::sync::atomic::AtomicI64,
    step: i64,
}

impl SteppingTimeProvider {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: std::sync::atomic::AtomicI64::new(start),
            step,
        }
    }
}

impl TimeProvider for SteppingTimeProvider {
    fn now_millis(&self) -> i64 {
        self.next
            .fetch_add(self.step, std::sync::atomic::Ordering::SeqCst)
    }
}
