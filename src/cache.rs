use crate::camera::CachedResponse;
use crate::error::AppError;
use async_trait::async_trait;
use std::time::{Duration, SystemTime};

/// The single system-wide cache slot holding the last transformed feed.
#[async_trait]
pub trait CameraCache: Send + Sync {
    /// Returns the cached payload, or `None` when there is nothing cached,
    /// the entry is older than the TTL, or it cannot be read back.
    async fn read(&self) -> Option<CachedResponse>;
    /// Replaces the cached payload entirely.
    async fn write(&self, response: &CachedResponse) -> Result<(), AppError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// An entry written at `written_at` is stale once it is strictly older than
/// `ttl`. Timestamps in the future count as fresh.
pub fn is_expired(written_at: SystemTime, now: SystemTime, ttl: Duration) -> bool {
    match now.duration_since(written_at) {
        Ok(age) => age > ttl,
        Err(_) => false,
    }
}

#[cfg(test)]
pub mod test_clock {
    use super::Clock;
    use std::sync::Mutex;
    use std::time::{Duration, SystemTime};

    /// Clock that only moves when told to.
    pub struct ManualClock {
        now: Mutex<SystemTime>,
    }

    impl ManualClock {
        pub fn new(now: SystemTime) -> Self {
            Self { now: Mutex::new(now) }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> SystemTime {
            *self.now.lock().unwrap()
        }
    }
}
