// =============================================================================
// Fetch Throttle — spaces outbound requests to respect provider rate limits
// =============================================================================
//
// Every request reserves the next free slot under a short lock; the caller
// then sleeps until its slot outside the lock. Slots are `min_spacing` apart,
// so callers are served in reservation order even if several tasks share the
// client.
// =============================================================================

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

pub struct FetchThrottle {
    min_spacing: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl FetchThrottle {
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            next_slot: Mutex::new(None),
        }
    }

    /// Reserve the next request slot and return how long the caller has to
    /// wait before using it.
    pub fn reserve(&self) -> Duration {
        let now = Instant::now();
        let mut next = self.next_slot.lock();
        let slot = match *next {
            Some(t) if t > now => t,
            _ => now,
        };
        *next = Some(slot + self.min_spacing);
        slot.saturating_duration_since(now)
    }

    /// Wait for the next request slot.
    pub async fn wait(&self) {
        let delay = self.reserve();
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "throttling provider request");
            tokio::time::sleep(delay).await;
        }
    }
}

impl std::fmt::Debug for FetchThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchThrottle")
            .field("min_spacing", &self.min_spacing)
            .finish()
    }
}
