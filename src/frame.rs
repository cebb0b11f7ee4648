//! Frame scheduling: request the next display refresh, or cancel it

use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Request-next-frame primitive provided by the host
pub trait FrameScheduler {
    /// Ask for a callback at the next display refresh
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request; unknown or already delivered handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Tokio-driven frame scheduler for hosts without a vsync signal
///
/// Refreshes happen at a fixed rate, but a frame is only delivered while a
/// request is pending. Late ticks are skipped rather than burst.
pub struct FrameClock {
    interval: Interval,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FrameClock {
    /// Create a clock refreshing `fps` times per second
    pub fn new(fps: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval,
            next_id: 0,
            pending: None,
        }
    }

    /// Wait for the next refresh carrying a pending request
    ///
    /// Never completes while nothing is requested. Cancel safe: the request
    /// is only consumed once the refresh tick has fired.
    pub async fn next_frame(&mut self) -> FrameHandle {
        if self.pending.is_none() {
            return std::future::pending().await;
        }
        self.interval.tick().await;
        match self.pending.take() {
            Some(handle) => handle,
            None => std::future::pending().await,
        }
    }
}

impl FrameScheduler for FrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clock_delivers_pending_request() {
        let mut clock = FrameClock::new(1000);
        let requested = clock.request_frame();
        let delivered = clock.next_frame().await;
        assert_eq!(requested, delivered);
        assert_eq!(clock.pending, None);
    }

    #[tokio::test]
    async fn test_clock_stays_suspended_without_request() {
        let mut clock = FrameClock::new(1000);
        let handle = clock.request_frame();
        clock.cancel_frame(handle);

        let waited =
            tokio::time::timeout(Duration::from_millis(20), clock.next_frame()).await;
        assert!(waited.is_err());
    }

    #[test]
    fn test_cancel_ignores_stale_handle() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let _guard = rt.enter();

        let mut clock = FrameClock::new(60);
        let first = clock.request_frame();
        let second = clock.request_frame();
        assert_ne!(first, second);

        clock.cancel_frame(first);
        assert_eq!(clock.pending, Some(second));
        clock.cancel_frame(second);
        assert_eq!(clock.pending, None);
    }
}
