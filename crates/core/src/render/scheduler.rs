use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Single-flight render trigger.
///
/// Any number of `schedule` calls between two frames collapse into one wake
/// of the render loop; scheduling while a frame is already pending is a
/// no-op.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: AtomicBool,
    notify: Notify,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests one frame; coalesces with any already-pending request.
    pub fn schedule(&self) {
        if !self.pending.swap(true, Ordering::AcqRel) {
            self.notify.notify_one();
        }
    }

    /// Waits until a frame is due and claims it.
    pub async fn due(&self) {
        loop {
            if self.pending.swap(false, Ordering::AcqRel) {
                return;
            }
            self.notify.notified().await;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_schedule_coalesces() {
        let scheduler = Arc::new(RenderScheduler::new());
        scheduler.schedule();
        scheduler.schedule();
        scheduler.schedule();
        scheduler.due().await;
        assert!(!scheduler.is_pending());
    }

    #[tokio::test]
    async fn test_due_wakes_on_later_schedule() {
        let scheduler = Arc::new(RenderScheduler::new());
        let waiter = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.due().await })
        };
        tokio::task::yield_now().await;
        scheduler.schedule();
        waiter.await.unwrap();
    }
}
