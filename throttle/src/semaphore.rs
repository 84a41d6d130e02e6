use std::sync::atomic::{AtomicBool, Ordering};

/// Token bucket backed by a tokio semaphore; a no-op until `setup` is called with a non-zero
/// capacity.
pub struct Semaphore {
    enabled: AtomicBool,
    sem: tokio::sync::Semaphore,
}

impl Semaphore {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            sem: tokio::sync::Semaphore::const_new(0),
        }
    }

    pub fn setup(&self, capacity: usize) {
        self.enabled.store(capacity > 0, Ordering::Release);
        if capacity == 0 {
            return;
        }
        self.sem.forget_permits(self.sem.available_permits());
        self.sem.add_permits(capacity);
    }

    pub async fn consume(&self) {
        if !self.enabled.load(Ordering::Acquire) {
            return;
        }
        self.sem
            .acquire()
            .await
            .expect("throttle semaphore is never closed")
            .forget();
    }

    pub async fn run_replenish_thread(&self, replenish: usize, interval: std::time::Duration) {
        if !self.enabled.load(Ordering::Acquire) {
            return;
        }
        loop {
            tokio::time::sleep(interval).await;
            let available = self.sem.available_permits();
            if available < replenish {
                tracing::trace!("replenishing {} ops tokens", replenish - available);
                self.sem.add_permits(replenish - available);
            }
        }
    }
}
