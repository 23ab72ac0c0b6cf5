//! Counting permit pool
//!
//! A thin wrapper over `tokio::sync::Semaphore` used wherever the scanner needs
//! to bound a count: in-flight analysis workers (waiting acquisition) and
//! candidates buffered per image (non-waiting reservation).

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Fixed-size pool of permits
#[derive(Debug, Clone)]
pub struct PermitPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl PermitPool {
    /// Create a pool holding `capacity` permits
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Total number of permits the pool was created with
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a permit. The permit returns to the pool when dropped.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        Arc::clone(&self.semaphore).acquire_owned().await
    }

    /// Take a permit without waiting and never give it back.
    ///
    /// Returns false once the pool is exhausted.
    pub fn try_reserve(&self) -> bool {
        match self.semaphore.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }
}
