// src/exec/slots.rs

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::Semaphore;
use tracing::trace;

use crate::errors::{Error, JobdagError, Result};

/// Fixed pool of numbered execution slots `0..capacity`.
///
/// This is the only concurrency limiter: a job runs only while holding a
/// slot. The semaphore does the waiting; the free set decides which index is
/// handed out, always the lowest one available.
#[derive(Debug)]
pub struct Slots {
    capacity: usize,
    permits: Semaphore,
    free: Mutex<BTreeSet<usize>>,
}

impl Slots {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(JobdagError::ConfigError(
                "slot capacity must be >= 1 (got 0)".to_string(),
            ));
        }

        Ok(Self {
            capacity,
            permits: Semaphore::new(capacity),
            free: Mutex::new((0..capacity).collect()),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots that could be acquired right now without waiting.
    pub fn available_count(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait until a slot is free and take the lowest free index.
    pub async fn acquire(&self) -> Result<usize> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| Error::from(e).context("slot semaphore closed"))?;
        permit.forget();
        self.take_lowest()
    }

    /// Take a slot if one is free, without waiting.
    pub fn try_acquire(&self) -> Option<usize> {
        let permit = self.permits.try_acquire().ok()?;
        permit.forget();
        self.take_lowest().ok()
    }

    /// Return a slot to the free set.
    ///
    /// Releasing an index that is not currently held is an internal error.
    pub fn release(&self, index: usize) -> Result<()> {
        let mut free = self.free_set();
        if index >= self.capacity || !free.insert(index) {
            return Err(JobdagError::SlotNotHeld { slot: index });
        }
        drop(free);

        self.permits.add_permits(1);
        trace!(slot = index, "slot released");
        Ok(())
    }

    fn take_lowest(&self) -> Result<usize> {
        let slot = self
            .free_set()
            .pop_first()
            .ok_or_else(|| Error::msg("slot permit granted but no free index left"))?;
        trace!(slot, "slot acquired");
        Ok(slot)
    }

    fn free_set(&self) -> MutexGuard<'_, BTreeSet<usize>> {
        // Every update is a single insert or pop, so a poisoned set is still consistent.
        self.free.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
