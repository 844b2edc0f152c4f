//! Single-run gate for an orchestrator.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use reelsmith_core::AppError;

/// Proof that the holder owns the orchestrator's only run slot.
///
/// The slot is released when the lease is dropped.
#[derive(Debug)]
pub struct RunLease {
    gate: Arc<Semaphore>,
    _permit: OwnedSemaphorePermit,
}

impl RunLease {
    /// Take the slot without waiting
    pub(crate) fn try_acquire(gate: &Arc<Semaphore>) -> Result<Self, AppError> {
        let permit = Arc::clone(gate)
            .try_acquire_owned()
            .map_err(|_| AppError::RunInProgress)?;
        Ok(Self {
            gate: Arc::clone(gate),
            _permit: permit,
        })
    }

    pub(crate) fn is_for(&self, gate: &Arc<Semaphore>) -> bool {
        Arc::ptr_eq(&self.gate, gate)
    }
}
