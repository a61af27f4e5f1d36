//! Single-flight lazy cache for a remote identifier.
//!
//! The first caller runs the initializer while holding the lock; callers
//! arriving meanwhile wait and then read the stored id instead of starting
//! their own attempt. A failed (or dropped) initialization leaves the slot
//! empty, so the next caller tries again.
//!
//! A copy of the id is published under a separate `RwLock` so readers that
//! must not wait (health checks) never contend with the init lock.

use std::future::Future;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use rd_domain::error::Result;

#[derive(Default)]
pub struct LazyId {
    slot: Mutex<Option<String>>,
    /// Mirrors `slot`; written only while `slot` is locked.
    published: RwLock<Option<String>>,
}

impl LazyId {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(id) = slot.as_ref() {
            return Ok(id.clone());
        }
        let id = init().await?;
        *slot = Some(id.clone());
        *self.published.write() = Some(id.clone());
        Ok(id)
    }

    /// The cached id, if set. Never waits on a running initializer.
    pub fn peek(&self) -> Option<String> {
        self.published.read().clone()
    }

    /// Forget the cached id; returns what was stored.
    pub async fn invalidate(&self) -> Option<String> {
        let mut slot = self.slot.lock().await;
        self.published.write().take();
        slot.take()
    }
}
