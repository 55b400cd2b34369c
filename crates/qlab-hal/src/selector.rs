//! Per-request backend selection.
//!
//! Picking a backend ("least busy operational device", "the local simulator")
//! is a time-varying decision owned by whoever runs the fleet. Callers ask a
//! [`BackendSelector`] for a fresh [`BackendHandle`] on every request; handles
//! are never cached across requests.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::error::HalResult;

/// A backend chosen for one request.
#[derive(Clone)]
pub struct BackendHandle {
    backend: Arc<dyn Backend>,
    queue_depth: Option<u32>,
}

impl BackendHandle {
    /// Wrap a backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            queue_depth: None,
        }
    }

    /// Record the queue depth observed at selection time.
    #[must_use]
    pub fn with_queue_depth(mut self, depth: u32) -> Self {
        self.queue_depth = Some(depth);
        self
    }

    /// The selected backend.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Shared pointer to the selected backend.
    pub fn shared(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// Backend name.
    pub fn name(&self) -> &str {
        self.backend.name()
    }

    /// Pending jobs on the backend when it was selected, if known.
    pub fn queue_depth(&self) -> Option<u32> {
        self.queue_depth
    }
}

impl fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendHandle")
            .field("backend", &self.backend.name())
            .field("queue_depth", &self.queue_depth)
            .finish()
    }
}

/// Chooses a backend for each request.
#[async_trait]
pub trait BackendSelector: Send + Sync {
    /// Short description used in logs (`"ibm-least-busy"`, `"simulator"`).
    fn describe(&self) -> &str;

    /// Select a backend for the current request.
    async fn select_backend(&self) -> HalResult<BackendHandle>;
}

/// Selector that always returns the same backend.
pub struct FixedSelector {
    backend: Arc<dyn Backend>,
}

impl FixedSelector {
    /// Always select `backend`.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl BackendSelector for FixedSelector {
    fn describe(&self) -> &str {
        self.backend.name()
    }

    async fn select_backend(&self) -> HalResult<BackendHandle> {
        Ok(BackendHandle::new(Arc::clone(&self.backend)))
    }
}
