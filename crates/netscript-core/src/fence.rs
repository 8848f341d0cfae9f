//! Request fencing for overlapping async actions.
//!
//! Each logical action takes a token when it starts; when its result comes
//! back it is applied only if no newer action has started since.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one started action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic token source.
#[derive(Debug, Default)]
pub struct RequestFence {
    latest: AtomicU64,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new action, superseding all earlier ones.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` belongs to the most recently started action.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
