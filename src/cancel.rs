//! Cooperative cancellation for edit sessions
//!
//! One token is created per workflow open. Every async continuation checks
//! it before writing state; a cancelled token turns those writes into no-ops.
//! In-flight calls are never aborted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared liveness flag for one edit session
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session torn down; all clones observe it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_fresh_token_is_live() {
        let old = CancellationToken::new();
        old.cancel();
        assert!(!CancellationToken::new().is_cancelled());
    }
}
