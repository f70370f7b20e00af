//! Cancellation tokens for directory scans.
//!
//! Starting a new scan invalidates the tokens of any scan that came before
//! it, so a superseded walk stops contributing work instead of racing the
//! fresh results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tracks the active scan version.
///
/// Each call to [`ScanGeneration::begin`] bumps the version and hands out a
/// token bound to it. Tokens from earlier versions report as cancelled.
#[derive(Debug, Default)]
pub struct ScanGeneration {
    active_version: Arc<AtomicU64>,
}

impl ScanGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new scan, cancelling any scan still holding an older token.
    pub fn begin(&self) -> ScanToken {
        let version = self.active_version.fetch_add(1, Ordering::SeqCst) + 1;
        ScanToken {
            active_version: Arc::clone(&self.active_version),
            version,
        }
    }

    /// Returns the current version without starting a scan.
    pub fn current_version(&self) -> u64 {
        self.active_version.load(Ordering::SeqCst)
    }
}

/// A cancellation token checked while walking directory trees.
#[derive(Debug, Clone)]
pub struct ScanToken {
    active_version: Arc<AtomicU64>,
    version: u64,
}

impl ScanToken {
    /// Creates a token that is never cancelled. Useful for one-shot scans
    /// and tests.
    pub fn noop() -> Self {
        Self {
            active_version: Arc::new(AtomicU64::new(0)),
            version: 0,
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.version != self.active_version.load(Ordering::Relaxed)
    }
}

impl Default for ScanToken {
    fn default() -> Self {
        Self::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_token_is_never_cancelled() {
        let token = ScanToken::noop();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn fresh_token_is_active() {
        let generation = ScanGeneration::new();
        let token = generation.begin();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn newer_scan_cancels_older_token() {
        let generation = ScanGeneration::new();
        let first = generation.begin();
        let second = generation.begin();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(generation.current_version(), 2);
    }
}
