//! Per-object atomic-operation lock.
//!
//! This module provides [`AtomicLock`], held across every exchange of a
//! multi-step service (atomic file read/write) so the whole sequence looks
//! indivisible to concurrent operations on the same object.
//!
//! # Overview
//!
//! - **Exclusive** across threads: a second operation waits, up to a timeout.
//! - **Re-entrant** on the owning thread: property reads and writes made while
//!   the operation already holds the lock do not deadlock.
//! - **Bounded**: acquisition never blocks longer than the given timeout and
//!   reports [`LockError::Timeout`] instead.
//!
//! # Example
//!
//! ```rust
//! use bacnet_objects::AtomicLock;
//! use std::time::Duration;
//!
//! let lock = AtomicLock::new();
//! let outer = lock.acquire(Duration::from_millis(100)).unwrap();
//! // Same thread: re-entry succeeds immediately.
//! let inner = lock.acquire(Duration::from_millis(100)).unwrap();
//! drop(inner);
//! drop(outer);
//! assert!(!lock.is_locked());
//! ```

use std::time::{Duration, Instant};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, trace, warn};

use crate::LockError;

/// Default bound on waiting for an object's atomic lock.
///
/// Same as the default APDU timeout.
pub const DEFAULT_ATOMIC_TIMEOUT: Duration = Duration::from_secs(6);

/// Lock settings for an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomicConfig {
    /// How long an operation waits for the lock before reporting contention.
    pub timeout: Duration,
}

impl AtomicConfig {
    /// Default settings.
    pub const DEFAULT: Self = Self {
        timeout: DEFAULT_ATOMIC_TIMEOUT,
    };

    /// Replace the timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for AtomicConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Exclusive, re-entrant lock owned by exactly one object.
#[derive(Debug, Default)]
pub struct AtomicLock {
    mutex: ReentrantMutex<()>,
}

impl AtomicLock {
    /// Create an unlocked lock.
    pub fn new() -> Self {
        Self {
            mutex: ReentrantMutex::new(()),
        }
    }

    /// Acquire the lock, waiting at most `timeout`.
    ///
    /// Succeeds immediately if the current thread already holds it. The lock
    /// is released when the returned guard (and every nested guard) drops.
    ///
    /// # Errors
    ///
    /// [`LockError::Timeout`] if another thread held the lock for the whole
    /// wait. Nothing is held in that case.
    pub fn acquire(&self, timeout: Duration) -> Result<AtomicGuard<'_>, LockError> {
        let started = Instant::now();
        match self.mutex.try_lock_for(timeout) {
            Some(guard) => {
                trace!(waited = ?started.elapsed(), "atomic lock acquired");
                Ok(AtomicGuard {
                    _guard: guard,
                    acquired_at: Instant::now(),
                })
            }
            None => {
                let waited = started.elapsed();
                warn!(?waited, "atomic lock contention");
                Err(LockError::Timeout { waited })
            }
        }
    }

    /// Acquire the lock only if it is free or already held by this thread.
    pub fn try_acquire(&self) -> Option<AtomicGuard<'_>> {
        self.mutex.try_lock().map(|guard| AtomicGuard {
            _guard: guard,
            acquired_at: Instant::now(),
        })
    }

    /// Returns `true` if any thread holds the lock.
    pub fn is_locked(&self) -> bool {
        self.mutex.is_locked()
    }

    /// Returns `true` if the current thread holds the lock.
    pub fn is_owned_by_current_thread(&self) -> bool {
        self.mutex.is_owned_by_current_thread()
    }
}

/// Proof of holding an [`AtomicLock`]. Releases on drop.
///
/// Tied to the acquiring thread; it cannot be sent elsewhere.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct AtomicGuard<'a> {
    _guard: ReentrantMutexGuard<'a, ()>,
    acquired_at: Instant,
}

impl AtomicGuard<'_> {
    /// How long this guard has been held.
    pub fn held_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }
}

impl std::fmt::Debug for AtomicGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicGuard")
            .field("held_for", &self.held_for())
            .finish()
    }
}

impl Drop for AtomicGuard<'_> {
    fn drop(&mut self) {
        debug!(held_for = ?self.held_for(), "atomic lock released");
    }
}
