//! Rate-limit state for one logical endpoint group.
//!
//! A bucket moves through three states:
//!
//! 1. *Expired*: no window is known (`reset` absent or in the past) and no
//!    inaugural request is in flight. The first caller to arrive installs a
//!    probe handle and becomes the inaugural sender.
//! 2. *Probing*: the probe handle is installed. Further callers wait on it
//!    rather than claiming a slot, so only one request discovers the window.
//! 3. *Active*: `reset` is in the future. Callers claim slots by decrementing
//!    `remaining` under the bucket lock, or sleep until `reset` when the
//!    window is exhausted.
//!
//! All transitions happen atomically under the bucket's own mutex. A bucket
//! that has been superseded by another (the server revealed a shared bucket
//! identifier) is terminally marked duplicate and callers must re-resolve.

use futures_util::{
    future::{BoxFuture, Shared},
    FutureExt,
};
use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Mutex, MutexGuard},
    time::SystemTime,
};
use tokio::sync::oneshot;

/// Completion handle for a bucket's in-flight inaugural request.
///
/// Cloning the handle does not steal the result from other waiters; every
/// clone resolves once the probe finishes, successfully or not.
pub(crate) type ProbeHandle = Shared<BoxFuture<'static, ()>>;

/// Decision reached for one admission attempt.
pub(crate) enum Admission {
    /// A slot was claimed under the lock; the request may be sent.
    Claimed,
    /// The bucket was expired; the caller is now the inaugural sender and
    /// must signal the returned sender (or drop it) once the response's
    /// headers have been reconciled.
    Probe(oneshot::Sender<()>),
    /// The bucket was superseded; re-resolve it through the route index.
    Superseded,
    /// Another caller is probing; wait for its completion, then retry.
    WaitProbe(ProbeHandle),
    /// The window is exhausted; sleep until it refreshes, then retry.
    WaitReset(SystemTime),
}

/// Rate-limit budget for one logical endpoint group.
pub struct Bucket {
    inner: Mutex<BucketInner>,
}

struct BucketInner {
    duplicate: bool,
    limit: Option<u64>,
    probe: Option<ProbeHandle>,
    remaining: u64,
    reset: Option<SystemTime>,
}

impl Bucket {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(BucketInner {
                duplicate: false,
                limit: None,
                probe: None,
                remaining: 0,
                reset: None,
            }),
        }
    }

    /// Advertised capacity of the window, if a response has revealed it.
    pub fn limit(&self) -> Option<u64> {
        self.lock().limit
    }

    /// Slots left in the current window.
    pub fn remaining(&self) -> u64 {
        self.lock().remaining
    }

    /// Wall-clock instant at which the window refreshes, if known.
    pub fn reset(&self) -> Option<SystemTime> {
        self.lock().reset
    }

    /// Whether the bucket has been superseded by another sharing its
    /// server-assigned identifier.
    pub fn is_duplicate(&self) -> bool {
        self.lock().duplicate
    }

    /// Decide what one caller must do, transitioning state atomically.
    pub(crate) fn admit(&self) -> Admission {
        let mut inner = self.lock();

        if inner.duplicate {
            return Admission::Superseded;
        }

        let now = SystemTime::now();

        match inner.reset {
            Some(reset) if reset > now => {
                if inner.remaining > 0 {
                    inner.remaining -= 1;

                    Admission::Claimed
                } else {
                    Admission::WaitReset(reset)
                }
            }
            _ => {
                if let Some(probe) = &inner.probe {
                    Admission::WaitProbe(probe.clone())
                } else {
                    let (tx, rx) = oneshot::channel();

                    // A dropped sender resolves the receiver too; waiters
                    // never distinguish the two outcomes.
                    inner.probe = Some(rx.map(|_| ()).boxed().shared());

                    Admission::Probe(tx)
                }
            }
        }
    }

    /// Clear the probe handle so waiters re-resolve the bucket.
    pub(crate) fn clear_probe(&self) {
        self.lock().probe = None;
    }

    /// Terminally mark the bucket as superseded.
    pub(crate) fn mark_duplicate(&self) {
        self.lock().duplicate = true;
    }

    /// Reconcile response header values into the bucket.
    ///
    /// `remaining` may only be lowered while a window is active and `reset`
    /// may never move backwards, so reordered responses cannot make the
    /// budget more optimistic than the server's latest word.
    pub(crate) fn reconcile(
        &self,
        limit: Option<u64>,
        remaining: Option<u64>,
        reset: Option<SystemTime>,
    ) {
        let mut inner = self.lock();

        // A superseded bucket never receives updates again.
        if inner.duplicate {
            return;
        }

        if let Some(limit) = limit {
            inner.limit = Some(limit);
        }

        if let Some(remaining) = remaining {
            let active = matches!(inner.reset, Some(reset) if reset > SystemTime::now());

            if !active || remaining < inner.remaining {
                inner.remaining = remaining;
            }
        }

        if let Some(reset) = reset {
            if inner.reset.map_or(true, |current| reset > current) {
                inner.reset = Some(reset);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, BucketInner> {
        self.inner.lock().expect("bucket poisoned")
    }
}

impl Debug for Bucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let inner = self.lock();

        f.debug_struct("Bucket")
            .field("duplicate", &inner.duplicate)
            .field("limit", &inner.limit)
            .field("probing", &inner.probe.is_some())
            .field("remaining", &inner.remaining)
            .field("reset", &inner.reset)
            .finish()
    }
}
