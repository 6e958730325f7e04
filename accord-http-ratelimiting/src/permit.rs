//! Admission result handed to the HTTP layer.

use crate::{bucket::Bucket, request::Path};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Proof that a request has been admitted under its bucket's budget.
///
/// Obtained from [`Ratelimiter::acquire`]. The holder performs the HTTP
/// exchange and then hands the permit back to [`Ratelimiter::update`]
/// together with the response's rate-limit headers. Dropping the permit
/// without an update is safe: an inaugural (probe) permit releases the
/// bucket so other callers can probe again, and a claimed slot is simply
/// spent.
///
/// [`Ratelimiter::acquire`]: crate::Ratelimiter::acquire
/// [`Ratelimiter::update`]: crate::Ratelimiter::update
#[derive(Debug)]
pub struct Permit {
    pub(crate) bucket: Arc<Bucket>,
    pub(crate) path: Path,
    pub(crate) probe: Option<ProbeGuard>,
}

impl Permit {
    pub(crate) fn claimed(bucket: Arc<Bucket>, path: Path) -> Self {
        Self {
            bucket,
            path,
            probe: None,
        }
    }

    pub(crate) fn probe(bucket: Arc<Bucket>, path: Path, tx: oneshot::Sender<()>) -> Self {
        Self {
            bucket: Arc::clone(&bucket),
            path,
            probe: Some(ProbeGuard {
                bucket,
                tx: Some(tx),
            }),
        }
    }

    /// Whether this permit belongs to the bucket's inaugural request.
    pub fn is_probe(&self) -> bool {
        self.probe.is_some()
    }

    /// Path the permit was issued for.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Releases a bucket's probe state when the inaugural request finishes.
///
/// The probe handle is cleared from the bucket *before* waiters are woken,
/// so a woken waiter always re-resolves a bucket that has left the probing
/// state. Running this from `Drop` means a cancelled or panicked inaugural
/// sender cannot strand the bucket's waiters.
#[derive(Debug)]
pub(crate) struct ProbeGuard {
    bucket: Arc<Bucket>,
    tx: Option<oneshot::Sender<()>>,
}

impl Drop for ProbeGuard {
    fn drop(&mut self) {
        self.bucket.clear_probe();

        if let Some(tx) = self.tx.take() {
            let _result = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Permit;
    use static_assertions::assert_impl_all;
    use std::fmt::Debug;

    assert_impl_all!(Permit: Debug, Send, Sync);
}
