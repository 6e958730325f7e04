//! Rate limiter for the accord REST client.
//!
//! The server hands out budgets per *bucket*, a group of endpoints sharing
//! one window of allowed requests. Buckets are discovered, not configured:
//! a route's budget is unknown until its first response reveals the
//! `x-ratelimit-*` headers, and two routes may turn out to share one bucket.
//!
//! The [`Ratelimiter`] keeps two indices: route template to bucket, and
//! server-assigned bucket identifier to bucket. [`acquire`] is the pre-flight
//! admission protocol; it serializes the first (inaugural) request of an
//! unknown bucket so the window is discovered by exactly one probe, and it
//! makes every later caller either claim a slot or sleep until the window
//! refreshes. [`update`] reconciles a response's headers back into the
//! indices, collapsing routes that share a server identifier onto a single
//! bucket.
//!
//! The admission a caller receives is a [`Permit`]; the caller performs the
//! HTTP exchange itself and returns the permit together with the parsed
//! [`RatelimitHeaders`]. Cancellation is plain future cancellation: dropping
//! an in-progress `acquire` abandons the wait, and dropping a `Permit` wakes
//! any probe waiters without recording anything.
//!
//! [`acquire`]: Ratelimiter::acquire
//! [`update`]: Ratelimiter::update

pub mod headers;
pub mod request;

mod bucket;
mod permit;

pub use self::{
    bucket::Bucket,
    headers::RatelimitHeaders,
    permit::Permit,
    request::{Method, Path},
};

use self::bucket::Admission;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::SystemTime,
};
use tokio::time;

/// Pre-flight admission and header reconciliation over dynamically
/// discovered rate-limit buckets.
///
/// One ratelimiter is shared by every request a client issues. See the
/// [crate documentation] for the protocol.
///
/// [crate documentation]: crate
#[derive(Debug, Default)]
pub struct Ratelimiter {
    /// Index of route template to bucket.
    routes: Mutex<HashMap<Path, Arc<Bucket>>>,
    /// Index of server-assigned bucket identifier to bucket; populated only
    /// once a response has carried the identifier header.
    buckets: Mutex<HashMap<Box<str>, Arc<Bucket>>>,
}

impl Ratelimiter {
    /// Create a new ratelimiter with empty indices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one request for the given path, waiting as long as the path's
    /// budget requires.
    ///
    /// Returns once the request may be sent. The returned [`Permit`] must be
    /// given back via [`update`] once the response's headers are available;
    /// on a transport failure, dropping it is enough.
    ///
    /// [`update`]: Self::update
    pub async fn acquire(&self, path: Path) -> Permit {
        loop {
            let bucket = self.get_or_create(&path);

            match bucket.admit() {
                Admission::Claimed => {
                    tracing::debug!(%path, "slot claimed");

                    return Permit::claimed(bucket, path);
                }
                Admission::Probe(tx) => {
                    tracing::debug!(%path, "bucket unknown, sending inaugural request");

                    return Permit::probe(bucket, path, tx);
                }
                Admission::Superseded => {
                    tracing::debug!(%path, "bucket superseded, re-resolving");
                }
                Admission::WaitProbe(handle) => {
                    tracing::debug!(%path, "waiting for inaugural request");

                    handle.await;
                }
                Admission::WaitReset(reset) => {
                    let wait = reset
                        .duration_since(SystemTime::now())
                        .unwrap_or_default();

                    tracing::debug!(%path, ?wait, "budget exhausted, waiting for refresh");

                    time::sleep(wait).await;
                }
            }
        }
    }

    /// Reconcile a response's rate-limit headers into the indices.
    ///
    /// Pass `None` when the exchange failed before producing headers; the
    /// permit is then released without recording anything.
    ///
    /// When the identifier header reveals that the permit's route shares a
    /// bucket with another route, the route index is repointed at the
    /// existing bucket, the route's former bucket is terminally marked
    /// duplicate, and the remaining header values apply to the shared
    /// bucket.
    pub fn update(&self, permit: Permit, headers: Option<&RatelimitHeaders>) {
        let Permit {
            bucket,
            path,
            probe,
        } = permit;

        let mut effective = Arc::clone(&bucket);

        if let Some(headers) = headers {
            if let Some(id) = headers.bucket() {
                if let Some(existing) = self.register(id, &bucket) {
                    tracing::debug!(%path, id, "route shares a bucket, collapsing");

                    self.routes
                        .lock()
                        .expect("route index poisoned")
                        .insert(path.clone(), Arc::clone(&existing));
                    bucket.mark_duplicate();

                    effective = existing;
                }
            }

            effective.reconcile(headers.limit(), headers.remaining(), headers.reset());
        }

        // Dropped last: waiters woken by the guard must observe the
        // reconciled state when they re-resolve.
        drop(probe);
    }

    /// Bucket currently serving a path, if any.
    pub fn bucket(&self, path: &Path) -> Option<Arc<Bucket>> {
        self.routes
            .lock()
            .expect("route index poisoned")
            .get(path)
            .map(Arc::clone)
    }

    fn get_or_create(&self, path: &Path) -> Arc<Bucket> {
        let mut routes = self.routes.lock().expect("route index poisoned");

        if let Some(bucket) = routes.get(path) {
            Arc::clone(bucket)
        } else {
            let bucket = Arc::new(Bucket::new());
            routes.insert(path.clone(), Arc::clone(&bucket));

            bucket
        }
    }

    /// Register a bucket under a server identifier, returning the existing
    /// bucket instead if the identifier already maps to a different one.
    fn register(&self, id: &str, bucket: &Arc<Bucket>) -> Option<Arc<Bucket>> {
        let mut buckets = self.buckets.lock().expect("bucket index poisoned");

        match buckets.get(id) {
            Some(existing) if Arc::ptr_eq(existing, bucket) => None,
            Some(existing) => Some(Arc::clone(existing)),
            None => {
                buckets.insert(id.into(), Arc::clone(bucket));

                None
            }
        }
    }
}
