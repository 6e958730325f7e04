//! Keepalive contract with the gateway.
//!
//! After the hello payload advertises an interval, a heartbeat must be
//! emitted every interval, and every heartbeat must be acknowledged before
//! the next one fires. A missing acknowledgement means the connection is
//! dead in one direction, so the session is closed with a protocol-error
//! status and the caller is asked to reconnect.

use crate::{
    queue::SendQueue,
    session::Session,
    shard::CloseIntent,
};
use accord_model::gateway::payload::outgoing::Heartbeat;
use std::{
    borrow::Cow,
    sync::Arc,
    time::Duration,
};
use tokio::{
    sync::mpsc::UnboundedSender,
    time::{self, Instant},
};
use tokio_tungstenite::tungstenite::{
    protocol::{frame::coding::CloseCode, CloseFrame},
    Message,
};

/// Statistics about the latency of a session, useful for debugging.
///
/// Tracks the delay between each heartbeat and its acknowledgement. May be
/// obtained via [`Shard::latency`].
///
/// [`Shard::latency`]: crate::Shard::latency
#[derive(Clone, Debug)]
pub struct Latency {
    heartbeats: u32,
    received: Option<Instant>,
    sent: Option<Instant>,
    total: Duration,
}

impl Latency {
    pub(crate) const fn new() -> Self {
        Self {
            heartbeats: 0,
            received: None,
            sent: None,
            total: Duration::ZERO,
        }
    }

    /// Mean time between sending a heartbeat and receiving its
    /// acknowledgement, over the life of the session.
    ///
    /// `None` until the first acknowledgement arrives.
    pub fn average(&self) -> Option<Duration> {
        self.total.checked_div(self.heartbeats)
    }

    /// Number of acknowledged heartbeats this session.
    pub const fn heartbeats(&self) -> u32 {
        self.heartbeats
    }

    /// When the most recent acknowledgement arrived.
    pub const fn received(&self) -> Option<Instant> {
        self.received
    }

    /// When the most recent heartbeat was emitted.
    pub const fn sent(&self) -> Option<Instant> {
        self.sent
    }

    pub(crate) fn track_sent(&mut self) {
        self.received = None;
        self.sent = Some(Instant::now());
    }

    pub(crate) fn track_received(&mut self) {
        let now = Instant::now();
        self.received = Some(now);

        if let Some(sent) = self.sent {
            self.total += now.saturating_duration_since(sent);
            self.heartbeats += 1;
        }
    }
}

/// Task emitting a heartbeat every interval and policing acknowledgements.
///
/// Heartbeats jump the send queue so backlogged normal traffic can never
/// starve the keepalive. The acknowledgement latch lives on the session; it
/// is set here on emission and cleared by the receive loop on
/// acknowledgement (or on a handshake restart).
pub(crate) struct Heartbeater {
    disconnect: UnboundedSender<CloseIntent>,
    interval: Duration,
    queue: Arc<SendQueue>,
    session: Arc<Session>,
}

impl Heartbeater {
    pub fn new(
        disconnect: UnboundedSender<CloseIntent>,
        interval_ms: u64,
        queue: Arc<SendQueue>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            disconnect,
            interval: Duration::from_millis(interval_ms),
            queue,
            session,
        }
    }

    pub async fn run(self) {
        tracing::debug!(interval = ?self.interval, "starting heartbeater");

        let mut timer = time::interval_at(Instant::now() + self.interval, self.interval);

        loop {
            timer.tick().await;

            if self.session.is_waiting_for_ack() {
                tracing::warn!("heartbeat not acknowledged within an interval, disconnecting");

                let frame = CloseFrame {
                    code: CloseCode::Protocol,
                    reason: Cow::Borrowed("heartbeat acknowledgement timed out"),
                };
                let _result = self.disconnect.send(CloseIntent::Reconnect(frame));

                break;
            }

            let heartbeat = Heartbeat::new(self.session.seq());
            let json = match serde_json::to_string(&heartbeat) {
                Ok(json) => json,
                Err(source) => {
                    tracing::error!("failed to serialize heartbeat: {source}");

                    break;
                }
            };

            if !self.queue.push_front(Message::Text(json)) {
                // Queue torn down mid-flight; the session is ending anyway.
                break;
            }

            self.session.track_heartbeat_sent();
        }

        tracing::debug!("heartbeater exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::{Heartbeater, Latency};
    use crate::{queue::SendQueue, session::Session, shard::CloseIntent};
    use static_assertions::assert_impl_all;
    use std::{fmt::Debug, sync::Arc, time::Duration};
    use tokio::{sync::mpsc, time};
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

    assert_impl_all!(Latency: Clone, Debug, Send, Sync);

    #[test]
    fn latency_tracking() {
        let mut latency = Latency::new();
        assert_eq!(latency.heartbeats(), 0);
        assert!(latency.average().is_none());
        assert!(latency.sent().is_none());
        assert!(latency.received().is_none());

        latency.track_sent();
        assert!(latency.sent().is_some());
        assert!(latency.received().is_none());

        latency.track_received();
        assert_eq!(latency.heartbeats(), 1);
        assert!(latency.received().is_some());
        assert!(latency.average().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeats_fire_every_interval_when_acknowledged() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let queue = Arc::new(SendQueue::new());
        let session = Arc::new(Session::new());
        session.set_seq(12);

        let handle = tokio::spawn(
            Heartbeater::new(tx, 1_000, Arc::clone(&queue), Arc::clone(&session)).run(),
        );

        time::sleep(Duration::from_millis(1_100)).await;
        assert!(session.is_waiting_for_ack());

        // The frame carries the latest sequence and jumped the queue.
        session.track_heartbeat_acked();

        time::sleep(Duration::from_millis(1_000)).await;
        assert!(session.is_waiting_for_ack());
        assert!(rx.try_recv().is_err());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn missed_acknowledgement_requests_disconnect() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let queue = Arc::new(SendQueue::new());
        let session = Arc::new(Session::new());

        let handle = tokio::spawn(
            Heartbeater::new(tx, 1_000, Arc::clone(&queue), Arc::clone(&session)).run(),
        );

        // First fire at ~1000ms emits the heartbeat; no acknowledgement
        // arrives, so the fire at ~2000ms requests a disconnect.
        time::sleep(Duration::from_millis(2_100)).await;

        let intent = rx.try_recv().unwrap();
        let frame = match intent {
            CloseIntent::Reconnect(frame) => frame,
            CloseIntent::Shutdown(_) => panic!("expected a reconnecting close"),
        };
        assert_eq!(frame.code, CloseCode::Protocol);

        // The task wound itself down.
        handle.await.unwrap();
    }
}
