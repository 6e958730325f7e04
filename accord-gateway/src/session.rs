//! Identity and keepalive state of one gateway session.

use crate::{heartbeat::Latency, stage::Stage};
use accord_model::id::{marker::UserMarker, Id};
use std::sync::{
    atomic::{AtomicBool, AtomicU8, Ordering},
    Mutex,
};

/// State that outlives any single connection.
///
/// The session identity (id, sequence, user) survives transport failures so
/// the next connection can resume, and is reset by a graceful close. The
/// heartbeat latch and latency are keepalive bookkeeping shared between the
/// receive loop and the heartbeat task.
#[derive(Debug)]
pub(crate) struct Session {
    id: Mutex<Option<Box<str>>>,
    latency: Mutex<Latency>,
    seq: Mutex<Option<u64>>,
    stage: AtomicU8,
    user_id: Mutex<Option<Id<UserMarker>>>,
    waiting_for_ack: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Mutex::new(None),
            latency: Mutex::new(Latency::new()),
            seq: Mutex::new(None),
            stage: AtomicU8::new(Stage::default() as u8),
            user_id: Mutex::new(None),
            waiting_for_ack: AtomicBool::new(false),
        }
    }

    /// ID of the session, if one has been established.
    pub fn id(&self) -> Option<Box<str>> {
        self.id.lock().expect("session id poisoned").clone()
    }

    pub fn set_id(&self, id: Box<str>) {
        self.id.lock().expect("session id poisoned").replace(id);
    }

    /// Most recently received sequence number.
    pub fn seq(&self) -> Option<u64> {
        *self.seq.lock().expect("session seq poisoned")
    }

    pub fn set_seq(&self, seq: u64) {
        self.seq.lock().expect("session seq poisoned").replace(seq);
    }

    /// ID of the bot user, once a READY payload has reported it.
    pub fn user_id(&self) -> Option<Id<UserMarker>> {
        *self.user_id.lock().expect("session user poisoned")
    }

    pub fn set_user_id(&self, user_id: Id<UserMarker>) {
        self.user_id
            .lock()
            .expect("session user poisoned")
            .replace(user_id);
    }

    /// Current stage of the session.
    pub fn stage(&self) -> Stage {
        Stage::try_from(self.stage.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_stage(&self, stage: Stage) {
        self.stage.store(stage as u8, Ordering::Release);
    }

    /// Atomically leave the disconnected stage, failing if another connect
    /// beat us to it.
    pub fn begin_connecting(&self, stage: Stage) -> bool {
        self.stage
            .compare_exchange(
                Stage::Disconnected as u8,
                stage as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Whether a heartbeat is awaiting acknowledgement.
    pub fn is_waiting_for_ack(&self) -> bool {
        self.waiting_for_ack.load(Ordering::Acquire)
    }

    /// Record that a heartbeat was emitted and now awaits acknowledgement.
    pub fn track_heartbeat_sent(&self) {
        self.waiting_for_ack.store(true, Ordering::Release);
        self.latency
            .lock()
            .expect("session latency poisoned")
            .track_sent();
    }

    /// Record an acknowledgement, clearing the latch.
    pub fn track_heartbeat_acked(&self) {
        self.waiting_for_ack.store(false, Ordering::Release);
        self.latency
            .lock()
            .expect("session latency poisoned")
            .track_received();
    }

    /// Clear the latch without latency bookkeeping; used when a handshake
    /// restarts the keepalive contract.
    pub fn clear_waiting_for_ack(&self) {
        self.waiting_for_ack.store(false, Ordering::Release);
    }

    /// Snapshot of the heartbeat latency statistics.
    pub fn latency(&self) -> Latency {
        self.latency
            .lock()
            .expect("session latency poisoned")
            .clone()
    }

    /// Forget the session identity; the next handshake will identify anew.
    pub fn reset_identity(&self) {
        self.id.lock().expect("session id poisoned").take();
        self.seq.lock().expect("session seq poisoned").take();
        self.user_id.lock().expect("session user poisoned").take();
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::stage::Stage;
    use accord_model::id::Id;
    use static_assertions::assert_impl_all;
    use std::fmt::Debug;

    assert_impl_all!(Session: Debug, Send, Sync);

    #[test]
    fn identity_reset() {
        let session = Session::new();
        session.set_id("abc".into());
        session.set_seq(5);
        session.set_user_id(Id::new(2));

        session.reset_identity();

        assert!(session.id().is_none());
        assert!(session.seq().is_none());
        assert!(session.user_id().is_none());
    }

    #[test]
    fn ack_latch() {
        let session = Session::new();
        assert!(!session.is_waiting_for_ack());

        session.track_heartbeat_sent();
        assert!(session.is_waiting_for_ack());

        session.track_heartbeat_acked();
        assert!(!session.is_waiting_for_ack());

        session.track_heartbeat_sent();
        session.clear_waiting_for_ack();
        assert!(!session.is_waiting_for_ack());
    }

    #[test]
    fn connecting_is_exclusive() {
        let session = Session::new();

        assert!(session.begin_connecting(Stage::Identifying));
        assert!(!session.begin_connecting(Stage::Identifying));

        session.set_stage(Stage::Disconnected);
        assert!(session.begin_connecting(Stage::Resuming));
        assert_eq!(session.stage(), Stage::Resuming);
    }
}
