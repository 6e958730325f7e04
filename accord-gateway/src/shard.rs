//! The gateway session manager.

use crate::{
    builder::ShardBuilder,
    config::Config,
    event::EventHandler,
    heartbeat::{Heartbeater, Latency},
    json::{self, GatewayFrame},
    queue::{SendPacer, SendQueue},
    session::Session,
    stage::Stage,
    url::gateway_url,
    GATEWAY_VERSION,
};
use accord_model::{
    gateway::{
        payload::{
            incoming::{Hello, Ready},
            outgoing::{Identify, IdentifyInfo, Resume},
        },
        CloseCode as GatewayCloseCode, Intents, OpCode,
    },
    id::{marker::UserMarker, Id},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use std::{
    borrow::Cow,
    error::Error as StdError,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex as MutexSync},
};
use tokio::{
    net::TcpStream,
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender},
        Mutex as AsyncMutex,
    },
    task::JoinHandle,
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        protocol::{frame::coding::CloseCode, CloseFrame},
        Message,
    },
    MaybeTlsStream, WebSocketStream,
};
use url::Url;

type ShardStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Starting a connection to the gateway failed.
#[derive(Debug)]
pub struct ConnectError {
    kind: ConnectErrorType,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ConnectError {
    /// Immutable reference to the type of error that occurred.
    #[must_use = "retrieving the type has no effect if left unused"]
    pub const fn kind(&self) -> &ConnectErrorType {
        &self.kind
    }

    /// Consume the error, returning the source error if there is any.
    #[must_use = "consuming the error and retrieving the source has no effect if left unused"]
    pub fn into_source(self) -> Option<Box<dyn StdError + Send + Sync>> {
        self.source
    }

    /// Consume the error, returning the owned error type and the source error.
    #[must_use = "consuming the error into its parts has no effect if left unused"]
    pub fn into_parts(self) -> (ConnectErrorType, Option<Box<dyn StdError + Send + Sync>>) {
        (self.kind, self.source)
    }
}

impl Display for ConnectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.kind {
            ConnectErrorType::AlreadyConnected => {
                f.write_str("shard is already connected; connect may not be re-entered")
            }
            ConnectErrorType::Establishing => f.write_str("establishing the connection failed"),
            ConnectErrorType::ParsingUrl { url } => {
                f.write_str("the gateway url ")?;
                f.write_str(url)?;

                f.write_str(" is invalid")
            }
        }
    }
}

impl StdError for ConnectError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn StdError + 'static))
    }
}

/// Type of [`ConnectError`] that occurred.
#[derive(Debug)]
#[non_exhaustive]
pub enum ConnectErrorType {
    /// A session is already running on this shard.
    AlreadyConnected,
    /// The websocket connection could not be established.
    Establishing,
    /// The configured or discovered gateway URL is not a valid URL.
    ParsingUrl {
        /// URL that could not be parsed.
        url: String,
    },
}

/// There is no active session to operate on.
///
/// Returned by [`Shard::shutdown`] when the shard is not connected.
#[derive(Debug)]
pub struct SessionInactiveError;

impl Display for SessionInactiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("the shard has no active session")
    }
}

impl StdError for SessionInactiveError {}

/// Why the session is being closed, and what the caller should do next.
pub(crate) enum CloseIntent {
    /// Close gracefully; the caller should reconnect.
    Reconnect(CloseFrame<'static>),
    /// Close gracefully and permanently.
    Shutdown(CloseFrame<'static>),
}

impl CloseIntent {
    const fn reconnect(&self) -> bool {
        matches!(self, Self::Reconnect(_))
    }

    fn into_frame(self) -> CloseFrame<'static> {
        match self {
            Self::Reconnect(frame) | Self::Shutdown(frame) => frame,
        }
    }
}

/// Everything that lives only as long as one websocket connection.
///
/// Dropping it aborts the pacer and heartbeater, refuses further outbound
/// frames, and returns the shard to the disconnected stage, so a cancelled
/// [`Shard::connect`] cannot leak tasks.
struct Connection {
    disconnect_rx: UnboundedReceiver<CloseIntent>,
    disconnect_slot: Arc<MutexSync<Option<UnboundedSender<CloseIntent>>>>,
    /// Kept so the channel cannot close while the session runs.
    disconnect_tx: UnboundedSender<CloseIntent>,
    /// Set once the receive loop has returned; a drop before then means
    /// the connect future was cancelled mid-session.
    finished: bool,
    heartbeater: Option<JoinHandle<()>>,
    pacer: JoinHandle<()>,
    queue: Arc<SendQueue>,
    session: Arc<Session>,
    sink: Arc<AsyncMutex<SplitSink<ShardStream, Message>>>,
    stream: SplitStream<ShardStream>,
}

impl Connection {
    /// Stop both timers and refuse further outbound frames.
    ///
    /// Closing the queue takes its lock, so no teardown can interleave with
    /// a dequeue decision.
    fn stop(&mut self) {
        self.queue.close();
        self.pacer.abort();

        if let Some(heartbeater) = self.heartbeater.take() {
            heartbeater.abort();
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.stop();

        // A drop before the receive loop returned is an abrupt disconnect:
        // the socket is disposed without a close frame and the session
        // identity does not survive. The completed paths decide identity
        // themselves; only transport failures keep it for resuming.
        if !self.finished {
            self.session.reset_identity();
        }

        self.disconnect_slot
            .lock()
            .expect("disconnect slot poisoned")
            .take();
        self.session.set_stage(Stage::Disconnected);
    }
}

/// Interface to a single session with the gateway.
///
/// One shard holds one session at a time. [`connect`] runs the session to
/// completion and reports whether the caller should reconnect; the session
/// identity survives transport failures, so reconnecting resumes rather
/// than replays.
///
/// [`connect`]: Self::connect
pub struct Shard {
    config: Config,
    disconnect: Arc<MutexSync<Option<UnboundedSender<CloseIntent>>>>,
    event_handler: Arc<dyn EventHandler>,
    session: Arc<Session>,
}

impl Shard {
    /// Create a new shard with the default configuration.
    pub fn new(token: String, intents: Intents, event_handler: Arc<dyn EventHandler>) -> Self {
        ShardBuilder::new(token, intents, event_handler).build()
    }

    /// Create a builder to configure a new shard.
    pub fn builder(
        token: String,
        intents: Intents,
        event_handler: Arc<dyn EventHandler>,
    ) -> ShardBuilder {
        ShardBuilder::new(token, intents, event_handler)
    }

    pub(crate) fn new_with_config(config: Config, event_handler: Arc<dyn EventHandler>) -> Self {
        Self {
            config,
            disconnect: Arc::new(MutexSync::new(None)),
            event_handler,
            session: Arc::new(Session::new()),
        }
    }

    /// Configuration of the shard.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Statistics about the heartbeat latency of the session.
    pub fn latency(&self) -> Latency {
        self.session.latency()
    }

    /// ID of the current session, if one has been established.
    pub fn session_id(&self) -> Option<Box<str>> {
        self.session.id()
    }

    /// Current stage of the session.
    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    /// ID of the bot user, once a session has reported it.
    pub fn user_id(&self) -> Option<Id<UserMarker>> {
        self.session.user_id()
    }

    /// Connect to the gateway and run the session until it ends.
    ///
    /// Returns `Ok(true)` when the session ended for a transient reason and
    /// the caller should connect again, and `Ok(false)` when it was shut
    /// down deliberately or the peer closed with a terminal close code.
    /// Dropping the returned future tears the connection down abruptly:
    /// the socket is disposed without a close frame and the session
    /// identity is reset.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`AlreadyConnected`] if a session is
    /// already running, of type [`ParsingUrl`] if the gateway URL is
    /// invalid, or of type [`Establishing`] if the websocket connection
    /// could not be opened.
    ///
    /// [`AlreadyConnected`]: ConnectErrorType::AlreadyConnected
    /// [`Establishing`]: ConnectErrorType::Establishing
    /// [`ParsingUrl`]: ConnectErrorType::ParsingUrl
    pub async fn connect(&self) -> Result<bool, ConnectError> {
        let next_stage = if self.session.id().is_some() {
            Stage::Resuming
        } else {
            Stage::Identifying
        };

        if !self.session.begin_connecting(next_stage) {
            return Err(ConnectError {
                kind: ConnectErrorType::AlreadyConnected,
                source: None,
            });
        }

        let base = match self.config.gateway_url() {
            Some(url) => url.to_owned(),
            None => gateway_url(&self.config.http).await.into_string(),
        };
        let request_url = format!("{base}/?v={GATEWAY_VERSION}&encoding=json");

        if let Err(source) = Url::parse(&request_url) {
            self.session.set_stage(Stage::Disconnected);

            return Err(ConnectError {
                kind: ConnectErrorType::ParsingUrl { url: request_url },
                source: Some(Box::new(source)),
            });
        }

        tracing::debug!(url = %request_url, "connecting to the gateway");

        let stream = match connect_async(request_url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(source) => {
                self.session.set_stage(Stage::Disconnected);

                return Err(ConnectError {
                    kind: ConnectErrorType::Establishing,
                    source: Some(Box::new(source)),
                });
            }
        };

        let (sink, stream) = stream.split();
        let sink = Arc::new(AsyncMutex::new(sink));
        let queue = Arc::new(SendQueue::new());
        let pacer = tokio::spawn(SendPacer::new(Arc::clone(&queue), Arc::clone(&sink)).run());

        let (disconnect_tx, disconnect_rx) = mpsc::unbounded_channel();
        self.disconnect
            .lock()
            .expect("disconnect slot poisoned")
            .replace(disconnect_tx.clone());

        let mut connection = Connection {
            disconnect_rx,
            disconnect_slot: Arc::clone(&self.disconnect),
            disconnect_tx,
            finished: false,
            heartbeater: None,
            pacer,
            queue,
            session: Arc::clone(&self.session),
            sink,
            stream,
        };

        let reconnect = self.run(&mut connection).await;
        connection.finished = true;

        Ok(reconnect)
    }

    /// Gracefully close the running session with a caller-specified status.
    ///
    /// The session will end with reconnect set to `false`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionInactiveError`] if no session is running.
    pub fn shutdown(&self, code: u16, reason: &str) -> Result<(), SessionInactiveError> {
        let guard = self.disconnect.lock().expect("disconnect slot poisoned");
        let sender = guard.as_ref().ok_or(SessionInactiveError)?;

        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: Cow::Owned(reason.to_owned()),
        };

        sender
            .send(CloseIntent::Shutdown(frame))
            .map_err(|_| SessionInactiveError)
    }

    /// Drive the receive loop to completion, returning whether the caller
    /// should reconnect.
    async fn run(&self, connection: &mut Connection) -> bool {
        loop {
            tokio::select! {
                frame = connection.stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(intent) = self.process(&text, connection) {
                            let reconnect = intent.reconnect();
                            self.close_session(connection, intent.into_frame()).await;

                            return reconnect;
                        }
                    }
                    // Non-text frames carry nothing for the session.
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!(?frame, "peer closed the connection");

                        let reconnect = resumable(frame.as_ref());

                        if !reconnect {
                            tracing::warn!("close code is terminal, not reconnecting");
                        }

                        connection.stop();

                        return reconnect;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(source)) => {
                        tracing::warn!("websocket error, session kept for resuming: {source}");
                        connection.stop();

                        return true;
                    }
                    None => {
                        tracing::debug!("websocket stream ended");
                        connection.stop();

                        return true;
                    }
                },
                intent = connection.disconnect_rx.recv() => {
                    // The connection holds a sender, so the channel cannot
                    // close while this loop runs.
                    if let Some(intent) = intent {
                        let reconnect = intent.reconnect();
                        self.close_session(connection, intent.into_frame()).await;

                        return reconnect;
                    }
                }
            }
        }
    }

    /// Consume one inbound text frame, returning a close intent if the
    /// session must end.
    fn process(&self, text: &str, connection: &mut Connection) -> Option<CloseIntent> {
        let frame = match json::parse(text) {
            Ok(frame) => frame,
            Err(source) => {
                tracing::debug!("skipping unparseable frame: {source}");

                return None;
            }
        };

        if let Some(seq) = frame.s {
            self.session.set_seq(seq);
        }

        match frame.op {
            OpCode::Dispatch => self.handle_dispatch(&frame),
            OpCode::Hello => self.handle_hello(&frame, connection),
            OpCode::HeartbeatAck => {
                tracing::trace!("heartbeat acknowledged");

                self.session.track_heartbeat_acked();
            }
            OpCode::Reconnect => {
                tracing::debug!("server requested a reconnect");

                return Some(CloseIntent::Reconnect(CloseFrame {
                    code: CloseCode::Normal,
                    reason: Cow::Borrowed("server requested a reconnect"),
                }));
            }
            other => tracing::trace!(op = ?other, "ignoring opcode"),
        }

        None
    }

    fn handle_dispatch(&self, frame: &GatewayFrame<'_>) {
        let name = match frame.t.as_deref() {
            Some(name) => name,
            None => {
                tracing::warn!("dispatch frame without an event name");

                return;
            }
        };

        let data = match frame.d {
            Some(data) => data,
            None => {
                tracing::warn!(event = name, "dispatch frame without a payload");

                return;
            }
        };

        match name {
            "READY" => match serde_json::from_str::<Ready>(data.get()) {
                Ok(ready) => {
                    tracing::debug!(session_id = %ready.session_id, "session established");

                    self.session.set_id(ready.session_id.into_boxed_str());
                    self.session.set_user_id(ready.user.id);
                    self.session.set_stage(Stage::Connected);
                }
                Err(source) => {
                    tracing::error!("ready payload is missing session identity: {source}");
                }
            },
            "RESUMED" => {
                tracing::debug!("session resumed");

                self.session.set_stage(Stage::Connected);
            }
            _ => {}
        }

        // User code must not be able to take the session down; the payload
        // reference is valid for exactly this call.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.event_handler.handle_event(name, data);
        }));

        if result.is_err() {
            tracing::error!(event = name, "event handler panicked");
        }
    }

    fn handle_hello(&self, frame: &GatewayFrame<'_>, connection: &mut Connection) {
        let data = match frame.d {
            Some(data) => data,
            None => {
                tracing::warn!("hello frame without a payload");

                return;
            }
        };

        let hello = match serde_json::from_str::<Hello>(data.get()) {
            Ok(hello) => hello,
            Err(source) => {
                tracing::error!("hello payload is missing the heartbeat interval: {source}");

                return;
            }
        };

        tracing::debug!(
            heartbeat_interval = hello.heartbeat_interval,
            "received hello",
        );

        // The keepalive contract restarts with each handshake.
        self.session.clear_waiting_for_ack();

        let heartbeater = Heartbeater::new(
            connection.disconnect_tx.clone(),
            hello.heartbeat_interval,
            Arc::clone(&connection.queue),
            Arc::clone(&self.session),
        );

        if let Some(old) = connection.heartbeater.replace(tokio::spawn(heartbeater.run())) {
            old.abort();
        }

        match self.handshake_payload() {
            Ok(payload) => {
                if !connection.queue.push_back(Message::Text(payload)) {
                    tracing::debug!("send queue closed before the handshake was queued");
                }
            }
            Err(source) => tracing::error!("failed to serialize the handshake: {source}"),
        }
    }

    /// Build the identify or resume payload, depending on whether a session
    /// identity is held.
    fn handshake_payload(&self) -> Result<String, serde_json::Error> {
        if let Some(session_id) = self.session.id() {
            let seq = self.session.seq().unwrap_or_default();

            serde_json::to_string(&Resume::new(seq, session_id, self.config.token()))
        } else {
            serde_json::to_string(&Identify::new(IdentifyInfo {
                intents: self.config.intents(),
                properties: self.config.identify_properties().clone(),
                token: self.config.token().to_owned(),
            }))
        }
    }

    /// Gracefully close the connection: stop the timers, reset the session
    /// identity, and send the close frame.
    async fn close_session(&self, connection: &mut Connection, frame: CloseFrame<'static>) {
        tracing::debug!(code = %frame.code, reason = %frame.reason, "closing the session");

        connection.stop();
        self.session.reset_identity();

        let mut sink = connection.sink.lock().await;

        if let Err(source) = sink.send(Message::Close(Some(frame))).await {
            tracing::debug!("failed to send the close frame: {source}");
        }

        let _result = sink.close().await;
    }
}

impl Debug for Shard {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Shard")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Whether the session may be reconnected after a peer-sent close frame.
///
/// Codes the gateway defines as terminal (failed authentication, invalid or
/// disallowed intents, sharding faults) end the session for good; anything
/// else, including a missing frame or a transport-level code, is worth a
/// reconnect.
fn resumable(frame: Option<&CloseFrame<'_>>) -> bool {
    frame
        .and_then(|frame| GatewayCloseCode::try_from(u16::from(frame.code)).ok())
        .map_or(true, GatewayCloseCode::can_reconnect)
}

#[cfg(test)]
mod tests {
    use super::{resumable, ConnectError, ConnectErrorType, SessionInactiveError, Shard};
    use crate::event::EventHandler;
    use accord_model::{gateway::Intents, id::Id};
    use serde_json::value::RawValue;
    use static_assertions::assert_impl_all;
    use std::{
        borrow::Cow,
        error::Error,
        fmt::Debug,
        sync::{Arc, Mutex},
    };
    use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};

    assert_impl_all!(ConnectError: Error, Send, Sync);
    assert_impl_all!(ConnectErrorType: Debug, Send, Sync);
    assert_impl_all!(SessionInactiveError: Error, Send, Sync);
    assert_impl_all!(Shard: Debug, Send, Sync);

    struct Ignore;

    impl EventHandler for Ignore {
        fn handle_event(&self, _: &str, _: &RawValue) {}
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(String, String)>>,
    }

    impl EventHandler for Recorder {
        fn handle_event(&self, name: &str, data: &RawValue) {
            self.events
                .lock()
                .unwrap()
                .push((name.to_owned(), data.get().to_owned()));
        }
    }

    struct Panicker;

    impl EventHandler for Panicker {
        fn handle_event(&self, _: &str, _: &RawValue) {
            panic!("user code is broken");
        }
    }

    fn shard_with(handler: Arc<dyn EventHandler>) -> Shard {
        Shard::new("token".to_owned(), Intents::GUILDS, handler)
    }

    #[test]
    fn handshake_identifies_without_a_session() {
        let shard = shard_with(Arc::new(Ignore));

        let payload: serde_json::Value =
            serde_json::from_str(&shard.handshake_payload().unwrap()).unwrap();

        assert_eq!(payload["op"], 2);
        assert_eq!(payload["d"]["token"], "token");
        assert_eq!(payload["d"]["intents"], 1);
        assert!(payload["d"]["properties"]["os"].is_string());
    }

    #[test]
    fn handshake_resumes_with_a_session() {
        let shard = shard_with(Arc::new(Ignore));
        shard.session.set_id("deadbeef".into());
        shard.session.set_seq(42);

        let payload: serde_json::Value =
            serde_json::from_str(&shard.handshake_payload().unwrap()).unwrap();

        assert_eq!(payload["op"], 6);
        assert_eq!(payload["d"]["session_id"], "deadbeef");
        assert_eq!(payload["d"]["seq"], 42);
        assert_eq!(payload["d"]["token"], "token");
    }

    #[test]
    fn dispatch_forwards_name_and_payload() {
        let recorder = Arc::new(Recorder::default());
        let shard = shard_with(Arc::clone(&recorder) as Arc<dyn EventHandler>);

        let text = r#"{"op":0,"s":1,"t":"MESSAGE_CREATE","d":{"id":"5"}}"#;
        let frame = crate::json::parse(text).unwrap();
        shard.handle_dispatch(&frame);

        let events = recorder.events.lock().unwrap();
        assert_eq!(
            events.as_slice(),
            [("MESSAGE_CREATE".to_owned(), r#"{"id":"5"}"#.to_owned())],
        );
    }

    #[test]
    fn ready_stores_session_identity() {
        let shard = shard_with(Arc::new(Ignore));

        let text = r#"{"op":0,"s":1,"t":"READY","d":{"session_id":"abc","user":{"id":"9","username":"bot"}}}"#;
        let frame = crate::json::parse(text).unwrap();
        shard.handle_dispatch(&frame);

        assert_eq!(shard.session_id().as_deref(), Some("abc"));
        assert_eq!(shard.user_id(), Some(Id::new(9)));
    }

    #[test]
    fn panicking_handler_does_not_poison_the_session() {
        let shard = shard_with(Arc::new(Panicker));

        let text = r#"{"op":0,"t":"MESSAGE_CREATE","d":{}}"#;
        let frame = crate::json::parse(text).unwrap();

        // The panic is caught at the session boundary.
        shard.handle_dispatch(&frame);
        shard.handle_dispatch(&frame);
    }

    #[test]
    fn shutdown_without_a_session_errors() {
        let shard = shard_with(Arc::new(Ignore));

        assert!(shard.shutdown(1000, "going away").is_err());
    }

    #[test]
    fn peer_close_codes_decide_reconnectability() {
        fn frame(code: u16) -> CloseFrame<'static> {
            CloseFrame {
                code: CloseCode::from(code),
                reason: Cow::Borrowed(""),
            }
        }

        // No frame, transport-level codes, and unknown codes stay
        // resumable.
        assert!(resumable(None));
        assert!(resumable(Some(&frame(1000))));
        assert!(resumable(Some(&frame(4006))));

        // Transient gateway faults are resumable; terminal ones are not.
        assert!(resumable(Some(&frame(4000))));
        assert!(resumable(Some(&frame(4009))));
        assert!(!resumable(Some(&frame(4004))));
        assert!(!resumable(Some(&frame(4011))));
        assert!(!resumable(Some(&frame(4014))));
    }
}
