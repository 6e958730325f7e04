//! Outbound frame queue and the task that paces it.
//!
//! The gateway enforces its own budget on how fast a session may send, so
//! outbound frames are queued and released one per fixed interval rather
//! than written as they are produced. Normal traffic is strictly FIFO;
//! heartbeats are enqueued at the head so a backlog can never delay the
//! keepalive contract.

use futures_util::{Sink, SinkExt};
use std::{
    collections::VecDeque,
    fmt::Display,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::{
    sync::{Mutex as AsyncMutex, Notify},
    time,
};
use tokio_tungstenite::tungstenite::Message;

/// Outcome of one dequeue attempt.
enum Pop {
    /// The queue was torn down; the pacer must exit.
    Closed,
    /// Nothing is queued; the pacer parks until an enqueue signals it.
    Empty,
    /// The frame to write next.
    Frame(Message),
}

/// Ordered outbound frames, shared between producers and the pacer task.
#[derive(Debug)]
pub(crate) struct SendQueue {
    inner: Mutex<QueueInner>,
    notify: Notify,
}

#[derive(Debug)]
struct QueueInner {
    closed: bool,
    frames: VecDeque<Message>,
}

impl SendQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                closed: false,
                frames: VecDeque::new(),
            }),
            notify: Notify::new(),
        }
    }

    /// Append a normal-priority frame, re-arming a parked pacer.
    ///
    /// Returns whether the frame was accepted; a closed queue accepts
    /// nothing.
    pub fn push_back(&self, frame: Message) -> bool {
        let accepted = {
            let mut inner = self.lock();

            if inner.closed {
                false
            } else {
                inner.frames.push_back(frame);

                true
            }
        };

        if accepted {
            self.notify.notify_one();
        }

        accepted
    }

    /// Insert a priority frame at the head of the queue, re-arming a parked
    /// pacer.
    ///
    /// Returns whether the frame was accepted.
    pub fn push_front(&self, frame: Message) -> bool {
        let accepted = {
            let mut inner = self.lock();

            if inner.closed {
                false
            } else {
                inner.frames.push_front(frame);

                true
            }
        };

        if accepted {
            self.notify.notify_one();
        }

        accepted
    }

    /// Tear the queue down: pending frames are discarded, future pushes are
    /// refused, and the pacer exits.
    ///
    /// Closing takes the queue lock, so a teardown can never interleave
    /// with a dequeue decision.
    pub fn close(&self) {
        {
            let mut inner = self.lock();
            inner.closed = true;
            inner.frames.clear();
        }

        self.notify.notify_one();
    }

    fn pop(&self) -> Pop {
        let mut inner = self.lock();

        if inner.closed {
            Pop::Closed
        } else if let Some(frame) = inner.frames.pop_front() {
            Pop::Frame(frame)
        } else {
            Pop::Empty
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().expect("send queue poisoned")
    }
}

/// Task releasing at most one queued frame per interval.
///
/// The timer is a sleeper: after writing a frame the task sleeps for the
/// interval, and when the queue runs dry it parks until an enqueue signals
/// it, so the first frame after an idle period is written immediately.
/// Dequeue decisions happen under the queue lock; the transport write does
/// not.
pub(crate) struct SendPacer<S> {
    queue: Arc<SendQueue>,
    sink: Arc<AsyncMutex<S>>,
}

impl<S, E> SendPacer<S>
where
    S: Sink<Message, Error = E> + Unpin,
    E: Display,
{
    /// Interval between two frame releases, tuned below the server's true
    /// gateway budget.
    const INTERVAL: Duration = Duration::from_millis(500);

    pub fn new(queue: Arc<SendQueue>, sink: Arc<AsyncMutex<S>>) -> Self {
        Self { queue, sink }
    }

    pub async fn run(self) {
        tracing::debug!("starting send pacer");

        loop {
            let frame = match self.queue.pop() {
                Pop::Closed => break,
                Pop::Empty => {
                    self.queue.notify.notified().await;

                    continue;
                }
                Pop::Frame(frame) => frame,
            };

            {
                let mut sink = self.sink.lock().await;

                if let Err(source) = sink.send(frame).await {
                    tracing::warn!("sending frame failed: {source}");

                    break;
                }
            }

            time::sleep(Self::INTERVAL).await;
        }

        tracing::debug!("send pacer exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::{SendPacer, SendQueue};
    use futures_util::Sink;
    use static_assertions::assert_impl_all;
    use std::{
        convert::Infallible,
        fmt::Debug,
        pin::Pin,
        sync::{Arc, Mutex},
        task::{Context, Poll},
        time::Duration,
    };
    use tokio::{
        sync::Mutex as AsyncMutex,
        time::{self, Instant},
    };
    use tokio_tungstenite::tungstenite::Message;

    assert_impl_all!(SendQueue: Debug, Send, Sync);

    /// Sink recording each frame with the (paused) instant it was written.
    #[derive(Default)]
    struct RecordingSink {
        written: Arc<Mutex<Vec<(Instant, Message)>>>,
    }

    impl Sink<Message> for RecordingSink {
        type Error = Infallible;

        fn poll_ready(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }

        fn start_send(self: Pin<&mut Self>, item: Message) -> Result<(), Infallible> {
            self.written
                .lock()
                .unwrap()
                .push((Instant::now(), item));

            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }
    }

    fn text(content: &str) -> Message {
        Message::Text(content.to_owned())
    }

    #[test]
    fn closed_queue_refuses_frames() {
        let queue = SendQueue::new();
        assert!(queue.push_back(text("a")));

        queue.close();
        assert!(!queue.push_back(text("b")));
        assert!(!queue.push_front(text("c")));
    }

    #[tokio::test(start_paused = true)]
    async fn frames_are_paced_and_ordered() {
        let queue = Arc::new(SendQueue::new());
        let sink = RecordingSink::default();
        let written = Arc::clone(&sink.written);
        let started = Instant::now();

        for content in ["one", "two", "three", "four", "five"] {
            assert!(queue.push_back(text(content)));
        }
        // A priority frame enqueued afterwards still goes out first.
        assert!(queue.push_front(text("heartbeat")));

        let pacer = tokio::spawn(
            SendPacer::new(Arc::clone(&queue), Arc::new(AsyncMutex::new(sink))).run(),
        );

        time::sleep(Duration::from_secs(4)).await;

        {
            let written = written.lock().unwrap();
            let contents: Vec<_> = written
                .iter()
                .map(|(_, message)| message.to_text().unwrap().to_owned())
                .collect();
            assert_eq!(
                contents,
                ["heartbeat", "one", "two", "three", "four", "five"],
            );

            // The head frame went out immediately, the rest at one per
            // interval.
            for (index, (instant, _)) in written.iter().enumerate() {
                assert_eq!(
                    *instant - started,
                    Duration::from_millis(500) * index as u32,
                );
            }
        }

        queue.close();
        pacer.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn pacer_rearms_immediately_after_idle() {
        let queue = Arc::new(SendQueue::new());
        let sink = RecordingSink::default();
        let written = Arc::clone(&sink.written);

        let pacer = tokio::spawn(
            SendPacer::new(Arc::clone(&queue), Arc::new(AsyncMutex::new(sink))).run(),
        );

        // Let the pacer park on the empty queue.
        time::sleep(Duration::from_secs(5)).await;
        assert!(written.lock().unwrap().is_empty());

        let enqueued = Instant::now();
        assert!(queue.push_back(text("late")));
        time::sleep(Duration::from_millis(1)).await;

        {
            let written = written.lock().unwrap();
            assert_eq!(written.len(), 1);
            // No interval is paid for the first frame after an idle period.
            assert_eq!(written[0].0, enqueued);
        }

        queue.close();
        pacer.await.unwrap();
    }
}
