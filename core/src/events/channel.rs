use super::{CancelToken, SearchEvent};
use crate::error::{SearchError, SearchResult};
use crate::search_config::{DEFAULT_CANCEL_POLL_MS, DEFAULT_CHANNEL_CAPACITY};
use parking_lot::{Condvar, Mutex};
use std::{
    collections::VecDeque,
    hash::Hash,
    sync::Arc,
    time::{Duration, Instant},
};

/// Bounded FIFO of search events shared between one producing search and
/// any number of consumers. Every `EventChannel` is a consumer handle;
/// cloning yields another handle to the same queue.
///
/// `push` blocks while the queue is full, so a slow consumer throttles the
/// search. The channel is terminal for the producer once it is closed, or
/// once every consumer handle that ever existed has been dropped. Receivers
/// drain what is left and then see `None`; they also see `None` on an empty
/// queue whose last run already delivered its `End`.
pub struct EventChannel<V: Eq + Hash> {
    shared: Arc<Shared<V>>,
}

/// Producer side held by the search. It does not count as a consumer, so a
/// search whose consumers all went away fails its next push.
pub(crate) struct EventProducer<V: Eq + Hash> {
    shared: Arc<Shared<V>>,
}

struct Shared<V: Eq + Hash> {
    queue: Mutex<Queue<V>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
    poll_interval: Duration,
}

struct Queue<V: Eq + Hash> {
    events: VecDeque<SearchEvent<V>>,
    closed: bool,
    /// An `End` went in and no `Start` followed it yet.
    ended: bool,
    consumers: usize,
    /// At least one consumer handle was ever created.
    attached: bool,
}

impl<V: Eq + Hash> Queue<V> {
    fn abandoned(&self) -> bool {
        self.attached && self.consumers == 0
    }
}

impl<V: Eq + Hash> Shared<V> {
    fn new(capacity: usize, poll_interval: Duration) -> Self {
        let capacity = if capacity == 0 {
            tracing::warn!(
                default = DEFAULT_CHANNEL_CAPACITY,
                "event channel capacity must be positive, using default"
            );
            DEFAULT_CHANNEL_CAPACITY
        } else {
            capacity
        };

        Self {
            queue: Mutex::new(Queue {
                events: VecDeque::with_capacity(capacity),
                closed: false,
                ended: false,
                consumers: 0,
                attached: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            poll_interval,
        }
    }

    fn attach(shared: &Arc<Self>) -> EventChannel<V> {
        let mut queue = shared.queue.lock();
        queue.consumers += 1;
        queue.attached = true;
        EventChannel {
            shared: Arc::clone(shared),
        }
    }

    fn detach(&self) {
        let mut queue = self.queue.lock();
        queue.consumers = queue.consumers.saturating_sub(1);
        if queue.consumers == 0 {
            // Wake a producer blocked on a full queue so it sees the abandonment.
            self.not_full.notify_all();
        }
    }

    fn push(&self, event: SearchEvent<V>, cancel: &CancelToken) -> SearchResult<()> {
        let mut queue = self.queue.lock();

        loop {
            if queue.closed || queue.abandoned() {
                return Err(SearchError::ChannelClosed);
            }
            if cancel.is_cancelled() {
                return Err(SearchError::Cancelled);
            }
            if queue.events.len() < self.capacity {
                match &event {
                    SearchEvent::Start => queue.ended = false,
                    SearchEvent::End { .. } => queue.ended = true,
                    SearchEvent::Update { .. } => {}
                }
                let finished = event.is_end();
                queue.events.push_back(event);
                if finished {
                    // Every idle consumer must learn the run is over.
                    self.not_empty.notify_all();
                } else {
                    self.not_empty.notify_one();
                }
                return Ok(());
            }
            self.not_full.wait_for(&mut queue, self.poll_interval);
        }
    }
}

impl<V: Eq + Hash> EventChannel<V> {
    pub fn bounded(capacity: usize) -> Self {
        Self::with_poll_interval(capacity, Duration::from_millis(DEFAULT_CANCEL_POLL_MS))
    }

    /// `poll_interval` bounds how long a blocked push takes to notice a
    /// cancelled token.
    pub fn with_poll_interval(capacity: usize, poll_interval: Duration) -> Self {
        Shared::attach(&Arc::new(Shared::new(capacity, poll_interval)))
    }

    pub(crate) fn producer(&self) -> EventProducer<V> {
        EventProducer {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    pub fn len(&self) -> usize {
        self.shared.queue.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.queue.lock().events.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.queue.lock().closed
    }

    /// True if the last event pushed so far is an `End`.
    pub fn is_ended(&self) -> bool {
        self.shared.queue.lock().ended
    }

    /// Number of live consumer handles, this one included.
    pub fn consumer_count(&self) -> usize {
        self.shared.queue.lock().consumers
    }

    /// True if both handles refer to the same queue.
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Appends an event, waiting for room while the queue is full.
    pub fn push(&self, event: SearchEvent<V>, cancel: &CancelToken) -> SearchResult<()> {
        self.shared.push(event, cancel)
    }

    /// Blocks until an event is available. `None` once closed and drained,
    /// or when the queue is empty and its run has ended.
    pub fn recv(&self) -> Option<SearchEvent<V>> {
        let mut queue = self.shared.queue.lock();

        loop {
            if let Some(event) = queue.events.pop_front() {
                self.shared.not_full.notify_one();
                return Some(event);
            }
            if queue.closed || queue.ended {
                return None;
            }
            self.shared.not_empty.wait(&mut queue);
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<SearchEvent<V>> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.shared.queue.lock();

        loop {
            if let Some(event) = queue.events.pop_front() {
                self.shared.not_full.notify_one();
                return Some(event);
            }
            if queue.closed || queue.ended {
                return None;
            }
            if self
                .shared
                .not_empty
                .wait_until(&mut queue, deadline)
                .timed_out()
            {
                let event = queue.events.pop_front();
                if event.is_some() {
                    self.shared.not_full.notify_one();
                }
                return event;
            }
        }
    }

    pub fn try_recv(&self) -> Option<SearchEvent<V>> {
        let mut queue = self.shared.queue.lock();
        let event = queue.events.pop_front();
        if event.is_some() {
            self.shared.not_full.notify_one();
        }
        event
    }

    /// Removes every queued event without waiting.
    pub fn drain(&self) -> Vec<SearchEvent<V>> {
        let mut queue = self.shared.queue.lock();
        let events: Vec<_> = queue.events.drain(..).collect();
        if !events.is_empty() {
            self.shared.not_full.notify_all();
        }
        events
    }

    /// Receives until an `End` event (included) arrives, the channel closes,
    /// or `timeout` passes without a new event.
    pub fn recv_until_end(&self, timeout: Duration) -> Vec<SearchEvent<V>> {
        let mut events = Vec::new();
        while let Some(event) = self.recv_timeout(timeout) {
            let finished = event.is_end();
            events.push(event);
            if finished {
                break;
            }
        }
        events
    }

    /// Closes the channel. Blocked producers fail, blocked consumers wake.
    pub fn close(&self) {
        let mut queue = self.shared.queue.lock();
        queue.closed = true;
        self.shared.not_empty.notify_all();
        self.shared.not_full.notify_all();
    }
}

impl<V: Eq + Hash> Clone for EventChannel<V> {
    fn clone(&self) -> Self {
        Shared::attach(&self.shared)
    }
}

impl<V: Eq + Hash> Drop for EventChannel<V> {
    fn drop(&mut self) {
        self.shared.detach();
    }
}

impl<V: Eq + Hash> std::fmt::Debug for EventChannel<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let queue = self.shared.queue.lock();
        f.debug_struct("EventChannel")
            .field("capacity", &self.shared.capacity)
            .field("len", &queue.events.len())
            .field("closed", &queue.closed)
            .field("ended", &queue.ended)
            .field("consumers", &queue.consumers)
            .finish()
    }
}

impl<V: Eq + Hash> EventProducer<V> {
    /// Queue with no consumers yet. It only counts as abandoned once a
    /// consumer has attached and gone away again.
    pub fn unattached(capacity: usize, poll_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared::new(capacity, poll_interval)),
        }
    }

    /// New consumer handle on this producer's queue.
    pub fn subscribe(&self) -> EventChannel<V> {
        Shared::attach(&self.shared)
    }

    pub fn push(&self, event: SearchEvent<V>, cancel: &CancelToken) -> SearchResult<()> {
        self.shared.push(event, cancel)
    }
}

impl<V: Eq + Hash> Clone for EventProducer<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}
