//! Bounded hand-off queue between commit extractors and an analyzer.
//!
//! The queue is created [`Idle`](QueueState::Idle). The consumer opens it
//! before producers start and closes it once nothing more will be produced.
//! Closing keeps buffered commits: the consumer drains until
//! [`CommitQueue::is_open`] turns false.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use revharvest_commit::Commit;
use thiserror::Error;
use tracing::debug;

/// Lifecycle state of a [`CommitQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Created but not yet opened; producers wait.
    Idle,
    /// Accepting commits.
    Open,
    /// No longer accepting commits. Terminal.
    Closed,
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Queue construction and lifecycle errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// A queue must hold at least one commit.
    #[error("queue capacity must be at least 1")]
    ZeroCapacity,

    /// A closed queue cannot be reopened.
    #[error("cannot open a closed queue")]
    AlreadyClosed,
}

/// Why [`CommitQueue::try_put`] refused a commit. Carries the commit back.
#[derive(Debug, Error)]
pub enum TryPutError {
    /// The buffer holds `capacity` commits.
    #[error("queue is full")]
    Full(Commit),

    /// The queue is idle or closed.
    #[error("queue is {0}")]
    NotOpen(QueueState, Commit),
}

impl TryPutError {
    /// Returns the refused commit.
    pub fn into_commit(self) -> Commit {
        match self {
            Self::Full(commit) | Self::NotOpen(_, commit) => commit,
        }
    }
}

/// Why [`CommitQueue::put`] gave up. Carries the commit back.
#[derive(Debug, Error)]
pub enum PutError {
    /// The queue was closed before space became available.
    #[error("queue was closed")]
    Closed(Commit),

    /// No space became available within the timeout.
    #[error("timed out after {0:?} waiting for queue space")]
    TimedOut(Duration, Commit),
}

impl PutError {
    /// Returns the refused commit.
    pub fn into_commit(self) -> Commit {
        match self {
            Self::Closed(commit) | Self::TimedOut(_, commit) => commit,
        }
    }
}

struct Inner {
    state: QueueState,
    buffer: VecDeque<Commit>,
}

/// Fixed-capacity FIFO of commits shared by producers and one consumer.
pub struct CommitQueue {
    capacity: usize,
    inner: Mutex<Inner>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl CommitQueue {
    /// Creates an idle queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            inner: Mutex::new(Inner {
                state: QueueState::Idle,
                buffer: VecDeque::with_capacity(capacity),
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        })
    }

    /// Starts accepting commits. Opening an open queue is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AlreadyClosed`] if the queue was closed.
    pub fn open(&self) -> Result<(), QueueError> {
        let mut inner = self.lock();
        match inner.state {
            QueueState::Closed => Err(QueueError::AlreadyClosed),
            QueueState::Open => Ok(()),
            QueueState::Idle => {
                inner.state = QueueState::Open;
                debug!(capacity = self.capacity, "commit queue opened");
                self.not_full.notify_all();
                Ok(())
            }
        }
    }

    /// Stops accepting commits and wakes every waiting producer and consumer.
    ///
    /// Buffered commits stay available to [`get`](Self::get). Closing twice is a no-op.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.state != QueueState::Closed {
            inner.state = QueueState::Closed;
            debug!(buffered = inner.buffer.len(), "commit queue closed");
        }
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Inserts a commit without waiting.
    ///
    /// # Errors
    ///
    /// Returns the commit back if the queue is not open or already holds
    /// `capacity` commits.
    pub fn try_put(&self, commit: Commit) -> Result<(), TryPutError> {
        let mut inner = self.lock();
        if inner.state != QueueState::Open {
            return Err(TryPutError::NotOpen(inner.state, commit));
        }
        if inner.buffer.len() >= self.capacity {
            return Err(TryPutError::Full(commit));
        }
        inner.buffer.push_back(commit);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Inserts a commit, waiting while the queue is idle or full.
    ///
    /// With `timeout` set to `None` the call waits until space frees up or the
    /// queue is closed.
    ///
    /// # Errors
    ///
    /// Returns the commit back if the queue is closed or the timeout elapses.
    pub fn put(&self, commit: Commit, timeout: Option<Duration>) -> Result<(), PutError> {
        let deadline = timeout.map(|timeout| (timeout, Instant::now() + timeout));
        let mut inner = self.lock();

        loop {
            match inner.state {
                QueueState::Closed => return Err(PutError::Closed(commit)),
                QueueState::Open if inner.buffer.len() < self.capacity => {
                    inner.buffer.push_back(commit);
                    self.not_empty.notify_one();
                    return Ok(());
                }
                QueueState::Open | QueueState::Idle => {}
            }

            inner = match deadline {
                None => self
                    .not_full
                    .wait(inner)
                    .unwrap_or_else(PoisonError::into_inner),
                Some((timeout, deadline)) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(PutError::TimedOut(timeout, commit));
                    }
                    self.not_full
                        .wait_timeout(inner, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
    }

    /// Removes the oldest commit without waiting, whatever the state.
    pub fn get(&self) -> Option<Commit> {
        let mut inner = self.lock();
        let commit = inner.buffer.pop_front();
        if commit.is_some() {
            self.not_full.notify_one();
        }
        commit
    }

    /// Removes the oldest commit, waiting until one arrives.
    ///
    /// Returns `None` once the queue is closed and empty.
    pub fn get_blocking(&self) -> Option<Commit> {
        let mut inner = self.lock();
        loop {
            if let Some(commit) = inner.buffer.pop_front() {
                self.not_full.notify_one();
                return Some(commit);
            }
            if inner.state == QueueState::Closed {
                return None;
            }
            inner = self
                .not_empty
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Iterates over commits as they arrive until the queue is closed and empty.
    pub fn drain(&self) -> impl Iterator<Item = Commit> + '_ {
        std::iter::from_fn(|| self.get_blocking())
    }

    /// Returns true while the queue is open or still holds commits.
    ///
    /// Consumers drain until this returns false.
    pub fn is_open(&self) -> bool {
        let inner = self.lock();
        inner.state == QueueState::Open || !inner.buffer.is_empty()
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> QueueState {
        self.lock().state
    }

    /// Returns the number of buffered commits.
    pub fn len(&self) -> usize {
        self.lock().buffer.len()
    }

    /// Returns true if no commits are buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().buffer.is_empty()
    }

    /// Returns the maximum number of buffered commits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a guard that closes the queue when dropped.
    ///
    /// A producer holding the guard closes the queue even if it panics, so a
    /// consumer in [`drain`](Self::drain) always terminates.
    pub fn close_on_drop(&self) -> CloseOnDrop<'_> {
        CloseOnDrop { queue: self }
    }

    // A panicking producer must not wedge the consumer.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Closes a [`CommitQueue`] when dropped. See [`CommitQueue::close_on_drop`].
#[must_use = "the queue is closed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CloseOnDrop<'a> {
    queue: &'a CommitQueue,
}

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.queue.close();
    }
}

impl fmt::Debug for CommitQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("CommitQueue")
            .field("capacity", &self.capacity)
            .field("state", &inner.state)
            .field("len", &inner.buffer.len())
            .finish()
    }
}
