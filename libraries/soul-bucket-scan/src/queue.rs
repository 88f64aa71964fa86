//! Work queue shared by the producer and the fetch workers.

use soul_remote::Locator;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of a single pop attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pop {
    Item(Locator),
    /// Nothing queued yet; the producer may still push more
    Empty,
    /// Nothing queued and the producer is done
    Closed,
}

#[derive(Default)]
struct QueueState {
    items: VecDeque<Locator>,
    closed: bool,
}

/// FIFO of locators awaiting a fetch.
///
/// Cloning shares the queue. The lock is held only for the duration of a
/// single push or pop, never across an await.
#[derive(Clone, Default)]
pub struct WorkQueue {
    state: Arc<Mutex<QueueState>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, locator: Locator) {
        self.state.lock().await.items.push_back(locator);
    }

    /// Mark the queue as complete. Workers drain what is left, then exit.
    pub async fn close(&self) {
        self.state.lock().await.closed = true;
    }

    /// Remove the front item, or report why there is none.
    pub async fn pop(&self) -> Pop {
        let mut state = self.state.lock().await;
        match state.items.pop_front() {
            Some(locator) => Pop::Item(locator),
            None if state.closed => Pop::Closed,
            None => Pop::Empty,
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }
}
