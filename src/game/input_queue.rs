//! Event queue between the platform and the update loop
//!
//! Event listeners (DOM callbacks, the replay feeder) push through an
//! [`InputSender`]; the session drains everything pending at the start of
//! each tick, so a tick always sees a consistent snapshot.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::game::input::InputEvent;

/// Bounded queue of platform input events
pub struct InputQueue {
    /// Sender side - cloned to each event producer
    sender: Sender<InputEvent>,
    /// Receiver side - drained by the session
    receiver: Receiver<InputEvent>,
    capacity: usize,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Create a new sender handle for an event producer
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    /// Drain all pending events, oldest first
    pub fn drain(&self) -> Vec<InputEvent> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(crate::game::constants::input::QUEUE_CAPACITY)
    }
}

/// Clonable sender handle for event producers
#[derive(Clone)]
pub struct InputSender {
    sender: Sender<InputEvent>,
}

impl InputSender {
    /// Submit an event (non-blocking)
    #[inline]
    pub fn try_send(&self, event: InputEvent) -> Result<(), InputQueueError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => InputQueueError::Full,
            TrySendError::Disconnected(_) => InputQueueError::Disconnected,
        })
    }
}

/// Input queue errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputQueueError {
    /// Queue is full (backpressure)
    #[error("Input queue is full")]
    Full,
    /// Session dropped its queue
    #[error("Input queue disconnected")]
    Disconnected,
}
