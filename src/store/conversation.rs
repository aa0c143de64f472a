//! Observable conversation log.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::message::{Message, MessagePatch};

/// Immutable view of the log as published to subscribers.
pub type Snapshot = Arc<Vec<Message>>;

/// Single source of truth for the message log and the "bot is typing" flag.
///
/// Every mutation publishes a fresh [`Snapshot`]; a published snapshot is
/// never modified afterwards, so subscribers always observe a consistent
/// sequence. Cloning the store yields another handle to the same state.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    messages: watch::Sender<Snapshot>,
    typing: watch::Sender<bool>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (messages, _) = watch::channel(Arc::new(Vec::new()));
        let (typing, _) = watch::channel(false);
        Self {
            inner: Arc::new(StoreInner { messages, typing }),
        }
    }

    /// Current snapshot of the log.
    #[must_use]
    pub fn messages(&self) -> Snapshot {
        Arc::clone(&self.inner.messages.borrow())
    }

    /// Subscribe to the log. The receiver starts at the current snapshot.
    #[must_use]
    pub fn subscribe_messages(&self) -> watch::Receiver<Snapshot> {
        self.inner.messages.subscribe()
    }

    /// The log as a stream of snapshots, starting with the current one.
    #[must_use]
    pub fn message_stream(&self) -> WatchStream<Snapshot> {
        WatchStream::new(self.subscribe_messages())
    }

    /// Whether the bot is currently typing.
    #[must_use]
    pub fn typing(&self) -> bool {
        *self.inner.typing.borrow()
    }

    #[must_use]
    pub fn subscribe_typing(&self) -> watch::Receiver<bool> {
        self.inner.typing.subscribe()
    }

    #[must_use]
    pub fn typing_stream(&self) -> WatchStream<bool> {
        WatchStream::new(self.subscribe_typing())
    }

    /// Set the typing flag and notify subscribers.
    pub fn set_typing(&self, value: bool) {
        self.inner.typing.send_replace(value);
    }

    /// Append a message to the end of the log.
    ///
    /// Ids are not checked for uniqueness; with duplicates, later lookups
    /// resolve to the first matching entry.
    pub fn add_message(&self, message: Message) {
        tracing::debug!(
            message_id = %message.id,
            from_user = message.is_from_user(),
            "Appending message"
        );
        self.inner.messages.send_modify(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(message);
            *current = Arc::new(next);
        });
    }

    /// Merge `patch` into the message with the given id.
    ///
    /// Returns `false` and leaves the log untouched when the id is absent.
    pub fn update_message(&self, id: &str, patch: MessagePatch) -> bool {
        self.inner.messages.send_if_modified(|current| {
            let Some(pos) = current.iter().position(|m| m.id == id) else {
                tracing::debug!(message_id = %id, "Update for unknown message ignored");
                return false;
            };
            let mut next = current.as_ref().clone();
            next[pos].apply(patch);
            *current = Arc::new(next);
            true
        })
    }

    /// Remove the message with the given id.
    ///
    /// Returns `false` when no entry matched.
    pub fn remove_message(&self, id: &str) -> bool {
        self.inner.messages.send_if_modified(|current| {
            let Some(pos) = current.iter().position(|m| m.id == id) else {
                return false;
            };
            let mut next = current.as_ref().clone();
            next.remove(pos);
            *current = Arc::new(next);
            true
        })
    }

    /// The most recent entry, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<Message> {
        self.inner.messages.borrow().last().cloned()
    }

    /// Number of messages in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.messages.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
