//! Conversation state shared between the orchestrator and the presentation layer.
//!
//! - [`ConversationStore`]: ordered message log plus typing flag, observable
//!   through `watch` subscriptions
//! - [`Message`]: one log entry with its sender, body, quick replies and vote
//!
//! # Example
//!
//! ```rust
//! use chat_widget::store::{ConversationStore, Message, Sender};
//!
//! let store = ConversationStore::new();
//! store.add_message(Message::new("m1", Sender::user("You"), "Hello!"));
//!
//! let messages = store.messages();
//! assert_eq!(messages.len(), 1);
//! ```

mod conversation;
mod message;

pub use conversation::{ConversationStore, Snapshot};
pub use message::{
    FREE_TEXT_ACTION_ID, Feedback, Message, MessagePatch, MessageText, Sender, SuggestedAction,
};
