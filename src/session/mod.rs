//! Session identity for the chat widget.
//!
//! A session owns one `conversationId`/`userId` pair. Both are generated the
//! first time they are needed and persisted through a [`SessionStorage`], so
//! every request within the session carries the same identifiers.
//!
//! # Example
//!
//! ```rust
//! use chat_widget::session::{MemoryStorage, SessionContext};
//!
//! let storage = MemoryStorage::new();
//! let first = SessionContext::load(&storage, "Yasser").unwrap();
//! let again = SessionContext::load(&storage, "Yasser").unwrap();
//! assert_eq!(first.conversation_id(), again.conversation_id());
//! ```

mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};

use uuid::Uuid;

use crate::error::Result;

/// Storage key for the conversation identifier.
pub const CONVERSATION_ID_KEY: &str = "conversationId";
/// Storage key for the user identifier.
pub const USER_ID_KEY: &str = "userId";

/// Generate an opaque random identifier.
#[must_use]
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Identifiers sent with every backend request of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    conversation_id: String,
    user_id: String,
    user_name: String,
}

impl SessionContext {
    /// Build a context from explicit values.
    pub fn new(
        conversation_id: impl Into<String>,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
        }
    }

    /// Read the identifiers from `storage`, generating and persisting any
    /// that are missing. Existing entries are never regenerated.
    pub fn load(storage: &dyn SessionStorage, user_name: impl Into<String>) -> Result<Self> {
        let conversation_id = get_or_init(storage, CONVERSATION_ID_KEY)?;
        let user_id = get_or_init(storage, USER_ID_KEY)?;
        Ok(Self::new(conversation_id, user_id, user_name))
    }

    #[must_use]
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }
}

fn get_or_init(storage: &dyn SessionStorage, key: &str) -> Result<String> {
    if let Some(value) = storage.get(key).filter(|v| !v.is_empty()) {
        return Ok(value);
    }
    let value = generate_id();
    storage.set(key, &value)?;
    tracing::info!(name: "session.id.generated", key = %key, "Generated session identifier");
    Ok(value)
}
