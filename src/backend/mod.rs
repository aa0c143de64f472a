//! Client side of the remote chat service.
//!
//! The [`ChatBackend`] trait is the seam the orchestrator talks to; the
//! [`HttpBackend`] implements it over JSON `POST /chat` and `POST /feedback`.

mod http;
mod types;

pub use http::HttpBackend;
pub use types::{
    BotReply, ChatRequest, DisplayParam, FeedbackAck, FeedbackRequest, StructuredReply, timestamp,
};

use async_trait::async_trait;

use crate::error::Result;

/// Remote chat service.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Ask a question, or answer a bot-issued action.
    async fn send_chat(&self, request: &ChatRequest) -> Result<BotReply>;

    /// Record a thumbs up/down vote.
    async fn send_feedback(&self, request: &FeedbackRequest) -> Result<FeedbackAck>;
}
