//! Chat orchestrator: UI intents in, backend requests out, store reconciled.
//!
//! The orchestrator manages one exchange at a time from the caller's point of
//! view:
//! 1. Validate the input and build a [`ChatRequest`]
//! 2. Insert the user message optimistically (free-text input only)
//! 3. Call the backend with the typing indicator on
//! 4. Append the formatted bot reply, or roll back and raise a notification
//!
//! Sends are not serialised. Two sends in flight complete in network arrival
//! order.
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_widget::orchestrator::{ChatOrchestrator, OrchestratorOptions};
//!
//! let orchestrator = ChatOrchestrator::new(store, backend, session, OrchestratorOptions::default());
//! orchestrator.greet();
//! orchestrator.send_text("كيف أرفع اجازة؟").await;
//! ```

mod actions;
mod notification;
mod persona;

pub use actions::{ActionPayload, LeaveRequest, SUBMIT_LEAVE_REQUEST};
pub use notification::{Notification, Severity};
pub use persona::Persona;

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::backend::{BotReply, ChatBackend, ChatRequest, FeedbackRequest, timestamp};
use crate::format::{render_markdown, reply_text};
use crate::session::{SessionContext, generate_id};
use crate::store::{
    ConversationStore, FREE_TEXT_ACTION_ID, Feedback, Message, MessagePatch, MessageText, Sender,
    SuggestedAction,
};

/// Label of the confirmation offered under every structured reply.
pub const AFFIRMATIVE_LABEL: &str = "نعم, هذه المعلومات صحيحة";

/// Value sent as `interruptResponse` when the user accepts an action.
const INTERRUPT_ACCEPTED: &str = "yes";

/// Capacity of the notification channel.
const NOTIFICATION_CAPACITY: usize = 16;

/// Tunables for [`ChatOrchestrator`].
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    pub persona: Persona,
    /// Name shown on the user's own messages.
    pub user_label: String,
    /// Bounds, in seconds, of the simulated processing time of a leave request.
    pub leave_delay_secs: RangeInclusive<u64>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            persona: Persona::default(),
            user_label: "You".to_string(),
            leave_delay_secs: 10..=15,
        }
    }
}

/// What became of a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, nothing happened.
    Ignored,
    /// The bot reply with this id was appended.
    Answered { bot_message_id: String },
    /// A local confirmation will be appended after `delay`.
    Scheduled { delay: Duration },
    /// The backend call failed and the optimistic message was rolled back if present.
    Failed,
}

/// What became of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// The backend acknowledged; the store now holds this value.
    Committed(Feedback),
    /// The backend answered without `status: "success"`.
    Rejected,
    /// The request failed.
    Failed,
}

/// Bridge between UI events, the chat backend and the [`ConversationStore`].
///
/// Cloning yields another handle to the same orchestrator. Pending delayed
/// work is cancelled by [`ChatOrchestrator::shutdown`] or when the last
/// handle is dropped.
#[derive(Clone)]
pub struct ChatOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    store: ConversationStore,
    backend: Arc<dyn ChatBackend>,
    session: SessionContext,
    options: OrchestratorOptions,
    notifications: broadcast::Sender<Notification>,
    shutdown: CancellationToken,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[allow(clippy::missing_fields_in_debug)]
impl std::fmt::Debug for ChatOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatOrchestrator")
            .field("session", &self.inner.session)
            .field("options", &self.inner.options)
            .field("backend", &"ChatBackend")
            .finish()
    }
}

impl ChatOrchestrator {
    /// Create an orchestrator over `store` talking to `backend`.
    pub fn new(
        store: ConversationStore,
        backend: Arc<dyn ChatBackend>,
        session: SessionContext,
        options: OrchestratorOptions,
    ) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                store,
                backend,
                session,
                options,
                notifications,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &ConversationStore {
        &self.inner.store
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    #[must_use]
    pub fn persona(&self) -> &Persona {
        &self.inner.options.persona
    }

    /// Receive toasts raised from now on.
    #[must_use]
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifications.subscribe()
    }

    /// Cancel pending delayed work. A cancelled confirmation only clears typing.
    pub fn shutdown(&self) {
        tracing::debug!("Orchestrator shutting down");
        self.inner.shutdown.cancel();
    }

    /// Append the persona's welcome message with its quick replies.
    pub fn greet(&self) {
        let persona = &self.inner.options.persona;
        let actions = persona
            .quick_replies
            .iter()
            .map(SuggestedAction::free_text)
            .collect();
        let greeting = Message::new(
            generate_id(),
            Sender::bot(&persona.name),
            MessageText::Markup(render_markdown(&persona.greeting)),
        )
        .with_actions(actions);
        self.inner.store.add_message(greeting);
    }

    /// Send text the user typed.
    pub async fn send_text(&self, text: &str) -> SendOutcome {
        self.on_send_message(FREE_TEXT_ACTION_ID, text, &Value::Null)
            .await
    }

    /// A quick reply was clicked.
    pub async fn handle_action(&self, action: &SuggestedAction) -> SendOutcome {
        tracing::debug!(action_id = %action.id, label = %action.label, "Suggested action selected");
        self.on_send_message(&action.id, &action.label, &action.payload)
            .await
    }

    /// Send a message.
    ///
    /// `action_id == "0"` means free text: the user message is inserted before
    /// the backend answers. Any other id answers a bot-issued action whose
    /// `payload` names the tool to run.
    pub async fn on_send_message(&self, action_id: &str, text: &str, payload: &Value) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        let session = &self.inner.session;
        let store = &self.inner.store;
        let now = Utc::now();
        let mut request = ChatRequest {
            question: text.to_string(),
            user_id: session.user_id().to_string(),
            message_id: generate_id(),
            user_name: session.user_name().to_string(),
            conversation_id: session.conversation_id().to_string(),
            question_timestamp: timestamp(now),
            interrupt_response: None,
            interrupt_id: None,
        };

        if action_id == FREE_TEXT_ACTION_ID {
            store.add_message(Message {
                id: request.message_id.clone(),
                sender: Sender::user(&self.inner.options.user_label),
                text: MessageText::Plain(text.to_string()),
                created_at: now,
                suggested_actions: Vec::new(),
                feedback: Feedback::None,
            });
        } else {
            let action = ActionPayload::parse(payload);
            if let ActionPayload::SubmitLeaveRequest(leave) = action {
                return self.schedule_leave_confirmation(leave);
            }
            match action.tool_name() {
                Some(tool_name) => request.question = tool_name.to_string(),
                None => tracing::warn!(
                    action_id = %action_id,
                    "Action payload has no tool name, sending its label"
                ),
            }
            request.interrupt_response = Some(INTERRUPT_ACCEPTED.to_string());
            // Replies without an id carry no `interruptId` at all.
            request.interrupt_id = (!action_id.is_empty()).then(|| action_id.to_string());
        }

        tracing::info!(
            name: "chat.send.started",
            message_id = %request.message_id,
            conversation_id = %request.conversation_id,
            interrupt = request.is_interrupt(),
            "Sending chat request"
        );

        store.set_typing(true);
        match self.inner.backend.send_chat(&request).await {
            Ok(reply) => self.append_reply(&request, &reply),
            Err(e) => {
                tracing::error!(
                    name: "chat.send.failed",
                    message_id = %request.message_id,
                    error = %e,
                    "Chat request failed"
                );
                self.roll_back_send();
                SendOutcome::Failed
            }
        }
    }

    fn append_reply(&self, request: &ChatRequest, reply: &BotReply) -> SendOutcome {
        let text = reply_text(reply);
        let actions = match reply {
            BotReply::Structured(structured) => vec![SuggestedAction {
                id: structured.id.clone().unwrap_or_default(),
                label: AFFIRMATIVE_LABEL.to_string(),
                payload: structured.raw.clone(),
            }],
            BotReply::Text(_) | BotReply::Other(_) => Vec::new(),
        };

        let bot_message_id = generate_id();
        tracing::info!(
            name: "chat.send.answered",
            message_id = %request.message_id,
            bot_message_id = %bot_message_id,
            text_length = text.len(),
            action_count = actions.len(),
            "Chat reply received"
        );

        let store = &self.inner.store;
        store.set_typing(false);
        store.add_message(
            Message::new(
                bot_message_id.clone(),
                Sender::bot(&self.inner.options.persona.name),
                text,
            )
            .with_actions(actions),
        );
        SendOutcome::Answered { bot_message_id }
    }

    /// Stop typing, raise a toast and drop the optimistic user message.
    ///
    /// Only a trailing user-authored entry is removed, so bot content is never
    /// deleted by a failed interrupt reply.
    fn roll_back_send(&self) {
        let store = &self.inner.store;
        store.set_typing(false);
        let _ = self.inner.notifications.send(Notification::request_failed());

        if let Some(last) = store.last_message().filter(Message::is_from_user) {
            tracing::debug!(message_id = %last.id, "Rolling back optimistic message");
            store.remove_message(&last.id);
        }
    }

    fn schedule_leave_confirmation(&self, leave: LeaveRequest) -> SendOutcome {
        let range = &self.inner.options.leave_delay_secs;
        let secs = if range.is_empty() {
            *range.start()
        } else {
            rand::random_range(range.clone())
        };
        let delay = Duration::from_secs(secs);

        tracing::info!(
            name: "chat.leave.scheduled",
            leave_type = %leave.leave_type,
            delay_secs = secs,
            "Leave request confirmation scheduled"
        );

        let store = self.inner.store.clone();
        let token = self.inner.shutdown.clone();
        let bot_name = self.inner.options.persona.name.clone();
        store.set_typing(true);

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!("Leave confirmation cancelled");
                    store.set_typing(false);
                }
                () = tokio::time::sleep(delay) => {
                    store.set_typing(false);
                    store.add_message(Message::new(
                        generate_id(),
                        Sender::bot(bot_name),
                        leave.confirmation_text(),
                    ));
                }
            }
        });

        SendOutcome::Scheduled { delay }
    }

    /// Record a vote on `message`, found at `index` in the log.
    ///
    /// The toggled value is written to the store only once the backend
    /// acknowledges with `status: "success"`. Failures are logged and leave
    /// the store untouched.
    pub async fn on_feedback(&self, message: &Message, index: usize, vote: Feedback) -> FeedbackOutcome {
        let session = &self.inner.session;
        let new_feedback = message.feedback.toggle(vote);

        let snapshot = self.inner.store.messages();
        let question = index
            .checked_sub(1)
            .and_then(|prev| snapshot.get(prev))
            .filter(|prev| prev.is_from_user());

        let request = FeedbackRequest {
            question: question.map(|q| q.text.as_str().to_string()).unwrap_or_default(),
            answer: message.text.as_str().to_string(),
            user_id: session.user_id().to_string(),
            message_id: message.id.clone(),
            user_name: session.user_name().to_string(),
            conversation_id: session.conversation_id().to_string(),
            feedback: new_feedback.as_str().to_string(),
            question_timestamp: question.map(|q| timestamp(q.created_at)).unwrap_or_default(),
            answer_timestamp: timestamp(message.created_at),
        };

        match self.inner.backend.send_feedback(&request).await {
            Ok(ack) if ack.is_success() => {
                tracing::info!(
                    name: "chat.feedback.committed",
                    message_id = %message.id,
                    feedback = new_feedback.as_str(),
                    "Feedback recorded"
                );
                self.inner
                    .store
                    .update_message(&message.id, MessagePatch::feedback(new_feedback));
                FeedbackOutcome::Committed(new_feedback)
            }
            Ok(ack) => {
                tracing::warn!(message_id = %message.id, status = %ack.status, "Feedback not accepted");
                FeedbackOutcome::Rejected
            }
            Err(e) => {
                tracing::error!(message_id = %message.id, error = %e, "Error sending feedback");
                FeedbackOutcome::Failed
            }
        }
    }

    /// Plain text of `message` for the clipboard; raises a "copied" toast.
    pub fn copy_text(&self, message: &Message) -> Option<String> {
        let text = message.text.plain_text();
        if text.is_empty() {
            return None;
        }
        let _ = self.inner.notifications.send(Notification::copied());
        Some(text)
    }
}
