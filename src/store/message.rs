//! Conversation log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message, carrying the name shown above the bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the widget.
    User { name: String },
    /// The support bot persona.
    Bot { name: String },
}

impl Sender {
    /// Create a user sender.
    #[must_use]
    pub fn user(name: impl Into<String>) -> Self {
        Self::User { name: name.into() }
    }

    /// Create a bot sender.
    #[must_use]
    pub fn bot(name: impl Into<String>) -> Self {
        Self::Bot { name: name.into() }
    }

    /// Display name of the sender.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::User { name } | Self::Bot { name } => name,
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}

/// Message body.
///
/// `Plain` holds text or markdown source that the presentation layer renders;
/// `Markup` holds HTML that was already rendered from markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MessageText {
    Plain(String),
    Markup(String),
}

impl MessageText {
    /// Raw content as stored, markup included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(s) | Self::Markup(s) => s,
        }
    }

    /// Content with any HTML tags removed, suitable for copying to the clipboard.
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Plain(s) => s.clone(),
            Self::Markup(html) => strip_tags(html),
        }
    }
}

impl Default for MessageText {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl From<String> for MessageText {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl From<&str> for MessageText {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

/// A quick-reply button attached to a bot message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAction {
    /// `"0"` marks a free-text reply; any other id is an interrupt reply.
    pub id: String,
    pub label: String,
    /// Opaque payload handed back to the orchestrator on click.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl SuggestedAction {
    /// A quick reply that is sent as if the user typed its label.
    #[must_use]
    pub fn free_text(label: impl Into<String>) -> Self {
        Self {
            id: FREE_TEXT_ACTION_ID.to_string(),
            label: label.into(),
            payload: serde_json::Value::Null,
        }
    }
}

/// Action id used for typed input and free-text quick replies.
pub const FREE_TEXT_ACTION_ID: &str = "0";

/// Thumbs up/down vote on a bot answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feedback {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
}

impl Feedback {
    /// Value after the user clicks `vote`: the same vote again clears it.
    #[must_use]
    pub fn toggle(self, vote: Feedback) -> Feedback {
        if self == vote { Feedback::None } else { vote }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: MessageText,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub suggested_actions: Vec<SuggestedAction>,
    #[serde(default)]
    pub feedback: Feedback,
}

impl Message {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, sender: Sender, text: impl Into<MessageText>) -> Self {
        Self {
            id: id.into(),
            sender,
            text: text.into(),
            created_at: Utc::now(),
            suggested_actions: Vec::new(),
            feedback: Feedback::None,
        }
    }

    /// Attach quick replies.
    #[must_use]
    pub fn with_actions(mut self, actions: Vec<SuggestedAction>) -> Self {
        self.suggested_actions = actions;
        self
    }

    #[must_use]
    pub fn is_from_user(&self) -> bool {
        self.sender.is_user()
    }

    /// Apply the fields set in `patch`.
    pub fn apply(&mut self, patch: MessagePatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(actions) = patch.suggested_actions {
            self.suggested_actions = actions;
        }
        if let Some(feedback) = patch.feedback {
            self.feedback = feedback;
        }
    }
}

/// Partial update for [`Message`]. Identity, sender and timestamp are immutable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    pub text: Option<MessageText>,
    pub suggested_actions: Option<Vec<SuggestedAction>>,
    pub feedback: Option<Feedback>,
}

impl MessagePatch {
    #[must_use]
    pub fn feedback(feedback: Feedback) -> Self {
        Self {
            feedback: Some(feedback),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn text(text: impl Into<MessageText>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_toggle() {
        assert_eq!(Feedback::None.toggle(Feedback::Up), Feedback::Up);
        assert_eq!(Feedback::Up.toggle(Feedback::Up), Feedback::None);
        assert_eq!(Feedback::Up.toggle(Feedback::Down), Feedback::Down);
    }

    #[test]
    fn test_feedback_wire_values() {
        assert_eq!(serde_json::to_string(&Feedback::None).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&Feedback::Down).unwrap(), "\"down\"");
        let parsed: Feedback = serde_json::from_str("\"up\"").unwrap();
        assert_eq!(parsed, Feedback::Up);
    }

    #[test]
    fn test_plain_text_strips_markup() {
        let text = MessageText::Markup("<p><strong>مرحبًا</strong> &amp; hi</p>".to_string());
        assert_eq!(text.plain_text(), "مرحبًا & hi");

        let plain = MessageText::from("**bold**");
        assert_eq!(plain.plain_text(), "**bold**");
    }

    #[test]
    fn test_patch_leaves_identity() {
        let mut msg = Message::new("m1", Sender::bot("Najd"), "hello");
        let created = msg.created_at;
        msg.apply(MessagePatch::feedback(Feedback::Down));
        assert_eq!(msg.feedback, Feedback::Down);
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.created_at, created);
        assert_eq!(msg.text.as_str(), "hello");
    }
}
