//! Wire types for the chat backend.
//!
//! Field names follow the backend's camelCase JSON contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;

// =============================================================================
// Chat
// =============================================================================

/// Outbound envelope for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's question, or the tool name when replying to an action.
    pub question: String,
    pub user_id: String,
    /// Fresh id for this message.
    pub message_id: String,
    pub user_name: String,
    pub conversation_id: String,
    /// RFC 3339 timestamp of the question.
    pub question_timestamp: String,
    /// Set to `"yes"` when the user accepts a bot-issued action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupt_response: Option<String>,
    /// Id of the action being answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupt_id: Option<String>,
}

impl ChatRequest {
    /// Whether this request answers a suggested action rather than free text.
    #[must_use]
    pub fn is_interrupt(&self) -> bool {
        self.interrupt_response.is_some()
    }
}

/// One row of the details table in a structured reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayParam {
    pub name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
}

/// Structured reply asking the user to confirm collected details.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StructuredReply {
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub display_params: Vec<DisplayParam>,
    #[serde(
        default,
        rename = "suggestedActions",
        deserialize_with = "labels"
    )]
    pub suggested_actions: Vec<String>,
    /// The reply exactly as received, handed back as an action payload.
    #[serde(skip)]
    pub raw: Value,
}

/// Normalised response of `POST /chat`.
#[derive(Debug, Clone, PartialEq)]
pub enum BotReply {
    /// Plain answer, used verbatim.
    Text(String),
    /// Object reply that gets formatted into markdown.
    Structured(StructuredReply),
    /// Anything else. Rendered as an empty answer.
    Other(Value),
}

impl BotReply {
    /// Classify a decoded JSON body.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Object(_) => match StructuredReply::deserialize(&value) {
                Ok(mut reply) => {
                    reply.raw = value;
                    Self::Structured(reply)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Object reply has unexpected field types");
                    Self::Other(value)
                }
            },
            other => Self::Other(other),
        }
    }

    /// Classify a raw response body.
    ///
    /// An empty body is an empty answer. Anything else must be JSON.
    pub fn from_body(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self::Other(Value::Null));
        }
        Ok(Self::from_value(serde_json::from_str(body)?))
    }
}

// =============================================================================
// Feedback
// =============================================================================

/// Outbound envelope for `POST /feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Text of the user question that preceded the answer, or empty.
    pub question: String,
    pub answer: String,
    pub user_id: String,
    /// Id of the rated bot message.
    pub message_id: String,
    pub user_name: String,
    pub conversation_id: String,
    /// `""`, `"up"` or `"down"`.
    pub feedback: String,
    /// Timestamp of the paired question, or empty.
    pub question_timestamp: String,
    pub answer_timestamp: String,
}

/// Acknowledgement of `POST /feedback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAck {
    #[serde(default)]
    pub status: String,
}

impl FeedbackAck {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// RFC 3339 with millisecond precision, as the backend expects.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// =============================================================================
// Lenient field decoding
// =============================================================================

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Value::deserialize(d).map(scalar_to_string)
}

fn optional_scalar_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok((!value.is_null()).then(|| scalar_to_string(value)))
}

fn nullable_vec<'de, D, T>(d: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

/// Suggested actions arrive as strings or as `{label}` objects.
fn labels<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
    let items = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut map) => map
                .remove("label")
                .map(scalar_to_string)
                .unwrap_or_else(|| Value::Object(map).to_string()),
            other => scalar_to_string(other),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_omits_absent_interrupt_fields() {
        let req = ChatRequest {
            question: "hello".into(),
            user_id: "u".into(),
            message_id: "m".into(),
            user_name: "Yasser".into(),
            conversation_id: "c".into(),
            question_timestamp: "2024-09-25T10:00:00.000Z".into(),
            interrupt_response: None,
            interrupt_id: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["conversationId"], "c");
        assert_eq!(value["questionTimestamp"], "2024-09-25T10:00:00.000Z");
        assert!(value.get("interruptResponse").is_none());
        assert!(value.get("interruptId").is_none());
        assert!(!req.is_interrupt());
    }

    #[test]
    fn test_reply_classification() {
        assert_eq!(BotReply::from_value(json!("hi there")), BotReply::Text("hi there".into()));
        assert!(matches!(BotReply::from_value(json!([1, 2])), BotReply::Other(_)));
        assert!(matches!(BotReply::from_value(json!(null)), BotReply::Other(_)));
        assert!(matches!(BotReply::from_value(json!(7)), BotReply::Other(_)));
    }

    #[test]
    fn test_structured_reply_is_lenient() {
        let body = json!({
            "id": 17,
            "question": "Confirm?",
            "display_params": [{"name": "days", "value": 3}],
            "suggestedActions": ["yes", {"label": "no"}],
            "parameters": {"tool_name": "submit_leave_request"}
        });
        let BotReply::Structured(reply) = BotReply::from_value(body.clone()) else {
            panic!("expected structured reply");
        };
        assert_eq!(reply.id.as_deref(), Some("17"));
        assert_eq!(reply.display_params[0].value, "3");
        assert_eq!(reply.suggested_actions, vec!["yes", "no"]);
        assert_eq!(reply.raw, body);
    }

    #[test]
    fn test_null_display_params() {
        let BotReply::Structured(reply) =
            BotReply::from_value(json!({"question": "Q", "display_params": null}))
        else {
            panic!("expected structured reply");
        };
        assert!(reply.display_params.is_empty());
        assert!(reply.id.is_none());
    }

    #[test]
    fn test_body_classification() {
        assert_eq!(BotReply::from_body("\"quoted\"").unwrap(), BotReply::Text("quoted".into()));
        assert_eq!(BotReply::from_body("").unwrap(), BotReply::Other(Value::Null));
        assert_eq!(BotReply::from_body(" \n").unwrap(), BotReply::Other(Value::Null));
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        let err = BotReply::from_body("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[test]
    fn test_feedback_ack() {
        let ack: FeedbackAck = serde_json::from_value(json!({"status": "success"})).unwrap();
        assert!(ack.is_success());
        let ack: FeedbackAck = serde_json::from_value(json!({})).unwrap();
        assert!(!ack.is_success());
    }
}
