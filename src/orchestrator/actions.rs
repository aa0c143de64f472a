//! Typed view of suggested-action payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::value_label;

/// Tool name of the leave request that is confirmed locally.
pub const SUBMIT_LEAVE_REQUEST: &str = "submit_leave_request";

/// Arguments of a `submit_leave_request` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub date_from: String,
    pub date_to: String,
    /// HR leave-type code, e.g. `SAU_ANN`.
    pub leave_type: String,
}

impl LeaveRequest {
    /// Confirmation shown once the request is considered submitted.
    #[must_use]
    pub fn confirmation_text(&self) -> String {
        format!(
            "✅ تم تقديم طلب **{}** بنجاح للفترة من **{}** إلى **{}**، وسيتم إشعارك عند اعتماد الطلب.",
            value_label(&self.leave_type),
            self.date_from.trim(),
            self.date_to.trim(),
        )
    }
}

/// Payload attached to a suggested action, by recognised tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionPayload {
    /// Leave request, confirmed without a backend round trip.
    SubmitLeaveRequest(LeaveRequest),
    /// Any other tool the backend offered.
    Tool { tool_name: String, tool_args: Value },
    /// No `parameters.tool_name` found.
    Unparsed(Value),
}

impl ActionPayload {
    /// Interpret a raw payload of shape `{parameters: {tool_name, tool_args}}`.
    #[must_use]
    pub fn parse(payload: &Value) -> Self {
        let Some(params) = payload.get("parameters") else {
            return Self::Unparsed(payload.clone());
        };
        let Some(tool_name) = params.get("tool_name").and_then(Value::as_str) else {
            return Self::Unparsed(payload.clone());
        };
        let tool_args = params.get("tool_args").cloned().unwrap_or(Value::Null);

        if tool_name == SUBMIT_LEAVE_REQUEST {
            match LeaveRequest::deserialize(&tool_args) {
                Ok(leave) => return Self::SubmitLeaveRequest(leave),
                Err(e) => tracing::warn!(
                    error = %e,
                    "Leave request arguments incomplete, forwarding to backend"
                ),
            }
        }

        Self::Tool {
            tool_name: tool_name.to_string(),
            tool_args,
        }
    }

    /// Tool name to send as the question of an interrupt reply.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::SubmitLeaveRequest(_) => Some(SUBMIT_LEAVE_REQUEST),
            Self::Tool { tool_name, .. } => Some(tool_name),
            Self::Unparsed(_) => None,
        }
    }
}
