use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chat_widget::Error;
use chat_widget::backend::{BotReply, ChatBackend, ChatRequest, FeedbackRequest, HttpBackend};
use serde_json::{Value, json};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn chat(State(seen): State<Seen>, Json(body): Json<Value>) -> Response {
    seen.lock().unwrap().push(body.clone());
    match body["question"].as_str().unwrap_or_default() {
        "plain" => "<html>502 Bad Gateway</html>".into_response(),
        "empty" => "".into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").into_response(),
        "details" => Json(json!({
            "id": "int-1",
            "question": "Confirm?",
            "display_params": [{"name": "leave_type", "value": "SAU_ANN"}],
            "parameters": {"tool_name": "submit_leave_request"}
        }))
        .into_response(),
        other => Json(json!(format!("echo: {other}"))).into_response(),
    }
}

async fn feedback(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().push(body);
    Json(json!({"status": "success"}))
}

async fn spawn_backend() -> (HttpBackend, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/api/chat", post(chat))
        .route("/api/feedback", post(feedback))
        .with_state(Arc::clone(&seen));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let backend = HttpBackend::new(format!("http://{addr}/api")).unwrap();
    (backend, seen)
}

fn request(question: &str) -> ChatRequest {
    ChatRequest {
        question: question.to_string(),
        user_id: "user-1".to_string(),
        message_id: "msg-1".to_string(),
        user_name: "Yasser Alomar".to_string(),
        conversation_id: "conv-1".to_string(),
        question_timestamp: "2024-09-25T10:00:00.000Z".to_string(),
        interrupt_response: None,
        interrupt_id: None,
    }
}

#[tokio::test]
async fn test_chat_text_reply() {
    let (backend, seen) = spawn_backend().await;

    let reply = backend.send_chat(&request("hello")).await.unwrap();
    assert_eq!(reply, BotReply::Text("echo: hello".into()));

    let body = seen.lock().unwrap()[0].clone();
    assert_eq!(body["conversationId"], "conv-1");
    assert_eq!(body["userName"], "Yasser Alomar");
    assert_eq!(body["messageId"], "msg-1");
    assert!(body.get("interruptId").is_none());
}

#[tokio::test]
async fn test_chat_interrupt_fields_are_sent() {
    let (backend, seen) = spawn_backend().await;
    let mut req = request("cancel_request");
    req.interrupt_response = Some("yes".into());
    req.interrupt_id = Some("int-1".into());

    backend.send_chat(&req).await.unwrap();

    let body = seen.lock().unwrap()[0].clone();
    assert_eq!(body["interruptResponse"], "yes");
    assert_eq!(body["interruptId"], "int-1");
}

#[tokio::test]
async fn test_chat_structured_reply() {
    let (backend, _seen) = spawn_backend().await;

    let BotReply::Structured(reply) = backend.send_chat(&request("details")).await.unwrap() else {
        panic!("expected structured reply");
    };
    assert_eq!(reply.id.as_deref(), Some("int-1"));
    assert_eq!(reply.display_params[0].value, "SAU_ANN");
    assert_eq!(reply.raw["parameters"]["tool_name"], "submit_leave_request");
}

#[tokio::test]
async fn test_chat_non_json_body_is_an_error() {
    let (backend, _seen) = spawn_backend().await;

    let err = backend.send_chat(&request("plain")).await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn test_chat_empty_body_is_empty_reply() {
    let (backend, _seen) = spawn_backend().await;

    let reply = backend.send_chat(&request("empty")).await.unwrap();
    assert_eq!(reply, BotReply::Other(Value::Null));
}

#[tokio::test]
async fn test_chat_server_error() {
    let (backend, _seen) = spawn_backend().await;

    let err = backend.send_chat(&request("boom")).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "backend exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(format!("http://{addr}/")).unwrap();
    let err = backend.send_chat(&request("hello")).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_feedback_roundtrip() {
    let (backend, seen) = spawn_backend().await;
    let req = FeedbackRequest {
        question: "hello".into(),
        answer: "hi there".into(),
        user_id: "user-1".into(),
        message_id: "b1".into(),
        user_name: "Yasser Alomar".into(),
        conversation_id: "conv-1".into(),
        feedback: "up".into(),
        question_timestamp: "2024-09-25T10:00:00.000Z".into(),
        answer_timestamp: "2024-09-25T10:00:01.000Z".into(),
    };

    let ack = backend.send_feedback(&req).await.unwrap();
    assert!(ack.is_success());

    let body = seen.lock().unwrap()[0].clone();
    assert_eq!(body["feedback"], "up");
    assert_eq!(body["answerTimestamp"], "2024-09-25T10:00:01.000Z");
}
