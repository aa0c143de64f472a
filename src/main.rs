//! Terminal front end for the support chat.
//!
//! Prints the conversation as it changes and reads commands from stdin:
//! plain lines are sent as questions, `/action N M` clicks quick reply `M` of
//! message `N`, `/up N` and `/down N` vote, `/copy N` prints a message as
//! plain text and `/quit` exits.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::info;

use chat_widget::backend::HttpBackend;
use chat_widget::config::AppConfig;
use chat_widget::format::{TextDirection, text_direction};
use chat_widget::orchestrator::{ChatOrchestrator, Notification, Severity};
use chat_widget::session::{FileStorage, MemoryStorage, SessionContext, SessionStorage};
use chat_widget::store::{ConversationStore, Feedback, Message};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    chat_widget::telemetry::init();

    let config = AppConfig::load().context("Configuration error")?;

    info!(
        name: "chat.config.loaded",
        backend = %config.backend.base_url,
        persona = %config.persona.name,
        "Configuration loaded"
    );

    let storage: Box<dyn SessionStorage> = match &config.session.storage_path {
        Some(path) => Box::new(FileStorage::new(path)),
        None => Box::new(MemoryStorage::new()),
    };
    let session = SessionContext::load(storage.as_ref(), &config.user.name)?;

    info!(
        name: "chat.session.ready",
        conversation_id = %session.conversation_id(),
        user_id = %session.user_id(),
        "Session ready"
    );

    let backend = HttpBackend::with_timeout(&config.backend.base_url, config.backend_timeout())?;
    let store = ConversationStore::new();
    let orchestrator = ChatOrchestrator::new(
        store.clone(),
        Arc::new(backend),
        session,
        config.orchestrator_options(),
    );

    tokio::spawn(print_transcript(store.clone()));
    tokio::spawn(print_typing(store.clone()));
    tokio::spawn(print_notifications(orchestrator.subscribe_notifications()));

    if config.greeting {
        orchestrator.greet();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }
        if let Err(msg) = dispatch(&orchestrator, line) {
            eprintln!("{msg}");
        }
    }

    orchestrator.shutdown();
    Ok(())
}

/// Run one console command. Sends run in the background like UI clicks do.
fn dispatch(orchestrator: &ChatOrchestrator, line: &str) -> Result<(), String> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some(cmd @ ("/up" | "/down")) => {
            let index = parse_index(parts.next())?;
            let message = message_at(orchestrator, index)?;
            let vote = if cmd == "/up" { Feedback::Up } else { Feedback::Down };
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator.on_feedback(&message, index, vote).await;
            });
        }
        Some("/action") => {
            let index = parse_index(parts.next())?;
            let choice = parse_index(parts.next())?;
            let message = message_at(orchestrator, index)?;
            let action = message
                .suggested_actions
                .get(choice)
                .cloned()
                .ok_or_else(|| format!("message {index} has no action {choice}"))?;
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator.handle_action(&action).await;
            });
        }
        Some("/copy") => {
            let index = parse_index(parts.next())?;
            let message = message_at(orchestrator, index)?;
            if let Some(text) = orchestrator.copy_text(&message) {
                println!("{text}");
            }
        }
        _ => {
            let orchestrator = orchestrator.clone();
            let text = line.to_string();
            tokio::spawn(async move {
                orchestrator.send_text(&text).await;
            });
        }
    }
    Ok(())
}

fn parse_index(arg: Option<&str>) -> Result<usize, String> {
    arg.and_then(|s| s.parse().ok())
        .ok_or_else(|| "expected a message number".to_string())
}

fn message_at(orchestrator: &ChatOrchestrator, index: usize) -> Result<Message, String> {
    orchestrator
        .store()
        .messages()
        .get(index)
        .cloned()
        .ok_or_else(|| format!("no message {index}"))
}

async fn print_transcript(store: ConversationStore) {
    let mut stream = store.message_stream();
    let mut shown: Vec<String> = Vec::new();

    while let Some(snapshot) = stream.next().await {
        if snapshot.len() < shown.len() {
            println!("  (message withdrawn)");
        }
        for (index, message) in snapshot.iter().enumerate() {
            let is_new = shown.get(index) != Some(&message.id);
            if is_new {
                print_message(index, message);
            }
        }
        shown = snapshot.iter().map(|m| m.id.clone()).collect();
    }
}

fn print_message(index: usize, message: &Message) {
    let text = message.text.plain_text();
    let marker = match text_direction(&text) {
        TextDirection::Rtl => "\u{200F}",
        TextDirection::Ltr => "",
    };
    println!("[{index}] {}:", message.sender.name());
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        println!("    {marker}{line}");
    }
    for (choice, action) in message.suggested_actions.iter().enumerate() {
        println!("      ({choice}) {}", action.label);
    }
}

async fn print_typing(store: ConversationStore) {
    let mut stream = store.typing_stream();
    while let Some(typing) = stream.next().await {
        if typing {
            println!("  …");
        }
    }
}

async fn print_notifications(mut rx: broadcast::Receiver<Notification>) {
    while let Ok(note) = rx.recv().await {
        let tag = match note.severity {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Success => "ok",
        };
        eprintln!("[{tag}] {}: {}", note.summary, note.detail);
    }
}
