//! Support chat widget core
//!
//! Client-side logic of a bilingual (Arabic-first) customer-support chat
//! widget: the observable message log, the orchestration of chat and feedback
//! requests against a remote backend, and the formatting of bot replies.
//!
//! # Architecture
//!
//! - **Store**: append-only message log and typing flag published through
//!   `watch` channels; every mutation replaces the snapshot
//! - **Orchestrator**: optimistic inserts, reply formatting, rollback on
//!   failure, feedback votes
//! - **Backend**: `ChatBackend` trait with a `reqwest` implementation
//!
//! # Modules
//!
//! - [`backend`]: wire types and HTTP client for `/chat` and `/feedback`
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`format`]: markdown rendering of structured replies and label lookup
//! - [`orchestrator`]: UI intents to backend requests and store updates
//! - [`session`]: conversation/user identifiers and their persistence
//! - [`store`]: the conversation log

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::format_push_string)]

pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod orchestrator;
pub mod session;
pub mod store;
pub mod telemetry;

pub use error::{Error, Result};
