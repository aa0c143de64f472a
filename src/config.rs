use crate::error::Result;
use crate::orchestrator::{OrchestratorOptions, Persona};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_NAME: &str = "chat";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the chat backend
    #[arg(long, env = "CHAT_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Name sent to the backend with every request
    #[arg(long, env = "CHAT_USER_NAME")]
    pub user_name: Option<String>,

    /// File that keeps the conversation and user ids between runs
    #[arg(long, env = "CHAT_SESSION_FILE")]
    pub session_file: Option<String>,

    /// Do not show the welcome message
    #[arg(long)]
    pub no_greeting: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub user: UserConfig,
    #[serde(default)]
    pub persona: Persona,
    #[serde(default)]
    pub session: SessionConfig,
    pub leave_request: LeaveRequestConfig,
    pub greeting: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    /// Sent as `userName`.
    pub name: String,
    /// Shown on the user's own messages.
    pub label: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Without a path, ids live only as long as the process.
    pub storage_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LeaveRequestConfig {
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("backend.base_url", "http://localhost:8100/")?
            .set_default("backend.timeout_secs", 60)?
            .set_default("user.name", "Guest")?
            .set_default("user.label", "You")?
            .set_default("leave_request.min_delay_secs", 10)?
            .set_default("leave_request.max_delay_secs", 15)?
            .set_default("greeting", true)?;

        // 2. Config file: explicit path must exist, ./chat.* is optional
        builder = match &cli.config {
            Some(path) => builder.add_source(File::from(Path::new(path))),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        // 3. Environment (e.g. CHAT_BACKEND__BASE_URL)
        builder = builder.add_source(
            Environment::with_prefix("CHAT")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their env fallbacks) win
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(name) = cli.user_name {
            builder = builder.set_override("user.name", name)?;
        }
        if let Some(path) = cli.session_file {
            builder = builder.set_override("session.storage_path", path)?;
        }
        if cli.no_greeting {
            builder = builder.set_override("greeting", false)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> std::result::Result<(), config::ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "backend.base_url cannot be empty".to_string(),
            ));
        }
        if self.leave_request.min_delay_secs > self.leave_request.max_delay_secs {
            return Err(config::ConfigError::Message(format!(
                "leave_request.min_delay_secs ({}) exceeds max_delay_secs ({})",
                self.leave_request.min_delay_secs, self.leave_request.max_delay_secs
            )));
        }
        Ok(())
    }

    /// Request timeout for the backend client.
    #[must_use]
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    /// Orchestrator settings derived from this config.
    #[must_use]
    pub fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            persona: self.persona.clone(),
            user_label: self.user.label.clone(),
            leave_delay_secs: self.leave_request.min_delay_secs..=self.leave_request.max_delay_secs,
        }
    }
}
