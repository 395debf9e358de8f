//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ChatWarden application.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer; dropping it stops file
/// logging, so the caller must hold it for the life of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "chatwarden.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log moderation actions with structured data
pub fn log_moderation_action(chat_id: i64, action: &str, actor: i64, target: i64, details: Option<&str>) {
    warn!(
        chat_id = chat_id,
        action = action,
        actor = actor,
        target = target,
        details = details,
        "Moderation action performed"
    );
}

/// Log chat events (joins, leaves, promotions)
pub fn log_chat_event(chat_id: i64, event: &str, user_id: Option<i64>, details: Option<&str>) {
    info!(
        chat_id = chat_id,
        event = event,
        user_id = user_id,
        details = details,
        "Chat event occurred"
    );
}

/// Log authorization decisions
pub fn log_authorization(chat_id: i64, actor: Option<i64>, command: &str, allowed: bool) {
    if allowed {
        info!(
            chat_id = chat_id,
            actor = actor,
            command = command,
            "Authorization granted"
        );
    } else {
        warn!(
            chat_id = chat_id,
            actor = actor,
            command = command,
            "Authorization denied"
        );
    }
}
