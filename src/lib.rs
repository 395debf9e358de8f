//! ChatWarden Telegram Bot
//!
//! A Telegram bot for group chat moderation. This library provides the
//! authorization gate, warn ledger and escalation engine, restriction
//! dispatcher and audit logging used to moderate supergroup membership
//! and messaging behavior.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ChatWardenError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
