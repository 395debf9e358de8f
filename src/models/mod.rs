//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod admin;
pub mod settings;
pub mod restriction;

// Re-export commonly used models
pub use admin::{AdminRecord, AdminStatus, Capability};
pub use settings::{ChatSettings, ChatSettingsPatch, WarnMode, MAX_WARN_LIMIT, MIN_WARN_LIMIT};
pub use restriction::{RestrictionIntent, RestrictionKind};
