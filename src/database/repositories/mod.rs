//! Repository implementations for persistent moderation state

pub mod settings;
pub mod warns;

pub use settings::SettingsRepository;
pub use warns::WarnRepository;
