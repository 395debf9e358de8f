//! Per-chat moderation settings model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Bounds of the configurable warn limit
pub const MIN_WARN_LIMIT: i32 = 2;
pub const MAX_WARN_LIMIT: i32 = 10;

/// Action taken when a user's warn count reaches the chat's limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum WarnMode {
    Ban,
    Mute,
    Tban,
    Tmute,
}

impl WarnMode {
    /// Whether this mode requires a configured duration
    pub fn is_timed(&self) -> bool {
        matches!(self, WarnMode::Tban | WarnMode::Tmute)
    }

    /// Whether escalation bans (as opposed to mutes) the target
    pub fn is_ban(&self) -> bool {
        matches!(self, WarnMode::Ban | WarnMode::Tban)
    }

    /// Parse the command argument form of a warn mode
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ban" => Some(WarnMode::Ban),
            "mute" => Some(WarnMode::Mute),
            "tban" => Some(WarnMode::Tban),
            "tmute" => Some(WarnMode::Tmute),
            _ => None,
        }
    }
}

impl std::fmt::Display for WarnMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WarnMode::Ban => "ban",
            WarnMode::Mute => "mute",
            WarnMode::Tban => "tban",
            WarnMode::Tmute => "tmute",
        };
        write!(f, "{name}")
    }
}

/// Moderation settings for one chat, persisted keyed by chat id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatSettings {
    pub chat_id: i64,
    pub warn_limit: i32,
    pub warn_mode: WarnMode,
    /// Duration argument for the timed warn modes, e.g. "1h"
    pub warn_duration: Option<String>,
    /// Channel receiving forwarded audit entries, if configured
    pub log_chat_id: Option<i64>,
}

impl ChatSettings {
    /// Defaults applied to chats that never changed their settings
    pub fn default_for(chat_id: i64) -> Self {
        Self {
            chat_id,
            warn_limit: 3,
            warn_mode: WarnMode::Mute,
            warn_duration: None,
            log_chat_id: None,
        }
    }

    /// Apply a partial patch, returning the merged settings
    pub fn apply(&self, patch: &ChatSettingsPatch) -> Self {
        Self {
            chat_id: self.chat_id,
            warn_limit: patch.warn_limit.unwrap_or(self.warn_limit),
            warn_mode: patch.warn_mode.unwrap_or(self.warn_mode),
            warn_duration: patch
                .warn_duration
                .clone()
                .unwrap_or_else(|| self.warn_duration.clone()),
            log_chat_id: patch.log_chat_id.unwrap_or(self.log_chat_id),
        }
    }
}

/// Partial update of chat settings; only supplied fields change
///
/// The nested options distinguish "leave untouched" (outer `None`) from
/// "clear the stored value" (inner `None`).
#[derive(Debug, Clone, Default)]
pub struct ChatSettingsPatch {
    pub warn_limit: Option<i32>,
    pub warn_mode: Option<WarnMode>,
    pub warn_duration: Option<Option<String>>,
    pub log_chat_id: Option<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ChatSettings::default_for(-100);
        assert_eq!(settings.warn_limit, 3);
        assert_eq!(settings.warn_mode, WarnMode::Mute);
        assert_eq!(settings.warn_duration, None);
    }

    #[test]
    fn test_patch_only_touches_supplied_fields() {
        let settings = ChatSettings::default_for(-100);
        let patch = ChatSettingsPatch { warn_limit: Some(5), ..Default::default() };
        let merged = settings.apply(&patch);
        assert_eq!(merged.warn_limit, 5);
        assert_eq!(merged.warn_mode, settings.warn_mode);
        assert_eq!(merged.log_chat_id, settings.log_chat_id);
    }

    #[test]
    fn test_patch_can_clear_optional_fields() {
        let mut settings = ChatSettings::default_for(-100);
        settings.log_chat_id = Some(-200);
        settings.warn_duration = Some("1h".to_string());
        let patch = ChatSettingsPatch {
            warn_duration: Some(None),
            log_chat_id: Some(None),
            ..Default::default()
        };
        let merged = settings.apply(&patch);
        assert_eq!(merged.warn_duration, None);
        assert_eq!(merged.log_chat_id, None);
    }

    #[test]
    fn test_noop_patch_is_detectable() {
        let settings = ChatSettings::default_for(-100);
        let patch = ChatSettingsPatch { warn_limit: Some(3), ..Default::default() };
        assert_eq!(settings.apply(&patch), settings);
    }

    #[test]
    fn test_warn_mode_parsing() {
        assert_eq!(WarnMode::parse("ban"), Some(WarnMode::Ban));
        assert_eq!(WarnMode::parse("tmute"), Some(WarnMode::Tmute));
        assert_eq!(WarnMode::parse("nuke"), None);
        assert!(WarnMode::Tban.is_timed());
        assert!(!WarnMode::Mute.is_timed());
    }
}
