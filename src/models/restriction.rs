//! Restriction intent model
//!
//! A `RestrictionIntent` describes one restriction action to execute. The
//! many command variants (plain, delete-replied, silent, timed) and the warn
//! escalation all collapse into this single parameterized value, consumed
//! once by the restriction dispatcher.

use chrono::{DateTime, Utc};

/// The kind of restriction to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionKind {
    /// Remove and prevent rejoining, optionally until an expiry
    Ban,
    /// Revoke the ability to send messages, optionally until an expiry
    Mute,
    /// Remove without preventing rejoining (ban then unban)
    Kick,
}

impl RestrictionKind {
    /// Audit label for this action
    pub fn label(&self) -> &'static str {
        match self {
            RestrictionKind::Ban => "BAN",
            RestrictionKind::Mute => "MUTE",
            RestrictionKind::Kick => "KICK",
        }
    }

    /// Past-tense verb used in confirmation replies
    pub fn past_tense(&self) -> &'static str {
        match self {
            RestrictionKind::Ban => "banned",
            RestrictionKind::Mute => "muted",
            RestrictionKind::Kick => "kicked",
        }
    }
}

/// One restriction action, produced by a command handler or by escalation
#[derive(Debug, Clone)]
pub struct RestrictionIntent {
    pub kind: RestrictionKind,
    pub target: i64,
    /// Absolute expiry, `None` for a permanent action
    pub until: Option<DateTime<Utc>>,
    /// Human-readable duration suffix for replies and audit entries
    pub until_display: String,
    pub reason: Option<String>,
    /// Delete the command message that triggered the action
    pub delete_trigger: bool,
    /// Delete the replied-to message
    pub delete_replied: bool,
    /// Suppress the confirmation reply
    pub silent: bool,
}

impl RestrictionIntent {
    pub fn permanent(kind: RestrictionKind, target: i64) -> Self {
        Self {
            kind,
            target,
            until: None,
            until_display: String::new(),
            reason: None,
            delete_trigger: false,
            delete_replied: false,
            silent: false,
        }
    }

    pub fn with_until(mut self, until: Option<DateTime<Utc>>, display: String) -> Self {
        self.until = until;
        self.until_display = display;
        self
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub fn with_flags(mut self, delete_trigger: bool, delete_replied: bool, silent: bool) -> Self {
        self.delete_trigger = delete_trigger;
        self.delete_replied = delete_replied;
        self.silent = silent;
        self
    }

    /// Audit label including the humanized duration, e.g. "BAN for 2 hours"
    pub fn action_label(&self) -> String {
        format!("{}{}", self.kind.label(), self.until_display)
    }

    /// Reason as shown in audit entries
    pub fn reason_display(&self) -> String {
        match &self.reason {
            Some(reason) => format!("Reason: {reason}"),
            None => "Reason: Not specified.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_action_label_includes_duration() {
        let until = Utc::now() + Duration::hours(2);
        let intent = RestrictionIntent::permanent(RestrictionKind::Ban, 7)
            .with_until(Some(until), " for 2 hours".to_string());
        assert_eq!(intent.action_label(), "BAN for 2 hours");
    }

    #[test]
    fn test_permanent_label_has_no_suffix() {
        let intent = RestrictionIntent::permanent(RestrictionKind::Kick, 7);
        assert_eq!(intent.action_label(), "KICK");
        assert_eq!(intent.reason_display(), "Reason: Not specified.");
    }

    #[test]
    fn test_reason_display() {
        let intent = RestrictionIntent::permanent(RestrictionKind::Mute, 7)
            .with_reason(Some("spam".to_string()));
        assert_eq!(intent.reason_display(), "Reason: spam");
    }
}
