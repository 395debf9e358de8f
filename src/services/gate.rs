//! Authorization gate
//!
//! Every privileged command passes through the gate with a declared
//! requirement. The gate resolves the effective actor of the incoming
//! message — the sender directly, or for messages posted anonymously as the
//! chat, the administrator whose custom title matches the author signature —
//! and checks the actor's cached capability set against the requirement.

use std::collections::HashMap;
use teloxide::types::Message;
use tracing::debug;
use crate::models::admin::{AdminRecord, AdminStatus, Capability};
use crate::services::rights::RightsStore;
use crate::utils::errors::Result;

/// Requirement a command declares for its actor
#[derive(Debug, Clone, Copy)]
pub enum Required {
    /// The actor must hold every listed capability (owner always passes)
    Capabilities(&'static [Capability]),
    /// Only the chat owner passes
    Owner,
}

/// Outcome of a gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The check passed; carries the effective actor's user id
    Allowed(i64),
    /// The actor was resolved but lacks the requirement
    Denied,
    /// The actor could not be resolved (anonymous post with no matching
    /// custom title); refuse silently
    Unresolvable,
}

#[derive(Clone)]
pub struct AuthorizationGate {
    rights: RightsStore,
}

impl AuthorizationGate {
    pub fn new(rights: RightsStore) -> Self {
        Self { rights }
    }

    /// Check a command message against a requirement
    pub async fn authorize_message(&self, msg: &Message, required: Required) -> Result<GateDecision> {
        let snapshot = self.rights.snapshot(msg.chat.id).await?;
        let decision = decide(msg, &snapshot, required);
        debug!(chat_id = msg.chat.id.0, decision = ?decision, "Gate decision");
        Ok(decision)
    }
}

/// Evaluate a message against a requirement using an admin snapshot
pub fn decide(msg: &Message, snapshot: &HashMap<i64, AdminRecord>, required: Required) -> GateDecision {
    let Some(actor) = resolve_effective_actor(msg, snapshot) else {
        return GateDecision::Unresolvable;
    };

    if permitted(snapshot.get(&actor), required) {
        GateDecision::Allowed(actor)
    } else {
        GateDecision::Denied
    }
}

/// Resolve the identity a command is attributed to
///
/// A message posted as the chat itself carries no sender id; the actor is
/// the cached administrator whose custom title equals the message's author
/// signature, if any.
pub fn resolve_effective_actor(msg: &Message, snapshot: &HashMap<i64, AdminRecord>) -> Option<i64> {
    if msg.sender_chat().map(|c| c.id.0) == Some(msg.chat.id.0) {
        let signature = msg.author_signature()?;
        return snapshot
            .values()
            .find(|record| record.custom_title.as_deref() == Some(signature))
            .map(|record| record.user_id);
    }
    msg.from().map(|user| user.id.0 as i64)
}

/// Pure capability check: `(required, actor record) → bool`
pub fn permitted(record: Option<&AdminRecord>, required: Required) -> bool {
    let Some(record) = record else {
        return false;
    };
    match required {
        Required::Owner => record.status == AdminStatus::Owner,
        Required::Capabilities(capabilities) => record.has_all(capabilities),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn admin(user_id: i64, status: AdminStatus, capabilities: &[Capability], title: Option<&str>) -> AdminRecord {
        AdminRecord {
            user_id,
            status,
            capabilities: capabilities.iter().copied().collect::<HashSet<_>>(),
            custom_title: title.map(str::to_owned),
        }
    }

    fn snapshot(records: Vec<AdminRecord>) -> HashMap<i64, AdminRecord> {
        records.into_iter().map(|r| (r.user_id, r)).collect()
    }

    fn message(value: serde_json::Value) -> Message {
        serde_json::from_value(value).expect("valid message JSON")
    }

    fn direct_message(from_id: u64) -> Message {
        message(serde_json::json!({
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": {"id": -1001234, "title": "Test Group", "type": "supergroup"},
            "from": {"id": from_id, "is_bot": false, "first_name": "Someone"},
            "text": "/ban 5",
        }))
    }

    fn anonymous_message(signature: Option<&str>) -> Message {
        let mut value = serde_json::json!({
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": {"id": -1001234, "title": "Test Group", "type": "supergroup"},
            "from": {"id": 1087968824u64, "is_bot": true, "first_name": "Group"},
            "sender_chat": {"id": -1001234, "title": "Test Group", "type": "supergroup"},
            "text": "/ban 5",
        });
        if let Some(signature) = signature {
            value["author_signature"] = serde_json::json!(signature);
        }
        message(value)
    }

    const RESTRICT: Required = Required::Capabilities(&[Capability::RestrictMembers]);

    #[test]
    fn test_admin_with_capability_allowed() {
        let snapshot = snapshot(vec![admin(
            10,
            AdminStatus::Administrator,
            &[Capability::RestrictMembers],
            None,
        )]);
        assert_eq!(decide(&direct_message(10), &snapshot, RESTRICT), GateDecision::Allowed(10));
    }

    #[test]
    fn test_admin_missing_capability_denied() {
        let snapshot = snapshot(vec![admin(
            10,
            AdminStatus::Administrator,
            &[Capability::DeleteMessages],
            None,
        )]);
        assert_eq!(decide(&direct_message(10), &snapshot, RESTRICT), GateDecision::Denied);
    }

    #[test]
    fn test_owner_allowed_regardless_of_booleans() {
        let snapshot = snapshot(vec![admin(10, AdminStatus::Owner, &[], None)]);
        assert_eq!(decide(&direct_message(10), &snapshot, RESTRICT), GateDecision::Allowed(10));
        assert_eq!(
            decide(&direct_message(10), &snapshot, Required::Owner),
            GateDecision::Allowed(10)
        );
    }

    #[test]
    fn test_owner_requirement_rejects_administrators() {
        let snapshot = snapshot(vec![admin(
            10,
            AdminStatus::Administrator,
            &[Capability::RestrictMembers, Capability::ChangeInfo],
            None,
        )]);
        assert_eq!(decide(&direct_message(10), &snapshot, Required::Owner), GateDecision::Denied);
    }

    #[test]
    fn test_non_admin_denied() {
        let snapshot = snapshot(vec![admin(10, AdminStatus::Owner, &[], None)]);
        assert_eq!(decide(&direct_message(99), &snapshot, RESTRICT), GateDecision::Denied);
    }

    #[test]
    fn test_anonymous_signature_resolves_custom_title() {
        let snapshot = snapshot(vec![
            admin(10, AdminStatus::Administrator, &[Capability::RestrictMembers], Some("Mod A")),
            admin(11, AdminStatus::Administrator, &[Capability::RestrictMembers], Some("Mod B")),
        ]);
        assert_eq!(
            decide(&anonymous_message(Some("Mod A")), &snapshot, RESTRICT),
            GateDecision::Allowed(10)
        );
    }

    #[test]
    fn test_anonymous_without_match_is_unresolvable() {
        let snapshot = snapshot(vec![admin(
            10,
            AdminStatus::Administrator,
            &[Capability::RestrictMembers],
            Some("Mod A"),
        )]);
        assert_eq!(
            decide(&anonymous_message(Some("Mod C")), &snapshot, RESTRICT),
            GateDecision::Unresolvable
        );
        assert_eq!(
            decide(&anonymous_message(None), &snapshot, RESTRICT),
            GateDecision::Unresolvable
        );
    }
}
