//! Administrator rights model
//!
//! One record per administrator per chat, held in the session-scoped rights
//! snapshot. The chat owner implicitly holds every capability regardless of
//! the stored booleans.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use teloxide::types::{ChatMember, ChatMemberKind};

/// Administrator status within a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminStatus {
    Owner,
    Administrator,
}

/// A named administrative capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    RestrictMembers,
    DeleteMessages,
    ChangeInfo,
    InviteUsers,
    PinMessages,
    PromoteMembers,
}

/// One administrator's rights in one chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRecord {
    pub user_id: i64,
    pub status: AdminStatus,
    pub capabilities: HashSet<Capability>,
    /// Custom admin title, used to attribute anonymous posts
    pub custom_title: Option<String>,
}

impl AdminRecord {
    /// Build a record from a Telegram chat member, `None` for non-admins
    pub fn from_chat_member(member: &ChatMember) -> Option<Self> {
        let mut capabilities = HashSet::new();
        let status = match member.kind {
            ChatMemberKind::Owner(_) => {
                capabilities.extend([
                    Capability::RestrictMembers,
                    Capability::DeleteMessages,
                    Capability::ChangeInfo,
                    Capability::InviteUsers,
                    Capability::PinMessages,
                    Capability::PromoteMembers,
                ]);
                AdminStatus::Owner
            }
            ChatMemberKind::Administrator(ref rights) => {
                if rights.can_restrict_members {
                    capabilities.insert(Capability::RestrictMembers);
                }
                if rights.can_delete_messages {
                    capabilities.insert(Capability::DeleteMessages);
                }
                if rights.can_change_info {
                    capabilities.insert(Capability::ChangeInfo);
                }
                if rights.can_invite_users {
                    capabilities.insert(Capability::InviteUsers);
                }
                if rights.can_pin_messages {
                    capabilities.insert(Capability::PinMessages);
                }
                if rights.can_promote_members {
                    capabilities.insert(Capability::PromoteMembers);
                }
                AdminStatus::Administrator
            }
            _ => return None,
        };

        Some(Self {
            user_id: member.user.id.0 as i64,
            status,
            capabilities,
            custom_title: member.kind.custom_title().map(str::to_owned),
        })
    }

    /// Whether this admin holds every capability in `required`
    ///
    /// The owner passes unconditionally; administrators pass iff their
    /// capability set is a superset of the requirement.
    pub fn has_all(&self, required: &[Capability]) -> bool {
        match self.status {
            AdminStatus::Owner => true,
            AdminStatus::Administrator => {
                required.iter().all(|c| self.capabilities.contains(c))
            }
        }
    }
}
