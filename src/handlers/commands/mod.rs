//! Command handlers

pub mod help;
pub mod messages;
pub mod restrictions;
pub mod settings;
pub mod warns;

use teloxide::prelude::*;
use teloxide::types::Message;
use crate::models::Capability;
use crate::services::{GateDecision, Required, ServiceFactory};
use crate::utils::errors::Result;
use crate::utils::logging;

/// Requirement for plain restriction and warn commands
pub(crate) const RESTRICT: Required = Required::Capabilities(&[Capability::RestrictMembers]);

/// Requirement for commands that also delete other users' messages
pub(crate) const RESTRICT_AND_DELETE: Required =
    Required::Capabilities(&[Capability::RestrictMembers, Capability::DeleteMessages]);

/// Requirement for warn configuration commands
pub(crate) const RESTRICT_AND_CHANGE_INFO: Required =
    Required::Capabilities(&[Capability::RestrictMembers, Capability::ChangeInfo]);

/// Requirement for the message pinning commands
pub(crate) const PIN: Required = Required::Capabilities(&[Capability::PinMessages]);

/// Requirement satisfied by any cached administrator
pub(crate) const ANY_ADMIN: Required = Required::Capabilities(&[]);

/// Run the authorization gate for a command message.
///
/// Returns the effective actor id when allowed. A denied actor gets a
/// permission-denied reply; an unresolvable anonymous actor is refused
/// silently. Either way the caller must not run the command.
pub(crate) async fn require_rights(
    bot: &Bot,
    msg: &Message,
    services: &ServiceFactory,
    required: Required,
) -> Result<Option<i64>> {
    match services.gate.authorize_message(msg, required).await? {
        GateDecision::Allowed(actor) => {
            logging::log_authorization(msg.chat.id.0, Some(actor), msg.text().unwrap_or_default(), true);
            Ok(Some(actor))
        }
        GateDecision::Denied => {
            logging::log_authorization(
                msg.chat.id.0,
                msg.from().map(|u| u.id.0 as i64),
                msg.text().unwrap_or_default(),
                false,
            );
            bot.send_message(msg.chat.id, "Permission denied.").await?;
            Ok(None)
        }
        GateDecision::Unresolvable => Ok(None),
    }
}
