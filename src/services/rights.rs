//! Rights snapshot store
//!
//! Session-scoped cache of chat administrators and their capability sets,
//! populated from `getChatAdministrators` and read by the authorization
//! gate. Refresh replaces a chat's snapshot wholesale; readers hold an `Arc`
//! to the previous snapshot and never observe a partially-updated map.
//!
//! Snapshots go stale when admins are promoted or demoted mid-session.
//! That staleness is accepted; only an explicit refresh (or a new session)
//! rebuilds the map.

use std::collections::HashMap;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::RwLock;
use tracing::{debug, info};
use crate::models::admin::AdminRecord;
use crate::utils::errors::Result;

/// Immutable view of one chat's administrators, keyed by user id
pub type RightsSnapshot = Arc<HashMap<i64, AdminRecord>>;

#[derive(Clone)]
pub struct RightsStore {
    bot: Bot,
    chats: Arc<RwLock<HashMap<i64, RightsSnapshot>>>,
}

impl RightsStore {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            chats: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the cached snapshot for a chat, if one exists this session
    pub async fn cached(&self, chat_id: ChatId) -> Option<RightsSnapshot> {
        self.chats.read().await.get(&chat_id.0).cloned()
    }

    /// Get the snapshot for a chat, querying the administrator list on
    /// first use in this session
    pub async fn snapshot(&self, chat_id: ChatId) -> Result<RightsSnapshot> {
        if let Some(snapshot) = self.cached(chat_id).await {
            return Ok(snapshot);
        }
        self.refresh(chat_id).await
    }

    /// Rebuild a chat's snapshot from the current administrator list and
    /// swap it in whole
    pub async fn refresh(&self, chat_id: ChatId) -> Result<RightsSnapshot> {
        let admins = self.bot.get_chat_administrators(chat_id).await?;
        let snapshot: RightsSnapshot = Arc::new(
            admins
                .iter()
                .filter_map(AdminRecord::from_chat_member)
                .map(|record| (record.user_id, record))
                .collect(),
        );

        info!(chat_id = chat_id.0, admins = snapshot.len(), "Rights snapshot refreshed");
        self.chats.write().await.insert(chat_id.0, snapshot.clone());
        Ok(snapshot)
    }

    /// Whether a user is a cached administrator of a chat
    pub async fn is_admin(&self, chat_id: ChatId, user_id: i64) -> Result<bool> {
        let snapshot = self.snapshot(chat_id).await?;
        let is_admin = snapshot.contains_key(&user_id);
        debug!(chat_id = chat_id.0, user_id = user_id, is_admin = is_admin, "Admin lookup");
        Ok(is_admin)
    }
}
