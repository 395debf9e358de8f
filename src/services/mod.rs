//! Services module
//!
//! This module contains the moderation business logic services

pub mod audit;
pub mod gate;
pub mod moderation;
pub mod rights;

// Re-export commonly used services
pub use audit::AuditLogger;
pub use gate::{AuthorizationGate, GateDecision, Required};
pub use moderation::{escalation_decision, escalation_intent, RestrictionDispatcher};
pub use rights::{RightsSnapshot, RightsStore};

use teloxide::Bot;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub rights: RightsStore,
    pub gate: AuthorizationGate,
    pub audit: AuditLogger,
    pub restrictions: RestrictionDispatcher,
    pub db: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(bot: Bot, db: DatabaseService) -> Self {
        let rights = RightsStore::new(bot.clone());
        let gate = AuthorizationGate::new(rights.clone());
        let audit = AuditLogger::new(bot.clone(), db.clone());
        let restrictions = RestrictionDispatcher::new(bot, audit.clone());

        Self {
            rights,
            gate,
            audit,
            restrictions,
            db,
        }
    }
}
