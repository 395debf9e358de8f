//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, SettingsRepository, WarnRepository};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub settings: SettingsRepository,
    pub warns: WarnRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            settings: SettingsRepository::new(pool.clone()),
            warns: WarnRepository::new(pool),
        }
    }
}
