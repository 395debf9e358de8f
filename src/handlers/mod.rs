//! Update handlers module

pub mod commands;
pub mod chat_member;

pub use chat_member::handle_chat_member_updated;
