//! Shared domain types for LexAI.
//!
//! This crate contains the types passed between the conversation core, the
//! query service client, and the terminal front end: turns, session ids,
//! wire bodies, query errors, configuration, and the current user.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
pub mod query;
