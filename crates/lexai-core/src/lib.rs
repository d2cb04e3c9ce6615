//! Conversation session core and port trait definitions for LexAI.
//!
//! This crate owns message history, the request lifecycle, and the session
//! registry, and defines the "ports" (`QueryService`, `IdentityProvider`)
//! that the infrastructure layer implements. It depends only on
//! `lexai-types` -- never on `lexai-infra` or any HTTP crate.

pub mod chat;
pub mod identity;
pub mod query;
