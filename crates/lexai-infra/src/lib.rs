//! Infrastructure layer for LexAI.
//!
//! Contains implementations of the port traits defined in `lexai-core`:
//! the HTTP query service client and a local identity provider, plus the
//! client configuration loader.

pub mod config;
pub mod identity;
pub mod query;
