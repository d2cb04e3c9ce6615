//! Conversation session core.
//!
//! Leaf-first: `log` holds one transcript, `lifecycle` drives a single query
//! round-trip into a transcript, `registry` owns the set of sessions, and
//! `controller` composes them for the UI layer.

pub mod controller;
pub mod lifecycle;
pub mod log;
pub mod registry;

#[cfg(test)]
mod testing;
