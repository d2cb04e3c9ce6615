//! Interactive terminal chat for LexAI.
//!
//! Implements the chat loop: welcome banner, question submission with a
//! waiting spinner, markdown-rendered answers, and slash commands for
//! session management. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
