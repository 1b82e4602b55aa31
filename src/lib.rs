//! Scrive is a terminal-first chat client for remote LLM APIs, built around a
//! configurable "scribe" persona.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the settings record, the provider session
//!   seeded with the persona, the transcript, and the one-message-at-a-time
//!   exchange pipeline.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`commands`] implements slash-command parsing used by the chat loop.
//! - [`api`] defines the chat/model payloads exchanged with the provider.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
