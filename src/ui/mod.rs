//! Terminal UI layer for interactive chat sessions.
//!
//! [`chat_loop`] runs the interactive event loop: it routes keyboard input,
//! dispatches outbound messages to worker tasks, and drains their reply
//! events. [`renderer`] composes each frame from the application state.
//!
//! Ownership boundary: this layer presents and captures interaction state,
//! while [`crate::core`] owns domain logic and provider coordination.

pub mod chat_loop;
pub mod renderer;
