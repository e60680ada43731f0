//! Realtime multi-room chat relay.
//!
//! Clients connect over WebSocket, join named rooms, exchange messages, see
//! presence and typing state, and can ask an AI assistant with the `!gpt` prefix.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
