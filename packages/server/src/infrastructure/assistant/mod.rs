//! Adapters for the external assistant.

pub mod openai;

pub use openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiAssistant, OpenAiConfig};
