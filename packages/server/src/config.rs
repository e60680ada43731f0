//! Runtime configuration of the relay, assembled by the binary from CLI
//! flags and environment variables.

use crate::{infrastructure::assistant::OpenAiConfig, usecase::AssistantSettings};

#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub assistant: AssistantSettings,
    /// `None` runs the assistant in fallback-only mode.
    pub openai: Option<OpenAiConfig>,
}

impl RelayConfig {
    pub fn with_openai(mut self, openai: OpenAiConfig) -> Self {
        self.openai = Some(openai);
        self
    }
}
