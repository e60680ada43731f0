//! Assistant integration contract.
//!
//! The assistant is a reserved virtual participant. It never occupies a
//! membership slot; clients count it as present in every room.

use async_trait::async_trait;
use tertulia_shared::time::timestamp_to_rfc3339;
use thiserror::Error;

/// Reserved connection id of the assistant.
pub const ASSISTANT_ID: &str = "gpt-bot-id";

/// Display name of the assistant.
pub const ASSISTANT_NAME: &str = "GPT Assistant";

/// Fixed color of the assistant (`#10A37F`).
pub const ASSISTANT_COLOR: u32 = 0x10A37F;

/// Chat prefix that routes a message to the assistant.
pub const COMMAND_PREFIX: &str = "!gpt";

/// Upper bound on the system instruction sent with each request.
pub const MAX_SYSTEM_INSTRUCTION_CHARS: usize = 500;

const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant inside a group chat room. \
Answer briefly and clearly. Several people may read your reply, so avoid assuming \
who is asking beyond the question itself.";

/// One question for the external assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantRequest {
    pub query: String,
    pub system_instruction: String,
    pub max_tokens: u32,
}

impl AssistantRequest {
    pub fn new(query: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            query: query.into(),
            system_instruction: SYSTEM_INSTRUCTION
                .chars()
                .take(MAX_SYSTEM_INSTRUCTION_CHARS)
                .collect(),
            max_tokens,
        }
    }
}

/// Any failure of the external call. Never shown to users.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant request failed: {0}")]
    Transport(String),

    #[error("assistant returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("assistant response could not be decoded: {0}")]
    Decode(String),

    #[error("assistant returned an empty reply")]
    EmptyReply,

    #[error("assistant did not answer within {0:?}")]
    Timeout(std::time::Duration),
}

/// Request/response seam to the external assistant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistantClient: Send + Sync {
    async fn ask(&self, request: AssistantRequest) -> Result<String, AssistantError>;
}

/// Returns the trimmed query if `text` starts with the command prefix.
///
/// The query may be empty (`"!gpt"` alone).
pub fn parse_assistant_query(text: &str) -> Option<&str> {
    text.trim().strip_prefix(COMMAND_PREFIX).map(str::trim)
}

/// Usage hint sent privately when the query is empty.
pub fn usage_hint() -> String {
    format!(
        "To ask the assistant, type {COMMAND_PREFIX} followed by your question. \
         Example: {COMMAND_PREFIX} what is a websocket?"
    )
}

/// Canned reply used when the external assistant is unavailable.
pub fn fallback_reply(query: &str, now_millis: i64) -> String {
    let query = query.to_lowercase();
    let words: Vec<&str> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    let has = |keywords: &[&str]| keywords.iter().any(|keyword| words.contains(keyword));

    if has(&["hello", "hi", "hey", "hola", "morning"]) {
        "Hello! I'm the chat assistant. I'm running in offline mode right now, \
         but I can still say hi."
            .to_string()
    } else if has(&["help", "commands", "usage"]) {
        format!(
            "You can switch rooms from the room list, create a new room, change your \
             username, and ask me things with {COMMAND_PREFIX} <question>."
        )
    } else if has(&["time", "date", "hour"]) {
        format!(
            "The server clock says it is {} (UTC).",
            timestamp_to_rfc3339(now_millis)
        )
    } else if has(&["weather", "rain", "temperature"]) {
        "I can't check the weather from here. A local forecast service will know better."
            .to_string()
    } else if has(&["joke", "funny"]) {
        "Why do programmers prefer dark mode? Because light attracts bugs.".to_string()
    } else if has(&["rust", "cargo"]) {
        "Rust is a systems language focused on safety and speed; the borrow checker \
         keeps memory use honest at compile time."
            .to_string()
    } else if has(&["thanks", "thank", "thx"]) {
        "You're welcome!".to_string()
    } else {
        "I can't reach my knowledge service right now, so I can't give a full answer. \
         Please try again later."
            .to_string()
    }
}
