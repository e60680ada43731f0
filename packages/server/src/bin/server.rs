//! Multi-room WebSocket chat relay with an embedded assistant.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tertulia-server
//! cargo run --bin tertulia-server -- --host 0.0.0.0 --port 3000
//! OPENAI_API_KEY=sk-... cargo run --bin tertulia-server
//! ```

use std::time::Duration;

use clap::Parser;
use tertulia_server::{
    config::RelayConfig,
    infrastructure::assistant::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiConfig},
    ui::Server,
    usecase::AssistantSettings,
};
use tertulia_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "tertulia-server")]
#[command(about = "Multi-room WebSocket chat relay with a GPT assistant", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "TERTULIA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// API key for the chat-completions endpoint; omit to run the assistant offline
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Model used for assistant replies
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    openai_model: String,

    /// Seconds to wait for the assistant before falling back
    #[arg(long, default_value = "15")]
    assistant_timeout_secs: u64,

    /// Maximum tokens per assistant reply
    #[arg(long, default_value = "500")]
    assistant_max_tokens: u32,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn relay_config(&self) -> RelayConfig {
        let timeout = Duration::from_secs(self.assistant_timeout_secs);
        let config = RelayConfig {
            assistant: AssistantSettings {
                timeout,
                max_tokens: self.assistant_max_tokens,
            },
            openai: None,
        };

        match self.openai_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => config.with_openai(OpenAiConfig {
                api_key: key.to_string(),
                base_url: self.openai_base_url.clone(),
                model: self.openai_model.clone(),
                request_timeout: timeout,
            }),
            _ => config,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let server = match Server::from_config(&args.relay_config()) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to initialize server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
