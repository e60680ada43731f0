//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tertulia_shared::time::{Clock, SystemClock};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::trace::TraceLayer;

use crate::{
    config::RelayConfig,
    domain::{AssistantClient, AssistantError, RelayState, Timestamp},
    infrastructure::{assistant::OpenAiAssistant, message_pusher::WebSocketMessagePusher},
    usecase::{
        AssistantBridge, FanoutRouter, GetRoomDetailUseCase, GetRoomsUseCase, ProtocolDispatcher,
    },
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat relay server
///
/// Owns the wired-up relay: shared state, fan-out, assistant bridge and
/// the use cases behind the HTTP and WebSocket endpoints.
///
/// # Example
///
/// ```ignore
/// let server = Server::from_config(&RelayConfig::default())?;
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
}

impl Server {
    /// Wire every layer from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for the assistant cannot be built.
    pub fn from_config(config: &RelayConfig) -> Result<Self, AssistantError> {
        let client: Option<Arc<dyn AssistantClient>> = match &config.openai {
            Some(openai) => {
                tracing::info!("Assistant enabled with model '{}'", openai.model);
                Some(Arc::new(OpenAiAssistant::new(openai.clone())?))
            }
            None => {
                tracing::info!("No API key configured, assistant runs in fallback mode");
                None
            }
        };
        Ok(Self::with_clock(config, client, Arc::new(SystemClock)))
    }

    /// Wire every layer with an explicit assistant client and clock.
    pub fn with_clock(
        config: &RelayConfig,
        client: Option<Arc<dyn AssistantClient>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // 1. State（デフォルトルームを含む）
        let state = Arc::new(Mutex::new(RelayState::new(Timestamp::new(clock.now_millis()))));

        // 2. MessagePusher と FanoutRouter
        let router = FanoutRouter::new(Arc::new(WebSocketMessagePusher::default()));

        // 3. UseCases
        let bridge = AssistantBridge::new(
            state.clone(),
            router.clone(),
            client,
            clock.clone(),
            config.assistant,
        );
        let dispatcher = Arc::new(ProtocolDispatcher::new(
            state.clone(),
            router,
            clock,
            bridge,
        ));

        let app_state = Arc::new(AppState {
            dispatcher,
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(state.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(state)),
        });
        Self { app_state }
    }

    /// Routes of the relay.
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until the process ends.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }
}
