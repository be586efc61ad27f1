//! HTTP/WebSocket front door for the 3D Gamers relay.
//!
//! One port serves everything: the browser client connects its WebSocket to
//! the site root, `public/` is served at `/`, and the game modules under
//! `/games`.

use std::path::Path;
use std::sync::Arc;

use std::convert::Infallible;

use axum::{
    Router,
    extract::{
        FromRequestParts, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    http::request::Parts,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use futures_util::{SinkExt, StreamExt};
use server::{Config, Relay};
use tokio::sync::RwLock;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{error, warn};

/// Shared handle to the relay state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RwLock<Relay>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            relay: Arc::new(RwLock::new(Relay::new(config))),
            config: Arc::new(config.clone()),
        }
    }
}

/// Build the axum router: WebSocket upgrade at the root, static assets
/// everywhere else.
pub fn app(state: AppState) -> Router {
    let public_dir = state.config.assets.public_dir.clone();
    let games_dir = state.config.assets.games_dir.clone();

    Router::new()
        .route("/", get(root_handler))
        .nest_service("/games", ServeDir::new(games_dir))
        .fallback_service(ServeDir::new(public_dir))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

/// Optional WebSocket upgrade extractor.
///
/// axum 0.8 no longer provides a blanket `Option<T>` extractor for bare
/// `FromRequestParts` types (it now requires `OptionalFromRequestParts`, which
/// `WebSocketUpgrade` does not implement). This wrapper reinstates the prior
/// behavior: a valid upgrade request yields `Some`, anything else yields
/// `None`, never a rejection.
struct OptionalWs(Option<WebSocketUpgrade>);

impl<S> FromRequestParts<S> for OptionalWs
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalWs(
            WebSocketUpgrade::from_request_parts(parts, state).await.ok(),
        ))
    }
}

/// The root path doubles as the WebSocket endpoint: upgrade requests join
/// the relay, plain GETs receive the index page.
async fn root_handler(
    OptionalWs(ws): OptionalWs,
    State(state): State<AppState>,
) -> Response {
    match ws {
        Some(ws) => ws
            .on_upgrade(move |socket| handle_socket(socket, state))
            .into_response(),
        None => {
            let index = Path::new(&state.config.assets.public_dir).join("index.html");
            match tokio::fs::read(&index).await {
                Ok(contents) => Html(contents).into_response(),
                Err(_) => {
                    warn!("Static file not found: {}", index.display());
                    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
                }
            }
        }
    }
}

/// Pump one WebSocket connection through the relay.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let player_id = {
        let mut relay = state.relay.write().await;
        match relay.connect(tx) {
            Ok(id) => id,
            Err(e) => {
                error!("Rejecting connection: {}", e);
                return;
            }
        }
    };

    // Writer: drain the relay's outbound queue into the socket.
    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Reader: every text frame goes through the dispatcher.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state.relay.write().await.handle_frame(&player_id, &text);
            }
            Ok(Message::Close(_)) => break,
            // Binary and ping/pong frames are not part of the protocol.
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error for player {}: {}", player_id, e);
                break;
            }
        }
    }

    state.relay.write().await.disconnect(&player_id);
    // The registry entry held the only sender, so the writer drains and exits.
    let _ = writer.await;
}
