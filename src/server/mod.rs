//! Assistant relay server
//!
//! A pass-through proxy in front of the assistant platform. The API key stays
//! on the server; streaming runs are relayed to the caller byte for byte.
//!
//! | Route | Upstream call |
//! |---|---|
//! | `POST /api/assistants` | create assistant |
//! | `POST /api/assistants/threads` | create thread |
//! | `POST /api/assistants/threads/{threadId}/messages` | add message, stream run |
//! | `POST /api/assistants/threads/{threadId}/actions` | submit tool outputs, stream run |
//! | `GET /api/files/{fileId}` | file content |

mod handlers;
mod response;

use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use tracing::Instrument;
use uuid::Uuid;

use crate::client::AssistantsClient;
use crate::config::RelayConfig;
use crate::error::Result;
use crate::routes::{self, route_pattern};

pub use response::{RelayOptions, error_response, relay_stream};

/// Shared, read-only state of the server.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: AssistantsClient,
    pub config: Arc<RelayConfig>,
    pub options: RelayOptions,
}

impl AppState {
    pub fn new(client: AssistantsClient, config: RelayConfig) -> Self {
        let options = RelayOptions::for_environment(config.environment);
        Self {
            client,
            config: Arc::new(config),
            options,
        }
    }

    /// Build the upstream client from `config`.
    pub fn from_config(config: RelayConfig) -> Result<Self> {
        let client = AssistantsClient::from_config(&config)?;
        Ok(Self::new(client, config))
    }
}

/// All relay routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            &route_pattern(routes::ASSISTANTS),
            post(handlers::create_assistant),
        )
        .route(
            &route_pattern(routes::CREATE_THREAD),
            post(handlers::create_thread),
        )
        .route(
            &route_pattern(routes::SEND_MESSAGE),
            post(handlers::send_message),
        )
        .route(
            &route_pattern(routes::ACTIONS),
            post(handlers::submit_actions),
        )
        .route(&route_pattern(routes::FILES), get(handlers::file_content))
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

/// Bind, serve and stop on Ctrl-C.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, environment = ?state.config.environment, "assistant relay listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("assistant relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

async fn trace_request(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let mut response = next.run(request).await;
        tracing::info!(status = response.status().as_u16(), "request finished");
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert("x-request-id", value);
        }
        response
    }
    .instrument(span)
    .await
}
