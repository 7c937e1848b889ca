//! HTTP API for registration lookups
//!
//! `GET /?rc=<number>` answers with a JSON envelope whose `status` is one of
//! `success`, `not_found` or `error`, so callers can tell an unavailable
//! upstream apart from a number with no record.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::data::{FieldMap, LookupError, VehicleClient, VehicleLookup};

/// Response body shared by the HTTP API and the `lookup` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope {
    Success {
        rc: String,
        cached: bool,
        details: FieldMap,
    },
    NotFound {
        message: String,
    },
    Error {
        message: String,
    },
}

impl Envelope {
    /// Maps a lookup outcome to its envelope
    pub fn from_lookup(result: Result<VehicleLookup, LookupError>) -> Self {
        match result {
            Ok(lookup) if lookup.payload.found => Envelope::Success {
                rc: lookup.rc,
                cached: lookup.from_cache,
                details: lookup.payload.data,
            },
            Ok(lookup) => Envelope::NotFound {
                message: format!("No details found for {}", lookup.rc),
            },
            Err(e) => Envelope::Error {
                message: e.to_string(),
            },
        }
    }

    /// Envelope for a request without a registration number
    pub fn missing_rc() -> Self {
        Envelope::Error {
            message: "Missing required parameter: rc".to_string(),
        }
    }

    /// HTTP status for a lookup envelope
    pub fn status_code(&self) -> StatusCode {
        match self {
            Envelope::Success { .. } => StatusCode::OK,
            Envelope::NotFound { .. } => StatusCode::NOT_FOUND,
            Envelope::Error { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupQuery {
    rc: Option<String>,
}

/// Build the router with all endpoints
pub fn router(client: Arc<VehicleClient>) -> Router {
    Router::new()
        .route("/", get(handle_lookup))
        .route("/health", get(health))
        .with_state(client)
}

/// Serve the API on `addr` until the process exits
pub async fn start(addr: SocketAddr, client: Arc<VehicleClient>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(client)).await
}

async fn handle_lookup(
    State(client): State<Arc<VehicleClient>>,
    Query(query): Query<LookupQuery>,
) -> Response {
    let Some(rc) = query.rc.filter(|rc| !rc.is_empty()) else {
        return (StatusCode::BAD_REQUEST, Json(Envelope::missing_rc())).into_response();
    };

    let envelope = Envelope::from_lookup(client.lookup(&rc).await);
    (envelope.status_code(), Json(envelope)).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
