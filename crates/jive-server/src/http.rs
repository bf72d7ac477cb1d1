//! HTTP companion endpoints for the web UI.
//!
//! A thin adapter over the dispatcher: namespace lifecycle, a tool-execute
//! proxy keyed by the `X-Namespace` header, and the health probe. Responses
//! reuse the tool envelope so UI and agent clients parse one shape.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::{get, post};
use jive_domain::error::Error;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::dispatcher::Dispatcher;
use crate::envelope::ToolResponse;

/// Header carrying the target namespace.
pub const NAMESPACE_HEADER: &str = "x-namespace";

/// Body of `POST /tools/execute`.
#[derive(Debug, Deserialize)]
struct ExecuteBody {
    tool_name: String,
    #[serde(default)]
    parameters: Value,
}

/// Body of `POST /namespaces`.
#[derive(Debug, Deserialize)]
struct CreateNamespaceBody {
    name: String,
}

/// Build the companion router.
#[must_use]
pub fn router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/namespaces", get(list_namespaces).post(create_namespace))
        .route("/namespaces/{ns}", axum::routing::delete(delete_namespace))
        .route("/tools/execute", post(execute_tool))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(dispatcher))
}

async fn list_namespaces(State(dispatcher): State<Arc<Dispatcher>>) -> Json<ToolResponse> {
    let result = dispatcher
        .context()
        .namespaces()
        .list()
        .map(|names| json!({ "namespaces": names }));
    Json(ToolResponse::from(result))
}

async fn create_namespace(
    State(dispatcher): State<Arc<Dispatcher>>,
    Json(body): Json<CreateNamespaceBody>,
) -> Json<ToolResponse> {
    let manager = dispatcher.context().namespaces();
    let result = match manager.resolve(Some(&body.name)) {
        Ok(namespace) => manager
            .create(&namespace)
            .await
            .map(|()| json!({ "namespace": namespace })),
        Err(e) => Err(e),
    };
    Json(ToolResponse::from(result))
}

async fn delete_namespace(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(ns): Path<String>,
) -> Json<ToolResponse> {
    let manager = dispatcher.context().namespaces();
    let result = match manager.resolve(Some(&ns)) {
        Ok(namespace) => manager
            .delete(&namespace)
            .await
            .map(|()| json!({ "deleted": namespace })),
        Err(e) => Err(e),
    };
    Json(ToolResponse::from(result))
}

async fn execute_tool(
    State(dispatcher): State<Arc<Dispatcher>>,
    headers: HeaderMap,
    Json(body): Json<ExecuteBody>,
) -> Json<ToolResponse> {
    let mut parameters = match body.parameters {
        Value::Null => json!({}),
        params @ Value::Object(_) => params,
        _ => {
            return Json(ToolResponse::err(&Error::validation(
                "'parameters' must be an object",
            )));
        }
    };

    // The header wins only when the parameters carry no namespace of their
    // own, mirroring the MCP metadata field.
    if let Some(namespace) = headers
        .get(NAMESPACE_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        if let Some(params) = parameters.as_object_mut() {
            params
                .entry("namespace")
                .or_insert_with(|| Value::String(namespace.trim().to_owned()));
        }
    }

    Json(dispatcher.dispatch(&body.tool_name, parameters, None).await)
}

async fn health(State(dispatcher): State<Arc<Dispatcher>>) -> Json<ToolResponse> {
    let result = dispatcher
        .context()
        .health()
        .await
        .and_then(|report| serde_json::to_value(report).map_err(Error::from));
    Json(ToolResponse::from(result))
}

/// Serve the companion API on the configured port until shutdown.
///
/// # Errors
///
/// Returns an error if binding or serving fails.
pub async fn serve_http(dispatcher: Dispatcher, port: u16) -> jive_domain::error::Result<()> {
    let router = router(dispatcher);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| Error::io_with_source(format!("cannot bind port {port}"), e))?;
    tracing::info!(port, "http companion listening");
    axum::serve(listener, router)
        .await
        .map_err(|e| Error::io_with_source("http server failed", e))?;
    Ok(())
}
