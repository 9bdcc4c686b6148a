//! Router construction and server runtime.

use std::sync::Arc;

use axum::response::{Html, IntoResponse, Json};
use axum::routing::{any, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use oxldp_core::vocab::{ldp, rdf};
use oxldp_core::{Graph, NamedNode, Triple};

use crate::config::ServerConfig;
use crate::error::{LdpError, LdpResult};
use crate::handlers;
use crate::store::{InteractionModel, LdpBackend, Resource};

/// Shared state handed to every handler: the backend and the configuration.
/// There is no other mutable server state.
pub struct AppState {
    pub backend: Arc<dyn LdpBackend>,
    pub config: ServerConfig,
}

impl AppState {
    /// Build the state and make sure the root container exists.
    pub fn new(backend: Arc<dyn LdpBackend>, config: ServerConfig) -> LdpResult<Arc<Self>> {
        let state = Arc::new(AppState { backend, config });
        state.ensure_root_container()?;
        Ok(state)
    }

    fn ensure_root_container(&self) -> LdpResult<()> {
        let root = self.config.root_container_uri();
        if self.backend.read(&root)?.is_some() {
            return Ok(());
        }
        let node = NamedNode::new(&root)
            .map_err(|e| LdpError::internal(format!("invalid root container URI {root}: {e}")))?;
        let mut graph = Graph::new();
        graph.insert(Triple::new(
            node,
            rdf::TYPE.into_owned(),
            ldp::BASIC_CONTAINER.into_owned(),
        ));
        self.backend.update(Resource {
            uri: root.clone(),
            graph,
            model: InteractionModel::BasicContainer,
            membership: None,
        })?;
        info!(uri = %root, "created root container");
        Ok(())
    }
}

/// Build the application router: the LDP context, the constraints document,
/// and a health endpoint.
pub fn router(state: Arc<AppState>) -> Router {
    let context = state.config.ldp.context_path.trim_end_matches('/').to_owned();
    Router::new()
        .route("/health", get(health_handler))
        .route("/constraints.html", get(constraints_handler))
        .route(&context, any(handlers::dispatch))
        .route(&format!("{context}/"), any(handlers::dispatch))
        .route(&format!("{context}/*path"), any(handlers::dispatch))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the listener dies.
pub async fn serve(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "LDP server listening on {addr}, resources under {}",
        state.config.root_container_uri()
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn constraints_handler() -> impl IntoResponse {
    Html(CONSTRAINTS_DOC)
}

/// The target of every `constrainedBy` link.
const CONSTRAINTS_DOC: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>LDP Server Constraints</title></head>
<body>
<h1>LDP Server Constraints</h1>
<ul>
<li>Resources are RDF sources; non-RDF (binary) resources are not accepted.</li>
<li>Supported interaction models: RDF Source, Basic Container, Direct Container.</li>
<li>Request bodies are accepted as <code>text/turtle</code>, <code>application/ld+json</code>, or <code>application/json</code>.</li>
<li>Containers cannot be replaced with PUT; delete and recreate instead.</li>
<li>Updates require <code>If-Match</code> with the representation's current entity tag.</li>
<li>Containment and membership triples are derived by the server and ignored in request bodies.</li>
</ul>
</body>
</html>
"#;
