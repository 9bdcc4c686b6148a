//! # OxLDP Server
//!
//! A W3C Linked Data Platform (LDP) server: RDF graphs as HTTP resources,
//! organized into Basic and Direct Containers, over a pluggable storage
//! backend.
//!
//! The protocol core (request decoding, the RDF codec, interaction-model
//! analysis, calculated containment/membership triples, conditional
//! requests, and URI allocation) lives in [`handlers`] and its supporting
//! modules and is independent of the transport; [`server`] supplies the
//! axum wiring around it.
//!
//! ## Example
//!
//! ```no_run
//! use oxldp_server::Server;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let server = Server::builder().port(3030).build()?;
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod headers;
pub mod interaction;
pub mod membership;
pub mod prefer;
pub mod request;
pub mod response;
pub mod server;
pub mod slug;
pub mod store;

pub use config::ServerConfig;
pub use error::{LdpError, LdpResult};
pub use server::{router, AppState};
pub use store::{LdpBackend, MemoryStore};

/// The LDP server, ready to run.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        server::serve(self.state).await
    }
}

/// Builder for [`Server`].
pub struct ServerBuilder {
    config: ServerConfig,
    backend: Option<Arc<dyn LdpBackend>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        ServerBuilder {
            config: ServerConfig::default(),
            backend: None,
        }
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Swap in a storage backend; defaults to the in-memory store.
    pub fn backend(mut self, backend: Arc<dyn LdpBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> LdpResult<Server> {
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let state = AppState::new(backend, self.config)?;
        Ok(Server { state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
