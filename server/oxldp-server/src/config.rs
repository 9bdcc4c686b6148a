//! Server configuration.
//!
//! Layered the usual way: compiled-in defaults, then an `oxldp.toml` file,
//! then `OXLDP_`-prefixed environment variables (`OXLDP_SERVER__PORT=8080`).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{LdpError, LdpResult};

pub const DEFAULT_CONFIG_FILE: &str = "oxldp.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub ldp: LdpSettings,
    pub logging: LoggingConfig,
}

/// Bind address settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// LDP protocol settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdpSettings {
    /// Path under which LDP resources live, e.g. `/r`.
    pub context_path: String,
    /// Absolute external base URL, no trailing slash, e.g. `http://localhost:3030`.
    pub base_url: String,
}

/// Logging settings; `level` feeds the tracing `EnvFilter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server: ServerSettings {
                host: "0.0.0.0".to_owned(),
                port: 3030,
            },
            ldp: LdpSettings {
                context_path: "/r".to_owned(),
                base_url: "http://localhost:3030".to_owned(),
            },
            logging: LoggingConfig {
                level: "info".to_owned(),
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from defaults, `oxldp.toml`, and the environment.
    pub fn load() -> LdpResult<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: &str) -> LdpResult<Self> {
        let config: ServerConfig = Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("OXLDP_").split("__"))
            .extract()
            .map_err(|e| LdpError::internal(format!("configuration error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> LdpResult<()> {
        if !self.ldp.context_path.starts_with('/') || self.ldp.context_path.len() < 2 {
            return Err(LdpError::internal(format!(
                "ldp.context_path must be a non-root path starting with '/': {}",
                self.ldp.context_path
            )));
        }
        if self.ldp.base_url.ends_with('/') {
            return Err(LdpError::internal(format!(
                "ldp.base_url must not end with '/': {}",
                self.ldp.base_url
            )));
        }
        Ok(())
    }

    /// URI of the root container, with its trailing slash.
    pub fn root_container_uri(&self) -> String {
        format!("{}{}/", self.ldp.base_url, self.ldp.context_path)
    }

    /// URL of the published constraints document, the `constrainedBy` target.
    pub fn constraints_url(&self) -> String {
        format!("{}/constraints.html", self.ldp.base_url)
    }
}
