//! AlloyDB environment configuration.
//!
//! Read once at process start; a missing required variable refuses startup
//! rather than surfacing mid-request. The actual AlloyDB connection runs
//! through the auth proxy, so the instance identifiers are used for startup
//! logging while host/port point at the proxy.

use std::fmt;

use thiserror::Error;

/// Default address of the AlloyDB auth proxy sidecar.
pub const DEFAULT_PROXY_ADDR: &str = "127.0.0.1:5432";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {name}")]
    MissingVar { name: &'static str },

    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Connection settings for the target AlloyDB instance.
#[derive(Clone)]
pub struct AlloyDbConfig {
    pub region: String,
    pub project_id: String,
    pub cluster: String,
    pub instance: String,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Auth-proxy address the pool actually dials, `host:port`.
    pub proxy_addr: String,
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar { name })
}

impl AlloyDbConfig {
    /// Read configuration from the environment. Every variable except
    /// `ALLOYDB_PROXY_ADDR` is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            region: require("REGION")?,
            project_id: require("PROJECT_ID")?,
            cluster: require("ALLOYDB_CLUSTER")?,
            instance: require("ALLOYDB_INSTANCE")?,
            database: require("ALLOYDB_DATABASE")?,
            user: require("ALLOYDB_USER")?,
            password: require("ALLOYDB_PASSWORD")?,
            proxy_addr: std::env::var("ALLOYDB_PROXY_ADDR")
                .unwrap_or_else(|_| DEFAULT_PROXY_ADDR.to_string()),
        })
    }

    /// Fully-qualified instance URI, the identifier the auth proxy serves.
    pub fn instance_uri(&self) -> String {
        format!(
            "projects/{}/locations/{}/clusters/{}/instances/{}",
            self.project_id, self.region, self.cluster, self.instance
        )
    }

    /// Split the proxy address into host and port.
    pub fn proxy_host_port(&self) -> Result<(String, u16), ConfigError> {
        let (host, port) = self.proxy_addr.rsplit_once(':').ok_or_else(|| {
            ConfigError::InvalidVar {
                name: "ALLOYDB_PROXY_ADDR",
                reason: format!("expected host:port, got '{}'", self.proxy_addr),
            }
        })?;
        let port = port.parse::<u16>().map_err(|e| ConfigError::InvalidVar {
            name: "ALLOYDB_PROXY_ADDR",
            reason: format!("bad port in '{}': {e}", self.proxy_addr),
        })?;
        Ok((host.to_string(), port))
    }
}

// Manual Debug so the password never lands in logs.
impl fmt::Debug for AlloyDbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlloyDbConfig")
            .field("region", &self.region)
            .field("project_id", &self.project_id)
            .field("cluster", &self.cluster)
            .field("instance", &self.instance)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("proxy_addr", &self.proxy_addr)
            .finish()
    }
}
