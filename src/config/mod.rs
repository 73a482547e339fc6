//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `PARLANCE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PARLANCE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path to the parameter catalog (JSON). Default: `./catalog.json`.
    pub catalog_path: PathBuf,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Embedding service endpoint URL. Default: `http://localhost:8081`.
    pub embedder_url: String,

    /// Rerank scoring service endpoint URL. Default: `http://localhost:8082`.
    pub reranker_url: String,

    /// Generative model name (e.g. `gemini-2.0-flash`). `None` disables
    /// generative strategies and the router degrades to pure-knowledge paths.
    pub generation_model: Option<String>,

    /// Sampling temperature for generative calls. Default: `0.2`.
    pub temperature: f64,

    /// Token cap for generative calls. Default: `512`.
    pub max_tokens: u32,

    /// Candidates fetched from the vector index per query. Default: `10`.
    pub retrieve_k: usize,

    /// Candidates kept after reranking. Default: `5`.
    pub rerank_top_n: usize,
}

/// Default Qdrant URL used when `PARLANCE_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            catalog_path: PathBuf::from("./catalog.json"),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            embedder_url: "http://localhost:8081".to_string(),
            reranker_url: "http://localhost:8082".to_string(),
            generation_model: None,
            temperature: 0.2,
            max_tokens: 512,
            retrieve_k: 10,
            rerank_top_n: 5,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PARLANCE_PORT";
    const ENV_BIND_ADDR: &'static str = "PARLANCE_BIND_ADDR";
    const ENV_CATALOG_PATH: &'static str = "PARLANCE_CATALOG_PATH";
    const ENV_QDRANT_URL: &'static str = "PARLANCE_QDRANT_URL";
    const ENV_EMBEDDER_URL: &'static str = "PARLANCE_EMBEDDER_URL";
    const ENV_RERANKER_URL: &'static str = "PARLANCE_RERANKER_URL";
    const ENV_GENERATION_MODEL: &'static str = "PARLANCE_GENERATION_MODEL";
    const ENV_TEMPERATURE: &'static str = "PARLANCE_TEMPERATURE";
    const ENV_MAX_TOKENS: &'static str = "PARLANCE_MAX_TOKENS";
    const ENV_RETRIEVE_K: &'static str = "PARLANCE_RETRIEVE_K";
    const ENV_RERANK_TOP_N: &'static str = "PARLANCE_RERANK_TOP_N";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let catalog_path = Self::parse_path_from_env(Self::ENV_CATALOG_PATH, defaults.catalog_path);
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let embedder_url =
            Self::parse_string_from_env(Self::ENV_EMBEDDER_URL, defaults.embedder_url);
        let reranker_url =
            Self::parse_string_from_env(Self::ENV_RERANKER_URL, defaults.reranker_url);
        let generation_model = Self::parse_optional_string_from_env(Self::ENV_GENERATION_MODEL);
        let temperature = Self::parse_f64_from_env(Self::ENV_TEMPERATURE, defaults.temperature);
        let max_tokens = Self::parse_u32_from_env(Self::ENV_MAX_TOKENS, defaults.max_tokens);
        let retrieve_k = Self::parse_usize_from_env(Self::ENV_RETRIEVE_K, defaults.retrieve_k);
        let rerank_top_n =
            Self::parse_usize_from_env(Self::ENV_RERANK_TOP_N, defaults.rerank_top_n);

        Ok(Self {
            port,
            bind_addr,
            catalog_path,
            qdrant_url,
            embedder_url,
            reranker_url,
            generation_model,
            temperature,
            max_tokens,
            retrieve_k,
            rerank_top_n,
        })
    }

    /// Validates paths and basic invariants (does not create anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_path.exists() && !self.catalog_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.catalog_path.clone(),
            });
        }

        if self.retrieve_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_RETRIEVE_K,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.rerank_top_n == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_RERANK_TOP_N,
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_f64_from_env(var_name: &str, default: f64) -> f64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_u32_from_env(var_name: &str, default: u32) -> u32 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
