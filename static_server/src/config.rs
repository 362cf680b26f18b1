//! Configuration du serveur edge (variables d'environnement, `.env` accepté).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key:  PathBuf,
}

#[derive(Debug, Clone)]
pub struct EdgeConfig {
    pub bind:     String,
    pub port:     u16,
    /// Output of `trunk build` for the frontend crate.
    pub dist_dir: PathBuf,
    pub tls:      Option<TlsPaths>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("EDGE_PORT must be a port number, got `{0}`")]
    InvalidPort(String),
    #[error("TLS_CERT and TLS_KEY must be set together")]
    IncompleteTls,
    #[error("dist directory {0} not found (run `trunk build` in frontend/)")]
    MissingDist(PathBuf),
}

impl EdgeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = get("EDGE_BIND").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("EDGE_PORT") {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::InvalidPort(p))?,
            None => 8444,
        };
        let dist_dir = get("DIST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../frontend/dist"));

        let tls = match (get("TLS_CERT"), get("TLS_KEY")) {
            (Some(cert), Some(key)) => Some(TlsPaths { cert: cert.into(), key: key.into() }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self { bind, port, dist_dir, tls })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dist_dir.join("index.html").is_file() {
            return Err(ConfigError::MissingDist(self.dist_dir.clone()));
        }
        Ok(())
    }
}
