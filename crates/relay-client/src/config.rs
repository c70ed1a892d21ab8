//! Client configuration from environment variables

use std::env;
use std::path::PathBuf;

use crate::error::ClientError;

pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8000/ws/chess/";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Validator session endpoint
    pub ws_url: String,

    /// File backing keyboard save/restore; in-memory when unset
    pub snapshot_path: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let ws_url = lookup("CHESS_WS_URL").unwrap_or_else(|| DEFAULT_WS_URL.to_string());
        if !(ws_url.starts_with("ws://") || ws_url.starts_with("wss://")) {
            return Err(ClientError::Config("CHESS_WS_URL must be a ws:// or wss:// URL"));
        }

        let snapshot_path = lookup("CHESS_SNAPSHOT_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            ws_url,
            snapshot_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ClientError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CHESS_WS_URL", "wss://chess.example/ws/chess/"),
            ("CHESS_SNAPSHOT_PATH", "/tmp/board.json"),
        ])
        .unwrap();
        assert_eq!(config.ws_url, "wss://chess.example/ws/chess/");
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/board.json")));
    }

    #[test]
    fn test_rejects_http_url() {
        assert!(matches!(
            load(&[("CHESS_WS_URL", "http://localhost:8000")]),
            Err(ClientError::Config(_))
        ));
    }
}
