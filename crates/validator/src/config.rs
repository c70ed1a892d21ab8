use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Route serving chess sessions
    pub ws_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            ws_path: normalize_path(
                &env::var("CHESS_WS_PATH").unwrap_or_else(|_| "/ws/chess/".to_string()),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            ws_path: "/ws/chess/".to_string(),
        }
    }
}

/// Routes must start with a slash.
fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/ws/chess/"), "/ws/chess/");
        assert_eq!(normalize_path("ws/chess/"), "/ws/chess/");
    }
}
