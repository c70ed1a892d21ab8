//! Client error types

use chess_core::BoardError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Connection is not open; move not sent")]
    NotOpen,

    #[error("Gesture error: {0}")]
    Gesture(String),

    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    #[error("Snapshot store error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

impl ClientError {
    /// Errors that mean the request never reached the validator.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::NotOpen | ClientError::WebSocket(_)
        )
    }
}
