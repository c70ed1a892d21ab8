//! Move validator for chess sessions: judges each move request against the
//! rules and answers with a verdict on the same socket.

pub mod config;
pub mod error;
pub mod routes;
pub mod rules;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use config::Config;
pub use error::JudgeError;
pub use rules::GameJudge;

pub fn app(config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(&config.ws_path, get(routes::chess_ws::ws_handler))
        .layer(cors)
}

pub async fn serve(listener: TcpListener, config: &Config) -> std::io::Result<()> {
    axum::serve(listener, app(config)).await
}
