use chess_validator::{serve, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file for local dev
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Validator listening on {} ({})", addr, config.ws_path);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve(listener, &config).await?;

    Ok(())
}
