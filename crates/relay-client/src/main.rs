//! Chess relay client
//!
//! Reads gestures from stdin, relays moves to the validator and prints the
//! board after every change.

use chess_core::{Board, UnicodeGlyphs};
use relay_client::gesture::parse_line;
use relay_client::{
    connect, event_loop, ClientConfig, JsonFileStore, MemoryStore, MoveChoreographer,
    SnapshotStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env file for local dev
    dotenvy::dotenv().ok();

    // Board goes to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_client(config))
}

async fn run_client(config: ClientConfig) -> anyhow::Result<()> {
    let store: Box<dyn SnapshotStore> = match &config.snapshot_path {
        Some(path) => {
            info!(path = %path.display(), "Saving boards to file");
            Box::new(JsonFileStore::new(path))
        }
        None => Box::new(MemoryStore::new()),
    };

    let (transport, mut verdicts) = connect(&config.ws_url).await?;
    let mut choreographer = MoveChoreographer::new(Board::standard(), transport, store);

    let (gesture_tx, mut gestures) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_line(&line) {
                Ok(parsed) => {
                    for gesture in parsed {
                        if gesture_tx.send(gesture).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => warn!(error = %e, "Could not read gesture"),
            }
        }
    });

    print_board(choreographer.board());
    event_loop::run(&mut choreographer, &mut verdicts, &mut gestures, print_board).await;
    Ok(())
}

fn print_board(board: &Board) {
    println!("{}", board.render(&UnicodeGlyphs));
}
