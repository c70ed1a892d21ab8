#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use chess_core::Board;
use chess_validator::Config;
use relay_client::{connect, MemoryStore, MoveChoreographer, VerdictStream, WsTransport};
use reqwest::Client;
use tokio::net::TcpListener;

pub const VERDICT_TIMEOUT: Duration = Duration::from_secs(5);

pub type Choreographer = MoveChoreographer<WsTransport, MemoryStore>;

/// Start a validator on an ephemeral port.
pub async fn spawn_validator() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let config = Config::default();
        chess_validator::serve(listener, &config).await.unwrap();
    });
    addr
}

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

pub fn http_url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

pub fn ws_url(addr: SocketAddr) -> String {
    format!("ws://{}{}", addr, Config::default().ws_path)
}

/// Fresh validator plus a client on the standard board.
pub async fn session() -> (Choreographer, VerdictStream) {
    let addr = spawn_validator().await;
    let (transport, verdicts) = connect(&ws_url(addr)).await.unwrap();
    (
        MoveChoreographer::new(Board::standard(), transport, MemoryStore::new()),
        verdicts,
    )
}

/// Feed verdicts to the choreographer until nothing is outstanding.
pub async fn settle(choreographer: &mut Choreographer, verdicts: &mut VerdictStream) {
    while choreographer.outstanding() > 0 {
        let verdict = tokio::time::timeout(VERDICT_TIMEOUT, verdicts.next_verdict())
            .await
            .expect("validator did not answer in time")
            .expect("validator closed the connection")
            .unwrap();
        choreographer.handle_verdict(verdict);
    }
}

/// Drag, hover and drop one move, then wait for the validator.
pub async fn play(
    choreographer: &mut Choreographer,
    verdicts: &mut VerdictStream,
    from: &str,
    to: &str,
) {
    let (from, to) = (from.parse().unwrap(), to.parse().unwrap());
    choreographer.drag_started(from).unwrap();
    choreographer.drag_entered(to).unwrap();
    choreographer.drop(to).unwrap();
    settle(choreographer, verdicts).await;
}
