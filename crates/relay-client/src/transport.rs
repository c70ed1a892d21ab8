//! WebSocket connection to the move validator.
//!
//! Outgoing requests are queued to a writer task so the choreographer can
//! send without awaiting; verdicts are read from the other half of the socket
//! by the event loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chess_core::{MoveRequest, MoveVerdict};
use futures::stream::SplitStream;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info};

use crate::error::ClientError;

/// Outgoing half of a validator session.
pub trait MoveTransport {
    fn send(&mut self, request: &MoveRequest) -> Result<(), ClientError>;
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WsTransport {
    outbox: mpsc::UnboundedSender<Message>,
    open: Arc<AtomicBool>,
    /// Why the writer task gave up, once it has.
    failure: watch::Receiver<Option<String>>,
}

impl WsTransport {
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

impl MoveTransport for WsTransport {
    fn send(&mut self, request: &MoveRequest) -> Result<(), ClientError> {
        if !self.is_open() {
            return Err(match self.failure.borrow().clone() {
                Some(reason) => ClientError::Transport(reason),
                None => ClientError::NotOpen,
            });
        }
        let json = serde_json::to_string(request)?;
        self.outbox.send(Message::Text(json.into())).map_err(|_| {
            self.open.store(false, Ordering::Release);
            ClientError::NotOpen
        })
    }
}

/// Incoming half of a validator session.
pub struct VerdictStream {
    inbound: SplitStream<Socket>,
    open: Arc<AtomicBool>,
}

impl VerdictStream {
    /// Next verdict, skipping control frames. `None` once the socket closes.
    pub async fn next_verdict(&mut self) -> Option<Result<MoveVerdict, ClientError>> {
        loop {
            match self.inbound.next().await {
                Some(Ok(Message::Text(t))) => {
                    return Some(serde_json::from_str(t.as_str()).map_err(ClientError::from));
                }
                Some(Ok(Message::Close(_))) | None => {
                    self.open.store(false, Ordering::Release);
                    return None;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.open.store(false, Ordering::Release);
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

/// Open a session with the validator at `url`.
pub async fn connect(url: &str) -> Result<(WsTransport, VerdictStream), ClientError> {
    let (socket, _response) = tokio_tungstenite::connect_async(url).await?;
    info!(url, "Connected to validator");

    let (mut sink, inbound) = socket.split();
    let (outbox, mut queued) = mpsc::unbounded_channel::<Message>();
    let open = Arc::new(AtomicBool::new(true));
    let (failure_tx, failure) = watch::channel(None);

    let writer_open = open.clone();
    tokio::spawn(async move {
        while let Some(msg) = queued.recv().await {
            if let Err(e) = sink.send(msg).await {
                error!(error = %e, "WebSocket send failed");
                failure_tx.send_replace(Some(e.to_string()));
                writer_open.store(false, Ordering::Release);
                return;
            }
        }
        debug!("Request queue closed, closing socket");
        let _ = sink.close().await;
    });

    Ok((
        WsTransport {
            outbox,
            open: open.clone(),
            failure,
        },
        VerdictStream { inbound, open },
    ))
}
