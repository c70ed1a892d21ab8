//! Chess session socket. One judge per connection; every request frame gets
//! exactly one verdict frame back, in arrival order.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
};
use chess_core::{Cell, MoveRequest, MoveVerdict};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tracing::{info, warn};

use crate::rules::GameJudge;

pub async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_socket)
}

async fn handle_socket(socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let mut judge = GameJudge::new();
    info!("Chess session opened");

    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(t) => t.to_string(),
            Message::Close(_) => break,
            _ => continue,
        };

        let Some(verdict) = respond(&mut judge, &text) else {
            continue;
        };
        let json = match serde_json::to_string(&verdict) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Could not encode verdict");
                continue;
            }
        };
        if sender.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }

    info!("Chess session closed");
}

/// Verdict for one text frame, or `None` when the frame does not even say
/// which cell it was about.
pub fn respond(judge: &mut GameJudge, text: &str) -> Option<MoveVerdict> {
    match serde_json::from_str::<MoveRequest>(text) {
        Ok(request) => Some(judge.judge(&request)),
        Err(e) => {
            warn!(error = %e, "Malformed move request");
            salvage(text)
        }
    }
}

/// Rejection for a frame that failed to parse but still names its target.
fn salvage(text: &str) -> Option<MoveVerdict> {
    let value: Value = serde_json::from_str(text).ok()?;
    let cell: Cell = value.get("newCell")?.as_str()?.parse().ok()?;
    let mut verdict = MoveVerdict::rejected(cell);
    verdict.seq = value.get("seq").and_then(Value::as_u64);
    Some(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respond_to_request() {
        let mut judge = GameJudge::new();
        let verdict = respond(
            &mut judge,
            r#"{"pieceMoved":"WP","oldCell":"e2","newCell":"e4","eventType":"dragend","seq":1}"#,
        )
        .unwrap();
        assert!(verdict.move_valid);
        assert_eq!(verdict.seq, Some(1));
    }

    #[test]
    fn test_malformed_frame_is_rejected() {
        let mut judge = GameJudge::new();
        let verdict = respond(
            &mut judge,
            r#"{"pieceMoved":"XX","oldCell":"e2","newCell":"e4","seq":9}"#,
        )
        .unwrap();
        assert!(!verdict.move_valid);
        assert_eq!(verdict.processed_cell, "e4".parse().unwrap());
        assert_eq!(verdict.seq, Some(9));
    }

    #[test]
    fn test_unreadable_frame_gets_no_reply() {
        let mut judge = GameJudge::new();
        assert!(respond(&mut judge, "not json").is_none());
        assert!(respond(&mut judge, r#"{"newCell":"z0"}"#).is_none());
    }
}
