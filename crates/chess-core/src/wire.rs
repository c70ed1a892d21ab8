//! JSON messages exchanged with the move validator over the session socket.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::piece::{Color, Piece};

/// What finished the gesture that produced a request. Requests without one
/// are probes: the validator judges them but does not commit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Dragend,
    Click,
}

/// Client → validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub piece_moved: Piece,
    pub old_cell: Cell,
    pub new_cell: Cell,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub castle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pawn_promoted_to: Option<Piece>,
    /// Monotonic request number; validators echo it back when they can.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

impl MoveRequest {
    pub fn probe(piece_moved: Piece, old_cell: Cell, new_cell: Cell) -> Self {
        Self {
            piece_moved,
            old_cell,
            new_cell,
            event_type: None,
            castle: None,
            pawn_promoted_to: None,
            seq: None,
        }
    }

    pub fn is_commit(&self) -> bool {
        self.event_type.is_some()
    }
}

/// Validator → client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveVerdict {
    pub move_valid: bool,
    #[serde(default)]
    pub check: bool,
    #[serde(default)]
    pub checkmate: bool,
    pub processed_cell: Cell,
    #[serde(default)]
    pub en_passant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

impl MoveVerdict {
    pub fn rejected(processed_cell: Cell) -> Self {
        Self {
            move_valid: false,
            check: false,
            checkmate: false,
            processed_cell,
            en_passant: false,
            winner: None,
            seq: None,
        }
    }

    /// Winner parsed from the verdict's label, if it names a color.
    pub fn winner_color(&self) -> Option<Color> {
        self.winner.as_deref().and_then(Color::from_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let mut request = MoveRequest::probe(
            "WK".parse().unwrap(),
            "e1".parse().unwrap(),
            "g1".parse().unwrap(),
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"pieceMoved": "WK", "oldCell": "e1", "newCell": "g1"})
        );

        request.event_type = Some(EventType::Dragend);
        request.castle = Some(true);
        request.seq = Some(7);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "pieceMoved": "WK",
                "oldCell": "e1",
                "newCell": "g1",
                "eventType": "dragend",
                "castle": true,
                "seq": 7
            })
        );
    }

    #[test]
    fn test_verdict_parses_validator_output() {
        let verdict: MoveVerdict = serde_json::from_value(json!({
            "move_valid": true,
            "check": false,
            "checkmate": true,
            "processed_cell": "h7",
            "en_passant": false,
            "winner": "white"
        }))
        .unwrap();
        assert!(verdict.checkmate);
        assert_eq!(verdict.winner_color(), Some(Color::White));
        assert_eq!(verdict.seq, None);
    }

    #[test]
    fn test_unknown_winner_label_is_ignored() {
        let verdict: MoveVerdict = serde_json::from_value(json!({
            "move_valid": false,
            "processed_cell": "a1",
            "winner": "somebody"
        }))
        .unwrap();
        assert_eq!(verdict.winner_color(), None);
        assert!(!verdict.check);
    }
}
