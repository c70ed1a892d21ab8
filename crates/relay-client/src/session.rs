use chess_core::{Cell, Color, MoveRequest, MoveVerdict, Piece};

/// What the most recent verdict said, together with the request it answered.
/// Rebuilt from scratch for every verdict; nothing here is carried over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    pub winner: Option<Color>,
    pub last_moved_piece: Option<Piece>,
    pub check: bool,
    pub checkmate: bool,
    pub castle: bool,
    pub en_passant: bool,
    pub move_valid: bool,
    pub processed_cell: Option<Cell>,
    pub starting_cell: Option<Cell>,
}

impl GameSession {
    pub fn from_verdict(verdict: &MoveVerdict, request: &MoveRequest) -> Self {
        Self {
            winner: verdict.winner_color(),
            last_moved_piece: Some(request.piece_moved),
            check: verdict.check,
            checkmate: verdict.checkmate,
            castle: request.castle.unwrap_or(false),
            en_passant: verdict.en_passant,
            move_valid: verdict.move_valid,
            processed_cell: Some(verdict.processed_cell),
            starting_cell: Some(request.old_cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuilt_from_verdict() {
        let mut request = MoveRequest::probe(
            "WK".parse().unwrap(),
            "e1".parse().unwrap(),
            "g1".parse().unwrap(),
        );
        request.castle = Some(true);
        let mut verdict = MoveVerdict::rejected("g1".parse().unwrap());
        verdict.move_valid = true;
        verdict.check = true;

        let session = GameSession::from_verdict(&verdict, &request);
        assert!(session.castle);
        assert!(session.check);
        assert!(!session.checkmate);
        assert_eq!(session.starting_cell, Some("e1".parse().unwrap()));
        assert_eq!(session.last_moved_piece.map(|p| p.code()), Some("WK".to_string()));
    }
}
