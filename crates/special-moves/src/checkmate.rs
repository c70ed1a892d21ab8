use chess_core::{Board, Color};

pub fn banner_text(winner: Color) -> String {
    let label = winner.label();
    let mut chars = label.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{capitalized} won by checkmate, you can play again by pressing reset button")
}

/// Freeze the board and post the result. Only a reset brings it back.
pub fn announce(board: &mut Board, winner: Color) {
    tracing::info!(winner = winner.label(), "Checkmate");
    board.disable_interaction();
    board.set_banner(banner_text(winner));
}
