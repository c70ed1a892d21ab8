//! Piece code → renderable glyph lookup.

use crate::piece::Piece;

pub trait GlyphResolver {
    /// Glyph for a two-character piece code, if one is known.
    fn glyph(&self, code: &str) -> Option<&str>;
}

/// Unicode chess symbols.
pub struct UnicodeGlyphs;

impl GlyphResolver for UnicodeGlyphs {
    fn glyph(&self, code: &str) -> Option<&str> {
        let glyph = match code {
            "WK" => "♔",
            "WQ" => "♕",
            "WR" => "♖",
            "WB" => "♗",
            "WH" => "♘",
            "WP" => "♙",
            "BK" => "♚",
            "BQ" => "♛",
            "BR" => "♜",
            "BB" => "♝",
            "BH" => "♞",
            "BP" => "♟",
            _ => return None,
        };
        Some(glyph)
    }
}

/// Look up a glyph, logging when the resolver has none.
pub fn resolve(resolver: &dyn GlyphResolver, piece: Piece) -> Option<&str> {
    let code = piece.code();
    let glyph = resolver.glyph(&code);
    if glyph.is_none() {
        tracing::warn!(code = %code, "No glyph for piece");
    }
    glyph
}
