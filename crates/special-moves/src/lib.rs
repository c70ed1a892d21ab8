//! Client-side special-move rules.
//!
//! Castling eligibility and execution, en passant removal, the rook-line check
//! scan, the promotion selection flow and the checkmate banner. None of this
//! decides legality: the validator's verdict does. These components only keep
//! the rendered board in step with it.

pub mod castling;
pub mod check_scan;
pub mod checkmate;
pub mod en_passant;
pub mod engine;
pub mod promotion;

pub use castling::{CastleOutcome, CastlePlan, CastleSide};
pub use engine::RulesEngine;
pub use promotion::{
    CandidateHandler, PromotionChoice, PromotionFlow, PromotionOutcome, SuspendedPromotion,
};
