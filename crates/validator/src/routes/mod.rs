pub mod chess_ws;
pub mod health;
