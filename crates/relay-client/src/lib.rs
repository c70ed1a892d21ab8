//! Terminal chess client that relays moves to a validator over WebSocket and
//! runs castling, en passant, promotion and check highlighting locally.

pub mod choreographer;
pub mod config;
pub mod error;
pub mod event_loop;
pub mod gesture;
pub mod session;
pub mod store;
pub mod transport;

pub use choreographer::{DropOutcome, MoveChoreographer, Phase, VerdictOutcome};
pub use config::ClientConfig;
pub use error::ClientError;
pub use gesture::Gesture;
pub use session::GameSession;
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
pub use transport::{connect, MoveTransport, VerdictStream, WsTransport};
