//! The single cooperative loop: gestures in, verdicts in, board out.

use chess_core::Board;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::choreographer::MoveChoreographer;
use crate::gesture::Gesture;
use crate::store::SnapshotStore;
use crate::transport::{MoveTransport, VerdictStream};

/// Drive `choreographer` until the gesture channel closes. `on_change` sees
/// the board after every gesture and verdict.
pub async fn run<T, S>(
    choreographer: &mut MoveChoreographer<T, S>,
    verdicts: &mut VerdictStream,
    gestures: &mut mpsc::UnboundedReceiver<Gesture>,
    mut on_change: impl FnMut(&Board),
) where
    T: MoveTransport,
    S: SnapshotStore,
{
    let mut connected = true;
    loop {
        tokio::select! {
            gesture = gestures.recv() => match gesture {
                Some(gesture) => {
                    if let Err(e) = choreographer.apply(gesture) {
                        warn!(error = %e, ?gesture, "Gesture not applied");
                    }
                    on_change(choreographer.board());
                }
                None => {
                    info!("Input closed");
                    break;
                }
            },
            verdict = verdicts.next_verdict(), if connected => match verdict {
                Some(Ok(verdict)) => {
                    choreographer.handle_verdict(verdict);
                    on_change(choreographer.board());
                }
                Some(Err(e)) => error!(error = %e, "Bad frame from validator"),
                None => {
                    warn!("Validator closed the connection");
                    connected = false;
                }
            },
        }
    }
}
