use deskboard_domain::{CardField, CardId};

/// Broadcast to every view of the engine so all copies of a card patch
/// identically and failures surface where the user can see them.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A poll merged new server state.
    BoardRefreshed,
    /// An optimistic edit was applied locally.
    CardPatched { card_id: CardId, field: CardField },
    /// A write failed and the optimistic value was rolled back.
    WriteFailed {
        card_id: CardId,
        field: CardField,
        message: String,
    },
    /// A card move request failed; the next poll restores server truth.
    MoveFailed { card_id: CardId, message: String },
}
