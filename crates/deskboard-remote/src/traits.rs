use async_trait::async_trait;
use deskboard_domain::{BoardSnapshot, CardPosition, FieldName};

use crate::error::RemoteResult;

/// The remote board service, as far as the sync engine is concerned.
///
/// Writes are fire-and-forget: success confirms nothing the UI needs
/// synchronously; the next poll is the source of truth once the
/// corresponding pending lock expires.
#[async_trait]
pub trait BoardSource: Send + Sync {
    /// One full read of the board, already normalized.
    async fn fetch_snapshot(&self) -> RemoteResult<BoardSnapshot>;

    async fn move_card(
        &self,
        card_id: &str,
        target_bucket: &str,
        position: CardPosition,
    ) -> RemoteResult<()>;

    async fn set_custom_field(
        &self,
        card_id: &str,
        field: FieldName,
        value: &str,
    ) -> RemoteResult<()>;

    async fn set_description(&self, card_id: &str, text: &str) -> RemoteResult<()>;

    async fn add_label(&self, card_id: &str, name: &str) -> RemoteResult<()>;

    async fn remove_label(&self, card_id: &str, name: &str) -> RemoteResult<()>;
}
