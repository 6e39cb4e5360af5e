use async_trait::async_trait;

use crate::board::KanbanItem;

use super::{FieldChanges, Result};

/// Generic persistence over a two-attribute key with an ordered secondary
/// index. Backends implement this against DynamoDB or an in-memory map.
#[async_trait]
pub trait KeyedStore: Send + Sync {
    /// Returns the single item at the exact key, or `None` when absent.
    /// Absence is never an error.
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<KanbanItem>>;

    /// Full replace/insert at the item's own key. No optimistic concurrency
    /// check.
    async fn put(&self, item: &KanbanItem) -> Result<()>;

    /// All items sharing `pk`, optionally filtered to sort keys beginning
    /// with `sk_prefix`. Returns an empty vec, never an error, when nothing
    /// matches.
    async fn query(&self, pk: &str, sk_prefix: Option<&str>) -> Result<Vec<KanbanItem>>;

    /// Applies a sparse set of field assignments to an existing item and
    /// returns the full updated item. Fails with `NotFound` when no item
    /// exists at the key.
    async fn update(&self, pk: &str, sk: &str, changes: &FieldChanges) -> Result<KanbanItem>;

    /// Removes an item. Idempotent: deleting an absent key is not an error.
    async fn delete(&self, pk: &str, sk: &str) -> Result<()>;

    /// Atomically writes `item` under its own key and removes the record at
    /// `(old_pk, old_sk)`. Fails with `NotFound` when the old record is
    /// absent, leaving nothing written. Used for moving a card between
    /// lists without a partial-failure window.
    async fn move_item(&self, old_pk: &str, old_sk: &str, item: &KanbanItem) -> Result<()>;
}
