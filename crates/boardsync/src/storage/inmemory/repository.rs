use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use boardsync_core::board::KanbanItem;
use boardsync_core::storage::{FieldChanges, KeyedStore, RepositoryError, Result};

/// In-memory keyed store.
///
/// Items live in a `BTreeMap` keyed by `(pk, sk)` behind a `tokio` RwLock,
/// so prefix queries come from the map's ordering and the atomic move is a
/// single write-lock scope. Data is lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    items: Arc<RwLock<BTreeMap<(String, String), KanbanItem>>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyedStore for InMemoryStore {
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<KanbanItem>> {
        let items = self.items.read().await;
        Ok(items.get(&(pk.to_string(), sk.to_string())).cloned())
    }

    async fn put(&self, item: &KanbanItem) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert((item.pk(), item.sk()), item.clone());
        Ok(())
    }

    async fn query(&self, pk: &str, sk_prefix: Option<&str>) -> Result<Vec<KanbanItem>> {
        let items = self.items.read().await;
        let start = (pk.to_string(), String::new());
        let matches = items
            .range(start..)
            .take_while(|((item_pk, _), _)| item_pk == pk)
            .filter(|((_, sk), _)| sk_prefix.is_none_or(|prefix| sk.starts_with(prefix)))
            .map(|(_, item)| item.clone())
            .collect();
        Ok(matches)
    }

    async fn update(&self, pk: &str, sk: &str, changes: &FieldChanges) -> Result<KanbanItem> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(&(pk.to_string(), sk.to_string()))
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Item",
                id: format!("{pk}/{sk}"),
            })?;

        changes.apply_to(item);
        Ok(item.clone())
    }

    async fn delete(&self, pk: &str, sk: &str) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(&(pk.to_string(), sk.to_string()));
        Ok(())
    }

    async fn move_item(&self, old_pk: &str, old_sk: &str, item: &KanbanItem) -> Result<()> {
        // One write-lock scope: readers never observe the intermediate state.
        let mut items = self.items.write().await;

        if !items.contains_key(&(old_pk.to_string(), old_sk.to_string())) {
            return Err(RepositoryError::NotFound {
                entity_type: "Item",
                id: format!("{old_pk}/{old_sk}"),
            });
        }

        items.insert((item.pk(), item.sk()), item.clone());
        items.remove(&(old_pk.to_string(), old_sk.to_string()));
        Ok(())
    }
}
