use chrono::{DateTime, Utc};

use crate::board::KanbanItem;

/// A sparse set of field assignments for a partial update.
///
/// Only fields carried by the target item's variant take effect; assignments
/// the variant has no counterpart for are ignored, matching a blind
/// attribute write in the underlying store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub order: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FieldChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn status(mut self, status: Option<String>) -> Self {
        self.status = status;
        self
    }

    pub fn order(mut self, order: Option<i64>) -> Self {
        self.order = order;
        self
    }

    /// Re-stamp `updatedAt`; every update sets this.
    pub fn touched(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// True when no field assignment is present (not counting `updatedAt`).
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.order.is_none()
    }

    /// Applies the assignments to an item in place.
    pub fn apply_to(&self, item: &mut KanbanItem) {
        match item {
            KanbanItem::Board(board) => {
                if let Some(title) = &self.title {
                    board.title = title.clone();
                }
                if let Some(description) = &self.description {
                    board.description = Some(description.clone());
                }
                if let Some(at) = self.updated_at {
                    board.updated_at = at;
                }
            }
            KanbanItem::List(list) => {
                if let Some(title) = &self.title {
                    list.title = title.clone();
                }
                if let Some(order) = self.order {
                    list.order = order;
                }
                if let Some(at) = self.updated_at {
                    list.updated_at = at;
                }
            }
            KanbanItem::Card(card) => {
                if let Some(title) = &self.title {
                    card.title = title.clone();
                }
                if let Some(description) = &self.description {
                    card.description = Some(description.clone());
                }
                if let Some(status) = &self.status {
                    card.status = status.clone();
                }
                if let Some(order) = self.order {
                    card.order = order;
                }
                if let Some(at) = self.updated_at {
                    card.updated_at = at;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CardItem;
    use uuid::Uuid;

    fn sample_card() -> KanbanItem {
        let now = Utc::now();
        KanbanItem::Card(CardItem {
            id: Uuid::new_v4(),
            list_id: Uuid::new_v4(),
            title: "Original".to_string(),
            description: Some("Keep me".to_string()),
            status: "open".to_string(),
            order: 1,
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn absent_fields_stay_unchanged() {
        let mut item = sample_card();
        let later = Utc::now() + chrono::Duration::seconds(5);

        FieldChanges::new()
            .status(Some("done".to_string()))
            .touched(later)
            .apply_to(&mut item);

        let card = item.as_card().unwrap();
        assert_eq!(card.title, "Original");
        assert_eq!(card.description.as_deref(), Some("Keep me"));
        assert_eq!(card.status, "done");
        assert_eq!(card.updated_at, later);
    }

    #[test]
    fn assignments_without_counterpart_are_ignored() {
        let now = Utc::now();
        let mut item = KanbanItem::List(crate::board::ListItem {
            id: Uuid::new_v4(),
            board_id: Uuid::new_v4(),
            title: "Doing".to_string(),
            order: 0,
            created_at: now,
            updated_at: now,
        });
        let before = item.clone();

        // Lists carry no description or status.
        FieldChanges::new()
            .description(Some("ignored".to_string()))
            .status(Some("ignored".to_string()))
            .apply_to(&mut item);

        assert_eq!(item, before);
    }

    #[test]
    fn is_empty_ignores_timestamp() {
        assert!(FieldChanges::new().touched(Utc::now()).is_empty());
        assert!(!FieldChanges::new().title(Some("t".to_string())).is_empty());
    }
}
