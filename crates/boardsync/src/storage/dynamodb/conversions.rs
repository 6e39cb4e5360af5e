//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! domain types. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use boardsync_core::board::{BoardItem, CardItem, KanbanItem, ListItem};
use boardsync_core::storage::RepositoryError;

// ============================================================================
// Entity type constants
// ============================================================================

pub const ITEM_TYPE_BOARD: &str = "BOARD";
pub const ITEM_TYPE_LIST: &str = "LIST";
pub const ITEM_TYPE_CARD: &str = "CARD";

// ============================================================================
// Item conversions
// ============================================================================

/// Convert a KanbanItem to a DynamoDB item.
pub fn kanban_to_item(item: &KanbanItem) -> HashMap<String, AttributeValue> {
    let mut attrs = HashMap::new();

    // Keys; GSI1 mirrors the primary key.
    attrs.insert("PK".to_string(), AttributeValue::S(item.pk()));
    attrs.insert("SK".to_string(), AttributeValue::S(item.sk()));
    attrs.insert("GSI1PK".to_string(), AttributeValue::S(item.gsi1_pk()));
    attrs.insert("GSI1SK".to_string(), AttributeValue::S(item.gsi1_sk()));

    match item {
        KanbanItem::Board(board) => {
            attrs.insert(
                "itemType".to_string(),
                AttributeValue::S(ITEM_TYPE_BOARD.to_string()),
            );
            attrs.insert("id".to_string(), AttributeValue::S(board.id.to_string()));
            attrs.insert(
                "userId".to_string(),
                AttributeValue::S(board.user_id.clone()),
            );
            attrs.insert("title".to_string(), AttributeValue::S(board.title.clone()));
            if let Some(description) = &board.description {
                attrs.insert(
                    "description".to_string(),
                    AttributeValue::S(description.clone()),
                );
            }
            insert_timestamps(&mut attrs, board.created_at, board.updated_at);
        }
        KanbanItem::List(list) => {
            attrs.insert(
                "itemType".to_string(),
                AttributeValue::S(ITEM_TYPE_LIST.to_string()),
            );
            attrs.insert("id".to_string(), AttributeValue::S(list.id.to_string()));
            attrs.insert(
                "boardId".to_string(),
                AttributeValue::S(list.board_id.to_string()),
            );
            attrs.insert("title".to_string(), AttributeValue::S(list.title.clone()));
            attrs.insert(
                "order".to_string(),
                AttributeValue::N(list.order.to_string()),
            );
            insert_timestamps(&mut attrs, list.created_at, list.updated_at);
        }
        KanbanItem::Card(card) => {
            attrs.insert(
                "itemType".to_string(),
                AttributeValue::S(ITEM_TYPE_CARD.to_string()),
            );
            attrs.insert("id".to_string(), AttributeValue::S(card.id.to_string()));
            attrs.insert(
                "listId".to_string(),
                AttributeValue::S(card.list_id.to_string()),
            );
            attrs.insert("title".to_string(), AttributeValue::S(card.title.clone()));
            if let Some(description) = &card.description {
                attrs.insert(
                    "description".to_string(),
                    AttributeValue::S(description.clone()),
                );
            }
            attrs.insert("status".to_string(), AttributeValue::S(card.status.clone()));
            attrs.insert(
                "order".to_string(),
                AttributeValue::N(card.order.to_string()),
            );
            insert_timestamps(&mut attrs, card.created_at, card.updated_at);
        }
    }

    attrs
}

/// Convert a DynamoDB item to a KanbanItem, dispatching on `itemType`.
pub fn item_to_kanban(
    item: &HashMap<String, AttributeValue>,
) -> Result<KanbanItem, RepositoryError> {
    let item_type = get_string(item, "itemType")?;
    match item_type.as_str() {
        ITEM_TYPE_BOARD => Ok(KanbanItem::Board(BoardItem {
            id: get_uuid(item, "id")?,
            user_id: get_string(item, "userId")?,
            title: get_string(item, "title")?,
            description: get_optional_string(item, "description"),
            created_at: get_datetime(item, "createdAt")?,
            updated_at: get_datetime(item, "updatedAt")?,
        })),
        ITEM_TYPE_LIST => Ok(KanbanItem::List(ListItem {
            id: get_uuid(item, "id")?,
            board_id: get_uuid(item, "boardId")?,
            title: get_string(item, "title")?,
            order: get_number(item, "order")?,
            created_at: get_datetime(item, "createdAt")?,
            updated_at: get_datetime(item, "updatedAt")?,
        })),
        ITEM_TYPE_CARD => Ok(KanbanItem::Card(CardItem {
            id: get_uuid(item, "id")?,
            list_id: get_uuid(item, "listId")?,
            title: get_string(item, "title")?,
            description: get_optional_string(item, "description"),
            status: get_string(item, "status")?,
            order: get_number(item, "order")?,
            created_at: get_datetime(item, "createdAt")?,
            updated_at: get_datetime(item, "updatedAt")?,
        })),
        other => Err(RepositoryError::InvalidData(format!(
            "Unknown itemType: {other}"
        ))),
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn insert_timestamps(
    attrs: &mut HashMap<String, AttributeValue>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) {
    attrs.insert(
        "createdAt".to_string(),
        AttributeValue::S(created_at.to_rfc3339()),
    );
    attrs.insert(
        "updatedAt".to_string(),
        AttributeValue::S(updated_at.to_rfc3339()),
    );
}

/// Get a required string attribute.
fn get_string(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {key}")))
}

/// Get an optional string attribute.
fn get_optional_string(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Get a required UUID attribute.
fn get_uuid(item: &HashMap<String, AttributeValue>, key: &str) -> Result<Uuid, RepositoryError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid UUID {key}: {e}")))
}

/// Get a required integer attribute.
fn get_number(item: &HashMap<String, AttributeValue>, key: &str) -> Result<i64, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {key}")))?
        .parse::<i64>()
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid number {key}: {e}")))
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board() -> BoardItem {
        BoardItem {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap(),
            user_id: "user-sub-1".to_string(),
            title: "Sprint 1".to_string(),
            description: Some("Two week iteration".to_string()),
            created_at: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn sample_list() -> ListItem {
        ListItem {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap(),
            board_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap(),
            title: "Doing".to_string(),
            order: 1,
            created_at: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn sample_card() -> CardItem {
        CardItem {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap(),
            list_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap(),
            title: "Write tests".to_string(),
            description: None,
            status: "open".to_string(),
            order: 0,
            created_at: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_board_round_trip() {
        let board = KanbanItem::Board(sample_board());
        let attrs = kanban_to_item(&board);
        let parsed = item_to_kanban(&attrs).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_board_item_has_correct_keys() {
        let attrs = kanban_to_item(&KanbanItem::Board(sample_board()));

        assert_eq!(attrs.get("PK").unwrap().as_s().unwrap(), "USER#user-sub-1");
        assert_eq!(
            attrs.get("SK").unwrap().as_s().unwrap(),
            "BOARD#550e8400-e29b-41d4-a716-446655440002"
        );
        assert_eq!(
            attrs.get("GSI1PK").unwrap().as_s().unwrap(),
            attrs.get("PK").unwrap().as_s().unwrap()
        );
        assert_eq!(attrs.get("itemType").unwrap().as_s().unwrap(), "BOARD");
    }

    #[test]
    fn test_list_round_trip() {
        let list = KanbanItem::List(sample_list());
        let attrs = kanban_to_item(&list);
        let parsed = item_to_kanban(&attrs).unwrap();
        assert_eq!(parsed, list);
    }

    #[test]
    fn test_list_order_stored_as_number() {
        let attrs = kanban_to_item(&KanbanItem::List(sample_list()));
        assert_eq!(attrs.get("order").unwrap().as_n().unwrap(), "1");
    }

    #[test]
    fn test_card_round_trip_without_description() {
        let card = KanbanItem::Card(sample_card());
        let attrs = kanban_to_item(&card);
        assert!(!attrs.contains_key("description"));

        let parsed = item_to_kanban(&attrs).unwrap();
        assert_eq!(parsed, card);
    }

    #[test]
    fn test_unknown_item_type_is_invalid_data() {
        let mut attrs = kanban_to_item(&KanbanItem::Board(sample_board()));
        attrs.insert(
            "itemType".to_string(),
            AttributeValue::S("WIDGET".to_string()),
        );
        assert!(matches!(
            item_to_kanban(&attrs),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_field_is_invalid_data() {
        let mut attrs = kanban_to_item(&KanbanItem::Card(sample_card()));
        attrs.remove("status");
        assert!(matches!(
            item_to_kanban(&attrs),
            Err(RepositoryError::InvalidData(_))
        ));
    }
}
