use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::keys;

/// Discriminant for the single-table item family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Board,
    List,
    Card,
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board => write!(f, "BOARD"),
            Self::List => write!(f, "LIST"),
            Self::Card => write!(f, "CARD"),
        }
    }
}

/// A board owned by a single user.
///
/// Stored under `PK = USER#<user_id>`, `SK = BOARD#<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardItem {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A list within a board.
///
/// Stored under `PK = BOARD#<board_id>`, `SK = LIST#<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A card within a list.
///
/// Stored under `PK = LIST#<list_id>`, `SK = CARD#<id>`. Moving a card to a
/// different list rewrites the record under the new partition key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardItem {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The item family stored in the keyed item store, discriminated by
/// `itemType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "itemType")]
pub enum KanbanItem {
    #[serde(rename = "BOARD")]
    Board(BoardItem),
    #[serde(rename = "LIST")]
    List(ListItem),
    #[serde(rename = "CARD")]
    Card(CardItem),
}

impl KanbanItem {
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Board(_) => ItemType::Board,
            Self::List(_) => ItemType::List,
            Self::Card(_) => ItemType::Card,
        }
    }

    /// Partition key locating this item.
    pub fn pk(&self) -> String {
        match self {
            Self::Board(b) => keys::user_pk(&b.user_id),
            Self::List(l) => keys::board_pk(l.board_id),
            Self::Card(c) => keys::list_pk(c.list_id),
        }
    }

    /// Sort key locating this item.
    pub fn sk(&self) -> String {
        match self {
            Self::Board(b) => keys::board_sk(b.id),
            Self::List(l) => keys::list_sk(l.id),
            Self::Card(c) => keys::card_sk(c.id),
        }
    }

    /// GSI1 mirrors the primary key.
    pub fn gsi1_pk(&self) -> String {
        self.pk()
    }

    /// GSI1 mirrors the primary key.
    pub fn gsi1_sk(&self) -> String {
        self.sk()
    }

    /// Ordering hint within the parent, where the variant has one.
    pub fn order(&self) -> Option<i64> {
        match self {
            Self::Board(_) => None,
            Self::List(l) => Some(l.order),
            Self::Card(c) => Some(c.order),
        }
    }

    pub fn as_board(&self) -> Option<&BoardItem> {
        match self {
            Self::Board(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListItem> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_card(&self) -> Option<&CardItem> {
        match self {
            Self::Card(c) => Some(c),
            _ => None,
        }
    }
}

/// API shape for a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&BoardItem> for BoardResponse {
    fn from(board: &BoardItem) -> Self {
        Self {
            id: board.id,
            title: board.title.clone(),
            description: board.description.clone(),
            created_at: board.created_at,
            updated_at: board.updated_at,
        }
    }
}

/// API shape for a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ListItem> for ListResponse {
    fn from(list: &ListItem) -> Self {
        Self {
            id: list.id,
            board_id: list.board_id,
            title: list.title.clone(),
            order: list.order,
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

/// API shape for a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CardItem> for CardResponse {
    fn from(card: &CardItem) -> Self {
        Self {
            id: card.id,
            list_id: card.list_id,
            title: card.title.clone(),
            description: card.description.clone(),
            status: card.status.clone(),
            order: card.order,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}
