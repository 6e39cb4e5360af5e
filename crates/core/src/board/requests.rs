//! Request payloads and their validation rules.
//!
//! Validation happens before any storage call: a malformed body never
//! reaches the item store.

use serde::Deserialize;
use uuid::Uuid;

use super::ValidationError;

pub const BOARD_TITLE_MAX: usize = 100;
pub const BOARD_DESCRIPTION_MAX: usize = 500;
pub const LIST_TITLE_MAX: usize = 100;
pub const CARD_TITLE_MAX: usize = 200;
pub const CARD_DESCRIPTION_MAX: usize = 1000;
pub const CARD_STATUS_MAX: usize = 50;

fn require_title(title: &str, max: usize) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::Required { field: "title" });
    }
    check_len("title", title, max)
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn check_order(order: Option<i64>) -> Result<(), ValidationError> {
    match order {
        Some(n) if n < 0 => Err(ValidationError::Negative { field: "order" }),
        _ => Ok(()),
    }
}

/// Payload for `POST /api/boards`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoard {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateBoard {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_title(&self.title, BOARD_TITLE_MAX)?;
        if let Some(description) = &self.description {
            check_len("description", description, BOARD_DESCRIPTION_MAX)?;
        }
        Ok(())
    }
}

/// Payload for `PUT /api/boards/{boardId}`. All fields optional; absent
/// fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoard {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateBoard {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require_title(title, BOARD_TITLE_MAX)?;
        }
        if let Some(description) = &self.description {
            check_len("description", description, BOARD_DESCRIPTION_MAX)?;
        }
        Ok(())
    }
}

/// Payload for `POST .../lists`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateList {
    pub title: String,
    #[serde(default)]
    pub order: Option<i64>,
}

impl CreateList {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_title(&self.title, LIST_TITLE_MAX)?;
        check_order(self.order)
    }
}

/// Payload for `PUT .../lists/{listId}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateList {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl UpdateList {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require_title(title, LIST_TITLE_MAX)?;
        }
        check_order(self.order)
    }
}

/// Payload for `POST .../cards`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCard {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl CreateCard {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_title(&self.title, CARD_TITLE_MAX)?;
        if let Some(description) = &self.description {
            check_len("description", description, CARD_DESCRIPTION_MAX)?;
        }
        check_order(self.order)
    }
}

/// Payload for `PUT .../cards/{cardId}`.
///
/// A `listId` differing from the path moves the card to that list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCard {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub list_id: Option<Uuid>,
}

impl UpdateCard {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require_title(title, CARD_TITLE_MAX)?;
        }
        if let Some(description) = &self.description {
            check_len("description", description, CARD_DESCRIPTION_MAX)?;
        }
        if let Some(status) = &self.status {
            check_len("status", status, CARD_STATUS_MAX)?;
        }
        check_order(self.order)
    }
}
