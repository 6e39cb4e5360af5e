//! Kanban domain: boards, lists and cards.

mod error;
mod requests;
mod types;

pub use error::ValidationError;
pub use requests::{
    CreateBoard, CreateCard, CreateList, UpdateBoard, UpdateCard, UpdateList, BOARD_DESCRIPTION_MAX,
    BOARD_TITLE_MAX, CARD_DESCRIPTION_MAX, CARD_STATUS_MAX, CARD_TITLE_MAX, LIST_TITLE_MAX,
};
pub use types::{
    BoardItem, BoardResponse, CardItem, CardResponse, ItemType, KanbanItem, ListItem, ListResponse,
};
