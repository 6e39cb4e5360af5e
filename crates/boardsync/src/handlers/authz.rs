//! Ownership-chain checks for nested resources.
//!
//! Boards are keyed under their owner, so fetching a board under the
//! caller's partition is both the existence check and the ownership check:
//! a miss is indistinguishable from someone else's board and is reported as
//! access denied on nested routes.

use uuid::Uuid;

use boardsync_core::auth::UserContext;
use boardsync_core::board::{BoardItem, KanbanItem, ListItem};
use boardsync_core::storage::{keys, KeyedStore};

use crate::error::ApiError;

/// Verifies that the board exists and belongs to the caller.
pub async fn verify_board_access(
    store: &dyn KeyedStore,
    user: &UserContext,
    board_id: Uuid,
) -> Result<BoardItem, ApiError> {
    let item = store
        .get(&keys::user_pk(&user.user_id), &keys::board_sk(board_id))
        .await?;

    match item {
        Some(KanbanItem::Board(board)) => Ok(board),
        _ => {
            tracing::warn!(board_id = %board_id, user = %user.user_id, "board not found or access denied");
            Err(ApiError::AccessDenied)
        }
    }
}

/// Verifies that the list exists within the board.
pub async fn verify_list_exists(
    store: &dyn KeyedStore,
    board_id: Uuid,
    list_id: Uuid,
) -> Result<ListItem, ApiError> {
    let item = store
        .get(&keys::board_pk(board_id), &keys::list_sk(list_id))
        .await?;

    match item {
        Some(KanbanItem::List(list)) => Ok(list),
        _ => Err(ApiError::NotFound("List")),
    }
}
