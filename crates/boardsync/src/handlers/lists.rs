use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use boardsync_auth::CurrentUser;
use boardsync_core::board::{CreateList, KanbanItem, ListItem, ListResponse, UpdateList};
use boardsync_core::storage::{keys, FieldChanges, KeyedStore, RepositoryError};

use crate::{
    error::ApiError,
    handlers::authz::{verify_board_access, verify_list_exists},
    response::{created, success},
    state::AppState,
};

/// List the board's lists, ordered (GET /api/boards/{boardId}/lists).
pub async fn list_lists(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(board_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    verify_board_access(state.store.as_ref(), &user, board_id).await?;

    let items = state
        .store
        .query(&keys::board_pk(board_id), Some(keys::LIST_PREFIX))
        .await?;

    let mut lists: Vec<ListResponse> = items
        .iter()
        .filter_map(KanbanItem::as_list)
        .map(ListResponse::from)
        .collect();
    lists.sort_by_key(|list| list.order);

    Ok(success(lists))
}

/// Create a list in a board (POST /api/boards/{boardId}/lists).
pub async fn create_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(board_id): Path<Uuid>,
    Json(payload): Json<CreateList>,
) -> Result<Response, ApiError> {
    verify_board_access(state.store.as_ref(), &user, board_id).await?;
    payload.validate()?;

    // Default order is the current sibling count; an approximation, not
    // max+1, so duplicates can appear after deletions.
    let order = match payload.order {
        Some(order) => order,
        None => {
            let siblings = state
                .store
                .query(&keys::board_pk(board_id), Some(keys::LIST_PREFIX))
                .await?;
            siblings.len() as i64
        }
    };

    let now = Utc::now();
    let list = ListItem {
        id: Uuid::new_v4(),
        board_id,
        title: payload.title,
        order,
        created_at: now,
        updated_at: now,
    };

    state.store.put(&KanbanItem::List(list.clone())).await?;

    tracing::info!(board_id = %board_id, list_id = %list.id, "created list");

    Ok(created(ListResponse::from(&list)))
}

/// Update a list (PUT /api/boards/{boardId}/lists/{listId}).
pub async fn update_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateList>,
) -> Result<Response, ApiError> {
    verify_board_access(state.store.as_ref(), &user, board_id).await?;
    payload.validate()?;

    let changes = FieldChanges::new()
        .title(payload.title)
        .order(payload.order)
        .touched(Utc::now());

    let updated = state
        .store
        .update(&keys::board_pk(board_id), &keys::list_sk(list_id), &changes)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound { .. } => ApiError::NotFound("List"),
            other => other.into(),
        })?;

    tracing::info!(board_id = %board_id, list_id = %list_id, "updated list");

    match updated {
        KanbanItem::List(list) => Ok(success(ListResponse::from(&list))),
        _ => Err(ApiError::NotFound("List")),
    }
}

/// Delete a list and its cards (DELETE /api/boards/{boardId}/lists/{listId}).
pub async fn delete_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    verify_board_access(state.store.as_ref(), &user, board_id).await?;
    verify_list_exists(state.store.as_ref(), board_id, list_id).await?;

    delete_list_cascade(state.store.as_ref(), board_id, list_id).await?;

    tracing::info!(board_id = %board_id, list_id = %list_id, "deleted list and its cards");

    Ok(success(serde_json::json!({ "deleted": true })))
}

/// Removes a list's cards, then the list itself. Card deletes run first so
/// a failure part-way leaves a retryable state.
pub(crate) async fn delete_list_cascade(
    store: &dyn KeyedStore,
    board_id: Uuid,
    list_id: Uuid,
) -> Result<(), ApiError> {
    let list_pk = keys::list_pk(list_id);
    let cards = store.query(&list_pk, Some(keys::CARD_PREFIX)).await?;
    for card in cards.iter().filter_map(KanbanItem::as_card) {
        store.delete(&list_pk, &keys::card_sk(card.id)).await?;
    }

    store
        .delete(&keys::board_pk(board_id), &keys::list_sk(list_id))
        .await?;

    Ok(())
}
