use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use boardsync_auth::CurrentUser;
use boardsync_core::board::{BoardItem, BoardResponse, CreateBoard, KanbanItem, UpdateBoard};
use boardsync_core::storage::{keys, FieldChanges, RepositoryError};

use crate::{
    error::ApiError,
    handlers::lists::delete_list_cascade,
    response::{created, success},
    state::AppState,
};

/// List the caller's boards (GET /api/boards).
pub async fn list_boards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
    let items = state
        .store
        .query(&keys::user_pk(&user.user_id), Some(keys::BOARD_PREFIX))
        .await?;

    let boards: Vec<BoardResponse> = items
        .iter()
        .filter_map(KanbanItem::as_board)
        .map(BoardResponse::from)
        .collect();

    Ok(success(boards))
}

/// Create a new board (POST /api/boards).
pub async fn create_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateBoard>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let now = Utc::now();
    let board = BoardItem {
        id: Uuid::new_v4(),
        user_id: user.user_id,
        title: payload.title,
        description: payload.description,
        created_at: now,
        updated_at: now,
    };

    state.store.put(&KanbanItem::Board(board.clone())).await?;

    tracing::info!(board_id = %board.id, title = %board.title, "created board");

    Ok(created(BoardResponse::from(&board)))
}

/// Get a single board (GET /api/boards/{boardId}).
pub async fn get_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(board_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let item = state
        .store
        .get(&keys::user_pk(&user.user_id), &keys::board_sk(board_id))
        .await?;

    match item {
        Some(KanbanItem::Board(board)) => Ok(success(BoardResponse::from(&board))),
        _ => Err(ApiError::NotFound("Board")),
    }
}

/// Update a board (PUT /api/boards/{boardId}).
pub async fn update_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(board_id): Path<Uuid>,
    Json(payload): Json<UpdateBoard>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let changes = FieldChanges::new()
        .title(payload.title)
        .description(payload.description)
        .touched(Utc::now());

    let updated = state
        .store
        .update(
            &keys::user_pk(&user.user_id),
            &keys::board_sk(board_id),
            &changes,
        )
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound { .. } => ApiError::NotFound("Board"),
            other => other.into(),
        })?;

    tracing::info!(board_id = %board_id, "updated board");

    match updated {
        KanbanItem::Board(board) => Ok(success(BoardResponse::from(&board))),
        _ => Err(ApiError::NotFound("Board")),
    }
}

/// Delete a board and everything in it (DELETE /api/boards/{boardId}).
pub async fn delete_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(board_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let user_pk = keys::user_pk(&user.user_id);
    let board_sk = keys::board_sk(board_id);

    if state.store.get(&user_pk, &board_sk).await?.is_none() {
        return Err(ApiError::NotFound("Board"));
    }

    // Cascade: remove the board's lists and their cards first, so a failed
    // cascade can be retried by deleting the board again.
    let lists = state
        .store
        .query(&keys::board_pk(board_id), Some(keys::LIST_PREFIX))
        .await?;
    for list in lists.iter().filter_map(KanbanItem::as_list) {
        delete_list_cascade(state.store.as_ref(), board_id, list.id).await?;
    }

    state.store.delete(&user_pk, &board_sk).await?;

    tracing::info!(board_id = %board_id, lists = lists.len(), "deleted board and its lists");

    Ok(success(serde_json::json!({ "deleted": true })))
}
