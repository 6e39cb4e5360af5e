use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use boardsync_auth::CurrentUser;
use boardsync_core::board::{CardItem, CardResponse, CreateCard, KanbanItem, UpdateCard};
use boardsync_core::storage::{keys, FieldChanges, RepositoryError};

use crate::{
    error::ApiError,
    handlers::authz::{verify_board_access, verify_list_exists},
    response::{created, success},
    state::AppState,
};

/// Status assigned to new cards.
const DEFAULT_STATUS: &str = "open";

/// List the list's cards, ordered (GET .../lists/{listId}/cards).
pub async fn list_cards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    verify_board_access(state.store.as_ref(), &user, board_id).await?;
    verify_list_exists(state.store.as_ref(), board_id, list_id).await?;

    let items = state
        .store
        .query(&keys::list_pk(list_id), Some(keys::CARD_PREFIX))
        .await?;

    let mut cards: Vec<CardResponse> = items
        .iter()
        .filter_map(KanbanItem::as_card)
        .map(CardResponse::from)
        .collect();
    cards.sort_by_key(|card| card.order);

    Ok(success(cards))
}

/// Create a card in a list (POST .../lists/{listId}/cards).
pub async fn create_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CreateCard>,
) -> Result<Response, ApiError> {
    verify_board_access(state.store.as_ref(), &user, board_id).await?;
    verify_list_exists(state.store.as_ref(), board_id, list_id).await?;
    payload.validate()?;

    let order = match payload.order {
        Some(order) => order,
        None => {
            let siblings = state
                .store
                .query(&keys::list_pk(list_id), Some(keys::CARD_PREFIX))
                .await?;
            siblings.len() as i64
        }
    };

    let now = Utc::now();
    let card = CardItem {
        id: Uuid::new_v4(),
        list_id,
        title: payload.title,
        description: payload.description,
        status: DEFAULT_STATUS.to_string(),
        order,
        created_at: now,
        updated_at: now,
    };

    state.store.put(&KanbanItem::Card(card.clone())).await?;

    tracing::info!(list_id = %list_id, card_id = %card.id, "created card");

    Ok(created(CardResponse::from(&card)))
}

/// Update a card, possibly moving it to another list
/// (PUT .../cards/{cardId}).
pub async fn update_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((board_id, list_id, card_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(payload): Json<UpdateCard>,
) -> Result<Response, ApiError> {
    verify_board_access(state.store.as_ref(), &user, board_id).await?;
    verify_list_exists(state.store.as_ref(), board_id, list_id).await?;
    payload.validate()?;

    let existing = state
        .store
        .get(&keys::list_pk(list_id), &keys::card_sk(card_id))
        .await?;
    let Some(KanbanItem::Card(existing)) = existing else {
        return Err(ApiError::NotFound("Card"));
    };

    // A different target list moves the card.
    if let Some(target_list_id) = payload.list_id {
        if target_list_id != list_id {
            return move_card(&state, board_id, existing, target_list_id, payload).await;
        }
    }

    let changes = FieldChanges::new()
        .title(payload.title)
        .description(payload.description)
        .status(payload.status)
        .order(payload.order)
        .touched(Utc::now());

    let updated = state
        .store
        .update(&keys::list_pk(list_id), &keys::card_sk(card_id), &changes)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound { .. } => ApiError::NotFound("Card"),
            other => other.into(),
        })?;

    tracing::info!(list_id = %list_id, card_id = %card_id, "updated card");

    match updated {
        KanbanItem::Card(card) => Ok(success(CardResponse::from(&card))),
        _ => Err(ApiError::NotFound("Card")),
    }
}

/// Rewrites the card under the target list's key and removes the old record
/// in one atomic operation.
async fn move_card(
    state: &AppState,
    board_id: Uuid,
    existing: CardItem,
    target_list_id: Uuid,
    payload: UpdateCard,
) -> Result<Response, ApiError> {
    // The destination must exist in the same board.
    verify_list_exists(state.store.as_ref(), board_id, target_list_id).await?;

    let old_list_id = existing.list_id;
    let old_pk = keys::list_pk(old_list_id);
    let old_sk = keys::card_sk(existing.id);

    let moved = CardItem {
        id: existing.id,
        list_id: target_list_id,
        title: payload.title.unwrap_or(existing.title),
        description: payload.description.or(existing.description),
        status: payload.status.unwrap_or(existing.status),
        // Moved cards land at the top unless the caller places them.
        order: payload.order.unwrap_or(0),
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };

    state
        .store
        .move_item(&old_pk, &old_sk, &KanbanItem::Card(moved.clone()))
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound { .. } => ApiError::NotFound("Card"),
            other => other.into(),
        })?;

    tracing::info!(
        card_id = %moved.id,
        from = %old_list_id,
        to = %target_list_id,
        "moved card",
    );

    Ok(success(CardResponse::from(&moved)))
}

/// Delete a card (DELETE .../cards/{cardId}).
pub async fn delete_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((board_id, list_id, card_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    verify_board_access(state.store.as_ref(), &user, board_id).await?;
    verify_list_exists(state.store.as_ref(), board_id, list_id).await?;

    let list_pk = keys::list_pk(list_id);
    let card_sk = keys::card_sk(card_id);

    if state.store.get(&list_pk, &card_sk).await?.is_none() {
        return Err(ApiError::NotFound("Card"));
    }

    state.store.delete(&list_pk, &card_sk).await?;

    tracing::info!(list_id = %list_id, card_id = %card_id, "deleted card");

    Ok(success(serde_json::json!({ "deleted": true })))
}
