//! Key generation functions for the single-table design.
//!
//! Pure functions for generating partition and sort keys. All functions are
//! sync and have no side effects.

use uuid::Uuid;

// ============================================================================
// Key prefixes
// ============================================================================

pub const USER_PREFIX: &str = "USER#";
pub const BOARD_PREFIX: &str = "BOARD#";
pub const LIST_PREFIX: &str = "LIST#";
pub const CARD_PREFIX: &str = "CARD#";

// ============================================================================
// Board keys
// ============================================================================

/// Generate the partition key scoping a user's boards.
///
/// Pattern: `USER#<user_id>`
pub fn user_pk(user_id: &str) -> String {
    format!("{USER_PREFIX}{user_id}")
}

/// Generate the sort key for a Board.
///
/// Pattern: `BOARD#<board_id>`
pub fn board_sk(board_id: Uuid) -> String {
    format!("{BOARD_PREFIX}{board_id}")
}

// ============================================================================
// List keys
// ============================================================================

/// Generate the partition key scoping a board's lists.
///
/// Pattern: `BOARD#<board_id>` (same shape as the board sort key)
pub fn board_pk(board_id: Uuid) -> String {
    format!("{BOARD_PREFIX}{board_id}")
}

/// Generate the sort key for a List.
///
/// Pattern: `LIST#<list_id>`
pub fn list_sk(list_id: Uuid) -> String {
    format!("{LIST_PREFIX}{list_id}")
}

// ============================================================================
// Card keys
// ============================================================================

/// Generate the partition key scoping a list's cards.
///
/// Pattern: `LIST#<list_id>` (same shape as the list sort key)
pub fn list_pk(list_id: Uuid) -> String {
    format!("{LIST_PREFIX}{list_id}")
}

/// Generate the sort key for a Card.
///
/// Pattern: `CARD#<card_id>`
pub fn card_sk(card_id: Uuid) -> String {
    format!("{CARD_PREFIX}{card_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_pk() {
        assert_eq!(user_pk("abc-123"), "USER#abc-123");
    }

    #[test]
    fn test_user_pk_keeps_opaque_subjects() {
        // OIDC subjects can contain separators of their own.
        assert_eq!(user_pk("google|4711"), "USER#google|4711");
    }

    #[test]
    fn test_board_keys() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap();
        assert_eq!(board_sk(id), "BOARD#550e8400-e29b-41d4-a716-446655440002");
        assert_eq!(board_pk(id), board_sk(id));
    }

    #[test]
    fn test_list_keys() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap();
        assert_eq!(list_sk(id), "LIST#550e8400-e29b-41d4-a716-446655440003");
        assert_eq!(list_pk(id), list_sk(id));
    }

    #[test]
    fn test_card_sk() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap();
        assert_eq!(card_sk(id), "CARD#550e8400-e29b-41d4-a716-446655440004");
    }

    #[test]
    fn test_prefixes_match_generated_keys() {
        let id = Uuid::new_v4();
        assert!(board_sk(id).starts_with(BOARD_PREFIX));
        assert!(list_sk(id).starts_with(LIST_PREFIX));
        assert!(card_sk(id).starts_with(CARD_PREFIX));
        assert!(user_pk("u").starts_with(USER_PREFIX));
    }
}
