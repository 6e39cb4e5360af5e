//! Update expression construction.
//!
//! Builds a `SET` expression from a sparse `FieldChanges`, using attribute
//! name placeholders throughout (`status` and `order` are reserved words).

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use boardsync_core::storage::FieldChanges;

pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// Builds the update expression for the fields present in `changes`.
/// Returns `None` when there is nothing to set.
pub fn build_update_expression(changes: &FieldChanges) -> Option<UpdateExpression> {
    let mut assignments: Vec<String> = Vec::new();
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    let mut set = |field: &str, value: AttributeValue| {
        assignments.push(format!("#{field} = :{field}"));
        names.insert(format!("#{field}"), field.to_string());
        values.insert(format!(":{field}"), value);
    };

    if let Some(title) = &changes.title {
        set("title", AttributeValue::S(title.clone()));
    }
    if let Some(description) = &changes.description {
        set("description", AttributeValue::S(description.clone()));
    }
    if let Some(status) = &changes.status {
        set("status", AttributeValue::S(status.clone()));
    }
    if let Some(order) = changes.order {
        set("order", AttributeValue::N(order.to_string()));
    }
    if let Some(updated_at) = changes.updated_at {
        set("updatedAt", AttributeValue::S(updated_at.to_rfc3339()));
    }

    if assignments.is_empty() {
        return None;
    }

    Some(UpdateExpression {
        expression: format!("SET {}", assignments.join(", ")),
        names,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_changes_build_nothing() {
        assert!(build_update_expression(&FieldChanges::new()).is_none());
    }

    #[test]
    fn test_single_field() {
        let changes = FieldChanges::new().title(Some("New title".to_string()));
        let built = build_update_expression(&changes).unwrap();

        assert_eq!(built.expression, "SET #title = :title");
        assert_eq!(built.names.get("#title").unwrap(), "title");
        assert_eq!(
            built.values.get(":title").unwrap().as_s().unwrap(),
            "New title"
        );
    }

    #[test]
    fn test_all_fields_with_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let changes = FieldChanges::new()
            .title(Some("t".to_string()))
            .description(Some("d".to_string()))
            .status(Some("done".to_string()))
            .order(Some(3))
            .touched(at);
        let built = build_update_expression(&changes).unwrap();

        assert_eq!(
            built.expression,
            "SET #title = :title, #description = :description, \
             #status = :status, #order = :order, #updatedAt = :updatedAt"
        );
        assert_eq!(built.values.get(":order").unwrap().as_n().unwrap(), "3");
        assert_eq!(
            built.values.get(":updatedAt").unwrap().as_s().unwrap(),
            &at.to_rfc3339()
        );
        // Reserved words go through name placeholders.
        assert_eq!(built.names.get("#status").unwrap(), "status");
        assert_eq!(built.names.get("#order").unwrap(), "order");
    }

    #[test]
    fn test_timestamp_only_still_builds() {
        let changes = FieldChanges::new().touched(Utc::now());
        let built = build_update_expression(&changes).unwrap();
        assert_eq!(built.expression, "SET #updatedAt = :updatedAt");
    }
}
