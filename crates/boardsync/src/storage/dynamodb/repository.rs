//! DynamoDB keyed store implementation.

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, ReturnValue, TransactWriteItem};
use aws_sdk_dynamodb::Client;

use boardsync_core::board::KanbanItem;
use boardsync_core::storage::{FieldChanges, KeyedStore, RepositoryError, Result};

use super::conversions::{item_to_kanban, kanban_to_item};
use super::error::{
    map_connection_error, map_delete_item_error, map_get_item_error, map_put_item_error,
    map_query_error, map_transact_error, map_update_item_error,
};
use super::expressions::build_update_expression;

/// DynamoDB-backed keyed item store.
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a new store from environment configuration.
    ///
    /// Uses the AWS SDK default credential chain with bounded retries
    /// (standard mode, 3 attempts) for transient failures.
    pub async fn from_env(table_name: impl Into<String>) -> Result<Self> {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .retry_config(RetryConfig::standard().with_max_attempts(3))
            .load()
            .await;
        let client = Client::new(&config);

        Ok(Self::new(client, table_name))
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl KeyedStore for DynamoDbStore {
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<KanbanItem>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk.to_string()))
            .key("SK", AttributeValue::S(sk.to_string()))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_kanban(&item)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, item: &KanbanItem) -> Result<()> {
        let attrs = kanban_to_item(item);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attrs))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn query(&self, pk: &str, sk_prefix: Option<&str>) -> Result<Vec<KanbanItem>> {
        let mut request = self
            .client
            .query()
            .table_name(&self.table_name)
            .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()));

        request = match sk_prefix {
            Some(prefix) => request
                .key_condition_expression("PK = :pk AND begins_with(SK, :sk)")
                .expression_attribute_values(":sk", AttributeValue::S(prefix.to_string())),
            None => request.key_condition_expression("PK = :pk"),
        };

        let result = request.send().await.map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(item_to_kanban).collect()
    }

    async fn update(&self, pk: &str, sk: &str, changes: &FieldChanges) -> Result<KanbanItem> {
        let Some(built) = build_update_expression(changes) else {
            // Nothing to set; the read doubles as the existence check.
            return self.get(pk, sk).await?.ok_or(RepositoryError::NotFound {
                entity_type: "Item",
                id: format!("{pk}/{sk}"),
            });
        };

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk.to_string()))
            .key("SK", AttributeValue::S(sk.to_string()))
            .update_expression(built.expression)
            .set_expression_attribute_names(Some(built.names))
            .set_expression_attribute_values(Some(built.values))
            .condition_expression("attribute_exists(PK)")
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, "Item", format!("{pk}/{sk}")))?;

        let attrs = result
            .attributes
            .ok_or_else(|| RepositoryError::QueryFailed("Update returned no attributes".into()))?;
        item_to_kanban(&attrs)
    }

    async fn delete(&self, pk: &str, sk: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk.to_string()))
            .key("SK", AttributeValue::S(sk.to_string()))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    async fn move_item(&self, old_pk: &str, old_sk: &str, item: &KanbanItem) -> Result<()> {
        let put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(kanban_to_item(item)))
            .build()
            .map_err(map_connection_error)?;

        let delete = Delete::builder()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(old_pk.to_string()))
            .key("SK", AttributeValue::S(old_sk.to_string()))
            .condition_expression("attribute_exists(PK)")
            .build()
            .map_err(map_connection_error)?;

        self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().put(put).build())
            .transact_items(TransactWriteItem::builder().delete(delete).build())
            .send()
            .await
            .map_err(|e| map_transact_error(e, "Item", format!("{old_pk}/{old_sk}")))?;

        Ok(())
    }
}
