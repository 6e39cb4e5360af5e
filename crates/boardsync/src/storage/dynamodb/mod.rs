//! DynamoDB storage backend.
//!
//! Single-table layout: `PK`/`SK` primary key, `GSI1PK`/`GSI1SK` mirror,
//! `itemType` discriminant, camelCase data attributes.

mod conversions;
mod error;
mod expressions;
mod repository;

pub use repository::DynamoDbStore;
