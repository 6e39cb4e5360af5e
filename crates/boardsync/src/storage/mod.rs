//! Storage backend implementations.
//!
//! Concrete implementations of `boardsync_core::storage::KeyedStore`,
//! selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): lock-guarded map, for development and tests
//! - `dynamodb`: AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "inmemory", feature = "dynamodb"))]
compile_error!(
    "Features 'inmemory' and 'dynamodb' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb'. \
    Example: cargo build -p boardsync --features inmemory"
);

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;
