//! OIDC authentication for boardsync.
//!
//! This crate provides:
//! - The hosted-UI OIDC flow (PKCE login, callback, logout)
//! - Server-side session storage (in-memory, or Redis via the `redis`
//!   feature)
//! - Remote JWKS verification of ID tokens
//! - Axum extractors for the authenticated caller

mod config;
mod error;
mod extractors;
mod handlers;
mod jwks;
mod provider;
mod sessions;
mod state;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AuthRejection, CurrentUser};
pub use handlers::auth_routes;
pub use jwks::RemoteJwksVerifier;
pub use provider::HostedUiProvider;
pub use sessions::InMemorySessionStore;
#[cfg(feature = "redis")]
pub use sessions::RedisSessionStore;
pub use state::AuthState;
