//! Core types and pure logic for the boardsync project.
//!
//! This crate holds everything that can be expressed without I/O:
//! the Kanban domain types and request validation, the keyed item store
//! abstraction with its key builders and error taxonomy, and the auth
//! primitives (session types, PKCE material, expiry math).

#[cfg(feature = "auth")]
pub mod auth;
pub mod board;
pub mod storage;
