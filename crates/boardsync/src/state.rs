use std::sync::Arc;

use boardsync_auth::AuthState;
use boardsync_core::storage::KeyedStore;

/// Shared application state.
///
/// Dependencies are constructed explicitly and injected here; there are no
/// ambient singletons.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyedStore>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyedStore>, auth: AuthState) -> Self {
        Self { store, auth }
    }
}

/// Lets the auth extractors pull their state out of the app state.
impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}
