use std::sync::Arc;

use crate::auth::{AuthService, TokenService};
use crate::store::{MemoryStore, TaskStore, UserStore};
use crate::tasks::TaskService;

/// Shared application state, handed to handlers as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        tokens: TokenService,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            auth: AuthService::new(users.clone(), tokens.clone(), bcrypt_cost),
            tasks: TaskService::new(tasks),
            users,
            tokens,
        }
    }

    /// State backed by a fresh [`MemoryStore`]. Used by the test suites.
    pub fn in_memory(tokens: TokenService, bcrypt_cost: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, tokens, bcrypt_cost)
    }
}
