//! Explicit session context threaded into authenticated calls.
//!
//! Lifecycle: acquired on login or registration, cleared on logout or the
//! first 401. There is deliberately no process-global token storage; a
//! session is a value you hand to the client that needs it.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Shared handle to the current bearer token. Cheap to clone; all clones
/// observe the same acquire/clear.
#[derive(Clone, Default)]
pub struct SessionContext {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a token, replacing any previous one.
    pub fn acquire(&self, token: impl Into<String>) {
        let mut slot = self.token.write().expect("session lock poisoned");
        *slot = Some(token.into());
    }

    /// Drop the token; later authenticated calls will be rejected by the
    /// server until a new one is acquired.
    pub fn clear(&self) {
        let mut slot = self.token.write().expect("session lock poisoned");
        *slot = None;
    }

    pub fn bearer(&self) -> Option<String> {
        self.token.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().expect("session lock poisoned").is_some()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the token itself.
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
