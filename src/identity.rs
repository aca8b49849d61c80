//! Identity verification.
//!
//! Authentication itself happens elsewhere; this service only needs to turn
//! a presented token into the id of the user that owns the request.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::repositories::SessionRepository;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The user id behind `token`, or `None` when the token is unknown or expired.
    async fn verify(&self, token: &str) -> Result<Option<String>>;
}

pub type SharedIdentity = Arc<dyn IdentityProvider>;

/// Tokens stored in the `sessions` table.
#[derive(Clone)]
pub struct SessionIdentity {
    sessions: SessionRepository,
}

impl SessionIdentity {
    pub fn new(sessions: SessionRepository) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn verify(&self, token: &str) -> Result<Option<String>> {
        self.sessions.find_valid(token).await
    }
}

/// Fixed token to user id map.
#[derive(Clone, Default)]
pub struct StaticIdentity {
    tokens: HashMap<String, String>,
}

impl StaticIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), user_id.into());
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn verify(&self, token: &str) -> Result<Option<String>> {
        Ok(self.tokens.get(token).cloned())
    }
}
