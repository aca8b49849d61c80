use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::identity::SharedIdentity;
use crate::session::request_token;

/// The verified owner of the current request.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<SharedIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Internal("identity provider not configured".to_string()))?;

        let token = request_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        match identity.verify(&token).await? {
            Some(id) => Ok(AuthUser { id }),
            None => {
                tracing::debug!("Rejected unknown or expired token");
                Err(AppError::Unauthorized)
            }
        }
    }
}
