//! Edit token header extractor.
//!
//! A participation can only be changed by whoever holds the token returned
//! when it was created. The token travels in the `X-Edit-Token` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::crypto::sha256_hex;

use crate::error::ApiError;

/// Header carrying the edit token.
pub const EDIT_TOKEN_HEADER: &str = "x-edit-token";

/// Longest token accepted. Generated tokens are 64 characters.
const MAX_TOKEN_LEN: usize = 128;

/// Edit token presented by the caller, reduced to the digest that is stored.
#[derive(Debug, Clone)]
pub struct EditToken {
    /// SHA-256 hex digest of the presented token.
    pub hash: String,
}

impl EditToken {
    pub fn from_token(token: &str) -> Self {
        Self {
            hash: sha256_hex(token),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for EditToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(EDIT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty() && token.len() <= MAX_TOKEN_LEN)
            .map(EditToken::from_token)
            .ok_or_else(|| ApiError::Unauthorized("Jeton de modification manquant".to_string()))
    }
}
