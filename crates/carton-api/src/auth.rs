//! Caller identity extraction.
//!
//! The deployment's authentication layer (out of scope here) verifies the
//! caller and forwards their email in the `x-caller-email` header; this
//! extractor only surfaces that identity. Authorization itself is enforced
//! by the action engine in front of every store mutation, never here.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use carton_core::AppError;

use crate::error::HttpAppError;

pub const CALLER_EMAIL_HEADER: &str = "x-caller-email";

/// The verified identity of the requesting user.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub email: String,
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(CALLER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthenticated(format!(
                    "Missing {} header",
                    CALLER_EMAIL_HEADER
                )))
            })?;

        if !email.contains('@') {
            return Err(HttpAppError(AppError::Unauthenticated(format!(
                "{} must be an email address",
                CALLER_EMAIL_HEADER
            ))));
        }

        Ok(CallerIdentity { email })
    }
}
