//! Provider strategies.
//!
//! Each submodule exposes `verify(exe, config, token) -> AuthResult` for one
//! provider. Inside a strategy every step returns `Result<_, VerifyError>`;
//! the error is turned into [`AuthResult::Failure`] once, at the strategy
//! boundary, so nothing upstream-induced escapes as an error.
pub mod apple;
pub mod google;
pub mod kakao;
pub mod naver;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::{
    executer::{ExecuteError, HttpResponse},
    provider::Provider,
    result::{AuthResult, AuthUser},
};

/// Why a strategy could not produce an `AuthUser`.
#[derive(Debug, Error)]
pub(crate) enum VerifyError {
    /// The provider answered and said no.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),
    #[error("JWT decode error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Missing user id in {0} response")]
    MissingUid(Provider),
}

impl VerifyError {
    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// Logs the outcome of one strategy run and folds it into an `AuthResult`.
pub(crate) fn settle(provider: Provider, outcome: Result<AuthUser, VerifyError>) -> AuthResult {
    match outcome {
        Ok(user) => AuthResult::Success(user),
        Err(e) => {
            match &e {
                VerifyError::Rejected(_) | VerifyError::Jwt(_) => {
                    warn!(%provider, "Token rejected: {}", e)
                }
                _ => error!(%provider, "Verification failed: {}", e),
            }
            AuthResult::failure(e.to_string())
        }
    }
}

/// Parses a body that must be a JSON object.
pub(crate) fn json_object(res: &HttpResponse) -> Result<Map<String, Value>, VerifyError> {
    Ok(res.json::<Map<String, Value>>()?)
}

/// `Invalid token: <detail>` when an error body carries `key`, else `Invalid token`.
pub(crate) fn invalid_token(res: &HttpResponse, key: &str) -> VerifyError {
    let detail = res
        .json::<Map<String, Value>>()
        .ok()
        .and_then(|body| string_field(&body, key));
    match detail {
        Some(detail) => VerifyError::rejected(format!("Invalid token: {}", detail)),
        None => VerifyError::rejected("Invalid token"),
    }
}

/// Non-empty string value of `key`.
pub(crate) fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn object_field<'m>(
    map: &'m Map<String, Value>,
    key: &str,
) -> Option<&'m Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

/// User identifier as a string; numeric ids are rendered in decimal.
pub(crate) fn uid_field(
    map: &Map<String, Value>,
    key: &str,
    provider: Provider,
) -> Result<String, VerifyError> {
    match map.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(VerifyError::MissingUid(provider)),
    }
}
