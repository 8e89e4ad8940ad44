//! The canonical outcome of a verification.
//!
//! This module:
//! - AuthUser: the normalized identity extracted from a provider.
//! - AuthResult: either a verified AuthUser or a human-readable failure.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::provider::Provider;

/// Identity returned by a provider after a successful verification.
///
/// `uid` is never empty. `raw_data` is the upstream payload exactly as it was
/// received (or, for Apple, the verified token claims).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AuthUserWire")]
pub struct AuthUser {
    pub(crate) uid: String,
    pub(crate) provider: Provider,
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) photo_url: Option<String>,
    pub(crate) raw_data: Map<String, Value>,
}

impl AuthUser {
    pub(crate) fn new(uid: String, provider: Provider, raw_data: Map<String, Value>) -> Self {
        Self {
            uid,
            provider,
            name: None,
            email: None,
            photo_url: None,
            raw_data,
        }
    }

    pub(crate) fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub(crate) fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub(crate) fn with_photo_url(mut self, photo_url: Option<String>) -> Self {
        self.photo_url = photo_url;
        self
    }

    /// Stable user identifier issued by the provider.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// May be absent when the user did not consent to share it.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    pub fn raw_data(&self) -> &Map<String, Value> {
        &self.raw_data
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthUserWire {
    uid: String,
    provider: Provider,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    raw_data: Map<String, Value>,
}

impl TryFrom<AuthUserWire> for AuthUser {
    type Error = &'static str;

    fn try_from(wire: AuthUserWire) -> Result<Self, Self::Error> {
        if wire.uid.is_empty() {
            return Err("uid must not be empty");
        }
        Ok(AuthUser::new(wire.uid, wire.provider, wire.raw_data)
            .with_name(wire.name)
            .with_email(wire.email)
            .with_photo_url(wire.photo_url))
    }
}

/// Outcome of a single `verify` call.
///
/// Every upstream problem (rejected token, unreachable endpoint, bad signature,
/// malformed body) ends up as `Failure`; only the message differs.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthResult {
    Success(AuthUser),
    Failure { error: String },
}

impl AuthResult {
    pub(crate) fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            AuthResult::Success(user) => Some(user),
            AuthResult::Failure { .. } => None,
        }
    }

    /// Converts into a std `Result`, with the failure message as the error.
    pub fn into_user(self) -> Result<AuthUser, String> {
        match self {
            AuthResult::Success(user) => Ok(user),
            AuthResult::Failure { error } => Err(error),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthResult::Success(_) => None,
            AuthResult::Failure { error } => Some(error),
        }
    }

    pub fn uid(&self) -> Option<&str> {
        self.user().map(AuthUser::uid)
    }

    pub fn provider(&self) -> Option<Provider> {
        self.user().map(AuthUser::provider)
    }

    pub fn name(&self) -> Option<&str> {
        self.user().and_then(AuthUser::name)
    }

    pub fn email(&self) -> Option<&str> {
        self.user().and_then(AuthUser::email)
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.user().and_then(AuthUser::photo_url)
    }

    pub fn raw_data(&self) -> Option<&Map<String, Value>> {
        self.user().map(AuthUser::raw_data)
    }
}

impl From<AuthUser> for AuthResult {
    fn from(user: AuthUser) -> Self {
        AuthResult::Success(user)
    }
}

// {"success": true, "uid": ..., ...} or {"success": false, "error": ...}
#[derive(Serialize)]
struct AuthResultWire<'a> {
    success: bool,
    #[serde(flatten)]
    user: Option<&'a AuthUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for AuthResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        AuthResultWire {
            success: self.is_success(),
            user: self.user(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}
