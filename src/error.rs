use thiserror::Error;

/// Errors raised before any token is looked at.
///
/// A token that fails verification is never reported here; it comes back as
/// [`AuthResult::Failure`](crate::result::AuthResult::Failure).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}
