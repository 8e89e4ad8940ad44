//! Verification dispatcher.
//!
//! Resolves a provider identifier to its strategy and runs it. An identifier
//! outside the supported set is an integration mistake and is reported as
//! [`Error::UnknownProvider`]; everything that can go wrong with the token
//! itself comes back as [`AuthResult::Failure`].
use tracing::debug;

use crate::{
    config::Config,
    error::Error,
    executer::{GetExe, GetExecuter},
    provider::Provider,
    providers::{apple, google, kakao, naver},
    result::AuthResult,
};

/// Verifies tokens for all supported providers.
///
/// Holds no mutable state; share one instance (e.g. behind an `Arc`) across
/// tasks.
///
/// # Example
/// ```rust,no_run
/// use korea_auth::{config::Config, verifier::Verifier};
///
/// # async fn run() -> Result<(), korea_auth::error::Error> {
/// let verifier = Verifier::new(Config::default());
/// let result = verifier.verify("kakao", "ACCESS_TOKEN").await?;
/// if let Some(uid) = result.uid() {
///     println!("signed in as {}", uid);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Verifier<E = GetExe> {
    config: Config,
    exe: E,
}

impl Verifier<GetExe> {
    /// Creates a verifier sending requests with a default `reqwest::Client`.
    pub fn new(config: Config) -> Self {
        Self::with_executer(config, GetExe::new())
    }
}

impl Default for Verifier<GetExe> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<E: GetExecuter> Verifier<E> {
    /// Creates a verifier sending requests through `exe`.
    pub fn with_executer(config: Config, exe: E) -> Self {
        Self { config, exe }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Verifies `token` with the provider named by `provider_id`.
    ///
    /// `provider_id` is matched case-insensitively against
    /// `kakao`, `naver`, `google` and `apple`.
    pub async fn verify(&self, provider_id: &str, token: &str) -> Result<AuthResult, Error> {
        let provider = provider_id.parse::<Provider>()?;
        Ok(self.verify_with(provider, token).await)
    }

    /// Verifies `token` with an already resolved provider.
    pub async fn verify_with(&self, provider: Provider, token: &str) -> AuthResult {
        debug!(%provider, "Verifying token");
        match provider {
            Provider::Kakao => kakao::verify(&self.exe, &self.config, token).await,
            Provider::Naver => naver::verify(&self.exe, &self.config, token).await,
            Provider::Google => google::verify(&self.exe, &self.config, token).await,
            Provider::Apple => apple::verify(&self.exe, &self.config, token).await,
        }
    }
}

/// Verifies `token` with the provider named by `provider_id`, using production
/// endpoints and a fresh HTTP client.
pub async fn verify(provider_id: &str, token: &str) -> Result<AuthResult, Error> {
    Verifier::default().verify(provider_id, token).await
}
