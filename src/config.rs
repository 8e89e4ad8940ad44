//! Defines structures and builders for verification settings.
//!
//! Provides the upstream endpoints each provider strategy talks to and the
//! claim checks applied to Apple identity tokens.
//!
//! ## Structures
//! - `Config`: Stores all the settings a `Verifier` needs.
//! - `ConfigBuilder`: A builder for constructing a `Config` instance.
//!
//! # Example
//! ```rust,no_run
//! use korea_auth::config::Config;
//!
//! // Production endpoints, Apple audience checked against the app bundle id.
//! let config = Config::builder()
//!     .apple_audience(&["com.example.app"])
//!     .build();
//! ```
//!
//! Endpoints default to the providers' production URLs; override them only
//! to point at a staging server or a test double.

pub(crate) const KAKAO_TOKEN_INFO_URL: &str = "https://kapi.kakao.com/v1/user/access_token_info";
pub(crate) const KAKAO_USER_INFO_URL: &str = "https://kapi.kakao.com/v2/user/me";
pub(crate) const NAVER_USER_INFO_URL: &str = "https://openapi.naver.com/v1/nid/me";
pub(crate) const GOOGLE_TOKEN_INFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
pub(crate) const APPLE_KEYS_URL: &str = "https://appleid.apple.com/auth/keys";
pub(crate) const APPLE_ISSUER: &str = "https://appleid.apple.com";

/// Holds the settings used by every provider strategy.
///
/// It is designed to be immutable once constructed.
///
/// # Fields
/// - `kakao_token_info_endpoint`: Kakao access token info API.
/// - `kakao_user_info_endpoint`: Kakao user info API.
/// - `naver_user_info_endpoint`: Naver profile API.
/// - `google_token_info_endpoint`: Google OIDC tokeninfo endpoint.
/// - `apple_keys_endpoint`: Apple's published JWKS.
/// - `apple_issuer`: Expected `iss` claim of Apple identity tokens.
/// - `apple_audience`: Accepted `aud` values. Empty means `aud` is not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub(crate) kakao_token_info_endpoint: String,
    pub(crate) kakao_user_info_endpoint: String,
    pub(crate) naver_user_info_endpoint: String,
    pub(crate) google_token_info_endpoint: String,
    pub(crate) apple_keys_endpoint: String,
    pub(crate) apple_issuer: String,
    pub(crate) apple_audience: Vec<String>,
}

// ==========impl Config==========
impl Config {
    /// Returns a new `ConfigBuilder` instance to create a `Config` object.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn kakao_token_info_endpoint(&self) -> &str {
        &self.kakao_token_info_endpoint
    }

    pub fn kakao_user_info_endpoint(&self) -> &str {
        &self.kakao_user_info_endpoint
    }

    pub fn naver_user_info_endpoint(&self) -> &str {
        &self.naver_user_info_endpoint
    }

    pub fn google_token_info_endpoint(&self) -> &str {
        &self.google_token_info_endpoint
    }

    pub fn apple_keys_endpoint(&self) -> &str {
        &self.apple_keys_endpoint
    }

    pub fn apple_issuer(&self) -> &str {
        &self.apple_issuer
    }

    pub fn apple_audience(&self) -> &[String] {
        &self.apple_audience
    }
}

/// Production endpoints, Apple issuer check on, audience check off.
impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::default().build()
    }
}

/// Provides a convenient way to create a `Config` instance step by step.
/// Every setting starts at its production value.
///
/// # Example
/// ```rust,no_run
/// use korea_auth::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .naver_user_info_endpoint("http://localhost:8080/v1/nid/me")
///     .apple_audience(&["com.example.app", "com.example.app.web"])
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    kakao_token_info_endpoint: String,
    kakao_user_info_endpoint: String,
    naver_user_info_endpoint: String,
    google_token_info_endpoint: String,
    apple_keys_endpoint: String,
    apple_issuer: String,
    apple_audience: Vec<String>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            kakao_token_info_endpoint: KAKAO_TOKEN_INFO_URL.to_string(),
            kakao_user_info_endpoint: KAKAO_USER_INFO_URL.to_string(),
            naver_user_info_endpoint: NAVER_USER_INFO_URL.to_string(),
            google_token_info_endpoint: GOOGLE_TOKEN_INFO_URL.to_string(),
            apple_keys_endpoint: APPLE_KEYS_URL.to_string(),
            apple_issuer: APPLE_ISSUER.to_string(),
            apple_audience: Vec::new(),
        }
    }
}

// ==========impl ConfigBuilder==========
impl ConfigBuilder {
    /// Creates a new `ConfigBuilder` instance with production defaults.
    pub fn new() -> Self {
        ConfigBuilder::default()
    }

    /// Constructs a `Config` instance with the provided values.
    pub fn build(self) -> Config {
        Config {
            kakao_token_info_endpoint: self.kakao_token_info_endpoint,
            kakao_user_info_endpoint: self.kakao_user_info_endpoint,
            naver_user_info_endpoint: self.naver_user_info_endpoint,
            google_token_info_endpoint: self.google_token_info_endpoint,
            apple_keys_endpoint: self.apple_keys_endpoint,
            apple_issuer: self.apple_issuer,
            apple_audience: self.apple_audience,
        }
    }

    pub fn kakao_token_info_endpoint(mut self, endpoint: &str) -> Self {
        self.kakao_token_info_endpoint = endpoint.to_string();
        self
    }

    pub fn kakao_user_info_endpoint(mut self, endpoint: &str) -> Self {
        self.kakao_user_info_endpoint = endpoint.to_string();
        self
    }

    pub fn naver_user_info_endpoint(mut self, endpoint: &str) -> Self {
        self.naver_user_info_endpoint = endpoint.to_string();
        self
    }

    pub fn google_token_info_endpoint(mut self, endpoint: &str) -> Self {
        self.google_token_info_endpoint = endpoint.to_string();
        self
    }

    pub fn apple_keys_endpoint(mut self, endpoint: &str) -> Self {
        self.apple_keys_endpoint = endpoint.to_string();
        self
    }

    /// Sets the expected `iss` claim of Apple identity tokens.
    pub fn apple_issuer(mut self, issuer: &str) -> Self {
        self.apple_issuer = issuer.to_string();
        self
    }

    /// Sets the accepted `aud` values (app bundle ids or service ids).
    /// The token must match one of them.
    pub fn apple_audience<T: ToString>(mut self, audience: &[T]) -> Self {
        self.apple_audience = audience.iter().map(ToString::to_string).collect();
        self
    }
}

// ==========Tests==========
#[cfg(test)]
mod tests {
    use super::{Config, ConfigBuilder};

    #[test]
    fn test_config_default_endpoints() {
        let config = Config::default();

        assert_eq!(
            config.kakao_token_info_endpoint(),
            "https://kapi.kakao.com/v1/user/access_token_info"
        );
        assert_eq!(
            config.kakao_user_info_endpoint(),
            "https://kapi.kakao.com/v2/user/me"
        );
        assert_eq!(
            config.naver_user_info_endpoint(),
            "https://openapi.naver.com/v1/nid/me"
        );
        assert_eq!(
            config.google_token_info_endpoint(),
            "https://oauth2.googleapis.com/tokeninfo"
        );
        assert_eq!(
            config.apple_keys_endpoint(),
            "https://appleid.apple.com/auth/keys"
        );
        assert_eq!(config.apple_issuer(), "https://appleid.apple.com");
        assert!(config.apple_audience().is_empty());
    }

    #[test]
    fn test_config_builder_method_chain() {
        let config = ConfigBuilder::new()
            .kakao_token_info_endpoint("http://127.0.0.1:1/token")
            .kakao_user_info_endpoint("http://127.0.0.1:1/me")
            .naver_user_info_endpoint("http://127.0.0.1:2/me")
            .google_token_info_endpoint("http://127.0.0.1:3/tokeninfo")
            .apple_keys_endpoint("http://127.0.0.1:4/keys")
            .apple_issuer("https://issuer.example.com")
            .apple_audience(&["com.example.app"])
            .build();

        assert_eq!(config.kakao_token_info_endpoint, "http://127.0.0.1:1/token");
        assert_eq!(config.kakao_user_info_endpoint, "http://127.0.0.1:1/me");
        assert_eq!(config.naver_user_info_endpoint, "http://127.0.0.1:2/me");
        assert_eq!(
            config.google_token_info_endpoint,
            "http://127.0.0.1:3/tokeninfo"
        );
        assert_eq!(config.apple_keys_endpoint, "http://127.0.0.1:4/keys");
        assert_eq!(config.apple_issuer, "https://issuer.example.com");
        assert_eq!(config.apple_audience, vec!["com.example.app".to_string()]);
    }

    #[test]
    fn test_builder_default_equals_config_default() {
        assert_eq!(Config::builder().build(), Config::default());
    }
}
