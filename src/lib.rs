//! Token verification for Korean social login providers.
//!
//! Verifies a token issued by Kakao, Naver, Google or Apple and returns one
//! normalized [`AuthResult`], whichever provider issued it.
//! # Feature
//! - Kakao: access token info + user info lookup
//! - Naver: profile API lookup (`resultcode` checked)
//! - Google: OIDC tokeninfo lookup
//! - Apple: identity token (JWT) signature verification against Apple's JWKS
//! # Errors
//! - An unsupported provider identifier is an [`Error`](error::Error).
//! - Anything wrong with the token or the upstream call (rejection, network
//!   failure, bad signature, malformed body) is an `AuthResult::Failure`.
//!   Nothing is retried.
//! # Caution
//! - Apple tokens are only checked for audience when
//!   [`ConfigBuilder::apple_audience`](config::ConfigBuilder::apple_audience) is set.
//!   Set it in production.
//! - Apple's key set is fetched on every Apple verification.
//! # Examples
//! ```rust,no_run
//! # async fn run() -> Result<(), korea_auth::error::Error> {
//! let result = korea_auth::verify("google", "ID_TOKEN").await?;
//! match result.into_user() {
//!     Ok(user) => println!("{} via {}", user.uid(), user.provider()),
//!     Err(reason) => println!("could not verify: {}", reason),
//! }
//! # Ok(())
//! # }
//! ```
//! For a runnable server, see `demos/axum_server.rs`.
pub mod config;
pub mod error;
pub mod executer;
pub mod provider;
pub mod providers;
pub mod result;
pub mod verifier;

pub use provider::Provider;
pub use result::{AuthResult, AuthUser};
pub use verifier::{Verifier, verify};
