//! Apple identity token verification.
//!
//! Unlike the other providers, Apple tokens are checked locally:
//!
//! `fetch-keys -> peek-header -> match-key -> verify-signature -> map-claims`
//!
//! Every stage can end the run with a failure and none is retried. The key set
//! is fetched again on every call.
//!
//! The header peek is untrusted. It only yields the key id used to pick a key;
//! all claims come from the verified decode.
use jsonwebtoken::{
    Algorithm, DecodingKey, Validation,
    jwk::{Jwk, JwkSet},
};
use serde_json::{Map, Value};

use super::{VerifyError, settle, string_field, uid_field};
use crate::{
    config::Config,
    executer::{GetExecuter, GetRequest},
    provider::Provider,
    result::{AuthResult, AuthUser},
};

/// Verifies an Apple identity token (JWT) and returns the user it was issued to.
pub async fn verify<E: GetExecuter>(exe: &E, config: &Config, token: &str) -> AuthResult {
    settle(Provider::Apple, try_verify(exe, config, token).await)
}

async fn try_verify<E: GetExecuter>(
    exe: &E,
    config: &Config,
    token: &str,
) -> Result<AuthUser, VerifyError> {
    let keys = fetch_keys(exe, config).await?;
    let kid = peek_key_id(token)?;
    let jwk = match_key(&keys, kid.as_deref())?;
    let claims = verify_signature(token, jwk, config)?;
    user_from_claims(claims)
}

async fn fetch_keys<E: GetExecuter>(exe: &E, config: &Config) -> Result<JwkSet, VerifyError> {
    let req = GetRequest::new(config.apple_keys_endpoint());
    let res = exe.execute(&req).await?;
    if !res.is_success() {
        return Err(VerifyError::rejected("Failed to fetch public keys"));
    }
    Ok(res.json::<JwkSet>()?)
}

/// Reads `kid` from the token header without checking the signature.
fn peek_key_id(token: &str) -> Result<Option<String>, VerifyError> {
    Ok(jsonwebtoken::decode_header(token)?.kid)
}

fn match_key<'k>(keys: &'k JwkSet, kid: Option<&str>) -> Result<&'k Jwk, VerifyError> {
    kid.and_then(|kid| keys.find(kid))
        .ok_or_else(|| VerifyError::rejected("No matching key found"))
}

/// Full RS256 verification of `token` against `jwk`, returning the verified claims.
fn verify_signature(
    token: &str,
    jwk: &Jwk,
    config: &Config,
) -> Result<Map<String, Value>, VerifyError> {
    let key = DecodingKey::from_jwk(jwk)?;
    let data = jsonwebtoken::decode::<Map<String, Value>>(token, &key, &validation(config))?;
    Ok(data.claims)
}

fn validation(config: &Config) -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[config.apple_issuer()]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    if config.apple_audience().is_empty() {
        validation.validate_aud = false;
    } else {
        validation.set_audience(config.apple_audience());
    }
    validation
}

// Apple does not reliably put a name or picture in the token.
fn user_from_claims(claims: Map<String, Value>) -> Result<AuthUser, VerifyError> {
    let uid = uid_field(&claims, "sub", Provider::Apple)?;
    let email = string_field(&claims, "email");

    Ok(AuthUser::new(uid, Provider::Apple, claims).with_email(email))
}

// ==========Tests==========
#[cfg(test)]
mod tests {
    use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use mockito::ServerGuard;
    use serde_json::{Value, json};

    use super::verify;
    use crate::{config::Config, executer::GetExe, provider::Provider};

    const KEYS_PATH: &str = "/auth/keys";
    const KEYS_BODY: &str = include_str!("../../testdata/apple_keys.json");
    const KEY_A: &[u8] = include_bytes!("../../testdata/apple_key_a.pem");
    const KEY_B: &[u8] = include_bytes!("../../testdata/apple_key_b.pem");

    // 2100-01-01T00:00:00Z
    const FAR_FUTURE: u64 = 4_102_444_800;

    fn claims() -> Value {
        json!({
            "iss": "https://appleid.apple.com",
            "aud": "com.example.app",
            "exp": FAR_FUTURE,
            "iat": 1_700_000_000u64,
            "sub": "001234.0123456789abcdef0123456789abcdef.0123",
            "email": "abc123@privaterelay.appleid.com",
            "email_verified": "true",
            "is_private_email": "true"
        })
    }

    fn sign(claims: &Value, kid: &str, pem: &[u8]) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        let key = EncodingKey::from_rsa_pem(pem).unwrap();
        jsonwebtoken::encode(&header, claims, &key).unwrap()
    }

    async fn keys_server() -> (ServerGuard, mockito::Mock) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", KEYS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(KEYS_BODY)
            .create_async()
            .await;
        (server, mock)
    }

    fn config_for(server: &ServerGuard) -> Config {
        Config::builder()
            .apple_keys_endpoint(&format!("{}{}", server.url(), KEYS_PATH))
            .build()
    }

    #[tokio::test]
    async fn test_apple_success() {
        let (server, keys) = keys_server().await;
        let token = sign(&claims(), "test-key-a", KEY_A);

        let result = verify(&GetExe::new(), &config_for(&server), &token).await;

        assert!(result.is_success(), "{:?}", result);
        assert_eq!(
            result.uid(),
            Some("001234.0123456789abcdef0123456789abcdef.0123")
        );
        assert_eq!(result.provider(), Some(Provider::Apple));
        assert_eq!(result.email(), Some("abc123@privaterelay.appleid.com"));
        assert_eq!(result.name(), None);
        assert_eq!(result.photo_url(), None);
        assert_eq!(result.raw_data().unwrap()["is_private_email"], "true");
        keys.assert_async().await;
    }

    #[tokio::test]
    async fn test_apple_second_key_in_set() {
        let (server, _keys) = keys_server().await;
        let token = sign(&claims(), "test-key-b", KEY_B);

        let result = verify(&GetExe::new(), &config_for(&server), &token).await;

        assert!(result.is_success(), "{:?}", result);
    }

    #[tokio::test]
    async fn test_apple_keys_fetched_on_every_call() {
        let mut server = mockito::Server::new_async().await;
        let keys = server
            .mock("GET", KEYS_PATH)
            .with_status(200)
            .with_body(KEYS_BODY)
            .expect(2)
            .create_async()
            .await;
        let config = config_for(&server);
        let token = sign(&claims(), "test-key-a", KEY_A);
        let exe = GetExe::new();

        let first = verify(&exe, &config, &token).await;
        let second = verify(&exe, &config, &token).await;

        assert_eq!(first, second);
        keys.assert_async().await;
    }

    #[tokio::test]
    async fn test_apple_key_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let _keys = server
            .mock("GET", KEYS_PATH)
            .with_status(503)
            .create_async()
            .await;
        // Not even a JWT: the fetch failure must win before the header is looked at.
        let result = verify(&GetExe::new(), &config_for(&server), "garbage").await;

        assert_eq!(result.error(), Some("Failed to fetch public keys"));
    }

    #[tokio::test]
    async fn test_apple_no_matching_key() {
        let (server, _keys) = keys_server().await;
        let token = sign(&claims(), "rotated-away", KEY_A);

        let result = verify(&GetExe::new(), &config_for(&server), &token).await;

        assert_eq!(result.error(), Some("No matching key found"));
    }

    #[tokio::test]
    async fn test_apple_header_without_kid() {
        let (server, _keys) = keys_server().await;
        let key = EncodingKey::from_rsa_pem(KEY_A).unwrap();
        let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims(), &key).unwrap();

        let result = verify(&GetExe::new(), &config_for(&server), &token).await;

        assert_eq!(result.error(), Some("No matching key found"));
    }

    #[tokio::test]
    async fn test_apple_signed_by_other_key() {
        let (server, _keys) = keys_server().await;
        // kid points at key A, signature made with key B
        let token = sign(&claims(), "test-key-a", KEY_B);

        let result = verify(&GetExe::new(), &config_for(&server), &token).await;

        assert!(result.is_failure());
        assert!(result.error().unwrap().starts_with("JWT decode error"));
    }

    #[tokio::test]
    async fn test_apple_unsigned_token() {
        let (server, _keys) = keys_server().await;
        let header = BASE64_URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","kid":"test-key-a"}"#);
        let payload = BASE64_URL_SAFE_NO_PAD.encode(claims().to_string());
        let token = format!("{}.{}.", header, payload);

        let result = verify(&GetExe::new(), &config_for(&server), &token).await;

        assert!(result.is_failure());
        assert!(result.error().unwrap().starts_with("JWT decode error"));
    }

    #[tokio::test]
    async fn test_apple_malformed_token() {
        let (server, _keys) = keys_server().await;

        let result = verify(&GetExe::new(), &config_for(&server), "not-a-jwt").await;

        assert!(result.error().unwrap().starts_with("JWT decode error"));
    }

    #[tokio::test]
    async fn test_apple_expired_token() {
        let (server, _keys) = keys_server().await;
        let mut expired = claims();
        expired["exp"] = json!(1_600_000_000u64);
        let token = sign(&expired, "test-key-a", KEY_A);

        let result = verify(&GetExe::new(), &config_for(&server), &token).await;

        assert!(result.error().unwrap().starts_with("JWT decode error"));
    }

    #[tokio::test]
    async fn test_apple_wrong_issuer() {
        let (server, _keys) = keys_server().await;
        let mut foreign = claims();
        foreign["iss"] = json!("https://accounts.google.com");
        let token = sign(&foreign, "test-key-a", KEY_A);

        let result = verify(&GetExe::new(), &config_for(&server), &token).await;

        assert!(result.error().unwrap().starts_with("JWT decode error"));
    }

    #[tokio::test]
    async fn test_apple_audience_checked_when_configured() {
        let (server, _keys) = keys_server().await;
        let token = sign(&claims(), "test-key-a", KEY_A);
        let endpoint = format!("{}{}", server.url(), KEYS_PATH);

        let matching = Config::builder()
            .apple_keys_endpoint(&endpoint)
            .apple_audience(&["com.example.app"])
            .build();
        let result = verify(&GetExe::new(), &matching, &token).await;
        assert!(result.is_success(), "{:?}", result);

        let other = Config::builder()
            .apple_keys_endpoint(&endpoint)
            .apple_audience(&["com.other.app"])
            .build();
        let result = verify(&GetExe::new(), &other, &token).await;
        assert!(result.error().unwrap().starts_with("JWT decode error"));
    }

    #[tokio::test]
    async fn test_apple_malformed_key_set() {
        let mut server = mockito::Server::new_async().await;
        let _keys = server
            .mock("GET", KEYS_PATH)
            .with_status(200)
            .with_body(r#"{"keys": "nope"}"#)
            .create_async()
            .await;
        let token = sign(&claims(), "test-key-a", KEY_A);

        let result = verify(&GetExe::new(), &config_for(&server), &token).await;

        assert!(result.is_failure());
        assert!(!result.error().unwrap().is_empty());
    }
}
