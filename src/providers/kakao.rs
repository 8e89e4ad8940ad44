//! Kakao access token verification.
//!
//! Two sequential calls with the token as a bearer credential:
//! 1. token info, which rejects expired or foreign tokens
//! 2. user info, attempted only when step 1 succeeded
use serde_json::{Map, Value};

use super::{VerifyError, invalid_token, json_object, object_field, settle, string_field, uid_field};
use crate::{
    config::Config,
    executer::{GetExecuter, GetRequest},
    provider::Provider,
    result::{AuthResult, AuthUser},
};

/// Verifies a Kakao access token and returns the user behind it.
pub async fn verify<E: GetExecuter>(exe: &E, config: &Config, token: &str) -> AuthResult {
    settle(Provider::Kakao, try_verify(exe, config, token).await)
}

async fn try_verify<E: GetExecuter>(
    exe: &E,
    config: &Config,
    token: &str,
) -> Result<AuthUser, VerifyError> {
    let token_info_req = GetRequest::new(config.kakao_token_info_endpoint()).bearer(token);
    let token_info = exe.execute(&token_info_req).await?;
    if !token_info.is_success() {
        return Err(invalid_token(&token_info, "msg"));
    }

    let user_info_req = GetRequest::new(config.kakao_user_info_endpoint()).bearer(token);
    let user_info = exe.execute(&user_info_req).await?;
    if !user_info.is_success() {
        return Err(VerifyError::rejected("Failed to get user info"));
    }

    user_from_body(json_object(&user_info)?)
}

// {"id": 123, "kakao_account": {"email": ..., "profile": {"nickname": ..., "profile_image_url": ...}}}
fn user_from_body(body: Map<String, Value>) -> Result<AuthUser, VerifyError> {
    let uid = uid_field(&body, "id", Provider::Kakao)?;
    let account = object_field(&body, "kakao_account");
    let profile = account.and_then(|account| object_field(account, "profile"));

    let name = profile.and_then(|p| string_field(p, "nickname"));
    let email = account.and_then(|a| string_field(a, "email"));
    let photo_url = profile.and_then(|p| string_field(p, "profile_image_url"));

    Ok(AuthUser::new(uid, Provider::Kakao, body)
        .with_name(name)
        .with_email(email)
        .with_photo_url(photo_url))
}
