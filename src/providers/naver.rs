//! Naver access token verification against the profile API.
//!
//! Naver reports some failures in-band: a 2xx response is only a success
//! when its `resultcode` is `"00"`.
use serde_json::{Map, Value};

use super::{VerifyError, invalid_token, json_object, object_field, settle, string_field, uid_field};
use crate::{
    config::Config,
    executer::{GetExecuter, GetRequest},
    provider::Provider,
    result::{AuthResult, AuthUser},
};

const RESULT_CODE_OK: &str = "00";

/// Verifies a Naver access token and returns the user behind it.
pub async fn verify<E: GetExecuter>(exe: &E, config: &Config, token: &str) -> AuthResult {
    settle(Provider::Naver, try_verify(exe, config, token).await)
}

async fn try_verify<E: GetExecuter>(
    exe: &E,
    config: &Config,
    token: &str,
) -> Result<AuthUser, VerifyError> {
    let req = GetRequest::new(config.naver_user_info_endpoint()).bearer(token);
    let res = exe.execute(&req).await?;
    if !res.is_success() {
        return Err(invalid_token(&res, "message"));
    }

    let body = json_object(&res)?;
    if body.get("resultcode").and_then(Value::as_str) != Some(RESULT_CODE_OK) {
        return Err(invalid_token(&res, "message"));
    }

    user_from_body(body)
}

// {"resultcode": "00", "message": "success", "response": {"id": ..., "name": ..., ...}}
fn user_from_body(body: Map<String, Value>) -> Result<AuthUser, VerifyError> {
    let profile = object_field(&body, "response").ok_or(VerifyError::MissingUid(Provider::Naver))?;

    let uid = uid_field(profile, "id", Provider::Naver)?;
    let name = string_field(profile, "name").or_else(|| string_field(profile, "nickname"));
    let email = string_field(profile, "email");
    let photo_url = string_field(profile, "profile_image");

    Ok(AuthUser::new(uid, Provider::Naver, body)
        .with_name(name)
        .with_email(email)
        .with_photo_url(photo_url))
}
