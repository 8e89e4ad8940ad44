//! Google ID token verification through the OIDC tokeninfo endpoint.
use serde_json::{Map, Value};

use super::{VerifyError, json_object, settle, string_field, uid_field};
use crate::{
    config::Config,
    executer::{GetExecuter, GetRequest},
    provider::Provider,
    result::{AuthResult, AuthUser},
};

/// Verifies a Google ID token and returns the user it was issued to.
pub async fn verify<E: GetExecuter>(exe: &E, config: &Config, token: &str) -> AuthResult {
    settle(Provider::Google, try_verify(exe, config, token).await)
}

async fn try_verify<E: GetExecuter>(
    exe: &E,
    config: &Config,
    token: &str,
) -> Result<AuthUser, VerifyError> {
    let req = GetRequest::new(config.google_token_info_endpoint()).query("id_token", token);
    let res = exe.execute(&req).await?;
    if !res.is_success() {
        return Err(VerifyError::rejected("Invalid token"));
    }

    user_from_body(json_object(&res)?)
}

fn user_from_body(body: Map<String, Value>) -> Result<AuthUser, VerifyError> {
    let uid = uid_field(&body, "sub", Provider::Google)?;
    let name = string_field(&body, "name");
    let email = string_field(&body, "email");
    let photo_url = string_field(&body, "picture");

    Ok(AuthUser::new(uid, Provider::Google, body)
        .with_name(name)
        .with_email(email)
        .with_photo_url(photo_url))
}
