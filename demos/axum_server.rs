// Token verification endpoint for mobile / SPA clients.
// The client signs in with the provider SDK and posts the resulting token here.
// Set .env file (all optional)
// ```.env
// bind_addr="0.0.0.0:8080"
// apple_audience="com.example.app,com.example.app.web"
// ```
// finally ```cargo run --example axum_server```
// ```sh
// curl -X POST localhost:8080/auth/kakao -H 'content-type: application/json' -d '{"token":"..."}'
// ```
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::post,
};
use http::StatusCode;
use korea_auth::{config::ConfigBuilder, error::Error, verifier::Verifier};
use serde::Deserialize;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log settings
    tracing_subscriber::fmt::init();

    // Read environment
    let bind_addr = dotenvy::var("bind_addr").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let apple_audience: Vec<String> = dotenvy::var("apple_audience")
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if apple_audience.is_empty() {
        warn!("apple_audience is not set, Apple tokens for any app will be accepted");
    }

    // Build Config
    let config = ConfigBuilder::new().apple_audience(&apple_audience).build();

    // One verifier shared by every request
    let verifier = Arc::new(Verifier::new(config));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Listening on {}", bind_addr);

    let app = Router::new()
        .route("/auth/{provider}", post(verify_token))
        .with_state(verifier);

    axum::serve(listener, app).await.context("Server error")?;
    anyhow::Ok(())
}

async fn verify_token(
    State(verifier): State<Arc<Verifier>>,
    Path(provider): Path<String>,
    Json(body): Json<Token>,
) -> Response {
    match verifier.verify(&provider, &body.token).await {
        Ok(result) if result.is_success() => (StatusCode::OK, Json(result)).into_response(),
        Ok(result) => (StatusCode::UNAUTHORIZED, Json(result)).into_response(),
        Err(e @ Error::UnknownProvider(_)) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Token {
    token: String,
}
