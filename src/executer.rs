//! Provides an asynchronous execution framework for sending HTTP requests to the providers.
//!
//! This module:
//! - Defines the Executer trait, which provides a unified interface for making HTTP requests.
//! - Defines GetRequest / HttpResponse, the only request shape the provider strategies need.
//! - Implements GetExe, a reqwest-backed executer.
//!
//! Timeouts and proxies belong on the `reqwest::Client` handed to [`GetExe::with_client`];
//! the strategies themselves never retry or time out.

use std::{error::Error, pin::Pin};

use http::StatusCode;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// generic asynchronous execution interface for sending HTTP requests.
/// Key Components:
/// - Req: The request type that the executer will handle.
/// - Response: The expected response type.
/// - Error: The error type that will be returned on failure.
/// - Future: The asynchronous execution result, returning either Response or Error
pub trait Executer<'a, Req>
where
    Req: Send,
{
    type Response;
    type Error: Error;
    type Future: Future<Output = Result<Self::Response, Self::Error>> + Send + 'a;

    fn execute(&'a self, req: &'a Req) -> Self::Future;
}

/// Executers the provider strategies can drive: GET in, status and body out.
///
/// Blanket-implemented for every matching `Executer`, so a test double only
/// implements `Executer<'a, GetRequest>`.
pub trait GetExecuter:
    for<'a> Executer<'a, GetRequest, Response = HttpResponse, Error = ExecuteError> + Sync
{
}

impl<T> GetExecuter for T where
    T: for<'a> Executer<'a, GetRequest, Response = HttpResponse, Error = ExecuteError> + Sync
{
}

/// Defines possible errors that can occur during request execution.
/// The message is surfaced to callers as the failure text, so it never contains the request url.
/// Logging is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    #[error("Failed to send request: {0}")]
    Send(String),
    #[error("Failed to read response body: {0}")]
    Body(String),
    #[error("Failed to parse url: {0}")]
    URL(String),
}

/// An HTTP GET with an optional bearer credential and query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GetRequest {
    pub(crate) url: String,
    pub(crate) bearer: Option<String>,
    pub(crate) query: Vec<(String, String)>,
}

impl GetRequest {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            bearer: None,
            query: Vec::new(),
        }
    }

    /// Sends `token` as `Authorization: Bearer <token>`.
    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Status and unparsed body of an upstream response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Sends GET requests with a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct GetExe {
    client: Client,
}

impl GetExe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Request Workflow
/// 1. Parse the endpoint URL.
/// 2. Attach query parameters and the bearer credential.
/// 3. Send an HTTP GET request.
/// 4. Return the status with the body as text, whatever the status is.
impl<'a> Executer<'a, GetRequest> for GetExe {
    type Response = HttpResponse;
    type Error = ExecuteError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'a>>;

    fn execute(&'a self, req: &'a GetRequest) -> Self::Future {
        Box::pin(async move {
            let url = Url::parse(&req.url).map_err(|e| ExecuteError::URL(e.to_string()))?;

            let mut builder = self.client.get(url);
            if !req.query.is_empty() {
                builder = builder.query(&req.query);
            }
            if let Some(token) = &req.bearer {
                builder = builder.bearer_auth(token);
            }

            // reqwest errors carry the request url, which may hold the token as a query parameter.
            let res = builder
                .send()
                .await
                .map_err(|e| ExecuteError::Send(e.without_url().to_string()))?;
            let status = res.status();
            let body = res
                .text()
                .await
                .map_err(|e| ExecuteError::Body(e.without_url().to_string()))?;
            Ok(HttpResponse { status, body })
        })
    }
}
