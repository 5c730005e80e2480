//! HTTP client for Taskboard API requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the Taskboard API, handling authentication and response parsing.

use super::error::ApiError;
use crate::session::Session;
use log::*;
use reqwest::Method;
use serde::de::DeserializeOwned;

/// Makes requests to the Taskboard API and tries to conform response data to
/// the given model.
///
#[derive(Clone)]
pub struct Client {
    pub(crate) base_url: String,
    pub(crate) session: Session,
    pub(crate) http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL and session.
    ///
    pub fn new(base_url: &str, session: Session) -> Self {
        Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            session,
            http_client: reqwest::Client::new(),
        }
    }

    /// Return the response body of a GET request decoded into the model.
    ///
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let body = self.call(Method::GET, path, params, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Return the response body of a request with a JSON body decoded into
    /// the model.
    ///
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        let body = self.call(method, path, &[], Some(body)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Make a request whose response body is not needed.
    ///
    pub async fn send_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        self.call(method, path, &[], body).await?;
        Ok(())
    }

    /// Make request and return the raw response body or error.
    ///
    async fn call(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let request_url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, request_url);

        let mut request = self.http_client.request(method, &request_url);
        if !params.is_empty() {
            request = request.query(params);
        }

        // Token is read per request so session changes apply immediately
        if let Some(token) = self.session.token()? {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            warn!(
                "API request to {} failed with status {}: {}",
                request_url, status, message
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(text)
    }
}

/// Extract a human-readable message from an error response body.
///
fn error_message(body: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        Err(_) if !body.trim().is_empty() => Some(body.trim().to_string()),
        Err(_) => None,
    }
}
