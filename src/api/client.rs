//! Thin JSON client over the cesizen REST backend.

use std::time::Duration;

use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{auth::AuthSession, log_debug, log_warn};

use super::error::ApiError;

const ENABLE_LOGS: bool = true;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Token required: a known-expired token fails fast, and 401/403
    /// responses clear the session.
    Bearer,
    /// Attach the token when one is held, never clear anything.
    Optional,
    Anonymous,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthSession,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, auth: AuthSession) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET returning a required JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, mode: AuthMode) -> Result<T, ApiError> {
        let builder = self.http.get(self.url(path));
        require_body(self.execute(builder, mode).await?, path)
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q, mode: AuthMode) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.http.get(self.url(path)).query(query);
        require_body(self.execute(builder, mode).await?, path)
    }

    /// Send a JSON body and decode the (possibly empty) JSON response.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        mode: AuthMode,
    ) -> Result<Option<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.request(method, self.url(path)).json(body);
        self.execute(builder, mode).await
    }

    /// Send a request without a body, ignoring any response payload.
    pub async fn send_empty(&self, method: Method, path: &str, mode: AuthMode) -> Result<(), ApiError> {
        let builder = self.http.request(method, self.url(path));
        self.execute::<Value>(builder, mode).await.map(|_| ())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        mode: AuthMode,
    ) -> Result<Option<T>, ApiError> {
        let builder = self.authorize(builder, mode)?;
        let response = builder
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        log_debug!("{} {}", status.as_u16(), response.url());

        if !status.is_success() {
            let error = error_from_response(response).await;
            if mode == AuthMode::Bearer && error.is_auth_failure() {
                log_warn!("backend rejected credentials ({}); signing out", error.status);
                self.auth.clear();
            }
            return Err(error);
        }

        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return Ok(None);
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        if !is_json {
            return Ok(None);
        }

        let text = response
            .text()
            .await
            .map_err(|err| ApiError::new(status.as_u16(), err.to_string()))?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                log_warn!("successful response carried invalid JSON: {err}");
                return Ok(None);
            }
        };
        serde_json::from_value(value).map(Some).map_err(|err| {
            ApiError::new(status.as_u16(), format!("unexpected response shape: {err}"))
        })
    }

    fn authorize(&self, builder: RequestBuilder, mode: AuthMode) -> Result<RequestBuilder, ApiError> {
        let token = match mode {
            AuthMode::Anonymous => None,
            AuthMode::Optional => self.auth.token(),
            AuthMode::Bearer => {
                let token = self.auth.token();
                if token.is_some() && self.auth.is_token_expired() {
                    self.auth.clear();
                    return Err(ApiError::new(401, "Token expiré"));
                }
                token
            }
        };
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }
}

fn require_body<T>(body: Option<T>, path: &str) -> Result<T, ApiError> {
    body.ok_or_else(|| ApiError::new(204, format!("empty response from {path}")))
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let fallback = format!(
        "Erreur {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    );

    let body: Option<Value> = response
        .text()
        .await
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok());

    let message = body
        .as_ref()
        .and_then(|body| {
            body.get("message")
                .and_then(Value::as_str)
                .or_else(|| body.get("error").and_then(Value::as_str))
        })
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or(fallback);

    ApiError::new(status.as_u16(), message).with_body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = ApiClient::new(
            "http://example.test/",
            Duration::from_secs(1),
            AuthSession::anonymous(),
        )
        .unwrap();
        assert_eq!(client.url("/api/v1/articles"), "http://example.test/api/v1/articles");
    }

    #[test]
    fn empty_body_is_reported_with_path() {
        let err = require_body::<Value>(None, "/api/v1/x").unwrap_err();
        assert!(err.message.contains("/api/v1/x"));
    }
}
