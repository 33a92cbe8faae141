use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{log_info, log_warn, models::User};

use super::{
    client::{ApiClient, AuthMode},
    error::ApiError,
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and remember both token and user.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, ApiError> {
        log_info!("signing in as {}", credentials.username_or_email);
        let response: Option<LoginResponse> = self
            .client
            .send_json(Method::POST, "/api/v1/auth/login", credentials, AuthMode::Anonymous)
            .await?;

        let (token, user) = match response {
            Some(LoginResponse {
                token: Some(token),
                user: Some(user),
            }) if !token.is_empty() => (token, user),
            _ => return Err(ApiError::new(200, "Données de réponse invalides")),
        };

        self.client
            .auth()
            .establish(token, user.clone())
            .map_err(|err| ApiError::transport(format!("failed to store credentials: {err:#}")))?;
        Ok(user)
    }

    pub async fn register(&self, data: &RegisterData) -> Result<Option<serde_json::Value>, ApiError> {
        self.client
            .send_json(Method::POST, "/api/v1/auth/register", data, AuthMode::Anonymous)
            .await
    }

    /// Cached user when available, otherwise asks the backend. Any failure
    /// signs the session out.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        if let Some(user) = self.client.auth().user() {
            return Ok(user);
        }
        match self.client.get::<User>("/api/v1/auth/me", AuthMode::Bearer).await {
            Ok(user) => {
                if let Err(err) = self.client.auth().remember_user(user.clone()) {
                    log_warn!("could not cache current user: {err:#}");
                }
                Ok(user)
            }
            Err(err) => {
                self.client.auth().clear();
                Err(err)
            }
        }
    }

    /// Best-effort server logout; local credentials are always dropped.
    pub async fn logout(&self) {
        if let Err(err) = self
            .client
            .send_empty(Method::POST, "/api/v1/auth/logout", AuthMode::Bearer)
            .await
        {
            log_warn!("server logout failed: {err}");
        }
        self.client.auth().clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.auth().is_authenticated()
    }
}
