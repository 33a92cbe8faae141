use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::User;

use super::{
    client::{ApiClient, AuthMode},
    error::ApiError,
};

const PROFILE: &str = "/api/v1/profile";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Clone)]
pub struct ProfileService {
    client: ApiClient,
}

impl ProfileService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<User, ApiError> {
        self.client.get(PROFILE, AuthMode::Bearer).await
    }

    /// Partial update; the refreshed user replaces the cached one.
    pub async fn update(&self, update: &ProfileUpdate) -> Result<Option<User>, ApiError> {
        let updated: Option<User> = self
            .client
            .send_json(Method::PATCH, PROFILE, update, AuthMode::Bearer)
            .await?;
        if let Some(user) = &updated {
            if let Err(err) = self.client.auth().remember_user(user.clone()) {
                log::warn!("could not cache updated profile: {err:#}");
            }
        }
        Ok(updated)
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        self.client
            .send_json::<_, serde_json::Value>(
                Method::POST,
                &format!("{PROFILE}/change-password"),
                change,
                AuthMode::Bearer,
            )
            .await
            .map(|_| ())
    }

    /// Irreversibly anonymize the account, then sign out locally.
    pub async fn anonymize(&self) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::POST, &format!("{PROFILE}/anonymize"), AuthMode::Bearer)
            .await?;
        self.client.auth().clear();
        Ok(())
    }
}
