use reqwest::Method;
use serde::Serialize;

use crate::models::{Page, User, UserInput};

use super::{
    client::{ApiClient, AuthMode},
    error::ApiError,
};

const USERS: &str = "/api/v1/users";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserQuery {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            search: None,
        }
    }
}

/// Admin user management.
#[derive(Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &UserQuery) -> Result<Page<User>, ApiError> {
        let query = UserQuery {
            search: query.search.clone().filter(|search| !search.is_empty()),
            ..query.clone()
        };
        self.client
            .get_with_query(USERS, &query, AuthMode::Bearer)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        self.client
            .get(&format!("{USERS}/{id}"), AuthMode::Bearer)
            .await
    }

    pub async fn create(&self, input: &UserInput) -> Result<Option<User>, ApiError> {
        self.client
            .send_json(Method::POST, USERS, input, AuthMode::Bearer)
            .await
    }

    pub async fn update(&self, id: i64, input: &UserInput) -> Result<Option<User>, ApiError> {
        self.client
            .send_json(Method::PUT, &format!("{USERS}/{id}"), input, AuthMode::Bearer)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::DELETE, &format!("{USERS}/{id}"), AuthMode::Bearer)
            .await
    }
}
