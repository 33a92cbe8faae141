use reqwest::Method;

use crate::models::{Article, ArticleInput, Listing};

use super::{
    client::{ApiClient, AuthMode},
    error::ApiError,
};

const ARTICLES: &str = "/api/v1/articles";

/// Articles are public to read; writes need an admin token.
#[derive(Clone)]
pub struct ArticleService {
    client: ApiClient,
}

impl ArticleService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Article>, ApiError> {
        let listing: Listing<Article> = self.client.get(ARTICLES, AuthMode::Anonymous).await?;
        Ok(listing.into_items())
    }

    pub async fn get(&self, id: i64) -> Result<Article, ApiError> {
        self.client
            .get(&format!("{ARTICLES}/{id}"), AuthMode::Anonymous)
            .await
    }

    pub async fn create(&self, article: &ArticleInput) -> Result<Option<Article>, ApiError> {
        self.client
            .send_json(Method::POST, ARTICLES, article, AuthMode::Bearer)
            .await
    }

    pub async fn update(&self, id: i64, article: &ArticleInput) -> Result<Option<Article>, ApiError> {
        self.client
            .send_json(Method::PUT, &format!("{ARTICLES}/{id}"), article, AuthMode::Bearer)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::DELETE, &format!("{ARTICLES}/{id}"), AuthMode::Bearer)
            .await
    }
}
