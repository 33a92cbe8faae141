use reqwest::Method;

use crate::{
    breathing::SessionSummary,
    models::{HistoryEntry, HistoryInput, HistoryStats},
};

use super::{
    client::{ApiClient, AuthMode},
    error::ApiError,
};

const HISTORY: &str = "/api/v1/historique";

#[derive(Clone)]
pub struct HistoryService {
    client: ApiClient,
}

impl HistoryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.client.get(HISTORY, AuthMode::Bearer).await
    }

    pub async fn add(&self, input: &HistoryInput) -> Result<Option<HistoryEntry>, ApiError> {
        self.client
            .send_json(Method::POST, HISTORY, input, AuthMode::Bearer)
            .await
    }

    pub async fn record_completion(&self, summary: &SessionSummary) -> Result<Option<HistoryEntry>, ApiError> {
        self.add(&HistoryInput {
            exercise_id: summary.exercise_id,
            duration_seconds: summary.total_duration_seconds,
            completed_at: summary.finished_at,
        })
        .await
    }

    pub async fn stats(&self) -> Result<HistoryStats, ApiError> {
        self.client
            .get(&format!("{HISTORY}/stats"), AuthMode::Bearer)
            .await
    }
}
