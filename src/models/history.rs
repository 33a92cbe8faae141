use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Completed exercise as recorded by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub exercise_id: i64,
    #[serde(default)]
    pub exercise_label: Option<String>,
    #[serde(default)]
    pub duration_seconds: i64,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInput {
    pub exercise_id: i64,
    pub duration_seconds: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub total_duration_seconds: i64,
    #[serde(default)]
    pub favorite_exercise: Option<String>,
}
