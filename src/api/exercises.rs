//! Breathing exercise endpoints.
//!
//! Phases travel in wire form; everything returned here is already mapped
//! to canonical phases.

use async_trait::async_trait;
use reqwest::Method;

use crate::{
    log_error,
    models::{Exercise, ExerciseDraft, WireExercise},
};

use super::{
    client::{ApiClient, AuthMode},
    error::ApiError,
};

const ENABLE_LOGS: bool = true;

const EXERCISES: &str = "/api/v1/exercices";

/// Source of exercise definitions for playback and management screens.
#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    async fn fetch_exercise_by_id(&self, id: i64) -> Result<Exercise, ApiError>;
    async fn list_default_exercises(&self) -> Result<Vec<Exercise>, ApiError>;
    async fn list_user_exercises(&self) -> Result<Vec<Exercise>, ApiError>;
    async fn create_exercise(&self, draft: &ExerciseDraft) -> Result<Option<Exercise>, ApiError>;
    async fn update_exercise(&self, id: i64, draft: &ExerciseDraft) -> Result<Option<Exercise>, ApiError>;
    async fn delete_exercise(&self, id: i64) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct ExerciseService {
    client: ApiClient,
}

impl ExerciseService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_all_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        self.list(EXERCISES, AuthMode::Bearer).await
    }

    /// Admin-only creation of a curated exercise.
    pub async fn create_professional_exercise(
        &self,
        draft: &ExerciseDraft,
    ) -> Result<Option<Exercise>, ApiError> {
        let path = format!("{EXERCISES}/professional");
        self.client
            .send_json::<_, WireExercise>(Method::POST, &path, draft, AuthMode::Bearer)
            .await
            .map(|created| created.map(WireExercise::into_exercise))
            .map_err(|err| {
                log_error!("creating professional exercise failed: {err}");
                match err.status {
                    403 => err.with_message(
                        "Seuls les administrateurs peuvent créer des exercices professionnels",
                    ),
                    400 => err.with_message("Données invalides pour la création de l'exercice"),
                    _ => err,
                }
            })
    }

    /// Add a shared exercise to the current user's list.
    pub async fn add_to_user(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{EXERCISES}/{id}/add");
        self.client.send_empty(Method::POST, &path, AuthMode::Bearer).await
    }

    pub async fn remove_from_user(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{EXERCISES}/{id}/remove");
        self.client.send_empty(Method::DELETE, &path, AuthMode::Bearer).await
    }

    async fn list(&self, path: &str, mode: AuthMode) -> Result<Vec<Exercise>, ApiError> {
        let wire: Vec<WireExercise> = self.client.get(path, mode).await?;
        Ok(wire.into_iter().map(WireExercise::into_exercise).collect())
    }
}

fn refine_mutation_error(err: ApiError, action: &str) -> ApiError {
    log_error!("{action} exercise failed: {err}");
    match err.status {
        403 => {
            let message = format!("Vous n'êtes pas autorisé à {action} cet exercice");
            err.with_message(message)
        }
        404 => err.with_message("Exercice introuvable"),
        400 => err.with_message(format!("Données invalides pour {action} l'exercice")),
        _ => err,
    }
}

#[async_trait]
impl ExerciseRepository for ExerciseService {
    async fn fetch_exercise_by_id(&self, id: i64) -> Result<Exercise, ApiError> {
        let path = format!("{EXERCISES}/{id}");
        let wire: WireExercise = self.client.get(&path, AuthMode::Optional).await?;
        Ok(wire.into_exercise())
    }

    async fn list_default_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        self.list(&format!("{EXERCISES}/defaults"), AuthMode::Optional)
            .await
    }

    async fn list_user_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        self.list(&format!("{EXERCISES}/user"), AuthMode::Bearer).await
    }

    async fn create_exercise(&self, draft: &ExerciseDraft) -> Result<Option<Exercise>, ApiError> {
        self.client
            .send_json::<_, WireExercise>(Method::POST, EXERCISES, draft, AuthMode::Bearer)
            .await
            .map(|created| created.map(WireExercise::into_exercise))
            .map_err(|err| refine_mutation_error(err, "créer"))
    }

    async fn update_exercise(&self, id: i64, draft: &ExerciseDraft) -> Result<Option<Exercise>, ApiError> {
        let path = format!("{EXERCISES}/{id}");
        self.client
            .send_json::<_, WireExercise>(Method::PUT, &path, draft, AuthMode::Bearer)
            .await
            .map(|updated| updated.map(WireExercise::into_exercise))
            .map_err(|err| refine_mutation_error(err, "modifier"))
    }

    async fn delete_exercise(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{EXERCISES}/{id}");
        self.client
            .send_empty(Method::DELETE, &path, AuthMode::Bearer)
            .await
            .map_err(|err| refine_mutation_error(err, "supprimer"))
    }
}
