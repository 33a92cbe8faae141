//! Command surface the shell calls into. Errors are flattened to strings
//! for display, like every other command in the app.

use std::sync::Arc;

use crate::{
    api::ExerciseRepository,
    catalog,
    models::Exercise,
    AppState,
};

use super::{SessionController, SessionSnapshot, SessionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseSource {
    Remote,
    Builtin,
}

fn controller_from_state(state: &AppState) -> SessionController {
    state.session.clone()
}

pub async fn load_exercise(
    repository: &dyn ExerciseRepository,
    exercise_id: i64,
    source: ExerciseSource,
) -> Result<Exercise, String> {
    match source {
        ExerciseSource::Builtin => catalog::find_builtin(exercise_id)
            .ok_or_else(|| format!("Exercice intégré {exercise_id} introuvable")),
        ExerciseSource::Remote => repository
            .fetch_exercise_by_id(exercise_id)
            .await
            .map_err(|e| e.to_string()),
    }
}

pub async fn start_from_repository(
    controller: &SessionController,
    repository: &dyn ExerciseRepository,
    exercise_id: i64,
    source: ExerciseSource,
) -> Result<SessionSnapshot, String> {
    let exercise = load_exercise(repository, exercise_id, source).await?;
    controller
        .start(Arc::new(exercise))
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_session_state(state: &AppState) -> Result<Option<SessionSnapshot>, String> {
    let controller = controller_from_state(state);
    Ok(controller.snapshot().await)
}

pub async fn start_exercise(
    state: &AppState,
    exercise_id: i64,
    source: ExerciseSource,
) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(state);
    start_from_repository(&controller, &state.exercises, exercise_id, source).await
}

pub async fn restart_exercise(state: &AppState) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(state);
    controller.restart().await.map_err(|e| e.to_string())
}

pub async fn stop_exercise(state: &AppState) -> Result<bool, String> {
    let controller = controller_from_state(state);
    Ok(controller.stop().await)
}

/// Push a finished run to the backend history. Skipped (returns `false`)
/// when nobody is signed in, or for bundled exercises whose ids mean
/// nothing to the backend.
pub async fn record_completion(
    state: &AppState,
    summary: &SessionSummary,
    source: ExerciseSource,
) -> Result<bool, String> {
    if source == ExerciseSource::Builtin || !state.auth.is_authenticated() {
        return Ok(false);
    }
    state
        .history
        .record_completion(summary)
        .await
        .map(|_| true)
        .map_err(|e| e.to_string())
}
