mod common;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use cesizen_lib::{
    api::{ApiError, ExerciseRepository},
    auth::AuthSession,
    breathing::{
        commands::{self, ExerciseSource},
        LogSink, SessionController, SessionEvent, SessionStatus, SessionSummary,
    },
    config::AppConfig,
    models::{Exercise, ExerciseDraft, Phase, PhaseKind},
    AppState,
};
use common::{signed_in, spawn_backend, token_expiring_in};
use serde_json::{json, Value};

#[derive(Default)]
struct FakeRepository {
    exercises: HashMap<i64, Exercise>,
    fetches: AtomicUsize,
}

impl FakeRepository {
    fn with(exercises: Vec<Exercise>) -> Self {
        Self {
            exercises: exercises.into_iter().map(|e| (e.id, e)).collect(),
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ExerciseRepository for FakeRepository {
    async fn fetch_exercise_by_id(&self, id: i64) -> Result<Exercise, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.exercises
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::new(404, "Exercice introuvable"))
    }

    async fn list_default_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        Ok(self.exercises.values().cloned().collect())
    }

    async fn list_user_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        Ok(Vec::new())
    }

    async fn create_exercise(&self, _draft: &ExerciseDraft) -> Result<Option<Exercise>, ApiError> {
        Ok(None)
    }

    async fn update_exercise(&self, _id: i64, _draft: &ExerciseDraft) -> Result<Option<Exercise>, ApiError> {
        Ok(None)
    }

    async fn delete_exercise(&self, _id: i64) -> Result<(), ApiError> {
        Ok(())
    }
}

fn exercise(id: i64, phases: Vec<Phase>) -> Exercise {
    Exercise {
        id,
        label: format!("Exercice {id}"),
        description: String::new(),
        phases,
        is_professional: false,
    }
}

fn log_controller() -> SessionController {
    SessionController::new(Arc::new(LogSink), Duration::from_secs(1))
}

#[tokio::test(start_paused = true)]
async fn starts_remote_exercise_from_repository() {
    let repository = FakeRepository::with(vec![exercise(
        10,
        vec![
            Phase::new(PhaseKind::Exhale, 3),
            Phase::new(PhaseKind::Inhale, 2),
        ],
    )]);
    let controller = log_controller();

    let snapshot =
        commands::start_from_repository(&controller, &repository, 10, ExerciseSource::Remote)
            .await
            .unwrap();

    assert_eq!(snapshot.status, SessionStatus::Running);
    assert_eq!(snapshot.current_phase_index, 0);
    assert_eq!(snapshot.seconds_remaining, 3);
    assert_eq!(snapshot.visual_scale, 1.3);
    assert_eq!(repository.fetches.load(Ordering::SeqCst), 1);
    assert!(controller.stop().await);
}

#[tokio::test(start_paused = true)]
async fn builtin_source_skips_repository() {
    let repository = FakeRepository::default();
    let controller = log_controller();

    let snapshot =
        commands::start_from_repository(&controller, &repository, 2, ExerciseSource::Builtin)
            .await
            .unwrap();

    assert_eq!(snapshot.phase_count, 4);
    assert_eq!(snapshot.total_duration_seconds, 16);
    assert_eq!(repository.fetches.load(Ordering::SeqCst), 0);

    let err = commands::start_from_repository(&controller, &repository, 99, ExerciseSource::Builtin)
        .await
        .unwrap_err();
    assert!(err.contains("99"));
}

#[tokio::test(start_paused = true)]
async fn unknown_remote_exercise_reports_backend_error() {
    let repository = FakeRepository::default();
    let controller = log_controller();

    let err = commands::start_from_repository(&controller, &repository, 5, ExerciseSource::Remote)
        .await
        .unwrap_err();

    assert!(err.contains("Exercice introuvable"));
    assert_eq!(controller.status().await, SessionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn phaseless_exercise_cannot_start() {
    let repository = FakeRepository::with(vec![exercise(3, Vec::new())]);
    let controller = log_controller();

    let err = commands::start_from_repository(&controller, &repository, 3, ExerciseSource::Remote)
        .await
        .unwrap_err();

    assert!(err.contains("no phases"));
    assert!(controller.snapshot().await.is_none());
}

fn offline_state(auth: AuthSession) -> AppState {
    let config = AppConfig {
        api_base_url: "http://127.0.0.1:9".into(),
        ..AppConfig::default()
    };
    AppState::with_auth(config, auth).unwrap()
}

#[tokio::test(start_paused = true)]
async fn builtin_run_completes_and_skips_history_when_signed_out() {
    let state = offline_state(AuthSession::anonymous());
    let mut events = state.events.subscribe();

    // "Respiration Énergisante": 3s in, 3s out
    commands::start_exercise(&state, 4, ExerciseSource::Builtin)
        .await
        .unwrap();

    let mut ticks = 0;
    let mut phase_changes = 0;
    let summary = loop {
        match events.recv().await.unwrap() {
            SessionEvent::Tick(_) => ticks += 1,
            SessionEvent::PhaseChanged(snapshot) => {
                phase_changes += 1;
                assert_eq!(snapshot.phase_kind, Some(PhaseKind::Exhale));
            }
            SessionEvent::StateChanged(_) => {}
            SessionEvent::SessionCompleted(summary) => break summary,
        }
    };

    assert_eq!(phase_changes, 1);
    assert_eq!(ticks, 5);
    assert_eq!(summary.exercise_id, 4);
    assert_eq!(summary.total_duration_seconds, 6);

    let finished = commands::get_session_state(&state).await.unwrap().unwrap();
    assert_eq!(finished.status, SessionStatus::Finished);
    assert_eq!(
        commands::record_completion(&state, &summary, ExerciseSource::Remote).await,
        Ok(false)
    );
    assert_eq!(commands::stop_exercise(&state).await, Ok(false));

    let restarted = commands::restart_exercise(&state).await.unwrap();
    assert_eq!(restarted.status, SessionStatus::Running);
    assert_eq!(restarted.current_phase_index, 0);
    assert_ne!(restarted.session_id, finished.session_id);
    assert_eq!(commands::stop_exercise(&state).await, Ok(true));

    let stopped = commands::get_session_state(&state).await.unwrap().unwrap();
    assert_eq!(stopped.status, SessionStatus::Idle);
    assert_eq!(stopped.visual_scale, 1.0);
}

#[tokio::test]
async fn restart_without_loaded_exercise_fails() {
    let state = offline_state(AuthSession::anonymous());
    assert!(commands::restart_exercise(&state).await.is_err());
    assert_eq!(commands::get_session_state(&state).await, Ok(None));
}

#[tokio::test]
async fn completion_is_recorded_only_for_signed_in_remote_runs() {
    let captured: Arc<Mutex<Vec<Value>>> = Arc::default();
    let app = Router::new()
        .route(
            "/api/v1/historique",
            post(
                |State(captured): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>| async move {
                    captured.lock().unwrap().push(body.clone());
                    Json(json!({ "id": 1, "exerciseId": body["exerciseId"], "durationSeconds": body["durationSeconds"] }))
                },
            ),
        )
        .with_state(captured.clone());
    let base = spawn_backend(app).await;
    let config = AppConfig {
        api_base_url: base,
        ..AppConfig::default()
    };
    let state = AppState::with_auth(config, signed_in(token_expiring_in(3600))).unwrap();

    let now = chrono::Utc::now();
    let summary = SessionSummary {
        session_id: "s-1".into(),
        exercise_id: 2,
        label: "Respiration Carrée".into(),
        phase_count: 4,
        total_duration_seconds: 16,
        started_at: now - chrono::Duration::seconds(16),
        finished_at: now,
    };

    assert_eq!(
        commands::record_completion(&state, &summary, ExerciseSource::Builtin).await,
        Ok(false)
    );
    assert!(captured.lock().unwrap().is_empty());

    assert_eq!(
        commands::record_completion(&state, &summary, ExerciseSource::Remote).await,
        Ok(true)
    );

    let sent = captured.lock().unwrap()[0].clone();
    assert_eq!(sent["exerciseId"], json!(2));
    assert_eq!(captured.lock().unwrap().len(), 1);
    assert_eq!(sent["durationSeconds"], json!(16));
    assert!(sent["completedAt"].is_string());
}
