use std::{sync::Arc, time::Duration};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant},
};
use tokio_util::sync::CancellationToken;

use crate::{log_debug, log_info, models::Exercise};

use super::{
    events::{SessionEvent, SessionEventSink},
    state::{BreathingSession, SessionSnapshot, SessionStatus, SessionSummary, TickOutcome},
    SessionError,
};

const ENABLE_LOGS: bool = true;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

struct Ticker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

/// Drives a [`BreathingSession`] from a recurring timer and publishes every
/// transition to an event sink.
///
/// `start` and `stop` hold the session lock for their whole critical
/// section, so a tick never observes a half-applied transition.
#[derive(Clone)]
pub struct SessionController {
    session: Arc<Mutex<Option<BreathingSession>>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    sink: Arc<dyn SessionEventSink>,
    tick_interval: Duration,
}

impl SessionController {
    pub fn new(sink: Arc<dyn SessionEventSink>, tick_interval: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            ticker: Arc::new(Mutex::new(None)),
            sink,
            tick_interval,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        self.session.lock().await.as_ref().map(BreathingSession::snapshot)
    }

    pub async fn status(&self) -> SessionStatus {
        self.session
            .lock()
            .await
            .as_ref()
            .map(BreathingSession::status)
            .unwrap_or_default()
    }

    pub async fn summary(&self) -> Option<SessionSummary> {
        self.session
            .lock()
            .await
            .as_ref()
            .and_then(BreathingSession::summary)
    }

    /// Start playing `exercise`, replacing whatever was loaded before.
    ///
    /// An invalid exercise is rejected before the current session is
    /// touched.
    pub async fn start(&self, exercise: Arc<Exercise>) -> Result<SessionSnapshot, SessionError> {
        let mut session = BreathingSession::new(exercise);
        session.start()?;

        self.cancel_ticker().await;
        let snapshot = {
            let mut guard = self.session.lock().await;
            let snapshot = session.snapshot();
            *guard = Some(session);
            snapshot
        };
        self.spawn_ticker().await;

        log_info!(
            "breathing session {} started ({} phases, {}s)",
            snapshot.session_id.as_deref().unwrap_or("?"),
            snapshot.phase_count,
            snapshot.total_duration_seconds
        );
        self.sink.emit(SessionEvent::StateChanged(snapshot.clone()));
        Ok(snapshot)
    }

    /// Replay the currently loaded exercise from its first phase.
    pub async fn restart(&self) -> Result<SessionSnapshot, SessionError> {
        let exercise = {
            let guard = self.session.lock().await;
            match guard.as_ref() {
                Some(session) => session.exercise().clone(),
                None => {
                    return Err(SessionError::InvalidExercise(
                        "no exercise loaded".to_string(),
                    ))
                }
            }
        };
        self.start(exercise).await
    }

    /// Stop a running session. Returns `false` when nothing was running.
    pub async fn stop(&self) -> bool {
        let stopped = {
            let mut guard = self.session.lock().await;
            match guard.as_mut() {
                Some(session) => session.stop().then(|| session.snapshot()),
                None => None,
            }
        };

        match stopped {
            Some(snapshot) => {
                self.cancel_ticker().await;
                log_info!("breathing session stopped by caller");
                self.sink.emit(SessionEvent::StateChanged(snapshot));
                true
            }
            None => false,
        }
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.cancel.cancel();
            previous.handle.abort();
        }

        let session = self.session.clone();
        let sink = self.sink.clone();
        let tick_interval = self.tick_interval;
        let cancel = CancellationToken::new();
        let ticker_cancel = cancel.clone();
        // Deadline is taken at start, not when the task is first polled.
        let first_tick = Instant::now() + tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(first_tick, tick_interval);
            loop {
                tokio::select! {
                    _ = ticker_cancel.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let (outcome, snapshot, summary) = {
                    let mut guard = session.lock().await;
                    if ticker_cancel.is_cancelled() {
                        break;
                    }
                    let Some(active) = guard.as_mut() else {
                        break;
                    };
                    let outcome = active.tick();
                    (outcome, active.snapshot(), active.summary())
                };

                match outcome {
                    TickOutcome::Ignored => break,
                    TickOutcome::Counted => sink.emit(SessionEvent::Tick(snapshot)),
                    TickOutcome::PhaseAdvanced { index } => {
                        log_debug!("advanced to phase {}", index + 1);
                        sink.emit(SessionEvent::Tick(snapshot.clone()));
                        sink.emit(SessionEvent::PhaseChanged(snapshot));
                    }
                    TickOutcome::Finished => {
                        sink.emit(SessionEvent::StateChanged(snapshot));
                        if let Some(summary) = summary {
                            log_info!(
                                "breathing session {} completed",
                                summary.session_id
                            );
                            sink.emit(SessionEvent::SessionCompleted(summary));
                        }
                        break;
                    }
                }
            }
        });

        *ticker_guard = Some(Ticker { handle, cancel });
    }

    async fn cancel_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel.cancel();
            ticker.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breathing::events::{PHASE_CHANGED, STATE_CHANGED};
    use crate::models::{Phase, PhaseKind};
    use tokio::sync::broadcast;

    fn exercise(phases: Vec<Phase>) -> Arc<Exercise> {
        Arc::new(Exercise {
            id: 1,
            label: "Carré".into(),
            description: String::new(),
            phases,
            is_professional: false,
        })
    }

    fn controller() -> (SessionController, broadcast::Receiver<SessionEvent>) {
        let (tx, rx) = broadcast::channel(64);
        (
            SessionController::new(Arc::new(tx), Duration::from_secs(1)),
            rx,
        )
    }

    async fn advance_secs(secs: u64) {
        for _ in 0..secs {
            time::advance(Duration::from_secs(1)).await;
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_completion_and_emits_summary() {
        let (controller, mut rx) = controller();
        let snapshot = controller
            .start(exercise(vec![
                Phase::new(PhaseKind::Inhale, 2),
                Phase::new(PhaseKind::Exhale, 1),
            ]))
            .await
            .unwrap();
        assert_eq!(snapshot.status, SessionStatus::Running);

        advance_secs(3).await;

        let mut names = Vec::new();
        let mut completed = None;
        while let Ok(event) = rx.try_recv() {
            names.push(event.name());
            if let SessionEvent::SessionCompleted(summary) = event {
                completed = Some(summary);
            }
        }

        assert_eq!(names.first(), Some(&STATE_CHANGED));
        assert!(names.contains(&PHASE_CHANGED));
        let summary = completed.expect("session-completed event");
        assert_eq!(summary.total_duration_seconds, 3);
        assert_eq!(controller.status().await, SessionStatus::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_returns_to_idle_without_completion() {
        let (controller, mut rx) = controller();
        controller
            .start(exercise(vec![Phase::new(PhaseKind::Inhale, 10)]))
            .await
            .unwrap();
        advance_secs(2).await;

        assert!(controller.stop().await);
        assert_eq!(controller.status().await, SessionStatus::Idle);
        assert!(!controller.stop().await);

        advance_secs(15).await;
        let mut saw_completion = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, SessionEvent::SessionCompleted(_)) {
                saw_completion = true;
            }
        }
        assert!(!saw_completion);
        assert!(controller.summary().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_exercise_leaves_current_session_running() {
        let (controller, _rx) = controller();
        controller
            .start(exercise(vec![Phase::new(PhaseKind::Inhale, 5)]))
            .await
            .unwrap();

        let err = controller.start(exercise(vec![])).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidExercise(_)));
        assert_eq!(controller.status().await, SessionStatus::Running);

        advance_secs(2).await;
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.seconds_remaining, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replays_from_first_phase() {
        let (controller, _rx) = controller();
        controller
            .start(exercise(vec![Phase::new(PhaseKind::Exhale, 2)]))
            .await
            .unwrap();
        advance_secs(2).await;
        assert_eq!(controller.status().await, SessionStatus::Finished);

        let snapshot = controller.restart().await.unwrap();
        assert_eq!(snapshot.status, SessionStatus::Running);
        assert_eq!(snapshot.seconds_remaining, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_lands_one_interval_after_start() {
        let (controller, mut rx) = controller();
        controller
            .start(exercise(vec![Phase::new(PhaseKind::Inhale, 4)]))
            .await
            .unwrap();
        assert!(matches!(rx.try_recv(), Ok(SessionEvent::StateChanged(_))));

        advance_secs(1).await;
        match rx.try_recv() {
            Ok(SessionEvent::Tick(snapshot)) => assert_eq!(snapshot.seconds_remaining, 3),
            other => panic!("expected a tick after one interval, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn restart_without_exercise_fails() {
        let (controller, _rx) = controller();
        assert!(controller.restart().await.is_err());
        assert!(controller.snapshot().await.is_none());
    }
}
