use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Exercise, Phase, PhaseKind, INHALED_SCALE, REST_SCALE};

use super::SessionError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Finished,
}

/// What a single tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session was not running; nothing changed.
    Ignored,
    /// Same phase, one second less.
    Counted,
    PhaseAdvanced { index: usize },
    Finished,
}

/// Render view of a session, produced after every transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Option<String>,
    pub exercise_id: i64,
    pub status: SessionStatus,
    pub current_phase_index: usize,
    pub phase_count: usize,
    pub seconds_remaining: i64,
    pub visual_scale: f64,
    pub phase_kind: Option<PhaseKind>,
    pub instruction: String,
    pub total_duration_seconds: i64,
    pub elapsed_seconds: i64,
}

/// Shown once a run completes naturally; never produced by a manual stop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub exercise_id: i64,
    pub label: String,
    pub phase_count: usize,
    pub total_duration_seconds: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Playback state machine for one exercise.
///
/// The exercise is an immutable snapshot shared with whoever supplied it;
/// playing something else means building a new session.
#[derive(Debug, Clone)]
pub struct BreathingSession {
    exercise: Arc<Exercise>,
    status: SessionStatus,
    current_phase_index: usize,
    seconds_remaining: i64,
    /// Scale at the start of the current phase; the previous phase's end value.
    start_scale: f64,
    elapsed_seconds: i64,
    session_id: Option<String>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl BreathingSession {
    pub fn new(exercise: Arc<Exercise>) -> Self {
        Self {
            exercise,
            status: SessionStatus::Idle,
            current_phase_index: 0,
            seconds_remaining: 0,
            start_scale: REST_SCALE,
            elapsed_seconds: 0,
            session_id: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn exercise(&self) -> &Arc<Exercise> {
        &self.exercise
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_phase_index(&self) -> usize {
        self.current_phase_index
    }

    pub fn seconds_remaining(&self) -> i64 {
        self.seconds_remaining
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        match self.status {
            SessionStatus::Idle => None,
            SessionStatus::Running | SessionStatus::Finished => {
                self.exercise.phases.get(self.current_phase_index)
            }
        }
    }

    /// Begin (or restart) playback from the first phase.
    ///
    /// Fails without touching any state when the exercise has no phases or
    /// a phase whose duration is not positive.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.begin_at(Utc::now())
    }

    pub(crate) fn begin_at(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        validate_exercise(&self.exercise)?;
        let first = &self.exercise.phases[0];

        self.status = SessionStatus::Running;
        self.current_phase_index = 0;
        self.seconds_remaining = first.duration_seconds;
        self.start_scale = first.kind.opening_scale();
        self.elapsed_seconds = 0;
        self.session_id = Some(Uuid::new_v4().to_string());
        self.started_at = Some(now);
        self.finished_at = None;
        Ok(())
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != SessionStatus::Running {
            return TickOutcome::Ignored;
        }

        self.seconds_remaining -= 1;
        self.elapsed_seconds += 1;
        if self.seconds_remaining > 0 {
            return TickOutcome::Counted;
        }

        let completed = &self.exercise.phases[self.current_phase_index];
        self.start_scale = completed.kind.terminal_scale(self.start_scale);

        let next_index = self.current_phase_index + 1;
        match self.exercise.phases.get(next_index) {
            Some(next) => {
                self.current_phase_index = next_index;
                self.seconds_remaining = next.duration_seconds;
                TickOutcome::PhaseAdvanced { index: next_index }
            }
            None => {
                self.seconds_remaining = 0;
                self.status = SessionStatus::Finished;
                self.finished_at = Some(Utc::now());
                TickOutcome::Finished
            }
        }
    }

    /// Abort a running session. Returns `false` (and changes nothing) when
    /// the session is already idle or finished.
    pub fn stop(&mut self) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        self.status = SessionStatus::Idle;
        self.current_phase_index = 0;
        self.seconds_remaining = 0;
        self.start_scale = REST_SCALE;
        self.elapsed_seconds = 0;
        true
    }

    pub fn visual_scale(&self) -> f64 {
        match self.status {
            SessionStatus::Idle => REST_SCALE,
            SessionStatus::Finished => clamp_scale(self.start_scale),
            SessionStatus::Running => {
                let phase = &self.exercise.phases[self.current_phase_index];
                let duration = phase.duration_seconds as f64;
                let progress = ((duration - self.seconds_remaining as f64) / duration).clamp(0.0, 1.0);
                let start = self.start_scale;
                let scale = match phase.kind {
                    PhaseKind::Inhale => start + progress * (INHALED_SCALE - start),
                    PhaseKind::Exhale => start - progress * (start - REST_SCALE),
                    PhaseKind::Hold => start,
                };
                clamp_scale(scale)
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let phase = self.current_phase();
        SessionSnapshot {
            session_id: self.session_id.clone(),
            exercise_id: self.exercise.id,
            status: self.status,
            current_phase_index: self.current_phase_index,
            phase_count: self.exercise.phase_count(),
            seconds_remaining: self.seconds_remaining,
            visual_scale: self.visual_scale(),
            phase_kind: phase.map(|p| p.kind),
            instruction: phase
                .map(|p| p.display_instruction().to_string())
                .unwrap_or_default(),
            total_duration_seconds: self.exercise.total_duration_seconds(),
            elapsed_seconds: self.elapsed_seconds,
        }
    }

    /// Completion summary; only available once the run finished naturally.
    pub fn summary(&self) -> Option<SessionSummary> {
        if self.status != SessionStatus::Finished {
            return None;
        }
        let started_at = self.started_at?;
        Some(SessionSummary {
            session_id: self.session_id.clone()?,
            exercise_id: self.exercise.id,
            label: self.exercise.label.clone(),
            phase_count: self.exercise.phase_count(),
            total_duration_seconds: self.exercise.total_duration_seconds(),
            started_at,
            finished_at: self.finished_at.unwrap_or(started_at),
        })
    }
}

fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(REST_SCALE, INHALED_SCALE)
}

pub fn validate_exercise(exercise: &Exercise) -> Result<(), SessionError> {
    if exercise.phases.is_empty() {
        return Err(SessionError::InvalidExercise(format!(
            "exercise {} has no phases",
            exercise.id
        )));
    }
    if let Some((position, phase)) = exercise
        .phases
        .iter()
        .enumerate()
        .find(|(_, phase)| phase.duration_seconds <= 0)
    {
        return Err(SessionError::InvalidExercise(format!(
            "phase {} of exercise {} has non-positive duration {}",
            position + 1,
            exercise.id,
            phase.duration_seconds
        )));
    }
    Ok(())
}
