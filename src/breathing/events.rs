use serde::Serialize;
use tokio::sync::broadcast;

use super::state::{SessionSnapshot, SessionSummary};

pub const STATE_CHANGED: &str = "breathing-state-changed";
pub const TICK: &str = "breathing-tick";
pub const PHASE_CHANGED: &str = "breathing-phase-changed";
pub const SESSION_COMPLETED: &str = "breathing-session-completed";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum SessionEvent {
    StateChanged(SessionSnapshot),
    Tick(SessionSnapshot),
    PhaseChanged(SessionSnapshot),
    SessionCompleted(SessionSummary),
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::StateChanged(_) => STATE_CHANGED,
            SessionEvent::Tick(_) => TICK,
            SessionEvent::PhaseChanged(_) => PHASE_CHANGED,
            SessionEvent::SessionCompleted(_) => SESSION_COMPLETED,
        }
    }
}

/// Destination for session events; the rendering layer plugs in here.
pub trait SessionEventSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

impl SessionEventSink for broadcast::Sender<SessionEvent> {
    fn emit(&self, event: SessionEvent) {
        // No receivers is fine: nobody is rendering right now.
        let _ = self.send(event);
    }
}

/// Sink that only logs; used when no renderer is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SessionEventSink for LogSink {
    fn emit(&self, event: SessionEvent) {
        match &event {
            SessionEvent::SessionCompleted(summary) => log::info!(
                "{}: session {} finished ({}s)",
                event.name(),
                summary.session_id,
                summary.total_duration_seconds
            ),
            SessionEvent::StateChanged(snapshot)
            | SessionEvent::Tick(snapshot)
            | SessionEvent::PhaseChanged(snapshot) => log::debug!(
                "{}: {:?} phase {}/{} {}s scale {:.3}",
                event.name(),
                snapshot.status,
                snapshot.current_phase_index + 1,
                snapshot.phase_count,
                snapshot.seconds_remaining,
                snapshot.visual_scale
            ),
        }
    }
}
