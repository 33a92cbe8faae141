pub mod commands;
pub mod controller;
pub mod events;
pub mod state;

pub use crate::error::SessionError;
pub use controller::{SessionController, DEFAULT_TICK_INTERVAL};
pub use events::{LogSink, SessionEvent, SessionEventSink};
pub use state::{
    validate_exercise, BreathingSession, SessionSnapshot, SessionStatus, SessionSummary,
    TickOutcome,
};
