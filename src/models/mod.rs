pub mod article;
pub mod exercise;
pub mod history;
pub mod phase;
pub mod user;

pub use article::{Article, ArticleCategory, ArticleInput, Listing, Page};
pub use exercise::{Exercise, ExerciseDraft, WireExercise};
pub use history::{HistoryEntry, HistoryInput, HistoryStats};
pub use phase::{Phase, PhaseKind, WirePhase, INHALED_SCALE, REST_SCALE};
pub use user::{Role, User, UserInput};
