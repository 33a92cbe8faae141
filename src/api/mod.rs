pub mod articles;
pub mod auth;
pub mod client;
pub mod error;
pub mod exercises;
pub mod history;
pub mod profile;
pub mod users;

pub use articles::ArticleService;
pub use auth::{AuthService, LoginCredentials, RegisterData};
pub use client::{ApiClient, AuthMode, DEFAULT_API_BASE_URL};
pub use error::ApiError;
pub use exercises::{ExerciseRepository, ExerciseService};
pub use history::HistoryService;
pub use profile::{PasswordChange, ProfileService, ProfileUpdate};
pub use users::{UserQuery, UserService};
