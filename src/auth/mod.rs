pub mod jwt;
pub mod session;
pub mod token_store;

pub use session::AuthSession;
pub use token_store::TokenStore;
