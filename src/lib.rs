pub mod api;
pub mod auth;
pub mod breathing;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod phases;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::broadcast;

use api::{
    ApiClient, ArticleService, AuthService, ExerciseService, HistoryService, ProfileService,
    UserService,
};
use auth::{AuthSession, TokenStore};
use breathing::{SessionController, SessionEvent};
use cli::Cli;
use config::AppConfig;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct AppState {
    pub config: AppConfig,
    pub auth: AuthSession,
    pub events: broadcast::Sender<SessionEvent>,
    pub session: SessionController,
    pub exercises: ExerciseService,
    pub auth_api: AuthService,
    pub articles: ArticleService,
    pub users: UserService,
    pub profile: ProfileService,
    pub history: HistoryService,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data dir {}", config.data_dir.display())
        })?;

        let store = TokenStore::new(config.auth_file())?;
        let auth = AuthSession::load(store);
        Self::with_auth(config, auth)
    }

    /// Wire every service around an already-built session.
    pub fn with_auth(config: AppConfig, auth: AuthSession) -> anyhow::Result<Self> {
        let client = ApiClient::new(&config.api_base_url, config.request_timeout, auth.clone())?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session = SessionController::new(Arc::new(events.clone()), config.tick_interval);

        Ok(Self {
            auth,
            events,
            session,
            exercises: ExerciseService::new(client.clone()),
            auth_api: AuthService::new(client.clone()),
            articles: ArticleService::new(client.clone()),
            users: UserService::new(client.clone()),
            profile: ProfileService::new(client.clone()),
            history: HistoryService::new(client),
            config,
        })
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()
        .with_api_base_url(cli.api_url.clone())
        .with_data_dir(cli.data_dir.clone());

    let level = if cli.verbose || config.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    // RUST_LOG still wins over the default level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    log::debug!("cesizen starting up against {}", config.api_base_url);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async move {
        let state = AppState::new(config)?;
        cli::execute(cli.command, &state).await
    })
}
