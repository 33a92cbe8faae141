use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;

use crate::{
    api::{ExerciseRepository, LoginCredentials, PasswordChange, ProfileUpdate, RegisterData, UserQuery},
    breathing::{
        commands::{self, ExerciseSource},
        SessionEvent, SessionSnapshot, SessionStatus, SessionSummary,
    },
    catalog,
    config::{ENV_API_URL, ENV_DATA_DIR},
    models::{
        user, Article, ArticleCategory, ArticleInput, Exercise, ExerciseDraft, Phase, Role,
        UserInput, INHALED_SCALE, REST_SCALE,
    },
    phases::classify_phase_name_detailed,
    AppState,
};

#[derive(Debug, Parser)]
#[command(name = "cesizen", version, about = "Guided breathing exercises and wellness articles")]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = ENV_API_URL, global = true)]
    pub api_url: Option<String>,

    /// Directory holding local auth state
    #[arg(long, env = ENV_DATA_DIR, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the token
    Login {
        #[arg(short, long)]
        user: String,
        #[arg(long, env = "CESIZEN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register(RegisterArgs),
    /// Sign out and forget the token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage breathing exercises
    #[command(subcommand)]
    Exercises(ExerciseCommand),
    /// Play a breathing exercise
    Play {
        id: i64,
        /// Use the bundled exercise instead of fetching from the backend
        #[arg(long)]
        builtin: bool,
    },
    /// Read wellness articles
    #[command(subcommand)]
    Articles(ArticleCommand),
    /// Administer users
    #[command(subcommand)]
    Users(UserCommand),
    /// View or edit the signed-in account
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Show completed exercises
    History {
        #[arg(long)]
        stats: bool,
    },
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "CESIZEN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Subcommand)]
pub enum ExerciseCommand {
    List {
        /// Shared default exercises (the default listing)
        #[arg(long, conflicts_with_all = ["mine", "all", "builtin"])]
        defaults: bool,
        /// Exercises saved by the signed-in user
        #[arg(long, conflicts_with_all = ["all", "builtin"])]
        mine: bool,
        /// Every exercise visible to the signed-in user
        #[arg(long, conflicts_with = "builtin")]
        all: bool,
        /// Bundled exercises, no backend needed
        #[arg(long)]
        builtin: bool,
    },
    Show {
        id: i64,
        #[arg(long)]
        builtin: bool,
    },
    Create {
        #[arg(long)]
        label: String,
        #[arg(long, default_value = "")]
        description: String,
        /// kind:seconds[:instruction], repeatable, in playback order
        #[arg(long = "phase", required = true, value_parser = parse_phase_arg)]
        phases: Vec<Phase>,
        /// Publish as a curated exercise (admins only)
        #[arg(long)]
        professional: bool,
    },
    /// Edit an exercise; omitted fields keep their current value
    Update {
        id: i64,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replaces the whole phase list when given
        #[arg(long = "phase", value_parser = parse_phase_arg)]
        phases: Vec<Phase>,
    },
    Delete {
        id: i64,
    },
    /// Save a shared exercise to your list
    Add {
        id: i64,
    },
    /// Drop an exercise from your list
    Remove {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ArticleCommand {
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        summary: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        summary: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Password {
        #[arg(long, env = "CESIZEN_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "CESIZEN_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
    /// Anonymize the account for good and sign out
    Anonymize {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: i64,
    },
    Create {
        #[command(flatten)]
        fields: UserFields,
    },
    Update {
        id: i64,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct UserFields {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, env = "CESIZEN_USER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Repeatable, e.g. `--role admin`
    #[arg(long = "role")]
    pub roles: Vec<String>,
}

impl From<UserFields> for UserInput {
    fn from(fields: UserFields) -> Self {
        UserInput {
            name: fields.name,
            username: fields.username,
            email: fields.email,
            password: fields.password,
            roles: fields.roles.into_iter().map(Role::new).collect(),
        }
    }
}

/// Parse `kind:seconds[:instruction]`. Unlike backend data, user input with
/// an unknown kind is rejected rather than degraded to a hold.
pub fn parse_phase_arg(raw: &str) -> Result<Phase, String> {
    let mut parts = raw.splitn(3, ':');
    let kind_raw = parts.next().unwrap_or_default();
    let seconds_raw = parts
        .next()
        .ok_or_else(|| format!("expected kind:seconds, got {raw:?}"))?;
    let instruction = parts.next().unwrap_or_default();

    let classification = classify_phase_name_detailed(kind_raw);
    if !classification.recognized {
        return Err(format!(
            "unknown phase kind {kind_raw:?} (use inhale, exhale or hold)"
        ));
    }
    let seconds: i64 = seconds_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration {seconds_raw:?}"))?;
    if seconds <= 0 {
        return Err(format!("duration must be positive, got {seconds}"));
    }

    Ok(Phase::new(classification.kind, seconds).with_instruction(instruction.trim()))
}

const SCALE_BAR_WIDTH: usize = 24;

pub fn scale_bar(scale: f64) -> String {
    let ratio = ((scale - REST_SCALE) / (INHALED_SCALE - REST_SCALE)).clamp(0.0, 1.0);
    let filled = (ratio * SCALE_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        " ".repeat(SCALE_BAR_WIDTH - filled)
    )
}

pub fn format_snapshot(snapshot: &SessionSnapshot) -> String {
    let label = snapshot
        .phase_kind
        .map(|kind| kind.label())
        .unwrap_or("-");
    format!(
        "Phase {}/{} {:<12} {:>3}s {} {:.2}",
        snapshot.current_phase_index + 1,
        snapshot.phase_count,
        label,
        snapshot.seconds_remaining,
        scale_bar(snapshot.visual_scale),
        snapshot.visual_scale
    )
}

pub fn format_summary(summary: &SessionSummary) -> String {
    format!(
        "Exercice terminé : {}\n  Phases : {}\n  Temps total : {}s",
        summary.label, summary.phase_count, summary.total_duration_seconds
    )
}

pub fn format_exercise_line(exercise: &Exercise) -> String {
    let badge = if exercise.is_professional { " [pro]" } else { "" };
    format!(
        "{:>4}  {}{}  ({} phases, {}s)",
        exercise.id,
        exercise.label,
        badge,
        exercise.phase_count(),
        exercise.total_duration_seconds()
    )
}

/// Draft for `exercises update`: the current exercise with any given field
/// replaced. A non-empty `phases` replaces the whole sequence.
pub fn revise_exercise(
    current: &Exercise,
    label: Option<String>,
    description: Option<String>,
    phases: &[Phase],
) -> ExerciseDraft {
    let mut draft = ExerciseDraft::from_exercise(current);
    if !phases.is_empty() {
        draft = ExerciseDraft::new(draft.label, draft.description, phases);
    }
    if let Some(label) = label {
        draft.label = label;
    }
    if let Some(description) = description {
        draft.description = description;
    }
    draft
}

pub fn revise_article(
    current: Article,
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    summary: Option<String>,
) -> ArticleInput {
    ArticleInput {
        title: title.unwrap_or(current.title),
        content: content.unwrap_or(current.content),
        category: category
            .as_deref()
            .map(ArticleCategory::parse)
            .unwrap_or(current.category),
        summary: summary.or(current.summary),
        image_url: current.image_url,
    }
}

fn print_exercise(exercise: &Exercise) {
    println!("{}", format_exercise_line(exercise));
    if !exercise.description.is_empty() {
        println!("      {}", exercise.description);
    }
    for (index, phase) in exercise.phases.iter().enumerate() {
        println!(
            "      {}. {:<12} {:>3}s  {}",
            index + 1,
            phase.kind.label(),
            phase.duration_seconds,
            phase.display_instruction()
        );
    }
}

fn print_article(article: &Article) {
    println!("#{} {} [{}]", article.id, article.title, article.category.as_str());
    if let Some(summary) = &article.summary {
        println!("  {summary}");
    }
}

pub async fn execute(command: Command, state: &AppState) -> Result<()> {
    match command {
        Command::Login { user, password } => {
            let signed_in = state
                .auth_api
                .login(&LoginCredentials {
                    username_or_email: user,
                    password,
                })
                .await?;
            println!("Connecté en tant que {}", signed_in.display_name());
        }
        Command::Register(args) => {
            state
                .auth_api
                .register(&RegisterData {
                    name: args.name,
                    username: args.username,
                    email: args.email,
                    password: args.password,
                })
                .await?;
            println!("Inscription réussie");
        }
        Command::Logout => {
            state.auth_api.logout().await;
            println!("Déconnecté");
        }
        Command::Whoami => {
            if !state.auth.is_authenticated() {
                bail!("Non connecté");
            }
            let current = state.auth_api.current_user().await?;
            println!("{} <{}>", current.display_name(), current.email);
            let roles = user::user_roles(&current);
            if !roles.is_empty() {
                println!("Rôles : {}", roles.join(", "));
            }
        }
        Command::Exercises(command) => execute_exercises(command, state).await?,
        Command::Play { id, builtin } => {
            let source = if builtin {
                ExerciseSource::Builtin
            } else {
                ExerciseSource::Remote
            };
            play(state, id, source).await?;
        }
        Command::Articles(ArticleCommand::List { category }) => {
            let wanted = category.as_deref().map(ArticleCategory::parse);
            for article in state.articles.list().await? {
                if wanted.as_ref().map_or(true, |c| *c == article.category) {
                    print_article(&article);
                }
            }
        }
        Command::Articles(ArticleCommand::Show { id }) => {
            let article = state.articles.get(id).await?;
            print_article(&article);
            println!();
            println!("{}", article.content);
        }
        Command::Articles(command) => {
            require_admin(state)?;
            execute_article_admin(command, state).await?;
        }
        Command::Users(UserCommand::List { page, size, search }) => {
            require_admin(state)?;
            let listing = state
                .users
                .list(&UserQuery { page, size, search })
                .await?;
            for listed in &listing.content {
                println!(
                    "{:<30} {:<20} {}",
                    listed.email,
                    listed.display_name(),
                    user::user_roles(listed).join(",")
                );
            }
            println!(
                "page {}/{} ({} utilisateurs)",
                listing.number + 1,
                listing.total_pages.max(1),
                listing.total_elements
            );
        }
        Command::Users(command) => {
            require_admin(state)?;
            execute_user_admin(command, state).await?;
        }
        Command::Profile(command) => execute_profile(command, state).await?,
        Command::History { stats } => {
            if stats {
                let stats = state.history.stats().await?;
                println!("Séances : {}", stats.total_sessions);
                println!("Temps total : {}s", stats.total_duration_seconds);
                if let Some(favorite) = stats.favorite_exercise {
                    println!("Favori : {favorite}");
                }
            } else {
                for entry in state.history.list().await? {
                    println!(
                        "{}  {}  {}s",
                        entry.completed_at.as_deref().unwrap_or("-"),
                        entry
                            .exercise_label
                            .clone()
                            .unwrap_or_else(|| format!("#{}", entry.exercise_id)),
                        entry.duration_seconds
                    );
                }
            }
        }
    }
    Ok(())
}

async fn execute_exercises(command: ExerciseCommand, state: &AppState) -> Result<()> {
    match command {
        ExerciseCommand::List {
            defaults: _,
            mine,
            all,
            builtin,
        } => {
            let exercises = if builtin {
                catalog::builtin_exercises()
            } else if mine {
                state.exercises.list_user_exercises().await?
            } else if all {
                state.exercises.list_all_exercises().await?
            } else {
                state.exercises.list_default_exercises().await?
            };
            for exercise in &exercises {
                println!("{}", format_exercise_line(exercise));
            }
        }
        ExerciseCommand::Show { id, builtin } => {
            let source = if builtin {
                ExerciseSource::Builtin
            } else {
                ExerciseSource::Remote
            };
            let exercise = commands::load_exercise(&state.exercises, id, source)
                .await
                .map_err(|e| anyhow!(e))?;
            print_exercise(&exercise);
        }
        ExerciseCommand::Create {
            label,
            description,
            phases,
            professional,
        } => {
            let draft = ExerciseDraft::new(label, description, &phases);
            let created = if professional {
                if !state.auth.is_admin() {
                    bail!("Seuls les administrateurs peuvent créer des exercices professionnels");
                }
                state.exercises.create_professional_exercise(&draft).await?
            } else {
                state.exercises.create_exercise(&draft).await?
            };
            match created {
                Some(exercise) => println!("Créé : {}", format_exercise_line(&exercise)),
                None => println!("Exercice créé"),
            }
        }
        ExerciseCommand::Update {
            id,
            label,
            description,
            phases,
        } => {
            let current = state.exercises.fetch_exercise_by_id(id).await?;
            let draft = revise_exercise(&current, label, description, &phases);
            match state.exercises.update_exercise(id, &draft).await? {
                Some(exercise) => println!("Modifié : {}", format_exercise_line(&exercise)),
                None => println!("Exercice {id} modifié"),
            }
        }
        ExerciseCommand::Delete { id } => {
            state.exercises.delete_exercise(id).await?;
            println!("Exercice {id} supprimé");
        }
        ExerciseCommand::Add { id } => {
            state.exercises.add_to_user(id).await?;
            println!("Exercice {id} ajouté à vos exercices");
        }
        ExerciseCommand::Remove { id } => {
            state.exercises.remove_from_user(id).await?;
            println!("Exercice {id} retiré de vos exercices");
        }
    }
    Ok(())
}

fn require_admin(state: &AppState) -> Result<()> {
    if !state.auth.is_admin() {
        bail!("Réservé aux administrateurs");
    }
    Ok(())
}

async fn execute_article_admin(command: ArticleCommand, state: &AppState) -> Result<()> {
    match command {
        ArticleCommand::Create {
            title,
            content,
            category,
            summary,
        } => {
            let input = ArticleInput {
                title,
                content,
                category: category
                    .as_deref()
                    .map(ArticleCategory::parse)
                    .unwrap_or_default(),
                summary,
                image_url: None,
            };
            match state.articles.create(&input).await? {
                Some(article) => print_article(&article),
                None => println!("Article créé"),
            }
        }
        ArticleCommand::Update {
            id,
            title,
            content,
            category,
            summary,
        } => {
            let current = state.articles.get(id).await?;
            let input = revise_article(current, title, content, category, summary);
            match state.articles.update(id, &input).await? {
                Some(article) => print_article(&article),
                None => println!("Article {id} modifié"),
            }
        }
        ArticleCommand::Delete { id } => {
            state.articles.delete(id).await?;
            println!("Article {id} supprimé");
        }
        ArticleCommand::List { .. } | ArticleCommand::Show { .. } => {}
    }
    Ok(())
}

async fn execute_user_admin(command: UserCommand, state: &AppState) -> Result<()> {
    match command {
        UserCommand::Show { id } => {
            let shown = state.users.get(id).await?;
            println!("{} <{}>", shown.display_name(), shown.email);
            println!("Rôles : {}", user::user_roles(&shown).join(", "));
        }
        UserCommand::Create { fields } => {
            if fields.email.is_none() || fields.password.is_none() {
                bail!("--email et --password sont requis");
            }
            match state.users.create(&fields.into()).await? {
                Some(created) => println!("Utilisateur créé : {}", created.email),
                None => println!("Utilisateur créé"),
            }
        }
        UserCommand::Update { id, fields } => {
            let input: UserInput = fields.into();
            if input == UserInput::default() {
                bail!("Rien à modifier");
            }
            state.users.update(id, &input).await?;
            println!("Utilisateur {id} modifié");
        }
        UserCommand::Delete { id } => {
            state.users.delete(id).await?;
            println!("Utilisateur {id} supprimé");
        }
        UserCommand::List { .. } => {}
    }
    Ok(())
}

async fn execute_profile(command: ProfileCommand, state: &AppState) -> Result<()> {
    match command {
        ProfileCommand::Show => {
            let profile = state.profile.get().await?;
            println!("{} <{}>", profile.display_name(), profile.email);
            if let Some(username) = &profile.username {
                println!("Identifiant : {username}");
            }
        }
        ProfileCommand::Update {
            name,
            username,
            email,
        } => {
            let update = ProfileUpdate {
                name,
                username,
                email,
                avatar_url: None,
            };
            if update == ProfileUpdate::default() {
                bail!("Rien à modifier");
            }
            match state.profile.update(&update).await? {
                Some(profile) => println!("Profil mis à jour : {}", profile.display_name()),
                None => println!("Profil mis à jour"),
            }
        }
        ProfileCommand::Password { current, new } => {
            state
                .profile
                .change_password(&PasswordChange {
                    current_password: current,
                    new_password: new,
                })
                .await?;
            println!("Mot de passe modifié");
        }
        ProfileCommand::Anonymize { yes } => {
            if !yes {
                bail!("Opération irréversible : relancez avec --yes pour confirmer");
            }
            state.profile.anonymize().await?;
            println!("Compte anonymisé");
        }
    }
    Ok(())
}

async fn play(state: &AppState, exercise_id: i64, source: ExerciseSource) -> Result<()> {
    let mut events = state.events.subscribe();
    let first = commands::start_exercise(state, exercise_id, source)
        .await
        .map_err(|e| anyhow!("Impossible de démarrer l'exercice : {e}"))?;
    println!("{}", format_snapshot(&first));
    println!("  {}", first.instruction);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                signal.context("failed to listen for Ctrl-C")?;
                commands::stop_exercise(state).await.map_err(|e| anyhow!(e))?;
                println!("Séance interrompue");
                break;
            }
            event = events.recv() => match event {
                Ok(SessionEvent::Tick(snapshot)) => println!("{}", format_snapshot(&snapshot)),
                Ok(SessionEvent::PhaseChanged(snapshot)) => println!("  {}", snapshot.instruction),
                Ok(SessionEvent::StateChanged(snapshot)) if snapshot.status == SessionStatus::Idle => break,
                Ok(SessionEvent::StateChanged(_)) => {}
                Ok(SessionEvent::SessionCompleted(summary)) => {
                    println!("{}", format_summary(&summary));
                    match commands::record_completion(state, &summary, source).await {
                        Ok(true) => log::info!("Recorded session {} in history", summary.session_id),
                        Ok(false) => {}
                        Err(err) => log::warn!("Could not record history: {err}"),
                    }
                    break;
                }
                Err(RecvError::Lagged(skipped)) => log::debug!("renderer skipped {skipped} events"),
                Err(RecvError::Closed) => break,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhaseKind;
    use chrono::Utc;

    #[test]
    fn parses_phase_arguments() {
        let phase = parse_phase_arg("inhale:4:Par le nez").unwrap();
        assert_eq!(phase.kind, PhaseKind::Inhale);
        assert_eq!(phase.duration_seconds, 4);
        assert_eq!(phase.instruction, "Par le nez");

        let phase = parse_phase_arg("Rétention:2").unwrap();
        assert_eq!(phase.kind, PhaseKind::Hold);
        assert_eq!(phase.instruction, "");

        let phase = parse_phase_arg("expire:6:un: deux").unwrap();
        assert_eq!(phase.instruction, "un: deux");
    }

    #[test]
    fn rejects_bad_phase_arguments() {
        assert!(parse_phase_arg("inhale").is_err());
        assert!(parse_phase_arg("wobble:3").is_err());
        assert!(parse_phase_arg("exhale:zero").is_err());
        assert!(parse_phase_arg("exhale:0").is_err());
    }

    #[test]
    fn scale_bar_spans_rest_to_inhaled() {
        assert_eq!(scale_bar(1.0), format!("[{}]", " ".repeat(SCALE_BAR_WIDTH)));
        assert_eq!(scale_bar(1.3), format!("[{}]", "#".repeat(SCALE_BAR_WIDTH)));
        assert_eq!(scale_bar(1.15).matches('#').count(), SCALE_BAR_WIDTH / 2);
    }

    #[test]
    fn snapshot_line_shows_position_and_countdown() {
        let snapshot = SessionSnapshot {
            session_id: Some("s".into()),
            exercise_id: 1,
            status: SessionStatus::Running,
            current_phase_index: 1,
            phase_count: 3,
            seconds_remaining: 2,
            visual_scale: 1.3,
            phase_kind: Some(PhaseKind::Hold),
            instruction: String::new(),
            total_duration_seconds: 12,
            elapsed_seconds: 4,
        };
        let line = format_snapshot(&snapshot);
        assert!(line.starts_with("Phase 2/3 Pause"));
        assert!(line.contains("  2s"));
        assert!(line.ends_with("1.30"));
    }

    #[test]
    fn summary_mentions_total_time() {
        let now = Utc::now();
        let text = format_summary(&SessionSummary {
            session_id: "s".into(),
            exercise_id: 2,
            label: "Respiration Carrée".into(),
            phase_count: 4,
            total_duration_seconds: 16,
            started_at: now,
            finished_at: now,
        });
        assert!(text.contains("Respiration Carrée"));
        assert!(text.contains("16s"));
    }

    fn sample_exercise() -> Exercise {
        Exercise {
            id: 5,
            label: "Carré".into(),
            description: "4-4".into(),
            phases: vec![
                Phase::new(PhaseKind::Inhale, 4),
                Phase::new(PhaseKind::Exhale, 4),
            ],
            is_professional: false,
        }
    }

    #[test]
    fn revise_exercise_keeps_unset_fields() {
        let draft = revise_exercise(&sample_exercise(), Some("Calme".into()), None, &[]);
        assert_eq!(draft.label, "Calme");
        assert_eq!(draft.description, "4-4");
        assert_eq!(draft.phases.len(), 2);
        assert_eq!(draft.phases[1].name, "expire");
        assert_eq!(draft.phases[1].order_index, Some(2));
    }

    #[test]
    fn revise_exercise_replaces_phase_list() {
        let draft = revise_exercise(
            &sample_exercise(),
            None,
            None,
            &[Phase::new(PhaseKind::Hold, 7)],
        );
        assert_eq!(draft.label, "Carré");
        assert_eq!(draft.phases.len(), 1);
        assert_eq!(draft.phases[0].name, "pause");
        assert_eq!(draft.phases[0].duration_seconds, 7);
    }

    #[test]
    fn revise_article_overrides_given_fields() {
        let current: Article = serde_json::from_value(serde_json::json!({
            "id": 3,
            "title": "Dormir",
            "content": "...",
            "category": "Sommeil",
            "summary": "Court"
        }))
        .unwrap();
        let input = revise_article(current, Some("Bien dormir".into()), None, None, None);
        assert_eq!(input.title, "Bien dormir");
        assert_eq!(input.content, "...");
        assert_eq!(input.category, ArticleCategory::parse("Sommeil"));
        assert_eq!(input.summary.as_deref(), Some("Court"));
    }

    #[test]
    fn user_fields_become_roles() {
        let cli = Cli::try_parse_from([
            "cesizen", "users", "update", "8", "--name", "Bob", "--role", "ROLE_ADMIN",
        ])
        .unwrap();
        match cli.command {
            Command::Users(UserCommand::Update { id, fields }) => {
                assert_eq!(id, 8);
                let input = UserInput::from(fields);
                assert_eq!(input.name.as_deref(), Some("Bob"));
                assert!(input.roles[0].is_admin());
                assert!(input.email.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parses_play_and_create() {
        let cli = Cli::try_parse_from(["cesizen", "play", "3", "--builtin"]).unwrap();
        assert!(matches!(cli.command, Command::Play { id: 3, builtin: true }));

        let cli = Cli::try_parse_from([
            "cesizen",
            "exercises",
            "create",
            "--label",
            "Calme",
            "--phase",
            "inhale:4",
            "--phase",
            "exhale:6",
        ])
        .unwrap();
        match cli.command {
            Command::Exercises(ExerciseCommand::Create { phases, .. }) => {
                assert_eq!(phases.len(), 2)
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
