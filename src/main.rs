use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, Timelike, Utc};
use clap::Parser;
use serde::Serialize;
use std::path::Path;

mod cli;

use cli::{
    AttachCommand, AuthCommand, Command, ContentArgs, EnhanceArgs, GreetArgs, JournalCommand,
    LogArgs, RootArgs, SessionCommand, StatsArgs, UnlockArgs,
};
use mindful_journal::auth::{self, AuthMethod, Credential};
use mindful_journal::completion::HttpCompletionClient;
use mindful_journal::config::{self, AppConfig};
use mindful_journal::enhance::{self, EnhanceLogEntry, EnhancementResult, Enhancer, StderrNotifier};
use mindful_journal::greeting::{self, Language};
use mindful_journal::mood::{self, Mood};
use mindful_journal::state::{self, AppState, DataPaths, JsonFileStore, StateStore};
use mindful_journal::storage::{self, LocalObjectStore, ObjectStore};
use mindful_journal::{journal, stats};

/// Resolved configuration plus the stores it points at.
struct App {
    config: AppConfig,
    paths: DataPaths,
    store: JsonFileStore,
}

impl App {
    fn open(config_path: Option<&Path>) -> Result<Self> {
        let mut config = config::load_config(config_path)?;
        config::apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        config::validate_config(&config)?;
        let paths = DataPaths::new(config::resolve_data_dir(&config)?);
        let store = JsonFileStore::new(paths.state_path());
        tracing::debug!(data_dir = %paths.root().display(), "data dir resolved");
        Ok(Self {
            config,
            paths,
            store,
        })
    }

    fn objects(&self) -> LocalObjectStore {
        LocalObjectStore::new(self.paths.attachments_dir())
    }

    fn completion_client(&self) -> HttpCompletionClient {
        HttpCompletionClient::new(&self.config.completion_url, self.config.api_key.clone())
    }

    /// Run the enhancement pipeline and record the run in the audit log.
    fn enhance(&self, title: &str, content: &str) -> EnhancementResult {
        let client = self.completion_client();
        let run = Enhancer::new(&client)
            .with_notifier(&StderrNotifier)
            .run(title, content, today());
        let entry = EnhanceLogEntry::from_run(&run, content.chars().count());
        if let Err(err) = enhance::append_enhance_log(&self.paths, &entry) {
            tracing::warn!(error = %err, "could not record enhancement run");
        }
        run.result
    }

    fn language(&self, state: &AppState) -> Language {
        self.config.language.unwrap_or(state.language)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = RootArgs::parse();
    let app = App::open(args.config.as_deref())?;

    match args.command {
        Command::Enhance(args) => cmd_enhance(&app, args),
        Command::Journal(command) => cmd_journal(&app, command),
        Command::Attach(command) => cmd_attach(&app, command),
        Command::Session(command) => cmd_session(&app, command),
        Command::Moods => cmd_moods(),
        Command::Stats(args) => cmd_stats(&app, args),
        Command::Greet(args) => cmd_greet(&app, args),
        Command::Auth(command) => cmd_auth(&app, command),
        Command::Log(args) => cmd_log(&app, args),
        Command::Config => cmd_config(&app),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MJ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn cmd_enhance(app: &App, args: EnhanceArgs) -> Result<()> {
    let content = read_content(&args.body)?;
    let result = app.enhance(&args.title, &content);
    if args.json {
        return print_json(&result);
    }
    println!("{}\n\n{}", result.title, result.content);
    Ok(())
}

fn cmd_journal(app: &App, command: JournalCommand) -> Result<()> {
    match command {
        JournalCommand::Add { title, body, mood } => {
            let content = read_content(&body)?;
            let mood = parse_mood(mood.as_deref())?;
            let id = state::update(&app.store, |state| {
                Ok(journal::add_entry(state, &title, &content, mood, Utc::now()))
            })?;
            println!("{id}");
            Ok(())
        }
        JournalCommand::List { unlock, json } => {
            let state = unlocked_state(app, &unlock)?;
            let entries = journal::list_entries(&state);
            if json {
                return print_json(&entries);
            }
            for entry in entries {
                println!(
                    "{}  {}  {:<8}  {}",
                    entry.id,
                    entry.created_at.format("%Y-%m-%d"),
                    entry.mood.map(Mood::as_str).unwrap_or("-"),
                    entry.title
                );
            }
            Ok(())
        }
        JournalCommand::Show { id, unlock, json } => {
            let state = unlocked_state(app, &unlock)?;
            let entry = journal::find_entry(&state, &id)?;
            if json {
                return print_json(entry);
            }
            println!("{}", entry.title);
            println!(
                "{}  mood: {}  color: {}",
                entry.created_at.format("%Y-%m-%d %H:%M"),
                entry.mood.map(Mood::as_str).unwrap_or("-"),
                mood::color_for(entry.mood)
            );
            println!("\n{}", entry.content);
            for attachment in &entry.attachments {
                println!(
                    "attachment: {} ({}, {} bytes)",
                    attachment.path, attachment.content_type, attachment.size
                );
            }
            Ok(())
        }
        JournalCommand::Delete { id, unlock } => {
            let mut state = unlocked_state(app, &unlock)?;
            let removed = journal::delete_entry(&mut state, &id)?;
            app.store.save(&state)?;
            let objects = app.objects();
            for attachment in &removed.attachments {
                if let Err(err) = objects.delete(&attachment.path) {
                    tracing::warn!(path = %attachment.path, error = %err, "could not delete attachment");
                }
            }
            println!("deleted {id}");
            Ok(())
        }
        JournalCommand::Enhance { id, unlock, json } => {
            let state = unlocked_state(app, &unlock)?;
            let entry = journal::find_entry(&state, &id)?;
            let result = app.enhance(&entry.title, &entry.content);
            let changed = state::update(&app.store, |state| {
                journal::apply_enhancement(state, &id, &result, Utc::now())
            })?;
            if json {
                return print_json(&result);
            }
            if changed {
                println!("{}\n\n{}", result.title, result.content);
            } else {
                println!("entry {id} left unchanged");
            }
            Ok(())
        }
    }
}

fn cmd_attach(app: &App, command: AttachCommand) -> Result<()> {
    let objects = app.objects();
    match command {
        AttachCommand::Upload {
            entry,
            file,
            unlock,
        } => {
            // Check the entry exists before storing anything.
            journal::find_entry(&unlocked_state(app, &unlock)?, &entry)?;
            let attachment = storage::upload_file(&objects, &file)?;
            let path = attachment.path.clone();
            state::update(&app.store, |state| {
                journal::attach(state, &entry, attachment, Utc::now())
            })?;
            println!("{path}");
        }
        AttachCommand::Url { path, unlock } => {
            unlocked_state(app, &unlock)?;
            println!("{}", objects.url(&path)?);
        }
        AttachCommand::Download { path, out, unlock } => {
            unlocked_state(app, &unlock)?;
            let bytes = objects.download(&path)?;
            std::fs::write(&out, &bytes).with_context(|| format!("write {}", out.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), out.display());
        }
        AttachCommand::Delete {
            entry,
            path,
            unlock,
        } => {
            let mut state = unlocked_state(app, &unlock)?;
            journal::detach(&mut state, &entry, &path, Utc::now())?;
            app.store.save(&state)?;
            if !objects.delete(&path)? {
                tracing::warn!(%path, "attachment was already missing from storage");
            }
            println!("removed {path}");
        }
    }
    Ok(())
}

fn cmd_session(app: &App, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Log {
            minutes,
            mood,
            date,
        } => {
            let date = match date {
                Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .with_context(|| format!("parse session date {raw:?}"))?,
                None => today(),
            };
            let mood = parse_mood(mood.as_deref())?;
            let count = state::update(&app.store, |state| {
                state.sessions.push(stats::SessionRecord {
                    date,
                    duration_minutes: minutes,
                    mood,
                });
                Ok(state.sessions.len())
            })?;
            println!("logged session {count} ({minutes} min on {date})");
            Ok(())
        }
    }
}

fn cmd_moods() -> Result<()> {
    for mood in Mood::ALL {
        println!("{:<8}  score {}  {}", mood.as_str(), mood.score(), mood.color());
    }
    Ok(())
}

#[derive(Serialize)]
struct StatsReport {
    sessions: stats::SessionStats,
    journal: stats::JournalStats,
    weekly_goal: stats::GoalProgress,
}

fn cmd_stats(app: &App, args: StatsArgs) -> Result<()> {
    let state = app.store.load()?;
    let today = today();
    let report = StatsReport {
        sessions: stats::session_stats(&state.sessions, today),
        journal: stats::journal_stats(&state.journal_entries, today),
        weekly_goal: stats::goal_progress(
            args.goal,
            stats::sessions_this_week(&state.sessions, today),
        ),
    };
    if args.json {
        return print_json(&report);
    }
    let StatsReport {
        sessions,
        journal,
        weekly_goal,
    } = report;
    println!(
        "sessions: {} ({} min, avg {:.1} min)",
        sessions.total_sessions, sessions.total_minutes, sessions.average_minutes
    );
    println!(
        "streak: {} days (longest {})",
        sessions.current_streak, sessions.longest_streak
    );
    println!(
        "journal: {} entries, {} this week",
        journal.total_entries, journal.entries_this_week
    );
    match journal.average_mood {
        Some(average) => println!(
            "mood: avg {average:.1}/{} (wellness {}%)",
            mood::MAX_MOOD_SCORE,
            journal.wellness_score
        ),
        None => println!("mood: no moods recorded"),
    }
    println!(
        "weekly goal: {}/{} sessions ({}%)",
        weekly_goal.achieved, weekly_goal.target, weekly_goal.percent
    );
    Ok(())
}

fn cmd_greet(app: &App, args: GreetArgs) -> Result<()> {
    let mut state = app.store.load()?;
    let language = match args.lang.as_deref() {
        Some(code) => Language::from_code(code),
        None => app.language(&state),
    };
    if args.save {
        state.language = language;
        app.store.save(&state)?;
    }
    let hour = args.hour.unwrap_or_else(|| Local::now().hour());
    println!("{}", greeting::greeting_for_hour(language, hour));
    Ok(())
}

fn cmd_auth(app: &App, command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Enroll { pin } => {
            state::update(&app.store, |state| Ok(auth::enroll_pin(state, &pin)?))?;
            println!("PIN enrolled");
        }
        AuthCommand::Unlock { pin } => {
            let mut state = app.store.load()?;
            let outcome = auth::unlock(&mut state, Credential::Pin(&pin));
            app.store.save(&state)?;
            outcome?;
            println!("unlocked");
        }
        AuthCommand::Method { method } => {
            let method: AuthMethod = method.parse()?;
            state::update(&app.store, |state| Ok(auth::set_method(state, method)?))?;
            println!("unlock method set to {method}");
        }
        AuthCommand::Status => {
            let state = app.store.load()?;
            println!("method: {}", state.auth_method);
            println!("pin enrolled: {}", state.enrollment.pin);
            println!("biometric enrolled: {}", state.enrollment.biometric);
            println!("failed attempts: {}", state.failed_attempts);
        }
    }
    Ok(())
}

fn cmd_log(app: &App, args: LogArgs) -> Result<()> {
    let entries = enhance::load_enhance_log(&app.paths)?;
    let skip = entries.len().saturating_sub(args.limit);
    let recent = &entries[skip..];
    if args.json {
        return print_json(&recent);
    }
    for entry in recent {
        println!(
            "{}  {:<8}  {:>6} ms  {}{}",
            entry.ts,
            entry.outcome.as_str(),
            entry.duration_ms,
            entry.title_preview,
            entry
                .error
                .as_deref()
                .map(|error| format!("  ({error})"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_config(app: &App) -> Result<()> {
    print_json(&app.config.redacted())?;
    println!("data dir: {}", app.paths.root().display());
    Ok(())
}

/// Load state, enforcing the journal lock when one is configured.
fn unlocked_state(app: &App, unlock: &UnlockArgs) -> Result<AppState> {
    let mut state = app.store.load()?;
    if state.auth_method == AuthMethod::None {
        return Ok(state);
    }
    let pin = unlock
        .pin
        .as_deref()
        .ok_or_else(|| anyhow!("journal is locked ({}); pass --pin", state.auth_method))?;
    let outcome = auth::unlock(&mut state, Credential::Pin(pin));
    // Persist the attempt counter whether or not the PIN matched.
    app.store.save(&state)?;
    outcome?;
    Ok(state)
}

fn read_content(body: &ContentArgs) -> Result<String> {
    match (&body.content, &body.file) {
        (Some(content), _) => Ok(content.clone()),
        (None, Some(path)) => {
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        (None, None) => Err(anyhow!("pass --content or --file")),
    }
}

fn parse_mood(raw: Option<&str>) -> Result<Option<Mood>> {
    raw.map(str::parse).transpose()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}
