use crate::cli::{Cli, Command};
use crate::output;
use anyhow::{bail, Context};
use chrono::Local;
use clubdesk_api::activities::ActivityQuery;
use clubdesk_api::class_sessions::ClassSessionQuery;
use clubdesk_api::members::MemberQuery;
use clubdesk_api::subscriptions::SubscriptionQuery;
use clubdesk_api::{ClubApi, WeekSchedule};
use clubdesk_core::FileStore;
use clubdesk_session::{ClientConfig, SessionClient, SessionEvent};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Build the client from flags and environment, run one command, then report
/// session events it caused.
pub async fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = config_for(&cli)?;
    let store = FileStore::open(&cli.store)
        .await
        .with_context(|| format!("Cannot open session file {}", cli.store.display()))?;
    tracing::debug!(store = %cli.store.display(), api = config.base_url(), "Starting");

    let client = Arc::new(SessionClient::new(config, Arc::new(store))?);
    let mut events = client.subscribe();
    let api = ClubApi::new(client);

    let result = execute(&api, cli.command, cli.json, out).await;
    for notice in drain_notices(&mut events) {
        eprintln!("{}", notice);
    }
    result
}

fn config_for(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let config = ClientConfig::from_lookup(|key| match key {
        "CLUBDESK_API_URL" => cli.api_url.clone(),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}

async fn execute(api: &ClubApi, command: Command, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };
            let login = api.session().login(&username, &password).await?;
            writeln!(out, "Logged in as {}", output::user(&login.user))?;
        }
        Command::Logout => {
            api.session().logout().await?;
            writeln!(out, "Logged out")?;
        }
        Command::Whoami { remote } => {
            let user = if remote {
                Some(api.auth().me().await?)
            } else {
                api.session().current_user().await?
            };
            match user {
                Some(user) if json => print_json(out, &user)?,
                Some(user) => writeln!(out, "{}", output::user(&user))?,
                None => bail!("Not logged in"),
            }
        }
        Command::Members { search, id, sort } => {
            let query = MemberQuery {
                search,
                id,
                sort: sort.map(Into::into),
            };
            let members = api.members().list(&query).await?;
            render(out, json, &members, output::members)?;
        }
        Command::Activities { search, sort } => {
            let query = ActivityQuery {
                search,
                sort: sort.map(Into::into),
            };
            let activities = api.activities().list(&query).await?;
            render(out, json, &activities, output::activities)?;
        }
        Command::Enrollments => {
            let enrollments = api.enrollments().list().await?;
            render(out, json, &enrollments, output::enrollments)?;
        }
        Command::Subscriptions { member, active } => {
            let query = SubscriptionQuery {
                member_id: member,
                actif: active,
            };
            let subscriptions = api.subscriptions().list(&query).await?;
            render(out, json, &subscriptions, output::subscriptions)?;
        }
        Command::Sessions { activity, date } => {
            let query = ClassSessionQuery {
                activite_id: activity,
                date,
                sort: None,
            };
            let sessions = api.class_sessions().list(&query).await?;
            render(out, json, &sessions, output::class_sessions)?;
        }
        Command::Stats => {
            let stats = api.stats();
            let overview = stats.overview().await?;
            let activities = stats.activities().await?;
            if json {
                print_json(
                    out,
                    &serde_json::json!({ "overview": overview, "activities": activities }),
                )?;
            } else {
                writeln!(out, "{}", output::stats(&overview, &activities))?;
            }
        }
        Command::Schedule { week, activity } => {
            let sessions = api.class_sessions().list(&ClassSessionQuery::default()).await?;
            let today = Local::now().date_naive();
            let schedule = WeekSchedule::build(&sessions, today, week, activity)?;
            writeln!(out, "{}", output::schedule(&schedule))?;
        }
        Command::Theme { theme } => {
            let preferences = api.session().preferences();
            if let Some(theme) = theme {
                preferences.set_theme(theme).await?;
            }
            writeln!(out, "{}", preferences.theme().await?)?;
        }
    }
    Ok(())
}

fn render<T: Serialize>(
    out: &mut dyn Write,
    json: bool,
    rows: &[T],
    table: fn(&[T]) -> String,
) -> anyhow::Result<()> {
    if json {
        print_json(out, rows)
    } else {
        writeln!(out, "{}", table(rows))?;
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn prompt_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("No password given");
    }
    Ok(password)
}

/// Human-readable lines for the events a command produced.
fn drain_notices(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<String> {
    let mut notices = Vec::new();
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::Expired { redirect_to } => notices.push(format!(
                "Your session has expired. Please log in again ({}): clubdesk login <username>",
                redirect_to
            )),
            SessionEvent::Refreshed => tracing::debug!("Access token renewed"),
            SessionEvent::LoggedIn { user } => tracing::info!(user = %user.username, "Session stored"),
            SessionEvent::LoggedOut => tracing::info!("Session cleared"),
        }
    }
    notices
}
