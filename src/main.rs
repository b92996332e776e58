use std::io;
use std::sync::Arc;

use clap::Parser;
use roll_call::attendance::AttendanceSource;
use roll_call::config::{ANON_KEY_VARS, ClientConfig, ConfigError, URL_VARS};
use roll_call::lister::ListerState;
use roll_call::screen::{self, Screen};
use roll_call::storage::{FileStorage, MemoryStorage, SessionStorage};
use roll_call::supabase::{ClientError, Session, SupabaseClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("query failed: {0}")]
    Query(String),
}

#[derive(Parser, Debug)]
#[command(name = "roll-call", about = "List attendance records for a date")]
struct Cli {
    /// Project URL, e.g. https://<ref>.supabase.co
    #[arg(long, env = "SUPABASE_URL")]
    url: Option<String>,

    /// Anonymous (public) API key of the project.
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    anon_key: Option<String>,

    /// Date to load first (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// Load once, print, and exit non-zero on error.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Keep the auth session in memory only.
    #[arg(long, default_value_t = false)]
    no_persist: bool,

    /// Store this access token as the session before querying.
    #[arg(long, hide_env_values = true, env = "ROLL_CALL_ACCESS_TOKEN")]
    access_token: Option<String>,

    /// Remove the stored session and exit.
    #[arg(long, default_value_t = false)]
    sign_out: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_lookup(|key| {
        let flag = if key == URL_VARS[0] {
            cli.url.clone()
        } else if key == ANON_KEY_VARS[0] {
            cli.anon_key.clone()
        } else {
            None
        };
        flag.or_else(|| std::env::var(key).ok())
    })?;

    let storage: Arc<dyn SessionStorage> = if cli.no_persist {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(FileStorage::new(config.storage_dir.clone()))
    };
    let client = SupabaseClient::new(&config, storage)?;
    tracing::debug!(url = %config.url, project = %config.project_ref, "client configured");

    if cli.sign_out {
        client.sign_out()?;
        println!("signed out");
        return Ok(());
    }
    if let Some(token) = &cli.access_token {
        client.set_session(&Session::new(token.clone()))?;
    }

    let state = cli.date.map_or_else(ListerState::default, ListerState::new);
    if cli.once {
        run_once(&client, state).await
    } else {
        let stdin = io::stdin();
        let screen = Screen::new(&client, state, stdin.lock(), io::stdout());
        screen.run().await?;
        Ok(())
    }
}

async fn run_once(source: &dyn AttendanceSource, mut state: ListerState) -> Result<(), CliError> {
    state.load(source).await;
    screen::render(&state, &mut io::stdout().lock())?;
    match state.error {
        Some(message) => Err(CliError::Query(message)),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
