//! feedwatch command line: checks feeds once and prints local-check lines.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use feedwatch::core::config::{DEFAULT_STATE_DIR, DEFAULT_TIMEOUT_SECS};
use feedwatch::{FeedSelection, FeedTarget, Settings, StateBackend, DEFAULT_ALERT_TTL};

/// Report new or updated feed entries to a host monitoring agent
#[derive(Parser)]
#[command(name = "feedwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON feed list: URLs or {"name", "url"} objects
    #[arg(short, long, env = "FEEDWATCH_FEEDS")]
    feeds: Option<PathBuf>,

    /// Check a single feed at this URL; takes precedence over --feeds
    #[arg(long)]
    url: Option<String>,

    /// Service name for --url (defaults to the URL)
    #[arg(long, requires = "url")]
    name: Option<String>,

    /// Directory holding per-feed state
    #[arg(long, env = "FEEDWATCH_STATE_DIR", default_value = DEFAULT_STATE_DIR)]
    state_dir: PathBuf,

    /// State storage backend
    #[arg(long, env = "FEEDWATCH_STATE_BACKEND", value_enum, default_value_t = StateBackend::File)]
    state_backend: StateBackend,

    /// Per-feed fetch timeout in seconds
    #[arg(long, env = "FEEDWATCH_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Seconds after which an unchanged alert clears to OK
    #[arg(long, env = "FEEDWATCH_ALERT_TTL_SECS", default_value_t = DEFAULT_ALERT_TTL)]
    alert_ttl_secs: i64,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_settings(self) -> Settings {
        let feeds = match (self.url, self.feeds) {
            (Some(url), _) => {
                let name = self.name.unwrap_or_else(|| url.clone());
                Some(FeedSelection::Single(FeedTarget::new(name, url)))
            }
            (None, Some(path)) => Some(FeedSelection::List(path)),
            (None, None) => None,
        };
        Settings {
            feeds,
            state_dir: self.state_dir,
            state_backend: self.state_backend,
            timeout: Duration::from_secs(self.timeout_secs),
            alert_ttl_secs: self.alert_ttl_secs,
        }
    }
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // stdout belongs to the monitoring agent
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("failed to start runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    let settings = cli.into_settings();
    let mut stdout = io::stdout().lock();
    match runtime.block_on(feedwatch::run(&settings, &mut stdout)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "run aborted");
            ExitCode::FAILURE
        }
    }
}
