pub mod core;

use std::io::Write;

use chrono::Utc;
use tracing::{debug, error};

pub use crate::core::config::{ConfigError, FeedSelection, Settings, StateBackend};
pub use crate::core::feed::{FeedTarget, HttpEntrySource};
pub use crate::core::monitor::{FeedMonitor, DEFAULT_ALERT_TTL};
pub use crate::core::report::{write_report, CheckResult, SECTION_HEADER};
pub use crate::core::storage::{FileStateStore, SqliteStateStore, StateStore};

use crate::core::feed::EntrySource;
use crate::core::report::config_failure_line;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Performs one full check of every configured feed and writes the report.
///
/// Configuration problems print a single global CRITICAL line and return
/// `RunError::Config`; every other failure stays confined to its feed's line.
pub async fn run<W: Write>(settings: &Settings, out: &mut W) -> Result<(), RunError> {
    let results = match check_configured(settings).await {
        Ok(results) => results,
        Err(config_error) => {
            error!(error = %config_error, "configuration failed");
            write_report(out, &[config_failure_line(&config_error)])?;
            return Err(config_error.into());
        }
    };
    write_report(out, &results)?;
    Ok(())
}

async fn check_configured(settings: &Settings) -> Result<Vec<CheckResult>, ConfigError> {
    let targets = settings.resolve_targets()?;
    debug!(count = targets.len(), "checking feeds");

    let client = reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()?;
    let source = HttpEntrySource::new(client);

    match settings.state_backend {
        StateBackend::File => {
            let store = FileStateStore::open(&settings.state_dir)?;
            Ok(check_with(source, store, settings, &targets).await)
        }
        StateBackend::Sqlite => {
            std::fs::create_dir_all(&settings.state_dir)
                .map_err(|error| ConfigError::State(error.into()))?;
            let store = SqliteStateStore::open(&settings.sqlite_path()).await?;
            Ok(check_with(source, store, settings, &targets).await)
        }
    }
}

async fn check_with<E, S>(
    source: E,
    store: S,
    settings: &Settings,
    targets: &[FeedTarget],
) -> Vec<CheckResult>
where
    E: EntrySource,
    S: StateStore,
{
    let monitor = FeedMonitor::new(source, store).with_ttl(settings.alert_ttl_secs);
    monitor.check_all(targets, Utc::now().timestamp()).await
}
