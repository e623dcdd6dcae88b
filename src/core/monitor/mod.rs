pub mod detector;

use tracing::{debug, info, warn};

use crate::core::feed::{fingerprint, EntrySource, FeedTarget};
use crate::core::report::CheckResult;
use crate::core::storage::{feed_key, AlertState, StateStore};
use detector::{evaluate, Decision};

/// Seconds after which an unchanged, non-OK alert clears itself.
pub const DEFAULT_ALERT_TTL: i64 = 3600;

const NO_CHANGES_MESSAGE: &str = "no changes";

/// Runs the fetch, compare, persist cycle for each configured feed.
#[derive(Debug, Clone)]
pub struct FeedMonitor<E, S> {
    source: E,
    store: S,
    ttl: i64,
}

impl<E, S> FeedMonitor<E, S>
where
    E: EntrySource,
    S: StateStore,
{
    pub fn new(source: E, store: S) -> Self {
        Self {
            source,
            store,
            ttl: DEFAULT_ALERT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = ttl;
        self
    }

    /// Checks every feed in order. A failing feed yields an UNKNOWN line and
    /// never stops the remaining feeds.
    pub async fn check_all(&self, targets: &[FeedTarget], now: i64) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            results.push(self.check_feed(target, now).await);
        }
        results
    }

    pub async fn check_feed(&self, target: &FeedTarget, now: i64) -> CheckResult {
        let entry = match self.source.latest_entry(target).await {
            Ok(entry) => entry,
            Err(error) => {
                warn!(feed = %target.name, url = %target.url, %error, "feed fetch failed");
                return CheckResult::new(
                    AlertState::Unknown,
                    &target.name,
                    format!("failed to parse or empty feed: {error}"),
                );
            }
        };

        let key = feed_key(&target.name);
        let prior = match self.store.load(&key).await {
            Ok(state) => state,
            Err(error) => {
                warn!(feed = %target.name, key = %key, %error, "stored state unreadable");
                return CheckResult::new(
                    AlertState::Unknown,
                    &target.name,
                    format!("state unreadable: {error}"),
                );
            }
        };

        let current = fingerprint(&entry.id, &entry.updated);
        match evaluate(&prior, &current, &entry, now, self.ttl) {
            Decision::Carry => {
                debug!(feed = %target.name, state = %prior.alert_state, "no transition");
                let message = if prior.message.is_empty() {
                    NO_CHANGES_MESSAGE.to_string()
                } else {
                    prior.message
                };
                CheckResult::new(prior.alert_state, &target.name, message)
            }
            Decision::Transition(next) => {
                if let Err(error) = self.store.save(&key, &next).await {
                    warn!(feed = %target.name, key = %key, %error, "failed to persist state");
                    return CheckResult::new(
                        AlertState::Unknown,
                        &target.name,
                        format!("failed to persist state: {error}"),
                    );
                }
                info!(
                    feed = %target.name,
                    from = %prior.alert_state,
                    to = %next.alert_state,
                    fingerprint = %current,
                    "alert state changed"
                );
                CheckResult::new(next.alert_state, &target.name, next.message)
            }
        }
    }
}
