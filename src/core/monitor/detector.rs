use crate::core::feed::{Fingerprint, LatestEntry};
use crate::core::storage::{AlertState, FeedState};

pub const AUTO_CLEAR_MESSAGE: &str = "no changes (auto-clear)";

/// Outcome of comparing a fresh observation against the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing to persist; report the stored state as-is.
    Carry,
    /// Persist and report this state.
    Transition(FeedState),
}

/// Decides the next alert state of a feed.
///
/// An unchanged fingerprint keeps the stored alert until it is older than
/// `ttl` seconds, at which point it clears to OK. A changed fingerprint
/// raises CRITICAL for a new post, or WARNING when the entry id occurs
/// inside the previous fingerprint's hex digest.
///
/// That WARNING test is kept for compatibility with existing deployments and
/// is almost certainly not what it looks like: a digest does not contain its
/// input, so real ids practically never match, while an empty id matches any
/// previous digest.
pub fn evaluate(
    prior: &FeedState,
    current: &Fingerprint,
    entry: &LatestEntry,
    now: i64,
    ttl: i64,
) -> Decision {
    if prior.fingerprint.as_ref() == Some(current) {
        let expired = now.saturating_sub(prior.alert_time) > ttl;
        if prior.alert_state != AlertState::Ok && expired {
            return Decision::Transition(FeedState {
                fingerprint: Some(current.clone()),
                alert_state: AlertState::Ok,
                alert_time: now,
                message: AUTO_CLEAR_MESSAGE.to_string(),
            });
        }
        return Decision::Carry;
    }

    let looks_updated = prior
        .fingerprint
        .as_ref()
        .is_some_and(|previous| previous.as_hex().contains(entry.id.as_str()));
    let (alert_state, message) = if looks_updated {
        (AlertState::Warning, format!("post updated: {}", entry.title))
    } else {
        (AlertState::Critical, format!("new post: {}", entry.title))
    };

    Decision::Transition(FeedState {
        fingerprint: Some(current.clone()),
        alert_state,
        alert_time: now,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::fingerprint;

    const TTL: i64 = 3600;
    const T0: i64 = 1_771_927_200;

    fn entry(id: &str, updated: &str, title: &str) -> LatestEntry {
        LatestEntry {
            id: id.to_string(),
            updated: updated.to_string(),
            title: title.to_string(),
        }
    }

    fn stored(fp: &Fingerprint, alert_state: AlertState, alert_time: i64) -> FeedState {
        FeedState {
            fingerprint: Some(fp.clone()),
            alert_state,
            alert_time,
            message: "new post: Hello".to_string(),
        }
    }

    #[test]
    fn first_poll_is_critical() {
        let latest = entry("urn:post:1", "2026-02-24T10:00:00Z", "Hello");
        let current = fingerprint(&latest.id, &latest.updated);

        let decision = evaluate(&FeedState::default(), &current, &latest, T0, TTL);

        assert_eq!(
            decision,
            Decision::Transition(FeedState {
                fingerprint: Some(current),
                alert_state: AlertState::Critical,
                alert_time: T0,
                message: "new post: Hello".to_string(),
            })
        );
    }

    #[test]
    fn unchanged_fingerprint_within_ttl_carries() {
        let latest = entry("urn:post:1", "2026-02-24T10:00:00Z", "Hello");
        let current = fingerprint(&latest.id, &latest.updated);
        let prior = stored(&current, AlertState::Critical, T0);

        assert_eq!(evaluate(&prior, &current, &latest, T0 + 10, TTL), Decision::Carry);
        assert_eq!(evaluate(&prior, &current, &latest, T0 + TTL, TTL), Decision::Carry);
    }

    #[test]
    fn stale_alert_auto_clears_after_ttl() {
        let latest = entry("urn:post:1", "2026-02-24T10:00:00Z", "Hello");
        let current = fingerprint(&latest.id, &latest.updated);
        let now = T0 + TTL + 1;
        let prior = stored(&current, AlertState::Critical, T0);

        let Decision::Transition(next) = evaluate(&prior, &current, &latest, now, TTL) else {
            panic!("stale alert should clear");
        };
        assert_eq!(next.alert_state, AlertState::Ok);
        assert_eq!(next.alert_time, now);
        assert_eq!(next.message, AUTO_CLEAR_MESSAGE);
        assert_eq!(next.fingerprint, Some(current));
    }

    #[test]
    fn ok_state_never_auto_clears_again() {
        let latest = entry("urn:post:1", "", "Hello");
        let current = fingerprint(&latest.id, &latest.updated);
        let prior = stored(&current, AlertState::Ok, T0);

        assert_eq!(evaluate(&prior, &current, &latest, T0 + 10 * TTL, TTL), Decision::Carry);
    }

    #[test]
    fn changed_fingerprint_is_a_new_post() {
        let old = fingerprint("urn:post:1", "2026-02-24T10:00:00Z");
        let latest = entry("urn:post:2", "2026-02-25T10:00:00Z", "Second");
        let current = fingerprint(&latest.id, &latest.updated);
        let prior = stored(&old, AlertState::Ok, T0);

        let Decision::Transition(next) = evaluate(&prior, &current, &latest, T0 + 5, TTL) else {
            panic!("changed fingerprint should transition");
        };
        assert_eq!(next.alert_state, AlertState::Critical);
        assert_eq!(next.message, "new post: Second");
    }

    #[test]
    fn id_found_in_previous_digest_is_an_update() {
        let old = fingerprint("x", "1");
        let id = old.as_hex()[4..10].to_string();
        let latest = entry(&id, "2", "Edited");
        let current = fingerprint(&latest.id, &latest.updated);
        let prior = stored(&old, AlertState::Critical, T0);

        let Decision::Transition(next) = evaluate(&prior, &current, &latest, T0 + 5, TTL) else {
            panic!("changed fingerprint should transition");
        };
        assert_eq!(next.alert_state, AlertState::Warning);
        assert_eq!(next.message, "post updated: Edited");
    }

    #[test]
    fn empty_id_with_previous_fingerprint_is_an_update() {
        let old = fingerprint("", "2026-02-24T10:00:00Z");
        let latest = entry("", "2026-02-25T10:00:00Z", "No id");
        let current = fingerprint(&latest.id, &latest.updated);
        let prior = stored(&old, AlertState::Ok, T0);

        let Decision::Transition(next) = evaluate(&prior, &current, &latest, T0 + 5, TTL) else {
            panic!("changed fingerprint should transition");
        };
        assert_eq!(next.alert_state, AlertState::Warning);
    }
}
