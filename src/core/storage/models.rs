use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::feed::Fingerprint;

/// Severity reported to the monitoring agent, persisted as its integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AlertState {
    #[default]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl AlertState {
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }
}

impl From<AlertState> for u8 {
    fn from(state: AlertState) -> Self {
        state.code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown alert state code: {0}")]
pub struct InvalidAlertState(pub i64);

impl TryFrom<u8> for AlertState {
    type Error = InvalidAlertState;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        <Self as TryFrom<i64>>::try_from(i64::from(code))
    }
}

impl TryFrom<i64> for AlertState {
    type Error = InvalidAlertState;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Ok),
            1 => Ok(Self::Warning),
            2 => Ok(Self::Critical),
            3 => Ok(Self::Unknown),
            other => Err(InvalidAlertState(other)),
        }
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Last observation of one feed. Missing fields read back as their zero value,
/// and records written under the `entry_hash` key are still understood.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedState {
    #[serde(default, alias = "entry_hash")]
    pub fingerprint: Option<Fingerprint>,
    #[serde(default)]
    pub alert_state: AlertState,
    #[serde(default)]
    pub alert_time: i64,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_state_serializes_as_integer() {
        let json = serde_json::to_string(&AlertState::Critical).expect("serialize");
        assert_eq!(json, "2");
        let back: AlertState = serde_json::from_str("1").expect("deserialize");
        assert_eq!(back, AlertState::Warning);
    }

    #[test]
    fn alert_state_rejects_unknown_codes() {
        assert!(serde_json::from_str::<AlertState>("7").is_err());
        assert_eq!(AlertState::try_from(9_i64), Err(InvalidAlertState(9)));
    }

    #[test]
    fn missing_fields_default_to_zero_state() {
        let state: FeedState = serde_json::from_str("{}").expect("empty record");
        assert_eq!(state, FeedState::default());
        assert_eq!(state.alert_state, AlertState::Ok);
        assert!(state.fingerprint.is_none());
    }

    #[test]
    fn accepts_legacy_entry_hash_key() {
        let raw = r#"{"entry_hash":"abc123","alert_state":2,"alert_time":1700000000,"message":"New post"}"#;
        let state: FeedState = serde_json::from_str(raw).expect("legacy record");
        assert_eq!(state.fingerprint, Some(Fingerprint::from("abc123".to_string())));
        assert_eq!(state.alert_state, AlertState::Critical);
        assert_eq!(state.alert_time, 1_700_000_000);
    }
}
