use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

use crate::core::storage::AlertState;

/// Section header announcing local-check lines to the monitoring agent.
pub const SECTION_HEADER: &str = "<<<local>>>";

/// Service name used for failures that are not tied to a single feed.
pub const GLOBAL_CHECK_NAME: &str = "feedwatch";

/// One status line: `<severity> <name> - <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub state: AlertState,
    pub name: String,
    pub message: String,
}

impl CheckResult {
    pub fn new(state: AlertState, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            state,
            name: name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}",
            self.state.code(),
            single_line(&self.name),
            single_line(&self.message)
        )
    }
}

/// Line breaks in feed-supplied text would start a new status line.
fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\r', '\n']) {
        Cow::Owned(text.replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(text)
    }
}

pub fn write_report<W: Write>(out: &mut W, results: &[CheckResult]) -> io::Result<()> {
    writeln!(out, "{SECTION_HEADER}")?;
    for result in results {
        writeln!(out, "{result}")?;
    }
    out.flush()
}

pub fn config_failure_line(error: &dyn fmt::Display) -> CheckResult {
    CheckResult::new(
        AlertState::Critical,
        GLOBAL_CHECK_NAME,
        format!("failed to load feed configuration: {error}"),
    )
}
