//! SessionStatus enum for tracking the persisted state of voting sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Persisted status of a voting session.
///
/// Only the explicit close is stored. Whether an open session has started or
/// expired is derived from the clock, see `Session::phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Open,
    Closed,
}

impl SessionStatus {
    /// Returns true while the session has not been explicitly closed.
    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::Open)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "open",
            SessionStatus::Closed => "closed",
        }
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (SessionStatus::Open, SessionStatus::Closed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            SessionStatus::Open => vec![SessionStatus::Closed],
            SessionStatus::Closed => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Open => "Open",
            SessionStatus::Closed => "Closed",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(SessionStatus::Open),
            "closed" => Ok(SessionStatus::Closed),
            other => Err(format!("unknown session status: {}", other)),
        }
    }
}
