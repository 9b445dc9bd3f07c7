//! AgendaStatus enum for tracking lifecycle of agendas.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of an agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgendaStatus {
    /// Created, no session opened yet.
    #[default]
    Pending,
    /// At least one session has been opened.
    Active,
    /// Explicitly closed. Terminal.
    Closed,
}

impl AgendaStatus {
    /// Returns true if the agenda has been closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, AgendaStatus::Closed)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgendaStatus::Pending => "pending",
            AgendaStatus::Active => "active",
            AgendaStatus::Closed => "closed",
        }
    }
}

impl StateMachine for AgendaStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AgendaStatus::*;
        matches!(
            (self, target),
            (Pending, Active) | (Pending, Closed) | (Active, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AgendaStatus::*;
        match self {
            Pending => vec![Active, Closed],
            Active => vec![Closed],
            Closed => vec![],
        }
    }
}

impl fmt::Display for AgendaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgendaStatus::Pending => "Pending",
            AgendaStatus::Active => "Active",
            AgendaStatus::Closed => "Closed",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for AgendaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AgendaStatus::Pending),
            "active" => Ok(AgendaStatus::Active),
            "closed" => Ok(AgendaStatus::Closed),
            other => Err(format!("unknown agenda status: {}", other)),
        }
    }
}
