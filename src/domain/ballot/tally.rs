//! Tally engine.
//!
//! Pure functions over a vote list. Whether the session is closed is the
//! caller's concern.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Vote, VoteType};

/// Outcome of a tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Yes,
    No,
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Winner::Yes => "Yes",
            Winner::No => "No",
            Winner::Tie => "Tie",
        };
        write!(f, "{}", s)
    }
}

/// Counts and winner of a session's votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    pub yes_count: u64,
    pub no_count: u64,
    pub total_count: u64,
    pub winner: Winner,
}

impl VoteResult {
    /// Builds a result from raw counts.
    pub fn from_counts(yes_count: u64, no_count: u64) -> Self {
        let winner = match yes_count.cmp(&no_count) {
            std::cmp::Ordering::Greater => Winner::Yes,
            std::cmp::Ordering::Less => Winner::No,
            std::cmp::Ordering::Equal => Winner::Tie,
        };
        Self {
            yes_count,
            no_count,
            total_count: yes_count + no_count,
            winner,
        }
    }
}

/// Tallies a vote multiset. Order never affects the result.
pub fn tally<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> VoteResult {
    let (yes, no) = votes
        .into_iter()
        .fold((0u64, 0u64), |(yes, no), vote| match vote.vote_type() {
            VoteType::Yes => (yes + 1, no),
            VoteType::No => (yes, no + 1),
        });
    VoteResult::from_counts(yes, no)
}
