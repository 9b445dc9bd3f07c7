//! Vote value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Cpf, Timestamp, UserId, ValidationError};

/// Choice recorded by a ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Yes,
    No,
}

impl VoteType {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Yes => "yes",
            VoteType::No => "no",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VoteType::Yes => "Yes",
            VoteType::No => "No",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for VoteType {
    type Err = ValidationError;

    /// Accepts `yes`/`no` and the Portuguese `sim`/`nao`/`não`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "sim" => Ok(VoteType::Yes),
            "no" | "nao" | "não" => Ok(VoteType::No),
            other => Err(ValidationError::invalid_format(
                "vote_type",
                format!("unknown vote type '{}'", other),
            )),
        }
    }
}

/// A single accepted ballot. Never edited once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    user_id: UserId,
    cpf: Cpf,
    vote_type: VoteType,
    cast_at: Timestamp,
}

impl Vote {
    /// Creates a vote accepted at `cast_at`.
    pub fn new(user_id: UserId, cpf: Cpf, vote_type: VoteType, cast_at: Timestamp) -> Self {
        Self {
            user_id,
            cpf,
            vote_type,
            cast_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn cpf(&self) -> &Cpf {
        &self.cpf
    }

    pub fn vote_type(&self) -> VoteType {
        self.vote_type
    }

    pub fn cast_at(&self) -> &Timestamp {
        &self.cast_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_and_portuguese_any_case() {
        assert_eq!("YES".parse::<VoteType>(), Ok(VoteType::Yes));
        assert_eq!("Sim".parse::<VoteType>(), Ok(VoteType::Yes));
        assert_eq!("no".parse::<VoteType>(), Ok(VoteType::No));
        assert_eq!("NÃO".parse::<VoteType>(), Ok(VoteType::No));
        assert_eq!(" nao ".parse::<VoteType>(), Ok(VoteType::No));
    }

    #[test]
    fn rejects_unknown_vote_type() {
        let err = "maybe".parse::<VoteType>().unwrap_err();
        assert_eq!(err.field(), "vote_type");
    }

    #[test]
    fn vote_keeps_its_fields() {
        let at = Timestamp::now();
        let vote = Vote::new(
            UserId::new("u1").unwrap(),
            Cpf::parse("12345678909").unwrap(),
            VoteType::Yes,
            at,
        );
        assert_eq!(vote.user_id().as_str(), "u1");
        assert_eq!(vote.cpf().as_str(), "12345678909");
        assert_eq!(vote.vote_type(), VoteType::Yes);
        assert_eq!(vote.cast_at(), &at);
    }
}
