//! Voter identity key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Number of digits in a CPF.
pub const CPF_LENGTH: usize = 11;

/// Voter identity (Brazilian CPF), normalized to its 11 digits.
///
/// Only the format is checked here. Whether the identity may vote is
/// decided by the eligibility service.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// Parses a CPF, accepting the usual `000.000.000-00` punctuation.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("cpf"));
        }

        let mut digits = String::with_capacity(CPF_LENGTH);
        for c in trimmed.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '.' | '-' => {}
                other => {
                    return Err(ValidationError::invalid_format(
                        "cpf",
                        format!("unexpected character '{}'", other),
                    ))
                }
            }
        }

        if digits.len() != CPF_LENGTH {
            return Err(ValidationError::invalid_format(
                "cpf",
                format!("expected {} digits, got {}", CPF_LENGTH, digits.len()),
            ));
        }

        Ok(Self(digits))
    }

    /// Returns the bare digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a log-safe rendering that exposes only the last four digits.
    pub fn masked(&self) -> String {
        let visible = &self.0[CPF_LENGTH - 4..];
        format!("{}{}", "*".repeat(CPF_LENGTH - 4), visible)
    }
}

// Debug never prints the full identity.
impl fmt::Debug for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cpf({})", self.masked())
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl FromStr for Cpf {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cpf {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}
