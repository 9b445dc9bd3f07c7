//! Eligibility checker port.
//!
//! Confirms that a voter identity may vote. The engine only depends on the
//! three-way answer; retry and backoff inside the checker are the adapter's
//! business. The engine bounds every call with its own timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Cpf;

/// Answer from an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Ineligible,
    /// The checker could not decide; the caller may retry later.
    TransientFailure(String),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

/// Port for voter eligibility lookups.
#[async_trait]
pub trait EligibilityChecker: Send + Sync {
    /// Checks whether `cpf` may vote.
    ///
    /// Infrastructure problems are reported as
    /// [`Eligibility::TransientFailure`], never as a panic or a hang the
    /// adapter itself could avoid.
    async fn check(&self, cpf: &Cpf) -> Eligibility;
}
