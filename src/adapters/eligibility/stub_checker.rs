//! Stub implementation of EligibilityChecker for development and testing.
//!
//! By default every cpf is eligible. Builders switch the stub to deny a set
//! of identities, fail every call, or answer after a delay.
//!
//! # Usage
//!
//! ```ignore
//! use ballot_engine::adapters::eligibility::StubEligibilityChecker;
//!
//! let checker = StubEligibilityChecker::new();
//! let checker = StubEligibilityChecker::new().deny("12345678909");
//! let checker = StubEligibilityChecker::failing("service down");
//! ```

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::Cpf;
use crate::ports::{Eligibility, EligibilityChecker};

/// Scripted EligibilityChecker.
#[derive(Debug, Clone, Default)]
pub struct StubEligibilityChecker {
    /// Identities answered with `Ineligible`.
    denied: HashSet<String>,
    /// When set, every call fails with this reason.
    failure: Option<String>,
    /// Delay applied before answering.
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StubEligibilityChecker {
    /// Create a stub that finds everyone eligible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stub whose every call is a transient failure.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Mark a cpf as ineligible. Punctuation is ignored.
    pub fn deny(mut self, cpf: &str) -> Self {
        let digits: String = cpf.chars().filter(|c| c.is_ascii_digit()).collect();
        self.denied.insert(digits);
        self
    }

    /// Answer only after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of checks performed so far (shared across clones).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EligibilityChecker for StubEligibilityChecker {
    async fn check(&self, cpf: &Cpf) -> Eligibility {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.failure {
            return Eligibility::TransientFailure(reason.clone());
        }
        if self.denied.contains(cpf.as_str()) {
            Eligibility::Ineligible
        } else {
            Eligibility::Eligible
        }
    }
}
