//! Eligibility checker adapters.
//!
//! - `HttpEligibilityChecker` - queries the external eligibility service
//! - `StubEligibilityChecker` - scripted answers for development and tests

mod http_checker;
mod stub_checker;

pub use http_checker::{HttpEligibilityChecker, HttpEligibilityConfig};
pub use stub_checker::StubEligibilityChecker;
