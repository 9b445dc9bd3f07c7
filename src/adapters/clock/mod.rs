//! Clock adapters.
//!
//! - `SystemClock` - wall clock for production
//! - `ManualClock` - settable clock for tests and simulations

mod manual_clock;
mod system_clock;

pub use manual_clock::ManualClock;
pub use system_clock::SystemClock;
