//! A minimal test-execution harness.
//!
//! Tests are closures run immediately by a [`Runner`], surrounded by
//! lifecycle hooks. Inside a test, [`Runner::assert_that`] and
//! [`Runner::expect_raised`] record assertion outcomes; a panic inside an
//! assertion is a failure, a panic anywhere else aborts the run. Results go to
//! a [`Reporter`], by default a colored report on standard output ending in a
//! summary line.
//!
//! ```no_run
//! use mftr::{hook, raise, HarnessConfig, Runner, RANGE_ERROR};
//! use std::process::ExitCode;
//!
//! fn main() -> ExitCode {
//!     let mut runner = Runner::with_config(HarnessConfig::from_args().unwrap_or_default());
//!     runner.bootstrap([hook(|| println!("connecting"))]);
//!
//!     runner.test("checked division", |t| {
//!         t.assert_that("10 / 2 is 5", || 10_i32.checked_div(2) == Some(5));
//!         t.expect_raised(&RANGE_ERROR, "dividing by zero", || {
//!             if 10_i32.checked_div(0).is_none() {
//!                 raise(&RANGE_ERROR, "division by zero");
//!             }
//!         });
//!     });
//!
//!     runner.finish().exit_code()
//! }
//! ```

pub mod assertions;
pub mod caller_location;
pub mod harness_configuration;
pub mod raised;
pub mod state;
pub mod test_reporter;
pub mod test_runner;

pub use assertions::{Expectation, Outcome, Verdict};
pub use caller_location::LocationStrategy;
pub use harness_configuration::{ColorChoice, ConfigError, HarnessConfig};
pub use raised::{raise, Kind, Raised, ERROR, PANIC, RANGE_ERROR, TYPE_ERROR};
pub use test_reporter::{ConsoleReporter, Event, EventLog, Reporter};
pub use test_runner::{hook, Hook, RunSummary, Runner};
