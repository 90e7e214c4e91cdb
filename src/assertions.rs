//! Verification primitives of a test body.
//!
//! Both primitives evaluate a user closure behind [`catch_silently`], so a
//! panic inside an assertion becomes a recorded failure instead of aborting
//! the test.

use crate::raised::{catch_silently, Kind, Raised, ERROR};
use crate::test_runner::Runner;
use std::fmt::Display;
use std::panic::Location;

/// Result of evaluating an assertion predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    Raised(Raised),
}

/// Values an assertion predicate may return.
pub trait Verdict {
    fn into_outcome(self) -> Outcome;
}

impl Verdict for bool {
    fn into_outcome(self) -> Outcome {
        if self {
            Outcome::Passed
        } else {
            Outcome::Failed
        }
    }
}

/// `Err` counts as a raised [`ERROR`] carrying the error's message.
impl<E: Display> Verdict for Result<bool, E> {
    fn into_outcome(self) -> Outcome {
        match self {
            Ok(verdict) => verdict.into_outcome(),
            Err(error) => Outcome::Raised(Raised::new(&ERROR, error.to_string())),
        }
    }
}

pub fn evaluate<V: Verdict>(predicate: impl FnOnce() -> V) -> Outcome {
    match catch_silently(predicate) {
        Ok(verdict) => verdict.into_outcome(),
        Err(raised) => Outcome::Raised(raised),
    }
}

/// Result of running a callback that is expected to raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Met,
    Missing,
    Mismatched(Raised),
}

impl Expectation {
    pub fn check(expected: &'static Kind, callback: impl FnOnce()) -> Self {
        match catch_silently(callback) {
            Ok(()) => Expectation::Missing,
            Err(raised) if raised.kind().is_a(expected) => Expectation::Met,
            Err(raised) => Expectation::Mismatched(raised),
        }
    }

    pub fn message(&self, expected: &Kind, description: &str) -> String {
        let article = expected.article();
        match self {
            Expectation::Met => format!("{description} raises {article} {expected}"),
            Expectation::Missing => {
                format!("Expected {description} to raise {article} '{expected}', got none")
            }
            Expectation::Mismatched(raised) => format!(
                "Expected {description} to raise {article} '{expected}', but {} '{}' was raised",
                raised.kind().article(),
                raised.kind()
            ),
        }
    }
}

impl Runner {
    /// Records whether `predicate` holds.
    ///
    /// A panic inside `predicate` is reported as a failure whose message is the
    /// panic message, flagged as a raised error.
    #[track_caller]
    pub fn assert_that<V: Verdict>(&mut self, description: &str, predicate: impl FnOnce() -> V) {
        let call_site = Location::caller();

        let outcome = evaluate(predicate);
        tracing::trace!(description, ?outcome, "assertion evaluated");

        match outcome {
            Outcome::Passed => {
                self.record_assertion_passed();
                self.report_success(description);
            }
            Outcome::Failed => {
                self.record_assertion_failed();
                self.report_failure(description, call_site, false);
            }
            Outcome::Raised(raised) => {
                self.record_assertion_failed();
                self.report_failure(raised.message(), call_site, true);
            }
        }
    }

    /// Records whether `callback` raises a condition of kind `expected` or one
    /// of its descendants.
    #[track_caller]
    pub fn expect_raised(
        &mut self,
        expected: &'static Kind,
        description: &str,
        callback: impl FnOnce(),
    ) {
        let call_site = Location::caller();

        let expectation = Expectation::check(expected, callback);
        tracing::trace!(description, ?expectation, "expectation evaluated");

        let message = expectation.message(expected, description);
        if expectation == Expectation::Met {
            self.record_assertion_passed();
            self.report_success(&message);
        } else {
            self.record_assertion_failed();
            self.report_failure(&message, call_site, false);
        }
    }
}
