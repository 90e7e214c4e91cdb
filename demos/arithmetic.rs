//! Checked integer arithmetic. The `parsing` test fails on purpose.
//!
//! Run with `cargo run --example arithmetic -- --color never`.

use mftr::{raise, HarnessConfig, Runner, ERROR, RANGE_ERROR, TYPE_ERROR};
use std::process::ExitCode;

fn checked_divide(dividend: i64, divisor: i64) -> i64 {
    match dividend.checked_div(divisor) {
        Some(quotient) => quotient,
        None => raise(&RANGE_ERROR, format!("cannot divide {dividend} by {divisor}")),
    }
}

fn parse_operand(text: &str) -> i64 {
    text.trim()
        .parse()
        .unwrap_or_else(|_| raise(&TYPE_ERROR, format!("'{text}' is not an integer")))
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let config = match HarnessConfig::from_args() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };
    let mut runner = Runner::with_config(config);

    runner.test("division", |t| {
        t.assert_that("10 / 2 is 5", || checked_divide(10, 2) == 5);
        t.assert_that("-9 / 2 rounds towards zero", || checked_divide(-9, 2) == -4);
        t.expect_raised(&RANGE_ERROR, "dividing by zero", || {
            checked_divide(1, 0);
        });
        t.expect_raised(&ERROR, "overflowing i64::MIN / -1", || {
            checked_divide(i64::MIN, -1);
        });
    });

    runner.test("parsing", |t| {
        t.assert_that("' 42 ' parses", || parse_operand(" 42 ") == 42);
        t.assert_that("'0x2a' parses as a std integer", || "0x2a".parse::<i64>().map(|n| n == 42));
        t.expect_raised(&RANGE_ERROR, "parsing 'forty-two'", || {
            parse_operand("forty-two");
        });
    });

    runner.test("empty test", |_| {});

    runner.finish().exit_code()
}
