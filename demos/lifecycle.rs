//! Hooks sharing a fixture with the tests they surround.

use mftr::{hook, HarnessConfig, Runner};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::process::ExitCode;
use std::rc::Rc;

type Store = Rc<RefCell<BTreeMap<String, u32>>>;

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let store: Store = Rc::default();
    let mut runner = Runner::with_config(HarnessConfig::default());

    let seeded = Rc::clone(&store);
    runner.bootstrap([hook(move || println!("bootstrap: {} entries", seeded.borrow().len()))]);

    let fixture = Rc::clone(&store);
    runner.before_each([hook(move || {
        fixture.borrow_mut().insert("apples".to_string(), 3);
    })]);

    let cleared = Rc::clone(&store);
    runner.after_each([hook(move || cleared.borrow_mut().clear())]);

    runner.teardown([hook(|| println!("teardown: releasing the store"))]);

    let shared = Rc::clone(&store);
    runner.test("fixture is present", |t| {
        t.assert_that("apples are stocked", || shared.borrow().get("apples") == Some(&3));
    });

    let shared = Rc::clone(&store);
    runner.test("changes do not leak between tests", |t| {
        shared.borrow_mut().insert("pears".to_string(), 1);
        t.assert_that("pears were added", || shared.borrow().contains_key("pears"));
    });

    let shared = Rc::clone(&store);
    runner.test("previous test was cleaned up", |t| {
        t.assert_that("no pears", || !shared.borrow().contains_key("pears"));
        t.assert_that("one entry", || shared.borrow().len() == 1);
    });

    runner.finish().exit_code()
}
