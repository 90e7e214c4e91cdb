use mftr::{raise, Event, EventLog, HarnessConfig, Kind, Runner, ERROR, RANGE_ERROR, TYPE_ERROR};
use pretty_assertions::assert_eq;

static INDEX_ERROR: Kind = Kind::extends("IndexError", &RANGE_ERROR);

fn run_one(body: impl FnOnce(&mut Runner)) -> Vec<Event> {
    let log = EventLog::new();
    let mut runner = Runner::with_reporter(&HarnessConfig::default(), log.clone());
    runner.test("expectations", body);
    log.assertions()
}

fn only(events: Vec<Event>) -> (String, bool, Option<String>) {
    assert_eq!(events.len(), 1);
    match events.into_iter().next() {
        Some(Event::Assertion {
            message,
            success,
            location,
            is_raised_error,
        }) => {
            assert!(!is_raised_error);
            (message, success, location)
        }
        other => panic!("expected an assertion event, got {other:?}"),
    }
}

#[test]
fn matching_kind_passes() {
    let (message, success, location) = only(run_one(|t| {
        t.expect_raised(&RANGE_ERROR, "x", || raise(&RANGE_ERROR, "too big"));
    }));

    assert!(success);
    assert_eq!(message, "x raises a RangeError");
    assert_eq!(location, None);
}

#[test]
fn descendant_kind_passes() {
    let (message, success, _) = only(run_one(|t| {
        t.expect_raised(&ERROR, "lookup", || raise(&INDEX_ERROR, "index 4 of 3"));
    }));

    assert!(success);
    assert_eq!(message, "lookup raises an Error");
}

#[test]
fn other_kind_fails_and_names_both() {
    let (message, success, location) = only(run_one(|t| {
        t.expect_raised(&RANGE_ERROR, "x", || raise(&TYPE_ERROR, "not a number"));
    }));

    assert!(!success);
    assert!(message.contains("RangeError"));
    assert!(message.contains("TypeError"));
    assert_eq!(
        message,
        "Expected x to raise a 'RangeError', but a 'TypeError' was raised"
    );
    assert!(location.unwrap().starts_with(file!()));
}

#[test]
fn plain_panic_is_not_an_error_kind() {
    let (message, success, _) = only(run_one(|t| {
        t.expect_raised(&ERROR, "unwrap", || {
            let _ = "".parse::<u8>().unwrap();
        });
    }));

    assert!(!success);
    assert_eq!(
        message,
        "Expected unwrap to raise an 'Error', but a 'Panic' was raised"
    );
}

#[test]
fn missing_raise_fails() {
    let (message, success, location) = only(run_one(|t| {
        t.expect_raised(&RANGE_ERROR, "x", || {});
    }));

    assert!(!success);
    assert_eq!(message, "Expected x to raise a 'RangeError', got none");
    assert!(location.is_some());
}

#[test]
fn expectations_count_towards_the_test() {
    let log = EventLog::new();
    let mut runner = Runner::with_reporter(&HarnessConfig::default(), log.clone());
    runner.test("mixed", |t| {
        t.expect_raised(&ERROR, "raises", || raise(&ERROR, "yes"));
        t.expect_raised(&ERROR, "silent", || {});
    });

    let summary = runner.finish();
    assert_eq!(summary.tests_failed, 1);
    assert_eq!((summary.assertions_passed, summary.assertions_failed), (1, 1));
}
