use crate::caller_location::LocationStrategy;
use crate::harness_configuration::HarnessConfig;
use crate::state::RunnerState;
use crate::test_reporter::{ConsoleReporter, Reporter};
use std::panic::Location;
use std::process::ExitCode;

/// A zero-argument lifecycle callback.
pub type Hook = Box<dyn FnMut()>;

pub fn hook(callback: impl FnMut() + 'static) -> Hook {
    Box::new(callback)
}

#[derive(Default)]
struct Hooks {
    before_each: Vec<Hook>,
    after_each: Vec<Hook>,
    bootstrap: Vec<Hook>,
    teardown: Vec<Hook>,
}

fn run_hooks(hooks: &mut [Hook]) {
    for hook in hooks {
        hook();
    }
}

/// Final counters of a run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub tests_passed: usize,
    pub tests_failed: usize,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
}

impl RunSummary {
    #[must_use]
    pub fn total_tests(&self) -> usize {
        self.tests_passed + self.tests_failed
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.tests_failed == 0
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// One test run.
///
/// Tests execute immediately and in call order. Hooks surround them:
/// `bootstrap` once before the first test, `before_each`/`after_each` around
/// every test, and `teardown` once when the run is finished.
///
/// The run is finished either explicitly with [`Runner::finish`] or when the
/// runner is dropped. A runner dropped while unwinding from a panic escaping a
/// test or hook skips teardown and the summary.
///
/// ```
/// use mftr::{hook, EventLog, HarnessConfig, Runner};
///
/// let mut runner = Runner::with_reporter(&HarnessConfig::default(), EventLog::new());
/// runner.before_each([hook(|| println!("fresh fixture"))]);
/// runner.test("addition", |t| {
///     t.assert_that("1 + 1 is 2", || 1 + 1 == 2);
/// });
/// assert!(runner.finish().success());
/// ```
pub struct Runner {
    state: RunnerState,
    hooks: Hooks,
    bootstrapped: bool,
    finished: bool,
    location: LocationStrategy,
    reporter: Box<dyn Reporter>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// A runner reporting to standard output with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    pub fn with_config(config: HarnessConfig) -> Self {
        let reporter = ConsoleReporter::stdout(&config);
        Self::with_reporter(&config, reporter)
    }

    pub fn with_reporter(config: &HarnessConfig, reporter: impl Reporter + 'static) -> Self {
        Self {
            state: RunnerState::new(),
            hooks: Hooks::default(),
            bootstrapped: false,
            finished: false,
            location: config.location,
            reporter: Box::new(reporter),
        }
    }

    pub fn before_each(&mut self, hooks: impl IntoIterator<Item = Hook>) {
        self.hooks.before_each.extend(hooks);
    }

    pub fn after_each(&mut self, hooks: impl IntoIterator<Item = Hook>) {
        self.hooks.after_each.extend(hooks);
    }

    pub fn bootstrap(&mut self, hooks: impl IntoIterator<Item = Hook>) {
        self.hooks.bootstrap.extend(hooks);
    }

    pub fn teardown(&mut self, hooks: impl IntoIterator<Item = Hook>) {
        self.hooks.teardown.extend(hooks);
    }

    #[must_use]
    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    /// Runs one test. Panics raised by hooks or by `body` itself are not
    /// caught; only assertions isolate failures.
    #[tracing::instrument(skip_all, fields(test = description))]
    pub fn test(&mut self, description: &str, body: impl FnOnce(&mut Runner)) {
        if !self.bootstrapped {
            tracing::debug!(hooks = self.hooks.bootstrap.len(), "running bootstrap");
            run_hooks(&mut self.hooks.bootstrap);
            self.bootstrapped = true;
        }

        self.state.start_test();
        self.reporter.notify_test_start(description);

        run_hooks(&mut self.hooks.before_each);
        body(self);
        run_hooks(&mut self.hooks.after_each);

        let success = self.state.end_test();
        tracing::debug!(
            success,
            passed = self.state.assertions_passed,
            failed = self.state.assertions_failed,
            "test completed"
        );
        self.reporter.notify_test_end(
            self.state.assertions_passed,
            self.state.assertions_in_test(),
            success,
        );
    }

    pub fn record_assertion_passed(&mut self) {
        self.state.assertion_passed();
    }

    pub fn record_assertion_failed(&mut self) {
        self.state.assertion_failed();
    }

    pub(crate) fn report_success(&mut self, message: &str) {
        self.reporter
            .notify_assertion_result(message, true, None, false);
    }

    pub(crate) fn report_failure(
        &mut self,
        message: &str,
        call_site: &Location<'_>,
        is_raised_error: bool,
    ) {
        let location = self.location.locate(call_site);
        self.reporter
            .notify_assertion_result(message, false, Some(&location), is_raised_error);
    }

    /// Runs teardown and emits the summary. Does nothing after the first call.
    pub fn shutdown(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        tracing::debug!(hooks = self.hooks.teardown.len(), "running teardown");
        run_hooks(&mut self.hooks.teardown);

        self.reporter.notify_summary(
            self.state.total_tests(),
            self.state.tests_passed,
            self.state.tests_failed,
        );
    }

    pub fn finish(mut self) -> RunSummary {
        self.shutdown();
        self.summary()
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            tests_passed: self.state.tests_passed,
            tests_failed: self.state.tests_failed,
            assertions_passed: self.state.total_assertions_passed,
            assertions_failed: self.state.total_assertions_failed,
        }
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::warn!("run aborted by a panic, skipping teardown");
            return;
        }
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_reporter::{Event, EventLog};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn runner() -> (Runner, EventLog) {
        let log = EventLog::new();
        (Runner::with_reporter(&HarnessConfig::default(), log.clone()), log)
    }

    fn tracer(trace: &Rc<RefCell<Vec<String>>>, name: &str) -> Hook {
        let trace = Rc::clone(trace);
        let name = name.to_string();
        hook(move || trace.borrow_mut().push(name.clone()))
    }

    #[test]
    fn test_without_assertions_passes() {
        let (mut runner, log) = runner();
        runner.test("empty", |_| {});

        assert_eq!(
            log.events(),
            vec![
                Event::TestStart("empty".to_string()),
                Event::TestEnd {
                    passed: 0,
                    total: 0,
                    success: true
                },
            ]
        );
        assert_eq!(runner.state().tests_passed, 1);
    }

    #[test]
    fn hooks_run_in_lifecycle_order() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let (mut runner, _log) = runner();
        runner.bootstrap([tracer(&trace, "bootstrap")]);
        runner.before_each([tracer(&trace, "before 1"), tracer(&trace, "before 2")]);
        runner.after_each([tracer(&trace, "after")]);
        runner.teardown([tracer(&trace, "teardown")]);

        for name in ["first", "second"] {
            let trace = Rc::clone(&trace);
            runner.test(name, move |_| trace.borrow_mut().push(name.to_string()));
        }
        runner.finish();

        assert_eq!(
            *trace.borrow(),
            [
                "bootstrap", "before 1", "before 2", "first", "after", "before 1", "before 2",
                "second", "after", "teardown",
            ]
        );
    }

    #[test]
    fn shutdown_happens_once() {
        let count = Rc::new(RefCell::new(0));
        let (mut runner, log) = runner();
        let counter = Rc::clone(&count);
        runner.teardown([hook(move || *counter.borrow_mut() += 1)]);

        runner.shutdown();
        runner.shutdown();
        drop(runner);

        assert_eq!(*count.borrow(), 1);
        let summaries = log
            .events()
            .into_iter()
            .filter(|event| matches!(event, Event::Summary { .. }))
            .count();
        assert_eq!(summaries, 1);
    }

    #[test]
    fn drop_finishes_the_run() {
        let (runner, log) = runner();
        drop(runner);
        assert_eq!(
            log.events(),
            vec![Event::Summary {
                total: 0,
                passed: 0,
                failed: 0
            }]
        );
    }

    #[test]
    fn summary_counts_tests_and_assertions() {
        let (mut runner, _log) = runner();
        runner.test("passes", |t| t.record_assertion_passed());
        runner.test("fails", |t| {
            t.record_assertion_passed();
            t.record_assertion_failed();
        });

        let summary = runner.finish();
        assert_eq!(
            summary,
            RunSummary {
                tests_passed: 1,
                tests_failed: 1,
                assertions_passed: 2,
                assertions_failed: 1,
            }
        );
        assert_eq!(summary.total_tests(), 2);
        assert!(!summary.success());
    }
}
