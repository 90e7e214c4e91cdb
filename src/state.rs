/// Counters of a single run.
///
/// The per-test assertion counters are reset by [`RunnerState::start_test`];
/// the `total_*` counters and the test counters only ever grow.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunnerState {
    pub tests_passed: usize,
    pub tests_failed: usize,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    pub total_assertions_passed: usize,
    pub total_assertions_failed: usize,
}

impl RunnerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_test(&mut self) {
        self.assertions_passed = 0;
        self.assertions_failed = 0;
    }

    /// Classifies the current test and bumps the matching test counter.
    /// Returns whether the test passed.
    pub fn end_test(&mut self) -> bool {
        let success = self.assertions_failed == 0;
        if success {
            self.tests_passed += 1;
        } else {
            self.tests_failed += 1;
        }
        success
    }

    pub fn assertion_passed(&mut self) {
        self.assertions_passed += 1;
        self.total_assertions_passed += 1;
    }

    pub fn assertion_failed(&mut self) {
        self.assertions_failed += 1;
        self.total_assertions_failed += 1;
    }

    #[must_use]
    pub fn assertions_in_test(&self) -> usize {
        self.assertions_passed + self.assertions_failed
    }

    #[must_use]
    pub fn total_tests(&self) -> usize {
        self.tests_passed + self.tests_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_assertions_passes() {
        let mut state = RunnerState::new();
        state.start_test();
        assert!(state.end_test());
        assert_eq!(state.tests_passed, 1);
        assert_eq!(state.total_tests(), 1);
    }

    #[test]
    fn per_test_counters_reset_but_totals_accumulate() {
        let mut state = RunnerState::new();

        state.start_test();
        state.assertion_passed();
        state.assertion_failed();
        assert_eq!(state.assertions_in_test(), 2);
        assert!(!state.end_test());

        state.start_test();
        state.assertion_passed();
        assert_eq!(state.assertions_in_test(), 1);
        assert!(state.end_test());

        assert_eq!(state.total_assertions_passed, 2);
        assert_eq!(state.total_assertions_failed, 1);
        assert_eq!((state.tests_passed, state.tests_failed), (1, 1));
    }
}
