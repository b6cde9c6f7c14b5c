//! Test harness - register tests, execute them, accumulate results

use crate::matchers::{FnMatcher, ValueMatcher};
use crate::reporter::Reporter;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Errors raised by misuse of the registration API.
///
/// These are returned synchronously from the registering call and are never
/// captured as a failing test result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("test should have a description")]
    MissingDescription,
}

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Pass,
    Fail,
}

/// A record of one executed test: its description, outcome, and the failure
/// messages accumulated while its callback ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    /// Description given at registration (never empty)
    pub description: String,
    /// Pass or fail
    pub status: TestStatus,
    /// Failure messages, in the order they were reported
    pub errors: Vec<String>,
}

impl TestRecord {
    fn new(description: String) -> Self {
        TestRecord {
            description,
            status: TestStatus::Pass,
            errors: Vec::new(),
        }
    }

    /// Check if this record is a pass
    pub fn is_pass(&self) -> bool {
        self.status == TestStatus::Pass
    }

    /// Check if this record is a failure
    pub fn is_fail(&self) -> bool {
        self.status == TestStatus::Fail
    }
}

/// Results log plus the at-most-one test currently executing.
#[derive(Default)]
struct Slots {
    results: Vec<TestRecord>,
    current: Option<TestRecord>,
}

/// The test harness: owns registration, execution, the results log, and the
/// deferred report.
///
/// Creating a harness schedules exactly one report: it prints when the
/// harness is dropped, unless [`Harness::finish`] already emitted it. A
/// harness that registers zero tests still reports `Total: 0`.
///
/// Single-threaded by design: tests run strictly sequentially, in
/// registration order, and a callback must not call [`Harness::test`] again.
pub struct Harness {
    slots: RefCell<Slots>,
    reporter: Reporter,
    reported: Cell<bool>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create a new harness with the default reporter
    pub fn new() -> Self {
        Harness {
            slots: RefCell::new(Slots::default()),
            reporter: Reporter::new(),
            reported: Cell::new(false),
        }
    }

    /// Replace the reporter (e.g. to disable colored glyphs)
    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Wrap a value for assertion.
    ///
    /// Returns a [`ValueMatcher`] holding the value and a back-reference to
    /// this harness for failure reporting. No side effects.
    pub fn expect<T>(&self, value: T) -> ValueMatcher<'_, T> {
        ValueMatcher::new(value, self)
    }

    /// Wrap a callable for assertion.
    ///
    /// Returns a [`FnMatcher`]; the callable is not invoked until a matcher
    /// operation runs it.
    pub fn expect_fn<F: FnMut()>(&self, f: F) -> FnMatcher<'_, F> {
        FnMatcher::new(f, self)
    }

    /// Register and immediately execute a test.
    ///
    /// Fails fast with [`UsageError::MissingDescription`] if `description`
    /// is empty, before any bookkeeping. Otherwise the callback runs to
    /// completion inside an unwind boundary: a panic marks the test failed
    /// and, when the payload carries a non-empty message, records it. The
    /// record lands in the results log either way, and control returns to
    /// the caller only after the callback (and any nested matcher calls)
    /// has finished.
    pub fn test<F>(&self, description: &str, callback: F) -> Result<(), UsageError>
    where
        F: FnOnce(),
    {
        if description.is_empty() {
            return Err(UsageError::MissingDescription);
        }

        self.slots.borrow_mut().current = Some(TestRecord::new(description.to_string()));

        // No borrow is held while the callback runs; matchers re-enter
        // through report_error. The default panic hook is silenced so a
        // captured assertion failure does not also print a backtrace.
        let prev_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let outcome = panic::catch_unwind(AssertUnwindSafe(callback));
        panic::set_hook(prev_hook);

        let mut slots = self.slots.borrow_mut();
        if let Some(mut record) = slots.current.take() {
            if let Err(payload) = outcome {
                record.status = TestStatus::Fail;
                if let Some(message) = panic_message(payload.as_ref()) {
                    // A matcher that failed has already preserved this exact
                    // message via report_error; only record it once.
                    if record.errors.last().map(String::as_str) != Some(message) {
                        record.errors.push(message.to_string());
                    }
                }
            }
            slots.results.push(record);
        }
        Ok(())
    }

    /// Append a failure message to the currently executing test.
    ///
    /// No-op when no test is current, so a matcher invoked outside a
    /// registered test cannot crash the harness.
    pub fn report_error(&self, message: impl Into<String>) {
        if let Some(current) = self.slots.borrow_mut().current.as_mut() {
            current.errors.push(message.into());
        }
    }

    /// Snapshot of the results log, in registration order
    pub fn results(&self) -> Vec<TestRecord> {
        self.slots.borrow().results.clone()
    }

    /// Emit the report now. Idempotent; the drop-time report is skipped
    /// once this has run.
    pub fn finish(&self) {
        if self.reported.replace(true) {
            return;
        }
        self.reporter.report(&self.slots.borrow().results);
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Extract a usable message from a panic payload. Matchers and `panic!`
/// carry strings; anything else has no message and is swallowed.
fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        return None;
    };
    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::panic::panic_any;

    fn harness() -> Harness {
        Harness::new().with_reporter(Reporter::new().with_no_color(true))
    }

    // -- registration ---------------------------------------------------------

    #[test]
    fn test_pass_recorded_with_empty_errors() {
        let t = harness();
        t.test("ok", || {
            t.expect(1 + 1).to_be(2);
        })
        .unwrap();

        assert_eq!(
            t.results(),
            vec![TestRecord {
                description: "ok".to_string(),
                status: TestStatus::Pass,
                errors: vec![],
            }]
        );
    }

    #[test]
    fn test_empty_description_is_a_usage_error() {
        let t = harness();
        let result = t.test("", || {});
        assert_eq!(result, Err(UsageError::MissingDescription));
        assert!(t.results().is_empty());
    }

    #[test]
    fn test_results_preserve_registration_order() {
        let t = harness();
        t.test("first", || {}).unwrap();
        t.test("second", || {
            t.expect(1).to_be(2);
        })
        .unwrap();
        t.test("third", || {}).unwrap();

        let descriptions: Vec<_> = t
            .results()
            .iter()
            .map(|r| r.description.clone())
            .collect();
        assert_eq!(descriptions, vec!["first", "second", "third"]);
    }

    // -- failure capture ------------------------------------------------------

    #[test]
    fn test_failing_matcher_yields_exactly_one_error() {
        let t = harness();
        t.test("bad", || {
            t.expect(1 + 1).to_be(4);
        })
        .unwrap();

        let results = t.results();
        assert_eq!(results[0].status, TestStatus::Fail);
        assert_eq!(results[0].errors, vec!["Expected 4, but received 2"]);
    }

    #[test]
    fn test_plain_panic_message_is_recorded() {
        let t = harness();
        t.test("boom", || panic!("something broke")).unwrap();

        let results = t.results();
        assert_eq!(results[0].status, TestStatus::Fail);
        assert_eq!(results[0].errors, vec!["something broke"]);
    }

    #[test]
    fn test_panic_without_message_is_swallowed() {
        let t = harness();
        t.test("silent", || panic_any(42_i32)).unwrap();

        let results = t.results();
        assert_eq!(results[0].status, TestStatus::Fail);
        assert!(results[0].errors.is_empty());
    }

    #[test]
    fn test_failure_does_not_abort_the_run() {
        let t = harness();
        t.test("fails", || panic!("first")).unwrap();
        t.test("still runs", || {}).unwrap();

        let results = t.results();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_fail());
        assert!(results[1].is_pass());
    }

    // -- report_error ---------------------------------------------------------

    #[test]
    fn test_report_error_outside_a_test_is_ignored() {
        let t = harness();
        t.report_error("stray message");
        assert!(t.results().is_empty());
    }

    #[test]
    fn test_report_error_alone_does_not_flip_status() {
        let t = harness();
        t.test("warned", || t.report_error("note")).unwrap();

        let results = t.results();
        assert_eq!(results[0].status, TestStatus::Pass);
        assert_eq!(results[0].errors, vec!["note"]);
    }

    #[test]
    fn test_report_error_then_distinct_panic_records_both() {
        let t = harness();
        t.test("two messages", || {
            t.report_error("context");
            panic!("actual failure");
        })
        .unwrap();

        let results = t.results();
        assert_eq!(results[0].errors, vec!["context", "actual failure"]);
    }

    #[test]
    fn test_harness_instances_do_not_share_a_log() {
        let a = harness();
        let b = harness();
        a.test("only in a", || {}).unwrap();

        assert_eq!(a.results().len(), 1);
        assert!(b.results().is_empty());
    }

    // -- finish ---------------------------------------------------------------

    #[test]
    fn test_finish_is_idempotent() {
        let t = harness();
        t.test("ok", || {}).unwrap();
        t.finish();
        t.finish();
        // drop will also be a no-op
    }

    #[test]
    fn test_zero_tests_report_does_not_panic() {
        let t = harness();
        t.finish();
    }
}
