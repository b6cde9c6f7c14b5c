//! Matchers - chainable assertions that report failures through the harness
//!
//! Two variants mirror the two kinds of subject: [`ValueMatcher`] compares a
//! plain value against an expectation, [`FnMatcher`] observes whether a
//! callable panics. Both hold a back-reference to the [`Harness`] so a
//! failure is preserved via `report_error` before the panic that halts the
//! test callback.

use crate::harness::Harness;
use std::any::{self, Any};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

pub(crate) const NOT_A_FUNCTION: &str = "Value passed to toThrow is not a function";
pub(crate) const DID_NOT_THROW: &str = "Function did not throw an error as expected";

/// Matcher over a plain value. Created by [`Harness::expect`]; discarded
/// after the chained assertion calls complete.
pub struct ValueMatcher<'h, T> {
    value: T,
    harness: &'h Harness,
}

impl<'h, T> ValueMatcher<'h, T> {
    pub(crate) fn new(value: T, harness: &'h Harness) -> Self {
        ValueMatcher { value, harness }
    }

    /// A plain value is never callable: record the misuse and fail without
    /// touching the subject.
    pub fn to_throw(&self) -> &Self {
        self.fail(NOT_A_FUNCTION.to_string())
    }

    /// Preserve the message on the current test, then unwind out of the
    /// callback carrying the same message.
    fn fail(&self, message: String) -> ! {
        self.harness.report_error(message.clone());
        panic::panic_any(message)
    }
}

impl<'h, T: fmt::Debug> ValueMatcher<'h, T> {
    /// Assert strict equality with `expected`. No coercion, no structural
    /// fallback beyond the type's own `PartialEq`.
    pub fn to_be(&self, expected: T) -> &Self
    where
        T: PartialEq,
    {
        if self.value != expected {
            self.fail(format!(
                "Expected {:?}, but received {:?}",
                expected, self.value
            ));
        }
        self
    }

    /// Assert the value is a runtime instance of `U`.
    pub fn to_be_instance_of<U: Any>(&self) -> &Self
    where
        T: Any,
    {
        let actual: &dyn Any = &self.value;
        if !actual.is::<U>() {
            self.fail(format!(
                "Expected {:?} to be instance of {}",
                self.value,
                any::type_name::<U>()
            ));
        }
        self
    }
}

impl<'h, T: fmt::Debug> ValueMatcher<'h, Option<T>> {
    /// Assert the value is the null sentinel (`None`). Any `Some`, including
    /// `Some(0)` or `Some(false)`, fails with the rendered inner value.
    pub fn to_be_null(&self) -> &Self {
        if let Some(inner) = &self.value {
            self.fail(format!("Expected null, but received {:?}", inner));
        }
        self
    }
}

/// Matcher over a callable. Created by [`Harness::expect_fn`].
pub struct FnMatcher<'h, F> {
    f: F,
    harness: &'h Harness,
}

impl<'h, F: FnMut()> FnMatcher<'h, F> {
    pub(crate) fn new(f: F, harness: &'h Harness) -> Self {
        FnMatcher { f, harness }
    }

    /// Invoke the callable and assert it panics. The caught payload is
    /// discarded, never inspected. A normal return is the failure.
    pub fn to_throw(&mut self) -> &mut Self {
        let f = &mut self.f;
        let prev_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f()));
        panic::set_hook(prev_hook);

        if outcome.is_ok() {
            let message = DID_NOT_THROW.to_string();
            self.harness.report_error(message.clone());
            panic::panic_any(message);
        }
        self
    }
}
