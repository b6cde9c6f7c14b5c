//! Attest - a minimal synchronous unit-testing harness
//!
//! This library provides a self-contained test micro-framework:
//! - Named test registration and strictly sequential execution
//! - Chainable matchers that record failures without aborting the run
//! - A deferred pass/fail report with summary counts
//!
//! # Example
//!
//! ```
//! use attest::Harness;
//!
//! let t = Harness::new();
//! t.test("addition", || {
//!     t.expect(1 + 1).to_be(2);
//! }).unwrap();
//! // The report prints once when `t` is dropped (or call `t.finish()`).
//! ```

/// Attest version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod harness;
pub mod matchers;
pub mod reporter;

// Re-export commonly used types
pub use harness::{Harness, TestRecord, TestStatus, UsageError};
pub use matchers::{FnMatcher, ValueMatcher};
pub use reporter::Reporter;
