//! The accumulation sink driven by handlers
//!
//! Handlers never decide what a failure *means* for the caller. They set a
//! reason and call one of the assertion primitives; the sink records the
//! result and decides whether evaluation continues. [`CheckChain`] is the
//! bundled implementation.
//!
//! [`CheckChain`]: crate::chain::CheckChain

use regex::Regex;
use bigdecimal::BigDecimal;

use crate::error::CheckError;
use crate::value::Value;

/// Result of one assertion primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The predicate held.
    Passed,
    /// The predicate failed and the reason was recorded.
    Failed(String),
    /// The sink did not evaluate the predicate, e.g. after a fail-fast stop.
    Skipped,
}

impl Outcome {
    /// Returns true for [`Outcome::Failed`].
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Receives checks from handlers.
pub trait CheckSink {
    /// Sets the message recorded by the next failing primitive.
    fn set_fail_reason(&mut self, reason: String);

    /// Fails when `value` is null.
    fn is_not_null(&mut self, value: &Value) -> Outcome;

    /// Fails when `value` is empty or whitespace only.
    fn is_not_blank(&mut self, value: &str) -> Outcome;

    /// Fails unless `pattern` matches `value`. Handlers pass patterns
    /// already anchored at both ends.
    fn matches(&mut self, value: &str, pattern: &Regex) -> Outcome;

    /// Fails unless `left <= value <= right`.
    fn between(&mut self, value: &BigDecimal, left: &BigDecimal, right: &BigDecimal) -> Outcome;

    /// Fails unless `left <= size <= right`.
    fn size_between(&mut self, size: usize, left: usize, right: usize) -> Outcome;

    /// Whether null values bypass type-specific handlers.
    fn is_null_skip(&self) -> bool;

    /// Escalates an error that prevented a field from being evaluated.
    ///
    /// Returning `Err` aborts the current dispatch; returning `Ok` means the
    /// sink absorbed the error and dispatch continues with the next field.
    fn escalate(&mut self, error: CheckError) -> Result<(), CheckError>;
}
