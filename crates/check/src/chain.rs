//! Reference accumulation sink
//!
//! [`CheckChain`] records failures as [`ValidationError`]s. In fail-fast mode
//! (the default) it stops evaluating after the first failure and every later
//! primitive reports [`Outcome::Skipped`].

use std::borrow::Cow;

use regex::Regex;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, ValidationError, ValidationErrors};
use crate::sink::{CheckSink, Outcome};
use crate::value::Value;

// ============================================================================
// SETTINGS
// ============================================================================

/// Behavior switches of a [`CheckChain`].
///
/// Missing keys take their default when deserialized.
///
/// ```
/// use chaincheck::chain::ChainSettings;
///
/// let settings: ChainSettings = serde_json::from_str(r#"{ "null_skip": true }"#).unwrap();
/// assert!(settings.null_skip);
/// assert!(settings.fail_fast);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    /// Null values bypass type-specific handlers instead of being escalated.
    pub null_skip: bool,
    /// Escalated errors are logged and recorded as failures instead of
    /// being returned.
    pub use_catch: bool,
    /// Stop evaluating after the first failure.
    pub fail_fast: bool,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            null_skip: false,
            use_catch: false,
            fail_fast: true,
        }
    }
}

// ============================================================================
// CHAIN
// ============================================================================

/// Sink that records failures in order.
///
/// # Examples
///
/// ```
/// use chaincheck::chain::CheckChain;
///
/// let mut chain = CheckChain::new();
/// chain.check("name is required", || false);
/// chain.check("never evaluated", || false);
///
/// let failures = chain.finish().unwrap_err();
/// assert_eq!(failures.messages().collect::<Vec<_>>(), ["name is required"]);
/// ```
#[derive(Debug, Clone)]
pub struct CheckChain {
    settings: ChainSettings,
    proceed: bool,
    skip_next: bool,
    pending_reason: Option<String>,
    failures: ValidationErrors,
}

impl CheckChain {
    /// Creates a chain with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(ChainSettings::default())
    }

    /// Creates a chain with the given settings.
    #[must_use]
    pub fn with_settings(settings: ChainSettings) -> Self {
        Self {
            settings,
            proceed: true,
            skip_next: false,
            pending_reason: None,
            failures: ValidationErrors::new(),
        }
    }

    /// Sets null-skip.
    #[must_use = "builder methods must be chained or built"]
    pub fn null_skip(mut self, enabled: bool) -> Self {
        self.settings.null_skip = enabled;
        self
    }

    /// Sets use-catch.
    #[must_use = "builder methods must be chained or built"]
    pub fn use_catch(mut self, enabled: bool) -> Self {
        self.settings.use_catch = enabled;
        self
    }

    /// Sets fail-fast.
    #[must_use = "builder methods must be chained or built"]
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.settings.fail_fast = enabled;
        self
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &ChainSettings {
        &self.settings
    }

    /// Whether later checks will still be evaluated.
    #[must_use]
    pub fn is_proceeding(&self) -> bool {
        self.proceed
    }

    /// Skips the next primitive, whatever its predicate.
    pub fn skip_next(&mut self) -> &mut Self {
        self.skip_next = true;
        self
    }

    /// Skips the next primitive when `value` is null and null-skip is on.
    pub fn if_null_then_skip(&mut self, value: &Value) -> &mut Self {
        if self.settings.null_skip && value.is_null() {
            self.skip_next = true;
        }
        self
    }

    /// Records a failure with `reason` unless `predicate` holds.
    pub fn check(&mut self, reason: impl Into<String>, predicate: impl FnOnce() -> bool) -> Outcome {
        self.set_fail_reason(reason.into());
        self.record("check", predicate, Vec::new)
    }

    /// Like [`check`](Self::check) for a predicate that can fail.
    ///
    /// With use-catch the error is logged and counts as a failed check;
    /// without it the error is returned.
    pub fn try_check<E>(
        &mut self,
        reason: impl Into<String>,
        predicate: impl FnOnce() -> Result<bool, E>,
    ) -> Result<Outcome, CheckError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.set_fail_reason(reason.into());
        if !self.proceed || self.skip_next {
            return Ok(self.record("check", || true, Vec::new));
        }

        let passed = match predicate() {
            Ok(passed) => passed,
            Err(err) if self.settings.use_catch => {
                tracing::error!(error = %err, "check raised an error");
                false
            }
            Err(err) => {
                self.pending_reason = None;
                return Err(CheckError::handler(err));
            }
        };
        Ok(self.record("check", || passed, Vec::new))
    }

    /// Failures recorded so far.
    #[must_use]
    pub fn failures(&self) -> &ValidationErrors {
        &self.failures
    }

    /// Returns the recorded failures, if any.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.failures.into_result(())
    }

    fn record<P>(
        &mut self,
        code: &'static str,
        predicate: impl FnOnce() -> bool,
        params: P,
    ) -> Outcome
    where
        P: FnOnce() -> Vec<(Cow<'static, str>, Cow<'static, str>)>,
    {
        let reason = self.pending_reason.take();

        if !self.proceed {
            return Outcome::Skipped;
        }
        if std::mem::take(&mut self.skip_next) {
            tracing::trace!(code, "check skipped");
            return Outcome::Skipped;
        }
        if predicate() {
            tracing::debug!(code, "check passed");
            return Outcome::Passed;
        }

        let message = reason.unwrap_or_else(|| format!("{code} check failed"));
        let mut error = ValidationError::new(code, message.clone());
        error.params = params();
        tracing::debug!(code, reason = %message, "check failed");
        self.failures.add(error);

        if self.settings.fail_fast {
            self.proceed = false;
        }
        Outcome::Failed(message)
    }
}

fn param_list<const N: usize>(
    pairs: [(&'static str, String); N],
) -> Vec<(Cow<'static, str>, Cow<'static, str>)> {
    pairs
        .into_iter()
        .map(|(k, v)| (Cow::Borrowed(k), Cow::Owned(v)))
        .collect()
}

impl Default for CheckChain {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckSink for CheckChain {
    fn set_fail_reason(&mut self, reason: String) {
        self.pending_reason = Some(reason);
    }

    fn is_not_null(&mut self, value: &Value) -> Outcome {
        self.record("not_null", || !value.is_null(), Vec::new)
    }

    fn is_not_blank(&mut self, value: &str) -> Outcome {
        self.record("not_blank", || !value.trim().is_empty(), Vec::new)
    }

    fn matches(&mut self, value: &str, pattern: &Regex) -> Outcome {
        self.record("matches", || pattern.is_match(value), || {
            param_list([("pattern", pattern.as_str().to_owned())])
        })
    }

    fn between(&mut self, value: &BigDecimal, left: &BigDecimal, right: &BigDecimal) -> Outcome {
        self.record("between", || left <= value && value <= right, || {
            param_list([
                ("left", left.to_string()),
                ("right", right.to_string()),
                ("actual", value.to_string()),
            ])
        })
    }

    fn size_between(&mut self, size: usize, left: usize, right: usize) -> Outcome {
        self.record("size_between", || (left..=right).contains(&size), || {
            param_list([
                ("left", left.to_string()),
                ("right", right.to_string()),
                ("actual", size.to_string()),
            ])
        })
    }

    fn is_null_skip(&self) -> bool {
        self.settings.null_skip
    }

    fn escalate(&mut self, error: CheckError) -> Result<(), CheckError> {
        if !self.proceed {
            tracing::trace!(error = %error, "evaluation error after the chain stopped");
            return Ok(());
        }
        if std::mem::take(&mut self.skip_next) {
            tracing::trace!(error = %error, "evaluation error skipped");
            return Ok(());
        }
        if !self.settings.use_catch {
            return Err(error);
        }

        tracing::error!(error = %error, cause = %error.root_cause(), "evaluation error caught");
        let mut failure = ValidationError::new("evaluation_error", error.to_string());
        failure.params = param_list([("cause", error.root_cause().to_string())]);
        self.failures.add(failure);
        if self.settings.fail_fast {
            self.proceed = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fail_fast_stops_after_first_failure() {
        let mut chain = CheckChain::new();
        chain.set_fail_reason("first".into());
        assert_eq!(chain.is_not_blank("  "), Outcome::Failed("first".into()));
        chain.set_fail_reason("second".into());
        assert_eq!(chain.is_not_null(&Value::Null), Outcome::Skipped);
        assert!(!chain.is_proceeding());
        assert_eq!(chain.failures().len(), 1);
    }

    #[test]
    fn test_continue_mode_records_every_failure() {
        let mut chain = CheckChain::new().fail_fast(false);
        chain.set_fail_reason("too small".into());
        chain.size_between(2, 3, 5);
        chain.set_fail_reason("out of range".into());
        chain.between(&BigDecimal::from(0), &BigDecimal::from(1), &BigDecimal::from(10));

        let failures = chain.finish().unwrap_err();
        assert_eq!(failures.messages().collect::<Vec<_>>(), ["too small", "out of range"]);
        assert_eq!(failures.errors()[0].param("actual"), Some("2"));
        assert_eq!(failures.errors()[1].code, "between");
    }

    #[test]
    fn test_skip_next_consumes_one_primitive() {
        let mut chain = CheckChain::new();
        chain.skip_next();
        assert_eq!(chain.is_not_null(&Value::Null), Outcome::Skipped);
        assert_eq!(chain.is_not_null(&Value::Bool(true)), Outcome::Passed);
        assert!(chain.finish().is_ok());
    }

    #[test]
    fn test_if_null_then_skip_respects_null_skip() {
        let mut chain = CheckChain::new().null_skip(true);
        chain.if_null_then_skip(&Value::Null);
        assert_eq!(chain.check("skipped", || false), Outcome::Skipped);

        let mut strict = CheckChain::new();
        strict.if_null_then_skip(&Value::Null);
        assert!(strict.check("recorded", || false).is_failed());
    }

    #[test]
    fn test_failure_without_reason_uses_code() {
        let mut chain = CheckChain::new();
        assert_eq!(
            chain.is_not_blank(""),
            Outcome::Failed("not_blank check failed".into())
        );
    }

    #[test]
    fn test_escalate_without_catch_returns_error() {
        let mut chain = CheckChain::new();
        let result = chain.escalate(CheckError::invalid_marker("size", "bad"));
        assert!(result.is_err());
        assert!(chain.failures().is_empty());
    }

    #[test]
    fn test_escalate_after_stop_is_absorbed() {
        let mut chain = CheckChain::new();
        chain.set_fail_reason("first".into());
        assert!(chain.is_not_blank("").is_failed());

        chain
            .escalate(CheckError::invalid_marker("size", "bad"))
            .expect("stopped chain absorbs errors");
        assert_eq!(chain.failures().len(), 1);
    }

    #[test]
    fn test_escalate_consumes_skip_next() {
        let mut chain = CheckChain::new();
        chain.skip_next();
        chain
            .escalate(CheckError::invalid_marker("size", "bad"))
            .expect("skipped");
        assert!(chain.escalate(CheckError::invalid_marker("size", "bad")).is_err());
    }

    #[test]
    fn test_escalate_with_catch_records_failure() {
        let mut chain = CheckChain::new().use_catch(true);
        chain
            .escalate(CheckError::invalid_marker("size", "bad"))
            .expect("caught");
        assert_eq!(chain.failures().errors()[0].code, "evaluation_error");
        assert!(!chain.is_proceeding());
    }

    #[test]
    fn test_try_check() {
        let io = || Err::<bool, _>(std::io::Error::other("unreachable host"));

        let mut strict = CheckChain::new();
        assert!(strict.try_check("lookup", io).is_err());
        assert!(strict.failures().is_empty());

        let mut lenient = CheckChain::new().use_catch(true);
        let outcome = lenient.try_check("lookup", io).expect("caught");
        assert_eq!(outcome, Outcome::Failed("lookup".into()));
    }

    #[test]
    fn test_settings_roundtrip_defaults() {
        let settings: ChainSettings = serde_json::from_str("{}").expect("valid json");
        assert_eq!(settings, ChainSettings::default());
        let json = serde_json::to_string(&ChainSettings::default()).expect("serializable");
        assert_eq!(json, r#"{"null_skip":false,"use_catch":false,"fail_fast":true}"#);
    }
}
