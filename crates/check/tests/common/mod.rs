//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chaincheck::error::CheckError;
use chaincheck::sink::{CheckSink, Outcome};
use chaincheck::value::Value;
use regex::Regex;
use bigdecimal::BigDecimal;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per binary. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sink that records every call instead of judging it.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub null_skip: bool,
    pub calls: Vec<&'static str>,
    pub reasons: Vec<String>,
    pub escalated: Vec<CheckError>,
}

impl RecordingSink {
    pub fn null_skip() -> Self {
        Self {
            null_skip: true,
            ..Self::default()
        }
    }
}

impl CheckSink for RecordingSink {
    fn set_fail_reason(&mut self, reason: String) {
        self.reasons.push(reason);
    }

    fn is_not_null(&mut self, _value: &Value) -> Outcome {
        self.calls.push("is_not_null");
        Outcome::Passed
    }

    fn is_not_blank(&mut self, _value: &str) -> Outcome {
        self.calls.push("is_not_blank");
        Outcome::Passed
    }

    fn matches(&mut self, _value: &str, _pattern: &Regex) -> Outcome {
        self.calls.push("matches");
        Outcome::Passed
    }

    fn between(&mut self, _value: &BigDecimal, _left: &BigDecimal, _right: &BigDecimal) -> Outcome {
        self.calls.push("between");
        Outcome::Passed
    }

    fn size_between(&mut self, _size: usize, _left: usize, _right: usize) -> Outcome {
        self.calls.push("size_between");
        Outcome::Passed
    }

    fn is_null_skip(&self) -> bool {
        self.null_skip
    }

    fn escalate(&mut self, error: CheckError) -> Result<(), CheckError> {
        self.escalated.push(error);
        Ok(())
    }
}
