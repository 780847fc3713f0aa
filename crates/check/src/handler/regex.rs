use dashmap::DashMap;
use regex::Regex;

use super::MarkerHandler;
use super::typed::MarkerRule;
use crate::error::CheckError;
use crate::field::FieldInfo;
use crate::marker::CheckRegex;
use crate::reason::ReasonTemplates;
use crate::sink::CheckSink;
use crate::value::ValueType;

/// Handler for [`CheckRegex`] on string fields.
pub type RegexHandler = MarkerHandler<RegexRule>;

/// Fails unless the pattern matches the whole string.
///
/// Compiled patterns are cached per rule, keyed by the marker's pattern.
#[derive(Debug, Default)]
pub struct RegexRule {
    compiled: DashMap<String, Regex>,
}

impl RegexRule {
    /// Compiles `pattern` anchored at both ends.
    pub fn compile(pattern: &str) -> Result<Regex, CheckError> {
        Regex::new(&format!("^(?:{pattern})$")).map_err(|source| CheckError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })
    }

    /// Returns the anchored regex for `pattern`, compiling it on first use.
    pub fn regex(&self, pattern: &str) -> Result<Regex, CheckError> {
        if let Some(regex) = self.compiled.get(pattern) {
            return Ok(regex.clone());
        }

        let regex = Self::compile(pattern)?;
        tracing::trace!(pattern, "compiled check pattern");
        self.compiled.insert(pattern.to_owned(), regex.clone());
        Ok(regex)
    }

    /// Number of cached patterns.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.compiled.len()
    }
}

impl MarkerRule for RegexRule {
    type Marker = CheckRegex;

    const TYPES: &'static [ValueType] = &[ValueType::String];

    fn handle(
        &self,
        info: &FieldInfo<'_, CheckRegex>,
        reasons: &ReasonTemplates,
        sink: &mut dyn CheckSink,
    ) -> Result<(), CheckError> {
        let marker = info.marker();
        let regex = self.regex(&marker.pattern)?;
        let text = info.value().as_str().ok_or_else(|| CheckError::UnsupportedValue {
            field: info.field_name().to_owned(),
            handler: "RegexHandler",
            actual: info.value().value_type(),
        })?;

        let info = info.erased();
        // The pattern is inserted after resolution so its braces stay literal.
        let reason = match marker.reason.custom() {
            Some(template) => reasons.resolve(template, &info),
            None => format!(
                "{}`{}`{}",
                reasons.resolve("[{fieldName}] must match ", &info),
                marker.pattern,
                reasons.resolve(", was >{fieldValue}<", &info),
            ),
        };
        sink.set_fail_reason(reason);
        let outcome = sink.matches(text, &regex);
        tracing::trace!(field = %info.field(), pattern = %marker.pattern, ?outcome, "regex check");
        Ok(())
    }
}
