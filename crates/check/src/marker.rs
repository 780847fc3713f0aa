//! Field markers
//!
//! A marker is declarative data attached to a field. The core never
//! interprets markers itself; handlers look up the marker type they
//! understand with [`FieldDescriptor::marker`](crate::field::FieldDescriptor::marker).

use std::any::Any;
use std::borrow::Cow;
use std::fmt::Debug;

use crate::error::CheckError;

/// Declarative validation data attached to a field.
///
/// Any `'static` type can be a marker, including host-defined ones handled
/// by host-defined handlers.
pub trait Marker: Any + Debug + Send + Sync {
    /// Failure reason override carried by the marker, if it has one.
    fn reason(&self) -> Option<&Reason> {
        None
    }
}

// ============================================================================
// REASON
// ============================================================================

/// Failure reason override.
///
/// Holds either a template (see [`ReasonTemplates`](crate::reason::ReasonTemplates))
/// or the [`USE_DEFAULT`](Self::USE_DEFAULT) sentinel, in which case the
/// handler's own template is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reason(Cow<'static, str>);

impl Reason {
    /// Sentinel meaning "use the handler's default template".
    pub const USE_DEFAULT: &'static str = "_default";

    /// Creates an override from a template.
    pub fn new(template: impl Into<Cow<'static, str>>) -> Self {
        Self(template.into())
    }

    /// The raw template, possibly the sentinel.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the template unless it is the sentinel.
    #[must_use]
    pub fn custom(&self) -> Option<&str> {
        (self.0 != Self::USE_DEFAULT).then_some(self.0.as_ref())
    }
}

impl Default for Reason {
    fn default() -> Self {
        Self(Cow::Borrowed(Self::USE_DEFAULT))
    }
}

impl From<&'static str> for Reason {
    fn from(template: &'static str) -> Self {
        Self::new(template)
    }
}

impl From<String> for Reason {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

// ============================================================================
// BUILT-IN MARKERS
// ============================================================================

/// The field must not be null. Applies to every declared type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CheckNotNull;

impl Marker for CheckNotNull {}

/// A string field must contain at least one non-whitespace character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CheckNotBlank {
    /// Failure reason override.
    pub reason: Reason,
}

impl CheckNotBlank {
    /// Creates the marker with the default reason.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the failure reason.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_reason(mut self, reason: impl Into<Reason>) -> Self {
        self.reason = reason.into();
        self
    }
}

impl Marker for CheckNotBlank {
    fn reason(&self) -> Option<&Reason> {
        Some(&self.reason)
    }
}

/// A string field must fully match a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckRegex {
    /// Pattern, matched against the whole value.
    pub pattern: Cow<'static, str>,
    /// Failure reason override.
    pub reason: Reason,
}

impl CheckRegex {
    /// Creates the marker for a pattern.
    pub fn new(pattern: impl Into<Cow<'static, str>>) -> Self {
        Self {
            pattern: pattern.into(),
            reason: Reason::default(),
        }
    }

    /// Overrides the failure reason.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_reason(mut self, reason: impl Into<Reason>) -> Self {
        self.reason = reason.into();
        self
    }
}

impl Marker for CheckRegex {
    fn reason(&self) -> Option<&Reason> {
        Some(&self.reason)
    }
}

/// The character length of a string, or the element count of a collection,
/// must lie in `[left, right]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckSize {
    /// Inclusive lower bound.
    pub left: usize,
    /// Inclusive upper bound.
    pub right: usize,
    /// Failure reason override.
    pub reason: Reason,
}

impl CheckSize {
    /// Creates the marker, rejecting `left > right`.
    pub fn between(left: usize, right: usize) -> Result<Self, CheckError> {
        let marker = Self {
            left,
            right,
            reason: Reason::default(),
        };
        marker.ensure_ordered("CheckSize")?;
        Ok(marker)
    }

    /// Overrides the failure reason.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_reason(mut self, reason: impl Into<Reason>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Fails with a configuration error when the bounds are inverted.
    pub fn ensure_ordered(&self, field: &str) -> Result<(), CheckError> {
        if self.left <= self.right {
            Ok(())
        } else {
            Err(CheckError::invalid_marker(
                field,
                format!(
                    "size lower bound {} is greater than upper bound {}",
                    self.left, self.right
                ),
            ))
        }
    }
}

impl Default for CheckSize {
    fn default() -> Self {
        Self {
            left: 0,
            right: usize::MAX,
            reason: Reason::default(),
        }
    }
}

impl Marker for CheckSize {
    fn reason(&self) -> Option<&Reason> {
        Some(&self.reason)
    }
}

/// A numeric field must lie in `[left, right]`.
///
/// The string bounds take precedence over the integer bounds unless they
/// hold the [`NONE`](Self::NONE) sentinel, which allows bounds outside the
/// `i64` range or with a fractional part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckNumberBetween {
    /// Inclusive lower bound.
    pub left: i64,
    /// Decimal lower bound override.
    pub left_string: Cow<'static, str>,
    /// Inclusive upper bound.
    pub right: i64,
    /// Decimal upper bound override.
    pub right_string: Cow<'static, str>,
    /// Failure reason override.
    pub reason: Reason,
}

impl CheckNumberBetween {
    /// Sentinel meaning "no string override".
    pub const NONE: &'static str = "none";

    /// Creates the marker with integer bounds.
    #[must_use]
    pub fn new(left: i64, right: i64) -> Self {
        Self {
            left,
            right,
            ..Self::default()
        }
    }

    /// Creates the marker with decimal bounds given as text.
    pub fn with_strings(
        left: impl Into<Cow<'static, str>>,
        right: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            left_string: left.into(),
            right_string: right.into(),
            ..Self::default()
        }
    }

    /// Overrides the failure reason.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_reason(mut self, reason: impl Into<Reason>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Text of the effective lower bound.
    #[must_use]
    pub fn left_text(&self) -> Cow<'_, str> {
        Self::effective(&self.left_string, self.left)
    }

    /// Text of the effective upper bound.
    #[must_use]
    pub fn right_text(&self) -> Cow<'_, str> {
        Self::effective(&self.right_string, self.right)
    }

    fn effective(text: &str, fallback: i64) -> Cow<'_, str> {
        if text == Self::NONE {
            Cow::Owned(fallback.to_string())
        } else {
            Cow::Borrowed(text)
        }
    }
}

impl Default for CheckNumberBetween {
    fn default() -> Self {
        Self {
            left: i64::MIN,
            left_string: Cow::Borrowed(Self::NONE),
            right: i64::MAX,
            right_string: Cow::Borrowed(Self::NONE),
            reason: Reason::default(),
        }
    }
}

impl Marker for CheckNumberBetween {
    fn reason(&self) -> Option<&Reason> {
        Some(&self.reason)
    }
}

// ============================================================================
// TESTS
// ============================================================================
