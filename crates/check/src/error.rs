//! Error types
//!
//! Two families live here and they never mix:
//!
//! - [`ValidationError`] / [`ValidationErrors`] describe a field that was
//!   evaluated and *failed* its rule. They are recorded on a sink and never
//!   returned as `Err` from dispatch.
//! - [`CheckError`] describes a field that *could not be evaluated*: a
//!   malformed marker, a value of the wrong runtime shape, a null value with
//!   null-skip disabled, or an unexpected error from a handler.

use std::borrow::Cow;
use std::fmt;

use crate::value::ValueType;

// ============================================================================
// CHECK ERROR
// ============================================================================

/// Coarse classification of a [`CheckError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The host misconfigured something: a marker, a field type, or the
    /// null tolerance of the sink.
    Configuration,
    /// Anything else that went wrong while a handler was running.
    Internal,
}

/// A field could not be evaluated.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The marker attached to a field is malformed.
    #[error("invalid marker on field '{field}': {reason}")]
    InvalidMarker {
        /// Name of the field carrying the marker.
        field: String,
        /// What is wrong with it.
        reason: Cow<'static, str>,
    },

    /// A value reached a handler that cannot measure it.
    #[error("field '{field}' holds a {actual} value, which {handler} cannot evaluate")]
    UnsupportedValue {
        /// Name of the offending field.
        field: String,
        /// Handler that rejected the value.
        handler: &'static str,
        /// Runtime shape of the value.
        actual: ValueType,
    },

    /// A null value was found while the sink does not allow null-skip.
    #[error("{object} has a null value in field {field}, but null-skip is disabled")]
    NullNotSkipped {
        /// String form of the object being checked.
        object: String,
        /// Identity of the null field.
        field: String,
    },

    /// The pattern of a regex marker does not compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Pattern as written on the marker.
        pattern: String,
        /// Compiler error.
        #[source]
        source: regex::Error,
    },

    /// A numeric value has no decimal form, e.g. `NaN`.
    #[error("`{value}` in field '{field}' is not a decimal number: {source}")]
    InvalidNumber {
        /// Name of the field.
        field: String,
        /// Textual form that failed to parse.
        value: String,
        /// Parser error.
        #[source]
        source: bigdecimal::ParseBigDecimalError,
    },

    /// [`CheckConfig::install`](crate::config::CheckConfig::install) was called
    /// after the global configuration was already in use.
    #[error("the global check configuration is already installed")]
    ConfigAlreadyInstalled,

    /// Error raised by a host-provided handler.
    #[error("handler error: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Opaque wrapper produced at the null-skip boundary. The original cause
    /// is kept as the error source.
    #[error("could not evaluate field {field} of {object}")]
    Evaluation {
        /// String form of the object being checked.
        object: String,
        /// Identity of the field.
        field: String,
        /// What went wrong.
        #[source]
        source: Box<CheckError>,
    },
}

impl CheckError {
    /// Builds an [`InvalidMarker`](Self::InvalidMarker) error.
    pub fn invalid_marker(field: impl Into<String>, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidMarker {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Wraps an error raised by a host handler.
    pub fn handler<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Handler(Box::new(error))
    }

    /// Classifies the error. Wrappers report the kind of their root cause.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMarker { .. }
            | Self::UnsupportedValue { .. }
            | Self::NullNotSkipped { .. }
            | Self::InvalidPattern { .. }
            | Self::ConfigAlreadyInstalled => ErrorKind::Configuration,
            Self::InvalidNumber { .. } | Self::Handler(_) => ErrorKind::Internal,
            Self::Evaluation { source, .. } => source.kind(),
        }
    }

    /// Returns true for host misconfiguration.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Unwraps any number of [`Evaluation`](Self::Evaluation) layers.
    #[must_use]
    pub fn root_cause(&self) -> &CheckError {
        match self {
            Self::Evaluation { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A recorded validation failure.
///
/// # Examples
///
/// ```
/// use chaincheck::error::ValidationError;
///
/// let error = ValidationError::new("size_between", "[name] is too long")
///     .with_param("left", "3")
///     .with_param("right", "5");
/// assert_eq!(error.param("right"), Some("5"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Machine-readable code of the primitive that failed,
    /// e.g. `"not_null"`, `"matches"`, `"between"`.
    pub code: Cow<'static, str>,

    /// Resolved failure reason.
    pub message: Cow<'static, str>,

    /// Values the primitive compared against, as ordered key-value pairs.
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl ValidationError {
    /// Creates a failure with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;

        if !self.params.is_empty() {
            write!(f, " (")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, ")")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// ERROR COLLECTION
// ============================================================================

/// Ordered collection of recorded failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Appends a failure.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if any failure was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All failures in recording order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Iterates over the failure messages.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.message.as_ref())
    }

    /// Converts to a `Result`.
    #[must_use = "result must be used"]
    pub fn into_result<T>(self, ok_value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(ok_value)
        } else {
            Err(self)
        }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// TESTS
// ============================================================================
