//! Null tolerance and error escalation shared by type-specific handlers
//!
//! Type-specific rules only ever see present values. A null value is either
//! skipped (when the sink allows it) or reported as a configuration error.
//! Every error raised on this path is wrapped into
//! [`CheckError::Evaluation`] and handed to [`CheckSink::escalate`].

use super::FieldContext;
use crate::error::CheckError;
use crate::sink::CheckSink;
use crate::value::Value;

/// Runs `rule` on the field's value unless it is null.
///
/// Null values do nothing when [`CheckSink::is_null_skip`] is set and are an
/// error otherwise. Errors from `rule` are escalated through [`escalate`].
pub fn when_not_null<'a, F>(
    cx: &FieldContext<'a>,
    sink: &mut dyn CheckSink,
    rule: F,
) -> Result<(), CheckError>
where
    F: FnOnce(&'a Value, &mut dyn CheckSink) -> Result<(), CheckError>,
{
    let result = match cx.field.value() {
        Value::Null if sink.is_null_skip() => {
            tracing::trace!(field = %cx.field.ident(), "null value skipped");
            Ok(())
        }
        Value::Null => Err(CheckError::NullNotSkipped {
            object: format!("{:?}", cx.object),
            field: cx.field.ident().to_string(),
        }),
        value => rule(value, &mut *sink),
    };

    match result {
        Ok(()) => Ok(()),
        Err(cause) => escalate(cx, sink, cause),
    }
}

/// Wraps `cause` with the object and field identity and lets the sink decide
/// whether it aborts the dispatch.
pub fn escalate(
    cx: &FieldContext<'_>,
    sink: &mut dyn CheckSink,
    cause: CheckError,
) -> Result<(), CheckError> {
    tracing::warn!(
        field = %cx.field.ident(),
        kind = ?cause.kind(),
        error = %cause,
        "field could not be evaluated"
    );

    sink.escalate(CheckError::Evaluation {
        object: format!("{:?}", cx.object),
        field: cx.field.ident().to_string(),
        source: Box::new(cause),
    })
}
