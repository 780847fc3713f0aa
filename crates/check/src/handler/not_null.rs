use super::{CheckHandler, FieldContext};
use crate::error::CheckError;
use crate::field::FieldDescriptor;
use crate::marker::CheckNotNull;
use crate::sink::CheckSink;

/// Fails on null values of fields marked [`CheckNotNull`].
///
/// Applies to every declared type. This is the one handler that looks at
/// null values, so it bypasses null-skip entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNullHandler;

impl CheckHandler for NotNullHandler {
    fn is_supported(&self, field: &FieldDescriptor) -> bool {
        field.has_marker::<CheckNotNull>()
    }

    fn handle(&self, cx: &FieldContext<'_>, sink: &mut dyn CheckSink) -> Result<(), CheckError> {
        sink.set_fail_reason(format!("[{}] must not be null", cx.field.name()));
        let outcome = sink.is_not_null(cx.field.value());
        tracing::trace!(field = %cx.field.ident(), ?outcome, "not-null check");
        Ok(())
    }
}
