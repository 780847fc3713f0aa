use super::MarkerHandler;
use super::typed::MarkerRule;
use crate::error::CheckError;
use crate::field::{FieldDescriptor, FieldInfo};
use crate::marker::CheckSize;
use crate::reason::ReasonTemplates;
use crate::sink::CheckSink;
use crate::value::{Value, ValueType};

/// Handler for [`CheckSize`] on string and collection fields.
pub type SizeHandler = MarkerHandler<SizeRule>;

/// Fails unless the character length of a string, or the element count of a
/// collection, lies within the marker's bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeRule;

impl SizeRule {
    /// Length of a string in characters, or a collection in elements.
    pub fn measure(value: &Value) -> Option<usize> {
        match value {
            Value::String(text) => Some(text.chars().count()),
            Value::List(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl MarkerRule for SizeRule {
    type Marker = CheckSize;

    const TYPES: &'static [ValueType] = &[ValueType::String, ValueType::Collection];

    fn check_marker(&self, marker: &CheckSize, field: &FieldDescriptor) -> Result<(), CheckError> {
        marker.ensure_ordered(field.name())
    }

    fn handle(
        &self,
        info: &FieldInfo<'_, CheckSize>,
        reasons: &ReasonTemplates,
        sink: &mut dyn CheckSink,
    ) -> Result<(), CheckError> {
        let marker = info.marker();
        let size = Self::measure(info.value()).ok_or_else(|| CheckError::UnsupportedValue {
            field: info.field_name().to_owned(),
            handler: "SizeHandler",
            actual: info.value().value_type(),
        })?;

        let template = format!(
            "[{{fieldName}}] length/size must be between {} and {}, actual {size}",
            marker.left, marker.right
        );
        sink.set_fail_reason(reasons.resolve_reason(Some(&marker.reason), &template, &info.erased()));
        let outcome = sink.size_between(size, marker.left, marker.right);
        tracing::trace!(field = %info.field(), size, ?outcome, "size check");
        Ok(())
    }
}
