use super::MarkerHandler;
use super::typed::MarkerRule;
use crate::error::CheckError;
use crate::field::FieldInfo;
use crate::marker::CheckNotBlank;
use crate::reason::ReasonTemplates;
use crate::sink::CheckSink;
use crate::value::ValueType;

/// Handler for [`CheckNotBlank`] on string fields.
pub type NotBlankHandler = MarkerHandler<NotBlankRule>;

/// Fails on strings without a non-whitespace character.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotBlankRule;

impl MarkerRule for NotBlankRule {
    type Marker = CheckNotBlank;

    const TYPES: &'static [ValueType] = &[ValueType::String];

    fn handle(
        &self,
        info: &FieldInfo<'_, CheckNotBlank>,
        reasons: &ReasonTemplates,
        sink: &mut dyn CheckSink,
    ) -> Result<(), CheckError> {
        let text = info.value().as_str().ok_or_else(|| CheckError::UnsupportedValue {
            field: info.field_name().to_owned(),
            handler: "NotBlankHandler",
            actual: info.value().value_type(),
        })?;

        sink.set_fail_reason(reasons.resolve_reason(
            Some(&info.marker().reason),
            "[{fieldName}] must not be blank",
            &info.erased(),
        ));
        let outcome = sink.is_not_blank(text);
        tracing::trace!(field = %info.field(), ?outcome, "not-blank check");
        Ok(())
    }
}
