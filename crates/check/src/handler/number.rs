use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::MarkerHandler;
use super::typed::MarkerRule;
use crate::error::CheckError;
use crate::field::FieldInfo;
use crate::marker::CheckNumberBetween;
use crate::reason::ReasonTemplates;
use crate::sink::CheckSink;
use crate::value::ValueType;

/// Handler for [`CheckNumberBetween`] on numeric fields.
pub type NumberBetweenHandler = MarkerHandler<NumberBetweenRule>;

/// Fails unless the value lies in the inclusive decimal range of the marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberBetweenRule;

impl NumberBetweenRule {
    fn bound(field: &str, text: &str) -> Result<BigDecimal, CheckError> {
        BigDecimal::from_str(text).map_err(|err| {
            CheckError::invalid_marker(field, format!("bound `{text}` is not a decimal: {err}"))
        })
    }
}

impl MarkerRule for NumberBetweenRule {
    type Marker = CheckNumberBetween;

    const TYPES: &'static [ValueType] = &[ValueType::Number];

    fn handle(
        &self,
        info: &FieldInfo<'_, CheckNumberBetween>,
        reasons: &ReasonTemplates,
        sink: &mut dyn CheckSink,
    ) -> Result<(), CheckError> {
        let marker = info.marker();
        let left = Self::bound(info.field_name(), &marker.left_text())?;
        let right = Self::bound(info.field_name(), &marker.right_text())?;

        let number = info.value().as_number().ok_or_else(|| CheckError::UnsupportedValue {
            field: info.field_name().to_owned(),
            handler: "NumberBetweenHandler",
            actual: info.value().value_type(),
        })?;
        let value = number.to_decimal().map_err(|source| CheckError::InvalidNumber {
            field: info.field_name().to_owned(),
            value: number.to_string(),
            source,
        })?;

        let template =
            format!("[{{fieldName}}] must be between {left} and {right}, was >{{fieldValue}}<");
        sink.set_fail_reason(reasons.resolve_reason(Some(&marker.reason), &template, &info.erased()));
        let outcome = sink.between(&value, &left, &right);
        tracing::trace!(field = %info.field(), %value, ?outcome, "number-between check");
        Ok(())
    }
}
