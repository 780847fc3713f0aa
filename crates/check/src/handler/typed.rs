//! Handlers keyed on one marker type and a set of declared types

use std::borrow::Cow;
use std::fmt;

use super::{CheckHandler, FieldContext, null_skip};
use crate::error::CheckError;
use crate::field::{FieldDescriptor, FieldInfo};
use crate::marker::Marker;
use crate::reason::ReasonTemplates;
use crate::sink::CheckSink;
use crate::value::ValueType;

/// The rule part of a [`MarkerHandler`].
///
/// A rule only sees fields that carry its marker, have a supported declared
/// type and hold a present value.
pub trait MarkerRule: Send + Sync + 'static {
    /// Marker selecting this rule.
    type Marker: Marker;

    /// Declared types the rule accepts. Empty accepts every type.
    const TYPES: &'static [ValueType];

    /// Validates the marker itself, before the value is looked at.
    ///
    /// Errors here are raised whether or not the value is null.
    fn check_marker(
        &self,
        marker: &Self::Marker,
        field: &FieldDescriptor,
    ) -> Result<(), CheckError> {
        let _ = (marker, field);
        Ok(())
    }

    /// Evaluates the rule on a present value.
    fn handle(
        &self,
        info: &FieldInfo<'_, Self::Marker>,
        reasons: &ReasonTemplates,
        sink: &mut dyn CheckSink,
    ) -> Result<(), CheckError>;
}

/// A [`CheckHandler`] that applies a [`MarkerRule`] to fields carrying its
/// marker.
///
/// Null values go through [`null_skip::when_not_null`] and never reach the
/// rule.
pub struct MarkerHandler<R> {
    rule: R,
    types: Cow<'static, [ValueType]>,
}

impl<R: MarkerRule> MarkerHandler<R> {
    /// Creates the handler with the rule's own type set.
    pub fn new(rule: R) -> Self {
        Self {
            rule,
            types: Cow::Borrowed(R::TYPES),
        }
    }

    /// Creates the handler with a custom type set. Empty accepts every type.
    pub fn with_types(rule: R, types: impl Into<Vec<ValueType>>) -> Self {
        Self {
            rule,
            types: Cow::Owned(types.into()),
        }
    }

    /// The rule.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Declared types this handler accepts.
    pub fn types(&self) -> &[ValueType] {
        &self.types
    }

    /// Whether a field declared as `ty` is accepted.
    #[must_use]
    pub fn accepts(&self, ty: ValueType) -> bool {
        self.types.is_empty() || self.types.iter().any(|&t| ty.is_assignable_to(t))
    }
}

impl<R: MarkerRule + Default> Default for MarkerHandler<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R> fmt::Debug for MarkerHandler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerHandler")
            .field("rule", &std::any::type_name::<R>())
            .field("types", &self.types)
            .finish()
    }
}

impl<R: MarkerRule> CheckHandler for MarkerHandler<R> {
    fn is_supported(&self, field: &FieldDescriptor) -> bool {
        field.has_marker::<R::Marker>() && self.accepts(field.ty())
    }

    fn handle(&self, cx: &FieldContext<'_>, sink: &mut dyn CheckSink) -> Result<(), CheckError> {
        let prepared = cx
            .field
            .marker::<R::Marker>()
            .ok_or_else(|| {
                CheckError::invalid_marker(
                    cx.field.name(),
                    format!("missing {} marker", std::any::type_name::<R::Marker>()),
                )
            })
            .and_then(|marker| self.rule.check_marker(marker, cx.field).map(|()| marker));

        let marker = match prepared {
            Ok(marker) => marker,
            Err(cause) => return null_skip::escalate(cx, sink, cause),
        };

        null_skip::when_not_null(cx, sink, |value, sink| {
            let info = FieldInfo::new(cx.object, cx.field.ident(), marker, value);
            self.rule.handle(&info, cx.reasons, sink)
        })
    }
}
