//! Check handlers
//!
//! A handler recognizes one marker (optionally restricted to some declared
//! types) and evaluates its rule against a field. Handlers are stateless and
//! shared: one instance per rule kind lives in the
//! [`HandlerRegistry`](crate::registry::HandlerRegistry).
//!
//! Built-in handlers:
//!
//! | Handler | Marker | Declared types |
//! |---|---|---|
//! | [`NotNullHandler`] | [`CheckNotNull`](crate::marker::CheckNotNull) | any |
//! | [`RegexHandler`] | [`CheckRegex`](crate::marker::CheckRegex) | string |
//! | [`SizeHandler`] | [`CheckSize`](crate::marker::CheckSize) | string, collection |
//! | [`NotBlankHandler`] | [`CheckNotBlank`](crate::marker::CheckNotBlank) | string |
//! | [`NumberBetweenHandler`] | [`CheckNumberBetween`](crate::marker::CheckNumberBetween) | number |

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::CheckError;
use crate::field::{Checkable, FieldDescriptor};
use crate::reason::ReasonTemplates;
use crate::sink::CheckSink;
use crate::value::short_type_name;

mod not_blank;
mod not_null;
pub mod null_skip;
mod number;
mod regex;
mod size;
mod typed;

pub use not_blank::{NotBlankHandler, NotBlankRule};
pub use not_null::NotNullHandler;
pub use number::{NumberBetweenHandler, NumberBetweenRule};
pub use regex::{RegexHandler, RegexRule};
pub use size::{SizeHandler, SizeRule};
pub use typed::{MarkerHandler, MarkerRule};

// ============================================================================
// HANDLER KIND
// ============================================================================

/// Identifies a handler implementation, e.g. for ignore lists.
#[derive(Clone, Copy)]
pub struct HandlerKind {
    id: TypeId,
    name: &'static str,
}

impl HandlerKind {
    /// Kind of the handler type `H`.
    #[must_use]
    pub fn of<H: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<H>(),
            name: type_name::<H>(),
        }
    }

    /// Full type name of the handler.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for HandlerKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HandlerKind {}

impl Hash for HandlerKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerKind({self})")
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_type_name(self.name))
    }
}

// ============================================================================
// FIELD CONTEXT
// ============================================================================

/// Everything a handler can see while handling one field.
#[derive(Clone, Copy)]
pub struct FieldContext<'a> {
    /// The object owning the field.
    pub object: &'a dyn Checkable,
    /// The field being handled.
    pub field: &'a FieldDescriptor,
    /// Placeholder resolvers for failure reasons.
    pub reasons: &'a ReasonTemplates,
}

impl fmt::Debug for FieldContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldContext")
            .field("object", &self.object)
            .field("field", self.field.ident())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CHECK HANDLER
// ============================================================================

/// Recognizes and evaluates one kind of rule.
///
/// # Examples
///
/// A host handler for a host marker:
///
/// ```
/// use chaincheck::error::CheckError;
/// use chaincheck::handler::{CheckHandler, FieldContext};
/// use chaincheck::field::FieldDescriptor;
/// use chaincheck::marker::Marker;
/// use chaincheck::sink::CheckSink;
///
/// #[derive(Debug)]
/// struct CheckPositive;
/// impl Marker for CheckPositive {}
///
/// struct PositiveHandler;
///
/// impl CheckHandler for PositiveHandler {
///     fn is_supported(&self, field: &FieldDescriptor) -> bool {
///         field.has_marker::<CheckPositive>()
///     }
///
///     fn handle(&self, cx: &FieldContext<'_>, sink: &mut dyn CheckSink) -> Result<(), CheckError> {
///         let text = cx.field.value().to_string();
///         sink.set_fail_reason(format!("[{}] must be positive", cx.field.name()));
///         sink.is_not_blank(text.trim_start_matches('-').trim_start_matches('0'));
///         Ok(())
///     }
/// }
/// ```
pub trait CheckHandler: Any + Send + Sync {
    /// Whether this handler applies to the field.
    fn is_supported(&self, field: &FieldDescriptor) -> bool;

    /// Evaluates the rule, reporting to `sink`.
    ///
    /// `Err` means the field could not be evaluated; a failed rule is
    /// reported through the sink and still returns `Ok`.
    fn handle(&self, cx: &FieldContext<'_>, sink: &mut dyn CheckSink) -> Result<(), CheckError>;

    /// Kind of this handler.
    fn kind(&self) -> HandlerKind {
        HandlerKind::of::<Self>()
    }
}
