//! Field descriptors and the per-invocation field snapshot
//!
//! A [`Checkable`] type describes its checked fields as a list of
//! [`FieldDescriptor`]s: identity, current value and attached markers. This
//! is the declarative replacement for scanning declared fields at runtime;
//! it is written by hand or generated with `#[derive(Checkable)]`.

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::marker::Marker;
use crate::value::{IntoValue, Value, ValueType, short_type_name};

// ============================================================================
// CHECKABLE
// ============================================================================

/// A type whose fields carry validation markers.
///
/// The `Debug` form is what the `{object}` reason placeholder renders.
///
/// # Examples
///
/// ```
/// use chaincheck::field::{Checkable, FieldDescriptor};
/// use chaincheck::marker::CheckRegex;
///
/// #[derive(Debug)]
/// struct Apple {
///     name: String,
/// }
///
/// impl Checkable for Apple {
///     fn fields(&self) -> Vec<FieldDescriptor> {
///         vec![
///             FieldDescriptor::of("Apple", "name", &self.name)
///                 .with_marker(CheckRegex::new(r"apple \d+")),
///         ]
///     }
/// }
/// ```
pub trait Checkable: fmt::Debug {
    /// Checked fields in declaration order.
    fn fields(&self) -> Vec<FieldDescriptor>;
}

// ============================================================================
// FIELD IDENT
// ============================================================================

/// Identity of one field of one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldIdent {
    owner: Cow<'static, str>,
    name: Cow<'static, str>,
    ty: ValueType,
    type_name: Cow<'static, str>,
}

impl FieldIdent {
    /// Creates an identity from its parts.
    pub fn new(
        owner: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
        ty: ValueType,
        type_name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            ty,
            type_name: type_name.into(),
        }
    }

    /// Name of the type declaring the field.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type.
    #[must_use]
    pub fn ty(&self) -> ValueType {
        self.ty
    }

    /// Declared Rust type, without module paths.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Display for FieldIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner, self.name, self.type_name)
    }
}

// ============================================================================
// FIELD DESCRIPTOR
// ============================================================================

/// One field as seen by the dispatcher.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    ident: FieldIdent,
    value: Value,
    markers: Vec<Arc<dyn Marker>>,
}

impl FieldDescriptor {
    /// Creates a descriptor with no markers.
    pub fn new(ident: FieldIdent, value: Value) -> Self {
        Self {
            ident,
            value,
            markers: Vec::new(),
        }
    }

    /// Captures a field, deriving its declared type from `T`.
    pub fn of<T: IntoValue + ?Sized>(
        owner: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
        value: &T,
    ) -> Self {
        let ident = FieldIdent::new(
            owner,
            name,
            T::VALUE_TYPE,
            short_type_name(type_name::<T>()),
        );
        Self::new(ident, value.to_value())
    }

    /// Attaches a marker.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_marker(mut self, marker: impl Marker) -> Self {
        self.markers.push(Arc::new(marker));
        self
    }

    /// Field identity.
    #[must_use]
    pub fn ident(&self) -> &FieldIdent {
        &self.ident
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.ident.name()
    }

    /// Declared value type.
    #[must_use]
    pub fn ty(&self) -> ValueType {
        self.ident.ty()
    }

    /// Value at inspection time.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Attached markers, in attachment order.
    pub fn markers(&self) -> impl Iterator<Item = &dyn Marker> {
        self.markers.iter().map(|m| &**m)
    }

    /// Returns the first attached marker of type `M`.
    #[must_use]
    pub fn marker<M: Marker>(&self) -> Option<&M> {
        self.markers
            .iter()
            .find_map(|m| (&**m as &dyn Any).downcast_ref::<M>())
    }

    /// Returns true if a marker of type `M` is attached.
    #[must_use]
    pub fn has_marker<M: Marker>(&self) -> bool {
        self.marker::<M>().is_some()
    }
}

// ============================================================================
// FIELD INFO
// ============================================================================

/// Read-only snapshot of one field, built for a single handler invocation.
///
/// Only built once the marker has been found and the value is known to be
/// present; it never outlives the invocation that created it.
pub struct FieldInfo<'a, M: ?Sized = dyn Marker> {
    object: &'a dyn Checkable,
    field: &'a FieldIdent,
    marker: &'a M,
    value: &'a Value,
}

impl<'a, M: ?Sized> FieldInfo<'a, M> {
    /// Creates the snapshot. `value` must not be [`Value::Null`].
    pub fn new(
        object: &'a dyn Checkable,
        field: &'a FieldIdent,
        marker: &'a M,
        value: &'a Value,
    ) -> Self {
        debug_assert!(!value.is_null(), "FieldInfo built for a null value");
        Self {
            object,
            field,
            marker,
            value,
        }
    }

    /// The object being checked.
    #[must_use]
    pub fn object(&self) -> &'a dyn Checkable {
        self.object
    }

    /// Field identity.
    #[must_use]
    pub fn field(&self) -> &'a FieldIdent {
        self.field
    }

    /// The marker that selected the handler.
    #[must_use]
    pub fn marker(&self) -> &'a M {
        self.marker
    }

    /// The present value.
    #[must_use]
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Field name.
    #[must_use]
    pub fn field_name(&self) -> &'a str {
        self.field.name()
    }
}

impl<'a, M: Marker> FieldInfo<'a, M> {
    /// Forgets the concrete marker type, for reason resolution.
    #[must_use]
    pub fn erased(&self) -> FieldInfo<'a, dyn Marker> {
        FieldInfo {
            object: self.object,
            field: self.field,
            marker: self.marker,
            value: self.value,
        }
    }
}

impl<M: ?Sized + fmt::Debug> fmt::Debug for FieldInfo<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("object", &self.object)
            .field("field", &self.field)
            .field("marker", &self.marker)
            .field("value", &self.value)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
