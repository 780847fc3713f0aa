//! Failure reason templates
//!
//! A reason template is a message with placeholders such as `{fieldName}`.
//! [`ReasonTemplates`] holds an ordered placeholder → resolver mapping and
//! substitutes each placeholder in turn, replacing every occurrence.
//!
//! Substitution is one pass per mapping entry, in mapping order. Text
//! produced by an earlier resolver is visible to later entries, but a single
//! entry never rescans its own output.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::field::FieldInfo;
use crate::marker::Reason;

/// Renders one part of a [`FieldInfo`] as text.
pub type Resolver = Arc<dyn Fn(&FieldInfo<'_>) -> String + Send + Sync>;

/// `{field}`: the field identity.
pub const FIELD: &str = "{field}";
/// `{object}`: the `Debug` form of the checked object.
pub const OBJECT: &str = "{object}";
/// `{fieldName}`: the field name.
pub const FIELD_NAME: &str = "{fieldName}";
/// `{fieldValue}`: the current value.
pub const FIELD_VALUE: &str = "{fieldValue}";

/// Ordered placeholder → resolver mapping.
///
/// # Examples
///
/// ```
/// use chaincheck::reason::ReasonTemplates;
///
/// let mut templates = ReasonTemplates::default();
/// templates.insert("{owner}", |info| info.field().owner().to_owned());
/// assert_eq!(templates.len(), 5);
/// ```
#[derive(Clone)]
pub struct ReasonTemplates {
    resolvers: IndexMap<Cow<'static, str>, Resolver>,
}

impl ReasonTemplates {
    /// Creates an empty mapping, with no placeholders at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            resolvers: IndexMap::new(),
        }
    }

    /// Adds a placeholder. Re-inserting an existing token replaces its
    /// resolver without moving it.
    pub fn insert<F>(&mut self, token: impl Into<Cow<'static, str>>, resolver: F) -> &mut Self
    where
        F: Fn(&FieldInfo<'_>) -> String + Send + Sync + 'static,
    {
        let token = token.into();
        tracing::debug!(token = %token, "registered reason placeholder");
        self.resolvers.insert(token, Arc::new(resolver));
        self
    }

    /// Removes a placeholder, keeping the order of the others.
    pub fn remove(&mut self, token: &str) -> bool {
        self.resolvers.shift_remove(token).is_some()
    }

    /// Returns true if the token is registered.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.resolvers.contains_key(token)
    }

    /// Number of placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns true if no placeholder is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Registered tokens in substitution order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(AsRef::as_ref)
    }

    /// Replaces every placeholder in `template`.
    #[must_use]
    pub fn resolve(&self, template: &str, info: &FieldInfo<'_>) -> String {
        let mut out = template.to_owned();
        for (token, resolver) in &self.resolvers {
            if out.contains(token.as_ref()) {
                out = out.replace(token.as_ref(), &resolver(info));
            }
        }
        out
    }

    /// Resolves the marker's override when it has one, otherwise the
    /// handler's default template.
    #[must_use]
    pub fn resolve_reason(
        &self,
        reason: Option<&Reason>,
        default_template: &str,
        info: &FieldInfo<'_>,
    ) -> String {
        let template = reason.and_then(Reason::custom).unwrap_or(default_template);
        self.resolve(template, info)
    }
}

impl Default for ReasonTemplates {
    fn default() -> Self {
        let mut templates = Self::empty();
        templates
            .insert(FIELD, |info| info.field().to_string())
            .insert(OBJECT, |info| format!("{:?}", info.object()))
            .insert(FIELD_NAME, |info| info.field_name().to_owned())
            .insert(FIELD_VALUE, |info| info.value().to_string());
        templates
    }
}

impl fmt::Debug for ReasonTemplates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReasonTemplates")
            .field("tokens", &self.tokens().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
