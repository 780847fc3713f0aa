//! Ordered registry of check handlers.

use std::sync::Arc;

use crate::handler::{
    CheckHandler, HandlerKind, NotBlankHandler, NotNullHandler, NumberBetweenHandler,
    RegexHandler, SizeHandler,
};

/// Ordered list of handlers.
///
/// Order is significant: for every field, the first handler that supports it
/// is the only one that runs. The default registry holds the built-in
/// handlers in this order: not-null, regex, size, not-blank, number-between.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chaincheck::handler::{HandlerKind, NotNullHandler, SizeHandler};
/// use chaincheck::registry::HandlerRegistry;
///
/// let mut registry = HandlerRegistry::default();
/// registry.remove(HandlerKind::of::<SizeHandler>());
/// registry.insert(0, Arc::new(SizeHandler::default()));
/// assert_eq!(registry.position(HandlerKind::of::<SizeHandler>()), Some(0));
/// assert_eq!(registry.position(HandlerKind::of::<NotNullHandler>()), Some(1));
/// ```
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn CheckHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler after all others.
    pub fn push(&mut self, handler: Arc<dyn CheckHandler>) -> &mut Self {
        tracing::debug!(handler = %handler.kind(), position = self.handlers.len(), "registered check handler");
        self.handlers.push(handler);
        self
    }

    /// Inserts a handler at `index`, clamped to the end of the list.
    pub fn insert(&mut self, index: usize, handler: Arc<dyn CheckHandler>) -> &mut Self {
        let index = index.min(self.handlers.len());
        tracing::debug!(handler = %handler.kind(), position = index, "registered check handler");
        self.handlers.insert(index, handler);
        self
    }

    /// Removes the first handler of the given kind.
    pub fn remove(&mut self, kind: HandlerKind) -> Option<Arc<dyn CheckHandler>> {
        let index = self.position(kind)?;
        tracing::debug!(handler = %kind, "removed check handler");
        Some(self.handlers.remove(index))
    }

    /// Replaces the first handler of the given kind, keeping its position.
    ///
    /// Returns the replaced handler, or `None` (and registers nothing) when
    /// no handler of that kind exists.
    pub fn replace(
        &mut self,
        kind: HandlerKind,
        handler: Arc<dyn CheckHandler>,
    ) -> Option<Arc<dyn CheckHandler>> {
        let index = self.position(kind)?;
        tracing::debug!(old = %kind, new = %handler.kind(), position = index, "replaced check handler");
        Some(std::mem::replace(&mut self.handlers[index], handler))
    }

    /// Position of the first handler of the given kind.
    #[must_use]
    pub fn position(&self, kind: HandlerKind) -> Option<usize> {
        self.handlers.iter().position(|h| h.kind() == kind)
    }

    /// Returns true if a handler of the given kind is registered.
    #[must_use]
    pub fn contains(&self, kind: HandlerKind) -> bool {
        self.position(kind).is_some()
    }

    /// Handlers in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CheckHandler>> {
        self.handlers.iter()
    }

    /// Kinds in dispatch order.
    #[must_use]
    pub fn kinds(&self) -> Vec<HandlerKind> {
        self.handlers.iter().map(|h| h.kind()).collect()
    }

    /// Number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handlers in dispatch order, without those of an ignored kind.
    #[must_use]
    pub fn effective(&self, ignored: &[HandlerKind]) -> Vec<Arc<dyn CheckHandler>> {
        self.handlers
            .iter()
            .filter(|h| !ignored.contains(&h.kind()))
            .cloned()
            .collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry
            .push(Arc::new(NotNullHandler))
            .push(Arc::new(RegexHandler::default()))
            .push(Arc::new(SizeHandler::default()))
            .push(Arc::new(NotBlankHandler::default()))
            .push(Arc::new(NumberBetweenHandler::default()));
        registry
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kind<H: CheckHandler>() -> HandlerKind {
        HandlerKind::of::<H>()
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            HandlerRegistry::default().kinds(),
            vec![
                kind::<NotNullHandler>(),
                kind::<RegexHandler>(),
                kind::<SizeHandler>(),
                kind::<NotBlankHandler>(),
                kind::<NumberBetweenHandler>(),
            ]
        );
    }

    #[test]
    fn test_new_is_empty() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_effective_excludes_ignored() {
        let registry = HandlerRegistry::default();
        let effective = registry.effective(&[kind::<NotNullHandler>(), kind::<SizeHandler>()]);
        let kinds: Vec<_> = effective.iter().map(|h| h.kind()).collect();
        assert_eq!(
            kinds,
            vec![kind::<RegexHandler>(), kind::<NotBlankHandler>(), kind::<NumberBetweenHandler>()]
        );
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut registry = HandlerRegistry::default();
        let old = registry.replace(kind::<SizeHandler>(), Arc::new(RegexHandler::default()));
        assert!(old.is_some());
        assert_eq!(registry.kinds()[2], kind::<RegexHandler>());
        assert!(!registry.contains(kind::<SizeHandler>()));

        assert!(registry.replace(kind::<SizeHandler>(), Arc::new(NotNullHandler)).is_none());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut registry = HandlerRegistry::new();
        registry.insert(10, Arc::new(NotNullHandler));
        registry.insert(0, Arc::new(SizeHandler::default()));
        assert_eq!(registry.kinds(), vec![kind::<SizeHandler>(), kind::<NotNullHandler>()]);
        assert!(registry.remove(kind::<SizeHandler>()).is_some());
        assert!(registry.remove(kind::<SizeHandler>()).is_none());
    }
}
