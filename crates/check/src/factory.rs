//! Dispatch of fields to handlers
//!
//! For every target object and every field it declares, the factory asks
//! the effective handlers in order whether they support the field and runs
//! the first one that does. At most one handler runs per field.

use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::field::Checkable;
use crate::handler::{FieldContext, HandlerKind, NotNullHandler};
use crate::sink::CheckSink;

/// Routes the fields of target objects to handlers.
///
/// # Examples
///
/// ```
/// use chaincheck::chain::CheckChain;
/// use chaincheck::factory::CheckFactory;
/// use chaincheck::field::{Checkable, FieldDescriptor};
/// use chaincheck::marker::CheckSize;
///
/// #[derive(Debug)]
/// struct Basket {
///     apples: Vec<String>,
/// }
///
/// impl Checkable for Basket {
///     fn fields(&self) -> Vec<FieldDescriptor> {
///         vec![FieldDescriptor::of("Basket", "apples", &self.apples)
///             .with_marker(CheckSize::between(1, 3).unwrap())]
///     }
/// }
///
/// let basket = Basket { apples: vec![] };
/// let mut chain = CheckChain::new();
/// CheckFactory::new().target(&basket).create(&mut chain).unwrap();
///
/// let failures = chain.finish().unwrap_err();
/// assert!(failures.errors()[0].message.contains("apples"));
/// ```
#[derive(Debug)]
pub struct CheckFactory<'a> {
    config: &'a CheckConfig,
    targets: Vec<&'a dyn Checkable>,
    ignored: Vec<HandlerKind>,
}

impl<'a> CheckFactory<'a> {
    /// Creates a factory dispatching against the global configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CheckConfig::global())
    }

    /// Creates a factory dispatching against `config`.
    #[must_use]
    pub fn with_config(config: &'a CheckConfig) -> Self {
        Self {
            config,
            targets: Vec::new(),
            ignored: Vec::new(),
        }
    }

    /// Adds a target object.
    #[must_use = "builder methods must be chained or built"]
    pub fn target(mut self, object: &'a dyn Checkable) -> Self {
        self.targets.push(object);
        self
    }

    /// Adds several target objects, checked in iteration order.
    #[must_use = "builder methods must be chained or built"]
    pub fn targets<I>(mut self, objects: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn Checkable>,
    {
        self.targets.extend(objects);
        self
    }

    /// Makes handler kinds unavailable for this factory.
    ///
    /// The not-null handler is always added to the ignore set, even when
    /// `kinds` is empty.
    #[must_use = "builder methods must be chained or built"]
    pub fn add_ignore_handler<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = HandlerKind>,
    {
        let kinds = std::iter::once(HandlerKind::of::<NotNullHandler>()).chain(kinds);
        for kind in kinds {
            if !self.ignored.contains(&kind) {
                tracing::debug!(handler = %kind, "ignoring check handler");
                self.ignored.push(kind);
            }
        }
        self
    }

    /// Handler kinds ignored by this factory.
    #[must_use]
    pub fn ignored(&self) -> &[HandlerKind] {
        &self.ignored
    }

    /// The configuration dispatched against.
    #[must_use]
    pub fn config(&self) -> &'a CheckConfig {
        self.config
    }

    /// Dispatches every field of every target to its first supporting
    /// handler.
    ///
    /// Validation failures are recorded on `sink`. An `Err` is returned only
    /// when the sink escalates an evaluation error, which ends the dispatch.
    pub fn create(&self, sink: &mut dyn CheckSink) -> Result<(), CheckError> {
        let handlers = self.config.registry.effective(&self.ignored);

        for &object in &self.targets {
            for field in object.fields() {
                let Some(handler) = handlers.iter().find(|h| h.is_supported(&field)) else {
                    tracing::trace!(field = %field.ident(), "no handler supports field");
                    continue;
                };

                tracing::trace!(field = %field.ident(), handler = %handler.kind(), "selected handler");
                let cx = FieldContext {
                    object,
                    field: &field,
                    reasons: &self.config.reasons,
                };
                handler.handle(&cx, sink)?;
            }
        }

        Ok(())
    }
}

impl Default for CheckFactory<'_> {
    fn default() -> Self {
        Self::new()
    }
}
