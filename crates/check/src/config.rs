//! Process-wide dispatch configuration
//!
//! A [`CheckConfig`] bundles the handler registry and the reason
//! placeholders. Factories either borrow an explicit configuration or fall
//! back to the global one, which is installed at most once and then frozen.

use std::sync::OnceLock;

use crate::error::CheckError;
use crate::reason::ReasonTemplates;
use crate::registry::HandlerRegistry;

static GLOBAL: OnceLock<CheckConfig> = OnceLock::new();

/// Handlers and reason placeholders used by a [`CheckFactory`](crate::factory::CheckFactory).
///
/// # Examples
///
/// ```
/// use chaincheck::config::CheckConfig;
///
/// let mut config = CheckConfig::default();
/// config.reasons.insert("{owner}", |info| info.field().owner().to_owned());
/// assert_eq!(config.registry.len(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    /// Handlers in dispatch order.
    pub registry: HandlerRegistry,
    /// Placeholder resolvers for failure reasons.
    pub reasons: ReasonTemplates,
}

impl CheckConfig {
    /// Creates a configuration from its parts.
    #[must_use]
    pub fn new(registry: HandlerRegistry, reasons: ReasonTemplates) -> Self {
        Self { registry, reasons }
    }

    /// Replaces the handler registry.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the reason placeholders.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_reasons(mut self, reasons: ReasonTemplates) -> Self {
        self.reasons = reasons;
        self
    }

    /// Makes this the global configuration.
    ///
    /// Fails once the global configuration has been installed or read, since
    /// factories may already be dispatching against it.
    pub fn install(self) -> Result<(), CheckError> {
        GLOBAL
            .set(self)
            .map_err(|_| CheckError::ConfigAlreadyInstalled)?;
        tracing::info!("installed global check configuration");
        Ok(())
    }

    /// The global configuration, initialized with defaults on first use.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            tracing::debug!("using default global check configuration");
            Self::default()
        })
    }
}
