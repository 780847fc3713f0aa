//! Prelude module for convenient imports.
//!
//! ```rust
//! use chaincheck::prelude::*;
//!
//! let factory = CheckFactory::new().add_ignore_handler([HandlerKind::of::<SizeHandler>()]);
//! assert_eq!(factory.ignored().len(), 2);
//! ```

// ============================================================================
// DISPATCH
// ============================================================================

pub use crate::config::CheckConfig;
pub use crate::factory::CheckFactory;
pub use crate::registry::HandlerRegistry;

// ============================================================================
// MODEL
// ============================================================================

pub use crate::field::{Checkable, FieldDescriptor, FieldIdent, FieldInfo};
pub use crate::marker::{
    CheckNotBlank, CheckNotNull, CheckNumberBetween, CheckRegex, CheckSize, Marker, Reason,
};
pub use crate::value::{IntoValue, Number, Value, ValueType};

// ============================================================================
// HANDLERS
// ============================================================================

pub use crate::handler::{
    CheckHandler, FieldContext, HandlerKind, MarkerHandler, MarkerRule, NotBlankHandler,
    NotBlankRule, NotNullHandler, NumberBetweenHandler, NumberBetweenRule, RegexHandler,
    RegexRule, SizeHandler, SizeRule,
};
pub use crate::reason::ReasonTemplates;

// ============================================================================
// SINKS & ERRORS
// ============================================================================

pub use crate::chain::{ChainSettings, CheckChain};
pub use crate::error::{CheckError, ErrorKind, ValidationError, ValidationErrors};
pub use crate::sink::{CheckSink, Outcome};

#[cfg(feature = "derive")]
pub use chaincheck_macros::Checkable;
