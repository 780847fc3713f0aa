//! # chaincheck
//!
//! Marker-driven field validation with ordered handler dispatch.
//!
//! ## Quick Start
//!
//! ```rust
//! use chaincheck::prelude::*;
//!
//! #[derive(Debug, Checkable)]
//! struct Apple {
//!     #[check(not_null)]
//!     weight: Option<u32>,
//!     #[check(regex = r"apple \d+")]
//!     name: String,
//!     #[check(number_between(left = 1, right = 100))]
//!     price: i32,
//! }
//!
//! let apple = Apple { weight: Some(120), name: "pear 1".into(), price: 3 };
//! let mut chain = CheckChain::new();
//! CheckFactory::new().target(&apple).create(&mut chain).unwrap();
//!
//! let failures = chain.finish().unwrap_err();
//! assert_eq!(failures.len(), 1);
//! assert!(failures.errors()[0].message.contains("[name]"));
//! ```
//!
//! ## How dispatch works
//!
//! Each field is offered to the handlers of the
//! [`HandlerRegistry`](registry::HandlerRegistry) in order; the first handler
//! whose [`is_supported`](handler::CheckHandler::is_supported) returns true
//! is the only one that runs. A field carrying markers of two handler kinds
//! is therefore only checked by the earlier one.
//!
//! Handlers report to a [`CheckSink`](sink::CheckSink). Failed rules are
//! recorded there as [`ValidationError`](error::ValidationError)s; fields
//! that cannot be evaluated at all produce a [`CheckError`](error::CheckError)
//! that the sink may escalate.
//!
//! ## Built-in markers
//!
//! - [`CheckNotNull`](marker::CheckNotNull): any declared type
//! - [`CheckRegex`](marker::CheckRegex), [`CheckNotBlank`](marker::CheckNotBlank): strings
//! - [`CheckSize`](marker::CheckSize): strings and collections
//! - [`CheckNumberBetween`](marker::CheckNumberBetween): numbers

#![allow(clippy::result_large_err)]

extern crate self as chaincheck;

pub mod chain;
pub mod config;
pub mod error;
pub mod factory;
pub mod field;
pub mod handler;
pub mod marker;
pub mod prelude;
pub mod reason;
pub mod registry;
pub mod sink;
pub mod value;

/// Derives [`Checkable`](field::Checkable) from `#[check(...)]` field attributes.
#[cfg(feature = "derive")]
pub use chaincheck_macros::Checkable;
