//! Procedural macros for chaincheck
//!
//! - **`#[derive(Checkable)]`** - field → marker mapping from `#[check(...)]`
//!   attributes
//!
//! Use the macro through the `chaincheck` re-export; generated code refers to
//! `::chaincheck` paths.

use proc_macro::TokenStream;

mod checkable;

// ============================================================================
// CHECKABLE DERIVE
// ============================================================================

/// Derives `chaincheck::field::Checkable` for a struct with named fields.
///
/// Every field carrying at least one `#[check(...)]` attribute is reported,
/// in declaration order, with its markers in attribute order. Fields without
/// one are not reported at all.
///
/// # Attributes
///
/// - `#[check(not_null)]`
/// - `#[check(not_blank)]` / `#[check(not_blank(reason = "..."))]`
/// - `#[check(regex = "pattern")]` / `#[check(regex(pattern = "...", reason = "..."))]`
/// - `#[check(size(left = N, right = M, reason = "..."))]`; `left > right`
///   is rejected at compile time
/// - `#[check(number_between(left = N, right = M, left_string = "...",
///   right_string = "...", reason = "..."))]`
///
/// Several markers may be listed in one attribute or spread over several.
///
/// # Examples
///
/// ```rust,ignore
/// use chaincheck::prelude::*;
///
/// #[derive(Debug, Checkable)]
/// struct Apple {
///     #[check(not_null, regex = r"apple \d+")]
///     name: Option<String>,
///
///     #[check(size(left = 1, right = 3))]
///     tags: Vec<String>,
///
///     #[check(number_between(left_string = "0.5", right = 10))]
///     price: f64,
/// }
/// ```
#[proc_macro_derive(Checkable, attributes(check))]
pub fn derive_checkable(input: TokenStream) -> TokenStream {
    checkable::derive_checkable_impl(input)
}
