//! Parsing of #[check(...)] attributes

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, LitInt, LitStr, Token};

/// One marker requested on a field.
#[derive(Debug, Clone)]
pub(super) enum MarkerAttr {
    NotNull,
    NotBlank {
        reason: Option<LitStr>,
    },
    Regex {
        pattern: LitStr,
        reason: Option<LitStr>,
    },
    Size {
        left: Option<usize>,
        right: Option<usize>,
        reason: Option<LitStr>,
    },
    NumberBetween {
        left: Option<Expr>,
        right: Option<Expr>,
        left_string: Option<LitStr>,
        right_string: Option<LitStr>,
        reason: Option<LitStr>,
    },
}

/// Markers of one field, in attribute order.
#[derive(Debug, Default, Clone)]
pub(super) struct CheckAttrs {
    pub markers: Vec<MarkerAttr>,
}

impl CheckAttrs {
    /// Parse every `#[check(...)]` attribute of a field.
    pub(super) fn from_attributes(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("check") {
                continue;
            }

            attr.parse_nested_meta(|meta| result.parse_meta(&meta))?;
        }

        Ok(result)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        let path = &meta.path;

        if path.is_ident("not_null") {
            self.markers.push(MarkerAttr::NotNull);
            return Ok(());
        }

        if path.is_ident("not_blank") {
            let mut reason = None;
            if has_list(meta) {
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("reason") {
                        reason = Some(inner.value()?.parse()?);
                        return Ok(());
                    }
                    Err(inner.error("expected `reason`"))
                })?;
            }
            self.markers.push(MarkerAttr::NotBlank { reason });
            return Ok(());
        }

        if path.is_ident("regex") {
            if meta.input.peek(Token![=]) {
                let pattern: LitStr = meta.value()?.parse()?;
                self.markers.push(MarkerAttr::Regex {
                    pattern,
                    reason: None,
                });
                return Ok(());
            }

            let mut pattern = None;
            let mut reason = None;
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("pattern") {
                    pattern = Some(inner.value()?.parse::<LitStr>()?);
                    return Ok(());
                }
                if inner.path.is_ident("reason") {
                    reason = Some(inner.value()?.parse()?);
                    return Ok(());
                }
                Err(inner.error("expected `pattern` or `reason`"))
            })?;
            let pattern = pattern.ok_or_else(|| meta.error("`regex` requires a `pattern`"))?;
            self.markers.push(MarkerAttr::Regex { pattern, reason });
            return Ok(());
        }

        if path.is_ident("size") {
            let mut left = None;
            let mut right = None;
            let mut reason = None;
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("left") {
                    left = Some(inner.value()?.parse::<LitInt>()?.base10_parse()?);
                    return Ok(());
                }
                if inner.path.is_ident("right") {
                    right = Some(inner.value()?.parse::<LitInt>()?.base10_parse()?);
                    return Ok(());
                }
                if inner.path.is_ident("reason") {
                    reason = Some(inner.value()?.parse()?);
                    return Ok(());
                }
                Err(inner.error("expected `left`, `right` or `reason`"))
            })?;

            if let (Some(l), Some(r)) = (left, right)
                && l > r
            {
                return Err(meta.error(format!(
                    "size lower bound {l} is greater than upper bound {r}"
                )));
            }
            self.markers.push(MarkerAttr::Size {
                left,
                right,
                reason,
            });
            return Ok(());
        }

        if path.is_ident("number_between") {
            let mut left = None;
            let mut right = None;
            let mut left_string = None;
            let mut right_string = None;
            let mut reason = None;
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("left") {
                    left = Some(inner.value()?.parse::<Expr>()?);
                } else if inner.path.is_ident("right") {
                    right = Some(inner.value()?.parse::<Expr>()?);
                } else if inner.path.is_ident("left_string") {
                    left_string = Some(inner.value()?.parse()?);
                } else if inner.path.is_ident("right_string") {
                    right_string = Some(inner.value()?.parse()?);
                } else if inner.path.is_ident("reason") {
                    reason = Some(inner.value()?.parse()?);
                } else {
                    return Err(inner.error(
                        "expected `left`, `right`, `left_string`, `right_string` or `reason`",
                    ));
                }
                Ok(())
            })?;
            self.markers.push(MarkerAttr::NumberBetween {
                left,
                right,
                left_string,
                right_string,
                reason,
            });
            return Ok(());
        }

        Err(meta.error(
            "unsupported check attribute, expected one of `not_null`, `not_blank`, \
             `regex`, `size`, `number_between`",
        ))
    }
}

fn has_list(meta: &ParseNestedMeta<'_>) -> bool {
    meta.input.peek(syn::token::Paren)
}
