//! Code generation for the Checkable derive

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, FieldsNamed, LitStr};

use super::parse::{CheckAttrs, MarkerAttr};

/// Generate the `Checkable` implementation for a struct.
///
/// # Errors
///
/// Returns an error if the input is not a struct with named fields or a
/// `#[check(...)]` attribute is malformed.
pub(super) fn generate_checkable(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let owner = name.to_string();
    let fields = require_named_struct(input)?;

    let mut descriptors = Vec::new();
    for field in &fields.named {
        let attrs = CheckAttrs::from_attributes(&field.attrs)?;
        if attrs.markers.is_empty() {
            continue;
        }

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.to_string();
        let markers = attrs.markers.iter().map(marker_tokens);

        descriptors.push(quote! {
            ::chaincheck::field::FieldDescriptor::of(#owner, #field_name, &self.#ident)
                #(.with_marker(#markers))*
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::chaincheck::field::Checkable for #name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<::chaincheck::field::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

fn marker_tokens(marker: &MarkerAttr) -> TokenStream {
    match marker {
        MarkerAttr::NotNull => quote!(::chaincheck::marker::CheckNotNull),
        MarkerAttr::NotBlank { reason } => {
            let reason = with_reason(reason.as_ref());
            quote!(::chaincheck::marker::CheckNotBlank::new() #reason)
        }
        MarkerAttr::Regex { pattern, reason } => {
            let reason = with_reason(reason.as_ref());
            quote!(::chaincheck::marker::CheckRegex::new(#pattern) #reason)
        }
        MarkerAttr::Size {
            left,
            right,
            reason,
        } => {
            let left = left.map(|l| quote!(left: #l,));
            let right = right.map(|r| quote!(right: #r,));
            let reason = with_reason(reason.as_ref());
            quote! {
                ::chaincheck::marker::CheckSize {
                    #left
                    #right
                    ..::core::default::Default::default()
                } #reason
            }
        }
        MarkerAttr::NumberBetween {
            left,
            right,
            left_string,
            right_string,
            reason,
        } => {
            let left = left.as_ref().map(|l| quote!(left: #l,));
            let right = right.as_ref().map(|r| quote!(right: #r,));
            let left_string = left_string.as_ref().map(|s| cow_field("left_string", s));
            let right_string = right_string.as_ref().map(|s| cow_field("right_string", s));
            let reason = with_reason(reason.as_ref());
            quote! {
                ::chaincheck::marker::CheckNumberBetween {
                    #left
                    #right
                    #left_string
                    #right_string
                    ..::core::default::Default::default()
                } #reason
            }
        }
    }
}

fn with_reason(reason: Option<&LitStr>) -> Option<TokenStream> {
    reason.map(|r| quote!(.with_reason(#r)))
}

fn cow_field(name: &str, value: &LitStr) -> TokenStream {
    let name = syn::Ident::new(name, value.span());
    quote!(#name: ::std::borrow::Cow::Borrowed(#value),)
}

/// Validate that input is a struct with named fields.
fn require_named_struct(input: &DeriveInput) -> syn::Result<&FieldsNamed> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            Fields::Unnamed(_) => Err(syn::Error::new_spanned(
                input,
                "Checkable requires named fields; tuple structs are not supported",
            )),
            Fields::Unit => Err(syn::Error::new_spanned(
                input,
                "Checkable cannot be derived for unit structs, which have no fields to check",
            )),
        },
        Data::Enum(_) => Err(syn::Error::new_spanned(
            input,
            "Checkable can only be derived for structs, not enums",
        )),
        Data::Union(_) => Err(syn::Error::new_spanned(
            input,
            "Checkable can only be derived for structs, not unions",
        )),
    }
}
