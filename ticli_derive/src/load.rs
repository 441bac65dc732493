mod attribute;
mod group;
mod option;

use crate::model::{DeriveValue, IntermediateAttributes};
use quote::ToTokens;

pub(self) fn incompatible_error(
    field_name: &syn::Ident,
    left: impl Into<String>,
    right: impl Into<String>,
) -> syn::Error {
    syn::Error::new(
        field_name.span(),
        format!(
            "Invalid - option cannot be both `{}` and `{}`.",
            left.into(),
            right.into(),
        ),
    )
}

/// Read the `#[ticli(..)]` attributes; a repeated attribute replaces the earlier one.
pub(self) fn ticli_attributes(
    attributes: &[syn::Attribute],
) -> Result<IntermediateAttributes, syn::Error> {
    let mut out = IntermediateAttributes::default();

    for attribute in attributes {
        if attribute.path().is_ident("ticli") {
            out = IntermediateAttributes::try_from(attribute)?;
        }
    }

    Ok(out)
}

/// The final value of the attribute pair `key`, if present.
pub(self) fn last_pair(attributes: &IntermediateAttributes, key: &str) -> Option<DeriveValue> {
    attributes
        .pairs
        .get(key)
        .and_then(|values| values.last())
        .cloned()
}

/// The doc comment lines (`/// ..`), trimmed and joined by newlines.
pub(self) fn documentation(attributes: &[syn::Attribute]) -> Option<DeriveValue> {
    let lines: Vec<String> = attributes
        .iter()
        .filter(|attribute| attribute.path().is_ident("doc"))
        .filter_map(|attribute| match &attribute.meta {
            syn::Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(line),
                        ..
                    }),
                ..
            }) => Some(line.value().trim().to_string()),
            _ => None,
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        let text = lines.join("\n");
        Some(DeriveValue {
            tokens: syn::LitStr::new(text.trim(), proc_macro2::Span::call_site()).to_token_stream(),
        })
    }
}
