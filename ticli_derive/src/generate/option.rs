use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::{DeriveOption, DeriveValue};

impl From<DeriveOption> for TokenStream2 {
    fn from(value: DeriveOption) -> Self {
        let DeriveOption {
            field_name,
            field_type,
            default,
            choices,
            help,
            keyword_only,
        } = value;
        let name = field_name.to_string();
        let field_type = &field_type.tokens;
        let type_spec = match choices {
            Some(DeriveValue { tokens }) => quote! { ::ticli::TypeSpec::literal(#tokens) },
            None => quote! { <#field_type as ::ticli::prelude::Typed>::type_spec() },
        };
        let default = default.map(|DeriveValue { tokens }| {
            quote! { .default(::ticli::Value::from(#tokens)) }
        });
        let help = help.map(|DeriveValue { tokens }| quote! { .help(#tokens) });
        let keyword_only = keyword_only.then(|| quote! { .keyword_only() });

        quote! {
            .option(
                ::ticli::OptionDeclaration::new(#name, #type_spec)
                    #default
                    #help
                    #keyword_only
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::{Literal, Span};
    use quote::ToTokens;

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }

    #[test]
    fn render_derive_option_plain() {
        // Setup
        let option = DeriveOption {
            field_name: ident("height"),
            field_type: DeriveValue {
                tokens: quote! { f64 },
            },
            default: None,
            choices: None,
            help: None,
            keyword_only: false,
        };

        // Execute
        let token_stream = TokenStream2::from(option);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            r#". option (:: ticli :: OptionDeclaration :: new ("height" , < f64 as :: ticli :: prelude :: Typed > :: type_spec ()))"#,
        );
    }

    #[test]
    fn render_derive_option() {
        // Setup
        let option = DeriveOption {
            field_name: ident("units"),
            field_type: DeriveValue {
                tokens: quote! { String },
            },
            default: Some(DeriveValue {
                tokens: Literal::string("feet").into_token_stream(),
            }),
            choices: Some(DeriveValue {
                tokens: quote! { ["feet", "inches"] },
            }),
            help: Some(DeriveValue {
                tokens: Literal::string("Units for height.").into_token_stream(),
            }),
            keyword_only: true,
        };

        // Execute
        let token_stream = TokenStream2::from(option);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            concat!(
                r#". option (:: ticli :: OptionDeclaration :: new ("units" , :: ticli :: TypeSpec :: literal (["feet" , "inches"]))"#,
                r#" . default (:: ticli :: Value :: from ("feet"))"#,
                r#" . help ("Units for height.")"#,
                r#" . keyword_only ())"#,
            ),
        );
    }
}
