use crate::load::{documentation, incompatible_error, last_pair, ticli_attributes};
use crate::model::{DeriveOption, DeriveValue};
use quote::ToTokens;

impl TryFrom<&syn::Field> for DeriveOption {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let attributes = ticli_attributes(&value.attrs)?;
        let field_name = value.ident.clone().ok_or_else(|| {
            syn::Error::new_spanned(value, "Invalid - option fields must be named.")
        })?;
        let default = last_pair(&attributes, "default");
        let choices = last_pair(&attributes, "choices");
        // An explicit help message takes precedence over the doc comment.
        let help = last_pair(&attributes, "help").or_else(|| documentation(&value.attrs));
        let keyword_only = attributes.singletons.contains("keyword_only");

        if let Some(choices) = &choices {
            let expression: syn::Expr = syn::parse2(choices.tokens.clone())?;

            match expression {
                syn::Expr::Array(array) if !array.elems.is_empty() => {}
                _ => {
                    return Err(syn::Error::new(
                        field_name.span(),
                        format!(
                            "Invalid - choices assignment expecting `[choice, ..]`, found `{}`.",
                            choices.tokens
                        ),
                    ));
                }
            }

            if is_bool(&value.ty) {
                return Err(incompatible_error(
                    &field_name,
                    "bool",
                    "#[ticli(choices = ..)]",
                ));
            }
        }

        if let Some(unknown) = attributes
            .singletons
            .iter()
            .find(|singleton| singleton.as_str() != "keyword_only")
        {
            return Err(syn::Error::new(
                field_name.span(),
                format!("Invalid - unknown option attribute `{unknown}`."),
            ));
        }

        Ok(DeriveOption {
            field_name,
            field_type: DeriveValue {
                tokens: value.ty.to_token_stream(),
            },
            default,
            choices,
            help,
            keyword_only,
        })
    }
}

fn is_bool(field_type: &syn::Type) -> bool {
    match field_type {
        syn::Type::Path(path) => path.path.is_ident("bool"),
        _ => false,
    }
}
