use crate::load::{documentation, last_pair, ticli_attributes};
use crate::model::{DeriveGroup, DeriveOption, DeriveValue};
use quote::ToTokens;

impl TryFrom<syn::DeriveInput> for DeriveGroup {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let attributes = ticli_attributes(&value.attrs)?;
        let struct_name = value.ident.clone();
        let group_name = last_pair(&attributes, "name").unwrap_or_else(|| DeriveValue {
            tokens: syn::LitStr::new(&struct_name.to_string(), struct_name.span())
                .to_token_stream(),
        });
        let about = last_pair(&attributes, "about").or_else(|| documentation(&value.attrs));

        match &value.data {
            syn::Data::Struct(ds) => {
                let options = match ds {
                    syn::DataStruct {
                        fields: syn::Fields::Named(ref fields),
                        ..
                    } => fields
                        .named
                        .iter()
                        .map(DeriveOption::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                    syn::DataStruct {
                        fields: syn::Fields::Unit,
                        ..
                    } => Vec::default(),
                    syn::DataStruct { .. } => {
                        return Err(syn::Error::new(
                            struct_name.span(),
                            "Invalid - option group fields must be named.",
                        ));
                    }
                };

                Ok(DeriveGroup {
                    struct_name,
                    group_name,
                    about,
                    options,
                })
            }
            _ => Err(syn::Error::new(
                struct_name.span(),
                "Invalid - OptionGroup may only be derived for a struct.",
            )),
        }
    }
}
