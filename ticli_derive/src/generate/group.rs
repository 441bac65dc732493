use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::{DeriveGroup, DeriveValue};

impl From<DeriveGroup> for TokenStream2 {
    fn from(value: DeriveGroup) -> Self {
        let DeriveGroup {
            struct_name,
            group_name,
            about,
            options,
        } = value;
        let group_name = &group_name.tokens;
        let about = about.map(|DeriveValue { tokens }| quote! { .about(#tokens) });
        let options = options
            .into_iter()
            .map(TokenStream2::from)
            .collect::<Vec<_>>();

        quote! {
            impl ::ticli::prelude::Declare for #struct_name {
                fn definition() -> ::ticli::GroupDefinition {
                    ::ticli::GroupDefinition::new(#group_name)
                        #about
                        #( #options )*
                }
            }
        }
    }
}
