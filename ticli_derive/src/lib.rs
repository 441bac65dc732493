extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::DeriveGroup;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

/// Derive the option group declaration of a struct: implements `ticli::prelude::Declare`.
///
/// Each named field becomes an option, typed via `ticli::prelude::Typed`.
/// Struct attributes: `#[ticli(name = "..", about = "..")]` (the doc comment is the default about).
/// Field attributes: `#[ticli(default = expr, choices = [..], help = "..", keyword_only)]` (the doc comment is the default help).
#[proc_macro_derive(OptionGroup, attributes(ticli))]
pub fn option_group(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveGroup::try_from(derive_input) {
        Ok(group) => TokenStream2::from(group).into(),
        Err(error) => error.to_compile_error().into(),
    }
}
