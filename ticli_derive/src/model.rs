use proc_macro2::TokenStream as TokenStream2;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct DeriveValue {
    pub tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        let st = &self.tokens.to_string();
        let ot = &other.tokens.to_string();
        st == ot
    }
}

impl Eq for DeriveValue {}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntermediateAttributes {
    pub singletons: HashSet<String>,
    pub pairs: HashMap<String, Vec<DeriveValue>>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveOption {
    pub field_name: syn::Ident,
    pub field_type: DeriveValue,
    pub default: Option<DeriveValue>,
    pub choices: Option<DeriveValue>,
    pub help: Option<DeriveValue>,
    pub keyword_only: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveGroup {
    pub struct_name: syn::Ident,
    pub group_name: DeriveValue,
    pub about: Option<DeriveValue>,
    pub options: Vec<DeriveOption>,
}
