//! Builder module for `ticli`.
//! See [documentation root](https://docs.rs/ticli/latest/ticli/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod cli;
mod constant;
mod model;
#[allow(missing_docs)]
pub mod prelude;
mod validation;

pub use api::*;
pub use cli::*;
pub use model::*;
pub use validation::*;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
