//! Derive Api for `ticli` option declarations.
//!
//! ### Getting Started
//! Instrument a struct `S` with `#[derive(OptionGroup)]`.
//! This implements [`Declare`](../prelude/trait.Declare.html) for `S`: `S::definition()` is a [`GroupDefinition`](../struct.GroupDefinition.html) holding one option per field, and `S::group()` defines it as is.
//! Hooks and methods are added to the definition with the builder Api.
//!
//! ```no_run
#![doc = include_str!("../demos/greet.rs")]
//! ```
//!
//! ### Group Configuration
//! * The group name is the struct name, unless `#[ticli(name = "..")]` is given.
//! * The group documentation is the struct's doc comment, unless `#[ticli(about = "..")]` is given.
//!
//! ### Option Configuration
//! The option type is inferred from the field type, via [`Typed`](../prelude/trait.Typed.html):
//! ```console
//! Type              | TypeSpec
//! -----------------------------------
//! bool              | TypeSpec::Bool
//! i8 .. usize       | TypeSpec::Int
//! f32, f64          | TypeSpec::Float
//! String, PathBuf   | TypeSpec::Str
//! Value             | TypeSpec::Any
//! Vec<T>            | TypeSpec::list(T)
//! Option<T>         | TypeSpec::optional(T)
//! ```
//!
//! The following field attributes may be combined as necessary.
//! * `#[ticli(default = expr)]` sets the option default, converted via `Value::from(expr)`.
//! * `#[ticli(choices = [c0, .., cn])]` restricts the option to the listed choices (`TypeSpec::literal`).
//! May not be used on a `bool` field.
//! * `#[ticli(help = "..")]` sets the help message (otherwise, the field's doc comment is used).
//! * `#[ticli(keyword_only)]` declares a keyword-only option.
//!
//! For example:
//! ```ignore
//! #[derive(OptionGroup)]
//! #[ticli(name = "jump")]
//! struct Jump {
//!     /// Enable verbose output.
//!     #[ticli(default = false)]
//!     verbose: bool,
//!     // the above generates:
//!     //  .option(OptionDeclaration::new("verbose", TypeSpec::Bool)
//!     //      .default(Value::from(false))
//!     //      .help("Enable verbose output."))
//!
//!     #[ticli(default = "feet", choices = ["feet", "inches", "meters"], keyword_only)]
//!     units: String,
//!     // the above generates:
//!     //  .option(OptionDeclaration::new("units", TypeSpec::literal(["feet", "inches", "meters"]))
//!     //      .default(Value::from("feet"))
//!     //      .keyword_only())
//! }
//! ```

pub use ticli_derive::*;
