//! `ticli` builds command line programs out of *option groups*.
//!
//! An option group is a set of named, typed, defaulted options shared by a family of commands.
//! Defining a group merges its options with those of its base groups, then injects them into the signatures of the group's hooks:
//! * the *post-init* hook, run once when the group is constructed, and
//! * the *post-call* hook, run every time the constructed instance is invoked.
//!
//! The resulting *composite signatures* are what the command line sees.
//! Every value (option or argument) is checked against its declared [`TypeSpec`] before it reaches your code.
//! Failures are reported all at once, one line per distinct error, and never leave an instance half-updated.
//!
//! # Usage
//! More examples are outlined in [the source](https://github.com/codecraftsmen/ticli/tree/main/demos).
//!
//! A validated function:
//! ```no_run
#![doc = include_str!("../demos/jump.rs")]
//! ```
//!
//! ```console
//! $ jump 3.5
//! jumping 3.5 feet
//!
//! $ jump abc
//! jump: error: invalid value 'abc' supplied for argument 'height': value is not a valid float
//! ```
//!
//! # Builder Api
//! Declare a group with a [`GroupDefinition`]: its options ([`OptionDeclaration`]), base groups (`extends`), hooks ([`Hook`]), and methods.
//! Then `define` it into an [`OptionGroup`], which checks every composite signature up front.
//!
//! Options are inserted into a hook's signature after its leading positional parameters, and before any trailing variadic or keyword-only parameters.
//! An option without a default may therefore not follow a defaulted hook parameter; this is reported as a [`SignatureConflict`] at definition time.
//!
//! ```no_run
#![doc = include_str!("../demos/jump_or_greet.rs")]
//! ```
//!
//! # Inheritance
//! A group may extend several base groups.
//! The merged options are the inherited options (the first base wins a collision), followed by the group's own declarations.
//! Redeclaring an inherited option replaces it, and moves it to the end.
//! Hooks and methods are inherited likewise, and may be re-used from an overriding hook.
//!
//! ```no_run
#![doc = include_str!("../demos/verbose_farewell.rs")]
//! ```
//!
//! # Commands
//! A group may carry other groups as commands.
//! Every instance constructs its own instance of each command, which reads the owner's options through [`Instance::parent_get`].
//! A command has options of its own, and a [`Outcome::Chain`] from it continues the chain on the owner.
//!
//! ```no_run
#![doc = include_str!("../demos/jump_or_greet_or_farewell.rs")]
//! ```
//!
//! ```console
//! $ jump_or_greet_or_farewell --verbose farewell --dialect informal - greet
//! getting ready to bid you farewell
//! Bye!
//! finished bidding you farewell
//! getting ready to greet
//! Hello.
//! finished greeting
//! ```
//!
//! # Chains
//! On the command line, a standalone `-` separates the components of a chain.
//! The first component constructs the group; every following component invokes the same instance (or calls one of its methods), for as long as the previous step returns [`Outcome::Chain`].
//!
//! ```no_run
#![doc = include_str!("../demos/init_and_call_args.rs")]
//! ```
//!
//! ```console
//! $ init_and_call_args --a 5 --x 1 - --arg 2 - f 3 - reset
//! ```
//!
//! # Derive Api
//! The options of a group may be declared on a struct instead, via the [derive Api](./derive/index.html).
pub mod derive;
pub use ticli_builder::*;
