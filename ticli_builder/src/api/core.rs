use std::sync::Arc;

use indexmap::IndexMap;

use crate::api::{Hook, OptionDeclaration, OptionGroup, SignatureConflict};

/// The declaration of an option group: its options, base groups, hooks, methods, and commands.
///
/// [`GroupDefinition::define`] turns the declaration into an [`OptionGroup`].
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::{Arguments, GroupDefinition, Hook, OptionDeclaration, Outcome, Parameter, TypeSpec};
///
/// let jump = GroupDefinition::new("Jump")
///     .about("Jump into the air.")
///     .option(OptionDeclaration::new("verbose", TypeSpec::Bool).default(false))
///     .post_call(Hook::new([Parameter::positional("height", TypeSpec::Float)], |instance, bound| {
///         let height: f64 = bound.value("height")?;
///         instance.print(format!("jumping {height} feet"));
///         Ok(Outcome::Chain)
///     }))
///     .define()
///     .unwrap();
///
/// assert_eq!(
///     jump.invocation_signature().to_string(),
///     "(self, height: float, verbose: bool = false)"
/// );
///
/// let mut instance = jump.construct(Arguments::new()).unwrap();
/// instance.invoke(Arguments::new().arg(3.5)).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct GroupDefinition {
    pub(super) name: String,
    pub(super) about: Option<String>,
    pub(super) options: Vec<OptionDeclaration>,
    pub(super) bases: Vec<Arc<OptionGroup>>,
    pub(super) post_init: Option<Hook>,
    pub(super) post_call: Option<Hook>,
    pub(super) methods: IndexMap<String, Hook>,
    pub(super) commands: IndexMap<String, Arc<OptionGroup>>,
}

impl GroupDefinition {
    /// Create an empty group definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            options: Vec::default(),
            bases: Vec::default(),
            post_init: None,
            post_call: None,
            methods: IndexMap::default(),
            commands: IndexMap::default(),
        }
    }

    /// Document the group.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Declare an option.
    ///
    /// Declaring a name again (here, or in a base group) replaces the earlier declaration and moves it to the end.
    pub fn option(mut self, declaration: OptionDeclaration) -> Self {
        self.options.push(declaration);
        self
    }

    /// Inherit from a base group: its options, hooks, methods, and commands.
    ///
    /// Bases are listed in priority order; the first base wins a collision between bases.
    pub fn extends(mut self, base: &Arc<OptionGroup>) -> Self {
        self.bases.push(base.clone());
        self
    }

    /// Set the post-construction hook.
    pub fn post_init(mut self, hook: Hook) -> Self {
        self.post_init.replace(hook);
        self
    }

    /// Set the post-invocation hook.
    pub fn post_call(mut self, hook: Hook) -> Self {
        self.post_call.replace(hook);
        self
    }

    /// Add a named method, overriding any inherited method of the same name.
    pub fn method(mut self, name: impl Into<String>, hook: Hook) -> Self {
        self.methods.insert(name.into(), hook);
        self
    }

    /// Add a named command, overriding any inherited command of the same name.
    ///
    /// Each instance of this group owns an instance of `group`, which reads this instance's options through [`Instance::parent_get`](crate::api::Instance::parent_get).
    pub fn command(mut self, name: impl Into<String>, group: &Arc<OptionGroup>) -> Self {
        self.commands.insert(name.into(), group.clone());
        self
    }

    /// The group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define the option group.
    /// This merges the options, resolves the hooks, and checks every composite signature.
    pub fn define(self) -> Result<Arc<OptionGroup>, SignatureConflict> {
        OptionGroup::try_from(self).map(Arc::new)
    }

    /// Define the option group.
    /// If a signature conflict is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> Arc<OptionGroup> {
        match self.define() {
            Ok(group) => group,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
