use indexmap::IndexMap;

use crate::api::{Parameter, ParameterKind};
use crate::model::{TypeSpec, Value};

/// The declaration of a single option: name, type, optional default, and documentation.
///
/// Options are bound by position or keyword in the composite signatures, unless marked [`OptionDeclaration::keyword_only`].
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::{OptionDeclaration, TypeSpec};
///
/// let verbose = OptionDeclaration::new("verbose", TypeSpec::Bool)
///     .default(false)
///     .help("Print more details.");
///
/// assert_eq!(verbose.name(), "verbose");
/// assert!(!verbose.is_keyword_only());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDeclaration {
    name: String,
    type_spec: TypeSpec,
    default: Option<Value>,
    help: Option<String>,
    keyword_only: bool,
}

impl OptionDeclaration {
    /// Declare option `name` of type `type_spec`, without a default.
    pub fn new(name: impl Into<String>, type_spec: TypeSpec) -> Self {
        Self {
            name: name.into(),
            type_spec,
            default: None,
            help: None,
            keyword_only: false,
        }
    }

    /// Set the default value.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    /// Document the option.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// Only accept this option by keyword.
    pub fn keyword_only(mut self) -> Self {
        self.keyword_only = true;
        self
    }

    /// The option name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn type_spec(&self) -> &TypeSpec {
        &self.type_spec
    }

    /// The default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The help message, if any.
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Whether the option is only accepted by keyword.
    pub fn is_keyword_only(&self) -> bool {
        self.keyword_only
    }

    /// The option as a parameter of a composite signature.
    pub fn parameter(&self) -> Parameter {
        let kind = if self.keyword_only {
            ParameterKind::KeywordOnly
        } else {
            ParameterKind::PositionalOrKeyword
        };
        let mut parameter = Parameter::new(&self.name, kind, self.type_spec.clone());

        if let Some(default) = &self.default {
            parameter = parameter.default(default.clone());
        }

        if let Some(help) = &self.help {
            parameter = parameter.help(help);
        }

        parameter
    }
}

/// The merged, ordered option declarations of an option group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionTable {
    declarations: IndexMap<String, OptionDeclaration>,
}

impl OptionTable {
    /// Merge the tables of the base groups with the group's own declarations.
    ///
    /// Base tables are folded left to right; on an inherited collision, the leftmost base wins and keeps its position.
    /// Own declarations then apply in order, each replacing any inherited entry and moving it to the end.
    pub fn collect<'a>(
        bases: impl IntoIterator<Item = &'a OptionTable>,
        own: &[OptionDeclaration],
    ) -> Self {
        let mut declarations: IndexMap<String, OptionDeclaration> = IndexMap::default();

        for base in bases {
            for (name, declaration) in &base.declarations {
                if !declarations.contains_key(name) {
                    declarations.insert(name.clone(), declaration.clone());
                }
            }
        }

        for declaration in own {
            declarations.shift_remove(declaration.name());
            declarations.insert(declaration.name().to_string(), declaration.clone());
        }

        Self { declarations }
    }

    /// Look up an option declaration.
    pub fn get(&self, name: &str) -> Option<&OptionDeclaration> {
        self.declarations.get(name)
    }

    /// Whether an option is named `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// The option names, in merge order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.keys().map(String::as_str)
    }

    /// The declarations, in merge order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDeclaration> {
        self.declarations.values()
    }

    /// The number of options.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether there are no options.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Option name to declared type.
    pub fn types(&self) -> IndexMap<String, TypeSpec> {
        self.declarations
            .iter()
            .map(|(name, d)| (name.clone(), d.type_spec.clone()))
            .collect()
    }

    /// Option name to default (absent when the option has none).
    pub fn defaults(&self) -> IndexMap<String, Option<Value>> {
        self.declarations
            .iter()
            .map(|(name, d)| (name.clone(), d.default.clone()))
            .collect()
    }

    /// The options as composite signature parameters.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.declarations
            .values()
            .map(OptionDeclaration::parameter)
            .collect()
    }
}
