use thiserror::Error;

use crate::constant::RECEIVER;
use crate::model::{repr_value, TypeSpec, Value};

/// How a parameter binds to the supplied arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// The instance a method is called on.
    Receiver,
    /// Bound by position only.
    PositionalOnly,
    /// Bound by position or by name.
    PositionalOrKeyword,
    /// Collects surplus positional arguments.
    VarPositional,
    /// Bound by name only.
    KeywordOnly,
    /// Collects surplus keyword arguments.
    VarKeyword,
}

impl ParameterKind {
    /// Whether this kind belongs to the trailing run of a signature (the slot options are inserted in front of).
    pub fn is_trailing(&self) -> bool {
        matches!(
            self,
            ParameterKind::VarPositional | ParameterKind::KeywordOnly | ParameterKind::VarKeyword
        )
    }

    pub(crate) fn is_positional(&self) -> bool {
        matches!(
            self,
            ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword
        )
    }

    pub(crate) fn accepts_keyword(&self) -> bool {
        matches!(
            self,
            ParameterKind::PositionalOrKeyword | ParameterKind::KeywordOnly
        )
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            ParameterKind::Receiver => "receiver",
            ParameterKind::PositionalOnly => "positional-only",
            ParameterKind::PositionalOrKeyword => "positional-or-keyword",
            ParameterKind::VarPositional => "variadic positional",
            ParameterKind::KeywordOnly => "keyword-only",
            ParameterKind::VarKeyword => "variadic keyword",
        };
        write!(f, "{description}")
    }
}

/// A single parameter of a [`Signature`]: name, kind, type, and optional default.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::{Parameter, TypeSpec};
///
/// let height = Parameter::positional("height", TypeSpec::Float)
///     .help("How high to jump (in feet)");
/// let units = Parameter::positional("units", TypeSpec::literal(["feet", "inches"]))
///     .default("feet");
///
/// assert_eq!(height.to_string(), "height: float");
/// assert_eq!(units.to_string(), "units: Literal['feet', 'inches'] = 'feet'");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    type_spec: TypeSpec,
    default: Option<Value>,
    help: Option<String>,
}

impl Parameter {
    /// Create a parameter of any kind.
    pub fn new(name: impl Into<String>, kind: ParameterKind, type_spec: TypeSpec) -> Self {
        Self {
            name: name.into(),
            kind,
            type_spec,
            default: None,
            help: None,
        }
    }

    /// Create a positional-or-keyword parameter.
    pub fn positional(name: impl Into<String>, type_spec: TypeSpec) -> Self {
        Self::new(name, ParameterKind::PositionalOrKeyword, type_spec)
    }

    /// Create a positional-only parameter.
    pub fn positional_only(name: impl Into<String>, type_spec: TypeSpec) -> Self {
        Self::new(name, ParameterKind::PositionalOnly, type_spec)
    }

    /// Create a keyword-only parameter.
    pub fn keyword_only(name: impl Into<String>, type_spec: TypeSpec) -> Self {
        Self::new(name, ParameterKind::KeywordOnly, type_spec)
    }

    /// Create a variadic positional parameter; `type_spec` applies to each collected item.
    pub fn var_positional(name: impl Into<String>, type_spec: TypeSpec) -> Self {
        Self::new(name, ParameterKind::VarPositional, type_spec)
    }

    /// Create a variadic keyword parameter; `type_spec` applies to each collected value.
    pub fn var_keyword(name: impl Into<String>, type_spec: TypeSpec) -> Self {
        Self::new(name, ParameterKind::VarKeyword, type_spec)
    }

    pub(crate) fn receiver() -> Self {
        Self::new(RECEIVER, ParameterKind::Receiver, TypeSpec::Any)
    }

    /// Set the default value, making the parameter optional.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    /// Document the parameter.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter kind.
    pub fn kind(&self) -> ParameterKind {
        self.kind
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

    /// Whether an argument must be supplied for this parameter.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
            && !matches!(
                self.kind,
                ParameterKind::Receiver | ParameterKind::VarPositional | ParameterKind::VarKeyword
            )
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.kind {
            ParameterKind::Receiver => return write!(f, "{}", self.name),
            ParameterKind::VarPositional => "*",
            ParameterKind::VarKeyword => "**",
            _ => "",
        };
        write!(f, "{prefix}{}: {}", self.name, self.type_spec)?;

        if let Some(default) = &self.default {
            write!(f, " = {}", repr_value(default))?;
        }

        Ok(())
    }
}

/// A signature is not well formed.
///
/// Raised when an option group is defined; this indicates a programming error, not a runtime condition.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SignatureConflict {
    /// Two parameters share a name.
    #[error("duplicate parameter '{name}' in signature {signature}.")]
    DuplicateName { name: String, signature: String },

    /// A required positional parameter follows a defaulted one.
    #[error("parameter '{name}' without a default follows parameter '{after}' with a default in signature {signature}.")]
    DefaultOrdering {
        name: String,
        after: String,
        signature: String,
    },

    /// More than one variadic parameter of the same kind.
    #[error("multiple {kind} parameters in signature {signature}.")]
    MultipleVariadic {
        kind: ParameterKind,
        signature: String,
    },

    /// Something follows the variadic keyword parameter.
    #[error("variadic keyword parameter '{name}' must be last in signature {signature}.")]
    VarKeywordNotLast { name: String, signature: String },

    /// The receiver is not the first parameter.
    #[error("receiver '{name}' must be the first parameter in signature {signature}.")]
    MisplacedReceiver { name: String, signature: String },

    /// An option shares its name with a hook parameter.
    #[error("option '{name}' collides with a parameter of the {hook} hook.")]
    OptionCollision { name: String, hook: String },

    /// A method and a command share a name.
    #[error("member '{name}' is declared as both a method and a command.")]
    MemberCollision { name: String },
}

/// An ordered list of [`Parameter`]s describing a callable contract.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::{Parameter, Signature, TypeSpec};
///
/// let signature = Signature::new([
///     Parameter::positional("height", TypeSpec::Float),
///     Parameter::keyword_only("verbose", TypeSpec::Bool).default(false),
/// ]);
///
/// signature.validate().unwrap();
/// assert_eq!(signature.to_string(), "(height: float, *, verbose: bool = false)");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    /// Create a signature from its ordered parameters.
    pub fn new(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self {
            parameters: parameters.into_iter().collect(),
        }
    }

    /// The signature without parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The ordered parameters.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The parameter names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// The number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Names of the parameters an argument may be supplied to by position (receiver excluded).
    pub(crate) fn positional_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.kind.is_positional())
            .map(|p| p.name.clone())
            .collect()
    }

    /// Check the signature is well formed.
    ///
    /// * Names are unique.
    /// * Amongst the positional parameters, none without a default follows one with a default.
    /// * At most one variadic positional and one variadic keyword parameter, the latter last.
    /// * A receiver may only appear first.
    pub fn validate(&self) -> Result<(), SignatureConflict> {
        let mut seen: Vec<&str> = Vec::default();
        let mut defaulted: Option<&str> = None;
        let mut var_positional = false;
        let mut var_keyword = false;

        for (i, parameter) in self.parameters.iter().enumerate() {
            if seen.contains(&parameter.name.as_str()) {
                return Err(SignatureConflict::DuplicateName {
                    name: parameter.name.clone(),
                    signature: self.to_string(),
                });
            }
            seen.push(&parameter.name);

            if var_keyword {
                return Err(SignatureConflict::VarKeywordNotLast {
                    name: self.parameters[i - 1].name.clone(),
                    signature: self.to_string(),
                });
            }

            match parameter.kind {
                ParameterKind::Receiver if i > 0 => {
                    return Err(SignatureConflict::MisplacedReceiver {
                        name: parameter.name.clone(),
                        signature: self.to_string(),
                    });
                }
                ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword => {
                    match (&parameter.default, defaulted) {
                        (Some(_), _) => {
                            defaulted.replace(&parameter.name);
                        }
                        (None, Some(after)) => {
                            return Err(SignatureConflict::DefaultOrdering {
                                name: parameter.name.clone(),
                                after: after.to_string(),
                                signature: self.to_string(),
                            });
                        }
                        (None, None) => {}
                    }
                }
                ParameterKind::VarPositional => {
                    if var_positional {
                        return Err(SignatureConflict::MultipleVariadic {
                            kind: parameter.kind,
                            signature: self.to_string(),
                        });
                    }
                    var_positional = true;
                }
                ParameterKind::VarKeyword => {
                    var_keyword = true;
                }
                _ => {}
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = Vec::default();
        let mut star_written = false;

        for (i, parameter) in self.parameters.iter().enumerate() {
            match parameter.kind {
                ParameterKind::VarPositional => star_written = true,
                ParameterKind::KeywordOnly if !star_written => {
                    parts.push("*".to_string());
                    star_written = true;
                }
                _ => {}
            }

            parts.push(parameter.to_string());

            let next_positional_only = self
                .parameters
                .get(i + 1)
                .map(|p| p.kind == ParameterKind::PositionalOnly)
                .unwrap_or(false);
            if parameter.kind == ParameterKind::PositionalOnly && !next_positional_only {
                parts.push("/".to_string());
            }
        }

        write!(f, "({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ParameterKind::Receiver, false)]
    #[case(ParameterKind::PositionalOnly, false)]
    #[case(ParameterKind::PositionalOrKeyword, false)]
    #[case(ParameterKind::VarPositional, true)]
    #[case(ParameterKind::KeywordOnly, true)]
    #[case(ParameterKind::VarKeyword, true)]
    fn kind_is_trailing(#[case] kind: ParameterKind, #[case] expected: bool) {
        assert_eq!(kind.is_trailing(), expected);
    }

    #[test]
    fn parameter_builder() {
        let parameter = Parameter::positional("units", TypeSpec::Str)
            .default("feet")
            .help("--this will get discarded--")
            .help("Units for height");

        assert_eq!(parameter.name(), "units");
        assert_eq!(parameter.kind(), ParameterKind::PositionalOrKeyword);
        assert_eq!(parameter.type_spec(), &TypeSpec::Str);
        assert_eq!(parameter.default_value(), Some(&Value::from("feet")));
        assert_eq!(parameter.help_text(), Some("Units for height"));
        assert!(!parameter.is_required());
    }

    #[rstest]
    #[case(Parameter::positional("a", TypeSpec::Int), true)]
    #[case(Parameter::keyword_only("a", TypeSpec::Int), true)]
    #[case(Parameter::keyword_only("a", TypeSpec::Int).default(1), false)]
    #[case(Parameter::var_positional("a", TypeSpec::Int), false)]
    #[case(Parameter::var_keyword("a", TypeSpec::Int), false)]
    #[case(Parameter::receiver(), false)]
    fn parameter_required(#[case] parameter: Parameter, #[case] expected: bool) {
        assert_eq!(parameter.is_required(), expected);
    }

    #[rstest]
    #[case(vec![], "()")]
    #[case(vec![Parameter::receiver(), Parameter::positional("c", TypeSpec::Int)], "(self, c: int)")]
    #[case(
        vec![
            Parameter::positional_only("a", TypeSpec::Int),
            Parameter::positional_only("b", TypeSpec::Int),
            Parameter::positional("c", TypeSpec::Str).default("x"),
        ],
        "(a: int, b: int, /, c: str = 'x')"
    )]
    #[case(
        vec![
            Parameter::positional("a", TypeSpec::Int),
            Parameter::var_positional("rest", TypeSpec::Int),
            Parameter::keyword_only("k", TypeSpec::Bool).default(true),
            Parameter::var_keyword("extra", TypeSpec::Any),
        ],
        "(a: int, *rest: int, k: bool = true, **extra: Any)"
    )]
    #[case(
        vec![
            Parameter::keyword_only("k", TypeSpec::Int),
            Parameter::keyword_only("j", TypeSpec::Int),
        ],
        "(*, k: int, j: int)"
    )]
    fn signature_display(#[case] parameters: Vec<Parameter>, #[case] expected: &str) {
        assert_eq!(Signature::new(parameters).to_string(), expected);
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![Parameter::receiver(), Parameter::positional("a", TypeSpec::Int)])]
    #[case(vec![
        Parameter::positional("a", TypeSpec::Int),
        Parameter::positional("b", TypeSpec::Int).default(1),
        Parameter::var_positional("rest", TypeSpec::Int),
        Parameter::keyword_only("k", TypeSpec::Int),
        Parameter::var_keyword("extra", TypeSpec::Any),
    ])]
    #[case(vec![
        Parameter::positional("a", TypeSpec::Int).default(1),
        Parameter::keyword_only("k", TypeSpec::Int),
    ])]
    fn validate(#[case] parameters: Vec<Parameter>) {
        Signature::new(parameters).validate().unwrap();
    }

    #[test]
    fn validate_duplicate() {
        let signature = Signature::new([
            Parameter::positional("a", TypeSpec::Int),
            Parameter::keyword_only("a", TypeSpec::Int),
        ]);

        assert_matches!(
            signature.validate().unwrap_err(),
            SignatureConflict::DuplicateName { name, .. } if name == "a"
        );
    }

    #[test]
    fn validate_default_ordering() {
        let signature = Signature::new([
            Parameter::positional("x", TypeSpec::Int).default(8),
            Parameter::positional("a", TypeSpec::Int),
        ]);

        assert_matches!(
            signature.validate().unwrap_err(),
            SignatureConflict::DefaultOrdering { name, after, .. } if name == "a" && after == "x"
        );
    }

    #[test]
    fn validate_multiple_variadic() {
        let signature = Signature::new([
            Parameter::var_positional("a", TypeSpec::Int),
            Parameter::var_positional("b", TypeSpec::Int),
        ]);

        assert_matches!(
            signature.validate().unwrap_err(),
            SignatureConflict::MultipleVariadic {
                kind: ParameterKind::VarPositional,
                ..
            }
        );
    }

    #[test]
    fn validate_var_keyword_not_last() {
        let signature = Signature::new([
            Parameter::var_keyword("extra", TypeSpec::Any),
            Parameter::keyword_only("k", TypeSpec::Int),
        ]);

        assert_matches!(
            signature.validate().unwrap_err(),
            SignatureConflict::VarKeywordNotLast { name, .. } if name == "extra"
        );
    }

    #[test]
    fn validate_misplaced_receiver() {
        let signature = Signature::new([
            Parameter::positional("a", TypeSpec::Int),
            Parameter::receiver(),
        ]);

        assert_matches!(
            signature.validate().unwrap_err(),
            SignatureConflict::MisplacedReceiver { .. }
        );
    }

    #[test]
    fn positional_names() {
        let signature = Signature::new([
            Parameter::receiver(),
            Parameter::positional_only("a", TypeSpec::Int),
            Parameter::positional("b", TypeSpec::Int),
            Parameter::var_positional("rest", TypeSpec::Int),
            Parameter::keyword_only("k", TypeSpec::Int),
        ]);

        assert_eq!(signature.positional_names(), vec!["a", "b"]);
        assert_eq!(
            signature.names().collect::<Vec<_>>(),
            vec!["self", "a", "b", "rest", "k"]
        );
        assert_eq!(signature.get("k").unwrap().kind(), ParameterKind::KeywordOnly);
        assert!(signature.get("missing").is_none());
    }
}
