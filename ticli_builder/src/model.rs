use indexmap::IndexMap;

/// The dynamic value of an argument, default, or option.
pub use serde_json::Value;

/// The declared type of a parameter or option.
///
/// Values are checked (and coerced) against a `TypeSpec` via [`check_type`](./fn.check_type.html).
/// The display form follows the familiar typing notation, ex: `list[int]` or `Literal['feet', 'inches']`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    /// Accepts any value, unchanged.
    Any,
    /// `true`/`false`, along with the usual boolean spellings.
    Bool,
    /// A whole number.
    Int,
    /// A floating point number.
    Float,
    /// A string.
    Str,
    /// One of a fixed set of permitted values.
    Literal(Vec<Value>),
    /// A homogeneous list.
    List(Box<TypeSpec>),
    /// The inner type, or null.
    Optional(Box<TypeSpec>),
    /// A structure with named, typed fields.
    Record(IndexMap<String, TypeSpec>),
}

impl TypeSpec {
    /// Create a literal type permitting exactly the `choices`.
    ///
    /// ### Example
    /// ```
    /// # use ticli_builder as ticli;
    /// use ticli::TypeSpec;
    ///
    /// let units = TypeSpec::literal(["feet", "inches", "meters"]);
    /// assert_eq!(units.to_string(), "Literal['feet', 'inches', 'meters']");
    /// ```
    pub fn literal(choices: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        TypeSpec::Literal(choices.into_iter().map(Into::into).collect())
    }

    /// Create a list type of `inner` items.
    pub fn list(inner: TypeSpec) -> Self {
        TypeSpec::List(Box::new(inner))
    }

    /// Create a nullable `inner` type.
    pub fn optional(inner: TypeSpec) -> Self {
        TypeSpec::Optional(Box::new(inner))
    }

    /// Create a record type from `(name, type)` pairs.
    pub fn record(fields: impl IntoIterator<Item = (impl Into<String>, TypeSpec)>) -> Self {
        TypeSpec::Record(
            fields
                .into_iter()
                .map(|(name, type_spec)| (name.into(), type_spec))
                .collect(),
        )
    }

    pub(crate) fn is_bool(&self) -> bool {
        matches!(self, TypeSpec::Bool)
            || matches!(self, TypeSpec::Optional(inner) if inner.is_bool())
    }

    pub(crate) fn is_list(&self) -> bool {
        matches!(self, TypeSpec::List(_))
    }
}

impl std::fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeSpec::Any => write!(f, "Any"),
            TypeSpec::Bool => write!(f, "bool"),
            TypeSpec::Int => write!(f, "int"),
            TypeSpec::Float => write!(f, "float"),
            TypeSpec::Str => write!(f, "str"),
            TypeSpec::Literal(choices) => write!(f, "Literal[{}]", permitted(choices)),
            TypeSpec::List(inner) => write!(f, "list[{inner}]"),
            TypeSpec::Optional(inner) => write!(f, "Optional[{inner}]"),
            TypeSpec::Record(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, type_spec)| format!("{name}: {type_spec}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{fields}}}")
            }
        }
    }
}

/// Render a value as it would appear in source (strings are quoted).
pub(crate) fn repr_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

/// Render a value as the user typed it (strings are bare).
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn permitted(choices: &[Value]) -> String {
    choices
        .iter()
        .map(repr_value)
        .collect::<Vec<_>>()
        .join(", ")
}
