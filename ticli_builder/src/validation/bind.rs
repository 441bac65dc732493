use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{GroupError, Parameter, ParameterKind, Signature};
use crate::constant::*;
use crate::model::{repr_value, Value};
use crate::validation::{coerce, LocSegment, ValidationFailure};

/// The arguments supplied to a call: positional values followed by ordered keyword values.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::Arguments;
///
/// let arguments = Arguments::new().arg(3.5).kwarg("units", "feet");
/// assert_eq!(arguments.positional().len(), 1);
/// assert_eq!(arguments.keyword()["units"], "feet");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    keyword: IndexMap<String, Value>,
}

impl Arguments {
    /// Create empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a keyword argument.
    /// If repeated, only the final value will apply.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// The positional arguments.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// The keyword arguments, in the order supplied.
    pub fn keyword(&self) -> &IndexMap<String, Value> {
        &self.keyword
    }

    /// Whether no argument at all was supplied.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Split off the keyword arguments named in `names`, preserving their order.
    pub(crate) fn split_keywords(
        mut self,
        names: impl Fn(&str) -> bool,
    ) -> (IndexMap<String, Value>, Arguments) {
        let mut taken = IndexMap::default();
        self.keyword.retain(|name, value| {
            if names(name) {
                taken.insert(name.clone(), value.clone());
                false
            } else {
                true
            }
        });
        (taken, self)
    }

    /// Split off the positional arguments for which `slot` names a target, preserving their order.
    /// `slot` receives the index of each positional argument.
    pub(crate) fn split_positional(
        mut self,
        slot: impl Fn(usize) -> Option<String>,
    ) -> (Vec<(String, Value)>, Arguments) {
        let mut taken = Vec::default();
        let mut kept = Vec::default();

        for (index, value) in self.positional.into_iter().enumerate() {
            match slot(index) {
                Some(name) => taken.push((name, value)),
                None => kept.push(value),
            }
        }

        self.positional = kept;
        (taken, self)
    }

    /// Keep only the first `len` positional arguments.
    pub(crate) fn truncate_positional(mut self, len: usize) -> Self {
        self.positional.truncate(len);
        self
    }
}

/// Arguments after binding to a [`Signature`]: every parameter name maps to its validated (coerced) value.
///
/// A variadic positional parameter is bound to an array, a variadic keyword parameter to an object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    values: IndexMap<String, Value>,
}

impl BoundArguments {
    /// The bound value of parameter `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Extract the bound value of parameter `name` as a `T`.
    ///
    /// ### Example
    /// ```
    /// # use ticli_builder as ticli;
    /// use ticli::{bind, Arguments, Parameter, Signature, TypeSpec};
    ///
    /// let signature = Signature::new([Parameter::positional("height", TypeSpec::Float)]);
    /// let bound = bind(&signature, &Arguments::new().arg("3.5")).unwrap();
    ///
    /// let height: f64 = bound.value("height").unwrap();
    /// assert_eq!(height, 3.5);
    /// ```
    pub fn value<T: DeserializeOwned>(&self, name: &str) -> Result<T, GroupError> {
        let value = self.values.get(name).ok_or_else(|| GroupError::Extract {
            name: name.to_string(),
            message: "not bound".to_string(),
        })?;

        serde_json::from_value(value.clone()).map_err(|error| GroupError::Extract {
            name: name.to_string(),
            message: error.to_string(),
        })
    }

    /// The bound `(name, value)` pairs, in signature order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// The bound values by name.
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.values
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }
}

/// Bind and validate `arguments` against `signature`.
///
/// Positional arguments fill the positional parameters in order, with any surplus collected by the variadic positional parameter.
/// Keyword arguments fill parameters by name, with any unknown names collected by the variadic keyword parameter.
/// Absent parameters take their default.
/// Every bound value is checked against its parameter's type; all failures are collected before returning.
pub fn bind(signature: &Signature, arguments: &Arguments) -> Result<BoundArguments, ValidationFailure> {
    let positional: Vec<&Parameter> = signature
        .parameters()
        .iter()
        .filter(|p| p.kind().is_positional())
        .collect();
    let var_positional = find_kind(signature, ParameterKind::VarPositional);
    let var_keyword = find_kind(signature, ParameterKind::VarKeyword);
    let mut failure = ValidationFailure::default();
    let mut raw: IndexMap<&str, &Value> = IndexMap::default();
    let mut surplus: Vec<&Value> = Vec::default();
    let mut surplus_keyword: IndexMap<&str, &Value> = IndexMap::default();

    for (i, value) in arguments.positional.iter().enumerate() {
        match positional.get(i) {
            Some(parameter) => {
                raw.insert(parameter.name(), value);
            }
            None => surplus.push(value),
        }
    }

    if !surplus.is_empty() && var_positional.is_none() {
        failure.extend(ValidationFailure::single(
            [LocSegment::from(ARGS_LOCATION)],
            format!(
                "{} positional arguments expected but {} given",
                positional.len(),
                arguments.positional.len()
            ),
        ));
    }

    for (name, value) in &arguments.keyword {
        match signature.get(name) {
            Some(parameter) if parameter.kind().accepts_keyword() => {
                if raw.contains_key(name.as_str()) {
                    failure.extend(ValidationFailure::single(
                        [LocSegment::from(name.as_str())],
                        MULTIPLE_VALUES,
                    ));
                } else {
                    raw.insert(parameter.name(), value);
                }
            }
            Some(parameter)
                if parameter.kind() == ParameterKind::PositionalOnly && var_keyword.is_none() =>
            {
                failure.extend(ValidationFailure::single(
                    [LocSegment::from(name.as_str())],
                    POSITIONAL_AS_KEYWORD,
                ));
            }
            _ => {
                surplus_keyword.insert(name.as_str(), value);
            }
        }
    }

    if !surplus_keyword.is_empty() && var_keyword.is_none() {
        let plural = if surplus_keyword.len() == 1 { "" } else { "s" };
        let names = surplus_keyword
            .keys()
            .map(|name| repr_value(&Value::from(*name)))
            .collect::<Vec<_>>()
            .join(", ");
        failure.extend(ValidationFailure::single(
            [LocSegment::from(KWARGS_LOCATION)],
            format!("unexpected keyword argument{plural}: {names}"),
        ));
    }

    let mut bound = BoundArguments::default();

    for parameter in signature.parameters() {
        let name = parameter.name();

        match parameter.kind() {
            ParameterKind::Receiver => {}
            ParameterKind::VarPositional => {
                let mut items = Vec::with_capacity(surplus.len());

                for (index, value) in surplus.iter().enumerate() {
                    match coerce(value, parameter.type_spec()) {
                        Ok(item) => items.push(item),
                        Err(error) => failure.extend(error.prefixed(index).prefixed(name)),
                    }
                }

                bound.insert(name, Value::Array(items));
            }
            ParameterKind::VarKeyword => {
                let mut items = serde_json::Map::default();

                for (key, value) in &surplus_keyword {
                    match coerce(value, parameter.type_spec()) {
                        Ok(item) => {
                            items.insert(key.to_string(), item);
                        }
                        Err(error) => failure.extend(error.prefixed(*key).prefixed(name)),
                    }
                }

                bound.insert(name, Value::Object(items));
            }
            _ => match (raw.get(name), parameter.default_value()) {
                (Some(value), _) => match coerce(value, parameter.type_spec()) {
                    Ok(value) => bound.insert(name, value),
                    Err(error) => failure.extend(error.prefixed(name)),
                },
                (None, Some(default)) => bound.insert(name, default.clone()),
                (None, None) => failure.extend(ValidationFailure::single(
                    [LocSegment::from(name)],
                    FIELD_REQUIRED,
                )),
            },
        }
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Bound {signature}: {bound:?}, failures: {failure:?}.");
    }

    failure.into_result()?;
    Ok(bound)
}

fn find_kind(signature: &Signature, kind: ParameterKind) -> Option<&Parameter> {
    signature.parameters().iter().find(|p| p.kind() == kind)
}

type FunctionBody = Arc<dyn Fn(BoundArguments) -> Result<Value, GroupError> + Send + Sync>;

/// A named function with a declared [`Signature`].
///
/// Wrap it with [`validate_arguments`] to have every call bound and validated before the body runs.
#[derive(Clone)]
pub struct Callable {
    name: String,
    signature: Signature,
    about: Option<String>,
    body: FunctionBody,
}

impl std::fmt::Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

impl Callable {
    /// Create a callable from its signature and body.
    pub fn new(
        name: impl Into<String>,
        signature: Signature,
        body: impl Fn(BoundArguments) -> Result<Value, GroupError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            signature,
            about: None,
            body: Arc::new(body),
        }
    }

    /// Document the callable.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// The callable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The documentation, if any.
    pub fn about_text(&self) -> Option<&str> {
        self.about.as_deref()
    }
}

/// A [`Callable`] whose arguments are bound and validated on every call.
#[derive(Debug, Clone)]
pub struct ValidatedCallable {
    callable: Callable,
}

impl ValidatedCallable {
    /// Bind `arguments` to the signature, then run the body.
    ///
    /// Returns `GroupError::Validation` (and does not run the body) if the arguments don't fit the signature.
    pub fn call(&self, arguments: Arguments) -> Result<Value, GroupError> {
        let bound = bind(&self.callable.signature, &arguments).map_err(GroupError::Validation)?;
        (self.callable.body)(bound)
    }

    /// The wrapped callable.
    pub fn callable(&self) -> &Callable {
        &self.callable
    }
}

/// Wrap `callable` so that every call validates its arguments against the declared signature.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::{validate_arguments, Arguments, Callable, GroupError, Parameter, Signature, TypeSpec, Value};
///
/// let jump = validate_arguments(Callable::new(
///     "jump",
///     Signature::new([Parameter::positional("height", TypeSpec::Float)]),
///     |bound| {
///         let height: f64 = bound.value("height")?;
///         Ok(Value::from(format!("jumping {height} feet")))
///     },
/// ));
///
/// assert_eq!(jump.call(Arguments::new().arg("3.5")).unwrap(), "jumping 3.5 feet");
/// assert!(matches!(
///     jump.call(Arguments::new().arg("abc")),
///     Err(GroupError::Validation(_))
/// ));
/// ```
pub fn validate_arguments(callable: Callable) -> ValidatedCallable {
    ValidatedCallable { callable }
}
