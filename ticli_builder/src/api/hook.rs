use std::sync::Arc;

use thiserror::Error;

use crate::api::{Instance, Parameter, Signature};
use crate::model::Value;
use crate::validation::{BoundArguments, ValidationFailure};

/// An error raised while constructing, invoking, or inspecting an option group instance.
#[derive(Debug, Error, PartialEq)]
#[allow(missing_docs)]
pub enum GroupError {
    /// The supplied arguments or option values did not validate.
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// Neither an option nor an ordinary attribute has this name.
    #[error("no option or attribute named '{name}'.")]
    AttributeNotFound { name: String },

    /// The group has no method of this name.
    #[error("no member named '{name}'.")]
    UnknownMember { name: String },

    /// A value could not be converted to the requested Rust type.
    #[error("cannot extract '{name}': {message}.")]
    Extract { name: String, message: String },

    /// A hook body failed.
    #[error("{0}")]
    Hook(String),
}

/// The result of a hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A terminal result.
    Value(Value),
    /// Continue with the next component of a chain, on the same instance.
    Chain,
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Outcome::Value(value)
    }
}

type HookBody = Arc<dyn Fn(&mut Instance, BoundArguments) -> Result<Outcome, GroupError> + Send + Sync>;

/// A user-supplied step of an option group: the post-construction hook, the post-invocation hook, or a named method.
///
/// The signature excludes the receiver; the body receives the instance separately, along with the bound arguments.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::{Hook, Outcome, Parameter, TypeSpec};
///
/// let jump = Hook::new([Parameter::positional("height", TypeSpec::Float)], |instance, bound| {
///     let height: f64 = bound.value("height")?;
///     instance.print(format!("jumping {height} feet"));
///     Ok(Outcome::Chain)
/// })
/// .about("Jump into the air.");
///
/// assert_eq!(jump.signature().to_string(), "(height: float)");
/// ```
#[derive(Clone)]
pub struct Hook {
    signature: Signature,
    about: Option<String>,
    body: HookBody,
}

impl std::fmt::Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook")
            .field("signature", &self.signature)
            .field("about", &self.about)
            .finish()
    }
}

impl Hook {
    /// Create a hook taking `parameters`.
    pub fn new(
        parameters: impl IntoIterator<Item = Parameter>,
        body: impl Fn(&mut Instance, BoundArguments) -> Result<Outcome, GroupError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            signature: Signature::new(parameters),
            about: None,
            body: Arc::new(body),
        }
    }

    /// The stand-in for a hook the group does not provide: no parameters, returns null.
    pub fn noop() -> Self {
        Self::new(Vec::<Parameter>::new(), |_, _| Ok(Outcome::Value(Value::Null)))
    }

    /// Document the hook.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// The signature, without the receiver.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The documentation, if any.
    pub fn about_text(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Run the body directly, with already bound arguments.
    ///
    /// This is how a hook reuses the hook of a base group.
    pub fn call(&self, instance: &mut Instance, bound: BoundArguments) -> Result<Outcome, GroupError> {
        (self.body)(instance, bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop() {
        let hook = Hook::noop();

        assert!(hook.signature().is_empty());
        assert_eq!(hook.about_text(), None);
    }

    #[test]
    fn about() {
        let hook = Hook::noop()
            .about("--this will get discarded--")
            .about("Say hello.");

        assert_eq!(hook.about_text(), Some("Say hello."));
    }

    #[test]
    fn outcome_from_value() {
        assert_eq!(Outcome::from(Value::from(1)), Outcome::Value(Value::from(1)));
    }

    #[test]
    fn group_error_display() {
        assert_eq!(
            GroupError::AttributeNotFound {
                name: "x".to_string()
            }
            .to_string(),
            "no option or attribute named 'x'."
        );
        assert_eq!(
            GroupError::Extract {
                name: "x".to_string(),
                message: "invalid type".to_string()
            }
            .to_string(),
            "cannot extract 'x': invalid type."
        );
    }
}
