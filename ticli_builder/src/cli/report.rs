use std::env;
use std::path::Path;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::GroupError;
use crate::cli::{ConsoleInterface, UserInterface};
use crate::constant::DEFAULT_PROGRAM;
use crate::model::{display_value, Value};
use crate::validation::{Arguments, ValidationFailure};

/// Formats validation failures as user-facing diagnostic lines.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::{check_type, Reporter, TypeSpec, Value};
///
/// let failure = check_type("height", &Value::from("abc"), &TypeSpec::Float).unwrap_err();
/// let lines = Reporter::new("jump").report(&failure, &Default::default(), &["height".to_string()], &[Value::from("abc")]);
///
/// assert_eq!(
///     lines,
///     vec!["jump: error: invalid value 'abc' supplied for argument 'height': value is not a valid float"]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reporter {
    program: String,
}

impl Reporter {
    /// Create a reporter for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program name prefixing every line.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// One line per distinct error of `failure`.
    ///
    /// The offending value is resolved from the supplied keyword values, then from the positional names zipped with the positional values (positional wins).
    /// When no value can be resolved the value clause is omitted.
    pub fn report(
        &self,
        failure: &ValidationFailure,
        keyword_values: &IndexMap<String, Value>,
        positional_names: &[String],
        positional_values: &[Value],
    ) -> Vec<String> {
        let mut supplied: IndexMap<&str, &Value> = keyword_values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();

        for (name, value) in positional_names.iter().zip(positional_values) {
            supplied.insert(name.as_str(), value);
        }

        let mut lines: IndexSet<String> = IndexSet::default();

        for entry in failure.errors() {
            let location = entry.location();
            let value = match supplied.get(location.as_str()) {
                Some(value) => format!("'{}' ", display_value(value)),
                None => String::default(),
            };
            lines.insert(format!(
                "{program}: error: invalid value {value}supplied for argument '{location}': {message}",
                program = self.program,
                message = entry.message(),
            ));
        }

        lines.into_iter().collect()
    }
}

/// What happens after a validation failure has been reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Return `GroupError::Validation` to the caller.
    #[default]
    Raise,
    /// Exit the process with status `1`.
    Exit,
}

/// The diagnostic path of an option group instance: program name, output sink, and error policy.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use std::rc::Rc;
/// use ticli::{BufferedInterface, Diagnostics, ErrorPolicy};
///
/// let buffer = Rc::new(BufferedInterface::default());
/// let diagnostics = Diagnostics::new("jump")
///     .interface(buffer.clone())
///     .policy(ErrorPolicy::Raise);
///
/// diagnostics.print("hello".to_string());
/// assert_eq!(buffer.messages(), vec!["hello"]);
/// ```
#[derive(Clone)]
pub struct Diagnostics {
    reporter: Reporter,
    interface: Rc<dyn UserInterface>,
    policy: ErrorPolicy,
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("reporter", &self.reporter)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Default for Diagnostics {
    /// Report to the console as the running program, and raise.
    fn default() -> Self {
        Self::new(program_name())
    }
}

impl Diagnostics {
    /// Create diagnostics for `program`, reporting to the console, and raising.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            reporter: Reporter::new(program),
            interface: Rc::new(ConsoleInterface::default()),
            policy: ErrorPolicy::default(),
        }
    }

    /// Set the output sink.
    pub fn interface(mut self, interface: Rc<dyn UserInterface>) -> Self {
        self.interface = interface;
        self
    }

    /// Set the error policy.
    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The program name used in diagnostics.
    pub fn program(&self) -> &str {
        self.reporter.program()
    }

    /// The error policy.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Display a regular message.
    pub fn print(&self, message: String) {
        self.interface.print(message);
    }

    /// Display an error diagnostic.
    pub fn print_error(&self, message: String) {
        self.interface.print_error(message);
    }

    /// Report `failure` (resolving values from `arguments`), then exit or hand back the error per the policy.
    pub fn escalate(
        &self,
        failure: ValidationFailure,
        arguments: &Arguments,
        positional_names: &[String],
    ) -> GroupError {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Escalating ({:?}): {failure:?}.", self.policy);
        }

        for line in self.reporter.report(
            &failure,
            arguments.keyword(),
            positional_names,
            arguments.positional(),
        ) {
            self.interface.print_error(line);
        }

        match self.policy {
            ErrorPolicy::Raise => GroupError::Validation(failure),
            ErrorPolicy::Exit => std::process::exit(1),
        }
    }
}

/// The file name of the running program.
pub(crate) fn program_name() -> String {
    env::args()
        .next()
        .as_deref()
        .and_then(|path| Path::new(path).file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_PROGRAM.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::util::buffered;
    use crate::validation::{ErrorEntry, LocSegment};
    use serde_json::json;

    fn entry(loc: &[&str], message: &str) -> ErrorEntry {
        ErrorEntry::new(
            loc.iter().map(|segment| match segment.parse::<usize>() {
                Ok(index) => LocSegment::Index(index),
                Err(_) => LocSegment::from(*segment),
            }),
            message,
        )
    }

    #[test]
    fn report_resolves_values() {
        // Setup
        let failure = ValidationFailure::new([
            entry(&["height"], "value is not a valid float"),
            entry(&["units"], "unexpected value; permitted: 'feet', 'inches'"),
            entry(&["times"], "field required"),
        ]);
        let keyword = IndexMap::from([
            ("units".to_string(), json!("yards")),
            ("height".to_string(), json!("ignored")),
        ]);

        // Execute
        let lines = Reporter::new("jump").report(
            &failure,
            &keyword,
            &["height".to_string()],
            &[json!("abc")],
        );

        // Verify
        assert_eq!(
            lines,
            vec![
                "jump: error: invalid value 'abc' supplied for argument 'height': value is not a valid float",
                "jump: error: invalid value 'yards' supplied for argument 'units': unexpected value; permitted: 'feet', 'inches'",
                "jump: error: invalid value supplied for argument 'times': field required",
            ]
        );
    }

    #[test]
    fn report_nested_location() {
        let failure = ValidationFailure::new([
            entry(&["points", "1", "x"], "field required"),
            entry(&["numbers", "0"], "value is not a valid integer"),
        ]);

        let lines = Reporter::new("p").report(&failure, &IndexMap::default(), &[], &[]);

        assert_eq!(
            lines,
            vec![
                "p: error: invalid value supplied for argument 'points 1 -> x': field required",
                "p: error: invalid value supplied for argument 'numbers 0': value is not a valid integer",
            ]
        );
    }

    #[test]
    fn report_non_string_value() {
        let failure = ValidationFailure::new([entry(&["tags"], "value is not a valid list")]);
        let keyword = IndexMap::from([("tags".to_string(), json!({"a": 1}))]);

        let lines = Reporter::new("p").report(&failure, &keyword, &[], &[]);

        assert_eq!(
            lines,
            vec!["p: error: invalid value '{\"a\":1}' supplied for argument 'tags': value is not a valid list"]
        );
    }

    #[test]
    fn report_deduplicates() {
        // Setup
        let failure = ValidationFailure::new([
            entry(&["height"], "value is not a valid float"),
            entry(&["height"], "value is not a valid float"),
            entry(&["height"], "field required"),
        ]);

        // Execute
        let lines = Reporter::new("jump").report(
            &failure,
            &IndexMap::from([("height".to_string(), json!("x"))]),
            &[],
            &[],
        );

        // Verify
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn escalate_raise() {
        // Setup
        let (buffer, diagnostics) = buffered("jump");
        let failure = ValidationFailure::new([entry(&["height"], "value is not a valid float")]);

        // Execute
        let error = diagnostics.escalate(
            failure.clone(),
            &Arguments::new().arg("abc"),
            &["height".to_string()],
        );

        // Verify
        assert_eq!(error, GroupError::Validation(failure));
        assert_eq!(
            buffer.errors(),
            vec!["jump: error: invalid value 'abc' supplied for argument 'height': value is not a valid float"]
        );
        assert!(buffer.messages().is_empty());
        assert_eq!(diagnostics.program(), "jump");
        assert_eq!(diagnostics.error_policy(), ErrorPolicy::Raise);
    }

    #[test]
    fn program_name_present() {
        assert!(!program_name().is_empty());
    }
}
