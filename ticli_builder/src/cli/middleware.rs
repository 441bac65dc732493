use std::env;
use std::rc::Rc;
use std::sync::Arc;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{GroupError, Instance, OptionGroup, Outcome};
use crate::cli::{
    ClapDispatch, ConsoleInterface, Diagnostics, Dispatch, DispatchError, ErrorPolicy, Parsed,
    StandIn, UserInterface,
};
use crate::constant::CHAIN_SEPARATOR;
use crate::model::{display_value, Value};
use crate::validation::{Arguments, ValidatedCallable};

/// The command line driver: dispatches tokens to a validated function, an option group, or an instance.
///
/// Tokens are split into a chain of segments by a standalone `-`.
/// Every segment after the first is applied to the same instance, so long as the previous step asked to continue ([`Outcome::Chain`]).
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use std::rc::Rc;
/// use ticli::{BufferedInterface, CommandLine, GroupDefinition, Hook, OptionDeclaration, Outcome, Parameter, TypeSpec};
///
/// let jump = GroupDefinition::new("Jump")
///     .option(OptionDeclaration::new("units", TypeSpec::literal(["feet", "inches"])).default("feet"))
///     .post_call(Hook::new([Parameter::positional("height", TypeSpec::Float)], |instance, bound| {
///         let height: f64 = bound.value("height")?;
///         let units: String = instance.get_as("units")?;
///         instance.print(format!("jumping {height} {units}"));
///         Ok(Outcome::Chain)
///     }))
///     .define()
///     .unwrap();
///
/// let buffer = Rc::new(BufferedInterface::default());
/// let tokens: Vec<String> = ["--units", "inches", "-", "3.5"].iter().map(|t| t.to_string()).collect();
/// CommandLine::new("jump")
///     .interface(buffer.clone())
///     .run_group(&jump, &tokens)
///     .unwrap();
///
/// assert_eq!(buffer.messages(), vec!["jumping 3.5 inches"]);
/// ```
pub struct CommandLine {
    program: String,
    interface: Rc<dyn UserInterface>,
    policy: ErrorPolicy,
    dispatcher: Box<dyn Dispatch>,
}

impl std::fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLine")
            .field("program", &self.program)
            .field("policy", &self.policy)
            .finish()
    }
}

impl CommandLine {
    /// Create a command line driver for `program`, on the console, raising errors, dispatched by `clap`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            interface: Rc::new(ConsoleInterface::default()),
            policy: ErrorPolicy::default(),
            dispatcher: Box::new(ClapDispatch::default()),
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

    /// Set the external dispatcher.
    pub fn dispatcher(mut self, dispatcher: impl Dispatch + 'static) -> Self {
        self.dispatcher = Box::new(dispatcher);
        self
    }

    fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new(self.program.clone())
            .interface(self.interface.clone())
            .policy(self.policy)
    }

    /// Run `callable` against the tokens; the result (if not null) is printed.
    pub fn run_function(
        &self,
        callable: &ValidatedCallable,
        tokens: &[String],
    ) -> Result<Value, DispatchError> {
        self.report(self.function(callable, tokens))
    }

    /// Construct `group` from the tokens, then run the chain; the final value (if not null) is printed.
    ///
    /// The first segment constructs the group (and may call a member: a method or a command).
    /// When it is also the last segment, the instance is invoked without arguments.
    pub fn run_group(
        &self,
        group: &Arc<OptionGroup>,
        tokens: &[String],
    ) -> Result<Value, DispatchError> {
        self.report(self.group(group, tokens))
    }

    /// Run the chain against an existing instance; the final value (if not null) is printed.
    pub fn run_instance(
        &self,
        instance: &mut Instance,
        tokens: &[String],
    ) -> Result<Value, DispatchError> {
        self.report(self.chain(instance, Outcome::Chain, segments(tokens)))
    }

    /// Run `callable` against the command line arguments of the process.
    /// If an error is encountered, exits with the respective error code (via [`std::process::exit`]).
    pub fn fire_function(self, callable: &ValidatedCallable) -> Value {
        let tokens: Vec<String> = env::args().skip(1).collect();
        let command_line = self.policy(ErrorPolicy::Exit);
        exit_on_error(command_line.run_function(callable, &tokens))
    }

    /// Construct `group` and run the chain against the command line arguments of the process.
    /// If an error is encountered, exits with the respective error code (via [`std::process::exit`]).
    pub fn fire_group(self, group: &Arc<OptionGroup>) -> Value {
        let tokens: Vec<String> = env::args().skip(1).collect();
        let command_line = self.policy(ErrorPolicy::Exit);
        exit_on_error(command_line.run_group(group, &tokens))
    }

    /// Run the chain against `instance` with the command line arguments of the process.
    /// If an error is encountered, exits with the respective error code (via [`std::process::exit`]).
    pub fn fire_instance(self, instance: &mut Instance) -> Value {
        let tokens: Vec<String> = env::args().skip(1).collect();
        let command_line = self.policy(ErrorPolicy::Exit);
        exit_on_error(command_line.run_instance(instance, &tokens))
    }

    fn function(
        &self,
        callable: &ValidatedCallable,
        tokens: &[String],
    ) -> Result<Value, DispatchError> {
        let mut segments = segments(tokens).into_iter();
        let first = segments.next().unwrap_or_default();
        let stand_in = StandIn::function(self.program.clone(), callable.callable());

        let arguments = match self.parse(&stand_in, &first)? {
            Some((arguments, _)) => arguments,
            None => return Ok(Value::Null),
        };

        let value = match callable.call(arguments.clone()) {
            Ok(value) => value,
            Err(GroupError::Validation(failure)) => {
                let positional_names = callable.callable().signature().positional_names();
                return Err(self
                    .diagnostics()
                    .escalate(failure, &arguments, &positional_names)
                    .into());
            }
            Err(error) => return Err(error.into()),
        };

        self.terminal(value, segments.collect())
    }

    fn group(
        &self,
        group: &Arc<OptionGroup>,
        tokens: &[String],
    ) -> Result<Value, DispatchError> {
        let mut segments = segments(tokens).into_iter();
        let first = segments.next().unwrap_or_default();
        let stand_in = StandIn::construction(self.program.clone(), group);

        let (arguments, member) = match self.parse(&stand_in, &first)? {
            Some(parsed) => parsed,
            None => return Ok(Value::Null),
        };

        let mut instance = group.construct_with(self.diagnostics(), arguments)?;
        let remaining: Vec<Vec<String>> = segments.collect();

        let outcome = match member {
            Some((name, arguments)) => instance.call_member(&name, arguments)?,
            None if remaining.is_empty() => instance.invoke(Arguments::new())?,
            None => Outcome::Chain,
        };

        self.chain(&mut instance, outcome, remaining)
    }

    fn chain(
        &self,
        instance: &mut Instance,
        outcome: Outcome,
        segments: Vec<Vec<String>>,
    ) -> Result<Value, DispatchError> {
        let mut outcome = outcome;
        let mut segments = segments.into_iter();

        loop {
            match outcome {
                Outcome::Value(value) => return self.terminal(value, segments.collect()),
                Outcome::Chain => {
                    let segment = match segments.next() {
                        Some(segment) => segment,
                        None => return Ok(Value::Null),
                    };
                    let stand_in = StandIn::invocation(self.program.clone(), instance);

                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Chain segment {segment:?}.");
                    }

                    outcome = match self.parse(&stand_in, &segment)? {
                        Some((arguments, Some((name, member_arguments)))) => {
                            instance.override_options(arguments)?;
                            instance.call_member(&name, member_arguments)?
                        }
                        Some((arguments, None)) => instance.invoke(arguments)?,
                        None => return Ok(Value::Null),
                    };
                }
            }
        }
    }

    /// Dispatch a segment; `None` means help was printed.
    fn parse(
        &self,
        stand_in: &StandIn,
        segment: &[String],
    ) -> Result<Option<(Arguments, Option<(String, Arguments)>)>, DispatchError> {
        match self.dispatcher.dispatch(stand_in, segment)? {
            Parsed::Help(help) => {
                self.interface.print(help);
                Ok(None)
            }
            Parsed::Call { arguments, member } => Ok(Some((arguments, member))),
        }
    }

    fn terminal(&self, value: Value, remaining: Vec<Vec<String>>) -> Result<Value, DispatchError> {
        if !remaining.is_empty() {
            let tokens = remaining
                .into_iter()
                .map(|segment| segment.join(" "))
                .collect();
            return Err(DispatchError::Unconsumed(tokens));
        }

        if !value.is_null() {
            self.interface.print(display_value(&value));
        }

        Ok(value)
    }

    fn report(&self, result: Result<Value, DispatchError>) -> Result<Value, DispatchError> {
        match &result {
            // Validation failures have already been reported, line by line.
            Err(DispatchError::Group(GroupError::Validation(_))) | Ok(_) => {}
            // The dispatcher renders its own usage diagnostic.
            Err(DispatchError::Usage(usage)) => self.interface.print_error(usage.clone()),
            Err(error) => self.interface.print_error(format!("{}: error: {error}", self.program)),
        }

        result
    }
}

fn exit_on_error(result: Result<Value, DispatchError>) -> Value {
    match result {
        Ok(value) => value,
        Err(error) => std::process::exit(error.exit_code()),
    }
}

fn segments(tokens: &[String]) -> Vec<Vec<String>> {
    tokens
        .split(|token| token == CHAIN_SEPARATOR)
        .map(<[String]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GroupDefinition, Hook, OptionDeclaration, Parameter, Signature};
    use crate::cli::BufferedInterface;
    use crate::model::TypeSpec;
    use crate::test::assert_contains;
    use crate::validation::{validate_arguments, Callable};
    use rstest::rstest;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn command_line() -> (Rc<BufferedInterface>, CommandLine) {
        let buffer = Rc::new(BufferedInterface::default());
        let command_line = CommandLine::new("jump").interface(buffer.clone());
        (buffer, command_line)
    }

    fn jump_function() -> ValidatedCallable {
        validate_arguments(Callable::new(
            "jump",
            Signature::new([Parameter::positional("height", TypeSpec::Float)]),
            |bound| {
                let height: f64 = bound.value("height")?;
                Ok(Value::from(format!("jumping {height} feet")))
            },
        ))
    }

    fn jump_group() -> Arc<OptionGroup> {
        GroupDefinition::new("Jump")
            .option(
                OptionDeclaration::new("units", TypeSpec::literal(["feet", "inches"]))
                    .default("feet"),
            )
            .post_call(Hook::new(
                [Parameter::positional("height", TypeSpec::Float)],
                |instance, bound| {
                    let height: f64 = bound.value("height")?;
                    let units: String = instance.get_as("units")?;
                    instance.print(format!("jumping {height} {units}"));
                    Ok(Outcome::Chain)
                },
            ))
            .method(
                "shout",
                Hook::new(
                    [Parameter::positional("message", TypeSpec::Str)],
                    |_, bound| {
                        let message: String = bound.value("message")?;
                        Ok(Outcome::Value(Value::from(message.to_uppercase())))
                    },
                ),
            )
            .define()
            .unwrap()
    }

    fn greet_group() -> Arc<OptionGroup> {
        GroupDefinition::new("Greet")
            .option(OptionDeclaration::new("name", TypeSpec::Str).default("World"))
            .post_call(Hook::new(Vec::<Parameter>::new(), |instance, _| {
                let name: String = instance.get_as("name")?;
                instance.print(format!("Hello {name}!"));
                Ok(Outcome::Chain)
            }))
            .define()
            .unwrap()
    }

    #[rstest]
    #[case(vec![], vec![vec![]])]
    #[case(vec!["a"], vec![vec!["a"]])]
    #[case(vec!["a", "-", "b", "c"], vec![vec!["a"], vec!["b", "c"]])]
    #[case(vec!["-"], vec![vec![], vec![]])]
    #[case(vec!["--a", "-1", "-", "-"], vec![vec!["--a", "-1"], vec![], vec![]])]
    fn split_segments(#[case] input: Vec<&str>, #[case] expected: Vec<Vec<&str>>) {
        let expected: Vec<Vec<String>> = expected.iter().map(|s| tokens(s)).collect();
        assert_eq!(segments(&tokens(&input)), expected);
    }

    #[test]
    fn run_function() {
        // Setup
        let (buffer, command_line) = command_line();

        // Execute
        let value = command_line
            .run_function(&jump_function(), &tokens(&["3.5"]))
            .unwrap();

        // Verify
        assert_eq!(value, "jumping 3.5 feet");
        assert_eq!(buffer.messages(), vec!["jumping 3.5 feet"]);
        assert!(buffer.errors().is_empty());
    }

    #[test]
    fn run_function_invalid() {
        // Setup
        let (buffer, command_line) = command_line();

        // Execute
        let error = command_line
            .run_function(&jump_function(), &tokens(&["abc"]))
            .unwrap_err();

        // Verify
        assert_matches!(error, DispatchError::Group(GroupError::Validation(_)));
        assert_eq!(error.exit_code(), 1);
        assert!(buffer.messages().is_empty());
        let errors = buffer.errors();
        assert_eq!(errors.len(), 1);
        assert_contains!(errors[0], "height");
        assert_contains!(errors[0], "abc");
    }

    #[test]
    fn run_function_unconsumed() {
        // Setup
        let (buffer, command_line) = command_line();

        // Execute
        let error = command_line
            .run_function(&jump_function(), &tokens(&["3.5", "-", "x", "y"]))
            .unwrap_err();

        // Verify
        assert_matches!(error, DispatchError::Unconsumed(ref remaining) => {
            assert_eq!(remaining, &vec!["x y".to_string()]);
        });
        assert!(buffer.messages().is_empty());
        assert_contains!(buffer.errors()[0], "could not consume");
    }

    #[test]
    fn run_function_usage() {
        let (buffer, command_line) = command_line();

        let error = command_line
            .run_function(&jump_function(), &tokens(&["--unknown"]))
            .unwrap_err();

        assert_matches!(error, DispatchError::Usage(_));
        assert_eq!(buffer.errors().len(), 1);
        assert_contains!(buffer.errors()[0], "--unknown");
    }

    #[test]
    fn run_function_help() {
        let (buffer, command_line) = command_line();

        let value = command_line
            .run_function(&jump_function(), &tokens(&["--help"]))
            .unwrap();

        assert_eq!(value, Value::Null);
        assert!(buffer
            .messages()
            .iter()
            .any(|line| line.contains("HEIGHT")));
    }

    #[test]
    fn run_group_chain() {
        // Setup
        let (buffer, command_line) = command_line();

        // Execute
        let value = command_line
            .run_group(
                &jump_group(),
                &tokens(&["--units", "inches", "-", "2", "-", "3.5", "--units", "feet"]),
            )
            .unwrap();

        // Verify
        assert_eq!(value, Value::Null);
        assert_eq!(
            buffer.messages(),
            vec!["jumping 2 inches", "jumping 3.5 feet"]
        );
    }

    #[test]
    fn run_group_bare_invocation() {
        // Setup
        let (buffer, command_line) = command_line();

        // Execute
        command_line
            .run_group(&greet_group(), &tokens(&["--name", "Alice"]))
            .unwrap();

        // Verify
        assert_eq!(buffer.messages(), vec!["Hello Alice!"]);
    }

    #[test]
    fn run_group_member() {
        // Setup
        let (buffer, command_line) = command_line();

        // Execute
        let value = command_line
            .run_group(&jump_group(), &tokens(&["shout", "hi"]))
            .unwrap();

        // Verify
        assert_eq!(value, "HI");
        assert_eq!(buffer.messages(), vec!["HI"]);
    }

    #[test]
    fn run_group_invalid_option() {
        // Setup
        let (buffer, command_line) = command_line();

        // Execute
        let error = command_line
            .run_group(&jump_group(), &tokens(&["--units", "miles", "-", "2"]))
            .unwrap_err();

        // Verify
        assert_matches!(error, DispatchError::Group(GroupError::Validation(_)));
        assert!(buffer.messages().is_empty());
        assert_contains!(buffer.errors()[0], "units");
        assert_contains!(buffer.errors()[0], "miles");
    }

    fn sum_group() -> Arc<OptionGroup> {
        GroupDefinition::new("Sum")
            .option(OptionDeclaration::new("scale", TypeSpec::Int).default(1))
            .post_call(Hook::new(
                [
                    Parameter::positional("first", TypeSpec::Int),
                    Parameter::var_positional("rest", TypeSpec::Int),
                ],
                |instance, bound| {
                    let first: i64 = bound.value("first")?;
                    let rest: Vec<i64> = bound.value("rest")?;
                    let scale: i64 = instance.get_as("scale")?;
                    instance.print(format!("first={first} scale={scale} rest={rest:?}"));
                    Ok(Outcome::Chain)
                },
            ))
            .define()
            .unwrap()
    }

    #[rstest]
    #[case(vec!["-", "2", "--scale", "5", "3", "4"], vec!["first=2 scale=5 rest=[3, 4]"])]
    #[case(vec!["-", "2", "3", "4"], vec!["first=2 scale=1 rest=[3, 4]"])]
    #[case(vec!["--scale", "3", "-", "2", "-", "1", "7"], vec!["first=2 scale=3 rest=[]", "first=1 scale=3 rest=[7]"])]
    fn run_group_variadic(#[case] input: Vec<&str>, #[case] expected: Vec<&str>) {
        // Setup
        let (buffer, command_line) = command_line();

        // Execute
        command_line.run_group(&sum_group(), &tokens(&input)).unwrap();

        // Verify
        assert_eq!(buffer.messages(), expected);
        assert!(buffer.errors().is_empty());
    }

    fn top_group() -> Arc<OptionGroup> {
        let farewell = GroupDefinition::new("Farewell")
            .option(
                OptionDeclaration::new("dialect", TypeSpec::literal(["formal", "informal"]))
                    .default("formal"),
            )
            .post_call(Hook::new(Vec::<Parameter>::new(), |instance, _| {
                let verbose: bool = instance.parent_get_as("verbose")?;
                let dialect: String = instance.get_as("dialect")?;

                if verbose {
                    instance.print("getting ready to bid you farewell");
                }

                instance.print(if dialect == "informal" { "Bye!" } else { "Goodbye." });
                Ok(Outcome::Chain)
            }))
            .define()
            .unwrap();

        GroupDefinition::new("Top")
            .option(OptionDeclaration::new("verbose", TypeSpec::Bool).default(false))
            .method(
                "greet",
                Hook::new(Vec::<Parameter>::new(), |instance, _| {
                    instance.print("Hello.");
                    Ok(Outcome::Chain)
                }),
            )
            .command("farewell", &farewell)
            .define()
            .unwrap()
    }

    #[rstest]
    #[case(vec!["farewell"], vec!["Goodbye."])]
    #[case(vec!["--verbose", "farewell", "--dialect", "informal"], vec!["getting ready to bid you farewell", "Bye!"])]
    #[case(vec!["farewell", "-", "greet", "-", "--verbose", "farewell"], vec!["Goodbye.", "Hello.", "getting ready to bid you farewell", "Goodbye."])]
    #[case(vec!["farewell", "--dialect", "informal", "-", "farewell"], vec!["Bye!", "Bye!"])]
    fn run_group_command(#[case] input: Vec<&str>, #[case] expected: Vec<&str>) {
        // Setup
        let (buffer, command_line) = command_line();

        // Execute
        let value = command_line.run_group(&top_group(), &tokens(&input)).unwrap();

        // Verify
        assert_eq!(value, Value::Null);
        assert_eq!(buffer.messages(), expected);
        assert!(buffer.errors().is_empty());
    }

    #[test]
    fn run_group_command_help() {
        let (buffer, command_line) = command_line();

        command_line
            .run_group(&top_group(), &tokens(&["farewell", "--help"]))
            .unwrap();

        assert!(buffer
            .messages()
            .iter()
            .any(|line| line.contains("--dialect <DIALECT>")));
    }

    #[test]
    fn run_instance() {
        // Setup
        let (buffer, command_line) = command_line();
        let diagnostics = Diagnostics::new("jump").interface(buffer.clone());
        let mut instance = jump_group()
            .construct_with(diagnostics, Arguments::new().kwarg("units", "inches"))
            .unwrap();

        // Execute
        command_line
            .run_instance(&mut instance, &tokens(&["1", "-", "2"]))
            .unwrap();

        // Verify
        assert_eq!(buffer.messages(), vec!["jumping 1 inches", "jumping 2 inches"]);
        assert_eq!(instance.get("units").unwrap(), "inches");
    }

    #[test]
    fn run_instance_member_with_overrides() {
        // Setup
        let (buffer, command_line) = command_line();
        let diagnostics = Diagnostics::new("jump").interface(buffer.clone());
        let mut instance = jump_group()
            .construct_with(diagnostics, Arguments::new())
            .unwrap();

        // Execute
        let value = command_line
            .run_instance(&mut instance, &tokens(&["--units", "inches", "shout", "hey"]))
            .unwrap();

        // Verify
        assert_eq!(value, "HEY");
        assert_eq!(instance.get("units").unwrap(), "inches");
    }

    #[test]
    fn run_instance_missing_value() {
        let (buffer, command_line) = command_line();
        let mut instance = jump_group()
            .construct_with(Diagnostics::new("jump").interface(buffer.clone()), Arguments::new())
            .unwrap();

        let error = command_line
            .run_instance(&mut instance, &tokens(&["--height"]))
            .unwrap_err();

        assert_matches!(error, DispatchError::Usage(_));
        assert_eq!(error.exit_code(), 2);
    }
}
