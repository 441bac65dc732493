use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use indexmap::IndexMap;
use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{GroupError, Instance, OptionGroup, Parameter, ParameterKind, Signature};
use crate::model::{display_value, Value};
use crate::validation::{Arguments, Callable};

/// An error raised while dispatching command line tokens.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The tokens don't fit the command line (as reported by the dispatcher).
    #[error("{0}")]
    Usage(String),

    /// The target rejected the dispatched call.
    #[error(transparent)]
    Group(#[from] GroupError),

    /// A terminal value was produced, yet chain components remain.
    #[error("could not consume the remaining components: {}", .0.join(" "))]
    Unconsumed(Vec<String>),
}

impl DispatchError {
    /// The process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::Usage(_) => 2,
            DispatchError::Group(_) | DispatchError::Unconsumed(_) => 1,
        }
    }
}

/// The signature, defaults, and documentation published to the dispatcher for one command.
///
/// Members (the methods and commands of an option group) are published as sub-commands.
#[derive(Debug, Clone, PartialEq)]
pub struct StandIn {
    program: String,
    about: Option<String>,
    signature: Signature,
    defaults: IndexMap<String, Value>,
    members: Vec<StandIn>,
}

impl StandIn {
    /// Create a stand-in for `program` taking `signature` (without a receiver).
    pub fn new(program: impl Into<String>, signature: Signature) -> Self {
        Self {
            program: program.into(),
            about: None,
            signature,
            defaults: IndexMap::default(),
            members: Vec::default(),
        }
    }

    /// Document the command.
    /// Empty messages are ignored.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        let description = description.into();

        if !description.is_empty() {
            self.about.replace(description);
        }

        self
    }

    /// Publish the current defaults; these take precedence over the signature's own defaults in the help.
    pub fn defaults(mut self, defaults: IndexMap<String, Value>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add a member sub-command.
    pub fn member(mut self, member: StandIn) -> Self {
        self.members.push(member);
        self
    }

    /// The stand-in of a validated function.
    pub fn function(program: impl Into<String>, callable: &Callable) -> Self {
        let stand_in = StandIn::new(program, callable.signature().clone());

        match callable.about_text() {
            Some(about) => stand_in.about(about),
            None => stand_in,
        }
    }

    /// The construction stand-in of an option group: the composite construction signature, the option defaults, and the members.
    pub fn construction(program: impl Into<String>, group: &OptionGroup) -> Self {
        let commands = group
            .commands()
            .map(|(name, command)| (name, command.as_ref(), declared_defaults(command)));

        StandIn::new(program, group.construction_signature().clone())
            .about(group.about())
            .defaults(declared_defaults(group))
            .with_methods(group)
            .with_commands(commands)
    }

    /// The invocation stand-in of an instance: the composite invocation signature, the current option data, and the members.
    pub fn invocation(program: impl Into<String>, instance: &Instance) -> Self {
        let group = instance.group();
        let commands = instance
            .commands()
            .map(|(name, command)| (name, command.group().as_ref(), command.defaults().clone()));

        StandIn::new(program, call_signature(group))
            .about(group.about())
            .defaults(instance.defaults().clone())
            .with_methods(group)
            .with_commands(commands)
    }

    fn with_methods(self, group: &OptionGroup) -> Self {
        group.methods().fold(self, |stand_in, (name, hook)| {
            let member = StandIn::new(name, hook.signature().clone())
                .about(hook.about_text().unwrap_or_default());
            stand_in.member(member)
        })
    }

    fn with_commands<'a>(
        self,
        commands: impl Iterator<Item = (&'a str, &'a OptionGroup, IndexMap<String, Value>)>,
    ) -> Self {
        commands.fold(self, |stand_in, (name, group, defaults)| {
            let member = StandIn::new(name, call_signature(group))
                .about(group.about())
                .defaults(defaults);
            stand_in.member(member)
        })
    }

    /// The program (or member) name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The published signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The published defaults.
    pub fn published_defaults(&self) -> &IndexMap<String, Value> {
        &self.defaults
    }

    /// The member sub-commands.
    pub fn members(&self) -> &[StandIn] {
        &self.members
    }

    fn default_of<'a>(&'a self, parameter: &'a Parameter) -> Option<&'a Value> {
        self.defaults
            .get(parameter.name())
            .or_else(|| parameter.default_value())
    }
}

fn declared_defaults(group: &OptionGroup) -> IndexMap<String, Value> {
    group
        .options()
        .iter()
        .filter_map(|option| {
            option
                .default_value()
                .map(|default| (option.name().to_string(), default.clone()))
        })
        .collect()
}

// The invocation signature without its receiver.
fn call_signature(group: &OptionGroup) -> Signature {
    Signature::new(
        group
            .invocation_signature()
            .parameters()
            .iter()
            .filter(|p| p.kind() != ParameterKind::Receiver)
            .cloned(),
    )
}

/// The outcome of dispatching tokens against a [`StandIn`].
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Help was requested; the rendered help message.
    Help(String),
    /// The arguments for the command, and for the member sub-command if one was selected.
    Call {
        /// Arguments for the command itself.
        arguments: Arguments,
        /// The selected member, with its arguments.
        member: Option<(String, Arguments)>,
    },
}

/// Behaviour of the external command line dispatcher: turn tokens into call arguments, guided by a stand-in.
///
/// Values are handed back as given (typically strings); coercion is left to the validator.
pub trait Dispatch {
    /// Parse `tokens` (excluding the program name) against `stand_in`.
    fn dispatch(&self, stand_in: &StandIn, tokens: &[String]) -> Result<Parsed, DispatchError>;
}

/// The [`Dispatch`] implementation on top of `clap`.
///
/// * Required positional parameters are positional arguments, also accepted as `--name VALUE`.
/// * All other parameters (options included) are `--name VALUE`; booleans are `--name` or `--name=false`.
/// * A variadic positional parameter takes the trailing positional values.
#[derive(Debug, Clone, Default)]
pub struct ClapDispatch {}

impl ClapDispatch {
    fn command(stand_in: &StandIn) -> Command {
        let mut command = Command::new(stand_in.program.clone())
            .no_binary_name(true)
            .disable_help_subcommand(true);

        if let Some(about) = &stand_in.about {
            command = command.about(about.clone());
        }

        let mut variadic = false;

        for parameter in stand_in.signature.parameters() {
            let name = parameter.name().to_string();
            let help = help_text(parameter, stand_in.default_of(parameter));

            match parameter.kind() {
                ParameterKind::Receiver | ParameterKind::VarKeyword => {}
                ParameterKind::VarPositional => {
                    variadic = true;
                    command = command.arg(
                        Arg::new(name.clone())
                            .value_name(name.to_ascii_uppercase())
                            .num_args(1..)
                            .required(false)
                            .allow_negative_numbers(true)
                            .help(help),
                    );
                }
                ParameterKind::PositionalOnly if !variadic => {
                    command = command.arg(positional(&name, help));
                }
                ParameterKind::PositionalOrKeyword if !variadic && parameter.is_required() => {
                    command = command
                        .arg(positional(&name, help.clone()))
                        .arg(long(parameter, long_id(&name)).conflicts_with(name.clone()).hide(true));
                }
                _ => {
                    command = command.arg(long(parameter, name.clone()).help(help));
                }
            }
        }

        for member in &stand_in.members {
            command = command.subcommand(Self::command(member));
        }

        command
    }
}

fn long_id(name: &str) -> String {
    format!("{name}.keyword")
}

fn positional(name: &str, help: String) -> Arg {
    Arg::new(name.to_string())
        .value_name(name.to_ascii_uppercase())
        .required(false)
        .allow_negative_numbers(true)
        .help(help)
}

fn long(parameter: &Parameter, id: String) -> Arg {
    let arg = Arg::new(id)
        .long(parameter.name().to_string())
        .value_name(parameter.name().to_ascii_uppercase())
        .allow_negative_numbers(true);

    if parameter.type_spec().is_bool() {
        arg.num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
    } else if parameter.type_spec().is_list() {
        arg.action(ArgAction::Append)
    } else {
        arg.action(ArgAction::Set)
    }
}

fn help_text(parameter: &Parameter, default: Option<&Value>) -> String {
    let mut pieces: Vec<String> = Vec::default();

    if let Some(help) = parameter.help_text() {
        pieces.push(help.to_string());
    }

    pieces.push(format!("[type: {}]", parameter.type_spec()));

    if let Some(default) = default {
        pieces.push(format!("[default: {}]", display_value(default)));
    }

    pieces.join(" ")
}

fn arguments(stand_in: &StandIn, matches: &ArgMatches) -> Arguments {
    let parameters = stand_in.signature.parameters();
    let variadic = parameters
        .iter()
        .any(|p| p.kind() == ParameterKind::VarPositional);
    let mut arguments = Arguments::new();
    // With a variadic positional parameter every positional parameter ahead of it must be supplied by position.
    let mut by_position = variadic;

    for parameter in parameters {
        let name = parameter.name();

        match parameter.kind() {
            ParameterKind::Receiver | ParameterKind::VarKeyword => {}
            ParameterKind::VarPositional => {
                by_position = false;

                if let Some(values) = matches.get_many::<String>(name) {
                    for value in values {
                        arguments = arguments.arg(value.as_str());
                    }
                }
            }
            kind => {
                let value = single(parameter, matches, name)
                    .or_else(|| single(parameter, matches, &long_id(name)));

                match value {
                    Some(value) if kind == ParameterKind::PositionalOnly || (by_position && kind.is_positional()) => {
                        arguments = arguments.arg(value);
                    }
                    Some(value) => {
                        arguments = arguments.kwarg(name, value);
                    }
                    None if by_position && kind.is_positional() => match stand_in.default_of(parameter) {
                        Some(default) => {
                            arguments = arguments.arg(default.clone());
                        }
                        None => by_position = false,
                    },
                    None => {}
                }
            }
        }
    }

    arguments
}

fn single(parameter: &Parameter, matches: &ArgMatches, id: &str) -> Option<Value> {
    // The id may not be defined for this parameter (ex: a long-only parameter has no keyword twin).
    let defined = matches.ids().any(|candidate| candidate.as_str() == id);

    if !defined {
        return None;
    }

    if parameter.type_spec().is_list() {
        let values: Vec<&String> = matches.get_many::<String>(id)?.collect();

        match values.as_slice() {
            [raw] if raw.trim_start().starts_with('[') => Some(Value::from(raw.as_str())),
            _ => Some(Value::from(
                values
                    .into_iter()
                    .map(|v| Value::from(v.as_str()))
                    .collect::<Vec<_>>(),
            )),
        }
    } else {
        matches
            .get_one::<String>(id)
            .map(|value| Value::from(value.as_str()))
    }
}

impl Dispatch for ClapDispatch {
    fn dispatch(&self, stand_in: &StandIn, tokens: &[String]) -> Result<Parsed, DispatchError> {
        let matches = match Self::command(stand_in).try_get_matches_from(tokens) {
            Ok(matches) => matches,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                return Ok(Parsed::Help(e.to_string().trim_end().to_string()));
            }
            Err(e) => return Err(DispatchError::Usage(e.to_string().trim_end().to_string())),
        };

        let member = match matches.subcommand() {
            Some((name, sub_matches)) => stand_in
                .members
                .iter()
                .find(|member| member.program == name)
                .map(|member| (name.to_string(), arguments(member, sub_matches))),
            None => None,
        };
        let arguments = arguments(stand_in, &matches);

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Dispatched {tokens:?}: {arguments:?}, member {member:?}.");
        }

        Ok(Parsed::Call { arguments, member })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GroupDefinition, Hook, OptionDeclaration};
    use crate::model::TypeSpec;
    use crate::test::assert_contains;
    use rstest::rstest;
    use serde_json::json;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn jump() -> StandIn {
        StandIn::new(
            "jump",
            Signature::new([
                Parameter::positional("height", TypeSpec::Float).help("How high to jump."),
                Parameter::positional("verbose", TypeSpec::Bool).default(false),
                Parameter::positional("units", TypeSpec::literal(["feet", "inches"])).default("feet"),
                Parameter::positional("tags", TypeSpec::list(TypeSpec::Str)).default(json!([])),
            ]),
        )
        .about("Jump into the air.")
        .defaults(IndexMap::from([("units".to_string(), json!("inches"))]))
    }

    fn call(parsed: Parsed) -> (Arguments, Option<(String, Arguments)>) {
        match parsed {
            Parsed::Call { arguments, member } => (arguments, member),
            Parsed::Help(help) => panic!("unexpected help: {help}"),
        }
    }

    #[rstest]
    #[case(vec![], Arguments::new())]
    #[case(vec!["3.5"], Arguments::new().kwarg("height", "3.5"))]
    #[case(vec!["--height", "3.5"], Arguments::new().kwarg("height", "3.5"))]
    #[case(vec!["-2"], Arguments::new().kwarg("height", "-2"))]
    #[case(vec!["3.5", "--verbose"], Arguments::new().kwarg("height", "3.5").kwarg("verbose", "true"))]
    #[case(vec!["--verbose=false", "3.5"], Arguments::new().kwarg("height", "3.5").kwarg("verbose", "false"))]
    #[case(vec!["1", "--units", "feet"], Arguments::new().kwarg("height", "1").kwarg("units", "feet"))]
    #[case(vec!["1", "--tags", "a", "--tags", "b"], Arguments::new().kwarg("height", "1").kwarg("tags", json!(["a", "b"])))]
    #[case(vec!["1", "--tags", "[\"a\"]"], Arguments::new().kwarg("height", "1").kwarg("tags", "[\"a\"]"))]
    fn dispatch(#[case] input: Vec<&str>, #[case] expected: Arguments) {
        // Execute
        let parsed = ClapDispatch::default().dispatch(&jump(), &tokens(&input)).unwrap();

        // Verify
        let (arguments, member) = call(parsed);
        assert_eq!(arguments, expected);
        assert_eq!(member, None);
    }

    #[rstest]
    #[case(vec!["1", "2"])]
    #[case(vec!["--height", "1", "2"])]
    #[case(vec!["--unknown", "1"])]
    #[case(vec!["--units"])]
    fn dispatch_usage(#[case] input: Vec<&str>) {
        let error = ClapDispatch::default()
            .dispatch(&jump(), &tokens(&input))
            .unwrap_err();

        assert_matches!(error, DispatchError::Usage(_));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn dispatch_help() {
        // Execute
        let parsed = ClapDispatch::default()
            .dispatch(&jump(), &tokens(&["--help"]))
            .unwrap();

        // Verify
        assert_matches!(parsed, Parsed::Help(help) => {
            assert_contains!(help, "Jump into the air.");
            assert_contains!(help, "HEIGHT");
            assert_contains!(help, "How high to jump.");
            assert_contains!(help, "--units <UNITS>");
            assert_contains!(help, "[default: inches]");
            assert_contains!(help, "[type: float]");
        });
    }

    #[test]
    fn dispatch_positional_only_and_variadic() {
        // Setup
        let stand_in = StandIn::new(
            "sum",
            Signature::new([
                Parameter::positional_only("first", TypeSpec::Int),
                Parameter::positional("second", TypeSpec::Int).default(0),
                Parameter::var_positional("rest", TypeSpec::Int),
                Parameter::keyword_only("scale", TypeSpec::Int).default(1),
                Parameter::var_keyword("extra", TypeSpec::Any),
            ]),
        );

        // Execute
        let parsed = ClapDispatch::default()
            .dispatch(&stand_in, &tokens(&["1", "--second", "2", "3", "4", "--scale", "5"]))
            .unwrap();

        // Verify
        let (arguments, _) = call(parsed);
        assert_eq!(
            arguments,
            Arguments::new()
                .arg("1")
                .arg("2")
                .arg("3")
                .arg("4")
                .kwarg("scale", "5")
        );
    }

    #[test]
    fn dispatch_variadic_defaults_fill_gaps() {
        let stand_in = StandIn::new(
            "sum",
            Signature::new([
                Parameter::positional("first", TypeSpec::Int).default(0),
                Parameter::var_positional("rest", TypeSpec::Int),
            ]),
        );

        let parsed = ClapDispatch::default()
            .dispatch(&stand_in, &tokens(&["3", "4"]))
            .unwrap();

        let (arguments, _) = call(parsed);
        assert_eq!(arguments, Arguments::new().arg(0).arg("3").arg("4"));
    }

    #[test]
    fn dispatch_member() {
        // Setup
        let stand_in = StandIn::new(
            "multi",
            Signature::new([Parameter::positional("verbose", TypeSpec::Bool).default(false)]),
        )
        .member(StandIn::new(
            "greet",
            Signature::new([Parameter::positional("name", TypeSpec::Str)]),
        ))
        .member(StandIn::new("reset", Signature::empty()));

        // Execute
        let parsed = ClapDispatch::default()
            .dispatch(&stand_in, &tokens(&["--verbose", "greet", "Alice"]))
            .unwrap();

        // Verify
        let (arguments, member) = call(parsed);
        assert_eq!(arguments, Arguments::new().kwarg("verbose", "true"));
        assert_eq!(
            member,
            Some(("greet".to_string(), Arguments::new().kwarg("name", "Alice")))
        );
    }

    #[test]
    fn stand_in_construction_members() {
        // Setup
        let farewell = GroupDefinition::new("Farewell")
            .about("Bid farewell.")
            .option(OptionDeclaration::new("dialect", TypeSpec::Str).default("formal"))
            .define()
            .unwrap();
        let top = GroupDefinition::new("Top")
            .option(OptionDeclaration::new("verbose", TypeSpec::Bool).default(false))
            .method("greet", Hook::noop().about("Say hello."))
            .command("farewell", &farewell)
            .define()
            .unwrap();

        // Execute
        let stand_in = StandIn::construction("top", &top);

        // Verify
        assert_eq!(stand_in.signature().to_string(), "(verbose: bool = false)");
        assert_eq!(
            stand_in.published_defaults(),
            &IndexMap::from([("verbose".to_string(), json!(false))])
        );
        let members: Vec<(&str, String)> = stand_in
            .members()
            .iter()
            .map(|m| (m.program(), m.signature().to_string()))
            .collect();
        assert_eq!(
            members,
            vec![
                ("greet", "()".to_string()),
                ("farewell", "(dialect: str = 'formal')".to_string()),
            ]
        );
        assert_eq!(stand_in.members()[1].about.as_deref(), Some("Bid farewell."));
    }

    #[test]
    fn stand_in_builder() {
        let stand_in = StandIn::new("p", Signature::empty())
            .about("")
            .member(StandIn::new("m", Signature::empty()));

        assert_eq!(stand_in.program(), "p");
        assert!(stand_in.signature().is_empty());
        assert!(stand_in.published_defaults().is_empty());
        assert_eq!(stand_in.members().len(), 1);
        assert_eq!(stand_in.about, None);
    }
}
