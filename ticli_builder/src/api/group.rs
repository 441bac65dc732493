use std::sync::Arc;

use indexmap::IndexMap;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{
    insert, GroupDefinition, GroupError, Hook, Instance, OptionTable, Parameter, ParameterKind,
    Signature, SignatureConflict,
};
use crate::cli::Diagnostics;
use crate::constant::{ARGS_LOCATION, MULTIPLE_VALUES};
use crate::model::{TypeSpec, Value};
use crate::validation::{
    bind, check_type, Arguments, BoundArguments, LocSegment, ValidationFailure,
};

/// The validated read/write path for one option.
#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    name: String,
    type_spec: TypeSpec,
}

impl Accessor {
    /// The option name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the option from `option_data`.
    pub fn get<'a>(&self, option_data: &'a IndexMap<String, Value>) -> Option<&'a Value> {
        option_data.get(&self.name)
    }

    /// Check `value` against the option type, returning the coerced value.
    pub fn check(&self, value: &Value) -> Result<Value, ValidationFailure> {
        check_type(&self.name, value, &self.type_spec)
    }

    /// Check `value`, then store it in `option_data`.
    /// On failure `option_data` is left unchanged.
    pub fn set(
        &self,
        option_data: &mut IndexMap<String, Value>,
        value: &Value,
    ) -> Result<(), ValidationFailure> {
        let value = self.check(value)?;
        option_data.insert(self.name.clone(), value);
        Ok(())
    }
}

/// A defined option group: the merged options, resolved hooks, methods and commands, and the composite signatures.
///
/// Immutable once defined, and shared by all of its instances.
#[derive(Debug)]
pub struct OptionGroup {
    name: String,
    about: String,
    options: OptionTable,
    bases: Vec<Arc<OptionGroup>>,
    post_init: Option<Hook>,
    post_call: Option<Hook>,
    methods: IndexMap<String, Hook>,
    commands: IndexMap<String, Arc<OptionGroup>>,
    accessors: IndexMap<String, Accessor>,
    construction: Signature,
    invocation: Signature,
}

impl TryFrom<GroupDefinition> for OptionGroup {
    type Error = SignatureConflict;

    fn try_from(definition: GroupDefinition) -> Result<Self, Self::Error> {
        let GroupDefinition {
            name,
            about,
            options: own,
            bases,
            post_init,
            post_call,
            mut methods,
            mut commands,
        } = definition;
        let options = OptionTable::collect(bases.iter().map(|base| &base.options), &own);
        let post_init = post_init.or_else(|| bases.iter().find_map(|b| b.post_init.clone()));
        let post_call = post_call.or_else(|| bases.iter().find_map(|b| b.post_call.clone()));

        // Own members shadow inherited members of either kind.
        let own_methods: Vec<String> = methods.keys().cloned().collect();
        let own_commands: Vec<String> = commands.keys().cloned().collect();

        for base in &bases {
            for (method, hook) in &base.methods {
                if !methods.contains_key(method) && !own_commands.contains(method) {
                    methods.insert(method.clone(), hook.clone());
                }
            }

            for (command, group) in &base.commands {
                if !commands.contains_key(command) && !own_methods.contains(command) {
                    commands.insert(command.clone(), group.clone());
                }
            }
        }

        if let Some(name) = commands.keys().find(|name| methods.contains_key(*name)) {
            return Err(SignatureConflict::MemberCollision { name: name.clone() });
        }

        let init = post_init.clone().unwrap_or_else(Hook::noop);
        let call = post_call.clone().unwrap_or_else(Hook::noop);

        for option in options.names() {
            for (hook_name, hook) in [("post-init", &init), ("post-call", &call)] {
                if hook.signature().get(option).is_some() {
                    return Err(SignatureConflict::OptionCollision {
                        name: option.to_string(),
                        hook: hook_name.to_string(),
                    });
                }
            }
        }

        let option_parameters = options.parameters();
        let construction = Signature::new(insert(
            init.signature().parameters(),
            &option_parameters,
            false,
        ));
        construction.validate()?;

        let call_target: Vec<Parameter> = std::iter::once(Parameter::receiver())
            .chain(call.signature().parameters().iter().cloned())
            .collect();
        let invocation = Signature::new(
            std::iter::once(Parameter::receiver())
                .chain(insert(&call_target, &option_parameters, true)),
        );
        invocation.validate()?;

        for hook in methods.values() {
            Signature::new(
                std::iter::once(Parameter::receiver())
                    .chain(hook.signature().parameters().iter().cloned()),
            )
            .validate()?;
        }

        let inherited: Vec<String> = options
            .iter()
            .filter(|option| !own.iter().any(|o| o.name() == option.name()))
            .filter_map(|option| {
                option
                    .help_text()
                    .map(|help| format!("{}: {help}", option.name()))
            })
            .collect();
        let about = [
            about.unwrap_or_default(),
            inherited.join("\n"),
            init.about_text().unwrap_or_default().to_string(),
            call.about_text().unwrap_or_default().to_string(),
        ]
        .into_iter()
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

        let accessors = options
            .iter()
            .map(|option| {
                (
                    option.name().to_string(),
                    Accessor {
                        name: option.name().to_string(),
                        type_spec: option.type_spec().clone(),
                    },
                )
            })
            .collect();

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Defined {name}: options {:?}.", options.names().collect::<Vec<_>>());
            debug!("Defined {name}: construction {construction}, invocation {invocation}.");
        }

        Ok(Self {
            name,
            about,
            options,
            bases,
            post_init,
            post_call,
            methods,
            commands,
            accessors,
            construction,
            invocation,
        })
    }
}

impl OptionGroup {
    /// The group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The composed documentation: own about, inherited option descriptions, then the hooks' about messages.
    pub fn about(&self) -> &str {
        &self.about
    }

    /// The merged option table.
    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    /// The base groups, in priority order.
    pub fn bases(&self) -> &[Arc<OptionGroup>] {
        &self.bases
    }

    /// The accessor of option `name`.
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    /// The composite construction signature: the post-init hook's parameters with the options injected.
    pub fn construction_signature(&self) -> &Signature {
        &self.construction
    }

    /// The composite invocation signature: the receiver, then the post-call hook's parameters with the options injected.
    pub fn invocation_signature(&self) -> &Signature {
        &self.invocation
    }

    /// The resolved post-construction hook (own, else the first base's), or the no-op stand-in.
    pub fn post_init(&self) -> Hook {
        self.post_init.clone().unwrap_or_else(Hook::noop)
    }

    /// The resolved post-invocation hook (own, else the first base's), or the no-op stand-in.
    pub fn post_call(&self) -> Hook {
        self.post_call.clone().unwrap_or_else(Hook::noop)
    }

    /// The method `name`, own or inherited.
    pub fn method(&self, name: &str) -> Option<&Hook> {
        self.methods.get(name)
    }

    /// The methods, own first, then inherited.
    pub fn methods(&self) -> impl Iterator<Item = (&str, &Hook)> {
        self.methods.iter().map(|(name, hook)| (name.as_str(), hook))
    }

    /// The command `name`, own or inherited.
    pub fn command(&self, name: &str) -> Option<&Arc<OptionGroup>> {
        self.commands.get(name)
    }

    /// The commands, own first, then inherited.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Arc<OptionGroup>)> {
        self.commands.iter().map(|(name, group)| (name.as_str(), group))
    }

    /// Construct an instance, reporting to the console and raising on failure.
    pub fn construct(self: &Arc<Self>, arguments: Arguments) -> Result<Instance, GroupError> {
        self.construct_with(Diagnostics::default(), arguments)
    }

    /// Construct an instance.
    ///
    /// Supplied arguments are bound to the composite construction signature: those naming options (by keyword or by position) override the defaults, and everything else is bound to the post-init hook.
    /// An instance of every command is constructed along the way, with a view of the new instance's options.
    /// Every failure is reported through `diagnostics` at once, then escalated; no instance is created.
    pub fn construct_with(
        self: &Arc<Self>,
        diagnostics: Diagnostics,
        arguments: Arguments,
    ) -> Result<Instance, GroupError> {
        self.instantiate(diagnostics, arguments, None)
    }

    fn instantiate(
        self: &Arc<Self>,
        diagnostics: Diagnostics,
        arguments: Arguments,
        parent: Option<IndexMap<String, Value>>,
    ) -> Result<Instance, GroupError> {
        let post_init = self.post_init();
        let (options, bound) = self.prepare(
            &diagnostics,
            arguments,
            &self.construction,
            post_init.signature(),
        )?;
        let mut instance = Instance::new(self.clone(), diagnostics.clone());
        instance.store(options);
        instance.adopt(parent);

        for (name, command) in &self.commands {
            let parent = Some(instance.option_data().clone());
            let member = command.instantiate(diagnostics.clone(), Arguments::new(), parent)?;
            instance.attach(name, member);
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Constructed {}: {:?}.", self.name, instance.option_data());
        }

        post_init.call(&mut instance, bound)?;
        Ok(instance)
    }

    /// Bind `arguments` to the `composite` signature: split off the option overrides (by keyword, or by their position in `composite`), check them, and bind the rest to `hook`.
    pub(crate) fn prepare(
        &self,
        diagnostics: &Diagnostics,
        arguments: Arguments,
        composite: &Signature,
        hook: &Signature,
    ) -> Result<(IndexMap<String, Value>, BoundArguments), GroupError> {
        let supplied = arguments.clone();
        let slots = composite.positional_names();
        let variadic = composite
            .parameters()
            .iter()
            .any(|p| p.kind() == ParameterKind::VarPositional);
        let mut failure = ValidationFailure::default();

        let (mut overrides, remaining) = arguments.split_keywords(|name| self.options.contains(name));
        let (by_position, mut remaining) = remaining.split_positional(|index| {
            slots
                .get(index)
                .filter(|name| self.options.contains(name.as_str()))
                .cloned()
        });

        for (name, value) in by_position {
            if overrides.contains_key(&name) {
                failure.extend(ValidationFailure::single(
                    [LocSegment::from(name.as_str())],
                    MULTIPLE_VALUES,
                ));
            } else {
                overrides.insert(name, value);
            }
        }

        if !variadic && supplied.positional().len() > slots.len() {
            failure.extend(ValidationFailure::single(
                [LocSegment::from(ARGS_LOCATION)],
                format!(
                    "{} positional arguments expected but {} given",
                    slots.len(),
                    supplied.positional().len()
                ),
            ));
            let kept = hook
                .parameters()
                .iter()
                .filter(|p| p.kind().is_positional())
                .count();
            remaining = remaining.truncate_positional(kept);
        }

        let mut checked = IndexMap::default();

        for accessor in self.accessors.values() {
            if let Some(value) = overrides.get(accessor.name()) {
                match accessor.check(value) {
                    Ok(value) => {
                        checked.insert(accessor.name().to_string(), value);
                    }
                    Err(error) => failure.extend(error),
                }
            }
        }

        let escalate = |failure| diagnostics.escalate(failure, &supplied, &slots);

        match bind(hook, &remaining) {
            Ok(bound) if failure.is_empty() => Ok((checked, bound)),
            Ok(_) => Err(escalate(failure)),
            Err(error) => {
                failure.extend(error);
                Err(escalate(failure))
            }
        }
    }
}
