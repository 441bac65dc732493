use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{GroupError, OptionGroup, Outcome, Signature};
use crate::cli::Diagnostics;
use crate::model::Value;
use crate::validation::{bind, Arguments};

/// One constructed option group: the current option data, ordinary attributes, command instances, and the diagnostic path.
///
/// Option data only ever holds values that passed their type check.
/// A command instance sees the option data of the instance that owns it as its parent.
/// An instance is not `Send`; it is owned and mutated by a single thread.
#[derive(Debug)]
pub struct Instance {
    group: Arc<OptionGroup>,
    option_data: IndexMap<String, Value>,
    attributes: IndexMap<String, Value>,
    parent: Option<IndexMap<String, Value>>,
    commands: IndexMap<String, Instance>,
    diagnostics: Diagnostics,
}

impl Instance {
    pub(crate) fn new(group: Arc<OptionGroup>, diagnostics: Diagnostics) -> Self {
        let mut instance = Self {
            group,
            option_data: IndexMap::default(),
            attributes: IndexMap::default(),
            parent: None,
            commands: IndexMap::default(),
            diagnostics,
        };
        instance.reset();
        instance
    }

    pub(crate) fn store(&mut self, options: IndexMap<String, Value>) {
        self.option_data.extend(options);
    }

    pub(crate) fn adopt(&mut self, parent: Option<IndexMap<String, Value>>) {
        self.parent = parent;
    }

    pub(crate) fn attach(&mut self, name: &str, command: Instance) {
        self.commands.insert(name.to_string(), command);
    }

    /// The group this is an instance of.
    pub fn group(&self) -> &Arc<OptionGroup> {
        &self.group
    }

    /// The diagnostic path of this instance.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Invoke the instance: apply option overrides and run the post-call hook.
    ///
    /// Supplied arguments are bound to the composite invocation signature: those naming options (by keyword or by position) are checked and stored (all or none), and everything else is bound to the post-call hook.
    /// Every failure is reported through the diagnostics at once, then escalated.
    pub fn invoke(&mut self, arguments: Arguments) -> Result<Outcome, GroupError> {
        let group = self.group.clone();
        let post_call = group.post_call();
        let (options, bound) = group.prepare(
            &self.diagnostics,
            arguments,
            group.invocation_signature(),
            post_call.signature(),
        )?;
        self.store(options);

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Invoking {}: {:?}.", group.name(), self.option_data);
        }

        post_call.call(self, bound)
    }

    /// Call the method `name` with `arguments`, validated against the method's signature.
    pub fn call_method(&mut self, name: &str, arguments: Arguments) -> Result<Outcome, GroupError> {
        let hook = self
            .group
            .method(name)
            .cloned()
            .ok_or_else(|| GroupError::UnknownMember {
                name: name.to_string(),
            })?;
        let bound = bind(hook.signature(), &arguments).map_err(|failure| {
            self.diagnostics.escalate(
                failure,
                &arguments,
                &hook.signature().positional_names(),
            )
        })?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Calling {}.{name}: {bound:?}.", self.group.name());
        }

        hook.call(self, bound)
    }

    /// Invoke the command `name` with `arguments`, after refreshing its view of this instance's options.
    ///
    /// A [`Outcome::Chain`] from the command continues the chain on this instance.
    pub fn call_command(&mut self, name: &str, arguments: Arguments) -> Result<Outcome, GroupError> {
        let parent = self.option_data.clone();
        let command = self
            .commands
            .get_mut(name)
            .ok_or_else(|| GroupError::UnknownMember {
                name: name.to_string(),
            })?;
        command.adopt(Some(parent));

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Calling command {}.{name}.", self.group.name());
        }

        command.invoke(arguments)
    }

    /// Call the member `name`: a method if the group has one, else a command.
    pub fn call_member(&mut self, name: &str, arguments: Arguments) -> Result<Outcome, GroupError> {
        if self.group.method(name).is_some() {
            self.call_method(name, arguments)
        } else {
            self.call_command(name, arguments)
        }
    }

    /// Apply option overrides only: every keyword must name an option, and no positional argument is accepted.
    ///
    /// The overrides are stored all or none.
    pub fn override_options(&mut self, arguments: Arguments) -> Result<(), GroupError> {
        let group = self.group.clone();
        let (options, _) = group.prepare(
            &self.diagnostics,
            arguments,
            &Signature::empty(),
            &Signature::empty(),
        )?;
        self.store(options);
        Ok(())
    }

    /// Read option `name`, else ordinary attribute `name`.
    pub fn get(&self, name: &str) -> Result<&Value, GroupError> {
        self.option_data
            .get(name)
            .or_else(|| self.attributes.get(name))
            .ok_or_else(|| GroupError::AttributeNotFound {
                name: name.to_string(),
            })
    }

    /// Read option or attribute `name` as a `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, GroupError> {
        extract(name, self.get(name)?)
    }

    /// Read option `name` of the parent (the instance owning this one as a command).
    pub fn parent_get(&self, name: &str) -> Result<&Value, GroupError> {
        self.parent
            .as_ref()
            .and_then(|parent| parent.get(name))
            .ok_or_else(|| GroupError::AttributeNotFound {
                name: name.to_string(),
            })
    }

    /// Read option `name` of the parent as a `T`.
    pub fn parent_get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, GroupError> {
        extract(name, self.parent_get(name)?)
    }

    /// The instance of command `name`.
    pub fn command(&self, name: &str) -> Option<&Instance> {
        self.commands.get(name)
    }

    /// The command instances.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.commands.iter().map(|(name, command)| (name.as_str(), command))
    }

    /// Read all of the option data as a `T` (typically a struct with one field per option).
    ///
    /// ### Example
    /// ```
    /// # use ticli_builder as ticli;
    /// use serde::Deserialize;
    /// use ticli::{Arguments, GroupDefinition, OptionDeclaration, TypeSpec};
    ///
    /// #[derive(Deserialize)]
    /// struct Options {
    ///     name: String,
    ///     times: u32,
    /// }
    ///
    /// let greet = GroupDefinition::new("Greet")
    ///     .option(OptionDeclaration::new("name", TypeSpec::Str).default("World"))
    ///     .option(OptionDeclaration::new("times", TypeSpec::Int).default(1))
    ///     .define()
    ///     .unwrap();
    /// let instance = greet.construct(Arguments::new().kwarg("times", "3")).unwrap();
    ///
    /// let options: Options = instance.options_as().unwrap();
    /// assert_eq!(options.name, "World");
    /// assert_eq!(options.times, 3);
    /// ```
    pub fn options_as<T: DeserializeOwned>(&self) -> Result<T, GroupError> {
        let data: serde_json::Map<String, Value> = self
            .option_data
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        serde_json::from_value(Value::Object(data)).map_err(|error| GroupError::Extract {
            name: self.group.name().to_string(),
            message: error.to_string(),
        })
    }

    /// Write option or attribute `name`.
    ///
    /// Option values are checked against the option type first; on failure the error is reported and escalated, and the stored value is unchanged.
    /// Any other name is stored as an ordinary attribute.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), GroupError> {
        let value = value.into();

        match self.group.accessor(name) {
            Some(accessor) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Setting option {name}: {value}.");
                }

                accessor
                    .set(&mut self.option_data, &value)
                    .map_err(|failure| {
                        self.diagnostics.escalate(
                            failure,
                            &Arguments::new().kwarg(name, value.clone()),
                            &[],
                        )
                    })
            }
            None => {
                self.attributes.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    /// Restore the option defaults: options without a default become absent.
    pub fn reset(&mut self) {
        self.option_data.clear();

        for option in self.group.options().iter() {
            if let Some(default) = option.default_value() {
                self.option_data
                    .insert(option.name().to_string(), default.clone());
            }
        }
    }

    /// The current option data.
    pub fn option_data(&self) -> &IndexMap<String, Value> {
        &self.option_data
    }

    /// The defaults to publish for the next invocation: the current option data.
    pub fn defaults(&self) -> &IndexMap<String, Value> {
        &self.option_data
    }

    /// The ordinary (non option) attributes.
    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    /// Display a message through this instance's user interface.
    pub fn print(&self, message: impl Into<String>) {
        self.diagnostics.print(message.into());
    }
}

fn extract<T: DeserializeOwned>(name: &str, value: &Value) -> Result<T, GroupError> {
    serde_json::from_value(value.clone()).map_err(|error| GroupError::Extract {
        name: name.to_string(),
        message: error.to_string(),
    })
}
