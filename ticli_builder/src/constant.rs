// Validation messages.
pub(crate) const FIELD_REQUIRED: &str = "field required";
pub(crate) const NONE_NOT_ALLOWED: &str = "none is not an allowed value";
pub(crate) const NOT_A_BOOL: &str = "value could not be parsed to a boolean";
pub(crate) const NOT_AN_INT: &str = "value is not a valid integer";
pub(crate) const NOT_A_FLOAT: &str = "value is not a valid float";
pub(crate) const NOT_A_STR: &str = "str type expected";
pub(crate) const NOT_A_LIST: &str = "value is not a valid list";
pub(crate) const NOT_A_DICT: &str = "value is not a valid dict";
pub(crate) const MULTIPLE_VALUES: &str = "multiple values for argument";
pub(crate) const POSITIONAL_AS_KEYWORD: &str = "positional-only argument passed as keyword argument";

// Locations for binding failures that don't belong to a single parameter.
pub(crate) const ARGS_LOCATION: &str = "args";
pub(crate) const KWARGS_LOCATION: &str = "kwargs";

pub(crate) const TRUE_STRINGS: [&str; 6] = ["1", "on", "t", "true", "y", "yes"];
pub(crate) const FALSE_STRINGS: [&str; 6] = ["0", "off", "f", "false", "n", "no"];

// The receiver of a method signature.
pub(crate) const RECEIVER: &str = "self";

// Separates the segments of a command chain on the Cli.
pub(crate) const CHAIN_SEPARATOR: &str = "-";

// Used when no program name can be discovered from the environment.
pub(crate) const DEFAULT_PROGRAM: &str = "ticli";
