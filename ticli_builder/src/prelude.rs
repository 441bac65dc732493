//! Traits which, typically, may be imported without concern: `use ticli::prelude::*`.
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{GroupDefinition, OptionGroup, SignatureConflict};
use crate::model::{TypeSpec, Value};

/// Behaviour to describe a Rust type as a declared [`TypeSpec`].
// Needs to be imported in order to implement `Typed` for a custom type.
pub trait Typed {
    /// The declared type of values of `Self`.
    fn type_spec() -> TypeSpec;
}

macro_rules! typed {
    ($type_spec:expr; $($t:ty),+) => {
        $(
            impl Typed for $t {
                fn type_spec() -> TypeSpec {
                    $type_spec
                }
            }
        )+
    };
}

typed!(TypeSpec::Bool; bool);
typed!(TypeSpec::Int; i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
typed!(TypeSpec::Float; f32, f64);
typed!(TypeSpec::Str; String, PathBuf);
typed!(TypeSpec::Any; Value);

impl<T: Typed> Typed for Vec<T> {
    fn type_spec() -> TypeSpec {
        TypeSpec::list(T::type_spec())
    }
}

impl<T: Typed> Typed for HashSet<T> {
    fn type_spec() -> TypeSpec {
        TypeSpec::list(T::type_spec())
    }
}

impl<T: Typed> Typed for BTreeSet<T> {
    fn type_spec() -> TypeSpec {
        TypeSpec::list(T::type_spec())
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_spec() -> TypeSpec {
        TypeSpec::optional(T::type_spec())
    }
}

/// Behaviour for a type that declares an option group (typically via `#[derive(OptionGroup)]`).
pub trait Declare {
    /// The group definition: name, documentation, and options.
    /// Add hooks and methods to it before defining the group.
    fn definition() -> GroupDefinition;

    /// Define the group as declared, without hooks or methods.
    fn group() -> Result<Arc<OptionGroup>, SignatureConflict> {
        Self::definition().define()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OptionDeclaration;
    use rstest::rstest;

    #[rstest]
    #[case(bool::type_spec(), TypeSpec::Bool)]
    #[case(u8::type_spec(), TypeSpec::Int)]
    #[case(i64::type_spec(), TypeSpec::Int)]
    #[case(usize::type_spec(), TypeSpec::Int)]
    #[case(f32::type_spec(), TypeSpec::Float)]
    #[case(String::type_spec(), TypeSpec::Str)]
    #[case(PathBuf::type_spec(), TypeSpec::Str)]
    #[case(Value::type_spec(), TypeSpec::Any)]
    #[case(<Vec<u32>>::type_spec(), TypeSpec::list(TypeSpec::Int))]
    #[case(<HashSet<String>>::type_spec(), TypeSpec::list(TypeSpec::Str))]
    #[case(<BTreeSet<bool>>::type_spec(), TypeSpec::list(TypeSpec::Bool))]
    #[case(<Option<f64>>::type_spec(), TypeSpec::optional(TypeSpec::Float))]
    #[case(<Option<Vec<i32>>>::type_spec(), TypeSpec::optional(TypeSpec::list(TypeSpec::Int)))]
    fn typed(#[case] actual: TypeSpec, #[case] expected: TypeSpec) {
        assert_eq!(actual, expected);
    }

    struct Greeting;

    impl Declare for Greeting {
        fn definition() -> GroupDefinition {
            GroupDefinition::new("Greeting")
                .option(OptionDeclaration::new("name", String::type_spec()).default("World"))
        }
    }

    #[test]
    fn declare() {
        let group = Greeting::group().unwrap();

        assert_eq!(group.name(), "Greeting");
        assert_eq!(group.options().names().collect::<Vec<_>>(), vec!["name"]);
    }
}
