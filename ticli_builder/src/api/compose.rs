use crate::api::Parameter;

/// Splice `options` into `target`, ahead of its trailing run.
///
/// The trailing run is the maximal suffix of variadic positional, keyword-only, and variadic keyword parameters.
/// The result is `leading + options + trailing`.
/// With `skip_self`, the first parameter of `target` (the receiver) is dropped; the caller re-adds it.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use ticli::{insert, Parameter, Signature, TypeSpec};
///
/// let target = [
///     Parameter::positional("height", TypeSpec::Float),
///     Parameter::var_positional("more", TypeSpec::Float),
///     Parameter::keyword_only("twice", TypeSpec::Bool).default(false),
/// ];
/// let options = [Parameter::positional("verbose", TypeSpec::Bool).default(false)];
///
/// let composite = Signature::new(insert(&target, &options, false));
/// assert_eq!(
///     composite.to_string(),
///     "(height: float, verbose: bool = false, *more: float, twice: bool = false)"
/// );
/// ```
pub fn insert(target: &[Parameter], options: &[Parameter], skip_self: bool) -> Vec<Parameter> {
    let target = match (skip_self, target.split_first()) {
        (true, Some((_, rest))) => rest,
        _ => target,
    };
    let split = target
        .iter()
        .rposition(|p| !p.kind().is_trailing())
        .map(|i| i + 1)
        .unwrap_or(0);
    let (leading, trailing) = target.split_at(split);

    leading
        .iter()
        .chain(options.iter())
        .chain(trailing.iter())
        .cloned()
        .collect()
}
