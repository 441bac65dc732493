use thiserror::Error;

/// One segment of an error location: a field name, or an index into a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocSegment {
    /// A named field, parameter, or keyword.
    Name(String),
    /// A position within a list or variadic argument.
    Index(usize),
}

impl From<&str> for LocSegment {
    fn from(value: &str) -> Self {
        LocSegment::Name(value.to_string())
    }
}

impl From<String> for LocSegment {
    fn from(value: String) -> Self {
        LocSegment::Name(value)
    }
}

impl From<usize> for LocSegment {
    fn from(value: usize) -> Self {
        LocSegment::Index(value)
    }
}

impl std::fmt::Display for LocSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocSegment::Name(name) => write!(f, "{name}"),
            LocSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single `(location, message)` pair of a [`ValidationFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorEntry {
    loc: Vec<LocSegment>,
    message: String,
}

impl ErrorEntry {
    /// Create an entry at the location described by `loc`.
    pub fn new(loc: impl IntoIterator<Item = LocSegment>, message: impl Into<String>) -> Self {
        Self {
            loc: loc.into_iter().collect(),
            message: message.into(),
        }
    }

    /// The location segments, outermost first.
    pub fn loc(&self) -> &[LocSegment] {
        &self.loc
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The location as users see it: names joined by `" -> "`, indices by a space.
    ///
    /// ### Example
    /// ```
    /// # use ticli_builder as ticli;
    /// use ticli::{ErrorEntry, LocSegment};
    ///
    /// let entry = ErrorEntry::new(
    ///     [LocSegment::from("points"), LocSegment::from(2), LocSegment::from("x")],
    ///     "field required",
    /// );
    /// assert_eq!(entry.location(), "points 2 -> x");
    /// ```
    pub fn location(&self) -> String {
        let mut location = String::default();

        for (i, segment) in self.loc.iter().enumerate() {
            match segment {
                _ if i == 0 => {}
                LocSegment::Name(_) => location.push_str(" -> "),
                LocSegment::Index(_) => location.push(' '),
            }
            location.push_str(&segment.to_string());
        }

        location
    }

    pub(crate) fn prefixed(mut self, segment: LocSegment) -> Self {
        self.loc.insert(0, segment);
        self
    }
}

/// Structured validation failure, listing every `(location, message)` that failed.
///
/// A failure always contains at least one entry when produced by this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct ValidationFailure {
    errors: Vec<ErrorEntry>,
}

impl ValidationFailure {
    /// Create a failure from its entries.
    pub fn new(errors: impl IntoIterator<Item = ErrorEntry>) -> Self {
        Self {
            errors: errors.into_iter().collect(),
        }
    }

    pub(crate) fn single(loc: impl IntoIterator<Item = LocSegment>, message: impl Into<String>) -> Self {
        Self::new([ErrorEntry::new(loc, message)])
    }

    /// The failing entries, in the order they were found.
    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn extend(&mut self, other: ValidationFailure) {
        self.errors.extend(other.errors);
    }

    /// Push every entry one level down, under `segment`.
    pub(crate) fn prefixed(self, segment: impl Into<LocSegment>) -> Self {
        let segment = segment.into();
        Self::new(
            self.errors
                .into_iter()
                .map(|entry| entry.prefixed(segment.clone())),
        )
    }

    /// `Ok(())` if nothing was collected, otherwise `Err(self)`.
    pub(crate) fn into_result(self) -> Result<(), ValidationFailure> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plural = if self.errors.len() == 1 { "" } else { "s" };
        write!(f, "{} validation error{plural}", self.errors.len())?;

        for entry in &self.errors {
            write!(f, "\n{}\n  {}", entry.location(), entry.message)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![], "")]
    #[case(vec![LocSegment::from("height")], "height")]
    #[case(vec![LocSegment::from("args"), LocSegment::from(0)], "args 0")]
    #[case(vec![LocSegment::from("a"), LocSegment::from("b")], "a -> b")]
    #[case(
        vec![LocSegment::from("a"), LocSegment::from(1), LocSegment::from(2), LocSegment::from("c")],
        "a 1 2 -> c"
    )]
    fn entry_location(#[case] loc: Vec<LocSegment>, #[case] expected: &str) {
        assert_eq!(ErrorEntry::new(loc, "m").location(), expected);
    }

    #[test]
    fn failure_prefixed() {
        // Setup
        let failure = ValidationFailure::new([
            ErrorEntry::new([LocSegment::from(0)], "value is not a valid integer"),
            ErrorEntry::new([LocSegment::from(2)], "value is not a valid integer"),
        ]);

        // Execute
        let failure = failure.prefixed("numbers");

        // Verify
        let locations: Vec<String> = failure.errors().iter().map(|e| e.location()).collect();
        assert_eq!(locations, vec!["numbers 0", "numbers 2"]);
    }

    #[test]
    fn failure_display() {
        let failure = ValidationFailure::new([
            ErrorEntry::new([LocSegment::from("height")], "value is not a valid float"),
            ErrorEntry::new([LocSegment::from("units")], "field required"),
        ]);

        assert_eq!(
            failure.to_string(),
            "2 validation errors\nheight\n  value is not a valid float\nunits\n  field required"
        );
    }

    #[test]
    fn failure_into_result() {
        ValidationFailure::default().into_result().unwrap();

        let mut failure = ValidationFailure::default();
        failure.extend(ValidationFailure::single([LocSegment::from("x")], "field required"));
        assert_eq!(failure.into_result().unwrap_err().errors().len(), 1);
    }
}
