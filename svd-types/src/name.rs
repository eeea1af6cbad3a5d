use std::fmt::{Display, Formatter};

use crate::Error;

/// A validated identifier shared by SVDs, schemas and catalog sources.
///
/// A `Name` is non-empty, consists of ASCII alphanumerics, `-`, `_` or `.`,
/// and must not start or end with one of those separators. Case is
/// preserved rather than folded: `spec.md` §8's literal scenarios and error
/// strings (e.g. `CRD`, `crdOwner-0`) depend on the exact casing a catalog
/// or schema was given.
///
/// ## Examples
/// ```
/// use svd_types::Name;
///
/// assert!(Name::new("my-operator.v1").is_ok());
/// assert!(Name::new("").is_err());
/// assert!(Name::new("-leading-dash").is_err());
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`], validating the naming restrictions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `name` is empty, contains
    /// characters other than ASCII alphanumerics, `-`, `_` or `.`, or
    /// starts/ends with one of those separators.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !matches!(name.chars().next(), Some('-' | '_' | '.'))
            && !matches!(name.chars().last(), Some('-' | '_' | '.'));
        if valid {
            Ok(Self(name))
        } else {
            Err(Error::InvalidName(name))
        }
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Name {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Name {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Error> {
        Self::new(value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("operator-v1")]
    #[case("a.b.c")]
    #[case("crd_0")]
    #[case("x")]
    #[case("CRD")]
    #[case("crdOwner-0")]
    fn valid_names(#[case] input: &str) {
        assert_eq!(Name::new(input).unwrap().as_str(), input);
    }

    #[rstest]
    #[case("")]
    #[case("-leading")]
    #[case("trailing-")]
    #[case("has space")]
    fn invalid_names(#[case] input: &str) {
        assert!(Name::new(input).is_err());
    }

    #[test]
    fn display_roundtrips() {
        let name = Name::new("foo").unwrap();
        assert_eq!(name.to_string(), "foo");
    }
}
