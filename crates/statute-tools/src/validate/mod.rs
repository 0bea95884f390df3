//! Allow-list validation for the fields of an inbound tool request.
//!
//! Every value that reaches an external tool passes through one of the
//! validators below first. Each validator performs an anchored full-string
//! match against a fixed alphabet and returns a canonical newtype on success.
//! Failures carry the offending raw value so callers can report exactly what
//! was rejected.
//!
//! The dispatcher passes these values as discrete argument-vector entries,
//! so validation is a second line of defence rather than the only one.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ValidationError;

#[expect(
    clippy::expect_used,
    reason = "the pattern is a compile-time constant covered by unit tests"
)]
static LAW_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("law identifier pattern"));

#[expect(
    clippy::expect_used,
    reason = "the pattern is a compile-time constant covered by unit tests"
)]
static PROVISION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[§\sA-Za-z0-9_]+$").expect("provision pattern"));

#[expect(
    clippy::expect_used,
    reason = "the pattern is a compile-time constant covered by unit tests"
)]
static SUBSECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]+|\[[0-9]+(?:,[0-9]+)*\])$").expect("subsection pattern")
});

/// Short token naming a statute, such as `bgb` or `ao_1977`.
///
/// Only ASCII letters, digits, and underscores are accepted, so the value is
/// safe to use both as a command-line argument and as a file name stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LawIdentifier(String);

impl LawIdentifier {
    /// Validates `raw` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidIdentifier`] if `raw` is empty or
    /// contains anything outside `[A-Za-z0-9_]`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if LAW_IDENTIFIER.is_match(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(ValidationError::InvalidIdentifier {
                raw: raw.to_owned(),
            })
        }
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LawIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Citation of a primary provision, such as `§ 70`.
///
/// The accepted alphabet is the section sign, whitespace, and ASCII word
/// characters. Quotes, separators, and shell metacharacters are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProvisionLocator(String);

impl ProvisionLocator {
    /// Validates `raw` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProvision`] if `raw` is empty or
    /// contains a character outside the provision alphabet.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if PROVISION.is_match(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(ValidationError::InvalidProvision {
                raw: raw.to_owned(),
            })
        }
    }

    /// Returns the locator text exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProvisionLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selection of one or more subsections within a provision.
///
/// The token is kept verbatim (`3` or `[1,3]`) because the extraction tool
/// receives it as a single opaque argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubsectionLocator(String);

impl SubsectionLocator {
    /// Validates `raw` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSubsection`] unless `raw` is a bare
    /// non-negative integer or a bracketed, comma-separated list of them with
    /// no whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if SUBSECTION.is_match(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(ValidationError::InvalidSubsection {
                raw: raw.to_owned(),
            })
        }
    }

    /// Returns the locator token exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubsectionLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a statute identifier.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidIdentifier`] on any character outside
/// `[A-Za-z0-9_]`, or on empty input.
pub fn validate_law_identifier(raw: &str) -> Result<LawIdentifier, ValidationError> {
    LawIdentifier::parse(raw)
}

/// Validates a provision locator.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidProvision`] on any character outside the
/// provision alphabet, or on empty input.
pub fn validate_provision(raw: &str) -> Result<ProvisionLocator, ValidationError> {
    ProvisionLocator::parse(raw)
}

/// Validates an optional subsection locator.
///
/// Absent input, including an empty string, stays absent: narrowing to a
/// subsection is opt-in.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidSubsection`] when a non-empty value is
/// neither a bare integer nor a well-formed bracketed list.
pub fn validate_subsection(
    raw: Option<&str>,
) -> Result<Option<SubsectionLocator>, ValidationError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => SubsectionLocator::parse(value).map(Some),
    }
}
