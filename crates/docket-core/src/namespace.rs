//! Case-derived namespaces for the vector index.
//!
//! A namespace is the isolation boundary between cases: every vector write
//! and query is scoped to exactly one namespace. The derivation from a raw
//! case name must be applied identically at ingestion and query time so
//! that the two line up.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace used when the caller supplies no case name.
const DEFAULT_CASE: &str = "default-case";

/// A normalized vector-index namespace derived from a case name.
///
/// Normalization is deterministic and idempotent: trim, lowercase, collapse
/// every run of characters outside `[a-z0-9_-]` into a single `-`, and trim
/// leading/trailing dashes. An input that normalizes to nothing falls back
/// to the default case namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Derives a namespace from a raw case name.
    pub fn derive(raw: &str) -> Self {
        let normalized = normalize(raw);

        if normalized.is_empty() {
            Self::default_case()
        } else {
            Self(normalized)
        }
    }

    /// Returns the default case namespace.
    pub fn default_case() -> Self {
        Self(DEFAULT_CASE.to_owned())
    }

    /// Returns the namespace as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::default_case()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Namespace> for String {
    fn from(namespace: Namespace) -> Self {
        namespace.0
    }
}

/// Lowercases and collapses disallowed character runs into single dashes.
fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for c in raw.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }

    out.trim_matches('-').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_idempotent() {
        let first = Namespace::derive("Smith vs. Jones");
        let second = Namespace::derive(first.as_str());

        assert_eq!(first, second);
    }

    #[test]
    fn punctuation_variants_collapse() {
        assert_eq!(
            Namespace::derive("Smith vs. Jones"),
            Namespace::derive("smith-vs-jones"),
        );
        assert_eq!(Namespace::derive("Smith vs. Jones").as_str(), "smith-vs-jones");
    }

    #[test]
    fn preserves_allowed_characters() {
        assert_eq!(Namespace::derive("case_42-b").as_str(), "case_42-b");
    }

    #[test]
    fn collapses_runs_of_disallowed_characters() {
        assert_eq!(Namespace::derive("Acme  //  Corp").as_str(), "acme-corp");
    }

    #[test]
    fn trims_leading_and_trailing_dashes() {
        assert_eq!(Namespace::derive("  (Estate of Doe)  ").as_str(), "estate-of-doe");
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        assert_eq!(Namespace::derive("").as_str(), "default-case");
        assert_eq!(Namespace::derive("  !!!  ").as_str(), "default-case");
        assert_eq!(Namespace::default(), Namespace::default_case());
    }
}
