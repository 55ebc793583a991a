//! Graph node identifiers derived from free-text names.
//!
//! An [`Ident`] is the canonical node identifier for an entity or vocabulary
//! token. Derivation is a pure function of the input string: spaces become
//! underscores, characters illegal in Turtle local names are stripped, and a
//! forward slash maps to an underscore (removed, it would merge distinct
//! tokens). The human-readable label goes the other way and is display-only,
//! never used for identity.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A normalized, collision-checkable graph node identifier.
///
/// Construct via [`Ident::normalize`] (for free text) or [`Ident::fixed`]
/// (for schema vocabulary known to already be in normal form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ident(String);

impl Ident {
    /// Derive an identifier from a free-text name.
    ///
    /// Deterministic and side-effect-free. Fails on input that is empty or
    /// normalizes to the empty string.
    pub fn normalize(text: &str) -> Result<Self, ValidationError> {
        if text.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                ' ' | '/' => out.push('_'),
                '(' | ')' | '.' | ',' | '#' | '\'' => {}
                other => out.push(other),
            }
        }
        if out.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        Ok(Ident(out))
    }

    /// Wrap a schema-vocabulary name that is already a valid identifier.
    pub(crate) fn fixed(name: &str) -> Self {
        debug_assert!(
            Ident::normalize(name).map(|i| i.0 == name).unwrap_or(false),
            "schema vocabulary must already be in normal form: {name}"
        );
        Ident(name.to_owned())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the display label: underscores become spaces, each word is
    /// title-cased. Never used for identity.
    pub fn display_label(&self) -> String {
        self.0
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>()
                            + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        let id = Ident::normalize("Maize Lethal Necrosis Disease").unwrap();
        assert_eq!(id.as_str(), "Maize_Lethal_Necrosis_Disease");
    }

    #[test]
    fn illegal_characters_are_stripped() {
        let id = Ident::normalize("Diabrotica spp. (larvae)").unwrap();
        assert_eq!(id.as_str(), "Diabrotica_spp_larvae");
    }

    #[test]
    fn slash_maps_to_underscore_not_removed() {
        // Removing the slash would merge "a/b" and "ab".
        let a = Ident::normalize("a/b").unwrap();
        let b = Ident::normalize("ab").unwrap();
        assert_eq!(a.as_str(), "a_b");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            Ident::normalize(""),
            Err(ValidationError::EmptyIdentifier)
        ));
        // Input consisting only of stripped characters also normalizes to empty.
        assert!(matches!(
            Ident::normalize("()..,"),
            Err(ValidationError::EmptyIdentifier)
        ));
    }

    #[test]
    fn normalization_is_deterministic() {
        let a = Ident::normalize("daun mengkerut").unwrap();
        let b = Ident::normalize("daun mengkerut").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn display_label_title_cases_words() {
        let id = Ident::normalize("penurunan_hasil").unwrap();
        assert_eq!(id.display_label(), "Penurunan Hasil");
        let id = Ident::normalize("pH_tinggi").unwrap();
        assert_eq!(id.display_label(), "Ph Tinggi");
    }

    #[test]
    fn idents_order_lexicographically() {
        let a = Ident::normalize("akar").unwrap();
        let b = Ident::normalize("batang").unwrap();
        assert!(a < b);
    }
}
