//! Closure engine: forward-chaining rule evaluation to a fixed point.
//!
//! Three monotone rules are applied in full passes until a pass adds no
//! triple: subclass propagation, domain typing, and range typing. See
//! [`closure::close`] for the evaluator.

pub mod closure;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ident::Ident;

/// The three inference rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// `(x, type, C)` and `C subClassOf D` yields `(x, type, D)`.
    Subclass,
    /// `(s, p, o)` with a singleton declared domain `{D}` yields
    /// `(s, type, D)`. Union domains never assert; see
    /// [`InferenceReport::underdetermined`].
    Domain,
    /// `(s, p, o)` with non-literal `o` and declared range `R` yields
    /// `(o, type, R)`.
    Range,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Subclass => write!(f, "subclass"),
            Rule::Domain => write!(f, "domain"),
            Rule::Range => write!(f, "range"),
        }
    }
}

/// A subject whose union-domain membership could not be pinned to one class.
///
/// Recorded when a property's declared domain is a union of two or more
/// classes and the subject carries no type assertion inside that union. The
/// engine refuses to guess a member; the finding is surfaced as data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnderDetermined {
    pub subject: Ident,
    /// Local name of the property whose domain union the subject sits in.
    pub property: String,
}

/// Per-rule contribution counts for one closure run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceReport {
    /// Full rule passes executed, including the final zero-delta pass.
    pub passes: usize,
    /// Triples contributed by subclass propagation.
    pub subclass_added: usize,
    /// Triples contributed by domain typing.
    pub domain_added: usize,
    /// Triples contributed by range typing.
    pub range_added: usize,
    /// Under-determined union-domain subjects, relative to the closed graph.
    pub underdetermined: BTreeSet<UnderDetermined>,
}

impl InferenceReport {
    /// Total triples added by the closure run.
    pub fn total_added(&self) -> usize {
        self.subclass_added + self.domain_added + self.range_added
    }
}

impl std::fmt::Display for InferenceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "inference report")?;
        writeln!(f, "  passes:            {}", self.passes)?;
        writeln!(f, "  subclass inferred: {}", self.subclass_added)?;
        writeln!(f, "  domain inferred:   {}", self.domain_added)?;
        writeln!(f, "  range inferred:    {}", self.range_added)?;
        writeln!(f, "  total inferred:    {}", self.total_added())?;
        writeln!(f, "  under-determined:  {}", self.underdetermined.len())?;
        for finding in &self.underdetermined {
            writeln!(
                f,
                "    {} via {} (union domain, no type asserted)",
                finding.subject, finding.property
            )?;
        }
        Ok(())
    }
}
