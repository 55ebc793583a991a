//! Triple graph: the atomic fact store.
//!
//! A [`Graph`] is a set of [`Triple`]s with idempotent insertion as its sole
//! mutation: adding an existing triple is a no-op, and nothing is ever
//! removed or rewritten. The backing `BTreeSet` keeps iteration (and thus
//! serialization) sorted and deterministic.

pub mod sparql;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ident::Ident;
use crate::schema::{Class, DataProp, ObjectProp};

/// Well-known vocabulary terms from the RDF/OWL/XSD namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Vocab {
    OwlClass,
    OwlObjectProperty,
    OwlDatatypeProperty,
    XsdString,
}

impl Vocab {
    /// Prefixed name as it appears in the emitted document.
    pub fn qname(self) -> &'static str {
        match self {
            Vocab::OwlClass => "owl:Class",
            Vocab::OwlObjectProperty => "owl:ObjectProperty",
            Vocab::OwlDatatypeProperty => "owl:DatatypeProperty",
            Vocab::XsdString => "xsd:string",
        }
    }
}

/// Object position of a triple: a local graph node, a well-known vocabulary
/// term, or a string literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Node(Ident),
    Vocab(Vocab),
    Literal(String),
}

impl Term {
    /// Convenience constructor for a node term.
    pub fn node(ident: Ident) -> Term {
        Term::Node(ident)
    }

    /// Convenience constructor for a class node term.
    pub fn class(class: Class) -> Term {
        Term::Node(class.ident())
    }

    /// Convenience constructor for a literal term.
    pub fn literal(text: impl Into<String>) -> Term {
        Term::Literal(text.into())
    }

    /// The node identifier, if this term is a local node.
    pub fn as_node(&self) -> Option<&Ident> {
        match self {
            Term::Node(ident) => Some(ident),
            _ => None,
        }
    }
}

/// Predicate position of a triple.
///
/// Variant order doubles as the within-subject emission order: type
/// assertions first, then annotations, then datatype and object properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Predicate {
    /// `rdf:type` (`a` in Turtle).
    Type,
    /// `rdfs:subClassOf`.
    SubClassOf,
    /// `rdfs:label`.
    Label,
    /// `rdfs:comment`.
    Comment,
    /// A schema datatype property.
    Data(DataProp),
    /// A schema object property.
    Object(ObjectProp),
}

/// One subject–predicate–object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Ident,
    pub predicate: Predicate,
    pub object: Term,
}

impl Triple {
    /// Create a triple.
    pub fn new(subject: Ident, predicate: Predicate, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Type assertion: `(subject, rdf:type, class)`.
    pub fn typed(subject: Ident, class: Class) -> Self {
        Triple::new(subject, Predicate::Type, Term::class(class))
    }

    /// Label annotation: `(subject, rdfs:label, text)`.
    pub fn labeled(subject: Ident, text: impl Into<String>) -> Self {
        Triple::new(subject, Predicate::Label, Term::literal(text))
    }
}

/// A set of triples, growing monotonically.
///
/// Built once by the generator, then extended (additions only) during
/// closure. Iteration order is the `Triple` ordering, so identical content
/// always serializes identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple. Returns `true` if it was new, `false` if it already
    /// existed (the add is then a no-op).
    pub fn add(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Whether the graph contains the exact triple.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over all triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// All class idents the node is typed with.
    pub fn types_of<'a>(&'a self, node: &'a Ident) -> impl Iterator<Item = &'a Ident> {
        self.triples
            .iter()
            .filter(move |t| t.subject == *node && t.predicate == Predicate::Type)
            .filter_map(|t| t.object.as_node())
    }

    /// Whether the node carries a type assertion to the given class.
    pub fn has_type(&self, node: &Ident, class: Class) -> bool {
        self.contains(&Triple::typed(node.clone(), class))
    }

    /// Whether the graph is a superset of another graph.
    pub fn is_superset_of(&self, other: &Graph) -> bool {
        self.triples.is_superset(&other.triples)
    }

    /// Distinct subject identifiers, sorted.
    pub fn subjects(&self) -> Vec<&Ident> {
        let mut out: Vec<&Ident> = Vec::new();
        for triple in &self.triples {
            if out.last() != Some(&&triple.subject) {
                out.push(&triple.subject);
            }
        }
        out
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Graph({} triples)", self.len())
    }
}
