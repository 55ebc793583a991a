//! Consistency checker: sanity queries over the closed graph.
//!
//! Checks never mutate the graph and never raise; findings come back as
//! data. An empty result is not a proof of consistency, only the absence of
//! the specific problems looked for. Safe to run on a partially-closed
//! graph, though results are only meaningful after closure.

use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::ident::Ident;
use crate::schema::Class;

/// The top-level classes no node may combine.
const EXCLUSIVE_CLASSES: [Class; 3] = [Class::Pest, Class::Disease, Class::NutrientDeficiency];

/// Kind of consistency violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Node typed with two mutually exclusive top-level classes.
    MutualExclusion { first: Class, second: Class },
    /// Individual typed with a schema class but carrying no label.
    MissingLabel,
}

/// One finding: a violation kind attached to the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub node: Ident,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ViolationKind::MutualExclusion { first, second } => {
                write!(f, "{} is typed as both {first} and {second}", self.node)
            }
            ViolationKind::MissingLabel => {
                write!(f, "{} has no rdfs:label", self.node)
            }
        }
    }
}

/// Run the full check battery. Adding a check means appending a function
/// call here; each check is a pure function over the graph.
pub fn check(graph: &Graph) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(check_mutual_exclusion(graph));
    violations.extend(check_labels(graph));
    violations
}

/// No node may be typed with two of {Pest, Disease, NutrientDeficiency}.
fn check_mutual_exclusion(graph: &Graph) -> Vec<Violation> {
    let mut violations = Vec::new();
    for subject in graph.subjects() {
        let held: Vec<Class> = EXCLUSIVE_CLASSES
            .into_iter()
            .filter(|&class| graph.has_type(subject, class))
            .collect();
        for pair in held.windows(2) {
            violations.push(Violation {
                kind: ViolationKind::MutualExclusion {
                    first: pair[0],
                    second: pair[1],
                },
                node: subject.clone(),
            });
        }
    }
    violations
}

/// Every individual typed with a schema class should carry a label.
///
/// Class and property declarations are exempt: only nodes typed via
/// `rdf:type` to a registered class are individuals.
fn check_labels(graph: &Graph) -> Vec<Violation> {
    use crate::graph::{Predicate, Triple};

    let mut violations = Vec::new();
    for subject in graph.subjects() {
        let is_individual = graph
            .types_of(subject)
            .any(|ident| Class::from_name(ident.as_str()).is_some());
        if !is_individual {
            continue;
        }
        let labeled = graph
            .iter()
            .any(|t: &Triple| t.subject == *subject && t.predicate == Predicate::Label);
        if !labeled {
            violations.push(Violation {
                kind: ViolationKind::MissingLabel,
                node: subject.clone(),
            });
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;

    fn node(name: &str) -> Ident {
        Ident::normalize(name).unwrap()
    }

    #[test]
    fn clean_graph_has_no_violations() {
        let mut graph = Graph::new();
        graph.add(Triple::typed(node("Fall Armyworm"), Class::Pest));
        graph.add(Triple::labeled(node("Fall Armyworm"), "Fall Armyworm"));
        assert!(check(&graph).is_empty());
    }

    #[test]
    fn double_typed_node_is_flagged() {
        let mut graph = Graph::new();
        let n = node("Confused");
        graph.add(Triple::typed(n.clone(), Class::Pest));
        graph.add(Triple::typed(n.clone(), Class::Disease));
        graph.add(Triple::labeled(n.clone(), "Confused"));

        let violations = check(&graph);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0].kind,
            ViolationKind::MutualExclusion {
                first: Class::Pest,
                second: Class::Disease,
            }
        ));
        assert_eq!(violations[0].node, n);
    }

    #[test]
    fn triple_typed_node_yields_two_findings() {
        let mut graph = Graph::new();
        let n = node("VeryConfused");
        graph.add(Triple::typed(n.clone(), Class::Pest));
        graph.add(Triple::typed(n.clone(), Class::Disease));
        graph.add(Triple::typed(n.clone(), Class::NutrientDeficiency));
        graph.add(Triple::labeled(n.clone(), "Very Confused"));

        let violations = check(&graph);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn unlabeled_individual_is_flagged() {
        let mut graph = Graph::new();
        graph.add(Triple::typed(node("klorosis"), Class::Symptom));
        let violations = check(&graph);
        assert_eq!(violations.len(), 1);
        assert!(matches!(violations[0].kind, ViolationKind::MissingLabel));
    }

    #[test]
    fn checker_does_not_mutate() {
        let mut graph = Graph::new();
        graph.add(Triple::typed(node("klorosis"), Class::Symptom));
        let before = graph.clone();
        let _ = check(&graph);
        assert_eq!(graph, before);
    }
}
