//! Fixed-point evaluation of the three inference rules.
//!
//! Each pass computes every rule's proposed additions against a snapshot of
//! the graph, then merges them. All rules only ever add `rdf:type` triples,
//! so proposals within a pass are independent and are evaluated in parallel;
//! the pass is the unit of sequencing. Termination is guaranteed because the
//! set of (node, class) pairs is finite and the graph grows monotonically.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::graph::{Graph, Predicate, Triple};
use crate::schema::SchemaRegistry;

use super::{InferenceReport, UnderDetermined};

/// Compute the closure of `graph` under subclass, domain, and range typing.
///
/// Idempotent: closing an already-closed graph adds zero triples. The
/// returned report carries per-rule contribution counts and the
/// under-determined union-domain findings, both relative to the final graph.
pub fn close(graph: Graph, registry: &SchemaRegistry) -> (Graph, InferenceReport) {
    let mut graph = graph;
    let mut report = InferenceReport::default();

    loop {
        report.passes += 1;
        let snapshot: Vec<Triple> = graph.iter().cloned().collect();

        let subclass = propose_subclass(&snapshot, registry);
        let domain = propose_domain(&snapshot, registry);
        let range = propose_range(&snapshot, registry);

        // Merge in rule order so contribution attribution is deterministic
        // when two rules propose the same triple.
        let mut added = 0usize;
        for triple in subclass {
            if graph.add(triple) {
                report.subclass_added += 1;
                added += 1;
            }
        }
        for triple in domain {
            if graph.add(triple) {
                report.domain_added += 1;
                added += 1;
            }
        }
        for triple in range {
            if graph.add(triple) {
                report.range_added += 1;
                added += 1;
            }
        }

        debug!(pass = report.passes, added, "closure pass complete");
        if added == 0 {
            break;
        }
    }

    report.underdetermined = find_underdetermined(&graph, registry);

    info!(
        passes = report.passes,
        inferred = report.total_added(),
        underdetermined = report.underdetermined.len(),
        triples = graph.len(),
        "closure reached fixed point"
    );
    (graph, report)
}

/// Subclass rule: propagate every typed node to its registered superclass.
fn propose_subclass(snapshot: &[Triple], registry: &SchemaRegistry) -> Vec<Triple> {
    snapshot
        .par_iter()
        .filter_map(|t| {
            if t.predicate != Predicate::Type {
                return None;
            }
            let class = registry.class_by_ident(t.object.as_node()?)?;
            let sup = registry.superclass_of(class)?;
            Some(Triple::typed(t.subject.clone(), sup))
        })
        .collect()
}

/// Domain rule: type subjects of properties whose declared domain has exactly one
/// member. Union domains are handled by [`find_underdetermined`] instead of
/// guessing a member.
fn propose_domain(snapshot: &[Triple], registry: &SchemaRegistry) -> Vec<Triple> {
    snapshot
        .par_iter()
        .filter_map(|t| {
            let Predicate::Object(prop) = t.predicate else {
                return None;
            };
            match registry.domain_of(prop) {
                [single] => Some(Triple::typed(t.subject.clone(), *single)),
                _ => None,
            }
        })
        .collect()
}

/// Range rule: type non-literal objects with the property's declared range.
fn propose_range(snapshot: &[Triple], registry: &SchemaRegistry) -> Vec<Triple> {
    snapshot
        .par_iter()
        .filter_map(|t| {
            let Predicate::Object(prop) = t.predicate else {
                return None;
            };
            let object = t.object.as_node()?;
            Some(Triple::typed(object.clone(), registry.range_of(prop)))
        })
        .collect()
}

/// Subjects of union-domain properties with no type inside the union,
/// evaluated against the closed graph.
fn find_underdetermined(
    graph: &Graph,
    registry: &SchemaRegistry,
) -> std::collections::BTreeSet<UnderDetermined> {
    let mut findings = std::collections::BTreeSet::new();
    for triple in graph.iter() {
        let (domain, property) = match triple.predicate {
            Predicate::Object(prop) => (registry.domain_of(prop), prop.name()),
            Predicate::Data(prop) => (prop.domain(), prop.name()),
            _ => continue,
        };
        if domain.len() < 2 {
            continue;
        }
        let in_union = graph
            .types_of(&triple.subject)
            .filter_map(|ident| registry.class_by_ident(ident))
            .any(|class| domain.contains(&class));
        if !in_union {
            findings.insert(UnderDetermined {
                subject: triple.subject.clone(),
                property: property.to_owned(),
            });
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Term;
    use crate::ident::Ident;
    use crate::schema::{Class, ObjectProp};

    fn node(name: &str) -> Ident {
        Ident::normalize(name).unwrap()
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    #[test]
    fn subclass_propagation() {
        let mut graph = Graph::new();
        graph.add(Triple::typed(node("perangkap"), Class::MechanicalControl));

        let (closed, report) = close(graph, &registry());
        assert!(closed.has_type(&node("perangkap"), Class::ControlMethod));
        assert_eq!(report.subclass_added, 1);
    }

    #[test]
    fn range_typing_types_objects() {
        let mut graph = Graph::new();
        graph.add(Triple::new(
            node("Downy Mildew"),
            Predicate::Object(ObjectProp::HasSymptom),
            Term::node(node("klorosis")),
        ));

        let (closed, report) = close(graph, &registry());
        assert!(closed.has_type(&node("klorosis"), Class::Symptom));
        assert_eq!(report.range_added, 1);
    }

    #[test]
    fn singleton_domain_fires() {
        let mut graph = Graph::new();
        graph.add(Triple::new(
            node("Downy Mildew"),
            Predicate::Object(ObjectProp::SpreadBy),
            Term::node(node("wereng")),
        ));

        let (closed, report) = close(graph, &registry());
        assert!(closed.has_type(&node("Downy Mildew"), Class::Disease));
        assert_eq!(report.domain_added, 1);
        // The vector object got range-typed as well.
        assert!(closed.has_type(&node("wereng"), Class::Vector));
    }

    #[test]
    fn union_domain_never_asserts_a_member() {
        let mut graph = Graph::new();
        // Subject linked via controlledBy, never otherwise typed.
        graph.add(Triple::new(
            node("mystery"),
            Predicate::Object(ObjectProp::ControlledBy),
            Term::node(node("perangkap")),
        ));

        let (closed, report) = close(graph, &registry());
        let subject = node("mystery");
        assert!(!closed.has_type(&subject, Class::Pest));
        assert!(!closed.has_type(&subject, Class::Disease));
        assert!(!closed.has_type(&subject, Class::NutrientDeficiency));
        assert!(report
            .underdetermined
            .iter()
            .any(|u| u.subject == subject && u.property == "controlledBy"));
    }

    #[test]
    fn typed_subject_is_not_underdetermined() {
        let mut graph = Graph::new();
        graph.add(Triple::typed(node("Fall Armyworm"), Class::Pest));
        graph.add(Triple::new(
            node("Fall Armyworm"),
            Predicate::Object(ObjectProp::ControlledBy),
            Term::node(node("perangkap")),
        ));

        let (_, report) = close(graph, &registry());
        assert!(report.underdetermined.is_empty());
    }

    #[test]
    fn closure_is_idempotent_and_monotone() {
        let mut graph = Graph::new();
        graph.add(Triple::typed(node("perangkap"), Class::MechanicalControl));
        graph.add(Triple::new(
            node("Termites"),
            Predicate::Object(ObjectProp::ControlledBy),
            Term::node(node("perangkap")),
        ));

        let base = graph.clone();
        let (closed, _) = close(graph, &registry());
        assert!(closed.is_superset_of(&base));

        let (again, report) = close(closed.clone(), &registry());
        assert_eq!(again, closed);
        assert_eq!(report.total_added(), 0);
        assert_eq!(report.passes, 1);
    }

    #[test]
    fn shared_derivation_is_counted_once() {
        // The subclass rule (via MechanicalControl) and the range rule (via
        // controlledBy) both
        // derive the same ControlMethod typing; only one rule may claim it.
        let mut graph = Graph::new();
        graph.add(Triple::new(
            node("Termites"),
            Predicate::Object(ObjectProp::ControlledBy),
            Term::node(node("perangkap")),
        ));
        graph.add(Triple::typed(node("perangkap"), Class::MechanicalControl));

        let (closed, report) = close(graph, &registry());
        assert!(closed.has_type(&node("perangkap"), Class::ControlMethod));
        assert_eq!(report.subclass_added + report.range_added, 1);
    }
}
