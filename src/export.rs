//! Turtle serialization of a finished graph.
//!
//! Formatting is a single pass over the completed triple set: declarations
//! first (classes, then properties), then individuals grouped by subject in
//! identifier order. Content building never happens here; the graph is the
//! only source of data triples, the registry the only source of domain and
//! range declarations.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::graph::{Graph, Predicate, Term};
use crate::ident::Ident;
use crate::schema::{Class, SchemaRegistry};

/// Local namespace every resource reference is prefixed with.
pub const NAMESPACE: &str = "http://example.org/maize-kg#";

/// Ontology IRI used in the document header.
const ONTOLOGY_IRI: &str = "http://example.org/maize-kg";

/// Serialize the graph as a Turtle document.
///
/// The document declares the RDF, RDFS, OWL, and XSD prefixes plus the local
/// namespace; class and property declarations precede all individual data;
/// blocks are `;`-separated statements terminated by `.`, sorted by subject
/// identifier so identical graphs serialize identically.
pub fn to_turtle(graph: &Graph, registry: &SchemaRegistry) -> String {
    let mut out = String::new();

    writeln!(out, "@prefix owl: <http://www.w3.org/2002/07/owl#> .").unwrap();
    writeln!(out, "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .").unwrap();
    writeln!(out, "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .").unwrap();
    writeln!(out, "@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .").unwrap();
    writeln!(out, "@prefix : <{NAMESPACE}> .").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "<{ONTOLOGY_IRI}> a owl:Ontology ;").unwrap();
    writeln!(
        out,
        "    rdfs:label \"Maize pest and disease knowledge graph\" ;"
    )
    .unwrap();
    writeln!(
        out,
        "    rdfs:comment \"Ontology of pests, diseases, and nutrient deficiencies of maize\" ."
    )
    .unwrap();

    write_classes(&mut out, registry);
    write_properties(&mut out, registry);
    write_individuals(&mut out, graph, registry);

    out
}

fn write_classes(out: &mut String, registry: &SchemaRegistry) {
    writeln!(out, "\n# Classes\n").unwrap();
    for &class in registry.classes() {
        let mut lines = Vec::new();
        lines.push("a owl:Class".to_owned());
        if let Some(sup) = class.superclass() {
            lines.push(format!("rdfs:subClassOf :{}", sup.name()));
        }
        lines.push(format!("rdfs:label {}", quote(class.label())));
        if let Some(comment) = class.comment() {
            lines.push(format!("rdfs:comment {}", quote(comment)));
        }
        write_block(out, &format!(":{}", class.name()), &lines);
    }
}

fn write_properties(out: &mut String, registry: &SchemaRegistry) {
    writeln!(out, "\n# Object properties\n").unwrap();
    for &prop in registry.object_props() {
        let mut lines = Vec::new();
        lines.push("a owl:ObjectProperty".to_owned());
        lines.push(format!("rdfs:label {}", quote(prop.label())));
        lines.push(format!("rdfs:domain {}", domain_term(prop.domain())));
        lines.push(format!("rdfs:range :{}", prop.range().name()));
        write_block(out, &format!(":{}", prop.name()), &lines);
    }

    writeln!(out, "\n# Datatype properties\n").unwrap();
    for &prop in registry.data_props() {
        let mut lines = Vec::new();
        lines.push("a owl:DatatypeProperty".to_owned());
        lines.push(format!("rdfs:label {}", quote(prop.label())));
        lines.push(format!("rdfs:domain {}", domain_term(prop.domain())));
        lines.push("rdfs:range xsd:string".to_owned());
        write_block(out, &format!(":{}", prop.name()), &lines);
    }
}

/// A singleton domain is the class itself; a union becomes an anonymous
/// `owl:unionOf` class expression.
fn domain_term(domain: &[Class]) -> String {
    match domain {
        [single] => format!(":{}", single.name()),
        union => {
            let members: Vec<String> = union.iter().map(|c| format!(":{}", c.name())).collect();
            format!(
                "[\n        a owl:Class ;\n        owl:unionOf ( {} )\n    ]",
                members.join(" ")
            )
        }
    }
}

fn write_individuals(out: &mut String, graph: &Graph, registry: &SchemaRegistry) {
    writeln!(out, "\n# Individuals\n").unwrap();

    // Schema terms already appeared in the declaration sections.
    let is_schema_term = |ident: &Ident| {
        registry.class_by_ident(ident).is_some()
            || registry.object_props().iter().any(|p| p.ident() == *ident)
            || registry.data_props().iter().any(|p| p.ident() == *ident)
    };

    let mut by_subject: BTreeMap<&Ident, BTreeMap<Predicate, Vec<&Term>>> = BTreeMap::new();
    for triple in graph.iter() {
        if is_schema_term(&triple.subject) {
            continue;
        }
        by_subject
            .entry(&triple.subject)
            .or_default()
            .entry(triple.predicate)
            .or_default()
            .push(&triple.object);
    }

    for (subject, predicates) in by_subject {
        let lines: Vec<String> = predicates
            .iter()
            .map(|(predicate, objects)| {
                let rendered: Vec<String> = objects.iter().map(|o| render_term(o)).collect();
                format!("{} {}", render_predicate(*predicate), rendered.join(", "))
            })
            .collect();
        write_block(out, &format!(":{subject}"), &lines);
    }
}

/// One subject block: statements joined with ` ;`, terminated by ` .`.
fn write_block(out: &mut String, subject: &str, lines: &[String]) {
    match lines {
        [] => {}
        [only] => writeln!(out, "{subject} {only} .").unwrap(),
        [first, rest @ ..] => {
            writeln!(out, "{subject} {first} ;").unwrap();
            for line in &rest[..rest.len() - 1] {
                writeln!(out, "    {line} ;").unwrap();
            }
            writeln!(out, "    {} .", rest[rest.len() - 1]).unwrap();
        }
    }
}

fn render_predicate(predicate: Predicate) -> String {
    match predicate {
        Predicate::Type => "a".to_owned(),
        Predicate::SubClassOf => "rdfs:subClassOf".to_owned(),
        Predicate::Label => "rdfs:label".to_owned(),
        Predicate::Comment => "rdfs:comment".to_owned(),
        Predicate::Data(prop) => format!(":{}", prop.name()),
        Predicate::Object(prop) => format!(":{}", prop.name()),
    }
}

fn render_term(term: &Term) -> String {
    match term {
        Term::Node(ident) => format!(":{ident}"),
        Term::Vocab(vocab) => vocab.qname().to_owned(),
        Term::Literal(text) => quote(text),
    }
}

/// Quote and escape a string literal.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;
    use crate::schema::ObjectProp;

    fn node(name: &str) -> Ident {
        Ident::normalize(name).unwrap()
    }

    #[test]
    fn header_declares_all_prefixes() {
        let ttl = to_turtle(&Graph::new(), &SchemaRegistry::new());
        for prefix in ["@prefix owl:", "@prefix rdf:", "@prefix rdfs:", "@prefix xsd:", "@prefix :"] {
            assert!(ttl.contains(prefix), "missing {prefix}");
        }
        assert!(ttl.contains("a owl:Ontology"));
    }

    #[test]
    fn declarations_precede_individuals() {
        let mut graph = Graph::new();
        graph.add(Triple::typed(node("klorosis"), Class::Symptom));
        graph.add(Triple::labeled(node("klorosis"), "Klorosis"));

        let ttl = to_turtle(&graph, &SchemaRegistry::new());
        let class_pos = ttl.find(":Symptom a owl:Class").unwrap();
        let prop_pos = ttl.find(":hasSymptom a owl:ObjectProperty").unwrap();
        let individual_pos = ttl.find(":klorosis a :Symptom").unwrap();
        assert!(class_pos < individual_pos);
        assert!(prop_pos < individual_pos);
    }

    #[test]
    fn union_domains_use_union_of() {
        let ttl = to_turtle(&Graph::new(), &SchemaRegistry::new());
        assert!(ttl.contains("owl:unionOf ( :Pest :Disease :NutrientDeficiency )"));
        // spreadBy has a singleton domain, declared directly.
        assert!(ttl.contains(":spreadBy a owl:ObjectProperty"));
        let spread_block = &ttl[ttl.find(":spreadBy").unwrap()..];
        let spread_block = &spread_block[..spread_block.find(" .").unwrap()];
        assert!(spread_block.contains("rdfs:domain :Disease"));
    }

    #[test]
    fn multiple_objects_are_comma_joined() {
        let mut graph = Graph::new();
        let subject = node("Fall Armyworm");
        graph.add(Triple::typed(subject.clone(), Class::Pest));
        for symptom in ["bercak", "klorosis"] {
            graph.add(Triple::new(
                subject.clone(),
                Predicate::Object(ObjectProp::HasSymptom),
                Term::node(node(symptom)),
            ));
        }

        let ttl = to_turtle(&graph, &SchemaRegistry::new());
        assert!(ttl.contains(":hasSymptom :bercak, :klorosis"));
    }

    #[test]
    fn literals_are_escaped() {
        let mut graph = Graph::new();
        let subject = node("Oddity");
        graph.add(Triple::typed(subject.clone(), Class::Pest));
        graph.add(Triple::labeled(subject, "say \"hi\" \\ bye"));

        let ttl = to_turtle(&graph, &SchemaRegistry::new());
        assert!(ttl.contains(r#""say \"hi\" \\ bye""#));
    }

    #[test]
    fn serialization_is_deterministic() {
        let mut graph = Graph::new();
        graph.add(Triple::typed(node("zeta"), Class::Symptom));
        graph.add(Triple::typed(node("alpha"), Class::Symptom));
        let registry = SchemaRegistry::new();
        assert_eq!(to_turtle(&graph, &registry), to_turtle(&graph, &registry));
        // Subject order follows identifier order.
        let ttl = to_turtle(&graph, &registry);
        assert!(ttl.find(":alpha").unwrap() < ttl.find(":zeta").unwrap());
    }
}
