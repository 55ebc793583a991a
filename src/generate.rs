//! Triple generator: maps the entity dataset onto a schema-conformant graph.
//!
//! Generation is a pure function of the record sequence and the schema
//! registry. A vocabulary pre-pass unions every token list across the whole
//! dataset before any triple is emitted, so per-record iteration never
//! mutates shared state. Identifier derivation is checked for injectivity
//! against a reverse map seeded with the schema vocabulary.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::error::{KgResult, ValidationError};
use crate::graph::{Graph, Predicate, Term, Triple, Vocab};
use crate::ident::Ident;
use crate::record::{EntityRecord, PathogenKind};
use crate::schema::{Class, SchemaRegistry};

/// Local name of the single plant individual every record attacks.
pub const MAIZE: &str = "Maize";

/// Scientific name literal attached to the plant individual.
pub const MAIZE_SCIENTIFIC_NAME: &str = "Zea mays";

/// Reverse map from normalized identifier to the original source string.
///
/// Detects collisions: two distinct inputs may never share an identifier.
/// Seeded with the schema vocabulary so data tokens cannot shadow classes,
/// properties, or fixed individuals either.
struct NodeTable {
    originals: HashMap<Ident, String>,
}

impl NodeTable {
    fn with_schema_vocabulary(registry: &SchemaRegistry) -> Self {
        let mut originals = HashMap::new();
        for &class in registry.classes() {
            originals.insert(class.ident(), class.name().to_owned());
        }
        for &prop in registry.object_props() {
            originals.insert(prop.ident(), prop.name().to_owned());
        }
        for &prop in registry.data_props() {
            originals.insert(prop.ident(), prop.name().to_owned());
        }
        for kind in PathogenKind::ALL {
            originals.insert(
                Ident::fixed(kind.individual_name()),
                kind.individual_name().to_owned(),
            );
        }
        originals.insert(Ident::fixed(MAIZE), MAIZE.to_owned());
        Self { originals }
    }

    /// Normalize `text` and record the mapping, failing if a different
    /// source string already claimed the identifier.
    fn intern(&mut self, text: &str) -> Result<Ident, ValidationError> {
        let ident = Ident::normalize(text)?;
        match self.originals.get(&ident) {
            Some(existing) if existing != text => Err(ValidationError::IdentifierCollision {
                ident: ident.as_str().to_owned(),
                existing: existing.clone(),
                incoming: text.to_owned(),
            }),
            Some(_) => Ok(ident),
            None => {
                self.originals.insert(ident.clone(), text.to_owned());
                Ok(ident)
            }
        }
    }
}

/// Immutable per-category token sets, unioned over the whole dataset.
///
/// Built before emission so the generator stays a pure function of its
/// input. Empty strings are dropped, matching the source convention of
/// skipping blank list entries.
#[derive(Debug, Default)]
struct VocabSets {
    symptoms: BTreeSet<String>,
    plant_parts: BTreeSet<String>,
    vectors: BTreeSet<String>,
    environmental_factors: BTreeSet<String>,
    prevention: BTreeSet<String>,
    biological_control: BTreeSet<String>,
    chemical_control: BTreeSet<String>,
    mechanical_control: BTreeSet<String>,
}

impl VocabSets {
    fn collect(records: &[EntityRecord]) -> Self {
        fn extend(set: &mut BTreeSet<String>, tokens: &[String]) {
            set.extend(tokens.iter().filter(|t| !t.is_empty()).cloned());
        }

        let mut sets = VocabSets::default();
        for record in records {
            extend(&mut sets.symptoms, &record.symptoms);
            extend(&mut sets.plant_parts, &record.plant_parts);
            extend(&mut sets.vectors, &record.vectors);
            extend(&mut sets.environmental_factors, &record.environmental_factors);
            extend(&mut sets.prevention, &record.prevention);
            extend(&mut sets.biological_control, &record.biological_control);
            extend(&mut sets.chemical_control, &record.chemical_control);
            extend(&mut sets.mechanical_control, &record.mechanical_control);
        }
        sets
    }

    /// Vocabulary sets paired with the class their tokens are typed with.
    fn classed(&self) -> [(&BTreeSet<String>, Class); 8] {
        [
            (&self.symptoms, Class::Symptom),
            (&self.plant_parts, Class::PlantPart),
            (&self.vectors, Class::Vector),
            (&self.environmental_factors, Class::EnvironmentalFactor),
            (&self.prevention, Class::PreventionMethod),
            (&self.biological_control, Class::BiologicalControl),
            (&self.chemical_control, Class::ChemicalControl),
            (&self.mechanical_control, Class::MechanicalControl),
        ]
    }
}

/// Generate the base graph for a record sequence.
///
/// Emits schema declarations, fixed individuals, the vocabulary individuals
/// collected by set union, and all per-record relation/attribute triples.
/// Fails with a [`ValidationError`] on a jointly-inconsistent record or an
/// identifier collision; never partially succeeds silently.
pub fn generate(records: &[EntityRecord], registry: &SchemaRegistry) -> KgResult<Graph> {
    for record in records {
        record.validate()?;
    }

    let mut table = NodeTable::with_schema_vocabulary(registry);
    let vocab = VocabSets::collect(records);
    let mut graph = Graph::new();

    emit_schema(&mut graph, registry);
    emit_fixed_individuals(&mut graph);
    emit_vocabulary(&mut graph, &vocab, &mut table)?;

    for record in records {
        emit_record(&mut graph, record, &mut table)?;
    }

    info!(
        records = records.len(),
        triples = graph.len(),
        "generated base graph"
    );
    Ok(graph)
}

/// Class and property declaration triples.
fn emit_schema(graph: &mut Graph, registry: &SchemaRegistry) {
    for &class in registry.classes() {
        let ident = class.ident();
        graph.add(Triple::new(
            ident.clone(),
            Predicate::Type,
            Term::Vocab(Vocab::OwlClass),
        ));
        if let Some(sup) = class.superclass() {
            graph.add(Triple::new(
                ident.clone(),
                Predicate::SubClassOf,
                Term::class(sup),
            ));
        }
        graph.add(Triple::labeled(ident.clone(), class.label()));
        if let Some(comment) = class.comment() {
            graph.add(Triple::new(
                ident,
                Predicate::Comment,
                Term::literal(comment),
            ));
        }
    }

    for &prop in registry.object_props() {
        let ident = prop.ident();
        graph.add(Triple::new(
            ident.clone(),
            Predicate::Type,
            Term::Vocab(Vocab::OwlObjectProperty),
        ));
        graph.add(Triple::labeled(ident, prop.label()));
    }

    for &prop in registry.data_props() {
        let ident = prop.ident();
        graph.add(Triple::new(
            ident.clone(),
            Predicate::Type,
            Term::Vocab(Vocab::OwlDatatypeProperty),
        ));
        graph.add(Triple::labeled(ident, prop.label()));
    }
}

/// The five pathogen singletons and the Maize plant individual.
fn emit_fixed_individuals(graph: &mut Graph) {
    for kind in PathogenKind::ALL {
        let ident = Ident::fixed(kind.individual_name());
        graph.add(Triple::typed(ident.clone(), Class::Pathogen));
        graph.add(Triple::labeled(ident.clone(), kind.individual_name()));
        graph.add(Triple::new(
            ident,
            Predicate::Comment,
            Term::literal(kind.comment()),
        ));
    }

    let maize = Ident::fixed(MAIZE);
    graph.add(Triple::typed(maize.clone(), Class::Plant));
    graph.add(Triple::labeled(maize.clone(), MAIZE));
    graph.add(Triple::new(
        maize,
        Predicate::Data(crate::schema::DataProp::ScientificName),
        Term::literal(MAIZE_SCIENTIFIC_NAME),
    ));
}

/// One type triple and one label per unique vocabulary token.
///
/// Control-method tokens are typed with their specific subclass only; the
/// closure engine derives the `ControlMethod` supertype.
fn emit_vocabulary(
    graph: &mut Graph,
    vocab: &VocabSets,
    table: &mut NodeTable,
) -> KgResult<()> {
    for (set, class) in vocab.classed() {
        for token in set {
            let ident = table.intern(token)?;
            graph.add(Triple::typed(ident.clone(), class));
            graph.add(Triple::labeled(ident.clone(), ident.display_label()));
        }
        debug!(class = %class, tokens = set.len(), "emitted vocabulary individuals");
    }
    Ok(())
}

/// All triples for one record.
fn emit_record(
    graph: &mut Graph,
    record: &EntityRecord,
    table: &mut NodeTable,
) -> KgResult<()> {
    use crate::schema::{DataProp, ObjectProp};

    let subject = table.intern(&record.name)?;

    graph.add(Triple::typed(subject.clone(), record.category.class()));
    graph.add(Triple::labeled(subject.clone(), record.name.clone()));
    graph.add(Triple::new(
        subject.clone(),
        Predicate::Data(DataProp::ScientificName),
        Term::literal(record.scientific_name.clone()),
    ));
    graph.add(Triple::new(
        subject.clone(),
        Predicate::Data(DataProp::PrimaryCause),
        Term::literal(record.primary_cause.clone()),
    ));
    graph.add(Triple::new(
        subject.clone(),
        Predicate::Object(ObjectProp::CausedBy),
        Term::node(Ident::fixed(record.pathogen_kind.individual_name())),
    ));
    graph.add(Triple::new(
        subject.clone(),
        Predicate::Object(ObjectProp::AttacksPlant),
        Term::node(Ident::fixed(MAIZE)),
    ));

    let lists: [(&[String], ObjectProp); 4] = [
        (&record.symptoms, ObjectProp::HasSymptom),
        (&record.plant_parts, ObjectProp::AttacksPart),
        (&record.vectors, ObjectProp::SpreadBy),
        (&record.environmental_factors, ObjectProp::InfluencedBy),
    ];
    for (tokens, prop) in lists {
        emit_list(graph, &subject, tokens, prop, table)?;
    }
    emit_list(
        graph,
        &subject,
        &record.prevention,
        ObjectProp::PreventedBy,
        table,
    )?;

    // All three control lists share one predicate; the subclass typing was
    // already emitted in the vocabulary pass.
    for (tokens, _) in record.control_lists() {
        emit_list(graph, &subject, tokens, ObjectProp::ControlledBy, table)?;
    }

    Ok(())
}

/// One triple per non-empty list element; empty lists emit nothing.
fn emit_list(
    graph: &mut Graph,
    subject: &Ident,
    tokens: &[String],
    prop: crate::schema::ObjectProp,
    table: &mut NodeTable,
) -> KgResult<()> {
    for token in tokens.iter().filter(|t| !t.is_empty()) {
        let object = table.intern(token)?;
        graph.add(Triple::new(
            subject.clone(),
            Predicate::Object(prop),
            Term::node(object),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{bundled_records, Category};
    use crate::schema::ObjectProp;

    fn one_record() -> EntityRecord {
        EntityRecord {
            id: 1,
            name: "Flower Chafer".into(),
            scientific_name: "Oxycetonia versicolor".into(),
            category: Category::Pest,
            pathogen_kind: PathogenKind::Insect,
            primary_cause: "kumbang_flower_chafer".into(),
            plant_parts: vec!["bunga".into(), "pucuk".into()],
            symptoms: vec!["kerusakan".into(), "penurunan_hasil".into()],
            vectors: vec![],
            environmental_factors: vec![],
            prevention: vec!["monitoring_rutin".into(), "rotasi_tanaman".into()],
            biological_control: vec![],
            chemical_control: vec![],
            mechanical_control: vec![],
        }
    }

    #[test]
    fn single_record_emits_expected_triples() {
        let registry = SchemaRegistry::new();
        let graph = generate(&[one_record()], &registry).unwrap();
        let subject = Ident::normalize("Flower Chafer").unwrap();

        assert!(graph.has_type(&subject, Class::Pest));
        assert!(graph.contains(&Triple::labeled(subject.clone(), "Flower Chafer")));
        assert!(graph.contains(&Triple::new(
            subject.clone(),
            Predicate::Object(ObjectProp::CausedBy),
            Term::node(Ident::fixed("Insect")),
        )));
        assert!(graph.contains(&Triple::new(
            subject.clone(),
            Predicate::Object(ObjectProp::AttacksPlant),
            Term::node(Ident::fixed(MAIZE)),
        )));

        let symptoms: Vec<_> = graph
            .iter()
            .filter(|t| {
                t.subject == subject
                    && t.predicate == Predicate::Object(ObjectProp::HasSymptom)
            })
            .collect();
        assert_eq!(symptoms.len(), 2);

        // Empty lists emit nothing.
        assert!(!graph.iter().any(|t| {
            t.subject == subject && t.predicate == Predicate::Object(ObjectProp::SpreadBy)
        }));
    }

    #[test]
    fn control_tokens_typed_once_per_unique_token() {
        let registry = SchemaRegistry::new();
        let mut a = one_record();
        a.chemical_control = vec!["pyrethroid".into()];
        let mut b = one_record();
        b.id = 2;
        b.name = "Bagrada Bug".into();
        b.chemical_control = vec!["pyrethroid".into()];

        let graph = generate(&[a, b], &registry).unwrap();
        let tok = Ident::normalize("pyrethroid").unwrap();
        let type_triples = graph
            .iter()
            .filter(|t| t.subject == tok && t.predicate == Predicate::Type)
            .count();
        assert_eq!(type_triples, 1);
        assert!(graph.has_type(&tok, Class::ChemicalControl));
    }

    #[test]
    fn identifier_collision_is_detected() {
        let registry = SchemaRegistry::new();
        let mut a = one_record();
        // "daun a" and "daun.a" both normalize to "daun_a".
        a.symptoms = vec!["daun a".into(), "daun.a".into()];
        let err = generate(&[a], &registry).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("collision"), "unexpected error: {msg}");
    }

    #[test]
    fn data_token_shadowing_schema_vocabulary_is_rejected() {
        let registry = SchemaRegistry::new();
        let mut a = one_record();
        a.symptoms = vec!["Maize.".into()]; // normalizes to the plant individual's ident
        assert!(generate(&[a], &registry).is_err());
    }

    #[test]
    fn inconsistent_record_aborts_generation() {
        let registry = SchemaRegistry::new();
        let mut a = one_record();
        a.pathogen_kind = PathogenKind::Virus; // Pest + virus violates the invariant
        assert!(generate(&[a], &registry).is_err());
    }

    #[test]
    fn generation_is_deterministic() {
        let registry = SchemaRegistry::new();
        let records = bundled_records().unwrap();
        let a = generate(&records, &registry).unwrap();
        let b = generate(&records, &registry).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bundled_dataset_generates_clean_graph() {
        let registry = SchemaRegistry::new();
        let records = bundled_records().unwrap();
        let graph = generate(&records, &registry).unwrap();

        // Every record node is typed with exactly its category class.
        for record in &records {
            let node = Ident::normalize(&record.name).unwrap();
            assert!(graph.has_type(&node, record.category.class()));
        }
        // The five pathogen singletons exist.
        for kind in PathogenKind::ALL {
            assert!(graph.has_type(&Ident::fixed(kind.individual_name()), Class::Pathogen));
        }
    }
}
