//! Schema registry: the fixed class hierarchy and property tables.
//!
//! Every generated graph conforms to this schema. It is the single source of
//! truth consulted by both the triple generator (which predicate to use per
//! attribute list) and the closure engine (what to infer from domains, ranges,
//! and subclass edges).

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ident::Ident;

/// A named class in the fixed hierarchy.
///
/// Eleven top-level classes plus the three closed control-method subclasses.
/// Subclass edges form a forest of depth <= 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Class {
    Pest,
    Disease,
    NutrientDeficiency,
    Symptom,
    PlantPart,
    Pathogen,
    Vector,
    EnvironmentalFactor,
    PreventionMethod,
    ControlMethod,
    BiologicalControl,
    ChemicalControl,
    MechanicalControl,
    Plant,
}

impl Class {
    /// All classes, declaration order. Superclasses precede their subclasses.
    pub const ALL: [Class; 14] = [
        Class::Pest,
        Class::Disease,
        Class::NutrientDeficiency,
        Class::Symptom,
        Class::PlantPart,
        Class::Pathogen,
        Class::Vector,
        Class::EnvironmentalFactor,
        Class::PreventionMethod,
        Class::ControlMethod,
        Class::BiologicalControl,
        Class::ChemicalControl,
        Class::MechanicalControl,
        Class::Plant,
    ];

    /// The local name used in identifiers and the emitted document.
    pub fn name(self) -> &'static str {
        match self {
            Class::Pest => "Pest",
            Class::Disease => "Disease",
            Class::NutrientDeficiency => "NutrientDeficiency",
            Class::Symptom => "Symptom",
            Class::PlantPart => "PlantPart",
            Class::Pathogen => "Pathogen",
            Class::Vector => "Vector",
            Class::EnvironmentalFactor => "EnvironmentalFactor",
            Class::PreventionMethod => "PreventionMethod",
            Class::ControlMethod => "ControlMethod",
            Class::BiologicalControl => "BiologicalControl",
            Class::ChemicalControl => "ChemicalControl",
            Class::MechanicalControl => "MechanicalControl",
            Class::Plant => "Plant",
        }
    }

    /// The graph node identifier for this class.
    pub fn ident(self) -> Ident {
        Ident::fixed(self.name())
    }

    /// Human-readable label for annotations.
    pub fn label(self) -> &'static str {
        match self {
            Class::Pest => "Pest",
            Class::Disease => "Disease",
            Class::NutrientDeficiency => "Nutrient Deficiency",
            Class::Symptom => "Symptom",
            Class::PlantPart => "Plant Part",
            Class::Pathogen => "Pathogen",
            Class::Vector => "Vector",
            Class::EnvironmentalFactor => "Environmental Factor",
            Class::PreventionMethod => "Prevention Method",
            Class::ControlMethod => "Control Method",
            Class::BiologicalControl => "Biological Control",
            Class::ChemicalControl => "Chemical Control",
            Class::MechanicalControl => "Mechanical Control",
            Class::Plant => "Plant",
        }
    }

    /// Descriptive comment for annotations, where one exists.
    pub fn comment(self) -> Option<&'static str> {
        match self {
            Class::Pest => Some("Organism that damages the maize crop"),
            Class::Disease => Some("Disease caused by a pathogen"),
            Class::NutrientDeficiency => Some("Shortage of an essential nutrient"),
            Class::Symptom => Some("Sign or manifestation of a pest or disease"),
            Class::PlantPart => Some("Organ of the maize plant"),
            Class::Pathogen => Some("Kind of disease-causing agent"),
            Class::Vector => Some("Organism that spreads a disease"),
            Class::EnvironmentalFactor => Some("Environmental condition that influences occurrence"),
            Class::PreventionMethod => Some("Method of prevention"),
            Class::ControlMethod => Some("Method of pest or disease control"),
            Class::BiologicalControl => Some("Control using biological agents"),
            Class::ChemicalControl => Some("Control using pesticides or fungicides"),
            Class::MechanicalControl => Some("Physical or manual control"),
            Class::Plant => None,
        }
    }

    /// Registered direct superclass, if any. The hierarchy is a forest of
    /// depth <= 2: only the control-method subclasses have a parent.
    pub fn superclass(self) -> Option<Class> {
        match self {
            Class::BiologicalControl | Class::ChemicalControl | Class::MechanicalControl => {
                Some(Class::ControlMethod)
            }
            _ => None,
        }
    }

    /// Resolve a class from its local name.
    pub fn from_name(name: &str) -> Option<Class> {
        Class::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An object property: links two graph nodes, with a declared domain union
/// and a single range class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectProp {
    HasSymptom,
    AttacksPart,
    SpreadBy,
    InfluencedBy,
    PreventedBy,
    ControlledBy,
    AttacksPlant,
    CausedBy,
}

impl ObjectProp {
    /// All object properties, declaration order.
    pub const ALL: [ObjectProp; 8] = [
        ObjectProp::HasSymptom,
        ObjectProp::AttacksPart,
        ObjectProp::SpreadBy,
        ObjectProp::InfluencedBy,
        ObjectProp::PreventedBy,
        ObjectProp::ControlledBy,
        ObjectProp::AttacksPlant,
        ObjectProp::CausedBy,
    ];

    /// The local name used in the emitted document.
    pub fn name(self) -> &'static str {
        match self {
            ObjectProp::HasSymptom => "hasSymptom",
            ObjectProp::AttacksPart => "attacksPart",
            ObjectProp::SpreadBy => "spreadBy",
            ObjectProp::InfluencedBy => "influencedBy",
            ObjectProp::PreventedBy => "preventedBy",
            ObjectProp::ControlledBy => "controlledBy",
            ObjectProp::AttacksPlant => "attacksPlant",
            ObjectProp::CausedBy => "causedBy",
        }
    }

    /// The graph node identifier for this property.
    pub fn ident(self) -> Ident {
        Ident::fixed(self.name())
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ObjectProp::HasSymptom => "has symptom",
            ObjectProp::AttacksPart => "attacks plant part",
            ObjectProp::SpreadBy => "spread by",
            ObjectProp::InfluencedBy => "influenced by",
            ObjectProp::PreventedBy => "prevented by",
            ObjectProp::ControlledBy => "controlled by",
            ObjectProp::AttacksPlant => "attacks plant",
            ObjectProp::CausedBy => "caused by",
        }
    }

    /// Declared domain: a union of allowed subject classes.
    ///
    /// `spreadBy` is Disease-only even though only disease records carry
    /// vectors in practice; the others accept all three affliction classes.
    pub fn domain(self) -> &'static [Class] {
        const AFFLICTIONS: &[Class] = &[Class::Pest, Class::Disease, Class::NutrientDeficiency];
        match self {
            ObjectProp::SpreadBy => &[Class::Disease],
            _ => AFFLICTIONS,
        }
    }

    /// Declared range: the single allowed object class.
    pub fn range(self) -> Class {
        match self {
            ObjectProp::HasSymptom => Class::Symptom,
            ObjectProp::AttacksPart => Class::PlantPart,
            ObjectProp::SpreadBy => Class::Vector,
            ObjectProp::InfluencedBy => Class::EnvironmentalFactor,
            ObjectProp::PreventedBy => Class::PreventionMethod,
            ObjectProp::ControlledBy => Class::ControlMethod,
            ObjectProp::AttacksPlant => Class::Plant,
            ObjectProp::CausedBy => Class::Pathogen,
        }
    }
}

impl std::fmt::Display for ObjectProp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A datatype property: links a graph node to a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataProp {
    ScientificName,
    PrimaryCause,
}

impl DataProp {
    /// All datatype properties, declaration order.
    pub const ALL: [DataProp; 2] = [DataProp::ScientificName, DataProp::PrimaryCause];

    /// The local name used in the emitted document.
    pub fn name(self) -> &'static str {
        match self {
            DataProp::ScientificName => "scientificName",
            DataProp::PrimaryCause => "primaryCause",
        }
    }

    /// The graph node identifier for this property.
    pub fn ident(self) -> Ident {
        Ident::fixed(self.name())
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            DataProp::ScientificName => "scientific name",
            DataProp::PrimaryCause => "primary cause",
        }
    }

    /// Declared domain: a union of allowed subject classes.
    pub fn domain(self) -> &'static [Class] {
        match self {
            DataProp::ScientificName => &[
                Class::Pest,
                Class::Disease,
                Class::NutrientDeficiency,
                Class::Plant,
            ],
            DataProp::PrimaryCause => {
                &[Class::Pest, Class::Disease, Class::NutrientDeficiency]
            }
        }
    }
}

impl std::fmt::Display for DataProp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Read-only façade over the fixed schema tables.
///
/// All data is static; the struct exists so the generator and closure engine
/// take the registry as an explicit collaborator rather than reaching into
/// the enums directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Create the registry.
    pub fn new() -> Self {
        SchemaRegistry
    }

    /// The full class list.
    pub fn classes(&self) -> &'static [Class] {
        &Class::ALL
    }

    /// Every object property.
    pub fn object_props(&self) -> &'static [ObjectProp] {
        &ObjectProp::ALL
    }

    /// Every datatype property.
    pub fn data_props(&self) -> &'static [DataProp] {
        &DataProp::ALL
    }

    /// Domain union of an object property.
    pub fn domain_of(&self, prop: ObjectProp) -> &'static [Class] {
        prop.domain()
    }

    /// Range class of an object property.
    pub fn range_of(&self, prop: ObjectProp) -> Class {
        prop.range()
    }

    /// Registered direct superclass of a class.
    pub fn superclass_of(&self, class: Class) -> Option<Class> {
        class.superclass()
    }

    /// Resolve a class from a graph node identifier.
    pub fn class_by_ident(&self, ident: &Ident) -> Option<Class> {
        Class::from_name(ident.as_str())
    }

    /// Sanity-check the schema tables: subclass edges must form a DAG and
    /// every declared domain/range class must be registered.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut dag: DiGraph<Class, ()> = DiGraph::new();
        let nodes: Vec<_> = Class::ALL.iter().map(|&c| dag.add_node(c)).collect();
        for (i, &class) in Class::ALL.iter().enumerate() {
            if let Some(sup) = class.superclass() {
                let j = Class::ALL
                    .iter()
                    .position(|&c| c == sup)
                    .ok_or_else(|| EngineError::InvalidSchema {
                        message: format!("superclass of {class} is not registered"),
                    })?;
                dag.add_edge(nodes[i], nodes[j], ());
            }
        }
        if is_cyclic_directed(&dag) {
            return Err(EngineError::InvalidSchema {
                message: "subclass edges contain a cycle".into(),
            });
        }
        Ok(())
    }
}
