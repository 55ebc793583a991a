//! Entity records: the curated input dataset.
//!
//! One [`EntityRecord`] describes a single pest, disease, or nutrient
//! deficiency. Records are read once from a JSON document and are immutable
//! thereafter. The canonical 30-record maize dataset is bundled into the
//! binary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schema::Class;

/// Canonical 30-record maize dataset, baked in at compile time.
const BUNDLED_DATASET: &str = include_str!("../data/maize_records.json");

/// Top-level category of a record. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Pest,
    Disease,
    Deficiency,
}

impl Category {
    /// The schema class individuals of this category are typed with.
    pub fn class(self) -> Class {
        match self {
            Category::Pest => Class::Pest,
            Category::Disease => Class::Disease,
            Category::Deficiency => Class::NutrientDeficiency,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Pest => write!(f, "Pest"),
            Category::Disease => write!(f, "Disease"),
            Category::Deficiency => write!(f, "Deficiency"),
        }
    }
}

/// Causal-agent kind. Determines which pathogen singleton a record's
/// `causedBy` triple points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathogenKind {
    Insect,
    Fungus,
    Bacterium,
    Virus,
    Deficiency,
}

impl PathogenKind {
    /// All pathogen kinds; each has one singleton individual in the graph.
    pub const ALL: [PathogenKind; 5] = [
        PathogenKind::Insect,
        PathogenKind::Fungus,
        PathogenKind::Bacterium,
        PathogenKind::Virus,
        PathogenKind::Deficiency,
    ];

    /// Local name of the singleton pathogen individual.
    pub fn individual_name(self) -> &'static str {
        match self {
            PathogenKind::Insect => "Insect",
            PathogenKind::Fungus => "Fungus",
            PathogenKind::Bacterium => "Bacterium",
            PathogenKind::Virus => "Virus",
            PathogenKind::Deficiency => "Deficiency",
        }
    }

    /// Descriptive comment for the singleton individual.
    pub fn comment(self) -> &'static str {
        match self {
            PathogenKind::Insect => "Insect pest",
            PathogenKind::Fungus => "Fungal pathogen",
            PathogenKind::Bacterium => "Bacterial pathogen",
            PathogenKind::Virus => "Microscopic pathogen replicating inside cells",
            PathogenKind::Deficiency => "Shortage of an essential nutrient",
        }
    }
}

impl std::fmt::Display for PathogenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathogenKind::Insect => write!(f, "insect"),
            PathogenKind::Fungus => write!(f, "fungus"),
            PathogenKind::Bacterium => write!(f, "bacterium"),
            PathogenKind::Virus => write!(f, "virus"),
            PathogenKind::Deficiency => write!(f, "deficiency"),
        }
    }
}

/// One pest/disease/deficiency record.
///
/// List attributes hold unique string tokens; order is not semantically
/// meaningful but is preserved for deterministic output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    /// Unique, stable integer id.
    pub id: u32,
    /// Display name; also the source of the record's node identifier.
    pub name: String,
    /// Scientific name, kept as a literal (never an identifier).
    pub scientific_name: String,
    pub category: Category,
    pub pathogen_kind: PathogenKind,
    /// Single free-text cause, kept as a literal.
    pub primary_cause: String,
    #[serde(default)]
    pub plant_parts: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub vectors: Vec<String>,
    #[serde(default)]
    pub environmental_factors: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
    #[serde(default)]
    pub biological_control: Vec<String>,
    #[serde(default)]
    pub chemical_control: Vec<String>,
    #[serde(default)]
    pub mechanical_control: Vec<String>,
}

impl EntityRecord {
    /// Check the joint category/pathogen invariant:
    /// Pest => insect, Deficiency => deficiency, Disease => fungus|bacterium|virus.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let consistent = matches!(
            (self.category, self.pathogen_kind),
            (Category::Pest, PathogenKind::Insect)
                | (Category::Deficiency, PathogenKind::Deficiency)
                | (
                    Category::Disease,
                    PathogenKind::Fungus | PathogenKind::Bacterium | PathogenKind::Virus
                )
        );
        if consistent {
            Ok(())
        } else {
            Err(ValidationError::InconsistentRecord {
                record_id: self.id,
                category: self.category.to_string(),
                pathogen: self.pathogen_kind.to_string(),
            })
        }
    }

    /// The three control-method lists with their subclass, declaration order.
    pub fn control_lists(&self) -> [(&[String], Class); 3] {
        [
            (&self.biological_control, Class::BiologicalControl),
            (&self.chemical_control, Class::ChemicalControl),
            (&self.mechanical_control, Class::MechanicalControl),
        ]
    }
}

/// Raw record shape before required-field checking.
///
/// Deserializing through this intermediate lets a missing field be reported
/// as a [`ValidationError::MissingField`] naming the record, instead of a
/// bare serde message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    id: u32,
    name: Option<String>,
    scientific_name: Option<String>,
    category: Option<Category>,
    pathogen_kind: Option<PathogenKind>,
    primary_cause: Option<String>,
    #[serde(default)]
    plant_parts: Vec<String>,
    #[serde(default)]
    symptoms: Vec<String>,
    #[serde(default)]
    vectors: Vec<String>,
    #[serde(default)]
    environmental_factors: Vec<String>,
    #[serde(default)]
    prevention: Vec<String>,
    #[serde(default)]
    biological_control: Vec<String>,
    #[serde(default)]
    chemical_control: Vec<String>,
    #[serde(default)]
    mechanical_control: Vec<String>,
}

impl RawRecord {
    fn into_record(self) -> Result<EntityRecord, ValidationError> {
        fn require<T>(
            record_id: u32,
            field: &'static str,
            value: Option<T>,
        ) -> Result<T, ValidationError> {
            value.ok_or(ValidationError::MissingField { record_id, field })
        }

        let id = self.id;
        Ok(EntityRecord {
            id,
            name: require(id, "name", self.name)?,
            scientific_name: require(id, "scientificName", self.scientific_name)?,
            category: require(id, "category", self.category)?,
            pathogen_kind: require(id, "pathogenKind", self.pathogen_kind)?,
            primary_cause: require(id, "primaryCause", self.primary_cause)?,
            plant_parts: self.plant_parts,
            symptoms: self.symptoms,
            vectors: self.vectors,
            environmental_factors: self.environmental_factors,
            prevention: self.prevention,
            biological_control: self.biological_control,
            chemical_control: self.chemical_control,
            mechanical_control: self.mechanical_control,
        })
    }
}

/// Parse an ordered record sequence from a JSON document.
///
/// Every record is validated against the joint category/pathogen invariant.
pub fn parse_records(json: &str) -> Result<Vec<EntityRecord>, ValidationError> {
    let raw: Vec<RawRecord> =
        serde_json::from_str(json).map_err(|e| ValidationError::Parse {
            message: e.to_string(),
        })?;
    let mut records = Vec::with_capacity(raw.len());
    for raw_record in raw {
        let record = raw_record.into_record()?;
        record.validate()?;
        records.push(record);
    }
    Ok(records)
}

/// Load records from a JSON file on disk.
pub fn load_records(path: &Path) -> Result<Vec<EntityRecord>, ValidationError> {
    let json = std::fs::read_to_string(path).map_err(|source| ValidationError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_records(&json)
}

/// The canonical 30-record maize dataset bundled into the binary.
pub fn bundled_records() -> Result<Vec<EntityRecord>, ValidationError> {
    parse_records(BUNDLED_DATASET)
}
