//! Engine facade: the top-level pipeline of the crate.
//!
//! `KgEngine` owns the schema registry and the loaded records and runs the
//! pipeline end to end: generate, close, check, serialize. The CLI is a thin
//! wrapper over this type; library callers get the same surface.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::check::{self, Violation};
use crate::error::{EngineError, KgResult};
use crate::export;
use crate::generate;
use crate::graph::Graph;
use crate::infer::closure;
use crate::infer::InferenceReport;
use crate::record::{self, Category, EntityRecord};
use crate::schema::SchemaRegistry;

/// Configuration for a knowledge-graph build.
#[derive(Debug, Clone, Default)]
pub struct KgConfig {
    /// Records file to load. `None` uses the bundled dataset.
    pub dataset: Option<PathBuf>,
    /// Whether to run the inference closure after generation.
    pub run_closure: bool,
}

/// Everything a build run produces.
#[derive(Debug)]
pub struct BuildOutput {
    /// The (possibly closed) graph.
    pub graph: Graph,
    /// Inference report, present when the closure ran.
    pub report: Option<InferenceReport>,
    /// Consistency findings over the final graph.
    pub violations: Vec<Violation>,
}

/// Summary counts for `info` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    pub records: usize,
    pub pests: usize,
    pub diseases: usize,
    pub deficiencies: usize,
    pub classes: usize,
    pub object_properties: usize,
    pub datatype_properties: usize,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "dataset")?;
        writeln!(f, "  records:      {}", self.records)?;
        writeln!(f, "  pests:        {}", self.pests)?;
        writeln!(f, "  diseases:     {}", self.diseases)?;
        writeln!(f, "  deficiencies: {}", self.deficiencies)?;
        writeln!(f, "schema")?;
        writeln!(f, "  classes:             {}", self.classes)?;
        writeln!(f, "  object properties:   {}", self.object_properties)?;
        writeln!(f, "  datatype properties: {}", self.datatype_properties)?;
        Ok(())
    }
}

/// The knowledge-graph engine.
pub struct KgEngine {
    config: KgConfig,
    registry: SchemaRegistry,
    records: Vec<EntityRecord>,
}

impl KgEngine {
    /// Load records per the configuration and validate the schema.
    pub fn new(config: KgConfig) -> KgResult<Self> {
        let registry = SchemaRegistry::new();
        registry.validate()?;

        let records = match &config.dataset {
            Some(path) => record::load_records(path)?,
            None => record::bundled_records()?,
        };
        info!(records = records.len(), "engine initialized");

        Ok(Self {
            config,
            registry,
            records,
        })
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    /// Run the pipeline: generate, optionally close, then check.
    pub fn build(&self) -> KgResult<BuildOutput> {
        let graph = generate::generate(&self.records, &self.registry)?;

        let (graph, report) = if self.config.run_closure {
            let (closed, report) = closure::close(graph, &self.registry);
            (closed, Some(report))
        } else {
            (graph, None)
        };

        let violations = check::check(&graph);
        info!(
            triples = graph.len(),
            violations = violations.len(),
            "build complete"
        );

        Ok(BuildOutput {
            graph,
            report,
            violations,
        })
    }

    /// Serialize a build's graph and write it to `path`.
    pub fn write_turtle(&self, output: &BuildOutput, path: &Path) -> KgResult<()> {
        let document = export::to_turtle(&output.graph, &self.registry);
        std::fs::write(path, document).map_err(|source| EngineError::Output {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "wrote Turtle document");
        Ok(())
    }

    /// Dataset and schema summary counts.
    pub fn info(&self) -> EngineInfo {
        let count = |category: Category| {
            self.records
                .iter()
                .filter(|r| r.category == category)
                .count()
        };
        EngineInfo {
            records: self.records.len(),
            pests: count(Category::Pest),
            diseases: count(Category::Disease),
            deficiencies: count(Category::Deficiency),
            classes: self.registry.classes().len(),
            object_properties: self.registry.object_props().len(),
            datatype_properties: self.registry.data_props().len(),
        }
    }
}
