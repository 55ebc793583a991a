//! # zea-kg
//!
//! Knowledge graph of maize pests, diseases, and nutrient deficiencies,
//! with a small forward-chaining reasoner and a Turtle/SPARQL surface.
//!
//! ## Architecture
//!
//! - **Identifiers** (`ident`): deterministic name-to-resource normalization
//! - **Schema** (`schema`): the fixed class and property tables, validated as a DAG
//! - **Records** (`record`): the curated dataset and its consistency rules
//! - **Generation** (`generate`): records to asserted triples, with a vocabulary pre-pass
//! - **Inference** (`infer`): subclass/domain/range closure to a fixed point
//! - **Checks** (`check`): mutual-exclusion and labeling sanity queries
//! - **Export** (`export`): deterministic Turtle serialization
//! - **SPARQL** (`graph::sparql`): oxigraph-backed queries over emitted documents
//!
//! ## Library usage
//!
//! ```no_run
//! use zea_kg::engine::{KgConfig, KgEngine};
//!
//! let engine = KgEngine::new(KgConfig {
//!     dataset: None,
//!     run_closure: true,
//! }).unwrap();
//! let built = engine.build().unwrap();
//! assert!(built.violations.is_empty());
//! ```

pub mod check;
pub mod engine;
pub mod error;
pub mod export;
pub mod generate;
pub mod graph;
pub mod ident;
pub mod infer;
pub mod record;
pub mod schema;
