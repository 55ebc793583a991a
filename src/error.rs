//! Rich diagnostic error types for the zea-kg engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the zea-kg engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum KgError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Errors raised while validating input records or deriving identifiers.
///
/// Always fatal to the run: a malformed record is never silently skipped.
#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("cannot derive an identifier from an empty string")]
    #[diagnostic(
        code(zea::validate::empty_identifier),
        help(
            "Every entity name and vocabulary token must be a non-empty string. \
             Check the source dataset for blank entries."
        )
    )]
    EmptyIdentifier,

    #[error("identifier collision: \"{existing}\" and \"{incoming}\" both normalize to \"{ident}\"")]
    #[diagnostic(
        code(zea::validate::identifier_collision),
        help(
            "Two distinct source strings map to the same graph node identifier. \
             Rename one of them in the dataset so the mapping stays injective."
        )
    )]
    IdentifierCollision {
        ident: String,
        existing: String,
        incoming: String,
    },

    #[error("record {record_id}: missing required field \"{field}\"")]
    #[diagnostic(
        code(zea::validate::missing_field),
        help(
            "Required fields are: id, name, scientificName, category, pathogenKind, \
             primaryCause. The eight list attributes may be omitted and default to empty."
        )
    )]
    MissingField { record_id: u32, field: &'static str },

    #[error(
        "record {record_id}: category {category} is inconsistent with pathogen kind {pathogen}"
    )]
    #[diagnostic(
        code(zea::validate::inconsistent_record),
        help(
            "Valid pairs are: Pest => insect, Deficiency => deficiency, \
             Disease => fungus | bacterium | virus."
        )
    )]
    InconsistentRecord {
        record_id: u32,
        category: String,
        pathogen: String,
    },

    #[error("failed to read dataset: {path}")]
    #[diagnostic(
        code(zea::validate::io),
        help("Ensure the dataset file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset: {message}")]
    #[diagnostic(
        code(zea::validate::parse),
        help(
            "The dataset must be a JSON array of record objects. \
             See data/maize_records.json for the expected shape."
        )
    )]
    Parse { message: String },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

/// Errors from the SPARQL query surface over an emitted document.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("failed to load Turtle document: {message}")]
    #[diagnostic(
        code(zea::graph::turtle),
        help(
            "The document could not be parsed as Turtle. If it was produced by \
             `zea-kg build` this is a bug — please file a report."
        )
    )]
    Turtle { message: String },

    #[error("SPARQL query error: {message}")]
    #[diagnostic(
        code(zea::graph::sparql),
        help("The SPARQL query failed. Check the query syntax and prefixes.")
    )]
    Sparql { message: String },
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("invalid schema registry: {message}")]
    #[diagnostic(
        code(zea::engine::invalid_schema),
        help(
            "The built-in schema failed its sanity checks. This indicates a bug \
             in the class table, not a problem with your data."
        )
    )]
    InvalidSchema { message: String },

    #[error("failed to write output: {path}")]
    #[diagnostic(
        code(zea::engine::output),
        help("Check that the output directory exists and is writable.")
    )]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for functions returning zea-kg results.
pub type KgResult<T> = std::result::Result<T, KgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_converts_to_kg_error() {
        let err = ValidationError::EmptyIdentifier;
        let kg: KgError = err.into();
        assert!(matches!(
            kg,
            KgError::Validation(ValidationError::EmptyIdentifier)
        ));
    }

    #[test]
    fn graph_error_converts_to_kg_error() {
        let err = GraphError::Sparql {
            message: "bad query".into(),
        };
        let kg: KgError = err.into();
        assert!(matches!(kg, KgError::Graph(GraphError::Sparql { .. })));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = ValidationError::IdentifierCollision {
            ident: "daun_a".into(),
            existing: "daun a".into(),
            incoming: "daun.a".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("daun_a"));
        assert!(msg.contains("daun a"));
        assert!(msg.contains("daun.a"));
    }

    #[test]
    fn inconsistent_record_names_the_record() {
        let err = ValidationError::InconsistentRecord {
            record_id: 7,
            category: "Pest".into(),
            pathogen: "fungus".into(),
        };
        assert!(format!("{err}").contains("record 7"));
    }
}
