//! SPARQL query surface over an emitted Turtle document, backed by oxigraph.
//!
//! The in-memory [`Graph`](super::Graph) is the build-time representation;
//! this store exists for querying a finished document. Loading re-parses the
//! Turtle text, which doubles as a syntax check on the serializer's output.

use oxigraph::io::RdfFormat;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::GraphError;

/// In-memory SPARQL-capable RDF store.
pub struct SparqlStore {
    store: Store,
}

impl SparqlStore {
    /// Parse a Turtle document into a fresh store.
    pub fn from_turtle(document: &str) -> Result<Self, GraphError> {
        let store = Store::new().map_err(|e| GraphError::Sparql {
            message: format!("failed to create store: {e}"),
        })?;
        store
            .load_from_reader(RdfFormat::Turtle, document.as_bytes())
            .map_err(|e| GraphError::Turtle {
                message: e.to_string(),
            })?;
        Ok(Self { store })
    }

    /// Execute a SELECT query; each row is a list of (variable, value) pairs.
    pub fn query_select(&self, sparql: &str) -> Result<Vec<Vec<(String, String)>>, GraphError> {
        let results = self.store.query(sparql).map_err(|e| GraphError::Sparql {
            message: format!("query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| GraphError::Sparql {
                        message: format!("solution error: {e}"),
                    })?;
                    let mut row = Vec::new();
                    for (var, term) in solution.iter() {
                        row.push((var.as_str().to_owned(), term.to_string()));
                    }
                    rows.push(row);
                }
                Ok(rows)
            }
            QueryResults::Boolean(b) => Ok(vec![vec![("result".to_owned(), b.to_string())]]),
            QueryResults::Graph(_) => Err(GraphError::Sparql {
                message: "CONSTRUCT/DESCRIBE queries are not supported here".into(),
            }),
        }
    }

    /// Execute an ASK query.
    pub fn query_ask(&self, sparql: &str) -> Result<bool, GraphError> {
        let results = self.store.query(sparql).map_err(|e| GraphError::Sparql {
            message: format!("query failed: {e}"),
        })?;
        match results {
            QueryResults::Boolean(b) => Ok(b),
            _ => Err(GraphError::Sparql {
                message: "expected a boolean result from ASK".into(),
            }),
        }
    }

    /// Number of triples in the store.
    pub fn len(&self) -> Result<usize, GraphError> {
        Ok(self.store.len().map_err(|e| GraphError::Sparql {
            message: format!("failed to count triples: {e}"),
        })?)
    }

    /// Whether the store holds no triples.
    pub fn is_empty(&self) -> Result<bool, GraphError> {
        self.len().map(|n| n == 0)
    }
}

impl std::fmt::Debug for SparqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix : <http://example.org/maize-kg#> .

:Fall_Armyworm a :Pest ;
    rdfs:label \"Fall Armyworm\" ;
    :hasSymptom :daun_berlubang .
";

    #[test]
    fn turtle_document_loads() {
        let store = SparqlStore::from_turtle(DOC).unwrap();
        assert_eq!(store.len().unwrap(), 3);
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn malformed_turtle_is_rejected() {
        let result = SparqlStore::from_turtle(":broken a a a .");
        assert!(matches!(result, Err(GraphError::Turtle { .. })));
    }

    #[test]
    fn select_returns_bindings() {
        let store = SparqlStore::from_turtle(DOC).unwrap();
        let rows = store
            .query_select(
                "PREFIX : <http://example.org/maize-kg#> \
                 SELECT ?s WHERE { ?s a :Pest }",
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        let (var, value) = &rows[0][0];
        assert_eq!(var, "s");
        assert!(value.contains("Fall_Armyworm"));
    }

    #[test]
    fn ask_distinguishes_present_from_absent() {
        let store = SparqlStore::from_turtle(DOC).unwrap();
        let present = store
            .query_ask(
                "PREFIX : <http://example.org/maize-kg#> \
                 ASK { :Fall_Armyworm a :Pest }",
            )
            .unwrap();
        assert!(present);
        let absent = store
            .query_ask(
                "PREFIX : <http://example.org/maize-kg#> \
                 ASK { :Fall_Armyworm a :Disease }",
            )
            .unwrap();
        assert!(!absent);
    }

    #[test]
    fn select_on_ask_query_reports_boolean_row() {
        let store = SparqlStore::from_turtle(DOC).unwrap();
        let rows = store
            .query_select(
                "PREFIX : <http://example.org/maize-kg#> \
                 ASK { :Fall_Armyworm a :Pest }",
            )
            .unwrap();
        assert_eq!(rows, vec![vec![("result".to_owned(), "true".to_owned())]]);
    }
}
