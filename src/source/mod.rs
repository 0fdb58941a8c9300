#![forbid(unsafe_code)]

//! Tuple sources: backends that run a traversal and return ordered rows.
//!
//! Every backend honors the same contract: rows belonging to one movie are
//! contiguous, and a movie without cast yields a single placeholder row.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AppConfig, ConfigError};
use crate::graph::{demo, import_csv, EdgeImportConfig, ImportError, NodeImportConfig};
use crate::query::Tuple;

/// Cypher templates for each traversal.
pub mod cypher;

/// In-memory property graph backend.
pub mod memory;

/// Neo4j backend over the bolt protocol.
pub mod neo4j;

pub use memory::MemorySource;
pub use neo4j::Neo4jSource;

/// Named string parameters passed to a traversal.
pub type Params = BTreeMap<String, String>;

/// The traversal shapes the query layer can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Every movie with its optional cast.
    AllMovies,
    /// Exact title match, capped to the first matching movie.
    MovieByTitle,
    /// Movies within one to three relationship hops of a seed movie.
    WithinHops,
    /// Movies reached through an outgoing `DIRECTED` relation from a person.
    ByDirector,
    /// Movies reached through an outgoing `ACTED_IN` relation from a person.
    ByActor,
}

impl Traversal {
    /// Parameter this traversal reads, if any.
    pub fn required_param(self) -> Option<&'static str> {
        match self {
            Traversal::AllMovies => None,
            Traversal::MovieByTitle | Traversal::WithinHops => Some("title"),
            Traversal::ByDirector | Traversal::ByActor => Some("name"),
        }
    }

    /// Looks up the required parameter in `params`.
    pub fn param<'a>(self, params: &'a Params) -> Result<Option<&'a str>, SourceError> {
        match self.required_param() {
            None => Ok(None),
            Some(name) => params
                .get(name)
                .map(|value| Some(value.as_str()))
                .ok_or(SourceError::MissingParameter {
                    traversal: self,
                    name,
                }),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Traversal::AllMovies => "all-movies",
            Traversal::MovieByTitle => "movie-by-title",
            Traversal::WithinHops => "within-hops",
            Traversal::ByDirector => "by-director",
            Traversal::ByActor => "by-actor",
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend selector used by configuration and the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Remote Neo4j database.
    #[default]
    Neo4j,
    /// In-process property graph.
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Neo4j => f.write_str("neo4j"),
            BackendKind::Memory => f.write_str("memory"),
        }
    }
}

/// Errors raised by a tuple source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The bolt driver failed to connect or run the traversal.
    #[error("neo4j driver error: {0}")]
    Driver(#[from] neo4rs::Error),
    /// The caller omitted the traversal's parameter.
    #[error("traversal {traversal} requires parameter '{name}'")]
    MissingParameter {
        /// Traversal that was requested.
        traversal: Traversal,
        /// Name of the missing parameter.
        name: &'static str,
    },
    /// A row could not be turned into a [`Tuple`].
    #[error("malformed row: column '{column}' {reason}")]
    MalformedRow {
        /// Offending column.
        column: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Executes traversals and yields rows ordered so that each movie's rows are
/// contiguous.
#[async_trait]
pub trait TupleSource: Send + Sync {
    /// Runs `traversal` scoped to `params`.
    async fn execute(&self, traversal: Traversal, params: &Params)
        -> Result<Vec<Tuple>, SourceError>;

    /// Which backend this is.
    fn kind(&self) -> BackendKind;
}

/// Errors raised while opening the configured tuple source.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The backend settings are inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Loading the CSV graph failed.
    #[error("failed to import graph: {0}")]
    Import(#[from] ImportError),
    /// Connecting to the database failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Builds the tuple source selected by `config`.
///
/// The memory backend loads the configured CSV files, or the demo graph
/// when none are given.
pub async fn open(config: &AppConfig) -> Result<Arc<dyn TupleSource>, OpenError> {
    match config.backend {
        BackendKind::Neo4j => {
            let source = Neo4jSource::connect(&config.neo4j.resolve()).await?;
            Ok(Arc::new(source))
        }
        BackendKind::Memory => {
            let memory = &config.memory;
            let graph = match (&memory.nodes, &memory.edges) {
                (None, None) => demo::movie_graph(),
                (None, Some(_)) => return Err(ConfigError::EdgesWithoutNodes.into()),
                (Some(nodes), edges) => {
                    let edges = edges.as_ref().map(EdgeImportConfig::new);
                    let (graph, summary) =
                        import_csv(&NodeImportConfig::new(nodes), edges.as_ref())?;
                    tracing::info!(
                        nodes = summary.nodes_imported,
                        edges = summary.edges_imported,
                        "loaded in-memory graph"
                    );
                    graph
                }
            };
            Ok(Arc::new(MemorySource::new(graph)))
        }
    }
}
