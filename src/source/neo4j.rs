use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Row};

use super::{cypher, BackendKind, Params, SourceError, Traversal, TupleSource};
use crate::config::Neo4jConfig;
use crate::query::{RoleColumn, Tuple};

/// Tuple source that runs the Cypher templates against a Neo4j database.
///
/// The driver pools its own connections and clones share that pool, so one
/// instance is built at start-up and shared across requests.
#[derive(Clone)]
pub struct Neo4jSource {
    graph: Graph,
}

impl Neo4jSource {
    /// Connects to the database described by `config`.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, SourceError> {
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str());
        if let Some(database) = config.database.as_deref() {
            builder = builder.db(database);
        }
        let graph = Graph::connect(builder.build()?).await?;
        tracing::info!(uri = %config.uri, database = ?config.database, "connected to neo4j");
        Ok(Self { graph })
    }
}

#[async_trait]
impl TupleSource for Neo4jSource {
    async fn execute(
        &self,
        traversal: Traversal,
        params: &Params,
    ) -> Result<Vec<Tuple>, SourceError> {
        let mut statement = query(cypher::statement(traversal));
        if let (Some(name), Some(value)) = (traversal.required_param(), traversal.param(params)?) {
            statement = statement.param(name, value);
        }
        let mut stream = self.graph.execute(statement).await?;
        let mut tuples = Vec::new();
        while let Some(row) = stream.next().await? {
            tuples.push(decode_row(&row)?);
        }
        Ok(tuples)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Neo4j
    }
}

fn decode_row(row: &Row) -> Result<Tuple, SourceError> {
    let title: Option<String> = column(row, "title")?;
    let title = title.ok_or_else(|| SourceError::MalformedRow {
        column: "title",
        reason: "is null".into(),
    })?;
    let role = match row.get::<Option<Vec<String>>>("role") {
        Ok(value) => RoleColumn::from(value),
        Err(_) => RoleColumn::Unexpected,
    };
    Ok(Tuple {
        title,
        name: column(row, "name")?,
        job: column(row, "job")?,
        role,
    })
}

fn column(row: &Row, name: &'static str) -> Result<Option<String>, SourceError> {
    row.get::<Option<String>>(name)
        .map_err(|err| SourceError::MalformedRow {
            column: name,
            reason: err.to_string(),
        })
}
