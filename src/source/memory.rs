use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{BackendKind, Params, SourceError, Traversal, TupleSource};
use crate::graph::{EdgeId, MemoryGraph, Node, NodeId, PropertyValue};
use crate::query::{RoleColumn, Tuple};

const MOVIE: &str = "Movie";
const PERSON: &str = "Person";
const MAX_HOPS: usize = 3;

/// Tuple source evaluating traversals over an in-process [`MemoryGraph`].
///
/// Produces the same row shape as the Cypher templates: rows grouped by
/// title in first-seen order, one row per incoming person relation, and a
/// placeholder row for a movie without cast.
#[derive(Clone, Debug)]
pub struct MemorySource {
    graph: Arc<MemoryGraph>,
}

impl MemorySource {
    /// Wraps a graph.
    pub fn new(graph: MemoryGraph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }

    /// Evaluates a traversal synchronously.
    pub fn evaluate(&self, traversal: Traversal, params: &Params) -> Result<Vec<Tuple>, SourceError> {
        let param = traversal.param(params)?.unwrap_or_default();
        let movies = match traversal {
            Traversal::AllMovies => self.movies().collect(),
            Traversal::MovieByTitle | Traversal::WithinHops => {
                let seeds = self.graph.find_nodes(MOVIE, "title", param);
                if traversal == Traversal::WithinHops {
                    self.reachable_movies(seeds)
                } else {
                    seeds.collect()
                }
            }
            Traversal::ByDirector => self.related_movies(param, "DIRECTED"),
            Traversal::ByActor => self.related_movies(param, "ACTED_IN"),
        };
        let mut groups = self.group_by_title(&movies)?;
        if traversal == Traversal::MovieByTitle {
            groups.truncate(1);
        }
        Ok(groups.into_iter().flat_map(|group| group.rows).collect())
    }

    fn movies(&self) -> impl Iterator<Item = &Node> {
        self.graph.nodes().filter(|node| node.has_label(MOVIE))
    }

    fn related_movies(&self, name: &str, relation: &str) -> Vec<&Node> {
        let mut seen = FxHashSet::default();
        let mut movies = Vec::new();
        for person in self.graph.find_nodes(PERSON, "name", name) {
            for edge in self.graph.outgoing_edges(person.id) {
                if edge.type_name != relation {
                    continue;
                }
                if let Some(movie) = self.graph.node(edge.target) {
                    if movie.has_label(MOVIE) && seen.insert(movie.id) {
                        movies.push(movie);
                    }
                }
            }
        }
        movies
    }

    // Undirected paths of 1..=MAX_HOPS relationships, never reusing a
    // relationship within one path. Reached movies are kept once, in
    // depth-first discovery order.
    fn reachable_movies<'a>(&'a self, seeds: impl Iterator<Item = &'a Node>) -> Vec<&'a Node> {
        let mut seen = FxHashSet::default();
        let mut movies = Vec::new();
        let mut path: Vec<EdgeId> = Vec::with_capacity(MAX_HOPS);
        for seed in seeds {
            self.walk(seed.id, &mut path, &mut seen, &mut movies);
        }
        movies
    }

    fn walk<'a>(
        &'a self,
        at: NodeId,
        path: &mut Vec<EdgeId>,
        seen: &mut FxHashSet<NodeId>,
        movies: &mut Vec<&'a Node>,
    ) {
        if path.len() == MAX_HOPS {
            return;
        }
        for edge in self.graph.incident_edges(at) {
            if path.contains(&edge.id) {
                continue;
            }
            let next = edge.other(at);
            if let Some(node) = self.graph.node(next) {
                if node.has_label(MOVIE) && seen.insert(next) {
                    movies.push(node);
                }
            }
            path.push(edge.id);
            self.walk(next, path, seen, movies);
            path.pop();
        }
    }

    fn group_by_title(&self, movies: &[&Node]) -> Result<Vec<TitleGroup>, SourceError> {
        let mut groups: Vec<TitleGroup> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        for movie in movies {
            let title = movie
                .property("title")
                .and_then(PropertyValue::as_str)
                .ok_or_else(|| SourceError::MalformedRow {
                    column: "title",
                    reason: format!("is not a string on movie node {}", movie.id),
                })?;
            let slot = *index.entry(title.to_owned()).or_insert_with(|| {
                groups.push(TitleGroup {
                    title: title.to_owned(),
                    rows: Vec::new(),
                });
                groups.len() - 1
            });
            self.collect_cast(movie, &mut groups[slot].rows);
        }
        for group in &mut groups {
            if group.rows.is_empty() {
                group.rows.push(Tuple::placeholder(&group.title));
            }
        }
        Ok(groups)
    }

    fn collect_cast(&self, movie: &Node, rows: &mut Vec<Tuple>) {
        let title = movie
            .property("title")
            .and_then(PropertyValue::as_str)
            .unwrap_or_default();
        for edge in self.graph.incoming_edges(movie.id) {
            let Some(person) = self.graph.node(edge.source) else {
                continue;
            };
            if !person.has_label(PERSON) {
                continue;
            }
            let role = match edge.properties.get("roles") {
                None => RoleColumn::Absent,
                Some(PropertyValue::StringList(roles)) => RoleColumn::Roles(roles.clone()),
                Some(_) => RoleColumn::Unexpected,
            };
            rows.push(Tuple {
                title: title.to_owned(),
                name: person
                    .property("name")
                    .and_then(PropertyValue::as_str)
                    .map(str::to_owned),
                job: Some(job_from_relation(&edge.type_name)),
                role,
            });
        }
    }
}

struct TitleGroup {
    title: String,
    rows: Vec<Tuple>,
}

/// Lowercase first token of a relation type: `ACTED_IN` becomes `acted`.
pub fn job_from_relation(type_name: &str) -> String {
    type_name
        .to_lowercase()
        .split('_')
        .next()
        .unwrap_or_default()
        .to_owned()
}

#[async_trait]
impl TupleSource for MemorySource {
    async fn execute(
        &self,
        traversal: Traversal,
        params: &Params,
    ) -> Result<Vec<Tuple>, SourceError> {
        let tuples = self.evaluate(traversal, params)?;
        tracing::trace!(%traversal, rows = tuples.len(), "evaluated in-memory traversal");
        Ok(tuples)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }
}
