//! The five movie operations.
//!
//! Every operation runs one traversal, folds the rows, and turns an empty
//! result into [`QueryError::NotFound`]. A movie that exists but has no cast
//! is still a result.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{QueryError, Result};
use crate::model::Movie;
use crate::query::fold::fold_movies;
use crate::query::operation::{Operation, QueryOutput};
use crate::source::{BackendKind, Params, Traversal, TupleSource};

const MOVIE_NOT_FOUND: &str = "movie not found";
const NO_MOVIES_FOUND: &str = "no movies found";

/// Movie queries over a shared [`TupleSource`].
#[derive(Clone)]
pub struct MovieService {
    source: Arc<dyn TupleSource>,
}

impl std::fmt::Debug for MovieService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieService")
            .field("backend", &self.source.kind())
            .finish()
    }
}

impl MovieService {
    /// Creates a service over `source`.
    pub fn new(source: Arc<dyn TupleSource>) -> Self {
        Self { source }
    }

    /// Backend the service is reading from.
    pub fn kind(&self) -> BackendKind {
        self.source.kind()
    }

    /// Every movie in the graph.
    pub async fn all_movies(&self) -> Result<Vec<Movie>> {
        let movies = self.fold(Traversal::AllMovies, Params::new()).await?;
        non_empty(movies)
    }

    /// The first movie whose title equals `title`.
    pub async fn movie_by_title(&self, title: &str) -> Result<Movie> {
        let movies = self
            .fold(Traversal::MovieByTitle, param("title", title))
            .await?;
        movies
            .into_iter()
            .next()
            .ok_or(QueryError::NotFound(MOVIE_NOT_FOUND))
    }

    /// Movies reachable from `title` in one to three relationship hops.
    pub async fn movies_within_hops(&self, title: &str) -> Result<Vec<Movie>> {
        let movies = self
            .fold(Traversal::WithinHops, param("title", title))
            .await?;
        non_empty(movies)
    }

    /// Movies directed by the person called `name`.
    pub async fn movies_by_director(&self, name: &str) -> Result<Vec<Movie>> {
        let movies = self
            .fold(Traversal::ByDirector, param("name", name))
            .await?;
        non_empty(movies)
    }

    /// Movies the person called `name` acted in.
    pub async fn movies_by_actor(&self, name: &str) -> Result<Vec<Movie>> {
        let movies = self.fold(Traversal::ByActor, param("name", name)).await?;
        non_empty(movies)
    }

    /// Dispatches `operation` to the matching method.
    pub async fn run(&self, operation: &Operation) -> Result<QueryOutput> {
        let output = match operation {
            Operation::AllMovies => QueryOutput::Movies(self.all_movies().await?),
            Operation::MovieByTitle { title } => {
                QueryOutput::Movie(self.movie_by_title(title).await?)
            }
            Operation::WithinHops { title } => {
                QueryOutput::Movies(self.movies_within_hops(title).await?)
            }
            Operation::ByDirector { name } => {
                QueryOutput::Movies(self.movies_by_director(name).await?)
            }
            Operation::ByActor { name } => QueryOutput::Movies(self.movies_by_actor(name).await?),
        };
        Ok(output)
    }

    async fn fold(&self, traversal: Traversal, params: Params) -> Result<Vec<Movie>> {
        let tuples = self.source.execute(traversal, &params).await?;
        let rows = tuples.len();
        let movies = fold_movies(tuples).map_err(|violation| {
            warn!(%traversal, %violation, "rejected row");
            QueryError::from(violation)
        })?;
        debug!(
            %traversal,
            ?params,
            rows,
            movies = movies.len(),
            "folded traversal"
        );
        Ok(movies)
    }
}

fn param(key: &str, value: &str) -> Params {
    let mut params = Params::new();
    params.insert(key.to_owned(), value.to_owned());
    params
}

fn non_empty(movies: Vec<Movie>) -> Result<Vec<Movie>> {
    if movies.is_empty() {
        Err(QueryError::NotFound(NO_MOVIES_FOUND))
    } else {
        Ok(movies)
    }
}
