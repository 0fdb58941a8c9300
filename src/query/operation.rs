use serde::{Deserialize, Serialize};

use crate::model::Movie;

/// One query operation with its argument.
///
/// Serialized with an `operation` tag carrying the API field name:
///
/// ```json
/// { "operation": "moviesByActor", "name": "Keanu Reeves" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation")]
pub enum Operation {
    /// Every movie.
    #[serde(rename = "getAllMovies")]
    AllMovies,
    /// Single movie by exact title.
    #[serde(rename = "movieByTitle")]
    MovieByTitle {
        /// Title to match.
        title: String,
    },
    /// Movies within three relationships of a movie.
    #[serde(rename = "moviesWithinThreeRelations")]
    WithinHops {
        /// Seed movie title.
        title: String,
    },
    /// Movies directed by a person.
    #[serde(rename = "moviesByDirector")]
    ByDirector {
        /// Director's name.
        name: String,
    },
    /// Movies a person acted in.
    #[serde(rename = "moviesByActor")]
    ByActor {
        /// Actor's name.
        name: String,
    },
}

impl Operation {
    /// API field name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AllMovies => "getAllMovies",
            Operation::MovieByTitle { .. } => "movieByTitle",
            Operation::WithinHops { .. } => "moviesWithinThreeRelations",
            Operation::ByDirector { .. } => "moviesByDirector",
            Operation::ByActor { .. } => "moviesByActor",
        }
    }
}

/// Result of [`MovieService::run`](crate::query::MovieService::run).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOutput {
    /// A single movie.
    Movie(Movie),
    /// A non-empty list of movies.
    Movies(Vec<Movie>),
}

impl QueryOutput {
    /// Movies in result order.
    pub fn movies(&self) -> &[Movie] {
        match self {
            QueryOutput::Movie(movie) => std::slice::from_ref(movie),
            QueryOutput::Movies(movies) => movies,
        }
    }
}
