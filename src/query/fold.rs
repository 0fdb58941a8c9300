//! Folds ordered tuple streams into [`Movie`] entities.
//!
//! The fold is a single group-by-adjacent-key pass. It relies on the tuple
//! source emitting every row of one movie contiguously; titles that reappear
//! after another title produce a second movie.
//!
//! The empty title doubles as the "no movie yet" sentinel, so a group whose
//! title is the empty string is never emitted.

use crate::model::Movie;
use crate::query::decode::{decode_person, is_placeholder, ContractViolation};
use crate::query::tuple::Tuple;

/// Push-based accumulator behind [`fold_movies`].
#[derive(Debug, Default)]
pub struct MovieFolder {
    current: Movie,
    movies: Vec<Movie>,
}

impl MovieFolder {
    /// Creates an empty folder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next row of the stream.
    pub fn push(&mut self, tuple: Tuple) -> Result<(), ContractViolation> {
        if tuple.title != self.current.title {
            let finished = std::mem::replace(&mut self.current, Movie::new(tuple.title.clone()));
            self.emit(finished);
        }
        if is_placeholder(&tuple) {
            return Ok(());
        }
        let Tuple {
            title,
            name,
            job,
            role,
        } = tuple;
        let person = decode_person(&title, name, job, role)?;
        self.current.cast.push(person);
        Ok(())
    }

    /// Number of movies completed so far, excluding the open group.
    pub fn completed(&self) -> usize {
        self.movies.len()
    }

    /// Closes the open group and returns every movie in stream order.
    pub fn finish(mut self) -> Vec<Movie> {
        let last = std::mem::take(&mut self.current);
        self.emit(last);
        self.movies
    }

    fn emit(&mut self, movie: Movie) {
        if !movie.title.is_empty() {
            self.movies.push(movie);
        }
    }
}

/// Folds `tuples` into one movie per contiguous title group.
///
/// Placeholder rows register their movie without adding cast. Any other row
/// must decode into a person; the first row that does not aborts the fold.
pub fn fold_movies<I>(tuples: I) -> Result<Vec<Movie>, ContractViolation>
where
    I: IntoIterator<Item = Tuple>,
{
    let mut folder = MovieFolder::new();
    for tuple in tuples {
        folder.push(tuple)?;
    }
    Ok(folder.finish())
}
