use super::Traversal;

// Every template ends in the same projection so rows share one shape:
// `title, name, job, role`, with all rows of a title adjacent after UNWIND.

const ALL_MOVIES: &str = "MATCH (movie:Movie)
OPTIONAL MATCH (movie)<-[r]-(person:Person)
WITH movie.title AS title,
     collect({name: person.name,
              job: head(split(toLower(type(r)), '_')),
              role: r.roles}) AS cast
UNWIND cast AS c
RETURN title, c.name AS name, c.job AS job, c.role AS role";

const MOVIE_BY_TITLE: &str = "MATCH (movie:Movie {title: $title})
OPTIONAL MATCH (movie)<-[r]-(person:Person)
WITH movie.title AS title,
     collect({name: person.name,
              job: head(split(toLower(type(r)), '_')),
              role: r.roles}) AS cast
LIMIT 1
UNWIND cast AS c
RETURN title, c.name AS name, c.job AS job, c.role AS role";

const WITHIN_HOPS: &str = "MATCH (initial:Movie {title: $title})-[*1..3]-(movies:Movie)
WITH DISTINCT movies
OPTIONAL MATCH (movies)<-[r]-(person:Person)
WITH movies.title AS title,
     collect({name: person.name,
              job: head(split(toLower(type(r)), '_')),
              role: r.roles}) AS cast
UNWIND cast AS c
RETURN title, c.name AS name, c.job AS job, c.role AS role";

const BY_DIRECTOR: &str = "MATCH (p:Person {name: $name})-[:DIRECTED]->(movies:Movie)
OPTIONAL MATCH (movies)<-[r]-(person:Person)
WITH movies.title AS title,
     collect({name: person.name,
              job: head(split(toLower(type(r)), '_')),
              role: r.roles}) AS cast
UNWIND cast AS c
RETURN title, c.name AS name, c.job AS job, c.role AS role";

const BY_ACTOR: &str = "MATCH (p:Person {name: $name})-[:ACTED_IN]->(movies:Movie)
OPTIONAL MATCH (movies)<-[r]-(person:Person)
WITH movies.title AS title,
     collect({name: person.name,
              job: head(split(toLower(type(r)), '_')),
              role: r.roles}) AS cast
UNWIND cast AS c
RETURN title, c.name AS name, c.job AS job, c.role AS role";

/// Returns the Cypher statement that implements `traversal`.
pub fn statement(traversal: Traversal) -> &'static str {
    match traversal {
        Traversal::AllMovies => ALL_MOVIES,
        Traversal::MovieByTitle => MOVIE_BY_TITLE,
        Traversal::WithinHops => WITHIN_HOPS,
        Traversal::ByDirector => BY_DIRECTOR,
        Traversal::ByActor => BY_ACTOR,
    }
}
