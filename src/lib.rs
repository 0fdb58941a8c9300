//! Movie and cast queries over a property graph.
//!
//! A [`source::TupleSource`] runs one of five traversals and returns flat
//! `(title, name, job, role)` rows; [`query::MovieService`] folds them into
//! [`model::Movie`] values. Sources exist for Neo4j and for an in-process
//! graph loaded from CSV or the built-in demo data.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod query;
pub mod server;
pub mod source;

pub use error::{QueryError, Result};
pub use model::{Movie, Person};
pub use query::{MovieService, Operation, QueryOutput};
