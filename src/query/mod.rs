#![forbid(unsafe_code)]

//! Query contract layer.
//!
//! Turns ordered `(title, name, job, role)` rows from a tuple source into
//! [`Movie`](crate::model::Movie) values and applies the not-found rules of
//! each operation.

/// Role decoding and placeholder detection.
///
/// Converts the nullable columns of one row into a cast entry.
pub mod decode;

/// Group-by-adjacent-title aggregation.
pub mod fold;

/// Serializable operation requests and results used by transports.
pub mod operation;

/// The five movie operations over a shared tuple source.
pub mod service;

/// Flat row shape produced by traversals.
pub mod tuple;

pub use decode::{ContractColumn, ContractViolation};
pub use fold::{fold_movies, MovieFolder};
pub use operation::{Operation, QueryOutput};
pub use service::MovieService;
pub use tuple::{RoleColumn, Tuple};
