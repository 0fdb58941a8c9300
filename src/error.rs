//! Error taxonomy of the query operations.

use thiserror::Error;
use tracing::{error, warn};

use crate::query::ContractViolation;
use crate::source::SourceError;

/// Result alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Failure of a query operation.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The traversal produced no movie.
    #[error("{0}")]
    NotFound(&'static str),
    /// A row could not be decoded into a cast member.
    #[error("data contract violation: {0}")]
    DataContract(#[from] ContractViolation),
    /// The source produced a row whose columns have the wrong shape.
    #[error("data contract violation: column '{column}' {reason}")]
    MalformedRow {
        /// Offending column.
        column: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// The tuple source could not run the traversal.
    #[error("upstream failure: {0}")]
    Upstream(SourceError),
}

impl QueryError {
    /// Returns `true` for [`QueryError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotFound(_))
    }

    /// Returns `true` when the rows themselves were at fault.
    pub fn is_data_contract(&self) -> bool {
        matches!(
            self,
            QueryError::DataContract(_) | QueryError::MalformedRow { .. }
        )
    }
}

impl From<SourceError> for QueryError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::MalformedRow { column, reason } => {
                warn!(column, %reason, "tuple source returned a malformed row");
                QueryError::MalformedRow { column, reason }
            }
            other => {
                error!(error = %other, "tuple source failed");
                QueryError::Upstream(other)
            }
        }
    }
}
