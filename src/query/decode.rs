//! Per-row decoding of cast members.

use thiserror::Error;

use crate::model::Person;
use crate::query::tuple::{RoleColumn, Tuple};

/// Column of a row that broke the tuple contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContractColumn {
    /// Row had no name but was not a placeholder.
    Name,
    /// Row named a cast member but carried no job.
    Job,
}

impl ContractColumn {
    fn as_str(self) -> &'static str {
        match self {
            ContractColumn::Name => "name",
            ContractColumn::Job => "job",
        }
    }
}

/// A row whose shape the decoder cannot turn into a [`Person`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("row for movie '{title}' is missing required column '{}'", .column.as_str())]
pub struct ContractViolation {
    /// Title of the group the row belongs to.
    pub title: String,
    /// Column that was null.
    pub column: ContractColumn,
}

/// Returns `true` for the null-cast row an optional match yields for a movie
/// without cast: no name and no role list.
pub fn is_placeholder(tuple: &Tuple) -> bool {
    tuple.name.is_none() && !tuple.role.is_list()
}

/// Decodes the cast columns of a row into a [`Person`].
///
/// A role list is kept as given (even when empty); any other role value leaves
/// `role` unset. `name` and `job` must both be present.
pub fn decode_person(
    title: &str,
    name: Option<String>,
    job: Option<String>,
    role: RoleColumn,
) -> Result<Person, ContractViolation> {
    let violation = |column| ContractViolation {
        title: title.to_owned(),
        column,
    };
    let name = name.ok_or_else(|| violation(ContractColumn::Name))?;
    let job = job.ok_or_else(|| violation(ContractColumn::Job))?;
    let role = match role {
        RoleColumn::Roles(roles) => Some(roles),
        RoleColumn::Absent | RoleColumn::Unexpected => None,
    };
    Ok(Person { name, job, role })
}
