//! Flat row shape produced by every traversal.

/// Value found in the `role` column of a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleColumn {
    /// The column was null.
    Absent,
    /// A list of role names (possibly empty).
    Roles(Vec<String>),
    /// Some other non-list value; decoded the same way as [`RoleColumn::Absent`].
    Unexpected,
}

impl RoleColumn {
    /// Returns `true` when the column holds a role list.
    pub fn is_list(&self) -> bool {
        matches!(self, RoleColumn::Roles(_))
    }
}

impl From<Option<Vec<String>>> for RoleColumn {
    fn from(value: Option<Vec<String>>) -> Self {
        match value {
            Some(roles) => RoleColumn::Roles(roles),
            None => RoleColumn::Absent,
        }
    }
}

/// One `(title, name, job, role)` row.
///
/// Rows for the same title are contiguous in a traversal's output. A movie
/// without cast still yields one row with null name, job and role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tuple {
    /// Movie title; the grouping key.
    pub title: String,
    /// Cast member name.
    pub name: Option<String>,
    /// Job token derived from the relation type.
    pub job: Option<String>,
    /// Role list carried by the relation.
    pub role: RoleColumn,
}

impl Tuple {
    /// Row for a cast member with a role list.
    pub fn cast<I, S>(title: &str, name: &str, job: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.to_owned(),
            name: Some(name.to_owned()),
            job: Some(job.to_owned()),
            role: RoleColumn::Roles(roles.into_iter().map(Into::into).collect()),
        }
    }

    /// Row for a cast member whose relation has no roles.
    pub fn crew(title: &str, name: &str, job: &str) -> Self {
        Self {
            title: title.to_owned(),
            name: Some(name.to_owned()),
            job: Some(job.to_owned()),
            role: RoleColumn::Absent,
        }
    }

    /// Row emitted for a movie without any matched cast.
    pub fn placeholder(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            name: None,
            job: None,
            role: RoleColumn::Absent,
        }
    }
}
