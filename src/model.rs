//! Entities returned by the query operations.
//!
//! A [`Movie`] is materialized per response and owns its cast. A [`Person`] is a
//! per-movie cast entry: the same human appearing in two movies yields two
//! independent values.

use serde::{Deserialize, Serialize};

/// A movie with its embedded cast.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    /// Grouping key of the movie within one result set.
    pub title: String,
    /// Cast entries in first-seen order.
    #[serde(default)]
    pub cast: Vec<Person>,
    /// Release year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<i64>,
    /// Marketing tagline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// Vote count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
}

impl Movie {
    /// Creates a movie with the given title and no cast.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A cast member of one movie.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    /// Person's display name.
    pub name: String,
    /// Lowercase job token derived from the relation type (`acted`, `directed`, ...).
    pub job: String,
    /// Named roles; `None` when the relation carries no role data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Vec<String>>,
}

impl Person {
    /// Creates a cast entry without role data.
    pub fn new(name: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
            role: None,
        }
    }

    /// Attaches a role list to this cast entry.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role = Some(roles.into_iter().map(Into::into).collect());
        self
    }
}
