//! Interfaces the controllers use to reach persistent state.
//!
//! `Database` implements all of them (see `queries`); tests can swap in
//! their own implementations.

use anyhow::Result;
use thiserror::Error;

use socialwiki_types::models::{NewUser, NewWikiPage, User, WikiPage};

#[derive(Debug, Error)]
pub enum SaveError {
    /// The store refused the record, e.g. a unique, foreign key or check
    /// constraint failed.
    #[error("rejected by store: {0}")]
    Rejected(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl SaveError {
    pub(crate) fn from_sqlite(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => Self::Rejected(err.to_string()),
            _ => Self::Store(err.into()),
        }
    }
}

pub trait UserLookup {
    /// All users with exactly this name. Callers decide what zero or
    /// several matches mean.
    fn find_by_user_name(&self, user_name: &str) -> Result<Vec<User>>;
}

pub trait UserStore: UserLookup {
    fn create_user(&self, user: &NewUser) -> Result<User, SaveError>;
}

pub trait WikiPageStore {
    fn save(&self, page: &NewWikiPage) -> Result<WikiPage, SaveError>;

    fn find_by_id(&self, id: i64) -> Result<Option<WikiPage>>;

    /// Conjunctive search. `None` or empty filters match everything; title
    /// and content match as substrings.
    fn find_by_title_and_author_id_and_content(
        &self,
        title: Option<&str>,
        author_id: Option<i64>,
        content: Option<&str>,
    ) -> Result<Vec<WikiPage>>;
}
