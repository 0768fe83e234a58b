//! Database row types. These map directly to SQLite rows and stay
//! separate from the socialwiki-types models so the schema can drift.
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use socialwiki_types::models::{NewUser, NewWikiPage, ParentRef, User, WikiPage};

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::stored(
            row.id,
            NewUser {
                user_name: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                password_hash: row.password,
            },
        )
    }
}

pub struct WikiPageRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub parent_id: Option<i64>,
    pub author_id: i64,
    pub original_author_id: Option<i64>,
    pub author_username: String,
    pub created_at: String,
}

impl From<WikiPageRow> for WikiPage {
    fn from(row: WikiPageRow) -> Self {
        let created_at = parse_timestamp(&row.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on page {}", row.created_at, row.id);
            DateTime::default()
        });

        WikiPage::stored(
            row.id,
            NewWikiPage {
                title: row.title,
                content: row.content,
                parent: ParentRef::from_parent_id(row.parent_id),
                author_id: row.author_id,
                original_author_id: row.original_author_id,
            },
            row.author_username,
            created_at,
        )
    }
}

/// SQLite stores `datetime('now')` as "YYYY-MM-DD HH:MM:SS" without a zone.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_sqlite_and_rfc3339_timestamps() {
        let ts = parse_timestamp("2017-03-21 14:05:09").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2017, 3, 21));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 5, 9));

        assert!(parse_timestamp("2017-03-21T14:05:09Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn null_parent_maps_to_original() {
        let page: WikiPage = WikiPageRow {
            id: 1,
            title: "Intro".into(),
            content: "Hello".into(),
            parent_id: None,
            author_id: 5,
            original_author_id: Some(5),
            author_username: "alice".into(),
            created_at: "2017-03-21 14:05:09".into(),
        }
        .into();
        assert!(page.is_original());
        assert_eq!(page.id(), 1);
    }
}
