use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

use socialwiki_types::models::{NewUser, NewWikiPage, User, WikiPage};

use crate::Database;
use crate::models::{UserRow, WikiPageRow};
use crate::store::{SaveError, UserLookup, UserStore, WikiPageStore};

const PAGE_COLUMNS: &str = "p.id, p.title, p.content, p.parent_id, p.author_id, p.original_author_id, u.username, p.created_at
     FROM wiki_pages p
     JOIN users u ON u.id = p.author_id";

// -- Users --

impl UserLookup for Database {
    fn find_by_user_name(&self, user_name: &str) -> Result<Vec<User>> {
        self.with_conn(|conn| query_users_by_name(conn, user_name))
    }
}

impl UserStore for Database {
    fn create_user(&self, user: &NewUser) -> Result<User, SaveError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (username, first_name, last_name, email, password)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                user.user_name,
                user.first_name,
                user.last_name,
                user.email,
                user.password_hash,
            ],
        )
        .map_err(SaveError::from_sqlite)?;

        Ok(User::stored(conn.last_insert_rowid(), user.clone()))
    }
}

// -- Wiki pages --

impl WikiPageStore for Database {
    fn save(&self, page: &NewWikiPage) -> Result<WikiPage, SaveError> {
        let conn = self.lock()?;
        // A revision inherits the originating author of the page it edits.
        conn.execute(
            "INSERT INTO wiki_pages (title, content, parent_id, author_id, original_author_id)
             VALUES (?1, ?2, ?3, ?4,
                     COALESCE(?5, (SELECT original_author_id FROM wiki_pages WHERE id = ?3)))",
            rusqlite::params![
                page.title,
                page.content,
                page.parent.parent_id(),
                page.author_id,
                page.original_author_id,
            ],
        )
        .map_err(SaveError::from_sqlite)?;

        let id = conn.last_insert_rowid();
        query_page_by_id(&conn, id)?
            .ok_or_else(|| SaveError::Store(anyhow::anyhow!("Page {} vanished after insert", id)))
    }

    fn find_by_id(&self, id: i64) -> Result<Option<WikiPage>> {
        self.with_conn(|conn| query_page_by_id(conn, id))
    }

    fn find_by_title_and_author_id_and_content(
        &self,
        title: Option<&str>,
        author_id: Option<i64>,
        content: Option<&str>,
    ) -> Result<Vec<WikiPage>> {
        let title = title.filter(|t| !t.is_empty()).map(escape_like);
        let content = content.filter(|c| !c.is_empty()).map(escape_like);

        self.with_conn(|conn| {
            let sql = format!(
                r"SELECT {PAGE_COLUMNS}
                 WHERE (?1 IS NULL OR p.title LIKE '%' || ?1 || '%' ESCAPE '\')
                   AND (?2 IS NULL OR p.author_id = ?2)
                   AND (?3 IS NULL OR p.content LIKE '%' || ?3 || '%' ESCAPE '\')
                 ORDER BY p.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params![title, author_id, content], page_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows.into_iter().map(WikiPage::from).collect())
        })
    }
}

fn query_users_by_name(conn: &Connection, user_name: &str) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, first_name, last_name, email, password FROM users WHERE username = ?1",
    )?;

    let rows = stmt
        .query_map([user_name], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                email: row.get(4)?,
                password: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows.into_iter().map(User::from).collect())
}

fn query_page_by_id(conn: &Connection, id: i64) -> Result<Option<WikiPage>> {
    let sql = format!("SELECT {PAGE_COLUMNS} WHERE p.id = ?1");
    let row = conn.query_row(&sql, [id], page_row).optional()?;
    Ok(row.map(WikiPage::from))
}

fn page_row(row: &Row<'_>) -> rusqlite::Result<WikiPageRow> {
    Ok(WikiPageRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        parent_id: row.get(3)?,
        author_id: row.get(4)?,
        original_author_id: row.get(5)?,
        author_username: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Makes `%`, `_` and the escape character itself match literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
