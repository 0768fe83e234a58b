use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Parent id clients send for a page that starts a new lineage.
pub const IS_ORIGINAL_ID: i64 = -1;

/// Where a page sits in its revision chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// No predecessor; the page starts a lineage.
    Original,
    /// Edit of the page with this id.
    Revision(i64),
}

impl ParentRef {
    /// Accepts the sentinel or a strictly positive id. Zero and anything
    /// below the sentinel have no meaning.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            IS_ORIGINAL_ID => Some(Self::Original),
            id if id >= 1 => Some(Self::Revision(id)),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i64 {
        match self {
            Self::Original => IS_ORIGINAL_ID,
            Self::Revision(id) => id,
        }
    }

    /// The referenced page id, as stored in a nullable column.
    pub fn parent_id(self) -> Option<i64> {
        match self {
            Self::Original => None,
            Self::Revision(id) => Some(id),
        }
    }

    pub fn from_parent_id(parent_id: Option<i64>) -> Self {
        parent_id.map_or(Self::Original, Self::Revision)
    }
}

impl Serialize for ParentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_raw())
    }
}

impl<'de> Deserialize<'de> for ParentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::from_raw(raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid parent id {raw}, expected -1 or >= 1"))
        })
    }
}

// -- Users --

/// An account that has not been stored yet. The password is already hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub user_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: String,
}

/// A stored account. The id is assigned by the store and never changes.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    id: i64,
    pub user_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: String,
}

impl User {
    pub fn stored(id: i64, user: NewUser) -> Self {
        Self {
            id,
            user_name: user.user_name,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Copy of the account without the password, safe to hand to clients.
    pub fn as_session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            user_name: self.user_name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("user_name", &self.user_name)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub user_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

// -- Wiki pages --

/// A page or revision that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWikiPage {
    pub title: String,
    pub content: String,
    #[serde(rename = "parentID")]
    pub parent: ParentRef,
    #[serde(rename = "authorID")]
    pub author_id: i64,
    /// Originating author id of the lineage. Unset on a revision until the
    /// store copies it from the parent.
    #[serde(rename = "originalAuthorID")]
    pub original_author_id: Option<i64>,
}

impl NewWikiPage {
    /// First page of a lineage. `author` wrote it; `original_author_id` is
    /// recorded as the lineage's originating author.
    pub fn original(title: String, content: String, original_author_id: i64, author: &User) -> Self {
        Self {
            title,
            content,
            parent: ParentRef::Original,
            author_id: author.id(),
            original_author_id: Some(original_author_id),
        }
    }

    /// Edit of `parent_id`, credited to the user making the edit.
    pub fn revision(title: String, content: String, parent_id: i64, author: &User) -> Self {
        Self {
            title,
            content,
            parent: ParentRef::Revision(parent_id),
            author_id: author.id(),
            original_author_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPage {
    id: i64,
    pub title: String,
    pub content: String,
    #[serde(rename = "parentID")]
    pub parent: ParentRef,
    #[serde(rename = "authorID")]
    pub author_id: i64,
    #[serde(rename = "originalAuthorID")]
    pub original_author_id: Option<i64>,
    pub author_user_name: String,
    pub created_at: DateTime<Utc>,
}

impl WikiPage {
    pub fn stored(
        id: i64,
        page: NewWikiPage,
        author_user_name: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: page.title,
            content: page.content,
            parent: page.parent,
            author_id: page.author_id,
            original_author_id: page.original_author_id,
            author_user_name,
            created_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_original(&self) -> bool {
        self.parent == ParentRef::Original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::stored(
            5,
            NewUser {
                user_name: "alice".into(),
                first_name: Some("Alice".into()),
                last_name: None,
                email: "alice@example.com".into(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            },
        )
    }

    #[test]
    fn parent_ref_accepts_sentinel_and_positive_ids() {
        assert_eq!(ParentRef::from_raw(-1), Some(ParentRef::Original));
        assert_eq!(ParentRef::from_raw(1), Some(ParentRef::Revision(1)));
        assert_eq!(ParentRef::from_raw(42), Some(ParentRef::Revision(42)));
    }

    #[test]
    fn parent_ref_rejects_zero_and_below_sentinel() {
        assert_eq!(ParentRef::from_raw(0), None);
        assert_eq!(ParentRef::from_raw(-2), None);
        assert_eq!(ParentRef::from_raw(i64::MIN), None);
    }

    #[test]
    fn parent_ref_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&ParentRef::Original).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&ParentRef::Revision(7)).unwrap(), "7");
        assert!(serde_json::from_str::<ParentRef>("0").is_err());
    }

    #[test]
    fn session_user_drops_password() {
        let user = alice();
        let session = user.as_session_user();
        assert_eq!(session.id, 5);
        assert_eq!(session.user_name, "alice");

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["userName"], "alice");
        assert_eq!(json["firstName"], "Alice");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn debug_output_redacts_hash() {
        let rendered = format!("{:?}", alice());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("argon2id"));
    }

    #[test]
    fn revision_takes_author_from_resolved_user() {
        let page = NewWikiPage::revision("Intro".into(), "v2".into(), 3, &alice());
        assert_eq!(page.parent, ParentRef::Revision(3));
        assert_eq!(page.author_id, 5);
        assert_eq!(page.original_author_id, None);
    }

    #[test]
    fn original_is_written_by_resolved_user() {
        let page = NewWikiPage::original("Intro".into(), "v1".into(), 2, &alice());
        assert_eq!(page.parent, ParentRef::Original);
        assert_eq!(page.author_id, 5);
        assert_eq!(page.original_author_id, Some(2));
    }

    #[test]
    fn wiki_page_wire_names() {
        let page = WikiPage::stored(
            9,
            NewWikiPage::original("Intro".into(), "Hello".into(), 5, &alice()),
            "alice".into(),
            DateTime::<Utc>::default(),
        );
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["parentID"], -1);
        assert_eq!(json["authorID"], 5);
        assert_eq!(json["originalAuthorID"], 5);
        assert_eq!(json["authorUserName"], "alice");
    }
}
