use serde::Deserialize;

// -- Wiki pages --

/// Raw parameters of `POST /createWikiPage`. Every field may be missing and
/// the numeric ones arrive as text, so validation happens in the controller.
#[derive(Debug, Default, Deserialize)]
pub struct CreateWikiPageParams {
    pub title: Option<String>,
    pub content: Option<String>,
    pub username: Option<String>,
    #[serde(rename = "parentID")]
    pub parent_id: Option<String>,
    #[serde(rename = "authorID")]
    pub author_id: Option<String>,
}

impl CreateWikiPageParams {
    /// Fills each missing field from `fallback`. Used to merge the query
    /// string (which wins) with the form body.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            title: self.title.or(fallback.title),
            content: self.content.or(fallback.content),
            username: self.username.or(fallback.username),
            parent_id: self.parent_id.or(fallback.parent_id),
            author_id: self.author_id.or(fallback.author_id),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchWikiPageParams {
    pub title: Option<String>,
    /// Username of the author.
    pub author: Option<String>,
    pub content: Option<String>,
}

/// Same search under `/advancedSearchWikiPage`, where the author's
/// username arrives as `user`.
#[derive(Debug, Default, Deserialize)]
pub struct AdvancedSearchWikiPageParams {
    pub title: Option<String>,
    pub user: Option<String>,
    pub content: Option<String>,
}

impl From<AdvancedSearchWikiPageParams> for SearchWikiPageParams {
    fn from(params: AdvancedSearchWikiPageParams) -> Self {
        Self {
            title: params.title,
            author: params.user,
            content: params.content,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GetWikiPageParams {
    pub id: Option<String>,
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    pub user_name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_win_and_form_fills_the_gaps() {
        let query = CreateWikiPageParams {
            title: Some("From query".into()),
            username: Some("alice".into()),
            ..Default::default()
        };
        let form = CreateWikiPageParams {
            title: Some("From form".into()),
            content: Some("body".into()),
            parent_id: Some("-1".into()),
            ..Default::default()
        };

        let merged = query.or(form);
        assert_eq!(merged.title.as_deref(), Some("From query"));
        assert_eq!(merged.content.as_deref(), Some("body"));
        assert_eq!(merged.username.as_deref(), Some("alice"));
        assert_eq!(merged.parent_id.as_deref(), Some("-1"));
        assert_eq!(merged.author_id, None);
    }

    #[test]
    fn advanced_search_user_becomes_author() {
        let params = SearchWikiPageParams::from(AdvancedSearchWikiPageParams {
            title: Some("Rust".into()),
            user: Some("bob".into()),
            content: None,
        });
        assert_eq!(params.title.as_deref(), Some("Rust"));
        assert_eq!(params.author.as_deref(), Some("bob"));
        assert_eq!(params.content, None);
    }
}
