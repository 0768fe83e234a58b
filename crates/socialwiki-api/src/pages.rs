use axum::{
    Form, Json,
    extract::{Query, State, rejection::FormRejection},
};
use tracing::{debug, error, info};

use socialwiki_db::{SaveError, UserLookup, WikiPageStore};
use socialwiki_types::api::{
    AdvancedSearchWikiPageParams, CreateWikiPageParams, GetWikiPageParams, SearchWikiPageParams,
};
use socialwiki_types::models::{NewWikiPage, ParentRef, User, WikiPage};

use crate::AppState;
use crate::error::PageError;

/// POST /createWikiPage: a new page, or a revision of an existing one.
///
/// Parameters may come from the query string, a form body, or both; query
/// values win. A body that is missing or not form-encoded contributes
/// nothing, so the request still reaches validation.
pub async fn create_wiki_page(
    State(state): State<AppState>,
    Query(query): Query<CreateWikiPageParams>,
    form: Result<Form<CreateWikiPageParams>, FormRejection>,
) -> Result<Json<WikiPage>, PageError> {
    let body = match form {
        Ok(Form(body)) => body,
        Err(rejection) => {
            debug!("Ignoring create body: {}", rejection);
            CreateWikiPageParams::default()
        }
    };
    let params = query.or(body);

    run_blocking(move || create_page(&state.db, &state.db, params))
        .await
        .map(Json)
}

/// GET /searchWikiPage?title=&author=&content=
pub async fn search_wiki_page(
    State(state): State<AppState>,
    Query(params): Query<SearchWikiPageParams>,
) -> Result<Json<Vec<WikiPage>>, PageError> {
    run_blocking(move || search_pages(&state.db, &state.db, params))
        .await
        .map(Json)
}

/// GET /advancedSearchWikiPage?title=&user=&content=
pub async fn advanced_search_wiki_page(
    State(state): State<AppState>,
    Query(params): Query<AdvancedSearchWikiPageParams>,
) -> Result<Json<Vec<WikiPage>>, PageError> {
    run_blocking(move || search_pages(&state.db, &state.db, params.into()))
        .await
        .map(Json)
}

/// GET /getWikiPage?id=
pub async fn get_wiki_page(
    State(state): State<AppState>,
    Query(params): Query<GetWikiPageParams>,
) -> Result<Json<WikiPage>, PageError> {
    run_blocking(move || get_page(&state.db, params)).await.map(Json)
}

async fn run_blocking<F, T>(f: F) -> Result<T, PageError>
where
    F: FnOnce() -> Result<T, PageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        PageError::Internal(e.into())
    })?
}

/// Validates a create request, resolves its author and stores the page.
///
/// Checks run in a fixed order and stop at the first failure: both ids
/// must parse, the title must be non-empty, content must be present, the
/// parent must be the sentinel or a positive id, the author id must be
/// positive, and only then is the username looked up.
///
/// The resolved user is always the page's author. For an original page the
/// supplied author id is kept as the lineage's originating author.
pub fn create_page(
    users: &impl UserLookup,
    pages: &impl WikiPageStore,
    params: CreateWikiPageParams,
) -> Result<WikiPage, PageError> {
    let parent_raw = parse_id(params.parent_id.as_deref(), "parentID must be an integer")?;
    let author_id = parse_id(params.author_id.as_deref(), "authorID must be an integer")?;

    let title = params
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| precondition("title must be a non-empty string"))?;
    let content = params
        .content
        .ok_or_else(|| precondition("content is required"))?;
    let parent = ParentRef::from_raw(parent_raw)
        .ok_or_else(|| precondition("parentID must be -1 or a positive id"))?;
    if author_id <= 0 {
        return Err(precondition("authorID must be positive"));
    }

    let user = resolve_unique(users, params.username.as_deref())?.ok_or_else(|| {
        debug!("Username {:?} did not resolve to one user", params.username);
        PageError::UnresolvedAuthor
    })?;

    let page = match parent {
        ParentRef::Original => NewWikiPage::original(title, content, author_id, &user),
        ParentRef::Revision(parent_id) => NewWikiPage::revision(title, content, parent_id, &user),
    };

    match pages.save(&page) {
        Ok(saved) => {
            info!(
                "Page {} '{}' saved by {} (parent {})",
                saved.id(),
                saved.title,
                user.user_name,
                saved.parent.as_raw()
            );
            Ok(saved)
        }
        Err(SaveError::Rejected(reason)) => Err(PageError::Rejected { page, reason }),
        Err(SaveError::Store(e)) => Err(PageError::Internal(e)),
    }
}

/// Runs a combined search. An author name that does not resolve to exactly
/// one user is dropped from the filter rather than failing the search.
pub fn search_pages(
    users: &impl UserLookup,
    pages: &impl WikiPageStore,
    params: SearchWikiPageParams,
) -> Result<Vec<WikiPage>, PageError> {
    let title = non_empty(params.title.as_deref());
    let author = non_empty(params.author.as_deref());
    let content = non_empty(params.content.as_deref());

    if title.is_none() && author.is_none() && content.is_none() {
        return Err(PageError::EmptySearch);
    }

    let author_id = resolve_unique(users, author)?.map(|u| u.id());
    if author.is_some() && author_id.is_none() {
        debug!("Ignoring author filter {:?}: no unique match", author);
    }

    let found = pages.find_by_title_and_author_id_and_content(title, author_id, content)?;
    debug!("Search matched {} pages", found.len());
    Ok(found)
}

/// Looks up one page by its id, which arrives as text.
pub fn get_page(pages: &impl WikiPageStore, params: GetWikiPageParams) -> Result<WikiPage, PageError> {
    let id = parse_id(params.id.as_deref(), "id must be an integer")?;
    pages.find_by_id(id)?.ok_or(PageError::NotFound)
}

/// The single user with this name, if there is exactly one.
fn resolve_unique(users: &impl UserLookup, user_name: Option<&str>) -> anyhow::Result<Option<User>> {
    let Some(user_name) = user_name else {
        return Ok(None);
    };

    let mut matches = users.find_by_user_name(user_name)?;
    if matches.len() == 1 {
        Ok(matches.pop())
    } else {
        Ok(None)
    }
}

fn parse_id(raw: Option<&str>, reason: &'static str) -> Result<i64, PageError> {
    raw.and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| precondition(reason))
}

fn precondition(reason: &'static str) -> PageError {
    debug!("Rejecting wiki page request: {}", reason);
    PageError::Precondition(reason)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
