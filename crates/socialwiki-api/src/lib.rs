pub mod error;
pub mod pages;
pub mod routes;
pub mod users;

use std::sync::Arc;

use socialwiki_db::Database;

pub use routes::router;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self { db })
    }
}
