//! SQLite persistence for links and their tags.
//!
//! Every write runs inside a single transaction. Reads that assemble a link
//! (row plus tag names) use one pooled connection.

pub mod links;
pub mod tags;

pub use links::{
    create_link, delete_link, get_link, import_links, list_links, update_link, LinkFilter,
    SortField, SortOrder,
};
pub use tags::list_tags;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("link not found")]
    NotFound,
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
