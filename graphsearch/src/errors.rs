use thiserror::Error;

/// Error produced when a search fails.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No search result found")]
    NoResultFound,
}

/// Result when a search method might fail.
pub type Result<T> = std::result::Result<T, SearchError>;
