//! Sources of OWNERS files.
//!
//! This module provides a trait-based abstraction over where OWNERS files
//! come from, allowing different implementations (a local working tree, a
//! hosted repository API).

mod file_walker;
mod local;

pub use file_walker::{FileWalkerConfig, WalkError, find_named_files};
pub use local::LocalSource;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while discovering or fetching OWNERS files.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The candidate files could not be enumerated.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// The repository or ref does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Insufficient authorization to read the repository.
    #[error("authorization error: {0}")]
    Unauthorized(String),

    /// An API error occurred.
    #[error("API error: {0}")]
    Api(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for OWNERS file sources.
///
/// # Example
///
/// ```rust,ignore
/// use owners_inventory_core::source::{OwnersSource, SourceError};
///
/// struct MySource { /* ... */ }
///
/// #[async_trait::async_trait]
/// impl OwnersSource for MySource {
///     async fn discover(&self) -> Result<Vec<String>, SourceError> {
///         Ok(vec!["OWNERS".to_string()])
///     }
///
///     async fn fetch(&self, path: &str) -> Result<Option<String>, SourceError> {
///         Ok(Some("jira-project PROJ\n".to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait OwnersSource: Send + Sync {
    /// Lists the repository-relative paths of all OWNERS files.
    ///
    /// Paths use `/` separators, contain no duplicates and come in a stable
    /// order. Failure here aborts the run.
    async fn discover(&self) -> Result<Vec<String>, SourceError>;

    /// Fetches the text of one discovered file.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(content))` - The file content
    /// * `Ok(None)` - The file no longer exists
    /// * `Err(SourceError)` - The file could not be read
    async fn fetch(&self, path: &str) -> Result<Option<String>, SourceError>;
}
