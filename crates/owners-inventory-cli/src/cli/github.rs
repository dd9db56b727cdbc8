//! GitHub source implementation using octocrab.
//!
//! This module provides the octocrab-based implementation of the
//! `OwnersSource` trait, reading OWNERS files through the repository
//! contents API.

use async_trait::async_trait;
use http::StatusCode;
use octocrab::Octocrab;
use octocrab::models::repos::Content;
use owners_inventory_core::OWNERS_FILENAME;
use owners_inventory_core::source::{OwnersSource, SourceError};
use std::collections::{HashSet, VecDeque};
use tokio::sync::OnceCell;
use tracing::{debug, info, trace};

/// Reads OWNERS files from a GitHub repository.
///
/// Discovery walks the directory tree breadth-first, one contents request
/// per directory, so paths come back in the order the API lists them.
pub struct OctocrabSource {
    client: Octocrab,
    owner: String,
    repo: String,
    reference: OnceCell<String>,
}

impl OctocrabSource {
    /// Creates a source for `owner/repo`.
    ///
    /// Without a `reference` the repository's default branch is read.
    pub fn new(
        client: Octocrab,
        owner: impl Into<String>,
        repo: impl Into<String>,
        reference: Option<String>,
    ) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
            reference: OnceCell::new_with(reference),
        }
    }

    /// Returns the repository in 'owner/repo' format.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Returns the ref being read, resolving the default branch once.
    async fn reference(&self) -> Result<&str, SourceError> {
        let reference = self
            .reference
            .get_or_try_init(|| async {
                let repository = self
                    .client
                    .repos(&self.owner, &self.repo)
                    .get()
                    .await
                    .map_err(|e| self.repository_error(e))?;
                let branch = repository.default_branch.ok_or_else(|| {
                    SourceError::Discovery(format!(
                        "{} does not report a default branch",
                        self.full_name()
                    ))
                })?;
                info!("Default branch: {}", branch);
                Ok::<_, SourceError>(branch)
            })
            .await?;
        Ok(reference.as_str())
    }

    /// Lists one directory (or returns the single item for a file path).
    async fn get_content(&self, path: &str, reference: &str) -> Result<Vec<Content>, octocrab::Error> {
        let handler = self.client.repos(&self.owner, &self.repo);
        let mut request = handler.get_content().r#ref(reference);
        if !path.is_empty() {
            request = request.path(path);
        }
        Ok(request.send().await?.items)
    }

    fn repository_error(&self, error: octocrab::Error) -> SourceError {
        let name = self.full_name();
        match extract_status_code(&error) {
            Some(StatusCode::NOT_FOUND) => SourceError::NotFound(format!("repository {}", name)),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                SourceError::Unauthorized(format!("cannot read {}: {}", name, error))
            }
            _ => SourceError::Api(error.to_string()),
        }
    }
}

/// Extracts the HTTP status code from an octocrab error.
fn extract_status_code(error: &octocrab::Error) -> Option<StatusCode> {
    match error {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code),
        _ => None,
    }
}

#[async_trait]
impl OwnersSource for OctocrabSource {
    async fn discover(&self) -> Result<Vec<String>, SourceError> {
        let reference = self.reference().await?;
        info!("Listing {} at {}", self.full_name(), reference);

        let mut found = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = VecDeque::from([String::new()]);

        while let Some(directory) = pending.pop_front() {
            trace!("Listing directory '{}'", directory);
            let items = self
                .get_content(&directory, reference)
                .await
                .map_err(|e| self.repository_error(e))?;

            for item in items {
                match item.r#type.as_str() {
                    "dir" => pending.push_back(item.path),
                    "file" if item.name == OWNERS_FILENAME => {
                        if seen.insert(item.path.clone()) {
                            debug!("Found {}", item.path);
                            found.push(item.path);
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(found)
    }

    async fn fetch(&self, path: &str) -> Result<Option<String>, SourceError> {
        let reference = self.reference().await?;
        match self.get_content(path, reference).await {
            Ok(items) => {
                let content = items.into_iter().next().and_then(|item| item.decoded_content());
                if content.is_none() {
                    debug!("{} returned no decodable content", path);
                }
                Ok(content)
            }
            Err(e) => match extract_status_code(&e) {
                Some(StatusCode::NOT_FOUND) => Ok(None),
                Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => Err(
                    SourceError::Unauthorized(format!("cannot read {}: {}", path, e)),
                ),
                _ => Err(SourceError::Api(format!("{}: {}", path, e))),
            },
        }
    }
}
