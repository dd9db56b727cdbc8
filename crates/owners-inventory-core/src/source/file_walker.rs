//! File walking for local OWNERS discovery.

use ignore::WalkBuilder;
use log::{debug, trace, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop a walk from producing a complete file list.
#[derive(Debug, Error)]
pub enum WalkError {
    /// An entry could not be read (permissions, I/O, link loop).
    #[error("cannot walk directory tree: {0}")]
    Walk(#[from] ignore::Error),

    /// A matching file has a path that is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

/// Configuration for file walking behavior.
#[derive(Debug, Clone)]
pub struct FileWalkerConfig {
    /// Whether to descend into hidden directories (starting with `.`).
    /// Default: true
    pub include_hidden: bool,
    /// Whether to respect `.gitignore` rules (only works in git repos).
    /// Default: false
    pub respect_gitignore: bool,
    /// Whether to follow symbolic links.
    /// Default: false
    pub follow_links: bool,
}

impl Default for FileWalkerConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            respect_gitignore: false,
            follow_links: false,
        }
    }
}

impl FileWalkerConfig {
    /// Creates a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to include hidden files.
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Sets whether to respect .gitignore rules.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Sets whether to follow symbolic links.
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

/// Lists the files under `root` whose name is exactly `file_name`.
///
/// Returns paths relative to `root` with forward slashes, sorted. The
/// `.git` directory is never entered. Any entry that cannot be read, and
/// any match whose path is not UTF-8, fails the whole walk.
pub fn find_named_files(
    root: &Path,
    file_name: &str,
    config: &FileWalkerConfig,
) -> Result<Vec<String>, WalkError> {
    debug!(
        "Looking for '{}' under {:?} (hidden={}, gitignore={}, follow_links={})",
        file_name, root, config.include_hidden, config.respect_gitignore, config.follow_links
    );

    let walker = WalkBuilder::new(root)
        .hidden(!config.include_hidden) // hidden(true) = skip hidden files
        .ignore(false) // Don't respect .ignore files (not a git standard)
        .git_ignore(config.respect_gitignore)
        .git_global(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .follow_links(config.follow_links)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            warn!("Walk of {:?} failed: {}", root, e);
            WalkError::Walk(e)
        })?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) || entry.file_name() != file_name {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let Some(relative) = relative.to_str() else {
            warn!("Walk of {:?} aborted: {:?} is not valid UTF-8", root, entry.path());
            return Err(WalkError::NonUtf8Path(entry.path().to_path_buf()));
        };
        // Normalize to forward slashes
        files.push(relative.replace('\\', "/"));
    }

    files.sort();
    files.dedup();

    debug!("Found {} '{}' file(s)", files.len(), file_name);
    trace!("Files: {:?}", files);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("svc/api")).unwrap();
        File::create(dir.path().join("OWNERS")).unwrap();
        File::create(dir.path().join("svc/api/OWNERS")).unwrap();
        File::create(dir.path().join("svc/OWNERS_ALIASES")).unwrap();
        File::create(dir.path().join("svc/main.rs")).unwrap();

        fs::create_dir_all(dir.path().join(".github")).unwrap();
        File::create(dir.path().join(".github/OWNERS")).unwrap();

        fs::create_dir_all(dir.path().join(".git")).unwrap();
        File::create(dir.path().join(".git/OWNERS")).unwrap();

        dir
    }

    #[test]
    fn default_includes_hidden_directories() {
        let dir = setup_test_dir();
        let files = find_named_files(dir.path(), "OWNERS", &FileWalkerConfig::default()).unwrap();
        assert_eq!(files, vec![".github/OWNERS", "OWNERS", "svc/api/OWNERS"]);
    }

    #[test]
    fn excluding_hidden_skips_dot_directories() {
        let dir = setup_test_dir();
        let config = FileWalkerConfig::new().with_hidden(false);
        let files = find_named_files(dir.path(), "OWNERS", &config).unwrap();
        assert_eq!(files, vec!["OWNERS", "svc/api/OWNERS"]);
    }

    #[test]
    fn git_dir_is_never_entered() {
        let dir = setup_test_dir();
        let files = find_named_files(dir.path(), "OWNERS", &FileWalkerConfig::default()).unwrap();
        assert!(!files.iter().any(|f| f.starts_with(".git/")));
    }

    #[test]
    fn directory_named_like_marker_is_not_a_match() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("OWNERS")).unwrap();
        File::create(dir.path().join("OWNERS/notes.txt")).unwrap();
        let files = find_named_files(dir.path(), "OWNERS", &FileWalkerConfig::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn missing_root_is_a_walk_error() {
        let dir = TempDir::new().unwrap();
        let result = find_named_files(
            &dir.path().join("does-not-exist"),
            "OWNERS",
            &FileWalkerConfig::default(),
        );
        assert!(matches!(result, Err(WalkError::Walk(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_path_fails_the_walk() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("OWNERS")).unwrap();
        let odd = dir.path().join(OsStr::from_bytes(b"svc\xff"));
        fs::create_dir_all(&odd).unwrap();
        File::create(odd.join("OWNERS")).unwrap();

        let result = find_named_files(dir.path(), "OWNERS", &FileWalkerConfig::default());
        assert!(matches!(result, Err(WalkError::NonUtf8Path(_))));
    }

    #[test]
    fn config_builders() {
        let config = FileWalkerConfig::new()
            .with_gitignore(true)
            .with_follow_links(true);
        assert!(config.include_hidden);
        assert!(config.respect_gitignore);
        assert!(config.follow_links);
    }
}
