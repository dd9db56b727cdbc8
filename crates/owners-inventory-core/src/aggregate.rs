//! Aggregation of parsed OWNERS files into a directory-keyed map.
//!
//! Each OWNERS file describes the directory that contains it. The
//! aggregator resolves that directory, parses the file, and keeps the
//! result only if at least one declaration was found.
//!
//! # Example
//!
//! ```rust
//! use owners_inventory_core::aggregate::aggregate;
//!
//! let map = aggregate(["OWNERS", "svc/api/OWNERS"], |path| match path {
//!     "OWNERS" => Some("jira-project \"PROJ\"\n".to_string()),
//!     "svc/api/OWNERS" => Some("jira-component 'comp-x'\n".to_string()),
//!     _ => None,
//! });
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("").unwrap().owners, vec!["PROJ"]);
//! assert_eq!(map.get("svc/api").unwrap().labels, vec!["jira-component"]);
//! ```

use crate::OWNERS_FILENAME;
use crate::parse::{ParseResult, parse_owners};
use crate::source::{OwnersSource, SourceError};
use futures::stream::{self, StreamExt};
use log::{debug, info, trace, warn};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// Returns the directory an ownership file describes.
///
/// Removes a trailing `/<marker>` from `file_path`. A path equal to
/// `marker` is the repository root and yields the empty string. Paths whose
/// last segment is not `marker` are returned unchanged.
pub fn normalize_owners_path(file_path: &str, marker: &str) -> String {
    if file_path == marker {
        return String::new();
    }
    match file_path
        .strip_suffix(marker)
        .and_then(|dir| dir.strip_suffix('/'))
    {
        Some(dir) => dir.to_string(),
        None => file_path.to_string(),
    }
}

/// Labels and owners of one directory, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipEntry {
    /// Declaration labels (`jira-project`, `jira-component`).
    pub labels: Vec<String>,
    /// Declaration values; `owners[i]` belongs to `labels[i]`.
    pub owners: Vec<String>,
}

impl OwnershipEntry {
    /// Builds an entry from ordered `(label, value)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let (labels, owners) = pairs
            .into_iter()
            .map(|(label, value)| (label.to_string(), value.to_string()))
            .unzip();
        Self { labels, owners }
    }

    /// Returns the number of declarations.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if there are no declarations.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates over `(label, owner)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .zip(self.owners.iter())
            .map(|(label, owner)| (label.as_str(), owner.as_str()))
    }
}

/// The parsed declarations of one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipRecord {
    /// Repository-relative directory path (`""` for the root).
    pub directory: String,
    /// The declarations found in the directory's OWNERS file.
    pub entry: OwnershipEntry,
}

impl OwnershipRecord {
    /// Builds the record for an OWNERS file.
    ///
    /// Returns `None` when the file declares nothing.
    pub fn from_parse(file_path: &str, result: &ParseResult) -> Option<Self> {
        if result.is_empty() {
            return None;
        }
        Some(Self {
            directory: normalize_owners_path(file_path, OWNERS_FILENAME),
            entry: OwnershipEntry::from_pairs(result.pairs()),
        })
    }
}

/// Directory path to ownership entry, in insertion order.
///
/// Inserting an existing directory replaces its entry in place: the last
/// write wins and the directory keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipMap {
    entries: Vec<(String, OwnershipEntry)>,
    index: HashMap<String, usize>,
}

impl OwnershipMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the entry it replaced.
    pub fn insert(
        &mut self,
        directory: impl Into<String>,
        entry: OwnershipEntry,
    ) -> Option<OwnershipEntry> {
        let directory = directory.into();
        match self.index.get(&directory) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, entry)),
            None => {
                self.index.insert(directory.clone(), self.entries.len());
                self.entries.push((directory, entry));
                None
            }
        }
    }

    /// Returns the entry for a directory.
    pub fn get(&self, directory: &str) -> Option<&OwnershipEntry> {
        self.index.get(directory).map(|&pos| &self.entries[pos].1)
    }

    /// Returns true if the directory has an entry.
    pub fn contains(&self, directory: &str) -> bool {
        self.index.contains_key(directory)
    }

    /// Returns the number of directories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no directory has an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(directory, entry)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OwnershipEntry)> {
        self.entries
            .iter()
            .map(|(directory, entry)| (directory.as_str(), entry))
    }
}

impl Serialize for OwnershipMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (directory, entry) in &self.entries {
            map.serialize_entry(directory, entry)?;
        }
        map.end()
    }
}

/// Counters describing one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    /// OWNERS files handed to the aggregator.
    pub discovered: usize,
    /// Files whose content could not be fetched.
    pub failed: usize,
    /// Files that were absent when fetched.
    pub missing: usize,
    /// Files without any declaration.
    pub empty: usize,
    /// Records that replaced an earlier record for the same directory.
    pub replaced: usize,
}

/// The output of an aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    /// The directory-keyed ownership map.
    pub map: OwnershipMap,
    /// Counters for the pass.
    pub stats: AggregateStats,
}

/// Incrementally builds an [`OwnershipMap`] from fetched OWNERS files.
#[derive(Debug, Default)]
pub struct Aggregator {
    result: AggregateResult,
}

impl Aggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one discovered file; `None` content means it could not be read.
    pub fn add(&mut self, file_path: &str, content: Option<&str>) {
        self.result.stats.discovered += 1;

        let Some(content) = content else {
            warn!("No content found for path: {}", file_path);
            self.result.stats.missing += 1;
            return;
        };

        trace!("Processing {} ({} bytes)", file_path, content.len());
        let parsed = parse_owners(content);
        for issue in &parsed.issues {
            debug!("{}: {}", file_path, issue);
        }

        match OwnershipRecord::from_parse(file_path, &parsed) {
            Some(record) => {
                debug!(
                    "Recording {} declaration(s) for '{}'",
                    record.entry.len(),
                    record.directory
                );
                if self
                    .result
                    .map
                    .insert(record.directory.as_str(), record.entry)
                    .is_some()
                {
                    warn!(
                        "'{}' was already recorded; keeping the entry from {}",
                        record.directory, file_path
                    );
                    self.result.stats.replaced += 1;
                }
            }
            None => {
                debug!("No declarations found in {}", file_path);
                self.result.stats.empty += 1;
            }
        }
    }

    /// Records a fetch failure for one discovered file.
    pub fn add_failed(&mut self, file_path: &str, error: &SourceError) {
        warn!("Skipping {}: {}", file_path, error);
        self.result.stats.discovered += 1;
        self.result.stats.failed += 1;
    }

    /// Finishes the pass.
    pub fn finish(self) -> AggregateResult {
        info!(
            "Aggregated {} director(ies) from {} OWNERS file(s)",
            self.result.map.len(),
            self.result.stats.discovered
        );
        self.result
    }
}

/// Aggregates OWNERS files given their paths and a content lookup.
///
/// Paths are processed in iteration order. A path whose lookup returns
/// `None` is skipped, as is a file without declarations. When two paths
/// resolve to the same directory the later one replaces the earlier one.
pub fn aggregate<I, P, F>(paths: I, mut lookup: F) -> OwnershipMap
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
    F: FnMut(&str) -> Option<String>,
{
    let mut aggregator = Aggregator::new();
    for path in paths {
        let path = path.as_ref();
        let content = lookup(path);
        aggregator.add(path, content.as_deref());
    }
    aggregator.finish().map
}

/// Discovers, fetches and aggregates every OWNERS file of a source.
///
/// Up to `concurrency` fetches are in flight at once; results are still
/// applied in discovery order. A failed fetch skips that file only. A
/// failed discovery is returned as an error.
pub async fn aggregate_source(
    source: &dyn OwnersSource,
    concurrency: usize,
) -> Result<AggregateResult, SourceError> {
    let paths = source.discover().await?;
    info!("Found {} OWNERS file(s)", paths.len());

    let mut fetches = stream::iter(paths.iter())
        .map(|path| async move { (path, source.fetch(path).await) })
        .buffered(concurrency.max(1));

    let mut aggregator = Aggregator::new();
    while let Some((path, fetched)) = fetches.next().await {
        match fetched {
            Ok(content) => aggregator.add(path, content.as_deref()),
            Err(e) => aggregator.add_failed(path, &e),
        }
    }
    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn lookup_from(files: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let files: HashMap<String, String> = files
            .iter()
            .map(|(path, content)| (path.to_string(), content.to_string()))
            .collect();
        move |path: &str| files.get(path).cloned()
    }

    #[test]
    fn normalize_strips_trailing_marker() {
        assert_eq!(normalize_owners_path("a/b/OWNERS", "OWNERS"), "a/b");
        assert_eq!(normalize_owners_path("OWNERS", "OWNERS"), "");
        assert_eq!(normalize_owners_path("/OWNERS", "OWNERS"), "");
    }

    #[test]
    fn normalize_only_touches_last_segment() {
        assert_eq!(
            normalize_owners_path("OWNERS/sub/OWNERS", "OWNERS"),
            "OWNERS/sub"
        );
        assert_eq!(
            normalize_owners_path("a/OWNERS/readme.md", "OWNERS"),
            "a/OWNERS/readme.md"
        );
        assert_eq!(
            normalize_owners_path("a/NOT_OWNERS", "OWNERS"),
            "a/NOT_OWNERS"
        );
    }

    #[test]
    fn entry_from_pairs_is_index_aligned() {
        let entry = OwnershipEntry::from_pairs([("jira-project", "P"), ("jira-component", "c")]);
        assert_eq!(entry.labels, vec!["jira-project", "jira-component"]);
        assert_eq!(entry.owners, vec!["P", "c"]);
        assert_eq!(entry.len(), 2);
        assert_eq!(
            entry.pairs().collect::<Vec<_>>(),
            vec![("jira-project", "P"), ("jira-component", "c")]
        );
    }

    #[test]
    fn end_to_end_scenario() {
        let map = aggregate(
            ["OWNERS", "svc/api/OWNERS"],
            lookup_from(&[
                ("OWNERS", "jira-project \"PROJ\""),
                ("svc/api/OWNERS", "jira-component 'comp-x'\n# owner: alice\n\n"),
            ]),
        );

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "": { "labels": ["jira-project"], "owners": ["PROJ"] },
                "svc/api": { "labels": ["jira-component"], "owners": ["comp-x"] }
            })
        );
    }

    #[test]
    fn absent_content_is_skipped() {
        let map = aggregate(
            ["a/OWNERS", "b/OWNERS", "c/OWNERS"],
            lookup_from(&[
                ("a/OWNERS", "jira-project A"),
                ("c/OWNERS", "jira-project C"),
            ]),
        );
        assert_eq!(map.len(), 2);
        assert!(!map.contains("b"));
        assert_eq!(map.get("a").unwrap().owners, vec!["A"]);
        assert_eq!(map.get("c").unwrap().owners, vec!["C"]);
    }

    #[test]
    fn comment_only_file_is_absent() {
        let map = aggregate(
            ["docs/OWNERS"],
            lookup_from(&[("docs/OWNERS", "# nothing here\n\n")]),
        );
        assert!(map.is_empty());
    }

    #[test]
    fn later_record_replaces_earlier_one() {
        let mut aggregator = Aggregator::new();
        aggregator.add(
            "lib/OWNERS",
            Some("jira-project FIRST\njira-component one\n"),
        );
        aggregator.add("other/OWNERS", Some("jira-project OTHER"));
        aggregator.add("lib/OWNERS", Some("jira-component second"));
        let result = aggregator.finish();

        assert_eq!(result.stats.replaced, 1);
        assert_eq!(
            result.map.get("lib").unwrap(),
            &OwnershipEntry::from_pairs([("jira-component", "second")])
        );
        let order: Vec<_> = result.map.iter().map(|(dir, _)| dir).collect();
        assert_eq!(order, vec!["lib", "other"]);
    }

    #[test]
    fn map_preserves_insertion_order() {
        let map = aggregate(
            ["z/OWNERS", "a/OWNERS", "m/OWNERS"],
            |_| Some("jira-project X".to_string()),
        );
        let order: Vec<_> = map.iter().map(|(dir, _)| dir).collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn stats_count_each_outcome() {
        let mut aggregator = Aggregator::new();
        aggregator.add("a/OWNERS", Some("jira-project A"));
        aggregator.add("b/OWNERS", None);
        aggregator.add("c/OWNERS", Some("# empty"));
        aggregator.add_failed("d/OWNERS", &SourceError::Api("boom".to_string()));
        let stats = aggregator.finish().stats;

        assert_eq!(
            stats,
            AggregateStats {
                discovered: 4,
                failed: 1,
                missing: 1,
                empty: 1,
                replaced: 0,
            }
        );
    }

    /// An in-memory source for testing.
    struct MemorySource {
        paths: Vec<String>,
        files: HashMap<String, Result<String, String>>,
        fetch_count: AtomicUsize,
    }

    impl MemorySource {
        fn new(files: &[(&str, Result<&str, &str>)]) -> Self {
            Self {
                paths: files.iter().map(|(path, _)| path.to_string()).collect(),
                files: files
                    .iter()
                    .map(|(path, content)| {
                        (
                            path.to_string(),
                            content.map(str::to_string).map_err(str::to_string),
                        )
                    })
                    .collect(),
                fetch_count: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OwnersSource for MemorySource {
        async fn discover(&self) -> Result<Vec<String>, SourceError> {
            Ok(self.paths.clone())
        }

        async fn fetch(&self, path: &str) -> Result<Option<String>, SourceError> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            match self.files.get(path) {
                Some(Ok(content)) => Ok(Some(content.clone())),
                Some(Err(message)) => Err(SourceError::Api(message.clone())),
                None => Ok(None),
            }
        }
    }

    struct FailingSource;

    #[async_trait]
    impl OwnersSource for FailingSource {
        async fn discover(&self) -> Result<Vec<String>, SourceError> {
            Err(SourceError::Discovery("not a repository".to_string()))
        }

        async fn fetch(&self, _path: &str) -> Result<Option<String>, SourceError> {
            unreachable!("fetch must not run after a failed discovery")
        }
    }

    #[tokio::test]
    async fn aggregate_source_skips_failed_fetches() {
        let source = MemorySource::new(&[
            ("OWNERS", Ok("jira-project ROOT")),
            ("broken/OWNERS", Err("502 Bad Gateway")),
            ("svc/OWNERS", Ok("jira-component svc")),
        ]);

        let result = aggregate_source(&source, 2).await.unwrap();

        assert_eq!(source.fetch_count.load(Ordering::SeqCst), 3);
        assert_eq!(result.stats.failed, 1);
        let order: Vec<_> = result.map.iter().map(|(dir, _)| dir).collect();
        assert_eq!(order, vec!["", "svc"]);
    }

    #[tokio::test]
    async fn aggregate_source_keeps_discovery_order_under_concurrency() {
        let files: Vec<(String, String)> = (0..32)
            .map(|i| (format!("d{i:02}/OWNERS"), format!("jira-project P{i}")))
            .collect();
        let refs: Vec<(&str, Result<&str, &str>)> = files
            .iter()
            .map(|(path, content)| (path.as_str(), Ok(content.as_str())))
            .collect();
        let source = MemorySource::new(&refs);

        let result = aggregate_source(&source, 8).await.unwrap();

        let order: Vec<_> = result.map.iter().map(|(dir, _)| dir.to_string()).collect();
        let expected: Vec<_> = (0..32).map(|i| format!("d{i:02}")).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn aggregate_source_propagates_discovery_failure() {
        let result = tokio_test::block_on(aggregate_source(&FailingSource, 4));
        assert!(matches!(result, Err(SourceError::Discovery(_))));
    }
}
