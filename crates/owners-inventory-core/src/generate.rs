//! Random OWNERS tree generation for benchmarking and testing.
//!
//! Uses the AST types directly so every generated declaration parses back.
//!
//! Note: Generated ASTs have placeholder spans (all zeros). Do not use
//! for operations that depend on accurate span information.

use crate::OWNERS_FILENAME;
use crate::parse::{Declaration, DeclarationKind, Line, OwnersFile, Span};
use log::debug;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashSet;

/// Configuration for generating OWNERS trees.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of OWNERS files to generate.
    pub num_files: usize,
    /// Maximum declarations per file (0 allows files without declarations).
    pub max_declarations_per_file: usize,
    /// Maximum directory depth below the root.
    pub max_depth: usize,
    /// Seed for deterministic generation.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_files: 100,
            max_declarations_per_file: 4,
            max_depth: 4,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with the given number of files.
    pub fn new(num_files: usize) -> Self {
        Self {
            num_files,
            ..Default::default()
        }
    }

    /// Small fixture (~10 files).
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Medium fixture (~100 files).
    pub fn medium() -> Self {
        Self::new(100)
    }

    /// Large fixture (~1000 files).
    pub fn large() -> Self {
        Self::new(1_000)
    }

    /// Extra large fixture (~10k files).
    pub fn xlarge() -> Self {
        Self::new(10_000)
    }

    /// Set the random seed for deterministic generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum declarations per file.
    pub fn with_max_declarations(mut self, max: usize) -> Self {
        self.max_declarations_per_file = max;
        self
    }

    /// Set the maximum directory depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1); // At least one level
        self
    }
}

/// Vocabulary for generating realistic directories and values.
mod vocabulary {
    pub const DIRECTORIES: &[&str] = &[
        "cmd", "pkg", "internal", "api", "svc", "lib", "web", "tools", "deploy", "docs",
    ];
    pub const PROJECTS: &[&str] = &["PLAT", "CORE", "INFRA", "SEC", "WEB", "DATA"];
    pub const COMPONENTS: &[&str] = &[
        "api-gateway",
        "auth",
        "billing",
        "build tooling",
        "frontend",
        "ingest",
        "storage",
    ];
    pub const COMMENTS: &[&str] = &[
        " owner: alice",
        " reviewers: platform team",
        " see CONTRIBUTING.md for details",
    ];
    pub const OTHER_LINES: &[&str] = &["approvers:", "- alice", "- bob", "options:"];
}

/// Probability of a comment line before a declaration (percentage).
const COMMENT_PROBABILITY: u32 = 25;

/// Probability of an unrecognized line before a declaration (percentage).
const OTHER_LINE_PROBABILITY: u32 = 10;

/// Placeholder span for generated AST nodes.
fn placeholder_span() -> Span {
    Span::new(0, 0, 0, 0)
}

/// Generates a random OWNERS file AST.
fn generate_file_ast(rng: &mut StdRng, max_declarations: usize) -> OwnersFile {
    use vocabulary::*;

    let mut lines = Vec::new();
    let num_declarations = rng.random_range(0..=max_declarations);

    for _ in 0..num_declarations {
        if rng.random_ratio(COMMENT_PROBABILITY, 100) {
            let comment = COMMENTS[rng.random_range(0..COMMENTS.len())];
            lines.push(Line::comment(comment, placeholder_span()));
        }
        if rng.random_ratio(OTHER_LINE_PROBABILITY, 100) {
            let other = OTHER_LINES[rng.random_range(0..OTHER_LINES.len())];
            lines.push(Line::other(other, placeholder_span()));
        }

        let declaration = if rng.random_bool(0.5) {
            Declaration::new(
                DeclarationKind::JiraProject,
                PROJECTS[rng.random_range(0..PROJECTS.len())],
                placeholder_span(),
            )
        } else {
            Declaration::new(
                DeclarationKind::JiraComponent,
                COMPONENTS[rng.random_range(0..COMPONENTS.len())],
                placeholder_span(),
            )
        };
        lines.push(Line::declaration(declaration, placeholder_span()));
    }

    if lines.is_empty() {
        lines.push(Line::comment(" no ownership declared", placeholder_span()));
    }
    OwnersFile::new(lines)
}

/// Number of distinct suffixes on the last directory segment.
const SUFFIXES: usize = 1_000;

/// Number of distinct directories `generate_directory` can produce.
fn directory_capacity(max_depth: usize) -> usize {
    let mut level = SUFFIXES;
    let mut total = 0usize;
    for _ in 0..max_depth {
        level = level.saturating_mul(vocabulary::DIRECTORIES.len());
        total = total.saturating_add(level);
        if total == usize::MAX {
            break;
        }
    }
    total
}

/// Generates a random directory path that has not been used yet.
///
/// Callers must leave at least one directory unused.
fn generate_directory(rng: &mut StdRng, max_depth: usize, used: &HashSet<String>) -> String {
    use vocabulary::*;

    loop {
        let depth = rng.random_range(1..=max_depth);
        let mut segments: Vec<String> = (0..depth)
            .map(|_| DIRECTORIES[rng.random_range(0..DIRECTORIES.len())].to_string())
            .collect();
        if let Some(last) = segments.last_mut() {
            last.push_str(&format!("-{}", rng.random_range(0..SUFFIXES)));
        }
        let directory = segments.join("/");
        if !used.contains(&directory) {
            return directory;
        }
    }
}

/// Generates `(path, content)` pairs for a synthetic repository.
///
/// The first file is the root `OWNERS`; directories are unique, so the
/// aggregate of the output has one entry per file with declarations.
/// `num_files` is capped at the number of distinct directories available
/// at `max_depth`, plus the root.
pub fn generate_repository(config: &GeneratorConfig) -> Vec<(String, String)> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut used = HashSet::new();
    let max_depth = config.max_depth.max(1);
    let num_files = config
        .num_files
        .min(directory_capacity(max_depth).saturating_add(1));
    if num_files < config.num_files {
        debug!(
            "Only {} unique directories exist at depth {}; generating {} files instead of {}",
            num_files - 1,
            max_depth,
            num_files,
            config.num_files
        );
    }
    let mut files = Vec::with_capacity(num_files);

    for i in 0..num_files {
        let path = if i == 0 {
            used.insert(String::new());
            OWNERS_FILENAME.to_string()
        } else {
            let directory = generate_directory(&mut rng, max_depth, &used);
            let path = format!("{}/{}", directory, OWNERS_FILENAME);
            used.insert(directory);
            path
        };
        let content = generate_file_ast(&mut rng, config.max_declarations_per_file).to_string();
        files.push((path, content));
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::parse::parse_owners;
    use std::collections::HashMap;

    #[test]
    fn generated_files_parse_without_issues() {
        for (path, content) in generate_repository(&GeneratorConfig::small()) {
            let parsed = parse_owners(&content);
            assert!(!parsed.has_issues(), "{}: {:?}", path, parsed.issues);
        }
    }

    #[test]
    fn deterministic_generation() {
        let config = GeneratorConfig::medium();
        assert_eq!(generate_repository(&config), generate_repository(&config));
    }

    #[test]
    fn different_seeds_differ() {
        let first = generate_repository(&GeneratorConfig::medium().with_seed(1));
        let second = generate_repository(&GeneratorConfig::medium().with_seed(2));
        assert_ne!(first, second);
    }

    #[test]
    fn paths_are_unique_and_rooted() {
        let files = generate_repository(&GeneratorConfig::large());
        assert_eq!(files[0].0, "OWNERS");
        let unique: HashSet<_> = files.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(unique.len(), files.len());
        assert!(files.iter().all(|(path, _)| path.ends_with("/OWNERS") || path == "OWNERS"));
    }

    #[test]
    fn aggregate_has_one_entry_per_declaring_file() {
        let files = generate_repository(&GeneratorConfig::medium());
        let declaring = files
            .iter()
            .filter(|(_, content)| !parse_owners(content).is_empty())
            .count();
        let contents: HashMap<_, _> = files.iter().cloned().collect();

        let map = aggregate(files.iter().map(|(path, _)| path), |path| {
            contents.get(path).cloned()
        });

        assert_eq!(map.len(), declaring);
    }

    #[test]
    fn directory_capacity_grows_per_level() {
        assert_eq!(directory_capacity(1), 10_000);
        assert_eq!(directory_capacity(2), 110_000);
        assert_eq!(directory_capacity(64), usize::MAX);
    }

    #[test]
    fn file_count_is_capped_by_available_directories() {
        let config = GeneratorConfig::new(20_000).with_max_depth(1);
        let files = generate_repository(&config);
        assert_eq!(files.len(), 10_001);
        let unique: HashSet<_> = files.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(unique.len(), files.len());
    }

    #[test]
    fn zero_declarations_produce_empty_files() {
        let config = GeneratorConfig::new(5).with_max_declarations(0);
        for (_, content) in generate_repository(&config) {
            assert!(parse_owners(&content).is_empty());
        }
    }
}
