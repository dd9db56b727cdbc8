//! CLI module for the OWNERS inventory reporter.
//!
//! This module provides command-line argument parsing using Clap with
//! environment variable support.

pub mod config;
pub mod endor;
pub mod github;
pub mod output;

use clap::Parser;
use std::path::PathBuf;

/// Default GitHub API base URL.
pub const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com/";

/// OWNERS inventory reporter - collects OWNERS metadata and reports it.
///
/// Finds every OWNERS file in a repository, extracts its `jira-project` and
/// `jira-component` declarations, and sends the per-directory result to the
/// inventory service. Runs in dry-run mode unless `--no-dry-run` is given.
#[derive(Parser, Debug)]
#[command(name = "owners-inventory")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// GitHub organization (or user) that owns the repository.
    pub organization: String,

    /// Repository name.
    pub repository: String,

    /// UUID of the inventory project the code owner data is attached to.
    pub project_uuid: String,

    /// Inventory tenant namespace.
    pub namespace: String,

    /// GitHub personal access token used to read the repository.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub base URL for API requests (for GitHub Enterprise).
    #[arg(long, env = "GITHUB_BASE_URL", default_value = DEFAULT_GITHUB_BASE_URL)]
    pub github_base_url: String,

    /// Branch, tag or commit to read (defaults to the repository's default branch).
    #[arg(long = "ref", env = "OWNERS_REF")]
    pub git_ref: Option<String>,

    /// Read OWNERS files from a local working tree instead of GitHub.
    #[arg(long, env = "REPOSITORY_PATH")]
    pub local: Option<PathBuf>,

    /// Skip files ignored by .gitignore when reading a local working tree.
    #[arg(long)]
    pub respect_gitignore: bool,

    /// Inventory service API token. Required with --no-dry-run.
    #[arg(long, env = "ENDOR_TOKEN", hide_env_values = true)]
    pub endor_token: Option<String>,

    /// Inventory service base URL.
    #[arg(long, env = "ENDOR_API_URL", default_value = endor::DEFAULT_API_URL)]
    pub endor_api_url: String,

    /// Send the payload instead of only printing it.
    #[arg(long)]
    pub no_dry_run: bool,

    /// Maximum number of OWNERS files fetched at once.
    #[arg(long, default_value_t = 8)]
    pub concurrency: usize,

    /// Print the payload as plain JSON, without logs or decoration.
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Increase verbosity level (-v for info, -vv for debug, -vvv for trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Where OWNERS files are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A local working tree.
    Local,
    /// The GitHub repository contents API.
    GitHub,
}

impl Args {
    /// Returns which source the arguments select.
    pub fn source_kind(&self) -> SourceKind {
        if self.local.is_some() {
            SourceKind::Local
        } else {
            SourceKind::GitHub
        }
    }

    /// Returns true if the payload should only be displayed.
    pub fn is_dry_run(&self) -> bool {
        !self.no_dry_run
    }

    /// Returns the repository in 'owner/repo' format.
    pub fn full_repository_name(&self) -> String {
        format!("{}/{}", self.organization, self.repository)
    }
}
