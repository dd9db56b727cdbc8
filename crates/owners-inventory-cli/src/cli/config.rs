//! Configuration handling for the CLI.
//!
//! This module converts CLI arguments into a validated run configuration
//! and builds the GitHub client.

use crate::cli::endor::codeowners_url;
use crate::cli::{Args, DEFAULT_GITHUB_BASE_URL, SourceKind};
use octocrab::Octocrab;
use owners_inventory_core::PayloadTarget;
use owners_inventory_core::source::FileWalkerConfig;
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration.
    #[error("missing required configuration: {0}")]
    MissingRequired(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// GitHub client setup error.
    #[error("GitHub authentication error: {0}")]
    GitHubAuth(String),
}

/// Application exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The payload was printed or delivered.
    Success = 0,
    /// Application startup failed (configuration, client setup or discovery).
    StartupFailure = 1,
    /// Application terminated by signal (SIGINT/SIGTERM).
    Terminated = 2,
    /// The inventory service rejected the payload or could not be reached.
    DeliveryFailed = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Settings for reading OWNERS files from GitHub.
#[derive(Debug)]
pub struct GitHubSourceConfig {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Ref to read; `None` means the default branch.
    pub reference: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Personal access token.
    pub token: Option<SecretString>,
}

/// Where OWNERS files are read from.
#[derive(Debug)]
pub enum SourceConfig {
    /// A local working tree.
    Local {
        root: PathBuf,
        walker: FileWalkerConfig,
    },
    /// The GitHub contents API.
    GitHub(GitHubSourceConfig),
}

/// What happens to the payload once it is built.
#[derive(Debug)]
pub enum DeliveryMode {
    /// Print the payload and the request that would be sent.
    DryRun,
    /// Send the payload with the given token.
    Submit { token: SecretString },
}

impl DeliveryMode {
    /// Returns true if nothing will be sent.
    pub fn is_dry_run(&self) -> bool {
        matches!(self, DeliveryMode::DryRun)
    }
}

/// Validated and processed configuration for one run.
#[derive(Debug)]
pub struct RunConfig {
    /// Where OWNERS files come from.
    pub source: SourceConfig,
    /// Repository, project and namespace of the payload.
    pub target: PayloadTarget,
    /// Inventory service base URL.
    pub api_url: String,
    /// Dry run or submission.
    pub delivery: DeliveryMode,
    /// Maximum number of concurrent fetches.
    pub concurrency: usize,
    /// Whether to output plain JSON.
    pub json_output: bool,
}

impl RunConfig {
    /// Creates a validated configuration from CLI arguments.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "concurrency must be at least 1".to_string(),
            ));
        }

        let api_url = args.endor_api_url.trim_end_matches('/').to_string();
        codeowners_url(&api_url, &args.namespace).map_err(|e| {
            ConfigError::Invalid(format!(
                "inventory API URL '{}' with namespace '{}' is unusable: {}",
                args.endor_api_url, args.namespace, e
            ))
        })?;

        let delivery = if args.is_dry_run() {
            DeliveryMode::DryRun
        } else {
            let token = non_empty(args.endor_token.as_deref()).ok_or_else(|| {
                ConfigError::MissingRequired(
                    "ENDOR_TOKEN is required when --no-dry-run is set".to_string(),
                )
            })?;
            DeliveryMode::Submit {
                token: SecretString::from(token.to_string()),
            }
        };

        let source = match args.source_kind() {
            SourceKind::Local => {
                let path = args.local.as_ref().ok_or_else(|| {
                    ConfigError::MissingRequired("REPOSITORY_PATH".to_string())
                })?;
                let root = path.canonicalize().map_err(|e| {
                    ConfigError::Invalid(format!(
                        "repository path '{}' is invalid: {}",
                        path.display(),
                        e
                    ))
                })?;
                SourceConfig::Local {
                    root,
                    walker: FileWalkerConfig::new().with_gitignore(args.respect_gitignore),
                }
            }
            SourceKind::GitHub => SourceConfig::GitHub(GitHubSourceConfig {
                owner: args.organization.clone(),
                repo: args.repository.clone(),
                reference: non_empty(args.git_ref.as_deref()).map(str::to_string),
                base_url: args.github_base_url.clone(),
                token: non_empty(args.github_token.as_deref())
                    .map(|token| SecretString::from(token.to_string())),
            }),
        };

        Ok(Self {
            source,
            target: PayloadTarget::new(
                args.repository.as_str(),
                args.project_uuid.as_str(),
                args.namespace.as_str(),
            ),
            api_url,
            delivery,
            concurrency: args.concurrency,
            json_output: args.json,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Creates an Octocrab client for the GitHub source.
///
/// Without a token the client is anonymous, which only works for public
/// repositories.
pub fn create_octocrab(config: &GitHubSourceConfig) -> Result<Octocrab, ConfigError> {
    let mut builder = Octocrab::builder();
    if config.base_url != DEFAULT_GITHUB_BASE_URL {
        builder = builder
            .base_uri(config.base_url.as_str())
            .map_err(|e| ConfigError::GitHubAuth(format!("invalid base URL: {}", e)))?;
    }
    if let Some(ref token) = config.token {
        builder = builder.personal_token(token.expose_secret().to_string());
    }
    builder
        .build()
        .map_err(|e| ConfigError::GitHubAuth(format!("failed to build client: {}", e)))
}
