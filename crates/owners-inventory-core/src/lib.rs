//! OWNERS Inventory Core
//!
//! A library for extracting ownership metadata from `OWNERS` files and
//! aggregating it into a directory-keyed map.
//!
//! # Features
//!
//! - **Parser**: Read `jira-project` / `jira-component` declarations from
//!   OWNERS files, keeping their order
//! - **Aggregation**: Map each directory to its labels and owners
//! - **Sources**: Discover and fetch OWNERS files from a local working tree,
//!   or plug in any other source through [`source::OwnersSource`]
//! - **Payload**: Serialize the result for the inventory service
//!
//! # Quick Start
//!
//! ```rust
//! use owners_inventory_core::aggregate::aggregate;
//! use owners_inventory_core::report::{CodeOwnersPayload, PayloadTarget};
//!
//! let map = aggregate(["OWNERS", "svc/api/OWNERS"], |path| match path {
//!     "OWNERS" => Some("jira-project \"PROJ\"\n".to_string()),
//!     "svc/api/OWNERS" => Some("# owner: alice\njira-component 'comp-x'\n".to_string()),
//!     _ => None,
//! });
//!
//! let target = PayloadTarget::new("monorepo", "project-uuid", "acme");
//! let payload = CodeOwnersPayload::new(&target, &map);
//! println!("{}", payload.to_json_pretty().unwrap());
//! ```
//!
//! # Modules
//!
//! - [`parse`]: Parser for OWNERS files
//! - [`aggregate`]: Path normalization and aggregation
//! - [`source`]: Where OWNERS files come from
//! - [`report`]: Inventory service payload

pub mod aggregate;
#[cfg(feature = "generate")]
pub mod generate;
pub mod parse;
pub mod report;
pub mod source;

/// The file name that marks an ownership declaration file.
pub const OWNERS_FILENAME: &str = "OWNERS";

// Re-export commonly used types at the crate root
pub use aggregate::{
    AggregateResult, AggregateStats, OwnershipEntry, OwnershipMap, aggregate, aggregate_source,
    normalize_owners_path,
};
pub use parse::{DeclarationKind, OwnersFile, ParseResult, parse_owners};
pub use report::{CodeOwnersPayload, PayloadTarget};
pub use source::{LocalSource, OwnersSource, SourceError};
