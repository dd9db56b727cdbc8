//! Parser module for OWNERS files.
//!
//! This module turns the text of an OWNERS file into an AST of classified
//! lines and exposes the recognized declarations as ordered
//! `(label, value)` pairs.
//!
//! # Example
//!
//! ```rust
//! use owners_inventory_core::parse::parse_owners;
//!
//! let input = r#"
//! # platform team
//! jira-project "PLAT"
//! jira-component 'api-gateway'
//! "#;
//!
//! let result = parse_owners(input);
//! assert_eq!(
//!     result.pairs(),
//!     vec![("jira-project", "PLAT"), ("jira-component", "api-gateway")]
//! );
//! ```

mod ast;
mod error;
mod lexer;
mod parser;
pub mod span;

// Re-export public types
pub use ast::{Declaration, DeclarationKind, Line, LineKind, OwnersFile};
pub use error::{ParseIssue, ParseResult};
pub use parser::parse_owners;
pub use span::Span;

// Re-export lexer utilities that may be useful for custom parsing
pub use lexer::{DeclarationValue, find_declaration};
