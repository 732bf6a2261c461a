//! Fieldsmith - dependency-ordered form field materialization
//!
//! This library reads a CSV template describing the fields of a form and
//! creates them in a remote application definition through the platform's
//! create/update API. Formulas and display conditions may reference other
//! rows of the template by positional placeholder; fieldsmith builds a
//! dependency graph from those references, creates fields in topological
//! order, and rewrites each placeholder to the remote identifier as soon
//! as it is known.
//!
//! # Example
//!
//! ```no_run
//! use fieldsmith::core::{DependencyGraph, Engine};
//! use fieldsmith::client::HttpBackend;
//! use fieldsmith::parser::load_table;
//! use fieldsmith::types::RunConfig;
//! use std::path::Path;
//!
//! let mut table = load_table(Path::new("template.csv"))?;
//!
//! let order = DependencyGraph::build(&table)?.schedule()?;
//! println!("{} fields, creation order {:?}", table.rows.len(), order);
//!
//! let config = RunConfig {
//!     app_id: "UNT439473".into(),
//!     workplace_id: "DE04924".into(),
//!     api_key: std::env::var("FIELDSMITH_API_KEY").unwrap_or_default(),
//!     requesting_user: "ops@example.com".into(),
//!     endpoint: fieldsmith::client::DEFAULT_ENDPOINT.into(),
//! };
//! let engine = Engine::new(HttpBackend::new(config)?);
//! let report = engine.run(&mut table)?;
//! println!("{} created, {} failed", report.created(), report.failed());
//! # Ok::<(), fieldsmith::error::FieldsmithError>(())
//! ```

pub mod cli;
pub mod client;
pub mod core;
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used types
pub use error::{FieldsmithError, FieldsmithResult};
pub use types::{FieldRow, FieldTable, FieldType, RunConfig};
