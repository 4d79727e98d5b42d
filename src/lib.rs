//! # opncat
//!
//! Command catalog for the OPNsense REST API.
//!
//! opncat scans the PHP API controllers of an OPNsense source tree and
//! derives the commands they expose: module, controller, command name,
//! HTTP verb and positional parameters. Commands that controllers inherit
//! from well-known base classes are filled in from a defaults table.
//!
//! The resulting catalog drives a small dispatcher (`opncat raw`) that
//! calls those commands against a live firewall.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use opncat::{CatalogFormat, Collector, Repository};
//! use std::path::Path;
//!
//! let collector = Collector::default();
//! let catalog = collector.collect(Path::new("/tmp/core"), Repository::Core).unwrap();
//! let yaml = opncat::catalog::render(&catalog, CatalogFormat::Commands).unwrap();
//! println!("{yaml}");
//! ```

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod parser;
pub mod source;

// Re-exports for convenience
pub use catalog::{Catalog, CatalogFormat, Collector, Endpoint, EndpointType, HttpMethod};
pub use client::{ApiClient, CommandSet, Credentials};
pub use config::CollectConfig;
pub use error::{CatalogError, Result};
pub use parser::PatternLibrary;
pub use source::Repository;
