//! Command catalog: the data model, the inherited-defaults merger, the
//! per-module aggregation, the tree walk that drives them, and rendering.

pub mod aggregate;
pub mod builder;
pub mod defaults;
pub mod render;
pub mod types;

pub use aggregate::{aggregate, sort_endpoints, FileEndpoints};
pub use builder::Collector;
pub use defaults::{BaseDefaults, DefaultCommand};
pub use render::{command_records, render, write_catalog, CatalogFormat, CommandRecord};
pub use types::{Catalog, Controller, ControllerLink, Endpoint, EndpointType, HttpMethod};
