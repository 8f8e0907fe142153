//! Source adapters.
//!
//! Every HTTP-backed source is a [`SourceDefinition`] executed by
//! [`TableSource`]; adding a source means adding a route table, not code.

pub mod builtin;
pub mod catalog;
pub mod definition;
pub mod table;

pub use catalog::{CatalogEntry, StaticCatalog};
pub use definition::{AuthConfig, AuthScheme, PayloadFormat, RouteTemplate, SourceDefinition};
pub use table::TableSource;
