//! Data source abstraction for retrieving the dashboard resources.
//!
//! This module provides a trait-based abstraction for receiving the three
//! JSON resources (metric catalog, relationship graph, alert list) from
//! various backends: a directory of files, an HTTP endpoint, or an
//! in-memory channel.

mod bundle;
mod channel;
mod error;
mod fallback;
mod file;
#[cfg(feature = "http")]
mod http;

pub use bundle::{
    Alert, AlertLevel, DataBundle, InfluenceEdge, KpiCatalog, MetricKind, MetricRecord,
    RelationEntry, RelationshipGraph, ALERTS_RESOURCE, CATALOG_RESOURCE, RELATIONSHIPS_RESOURCE,
};
pub use channel::ChannelSource;
pub use error::LoadError;
pub use fallback::sample_bundle;
pub use file::FileSource;
#[cfg(feature = "http")]
pub use http::HttpSource;

use std::fmt::Debug;

/// Trait for receiving dashboard data from various sources.
///
/// Implementations deliver complete [`DataBundle`]s only: a source that
/// cannot produce all three resources reports an error instead of a
/// partial bundle.
///
/// # Example
///
/// ```no_run
/// use wardwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("./data");
/// if let Some(bundle) = source.poll() {
///     println!("Got {} hospitals", bundle.catalog.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest bundle.
    ///
    /// Returns `Some(bundle)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<DataBundle>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last poll.
    fn error(&self) -> Option<String>;
}
