// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # wardwatch
//!
//! A diagnostic TUI and library for monitoring hospital KPI health.
//!
//! This crate provides tools for visualizing the state of a hospital KPI
//! catalog: each metric is evaluated against its target, active alerts
//! are listed with derived insights, and the influence relationships
//! around a selected KPI are shown as a one-hop network.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(processing)   │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | HttpSource | ChannelSource    │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, KPI selection and
//!   user interaction logic
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with
//!   implementations for directory polling, HTTP fetching, and
//!   channel-based input, plus the built-in fallback data set
//! - **[`data`]**: Data models and processing - evaluates KPI status
//!   against targets, builds one-hop influence neighborhoods, and derives
//!   insights for KPIs outside their target
//! - **[`ui`]**: Terminal rendering using ratatui - KPI tables, alert
//!   lists, network views, and theme support
//!
//! ## Loading contract
//!
//! The three resources (metric catalog, relationship graph, alert list)
//! load together or not at all. If any of them cannot be retrieved or
//! parsed, the complete built-in sample data set takes their place and a
//! warning is logged; callers always end up with a fully populated store.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Monitor a directory of JSON resources
//! wardwatch --data-dir ./data
//!
//! # Fetch the resources from an HTTP endpoint
//! wardwatch --url http://dashboard.example.org/api
//! ```
//!
//! ### As a library with a file source
//!
//! ```
//! use wardwatch::{App, FileSource};
//!
//! let source = Box::new(FileSource::new("./data"));
//! let mut app = App::new(source);
//! app.load_or_fallback();
//! ```
//!
//! ### As a library with a channel source (push-based integration)
//!
//! ```
//! use wardwatch::{App, ChannelSource, DataBundle};
//!
//! // Create a channel for pushing bundles
//! let (tx, source) = ChannelSource::create("pipeline://analytics");
//!
//! let mut app = App::new(Box::new(source));
//! app.load_or_fallback();
//!
//! // Later, push a fresh bundle and reload
//! tx.send(DataBundle::default()).unwrap();
//! let _ = app.reload_data();
//! ```
//!
//! ### Evaluating KPIs without the TUI
//!
//! ```
//! use wardwatch::data::{evaluate, KpiStatus};
//! use wardwatch::source::MetricKind;
//!
//! assert_eq!(evaluate(27.2, "< 30", MetricKind::LowerBetter), KpiStatus::Good);
//! assert_eq!(evaluate(3.9, "> 4.0", MetricKind::HigherBetter), KpiStatus::Warning);
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, KpiRef, View};
pub use data::{DashboardData, KpiEntry, KpiStatus, Neighborhood};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{
    Alert, AlertLevel, ChannelSource, DataBundle, DataSource, FileSource, InfluenceEdge,
    KpiCatalog, MetricKind, MetricRecord, RelationshipGraph,
};
