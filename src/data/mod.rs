//! Data models and processing for the dashboard.
//!
//! This module turns raw data bundles into structured, status-annotated
//! data suitable for display.
//!
//! ## Submodules
//!
//! - [`status`]: Target parsing and KPI status evaluation
//! - [`board`]: Core data models ([`DashboardData`], [`KpiEntry`]) and value lookup
//! - [`network`]: One-hop influence neighborhood construction
//! - [`insight`]: Derived cause/effect observations for warning KPIs
//! - [`trend`]: Sparkline normalization for trend series
//!
//! ## Data Flow
//!
//! ```text
//! DataBundle (raw JSON: catalog + relationships + alerts)
//!        │
//!        ▼
//! DashboardData::from_bundle()
//!        │
//!        ├──▶ KpiEntry (status computed via status::evaluate)
//!        │
//!        ├──▶ Neighborhood::around() (on KPI selection)
//!        │
//!        └──▶ insight::derive() (for the alerts view)
//! ```

pub mod board;
pub mod insight;
pub mod network;
pub mod status;
pub mod trend;

pub use board::{lookup_value, DashboardData, KpiEntry};
pub use insight::{Insight, InfluenceRef};
pub use network::{Neighborhood, NetworkEdge, NetworkNode};
pub use status::{evaluate, parse_threshold, KpiStatus};
