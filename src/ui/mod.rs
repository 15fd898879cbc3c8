//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`kpis`]: Main overview table showing all KPIs with status
//! - [`alerts`]: Alert list with derived insights underneath
//! - [`network`]: One-hop influence view around the selected KPI
//! - [`detail`]: Modal overlays for KPI and alert details
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` calls into these modules based on the current view:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (kpis/alerts/network::render)        │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod alerts;
pub mod common;
pub mod detail;
pub mod kpis;
pub mod network;
pub mod theme;

pub use alerts::AlertSortColumn;
pub use kpis::SortColumn;
pub use theme::Theme;
