//! Application state and navigation logic.

use anyhow::Result;
use tracing::{debug, warn};

use crate::data::{DashboardData, KpiEntry};
use crate::source::{sample_bundle, Alert, DataSource};
use crate::ui::alerts::AlertSortColumn;
use crate::ui::kpis::SortColumn;
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// KPI and alert details are shown as overlays (controlled by
/// `App::show_detail_overlay`) rather than as separate views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Overview of all KPIs with status.
    Kpis,
    /// Active alerts with derived insights.
    Alerts,
    /// One-hop influence network around the selected KPI.
    Network,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Kpis => View::Alerts,
            View::Alerts => View::Network,
            View::Network => View::Kpis,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Kpis => View::Network,
            View::Alerts => View::Kpis,
            View::Network => View::Alerts,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Kpis => "KPIs",
            View::Alerts => "Alerts",
            View::Network => "Network",
        }
    }
}

/// Identity of the selected KPI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiRef {
    pub hospital: String,
    pub department: String,
    pub kpi: String,
}

impl KpiRef {
    fn of(entry: &KpiEntry) -> Self {
        Self {
            hospital: entry.hospital.clone(),
            department: entry.department.clone(),
            kpi: entry.name.clone(),
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub data: Option<DashboardData>,
    pub load_error: Option<String>,
    /// True when the built-in sample data replaced a failed load.
    pub using_fallback: bool,

    /// At most one selected KPI. Selecting another replaces it; an
    /// explicit deselect (Esc, click outside rows) clears it.
    pub selection: Option<KpiRef>,

    // Navigation state
    pub selected_kpi_index: usize,
    pub selected_alert_index: usize,

    // Sorting (KPIs view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Sorting (Alerts view)
    pub alert_sort_column: AlertSortColumn,
    pub alert_sort_ascending: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App with the given data source.
    pub fn new(source: Box<dyn DataSource>) -> Self {
        Self {
            running: true,
            current_view: View::Kpis,
            show_help: false,
            show_detail_overlay: false,
            source,
            data: None,
            load_error: None,
            using_fallback: false,
            selection: None,
            selected_kpi_index: 0,
            selected_alert_index: 0,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            alert_sort_column: AlertSortColumn::default(),
            alert_sort_ascending: true,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Initial load, honoring the all-or-nothing fallback contract.
    ///
    /// If the source cannot produce a complete bundle, the entire built-in
    /// sample data set takes its place; the caller always ends up with a
    /// fully populated store.
    pub fn load_or_fallback(&mut self) {
        let _ = self.reload_data();
        if self.data.is_none() {
            warn!(error = ?self.load_error, "data load failed, using built-in sample data");
            self.data = Some(DashboardData::from_bundle(sample_bundle()));
            self.using_fallback = true;
            self.set_status_message("Load failed; showing built-in sample data".to_string());
        }
    }

    /// Poll the data source for new data.
    ///
    /// Returns Ok(true) if the store was replaced, Ok(false) if no new
    /// data was available. A failed poll keeps the previous store intact.
    pub fn reload_data(&mut self) -> Result<bool> {
        if let Some(bundle) = self.source.poll() {
            let data = DashboardData::from_bundle(bundle);
            debug!(
                kpis = data.kpis.len(),
                alerts = data.alerts.len(),
                "dashboard store replaced"
            );

            // Clamp selection indices
            if self.selected_kpi_index >= data.kpis.len() {
                self.selected_kpi_index = data.kpis.len().saturating_sub(1);
            }
            if self.selected_alert_index >= data.alerts.len() {
                self.selected_alert_index = data.alerts.len().saturating_sub(1);
            }

            self.data = Some(data);
            self.load_error = None;
            self.using_fallback = false;
            Ok(true)
        } else {
            if let Some(err) = self.source.error() {
                self.load_error = Some(err);
            }
            Ok(false)
        }
    }

    /// Switch to the next view (cycles through KPIs → Alerts → Network).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Kpis => {
                if let Some(ref data) = self.data {
                    let count = data.kpis.iter().filter(|k| self.matches_filter(k)).count();
                    let max = count.saturating_sub(1);
                    self.selected_kpi_index = (self.selected_kpi_index + n).min(max);
                }
            }
            View::Alerts => {
                let count = self.visible_alert_count();
                let max = count.saturating_sub(1);
                self.selected_alert_index = (self.selected_alert_index + n).min(max);
            }
            View::Network => {
                // Navigate the raw KPI list, replacing the selection
                if let Some(ref data) = self.data {
                    if data.kpis.is_empty() {
                        return;
                    }
                    let max = data.kpis.len() - 1;
                    self.selected_kpi_index = (self.selected_kpi_index + n).min(max);
                    self.selection = Some(KpiRef::of(&data.kpis[self.selected_kpi_index]));
                }
            }
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Kpis => {
                self.selected_kpi_index = self.selected_kpi_index.saturating_sub(n);
            }
            View::Alerts => {
                self.selected_alert_index = self.selected_alert_index.saturating_sub(n);
            }
            View::Network => {
                if let Some(ref data) = self.data {
                    if data.kpis.is_empty() {
                        return;
                    }
                    self.selected_kpi_index =
                        self.selected_kpi_index.saturating_sub(n).min(data.kpis.len() - 1);
                    self.selection = Some(KpiRef::of(&data.kpis[self.selected_kpi_index]));
                }
            }
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        match self.current_view {
            View::Kpis | View::Network => self.selected_kpi_index = 0,
            View::Alerts => self.selected_alert_index = 0,
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        match self.current_view {
            View::Kpis => {
                if let Some(ref data) = self.data {
                    let count = data.kpis.iter().filter(|k| self.matches_filter(k)).count();
                    self.selected_kpi_index = count.saturating_sub(1);
                }
            }
            View::Alerts => {
                self.selected_alert_index = self.visible_alert_count().saturating_sub(1);
            }
            View::Network => {
                if let Some(ref data) = self.data {
                    self.selected_kpi_index = data.kpis.len().saturating_sub(1);
                }
            }
        }
    }

    /// The KPI entry behind the currently selected visual row, accounting
    /// for the KPIs view's sorting and filtering.
    pub fn selected_kpi(&self) -> Option<&KpiEntry> {
        let data = self.data.as_ref()?;

        match self.current_view {
            View::Kpis => {
                let mut rows: Vec<(usize, &KpiEntry)> = data
                    .kpis
                    .iter()
                    .enumerate()
                    .filter(|(_, k)| self.matches_filter(k))
                    .collect();
                crate::ui::kpis::sort_kpis_by(&mut rows, self.sort_column, self.sort_ascending);
                rows.get(self.selected_kpi_index).map(|(_, k)| *k)
            }
            // Network navigates the raw list directly
            View::Network => data.kpis.get(self.selected_kpi_index),
            View::Alerts => None,
        }
    }

    /// The alert behind the currently selected visual row.
    pub fn selected_alert(&self) -> Option<&Alert> {
        let data = self.data.as_ref()?;
        let visible = crate::ui::alerts::visible_alerts(
            data,
            &self.filter_text,
            self.alert_sort_column,
            self.alert_sort_ascending,
        );
        visible.get(self.selected_alert_index).map(|(_, a)| *a)
    }

    /// Select a KPI, replacing any previous selection.
    pub fn select_kpi(&mut self, kpi: KpiRef) {
        self.selection = Some(kpi);
    }

    /// Explicitly clear the selection.
    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Open the detail overlay for the current row.
    ///
    /// In the KPIs and Network views this also selects the KPI under the
    /// cursor; in the Alerts view it opens the alert detail.
    pub fn enter_detail(&mut self) {
        match self.current_view {
            View::Kpis | View::Network => {
                let picked = self.selected_kpi().map(KpiRef::of);
                if let Some(kpi) = picked {
                    self.selection = Some(kpi);
                    self.show_detail_overlay = true;
                }
            }
            View::Alerts => {
                if self.selected_alert().is_some() {
                    self.show_detail_overlay = true;
                }
            }
        }
    }

    /// Navigate back: close the overlay first, then deselect, then return
    /// to the KPIs view.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.selection.is_some() {
            self.deselect();
            return;
        }
        if self.current_view != View::Kpis {
            self.current_view = View::Kpis;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column for the current view.
    pub fn cycle_sort(&mut self) {
        match self.current_view {
            View::Kpis => self.sort_column = self.sort_column.next(),
            View::Alerts => self.alert_sort_column = self.alert_sort_column.next(),
            _ => {}
        }
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        match self.current_view {
            View::Kpis => self.sort_ascending = !self.sort_ascending,
            View::Alerts => self.alert_sort_ascending = !self.alert_sort_ascending,
            _ => {}
        }
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a KPI row matches the current filter.
    ///
    /// Matches against the KPI name, department and hospital.
    pub fn matches_filter(&self, entry: &KpiEntry) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let search = self.filter_text.to_lowercase();
        entry.name.to_lowercase().contains(&search)
            || entry.department.to_lowercase().contains(&search)
            || entry.hospital.to_lowercase().contains(&search)
    }

    /// Count of alerts after applying the filter.
    pub fn visible_alert_count(&self) -> usize {
        let Some(ref data) = self.data else {
            return 0;
        };
        crate::ui::alerts::visible_alerts(
            data,
            &self.filter_text,
            self.alert_sort_column,
            self.alert_sort_ascending,
        )
        .len()
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        use std::io::Write;

        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };

        let (good, warning) = data.status_counts();
        let (info_alerts, warning_alerts, critical_alerts) = data.alert_counts();

        let mut export = serde_json::Map::new();

        // Summary
        let mut summary = serde_json::Map::new();
        summary.insert("total_kpis".to_string(), serde_json::json!(data.kpis.len()));
        summary.insert("good".to_string(), serde_json::json!(good));
        summary.insert("warning".to_string(), serde_json::json!(warning));
        summary.insert("alerts_info".to_string(), serde_json::json!(info_alerts));
        summary.insert("alerts_warning".to_string(), serde_json::json!(warning_alerts));
        summary.insert("alerts_critical".to_string(), serde_json::json!(critical_alerts));
        summary.insert("fallback_data".to_string(), serde_json::json!(self.using_fallback));
        export.insert("summary".to_string(), serde_json::Value::Object(summary));

        // KPI rows
        let kpis: Vec<serde_json::Value> = data
            .kpis
            .iter()
            .map(|k| {
                serde_json::json!({
                    "hospital": k.hospital,
                    "department": k.department,
                    "kpi": k.name,
                    "value": k.value,
                    "unit": k.unit,
                    "target": k.target,
                    "status": k.status.label(),
                })
            })
            .collect();
        export.insert("kpis".to_string(), serde_json::Value::Array(kpis));

        // Alerts, in load order
        let alerts: Vec<serde_json::Value> = data
            .alerts
            .iter()
            .map(|a| {
                serde_json::json!({
                    "hospital": a.hospital,
                    "department": a.department,
                    "kpi": a.kpi,
                    "level": a.level.symbol(),
                    "message": a.message,
                })
            })
            .collect();
        export.insert("alerts".to_string(), serde_json::Value::Array(alerts));

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{sample_bundle, ChannelSource, DataBundle};

    fn empty_source() -> (tokio::sync::watch::Sender<DataBundle>, Box<dyn DataSource>) {
        let (tx, source) = ChannelSource::create("test");
        (tx, Box::new(source))
    }

    #[test]
    fn test_load_failure_substitutes_complete_fallback() {
        // A channel source whose first bundle is empty is still a bundle,
        // so use a file source pointed at a directory with no resources.
        let dir = tempfile::TempDir::new().unwrap();
        let source = Box::new(crate::source::FileSource::new(dir.path()));
        let mut app = App::new(source);

        app.load_or_fallback();

        assert!(app.using_fallback);
        let data = app.data.as_ref().unwrap();
        let expected = DashboardData::from_bundle(sample_bundle());
        assert_eq!(data.kpis.len(), expected.kpis.len());
        assert_eq!(data.alerts, expected.alerts);
        assert_eq!(data.relationships, expected.relationships);
        assert_eq!(data.catalog, expected.catalog);
    }

    #[test]
    fn test_reload_replaces_store_and_clears_fallback_flag() {
        let (tx, source) = empty_source();
        let mut app = App::new(source);

        // First poll delivers the channel's initial (empty) bundle
        app.load_or_fallback();
        assert!(!app.using_fallback);
        assert_eq!(app.data.as_ref().unwrap().kpis.len(), 0);

        tx.send(sample_bundle()).unwrap();
        let replaced = app.reload_data().unwrap();
        assert!(replaced);
        assert_eq!(app.data.as_ref().unwrap().kpis.len(), 2);
    }

    #[test]
    fn test_selection_state_machine() {
        let (_tx, source) = empty_source();
        let mut app = App::new(source);

        let wait = KpiRef {
            hospital: "General Medical Center".to_string(),
            department: "Emergency Department".to_string(),
            kpi: "Average Wait Time".to_string(),
        };
        let satisfaction = KpiRef {
            kpi: "Patient Satisfaction".to_string(),
            ..wait.clone()
        };

        // Unselected → Selected(m)
        assert!(app.selection.is_none());
        app.select_kpi(wait.clone());
        assert_eq!(app.selection.as_ref(), Some(&wait));

        // Selected(m) → Selected(m') replaces, does not merge
        app.select_kpi(satisfaction.clone());
        assert_eq!(app.selection.as_ref(), Some(&satisfaction));

        // Selected(*) → Unselected on explicit deselect
        app.deselect();
        assert!(app.selection.is_none());
    }

    #[test]
    fn test_go_back_closes_overlay_before_deselecting() {
        let (_tx, source) = empty_source();
        let mut app = App::new(source);

        app.select_kpi(KpiRef {
            hospital: "H".to_string(),
            department: "D".to_string(),
            kpi: "K".to_string(),
        });
        app.show_detail_overlay = true;

        app.go_back();
        assert!(!app.show_detail_overlay);
        assert!(app.selection.is_some());

        app.go_back();
        assert!(app.selection.is_none());
    }

    #[test]
    fn test_enter_detail_selects_kpi_under_cursor() {
        let (tx, source) = empty_source();
        let mut app = App::new(source);
        app.load_or_fallback();
        tx.send(sample_bundle()).unwrap();
        app.reload_data().unwrap();

        // Warnings sort first, so row 0 is Patient Satisfaction
        app.selected_kpi_index = 0;
        app.enter_detail();

        assert!(app.show_detail_overlay);
        assert_eq!(app.selection.as_ref().unwrap().kpi, "Patient Satisfaction");
    }

    #[test]
    fn test_filter_matches_all_name_levels() {
        let (tx, source) = empty_source();
        let mut app = App::new(source);
        app.load_or_fallback();
        tx.send(sample_bundle()).unwrap();
        app.reload_data().unwrap();

        app.filter_text = "emergency".to_string();
        let data = app.data.clone().unwrap();
        assert_eq!(data.kpis.iter().filter(|k| app.matches_filter(k)).count(), 2);

        app.filter_text = "satisfaction".to_string();
        assert_eq!(data.kpis.iter().filter(|k| app.matches_filter(k)).count(), 1);

        app.filter_text = "cardiology".to_string();
        assert_eq!(data.kpis.iter().filter(|k| app.matches_filter(k)).count(), 0);
    }

    #[test]
    fn test_export_state_writes_summary() {
        let (tx, source) = empty_source();
        let mut app = App::new(source);
        app.load_or_fallback();
        tx.send(sample_bundle()).unwrap();
        app.reload_data().unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["total_kpis"], 2);
        assert_eq!(value["summary"]["good"], 1);
        assert_eq!(value["summary"]["warning"], 1);
        assert_eq!(value["kpis"].as_array().unwrap().len(), 2);
    }
}
