//! KPI matrix view rendering.
//!
//! Displays a table of every KPI in the catalog with its current value,
//! target, trend sparkline, and status.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{trend, KpiEntry};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Column to sort by in the KPIs view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by KPI name alphabetically.
    #[default]
    Name,
    /// Sort by hospital, then department.
    Hospital,
    /// Sort by current value.
    Value,
    /// Sort by status.
    Status,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Name => SortColumn::Hospital,
            SortColumn::Hospital => SortColumn::Value,
            SortColumn::Value => SortColumn::Status,
            SortColumn::Status => SortColumn::Name,
        }
    }
}

/// Render the KPIs view showing all metrics in a sortable table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    // Get filtered and sorted KPI rows
    let mut rows_src: Vec<(usize, &KpiEntry)> =
        data.kpis.iter().enumerate().filter(|(_, k)| app.matches_filter(k)).collect();
    sort_kpis_by(&mut rows_src, app.sort_column, app.sort_ascending);

    let header = Row::new(vec![
        Cell::from(format_header("Hospital", SortColumn::Hospital, app)),
        Cell::from(format_header("Department", SortColumn::Hospital, app)),
        Cell::from(format_header("KPI", SortColumn::Name, app)),
        Cell::from(format_header("Value", SortColumn::Value, app)),
        Cell::from("Target"),
        Cell::from("Trend"),
        Cell::from(format_header("Status", SortColumn::Status, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = rows_src
        .iter()
        .map(|(_, k)| {
            let status_style = app.theme.status_style(k.status);
            let selected_marker = app
                .selection
                .as_ref()
                .map(|s| s.kpi == k.name && s.hospital == k.hospital && s.department == k.department)
                .unwrap_or(false);

            let name_cell = if selected_marker {
                Cell::from(format!("◆ {}", k.name)).style(
                    Style::default()
                        .fg(app.theme.highlight)
                        .add_modifier(ratatui::style::Modifier::BOLD),
                )
            } else {
                Cell::from(k.name.clone())
            };

            Row::new(vec![
                Cell::from(k.hospital.clone()),
                Cell::from(k.department.clone()),
                name_cell,
                Cell::from(format!("{} {}", format_value(k.value), k.unit)),
                Cell::from(k.target.clone()),
                Cell::from(render_sparkline(&trend::sparkline_levels(&k.trend))),
                Cell::from(k.status.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),    // Hospital
        Constraint::Fill(2),    // Department
        Constraint::Fill(3),    // KPI - gets the largest share
        Constraint::Fill(2),    // Value
        Constraint::Length(8),  // Target
        Constraint::Min(8),     // Trend - fixed for sparkline chars
        Constraint::Min(6),     // Status
    ];

    let selected_visual_index = app.selected_kpi_index.min(rows_src.len().saturating_sub(1));

    let sort_indicator = match app.sort_column {
        SortColumn::Name => "name",
        SortColumn::Hospital => "hospital",
        SortColumn::Value => "value",
        SortColumn::Status => "status",
    };
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !rows_src.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, rows_src.len())
    } else {
        String::new()
    };

    let title = format!(
        " KPIs ({}/{}) [s:sort {}{}]{}{} ",
        rows_src.len(),
        data.kpis.len(),
        sort_indicator,
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Render sparkline levels as bar characters.
fn render_sparkline(levels: &[u8]) -> String {
    levels.iter().map(|&l| SPARKLINE_CHARS[(l as usize).min(7)]).collect()
}

/// Format a reading for display, dropping a trailing ".0".
fn format_value(v: f64) -> String {
    if (v - v.round()).abs() < f64::EPSILON {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.1}", v)
    }
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort KPI rows in place by the given column and direction.
///
/// Shared with `App::selected_kpi` so the visual row index maps back to
/// the same entry the table shows.
pub fn sort_kpis_by(rows: &mut [(usize, &KpiEntry)], column: SortColumn, ascending: bool) {
    rows.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Name => a.1.name.to_lowercase().cmp(&b.1.name.to_lowercase()),
            SortColumn::Hospital => a
                .1
                .hospital
                .to_lowercase()
                .cmp(&b.1.hospital.to_lowercase())
                .then_with(|| a.1.department.to_lowercase().cmp(&b.1.department.to_lowercase())),
            SortColumn::Value => a
                .1
                .value
                .partial_cmp(&b.1.value)
                .unwrap_or(std::cmp::Ordering::Equal),
            SortColumn::Status => a.1.status.cmp(&b.1.status),
        };

        let primary = if ascending { primary } else { primary.reverse() };

        // Secondary sort by name for stability
        if primary == std::cmp::Ordering::Equal {
            a.1.name.to_lowercase().cmp(&b.1.name.to_lowercase())
        } else {
            primary
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DashboardData, KpiStatus};
    use crate::source::sample_bundle;

    #[test]
    fn test_sort_kpis_by_status_descending_puts_warnings_first() {
        let data = DashboardData::from_bundle(sample_bundle());
        let mut rows: Vec<(usize, &KpiEntry)> = data.kpis.iter().enumerate().collect();

        sort_kpis_by(&mut rows, SortColumn::Status, false);
        assert_eq!(rows[0].1.status, KpiStatus::Warning);

        sort_kpis_by(&mut rows, SortColumn::Status, true);
        assert_eq!(rows[0].1.status, KpiStatus::Good);
    }

    #[test]
    fn test_sort_kpis_by_value() {
        let data = DashboardData::from_bundle(sample_bundle());
        let mut rows: Vec<(usize, &KpiEntry)> = data.kpis.iter().enumerate().collect();

        sort_kpis_by(&mut rows, SortColumn::Value, true);
        assert_eq!(rows[0].1.name, "Patient Satisfaction"); // 3.9 < 27.2
    }

    #[test]
    fn test_render_sparkline_maps_levels() {
        assert_eq!(render_sparkline(&[0, 3, 7]), "▁▄█");
        assert_eq!(render_sparkline(&[]), "");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(27.2), "27.2");
        assert_eq!(format_value(30.0), "30");
    }
}
