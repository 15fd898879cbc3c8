//! Alerts view rendering.
//!
//! Displays the active alert list (in load order unless sorted) with a
//! panel of derived insights underneath, linking warning KPIs to their
//! strongest influences.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{insight, DashboardData};
use crate::source::Alert;

/// Column to sort alerts by.
///
/// `Loaded` keeps the list in load order, which is the producer's display
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertSortColumn {
    #[default]
    Loaded,
    Level,
    Hospital,
    Kpi,
}

impl AlertSortColumn {
    pub fn next(self) -> Self {
        match self {
            Self::Loaded => Self::Level,
            Self::Level => Self::Hospital,
            Self::Hospital => Self::Kpi,
            Self::Kpi => Self::Loaded,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Level => "level",
            Self::Hospital => "hospital",
            Self::Kpi => "kpi",
        }
    }
}

/// The alert rows the view currently shows: filtered, sorted, paired with
/// their raw index into `data.alerts`.
///
/// Shared with `App::selected_alert` so the visual row index maps back to
/// the same alert the table shows.
pub fn visible_alerts<'a>(
    data: &'a DashboardData,
    filter_text: &str,
    column: AlertSortColumn,
    ascending: bool,
) -> Vec<(usize, &'a Alert)> {
    let search = filter_text.to_lowercase();
    let mut rows: Vec<(usize, &Alert)> = data
        .alerts
        .iter()
        .enumerate()
        .filter(|(_, a)| {
            if search.is_empty() {
                return true;
            }
            a.kpi.to_lowercase().contains(&search)
                || a.hospital.to_lowercase().contains(&search)
                || a.department.to_lowercase().contains(&search)
                || a.message.to_lowercase().contains(&search)
        })
        .collect();

    match column {
        AlertSortColumn::Loaded => {
            if !ascending {
                rows.reverse();
            }
        }
        AlertSortColumn::Level => {
            // Critical first when descending
            rows.sort_by(|a, b| {
                let ord = a.1.level.cmp(&b.1.level);
                if ascending { ord } else { ord.reverse() }
            });
        }
        AlertSortColumn::Hospital => {
            rows.sort_by(|a, b| {
                let ord = a
                    .1
                    .hospital
                    .to_lowercase()
                    .cmp(&b.1.hospital.to_lowercase())
                    .then_with(|| a.1.department.to_lowercase().cmp(&b.1.department.to_lowercase()));
                if ascending { ord } else { ord.reverse() }
            });
        }
        AlertSortColumn::Kpi => {
            rows.sort_by(|a, b| {
                let ord = a.1.kpi.to_lowercase().cmp(&b.1.kpi.to_lowercase());
                if ascending { ord } else { ord.reverse() }
            });
        }
    }

    rows
}

/// Render the Alerts view: alert table on top, insights panel below.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Min(6),    // Alert table
        Constraint::Length(8), // Insights panel
    ])
    .split(area);

    render_alert_table(frame, app, data, chunks[0]);
    render_insights(frame, app, data, chunks[1]);
}

fn render_alert_table(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    let rows_src = visible_alerts(
        data,
        &app.filter_text,
        app.alert_sort_column,
        app.alert_sort_ascending,
    );

    if rows_src.is_empty() && data.alerts.is_empty() {
        render_no_alerts(frame, app, area);
        return;
    }

    let (_, warning_count, critical_count) = data.alert_counts();

    let header = Row::new(vec![
        Cell::from("Level"),
        Cell::from("Hospital"),
        Cell::from("Department"),
        Cell::from("KPI"),
        Cell::from("Message"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = rows_src
        .iter()
        .map(|(_, a)| {
            let level_style = app.theme.alert_style(a.level);
            Row::new(vec![
                Cell::from(a.level.symbol()).style(level_style),
                Cell::from(a.hospital.clone()),
                Cell::from(a.department.clone()),
                Cell::from(a.kpi.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(a.message.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6), // Level
        Constraint::Fill(2),   // Hospital
        Constraint::Fill(2),   // Department
        Constraint::Fill(2),   // KPI
        Constraint::Fill(4),   // Message - usually the longest
    ];

    let sort_dir = if app.alert_sort_ascending { "↑" } else { "↓" };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !rows_src.is_empty() {
        format!(
            " [{}/{}]",
            app.selected_alert_index.min(rows_src.len() - 1) + 1,
            rows_src.len()
        )
    } else {
        String::new()
    };

    let title = format!(
        " Alerts ({} crit, {} warn) [s:sort {}{}]{}{} ",
        critical_count,
        warning_count,
        app.alert_sort_column.label(),
        sort_dir,
        filter_info,
        position_info
    );

    let border_color = if critical_count > 0 {
        app.theme.critical
    } else if warning_count > 0 {
        app.theme.warning
    } else {
        app.theme.border
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(border_color)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(
        app.selected_alert_index.min(rows_src.len().saturating_sub(1)),
    ));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_no_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Alerts ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.good));

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled("    ✓ ", Style::default().fg(app.theme.good)),
            Span::styled(
                "No active alerts",
                Style::default().fg(app.theme.good).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "      Every monitored KPI is within its target.",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_insights(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    let insights = insight::derive(data);

    let mut lines: Vec<Line> = Vec::new();
    if insights.is_empty() {
        lines.push(Line::from(Span::styled(
            " No KPIs outside their target.",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    for item in &insights {
        let mut spans = vec![
            Span::styled(" ▲ ", Style::default().fg(app.theme.warning)),
            Span::styled(
                item.kpi.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · {} / {}", item.hospital, item.department),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ];

        if let Some(strongest) = item.influences.first() {
            let direction = if strongest.strength > 0.0 { "↑" } else { "↓" };
            spans.push(Span::raw(format!(
                ": influenced by {} ({} {:.0}%)",
                strongest.kpi,
                direction,
                strongest.strength.abs() * 100.0
            )));
            if !strongest.description.is_empty() {
                spans.push(Span::styled(
                    format!(" {}", strongest.description),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
        } else {
            spans.push(Span::styled(
                ": no known influences",
                Style::default().add_modifier(Modifier::DIM),
            ));
        }

        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .title(format!(" Insights ({}) ", insights.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DashboardData;
    use crate::source::{sample_bundle, AlertLevel};

    fn two_alert_data() -> DashboardData {
        let mut bundle = sample_bundle();
        let mut second = bundle.alerts[0].clone();
        second.kpi = "Average Wait Time".to_string();
        second.level = AlertLevel::Critical;
        bundle.alerts.push(second);
        DashboardData::from_bundle(bundle)
    }

    #[test]
    fn test_visible_alerts_default_keeps_load_order() {
        let data = two_alert_data();
        let rows = visible_alerts(&data, "", AlertSortColumn::Loaded, true);
        assert_eq!(rows[0].0, 0);
        assert_eq!(rows[1].0, 1);
    }

    #[test]
    fn test_visible_alerts_sort_by_level_descending() {
        let data = two_alert_data();
        let rows = visible_alerts(&data, "", AlertSortColumn::Level, false);
        assert_eq!(rows[0].1.level, AlertLevel::Critical);
    }

    #[test]
    fn test_visible_alerts_filter_matches_message() {
        let data = two_alert_data();
        let rows = visible_alerts(&data, "satisfaction below", AlertSortColumn::Loaded, true);
        assert_eq!(rows.len(), 2); // both alerts carry the same message text
        let rows = visible_alerts(&data, "no such text", AlertSortColumn::Loaded, true);
        assert!(rows.is_empty());
    }
}
