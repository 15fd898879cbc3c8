//! Detail overlay rendering.
//!
//! Displays a modal overlay with detailed information about the selected
//! KPI (value, target, trend, influence edges) or, in the Alerts view,
//! about the selected alert (message, root cause, recommendation).

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, View};
use crate::data::{trend, KpiEntry};
use crate::source::{Alert, InfluenceEdge};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the detail overlay for the current view.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    match app.current_view {
        View::Alerts => {
            if let Some(alert) = app.selected_alert() {
                render_alert_overlay(frame, app, alert, area);
            }
        }
        View::Kpis | View::Network => {
            let entry = app
                .selection
                .as_ref()
                .and_then(|sel| {
                    app.data.as_ref().and_then(|data| {
                        data.kpis.iter().find(|k| {
                            k.name == sel.kpi
                                && k.hospital == sel.hospital
                                && k.department == sel.department
                        })
                    })
                });
            if let Some(entry) = entry {
                render_kpi_overlay(frame, app, entry, area);
            }
        }
    }
}

fn overlay_area(area: Rect) -> Rect {
    // Width: 95% of screen, clamped to [MIN_OVERLAY_WIDTH, 100]
    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    // Height: 90% of screen, clamped to [MIN_OVERLAY_HEIGHT, 50]
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 50);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    Rect::new(x, y, overlay_width, overlay_height)
}

/// KPI detail: header with reading and target, trend panel, influence tables.
fn render_kpi_overlay(frame: &mut Frame, app: &App, entry: &KpiEntry, area: Rect) {
    let overlay = overlay_area(area);
    frame.render_widget(Clear, overlay);

    let chunks = Layout::vertical([
        Constraint::Length(6), // Header with KPI info
        Constraint::Length(4), // Trend
        Constraint::Min(8),    // Influence tables
        Constraint::Length(1), // Footer
    ])
    .split(overlay);

    // ===== HEADER SECTION =====
    let status_style = app.theme.status_style(entry.status);

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", entry.name),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![Span::styled(
            format!(" {} / {}", entry.hospital, entry.department),
            Style::default().add_modifier(Modifier::DIM),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Value: "),
            Span::styled(
                format!("{} {}", entry.value, entry.unit),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Target: "),
            Span::styled(
                entry.target.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Status: "),
            Span::styled(
                format!("{} {}", entry.status.symbol(), entry.status.label()),
                status_style.add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let header_block = Block::default()
        .title(" KPI Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== TREND SECTION =====
    let trend_lines = if entry.trend.len() >= 2 {
        let sparkline: String = trend::sparkline_levels(&entry.trend)
            .iter()
            .map(|&l| SPARKLINE_CHARS[(l as usize).min(7)])
            .collect();
        let delta = trend::latest_delta(&entry.trend).unwrap_or(0.0);
        let direction = if delta > 0.0 { "▲" } else if delta < 0.0 { "▼" } else { "–" };
        vec![Line::from(vec![
            Span::raw(" "),
            Span::styled(sparkline, Style::default().fg(app.theme.highlight)),
            Span::raw(format!(
                "   {} {:+.2} since previous reading ({} points)",
                direction,
                delta,
                entry.trend.len()
            )),
        ])]
    } else {
        vec![Line::from(Span::styled(
            " No trend history",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    };

    let trend_block = Block::default()
        .title(" Trend ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(trend_lines).block(trend_block), chunks[1]);

    // ===== INFLUENCE TABLES =====
    let content_chunks = Layout::vertical([
        Constraint::Percentage(50), // Impacts
        Constraint::Percentage(50), // Affected by
    ])
    .split(chunks[2]);

    let entry_rel = app
        .data
        .as_ref()
        .and_then(|data| data.relationships.get(&entry.name));

    let impacts: &[InfluenceEdge] = entry_rel.map(|e| e.impacts.as_slice()).unwrap_or_default();
    let affected_by: &[InfluenceEdge] = entry_rel
        .and_then(|e| e.affected_by.as_deref())
        .unwrap_or_default();

    render_edge_table(frame, app, "Impacts", impacts, content_chunks[0]);
    render_edge_table(frame, app, "Affected by", affected_by, content_chunks[1]);

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[3]);
}

fn render_edge_table(
    frame: &mut Frame,
    app: &App,
    title: &str,
    edges: &[InfluenceEdge],
    area: Rect,
) {
    if edges.is_empty() {
        let empty_block = Block::default()
            .title(format!(" {} (0) ", title))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No recorded influences",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(empty_block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("KPI"),
        Cell::from("Direction"),
        Cell::from("Weight"),
        Cell::from("Description"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = edges
        .iter()
        .map(|e| {
            let (direction, style) = if e.strength > 0.0 {
                ("↑ raises", Style::default().fg(app.theme.good))
            } else {
                ("↓ lowers", Style::default().fg(app.theme.warning))
            };
            Row::new(vec![
                Cell::from(e.kpi.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(direction).style(style),
                Cell::from(format!("{:.0}%", e.strength.abs() * 100.0)),
                Cell::from(e.description.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),    // KPI
        Constraint::Length(10), // Direction
        Constraint::Length(8),  // Weight
        Constraint::Fill(3),    // Description
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" {} ({}) ", title, edges.len()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

/// Alert detail: message with root cause and recommendation.
fn render_alert_overlay(frame: &mut Frame, app: &App, alert: &Alert, area: Rect) {
    let overlay = overlay_area(area);
    frame.render_widget(Clear, overlay);

    let chunks = Layout::vertical([
        Constraint::Min(10),   // Content
        Constraint::Length(1), // Footer
    ])
    .split(overlay);

    let level_style = app.theme.alert_style(alert.level);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", alert.level.symbol()),
                level_style.add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} ", alert.kpi),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![Span::styled(
            format!(" {} – {}", alert.hospital, alert.department),
            Style::default().add_modifier(Modifier::DIM),
        )]),
        Line::from(""),
        Line::from(format!(" {}", alert.message)),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Root cause: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(alert.root_cause.as_deref().unwrap_or("N/A").to_string()),
        ]),
        Line::from(vec![
            Span::styled(
                " Recommendation: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(alert.recommendation.as_deref().unwrap_or("N/A").to_string()),
        ]),
    ];

    let block = Block::default()
        .title(" Alert Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(level_style);

    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[1]);
}
