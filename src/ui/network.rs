//! Influence network view rendering.
//!
//! Shows the one-hop neighborhood of the selected KPI as a star: the
//! center with its current value, outgoing influence edges, and incoming
//! ones. Layout stays textual; the neighborhood itself comes verbatim
//! from the data layer.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{KpiStatus, Neighborhood};

/// Render the network view for the current selection.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let Some(ref selection) = app.selection else {
        render_hint(frame, app, area);
        return;
    };

    let hood = data.neighborhood(&selection.kpi);

    // Node panel grows with the neighborhood but never starves the edge list
    let node_panel_height = (hood.nodes.len() as u16 + 4).min(area.height / 2).max(3);
    let chunks = Layout::vertical([
        Constraint::Length(node_panel_height),
        Constraint::Min(6), // Edge details fill the remaining space
    ])
    .split(area);

    render_nodes(frame, app, &hood, chunks[0]);
    render_edges(frame, app, &hood, chunks[1]);
}

fn render_hint(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Influence Network ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  No KPI selected.",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("  Pick a KPI in the KPIs view (Enter), or press ↑/↓ here"),
        Line::from("  to walk the list. Esc clears the selection."),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_nodes(frame: &mut Frame, app: &App, hood: &Neighborhood, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();

    for (i, node) in hood.nodes.iter().enumerate() {
        let status = data
            .kpis
            .iter()
            .find(|k| k.name == node.name)
            .map(|k| k.status);

        let marker = if i == 0 { "●" } else { "○" };
        let marker_style = if i == 0 {
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            match status {
                Some(KpiStatus::Warning) => Style::default().fg(app.theme.warning),
                Some(KpiStatus::Good) => Style::default().fg(app.theme.good),
                None => Style::default().add_modifier(Modifier::DIM),
            }
        };

        let name_style = if i == 0 {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), marker_style),
            Span::styled(format!("{:<30}", node.name), name_style),
            Span::styled(
                format!("{:.1}", node.value),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            match status {
                Some(s) => Span::styled(format!("  {}", s.symbol()), app.theme.status_style(s)),
                None => Span::styled("  (not in catalog)", Style::default().add_modifier(Modifier::DIM)),
            },
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Legend: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("●", Style::default().fg(app.theme.highlight)),
        Span::raw(" selected  "),
        Span::styled("→", Style::default().fg(app.theme.good)),
        Span::raw(" impacts  "),
        Span::styled("←", Style::default().fg(app.theme.warning)),
        Span::raw(" affected by"),
    ]));

    let block = Block::default()
        .title(format!(
            " Influence Network ({} nodes, {} edges) ",
            hood.nodes.len(),
            hood.edges.len()
        ))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_edges(frame: &mut Frame, app: &App, hood: &Neighborhood, area: Rect) {
    let center = hood.nodes.first().map(|n| n.name.as_str()).unwrap_or("");
    let mut lines: Vec<Line> = Vec::new();

    if hood.edges.is_empty() {
        lines.push(Line::from(vec![Span::styled(
            "   (no recorded influences)",
            Style::default().add_modifier(Modifier::DIM),
        )]));
    }

    for edge in &hood.edges {
        let outgoing = edge.source == center;
        let (arrow, arrow_style, other) = if outgoing {
            ("→", Style::default().fg(app.theme.good), edge.target.as_str())
        } else {
            ("←", Style::default().fg(app.theme.warning), edge.source.as_str())
        };

        let mut spans = vec![
            Span::styled(format!(" {} ", arrow), arrow_style),
            Span::raw(format!("{:<30}", other)),
            Span::styled(
                format!("weight {:.0}%", edge.weight * 100.0),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];

        // Pull the edge description from the center's relationship entry,
        // where both directions of the neighborhood originate
        if let Some(ref data) = app.data {
            let description = data.relationships.get(center).and_then(|entry| {
                let list = if outgoing {
                    entry.impacts.as_slice()
                } else {
                    entry.affected_by.as_deref().unwrap_or_default()
                };
                list.iter().find(|e| e.kpi == other).map(|e| e.description.clone())
            });
            if let Some(description) = description.filter(|d| !d.is_empty()) {
                spans.push(Span::styled(
                    format!("  {}", description),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
        }

        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        " ↑/↓ change KPI    Enter detail    Esc deselect    Tab switch view",
        Style::default().add_modifier(Modifier::DIM),
    )]));

    let block = Block::default()
        .title(" Influences ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
