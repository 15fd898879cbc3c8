//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::KpiStatus;

/// Render the header bar with a system health overview.
///
/// Displays: status indicator, KPI counts by status, alert counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(
                " WARDWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let (good, warning) = data.status_counts();
    let (_, warning_alerts, critical_alerts) = data.alert_counts();

    // Overall status indicator: critical alerts trump KPI warnings
    let (status_icon, status_style) = if critical_alerts > 0 {
        ("●", Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD))
    } else if warning > 0 || warning_alerts > 0 {
        ("●", app.theme.status_style(KpiStatus::Warning))
    } else {
        ("●", app.theme.status_style(KpiStatus::Good))
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("WARDWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", good), Style::default().fg(app.theme.good)),
        Span::raw(" ok "),
        if warning > 0 {
            Span::styled(
                format!("{}", warning),
                Style::default().fg(app.theme.warning),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" warn │ "),
        Span::styled(
            format!("{}", data.kpis.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" KPIs │ "),
        Span::styled(
            format!("{}", data.alerts.len()),
            if critical_alerts > 0 {
                Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD)
            } else if warning_alerts > 0 {
                Style::default().fg(app.theme.warning)
            } else {
                Style::default()
            },
        ),
        Span::raw(" alerts"),
    ];

    if app.using_fallback {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "SAMPLE DATA",
            Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:KPIs "),
        Line::from(" 2:Alerts "),
        Line::from(" 3:Network "),
    ];

    let selected = match app.current_view {
        View::Kpis => 0,
        View::Alerts => 1,
        View::Network => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let elapsed = data.last_updated.elapsed();

        // Context-sensitive controls
        let controls = match app.current_view {
            View::Kpis => {
                if app.filter_active {
                    "Type to search | Enter:apply Esc:cancel"
                } else {
                    "/:search s:sort Tab:switch Enter:select ?:help q:quit"
                }
            }
            View::Alerts => {
                if app.filter_active {
                    "Type to search | Enter:apply Esc:cancel"
                } else {
                    "/:search s:sort Tab:switch Enter:detail ?:help q:quit"
                }
            }
            View::Network => "↑↓:select KPI Esc:deselect Enter:detail ?:help q:quit",
        };

        let source = if app.using_fallback {
            format!("{} (sample data)", app.source_description())
        } else {
            app.source_description().to_string()
        };

        format!(
            " {} | {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            source,
            elapsed.as_secs_f64(),
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Select / view detail"),
        Line::from("  Esc         Back / deselect"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " KPIs & Alerts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
