use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow scrolling through rows while the overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::PageUp => app.select_prev_n(10),
            KeyCode::PageDown => app.select_next_n(10),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            _ => {}
        }
        return;
    }

    // If filter input is active, handle text input
    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Kpis),
        KeyCode::Char('2') => app.set_view(View::Alerts),
        KeyCode::Char('3') => app.set_view(View::Network),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Select the row under the cursor and open its detail
        KeyCode::Enter => app.enter_detail(),

        // Go back (Esc and Backspace) - also the explicit deselect signal
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Reload
        KeyCode::Char('r') => match app.reload_data() {
            Ok(true) => app.set_status_message("Reloaded".to_string()),
            Ok(false) => {
                if let Some(err) = app.load_error.clone() {
                    app.set_status_message(format!("Reload failed: {}", err));
                }
            }
            Err(e) => app.set_status_message(format!("Reload failed: {}", e)),
        },

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Sorting (KPIs and Alerts views)
        KeyCode::Char('s') => {
            if app.current_view == View::Kpis || app.current_view == View::Alerts {
                app.cycle_sort();
            }
        }
        KeyCode::Char('S') => {
            if app.current_view == View::Kpis || app.current_view == View::Alerts {
                app.toggle_sort_direction();
            }
        }

        // Filter (start typing to filter)
        KeyCode::Char('/') => app.start_filter(),

        // Clear filter
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        // Export
        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from("wardwatch_export.json");
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm filter
        KeyCode::Enter => {
            app.filter_active = false;
        }

        // Cancel filter (keep text but exit input mode)
        KeyCode::Esc => {
            app.cancel_filter();
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        // Backspace
        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        // Type characters
        KeyCode::Char(c) => {
            app.filter_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => {
            app.select_prev();
        }
        MouseEventKind::ScrollDown => {
            app.select_next();
        }

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Tab clicks (row 1, after header)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: KPIs (0-8), Alerts (9-19), Network (20-31)
                if col < 9 {
                    app.set_view(View::Kpis);
                } else if col < 20 {
                    app.set_view(View::Alerts);
                } else if col < 32 {
                    app.set_view(View::Network);
                }
                return;
            }

            // Content rows (after header, tabs, table header)
            if clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;

                match app.current_view {
                    View::Kpis => {
                        if let Some(ref data) = app.data {
                            let count =
                                data.kpis.iter().filter(|k| app.matches_filter(k)).count();
                            if item_row < count {
                                app.selected_kpi_index = item_row;
                                return;
                            }
                        }
                    }
                    View::Alerts => {
                        if item_row < app.visible_alert_count() {
                            app.selected_alert_index = item_row;
                            return;
                        }
                    }
                    View::Network => {
                        if let Some(ref data) = app.data {
                            if item_row < data.kpis.len() {
                                app.selected_kpi_index = item_row;
                                app.selection = Some(crate::app::KpiRef {
                                    hospital: data.kpis[item_row].hospital.clone(),
                                    department: data.kpis[item_row].department.clone(),
                                    kpi: data.kpis[item_row].name.clone(),
                                });
                                return;
                            }
                        }
                    }
                }
            }

            // A click outside the interactive rows is the deselect signal
            app.deselect();
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => {
            app.go_back();
        }

        _ => {}
    }
}
