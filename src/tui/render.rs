use ratatui::Frame;
use ratatui::widgets::{Block, Borders};
use ratatui::style::Style;
use crate::tui::{App, Layout, Mode, Screen};
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    day_list::render_day_list,
    form::render_task_form,
    help::render_help,
    login::render_login,
    month_view::render_month_view,
    status_bar::render_status_bar,
};
use crate::utils::{format_key_binding_for_display as key, today};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let fg_color = parse_color(&app.config.colors.fg);
    let bg_color = parse_color(&app.config.colors.bg);
    let title = match app.current_user {
        Some(ref user) => format!("Warayaki - {}", user),
        None => "Warayaki".to_string(),
    };
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    match app.screen {
        Screen::Login => {
            let content = ratatui::layout::Rect {
                height: layout.inner_area.height.saturating_sub(1),
                ..layout.inner_area
            };
            render_login(f, content, &app.login, &app.config);
        }
        Screen::Calendar => {
            render_month_view(
                f,
                layout.calendar_area,
                app.calendar.year,
                app.calendar.month,
                &app.calendar.markings,
                today(),
                &app.config,
            );
            render_day_list(
                f,
                layout.day_area,
                app.calendar.selected,
                &app.calendar.day_tasks,
                &mut app.list_state,
                &app.config,
            );

            // Overlays after normal content
            match app.mode {
                Mode::Form => {
                    if let Some(ref form) = app.form {
                        render_task_form(f, f.area(), form, &app.config);
                    }
                }
                Mode::ConfirmDelete => {
                    if let Some(ref task) = app.modals.delete_target {
                        render_confirm_delete(f, f.area(), task, app.modals.delete_modal_selection, &app.config);
                    }
                }
                Mode::Help => render_help(f, f.area(), &app.config),
                Mode::View => {}
            }
        }
    }

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &key_hints, &app.config);
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    if app.screen == Screen::Login {
        return vec![
            "Tab: Switch field".to_string(),
            "Enter: Log in".to_string(),
            "Ctrl+r: Register".to_string(),
            "Esc: Quit".to_string(),
        ];
    }

    match app.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", key(&kb.help))],
        Mode::Form => vec![
            "Tab: Next field".to_string(),
            "Enter: Save".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::ConfirmDelete => vec![
            "↑↓: Choose".to_string(),
            "Enter: Confirm".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::View => vec![
            format!("{}: New", key(&kb.new)),
            format!("{}: Edit", key(&kb.edit)),
            format!("{}: Done", key(&kb.toggle_complete)),
            format!("{}: Delete", key(&kb.delete)),
            format!("{}/{}: Month", key(&kb.prev_month), key(&kb.next_month)),
            format!("{}: Today", key(&kb.today)),
            format!("{}: Help", key(&kb.help)),
            format!("{}: Quit", key(&kb.quit)),
        ],
    }
}
