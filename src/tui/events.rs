use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use crate::config::KeyBindings;
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::widgets::confirm_delete::DELETE_OPTIONS;
use crate::tui::widgets::editor::Editor;
use crate::tui::{App, Mode, Screen};
use crate::utils::{has_primary_modifier, parse_key_binding};

/// Restores the terminal even when the loop panics.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; drop becomes a no-op afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up, errors have nowhere to go
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Checked before the alternate screen so the error stays visible
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::TerminalTooSmall { width, height, min_width, min_height });
    }

    // Fail on bad bindings before touching the terminal
    validate_key_bindings(&app.config.key_bindings)?;

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    info!("event=tui_start module=tui status=success");

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(rect);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(16))? {
            // Press only, Windows also reports releases
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    info!("event=tui_exit module=tui status=success");
    Ok(())
}

fn validate_key_bindings(kb: &KeyBindings) -> Result<(), TuiError> {
    for binding in [
        &kb.quit,
        &kb.new,
        &kb.edit,
        &kb.delete,
        &kb.toggle_complete,
        &kb.prev_month,
        &kb.next_month,
        &kb.today,
        &kb.help,
        &kb.logout,
    ] {
        parse_key_binding(binding).map_err(TuiError::KeyBindingError)?;
    }
    Ok(())
}

fn matches(binding: &str, key_event: KeyEvent) -> Result<bool, TuiError> {
    let parsed = parse_key_binding(binding).map_err(TuiError::KeyBindingError)?;
    Ok(parsed.matches(key_event.code, key_event.modifiers))
}

/// Returns true when the app should quit
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match app.screen {
        Screen::Login => handle_login_screen(app, key_event),
        Screen::Calendar => match app.mode {
            Mode::Form => handle_form_mode(app, key_event),
            Mode::ConfirmDelete => handle_delete_confirmation_modal(app, key_event),
            Mode::Help => handle_help_mode(app, key_event),
            Mode::View => handle_calendar_view(app, key_event),
        },
    }
}

fn handle_login_screen(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc => return Ok(true),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.switch_login_field(),
        KeyCode::Enter => app.submit_login(),
        KeyCode::Char('r') | KeyCode::Char('R') if has_primary_modifier(key_event.modifiers) => {
            app.submit_register();
        }
        _ => edit_text(app.current_login_editor(), key_event),
    }
    Ok(false)
}

fn handle_calendar_view(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if matches(&kb.quit, key_event)? {
        return Ok(true);
    }
    if matches(&kb.logout, key_event)? {
        app.logout();
    } else if matches(&kb.help, key_event)? {
        app.toggle_help();
    } else if matches(&kb.new, key_event)? {
        app.enter_create_mode();
    } else if matches(&kb.edit, key_event)? {
        app.enter_edit_mode();
    } else if matches(&kb.delete, key_event)? {
        app.request_delete();
    } else if matches(&kb.toggle_complete, key_event)? {
        app.toggle_selected_completed();
    } else if matches(&kb.prev_month, key_event)? {
        app.shift_month(-1);
    } else if matches(&kb.next_month, key_event)? {
        app.shift_month(1);
    } else if matches(&kb.today, key_event)? {
        app.go_to_today();
    } else {
        let week = key_event.modifiers.contains(KeyModifiers::SHIFT);
        match key_event.code {
            KeyCode::Left | KeyCode::Char('h') => app.move_day(-1),
            KeyCode::Right | KeyCode::Char('l') => app.move_day(1),
            KeyCode::Up if week => app.move_day(-7),
            KeyCode::Down if week => app.move_day(7),
            KeyCode::Char('K') => app.move_day(-7),
            KeyCode::Char('J') => app.move_day(7),
            KeyCode::Up | KeyCode::Char('k') => app.move_task_selection(false),
            KeyCode::Down | KeyCode::Char('j') => app.move_task_selection(true),
            KeyCode::PageUp => app.shift_month(-1),
            KeyCode::PageDown => app.shift_month(1),
            KeyCode::Enter => app.enter_edit_mode(),
            _ => {}
        }
    }
    Ok(false)
}

fn handle_form_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc => app.exit_form(),
        KeyCode::Enter => app.save_form(),
        KeyCode::BackTab => app.navigate_form_field(false),
        KeyCode::Tab => {
            let forward = !key_event.modifiers.contains(KeyModifiers::SHIFT);
            app.navigate_form_field(forward);
        }
        KeyCode::Up => app.navigate_form_field(false),
        KeyCode::Down => app.navigate_form_field(true),
        KeyCode::Char('s') | KeyCode::Char('S') if has_primary_modifier(key_event.modifiers) => {
            app.save_form();
        }
        _ => {
            if let Some(ref mut form) = app.form {
                edit_text(form.current_editor(), key_event);
            }
        }
    }
    Ok(false)
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let count = DELETE_OPTIONS.len();
    match key_event.code {
        KeyCode::Up => {
            app.modals.delete_modal_selection = (app.modals.delete_modal_selection + count - 1) % count;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.modals.delete_modal_selection = (app.modals.delete_modal_selection + 1) % count;
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 0 {
                app.confirm_delete();
            } else {
                app.cancel_delete();
            }
        }
        KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || matches(&app.config.key_bindings.help, key_event)? {
        app.toggle_help();
    }
    Ok(false)
}

fn edit_text(editor: &mut Editor, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Char(c) => {
            // Ctrl chords never land in the text
            if !has_primary_modifier(key_event.modifiers) {
                editor.insert_char(c);
            }
        }
        KeyCode::Backspace => editor.delete_char(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Left => editor.move_cursor_left(),
        KeyCode::Right => editor.move_cursor_right(),
        KeyCode::Home => editor.move_cursor_home(),
        KeyCode::End => editor.move_cursor_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Database};
    use chrono::NaiveDate;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_keys(app: &mut App, text: &str) {
        for ch in text.chars() {
            handle_key_event(app, press(KeyCode::Char(ch))).unwrap();
        }
    }

    fn logged_in_app() -> App {
        let db = Database::open_in_memory().unwrap();
        db.register_user("mika", "secret").unwrap();
        let mut app = App::with_date(Config::default(), db, NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
        type_keys(&mut app, "mika");
        handle_key_event(&mut app, press(KeyCode::Tab)).unwrap();
        type_keys(&mut app, "secret");
        handle_key_event(&mut app, press(KeyCode::Enter)).unwrap();
        app
    }

    #[test]
    fn login_keys_reach_calendar() {
        let app = logged_in_app();
        assert_eq!(app.screen, Screen::Calendar);
        assert_eq!(app.current_user.as_deref(), Some("mika"));
    }

    #[test]
    fn escape_on_login_quits() {
        let db = Database::open_in_memory().unwrap();
        let mut app = App::new(Config::default(), db);
        assert!(handle_key_event(&mut app, press(KeyCode::Esc)).unwrap());
    }

    #[test]
    fn new_task_through_form_keys() {
        let mut app = logged_in_app();
        handle_key_event(&mut app, press(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.mode, Mode::Form);
        type_keys(&mut app, "Standup");
        handle_key_event(&mut app, press(KeyCode::Enter)).unwrap();

        assert_eq!(app.mode, Mode::View);
        assert_eq!(app.calendar.day_tasks.len(), 1);
        assert_eq!(app.calendar.day_tasks[0].title, "Standup");
    }

    #[test]
    fn typing_q_in_form_does_not_quit() {
        let mut app = logged_in_app();
        handle_key_event(&mut app, press(KeyCode::Char('n'))).unwrap();
        assert!(!handle_key_event(&mut app, press(KeyCode::Char('q'))).unwrap());
        assert_eq!(app.form.as_ref().unwrap().title.to_string(), "q");
    }

    #[test]
    fn arrows_move_selected_day() {
        let mut app = logged_in_app();
        handle_key_event(&mut app, press(KeyCode::Right)).unwrap();
        assert_eq!(app.calendar.selected, NaiveDate::from_ymd_opt(2025, 7, 16).unwrap());
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT)).unwrap();
        assert_eq!(app.calendar.selected, NaiveDate::from_ymd_opt(2025, 7, 23).unwrap());
        handle_key_event(&mut app, press(KeyCode::Char(']'))).unwrap();
        assert_eq!((app.calendar.year, app.calendar.month), (2025, 8));
    }

    #[test]
    fn delete_modal_cancel_keeps_task() {
        let mut app = logged_in_app();
        handle_key_event(&mut app, press(KeyCode::Char('n'))).unwrap();
        type_keys(&mut app, "Keep me");
        handle_key_event(&mut app, press(KeyCode::Enter)).unwrap();

        handle_key_event(&mut app, press(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        handle_key_event(&mut app, press(KeyCode::Down)).unwrap();
        handle_key_event(&mut app, press(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode, Mode::View);
        assert_eq!(app.calendar.day_tasks.len(), 1);
    }

    #[test]
    fn logout_binding_returns_to_login() {
        let mut app = logged_in_app();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(app.screen, Screen::Login);
        assert!(app.current_user.is_none());
    }
}
