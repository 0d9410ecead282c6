use chrono::NaiveDate;
use log::error;
use ratatui::widgets::ListState;
use std::time::Instant;

use crate::models::{Task, TaskDraft};
use crate::tui::widgets::editor::Editor;
use crate::utils::{format_datetime, parse_datetime, today};
use crate::view::CalendarView;
use crate::{Config, Database};

const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Form,
    ConfirmDelete,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginState {
    pub current_field: LoginField,
    pub username: Editor,
    pub password: Editor,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            current_field: LoginField::Username,
            username: Editor::new(),
            password: Editor::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Start,
    End,
}

impl TaskField {
    fn next(self, forward: bool) -> Self {
        match (self, forward) {
            (TaskField::Title, true) | (TaskField::End, false) => TaskField::Start,
            (TaskField::Start, true) | (TaskField::Title, false) => TaskField::End,
            (TaskField::End, true) | (TaskField::Start, false) => TaskField::Title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub current_field: TaskField,
    pub title: Editor,
    pub start: Editor,
    pub end: Editor,
    pub editing_task_id: Option<i64>, // None for new tasks
}

impl TaskForm {
    fn from_draft(draft: &TaskDraft, editing_task_id: Option<i64>) -> Self {
        Self {
            current_field: TaskField::Title,
            title: Editor::from_string(&draft.title),
            start: Editor::from_string(format_datetime(&draft.start_date)),
            end: Editor::from_string(format_datetime(&draft.end_date)),
            editing_task_id,
        }
    }

    pub fn current_editor(&mut self) -> &mut Editor {
        match self.current_field {
            TaskField::Title => &mut self.title,
            TaskField::Start => &mut self.start,
            TaskField::End => &mut self.end,
        }
    }

    /// Parse and validate the fields into a draft
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        let start = parse_datetime(&self.start.to_string())?;
        let end = parse_datetime(&self.end.to_string())?;
        let draft = TaskDraft::new(self.title.to_string(), start, end);
        draft.validate()?;
        Ok(draft)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub delete_target: Option<Task>,
    pub delete_modal_selection: usize, // 0 = Delete, 1 = Cancel
}

pub struct App {
    pub config: Config,
    pub database: Database,

    pub screen: Screen,
    pub mode: Mode,
    pub current_user: Option<String>,

    pub login: LoginState,
    pub calendar: CalendarView,
    pub task_index: usize,
    pub list_state: ListState,
    pub form: Option<TaskForm>,
    pub modals: ModalState,
    pub status: StatusState,
}

impl App {
    pub fn new(config: Config, database: Database) -> Self {
        Self::with_date(config, database, today())
    }

    /// App with the calendar initially on `selected`
    pub fn with_date(config: Config, database: Database, selected: NaiveDate) -> Self {
        Self {
            config,
            database,
            screen: Screen::Login,
            mode: Mode::View,
            current_user: None,
            login: LoginState::default(),
            calendar: CalendarView::new(selected),
            task_index: 0,
            list_state: ListState::default(),
            form: None,
            modals: ModalState::default(),
            status: StatusState::default(),
        }
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status.message = Some(message.into());
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Clear the status message once it has been shown long enough
    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    // Login screen

    pub fn switch_login_field(&mut self) {
        self.login.current_field = match self.login.current_field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn current_login_editor(&mut self) -> &mut Editor {
        match self.login.current_field {
            LoginField::Username => &mut self.login.username,
            LoginField::Password => &mut self.login.password,
        }
    }

    fn login_inputs(&mut self) -> Option<(String, String)> {
        let username = self.login.username.to_string();
        let password = self.login.password.to_string();
        if username.trim().is_empty() || password.trim().is_empty() {
            self.set_status_message("Enter a username and password");
            return None;
        }
        Some((username, password))
    }

    pub fn submit_login(&mut self) {
        let Some((username, password)) = self.login_inputs() else {
            return;
        };
        if !self.database.authenticate(&username, &password) {
            self.set_status_message("Invalid username or password");
            return;
        }

        self.current_user = Some(username);
        self.login = LoginState::default();
        self.screen = Screen::Calendar;
        self.mode = Mode::View;
        self.task_index = 0;
        self.reload_calendar();
    }

    pub fn submit_register(&mut self) {
        let Some((username, password)) = self.login_inputs() else {
            return;
        };
        match self.database.register_user(&username, &password) {
            Ok(_) => self.set_status_message("Registered. Press Enter to log in"),
            Err(e) => self.set_status_message(e.user_message()),
        }
    }

    pub fn logout(&mut self) {
        self.current_user = None;
        self.form = None;
        self.modals = ModalState::default();
        self.mode = Mode::View;
        self.screen = Screen::Login;
        self.set_status_message("Logged out");
    }

    // Calendar screen

    fn reload_calendar(&mut self) {
        if let Err(e) = self.calendar.reload(&self.database) {
            error!("event=calendar_reload module=tui status=error error={}", e);
            self.set_status_message("Failed to load tasks");
        }
        self.adjust_task_index();
    }

    /// Keep the day-list selection in range after a reload
    pub fn adjust_task_index(&mut self) {
        let len = self.calendar.day_tasks.len();
        if len == 0 {
            self.task_index = 0;
            self.list_state.select(None);
        } else {
            self.task_index = self.task_index.min(len - 1);
            self.list_state.select(Some(self.task_index));
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.calendar.day_tasks.get(self.task_index)
    }

    pub fn move_task_selection(&mut self, down: bool) {
        let len = self.calendar.day_tasks.len();
        if len == 0 {
            return;
        }
        self.task_index = if down {
            (self.task_index + 1) % len
        } else {
            (self.task_index + len - 1) % len
        };
        self.list_state.select(Some(self.task_index));
    }

    fn after_navigation(&mut self, result: Result<(), crate::DatabaseError>) {
        if let Err(e) = result {
            error!("event=calendar_navigate module=tui status=error error={}", e);
            self.set_status_message("Failed to load tasks");
        }
        self.task_index = 0;
        self.adjust_task_index();
    }

    pub fn move_day(&mut self, days: i64) {
        let result = self.calendar.move_selection(&self.database, days);
        self.after_navigation(result);
    }

    pub fn shift_month(&mut self, delta: i32) {
        let result = self.calendar.shift_month(&self.database, delta);
        self.after_navigation(result);
    }

    pub fn go_to_today(&mut self) {
        let result = self.calendar.go_to(&self.database, today());
        self.after_navigation(result);
    }

    pub fn enter_create_mode(&mut self) {
        let draft = TaskDraft::for_day(self.calendar.selected);
        self.form = Some(TaskForm::from_draft(&draft, None));
        self.mode = Mode::Form;
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(task) = self.selected_task() else {
            self.set_status_message("No task selected");
            return;
        };
        let id = task.id;
        let draft = TaskDraft::new(task.title.clone(), task.start_date, task.end_date);
        self.form = Some(TaskForm::from_draft(&draft, Some(id)));
        self.mode = Mode::Form;
    }

    pub fn exit_form(&mut self) {
        self.form = None;
        self.mode = Mode::View;
    }

    pub fn navigate_form_field(&mut self, forward: bool) {
        if let Some(ref mut form) = self.form {
            form.current_field = form.current_field.next(forward);
        }
    }

    pub fn save_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(err) => {
                self.set_status_message(format!("Validation error: {}", err));
                return;
            }
        };
        let editing = form.editing_task_id;

        let result = match editing {
            Some(id) => self
                .calendar
                .update_task(&self.database, id, &draft.title, draft.start_date, draft.end_date)
                .map(|rows| (id, rows)),
            None => self
                .calendar
                .create_task(&self.database, &draft.title, draft.start_date, draft.end_date)
                .map(|id| (id, 1)),
        };

        match result {
            Ok((_, 0)) => self.set_status_message("Task not found"),
            Ok((id, _)) => {
                self.exit_form();
                if let Some(pos) = self.calendar.day_tasks.iter().position(|t| t.id == id) {
                    self.task_index = pos;
                }
                self.adjust_task_index();
                self.set_status_message(if editing.is_some() { "Task updated" } else { "Task created" });
            }
            Err(e) => {
                error!("event=task_save module=tui status=error error={}", e);
                self.set_status_message("Failed to save task");
            }
        }
    }

    pub fn toggle_selected_completed(&mut self) {
        let Some((id, completed)) = self.selected_task().map(|t| (t.id, t.completed)) else {
            return;
        };
        match self.calendar.set_completed(&self.database, id, !completed) {
            Ok(0) => self.set_status_message("Task not found"),
            Ok(_) => {
                self.adjust_task_index();
                self.set_status_message(if completed { "Task marked as not done" } else { "Task marked as done" });
            }
            Err(e) => {
                error!("event=task_toggle module=tui status=error error={}", e);
                self.set_status_message("Failed to update task");
            }
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(task) = self.selected_task().cloned() {
            self.modals.delete_target = Some(task);
            self.modals.delete_modal_selection = 0;
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.modals = ModalState::default();
        self.mode = Mode::View;
    }

    pub fn confirm_delete(&mut self) {
        let Some(task) = self.modals.delete_target.take() else {
            self.cancel_delete();
            return;
        };
        self.cancel_delete();
        match self.calendar.delete_task(&self.database, task.id) {
            Ok(0) => self.set_status_message("Task not found"),
            Ok(_) => {
                self.adjust_task_index();
                self.set_status_message("Task deleted");
            }
            Err(e) => {
                error!("event=task_delete module=tui status=error error={}", e);
                self.set_status_message("Failed to delete task");
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.mode = if self.mode == Mode::Help { Mode::View } else { Mode::Help };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_on(date: NaiveDate) -> App {
        let db = Database::open_in_memory().unwrap();
        App::with_date(Config::default(), db, date)
    }

    fn type_text(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.insert_char(ch);
        }
    }

    fn logged_in(date: NaiveDate) -> App {
        let mut app = app_on(date);
        app.database.register_user("aiko", "pw").unwrap();
        type_text(&mut app.login.username, "aiko");
        type_text(&mut app.login.password, "pw");
        app.submit_login();
        app
    }

    #[test]
    fn wrong_password_stays_on_login() {
        let mut app = app_on(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
        app.database.register_user("aiko", "pw").unwrap();
        type_text(&mut app.login.username, "aiko");
        type_text(&mut app.login.password, "PW");
        app.submit_login();
        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.status.message.as_deref(), Some("Invalid username or password"));
    }

    #[test]
    fn register_twice_reports_duplicate() {
        let mut app = app_on(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
        type_text(&mut app.login.username, "ken");
        type_text(&mut app.login.password, "pw");
        app.submit_register();
        app.submit_register();
        assert_eq!(
            app.status.message.as_deref(),
            Some("Registration failed: username already exists")
        );
    }

    #[test]
    fn create_form_saves_and_refreshes_day_list() {
        let mut app = logged_in(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
        assert_eq!(app.screen, Screen::Calendar);

        app.enter_create_mode();
        type_text(&mut app.form.as_mut().unwrap().title, "Report");
        app.save_form();

        assert_eq!(app.mode, Mode::View);
        assert_eq!(app.calendar.day_tasks.len(), 1);
        assert_eq!(app.selected_task().unwrap().title, "Report");
        assert_eq!(app.calendar.markings[&app.calendar.selected].periods.len(), 1);
    }

    #[test]
    fn blank_title_keeps_form_open() {
        let mut app = logged_in(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
        app.enter_create_mode();
        app.save_form();
        assert_eq!(app.mode, Mode::Form);
        assert!(app.calendar.day_tasks.is_empty());
    }

    #[test]
    fn toggle_and_delete_selected_task() {
        let mut app = logged_in(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
        app.enter_create_mode();
        type_text(&mut app.form.as_mut().unwrap().title, "Shift");
        app.save_form();

        app.toggle_selected_completed();
        assert!(app.selected_task().unwrap().completed);

        app.request_delete();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        app.confirm_delete();
        assert_eq!(app.mode, Mode::View);
        assert!(app.calendar.day_tasks.is_empty());
        assert!(app.selected_task().is_none());
    }

    #[test]
    fn month_navigation_clamps_day() {
        let mut app = logged_in(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        app.shift_month(1);
        assert_eq!(app.calendar.selected, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!((app.calendar.year, app.calendar.month), (2025, 2));
    }
}
