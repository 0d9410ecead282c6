pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod logging;
pub mod marking;
pub mod models;
pub mod remote;
pub mod tui;
pub mod utils;
pub mod view;

pub use auth::RegisterError;
pub use config::Config;
pub use database::{Database, DatabaseError};
pub use marking::{build_markings, DayMarking, Period, PeriodColor};
pub use models::{Task, TaskDraft, User};
pub use utils::Profile;
pub use view::CalendarView;
