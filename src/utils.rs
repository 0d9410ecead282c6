use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use crossterm::event::{KeyCode, KeyModifiers};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

use crate::models::DEFAULT_START_HOUR;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "warayaki-dev",
            Profile::Prod => "warayaki",
        }
    }
}

/// Configuration directory for the given profile
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "warayaki", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Data directory (database and logs) for the given profile
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "warayaki", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
}

/// Parse a date-time typed by the user.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]`, or a bare date,
/// which means 09:00 on that day.
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, String> {
    let input = input.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = parse_date(input) {
        let nine = NaiveTime::from_hms_opt(DEFAULT_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
        return Ok(date.and_time(nine));
    }
    Err(format!("'{}' is not a date-time (expected YYYY-MM-DD HH:MM)", input))
}

/// Parse `YYYY-MM` into (year, month)
pub fn parse_month(input: &str) -> Result<(i32, u32), String> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), DATE_FORMAT)
        .map_err(|_| format!("'{}' is not a month (expected YYYY-MM)", input.trim()))?;
    Ok((date.year(), date.month()))
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// First and last calendar day of a month; `None` for an invalid month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    month_bounds(year, month).map(|(_, last)| last.day()).unwrap_or(0)
}

/// Move (year, month) by `delta` months
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parsed key binding information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKeyBinding {
    pub key_code: KeyCode,
    pub requires_ctrl: bool,
}

impl ParsedKeyBinding {
    /// Whether a key press matches this binding
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.key_code == code && self.requires_ctrl == has_primary_modifier(modifiers)
    }
}

/// Ctrl on Windows/Linux; Ctrl or Option/Alt on macOS
pub fn has_primary_modifier(modifiers: KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(KeyModifiers::CONTROL) || modifiers.contains(KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(KeyModifiers::CONTROL)
    }
}

/// Show "Opt+" instead of "Ctrl+" on macOS
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config.
/// Supports single characters ("q"), named keys ("Enter", "Left", "F1") and "Ctrl+" prefixes.
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();
    let (requires_ctrl, key_part) = match key_str.strip_prefix("Ctrl+") {
        Some(rest) => (true, rest),
        None => (false, key_str),
    };
    Ok(ParsedKeyBinding {
        key_code: parse_key_code(key_part)?,
        requires_ctrl,
    })
}

fn parse_key_code(key_str: &str) -> Result<KeyCode, String> {
    let code = match key_str {
        "Enter" => KeyCode::Enter,
        "Esc" | "Escape" => KeyCode::Esc,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "Space" | " " => KeyCode::Char(' '),
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Delete" => KeyCode::Delete,
        _ => {
            if let Some(n) = key_str.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(KeyCode::F(n));
                }
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    };
    Ok(code)
}
