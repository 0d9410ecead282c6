use thiserror::Error;
use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("IO/Terminal error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Key binding error: {0}")]
    KeyBindingError(String),

    #[error("Terminal too small: {width}x{height}, need at least {min_width}x{min_height}")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}
