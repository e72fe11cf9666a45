use std::{fmt, io};

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    TerminalTooSmall { need: (u16, u16), have: (u16, u16) },
    InvalidSetting { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "terminal I/O failed: {}", err),
            Error::TerminalTooSmall { need, have } => write!(
                f,
                "terminal is {}x{}, the game needs at least {}x{}",
                have.0, have.1, need.0, need.1
            ),
            Error::InvalidSetting { key, value } => {
                write!(f, "invalid value '{}' for {}", value, key)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
