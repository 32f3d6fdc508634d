use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of an index or query operation.
///
/// Success is the absence of an error; only the two failure kinds carry a
/// code and a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("[I/O Error]: {0}")]
    Io(String),
    #[error("[Syntax Error]: {0}")]
    Syntax(String),
}

impl Error {
    /// Numeric status code: 1 for I/O errors, 2 for syntax errors.
    pub fn code(&self) -> u16 {
        match self {
            Error::Io(_) => 1,
            Error::Syntax(_) => 2,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
