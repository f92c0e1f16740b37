use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistErrorCode {
    Io,
    Serialize,
    Deserialize,
    Verification,
    Rollback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistError {
    pub code: PersistErrorCode,
    pub message: String,
}

impl PersistError {
    pub fn new(code: PersistErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for PersistError {}
