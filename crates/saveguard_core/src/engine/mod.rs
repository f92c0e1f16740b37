mod error;
mod handler;

pub use error::{PersistError, PersistErrorCode};
pub use handler::{BACKUP_SUFFIX, FileDataHandler};
