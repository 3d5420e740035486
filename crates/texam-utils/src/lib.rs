//! Foundation utilities shared by the texam crates.

pub mod error;
pub mod lockfile;

pub use error::{LockError, UtilError};

pub type Result<T> = std::result::Result<T, UtilError>;
