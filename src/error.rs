use thiserror::Error;

/// Everything that can go wrong inside the engine.
///
/// The taxonomy is deliberately small: form-level validation, a failed
/// login, lookups that miss, and the role gate on report review. The AI
/// description generator is absent on purpose: it maps every failure to a
/// fallback string and never surfaces here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("no user is logged in")]
    NotLoggedIn,

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("report request not found: {0}")]
    RequestNotFound(String),

    #[error("submission not found: {0}")]
    SubmissionNotFound(String),

    #[error("notification not found: {0}")]
    NotificationNotFound(String),

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("user is not assigned to this report request")]
    NotAssigned,

    #[error("operation requires the admin or manager role")]
    Forbidden,

    #[error("cell ({0}, {1}) is out of bounds")]
    CellOutOfBounds(usize, usize),
}

pub type Result<T> = std::result::Result<T, Error>;
