//! Error reporting helpers shared by every module
//!
//! Each module error implements [`ContextualError`] so the CLI can decide
//! whether the user gets the specific message (bad flag, malformed reference)
//! or a generic context line with the full chain at debug level (API and IO
//! failures).

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True when the message tells the user what to change
    /// (invalid flag values, malformed image references, missing location)
    fn is_user_actionable(&self) -> bool;

    /// The message to show when the error is user actionable
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error with the appropriate level of detail
///
/// User-actionable errors print their own message; system errors print the
/// operation context followed by the error, with the full source chain at
/// debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::error!("FATAL: {}", user_msg);
        }
        _ => {
            log::error!("FATAL: {}: {}", operation_context, error);
        }
    }

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        log::debug!("CAUSED BY: {}", cause);
        source = cause.source();
    }
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
