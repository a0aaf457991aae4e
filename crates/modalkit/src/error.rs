#![forbid(unsafe_code)]

//! Error type for dialog operations.
//!
//! The manager is a UI orchestration layer, not a fallible system: the only
//! errors are a dead manager behind a ticket or handle, and a failing
//! `on_close` interceptor (which has already been recovered from by the time
//! the error surfaces).

use thiserror::Error;

use crate::intercept::InterceptError;

/// Errors surfaced by tickets and close attempts.
#[derive(Debug, Error)]
pub enum DialogError {
    /// The manager behind this ticket or handle is gone; the dialog can
    /// never resolve.
    #[error("dialog manager is no longer alive")]
    ManagerClosed,

    /// The `on_close` interceptor failed. The dialog has returned to the
    /// open state and played a rejection shake.
    #[error("close interceptor failed")]
    Interceptor(#[source] InterceptError),
}
