#![forbid(unsafe_code)]

//! Headless declarative modal-dialog manager.
//!
//! A [`DialogManager`] tracks a dynamic set of open dialogs. Each
//! show-family call ([`DialogManager::show`], [`DialogManager::confirm`],
//! [`DialogManager::info`], ...) creates one [`DialogHandle`] and returns a
//! [`DialogTicket`] future that settles with the [`Flag`] describing the
//! action the user took. The presentation layer subscribes to
//! [`DialogSignal`] change notifications, renders
//! [`DialogHandle::snapshot`]s, forwards user input through
//! [`DialogHandle::trigger`], and reports exit transitions via
//! [`DialogHandle::finish_exit`].
//!
//! Execution is single-threaded and event-driven: the manager never spawns
//! tasks, and all types use `Rc`-based shared ownership.
//!
//! # Example
//!
//! ```ignore
//! use modalkit::{DialogManager, DialogRequest, Flag};
//!
//! let manager = DialogManager::new();
//! let ticket = manager.confirm(
//!     DialogRequest::new()
//!         .title("Delete file?")
//!         .content("This action cannot be undone."),
//! );
//!
//! // ... view layer drives manager.dialogs() ...
//!
//! let flag = ticket.await?;
//! if flag.contains(Flag::OK) {
//!     // confirmed
//! }
//! ```

pub mod error;
pub mod instance;
pub mod intercept;
pub mod manager;
pub mod observe;
pub mod request;
pub mod ticket;

pub use error::DialogError;
pub use instance::{CloseOutcome, DialogHandle, DialogPhase, DialogSnapshot};
pub use intercept::{InterceptError, InterceptFuture, OnClose, StateRef};
pub use manager::{DialogManager, ManagerHandle};
pub use observe::{DialogId, DialogSignal, Subscription};
pub use request::DialogRequest;
pub use ticket::DialogTicket;

pub use modalkit_core::{
    ButtonOverrides, ButtonProps, ButtonSpec, CANONICAL_BUTTON_ORDER, DialogIcon, Direction, Flag,
    FlagSet, derive_buttons, shake,
};
