#![forbid(unsafe_code)]

//! Change signals for the active dialog set.
//!
//! The manager mutates its collection of open dialogs; the presentation
//! layer subscribes here and re-renders on change. Subscribers are plain
//! callbacks held behind weak references and cleaned up lazily during
//! notification; dropping the returned [`Subscription`] unsubscribes.
//!
//! # Invariants
//!
//! - Subscribers are notified in registration order.
//! - A dropped `Subscription` receives no further signals.
//! - Notification never re-enters subscriber storage: the list is snapshot
//!   before callbacks run, so a callback may subscribe or unsubscribe
//!   freely.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use modalkit_core::Flag;

/// Identity of one dialog instance: a monotonic, per-manager creation-order
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(pub(crate) u64);

impl DialogId {
    /// The raw key value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// A change in the active dialog set or in one dialog's presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSignal {
    /// A dialog was appended to the active set.
    Opened(DialogId),
    /// A dialog's presentation state changed (busy indicator, visibility).
    Changed(DialogId),
    /// A close attempt was vetoed; play the rejection shake on this dialog.
    Shake(DialogId),
    /// A dialog finalized; visibility is now false, play the exit
    /// transition and then call `finish_exit` on its handle.
    Closing(DialogId),
    /// A dialog's exit transition completed and it left the active set.
    Destroyed {
        id: DialogId,
        /// The flag the dialog resolved with.
        flag: Flag,
    },
    /// `clear` emptied the whole set synchronously.
    Cleared,
}

type Callback = Rc<RefCell<dyn FnMut(&DialogSignal)>>;

#[derive(Default)]
struct HubInner {
    next_token: u64,
    subscribers: Vec<(u64, Weak<RefCell<dyn FnMut(&DialogSignal)>>)>,
}

/// Shared signal fan-out. Cloning shares the subscriber list.
#[derive(Clone, Default)]
pub(crate) struct SignalHub {
    inner: Rc<RefCell<HubInner>>,
}

impl SignalHub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&self, callback: impl FnMut(&DialogSignal) + 'static) -> Subscription {
        let callback: Callback = Rc::new(RefCell::new(callback));
        let token = {
            let mut inner = self.inner.borrow_mut();
            let token = inner.next_token;
            inner.next_token += 1;
            inner.subscribers.push((token, Rc::downgrade(&callback)));
            token
        };
        Subscription {
            token,
            hub: Rc::downgrade(&self.inner),
            _callback: callback,
        }
    }

    pub(crate) fn emit(&self, signal: &DialogSignal) {
        // Snapshot the list so callbacks can (un)subscribe re-entrantly,
        // and drop dead entries while we are here.
        let live: Vec<Callback> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|(_, weak)| weak.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(|(_, weak)| weak.upgrade())
                .collect()
        };
        for callback in live {
            (callback.borrow_mut())(signal);
        }
    }
}

/// RAII guard for a subscriber; dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    token: u64,
    hub: Weak<RefCell<HubInner>>,
    _callback: Callback,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut()
                .subscribers
                .retain(|(token, _)| *token != self.token);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
