#![forbid(unsafe_code)]

//! Close interceptors.
//!
//! An [`OnClose`] hook runs before a dialog finalizes a close attempt. It
//! receives the flag being acted on (plus the caller's opaque state handle,
//! if one was attached to the request) and may:
//!
//! - return `Ok(None)` to let the flag pass through unchanged,
//! - return `Ok(Some(flag))` to replace it (returning a flag with
//!   [`Flag::REJECT`](crate::Flag::REJECT) vetoes the close and shakes the
//!   dialog),
//! - return `Err(..)` to abort the attempt (the dialog reopens, the error
//!   propagates to the trigger caller).
//!
//! Hooks may be synchronous or deferred; a deferred hook returns a boxed
//! future that the trigger call awaits. Hooks are cloneable so a single hook
//! can be installed as a manager-level default across many dialogs.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use modalkit_core::Flag;

/// Error produced by a failing interceptor.
pub type InterceptError = Box<dyn std::error::Error>;

/// Opaque caller-owned state forwarded into interceptors. The dialog never
/// inspects it.
pub type StateRef = Rc<dyn Any>;

/// Boxed future returned by a deferred interceptor.
pub type InterceptFuture = Pin<Box<dyn Future<Output = Result<Option<Flag>, InterceptError>>>>;

type InterceptFn = dyn FnMut(Flag, Option<StateRef>) -> InterceptFuture;

/// A close interceptor attached to a dialog request.
#[derive(Clone)]
pub struct OnClose {
    hook: Rc<RefCell<InterceptFn>>,
}

impl OnClose {
    /// An infallible synchronous hook. Return `None` to keep the flag,
    /// `Some(flag)` to replace it.
    pub fn new(mut hook: impl FnMut(Flag, Option<&StateRef>) -> Option<Flag> + 'static) -> Self {
        Self::fallible(move |flag, state| Ok(hook(flag, state)))
    }

    /// A fallible synchronous hook.
    pub fn fallible(
        mut hook: impl FnMut(Flag, Option<&StateRef>) -> Result<Option<Flag>, InterceptError> + 'static,
    ) -> Self {
        Self::deferred(move |flag, state| {
            let verdict = hook(flag, state.as_ref());
            Box::pin(std::future::ready(verdict))
        })
    }

    /// A deferred hook returning a boxed future. The future is awaited on
    /// the caller's event loop; the dialog stays action-pending until it
    /// settles.
    pub fn deferred(hook: impl FnMut(Flag, Option<StateRef>) -> InterceptFuture + 'static) -> Self {
        Self {
            hook: Rc::new(RefCell::new(hook)),
        }
    }

    pub(crate) fn call(&self, flag: Flag, state: Option<StateRef>) -> InterceptFuture {
        (self.hook.borrow_mut())(flag, state)
    }
}

impl fmt::Debug for OnClose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnClose").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(fut: InterceptFuture) -> Result<Option<Flag>, InterceptError> {
        // The sync constructors always produce ready futures.
        use std::task::{Context, Poll, Waker};
        let mut fut = fut;
        let mut cx = Context::from_waker(Waker::noop());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(verdict) => verdict,
            Poll::Pending => panic!("sync interceptor returned a pending future"),
        }
    }

    #[test]
    fn sync_hook_passes_flag_through() {
        let hook = OnClose::new(|_, _| None);
        let verdict = drive(hook.call(Flag::OK, None)).unwrap();
        assert_eq!(verdict, None);
    }

    #[test]
    fn sync_hook_replaces_flag() {
        let hook = OnClose::new(|_, _| Some(Flag::REJECT));
        let verdict = drive(hook.call(Flag::OK, None)).unwrap();
        assert_eq!(verdict, Some(Flag::REJECT));
    }

    #[test]
    fn fallible_hook_reports_error() {
        let hook = OnClose::fallible(|_, _| Err("nope".into()));
        let verdict = drive(hook.call(Flag::OK, None));
        assert_eq!(verdict.unwrap_err().to_string(), "nope");
    }

    #[test]
    fn state_ref_reaches_hook() {
        let state: StateRef = Rc::new(7_u32);
        let hook = OnClose::new(|_, state: Option<&StateRef>| {
            let value = state
                .and_then(|s| s.downcast_ref::<u32>())
                .copied()
                .unwrap_or(0);
            assert_eq!(value, 7);
            None
        });
        drive(hook.call(Flag::OK, Some(state))).unwrap();
    }

    #[test]
    fn clones_share_the_hook() {
        let hook = OnClose::new(|flag, _| Some(flag | Flag::YES));
        let clone = hook.clone();
        let verdict = drive(clone.call(Flag::OK, None)).unwrap();
        assert_eq!(verdict, Some(Flag::OK | Flag::YES));
    }
}
