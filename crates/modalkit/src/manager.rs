#![forbid(unsafe_code)]

//! The dialog manager: active set, show-family entry points, and `clear`.
//!
//! A [`DialogManager`] owns an ordered collection of open dialogs. Each
//! show-family call appends one instance and returns a
//! [`DialogTicket`] that settles when the instance finalizes; instances
//! leave the set when the host reports their exit transition complete, or
//! all at once through [`DialogManager::clear`].
//!
//! The manager's lifetime is scoped by whoever constructs it; there is no
//! process-wide registry. UI code that must outlive borrow checks holds a
//! [`ManagerHandle`], whose operations degrade to no-ops once the manager
//! is dropped.
//!
//! # Invariants
//!
//! - The active set is ordered by creation; `DialogId`s are monotonic per
//!   manager.
//! - `size()` equals instances created minus instances fully destroyed.
//! - `clear()` resolves every instance with CLOSE synchronously, bypassing
//!   interceptors, and empties the set before returning.

use std::cell::RefCell;
use std::rc::Rc;

use modalkit_core::{DialogIcon, Flag, derive_buttons};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::instance::{DialogHandle, DialogPhase, InstanceState};
use crate::observe::{DialogId, DialogSignal, SignalHub, Subscription};
use crate::request::DialogRequest;
use crate::ticket::DialogTicket;

pub(crate) struct Registry {
    pub(crate) active: Vec<DialogHandle>,
    pub(crate) hub: SignalHub,
    next_id: u64,
}

impl Registry {
    fn new() -> Self {
        Self {
            active: Vec::new(),
            hub: SignalHub::new(),
            next_id: 0,
        }
    }
}

/// Tracks all currently active dialogs and exposes the show/confirm/...
/// entry points.
pub struct DialogManager {
    inner: Rc<RefCell<Registry>>,
    defaults: DialogRequest,
}

impl DialogManager {
    /// A manager with empty construction-time defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(DialogRequest::new())
    }

    /// A manager whose `defaults` layer underlies every show-family call
    /// (per-call and per-method fields take precedence).
    #[must_use]
    pub fn with_defaults(defaults: DialogRequest) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry::new())),
            defaults,
        }
    }

    /// A weak handle for UI code; degrades to no-ops after the manager is
    /// dropped.
    #[must_use]
    pub fn handle(&self) -> ManagerHandle {
        ManagerHandle {
            inner: Rc::downgrade(&self.inner),
            defaults: self.defaults.clone(),
        }
    }

    /// Count of active (not yet destroyed) dialogs.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inner.borrow().active.len()
    }

    /// Whether no dialogs are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Handles to the active dialogs, in creation order.
    #[must_use]
    pub fn dialogs(&self) -> Vec<DialogHandle> {
        self.inner.borrow().active.clone()
    }

    /// The handle for one dialog, if it is still active.
    #[must_use]
    pub fn dialog(&self, id: DialogId) -> Option<DialogHandle> {
        self.inner
            .borrow()
            .active
            .iter()
            .find(|handle| handle.id() == id)
            .cloned()
    }

    /// Subscribe to change signals. Dropping the guard unsubscribes.
    pub fn subscribe(&self, callback: impl FnMut(&DialogSignal) + 'static) -> Subscription {
        self.inner.borrow().hub.subscribe(callback)
    }

    /// Show a dialog. Defaults to OK | CANCEL | CLOSE.
    pub fn show(&self, request: DialogRequest) -> DialogTicket {
        spawn(&self.inner, &self.defaults, show_defaults(), request)
    }

    /// Confirmation dialog: OK | CANCEL | CLOSE, warning icon, plain
    /// variant.
    pub fn confirm(&self, request: DialogRequest) -> DialogTicket {
        spawn(&self.inner, &self.defaults, confirm_defaults(), request)
    }

    /// Informational dialog: OK only, info icon, plain variant.
    pub fn info(&self, request: DialogRequest) -> DialogTicket {
        spawn(
            &self.inner,
            &self.defaults,
            notice_defaults(DialogIcon::Info),
            request,
        )
    }

    /// Success dialog: OK only, success icon, plain variant.
    pub fn success(&self, request: DialogRequest) -> DialogTicket {
        spawn(
            &self.inner,
            &self.defaults,
            notice_defaults(DialogIcon::Success),
            request,
        )
    }

    /// Warning dialog: OK only, warning icon, plain variant.
    pub fn warning(&self, request: DialogRequest) -> DialogTicket {
        spawn(
            &self.inner,
            &self.defaults,
            notice_defaults(DialogIcon::Warning),
            request,
        )
    }

    /// Error dialog: OK only, error icon, plain variant.
    pub fn error(&self, request: DialogRequest) -> DialogTicket {
        spawn(
            &self.inner,
            &self.defaults,
            notice_defaults(DialogIcon::Error),
            request,
        )
    }

    /// Resolve every active dialog with CLOSE and empty the set, now.
    ///
    /// Bypasses interceptors entirely; an in-flight interceptor's result is
    /// dropped when it eventually settles. No exit transitions are awaited.
    pub fn clear(&self) {
        clear(&self.inner);
    }
}

impl Default for DialogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DialogManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogManager")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

/// Weak, cloneable handle to a [`DialogManager`].
///
/// Every operation on a handle whose manager is gone is a no-op; show-family
/// calls return a ticket that errs immediately.
#[derive(Clone)]
pub struct ManagerHandle {
    inner: std::rc::Weak<RefCell<Registry>>,
    defaults: DialogRequest,
}

impl ManagerHandle {
    /// Count of active dialogs; 0 once the manager is gone.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inner
            .upgrade()
            .map_or(0, |inner| inner.borrow().active.len())
    }

    /// See [`DialogManager::show`].
    pub fn show(&self, request: DialogRequest) -> DialogTicket {
        match self.inner.upgrade() {
            Some(inner) => spawn(&inner, &self.defaults, show_defaults(), request),
            None => DialogTicket::closed(),
        }
    }

    /// See [`DialogManager::confirm`].
    pub fn confirm(&self, request: DialogRequest) -> DialogTicket {
        match self.inner.upgrade() {
            Some(inner) => spawn(&inner, &self.defaults, confirm_defaults(), request),
            None => DialogTicket::closed(),
        }
    }

    /// See [`DialogManager::info`].
    pub fn info(&self, request: DialogRequest) -> DialogTicket {
        self.notice(DialogIcon::Info, request)
    }

    /// See [`DialogManager::success`].
    pub fn success(&self, request: DialogRequest) -> DialogTicket {
        self.notice(DialogIcon::Success, request)
    }

    /// See [`DialogManager::warning`].
    pub fn warning(&self, request: DialogRequest) -> DialogTicket {
        self.notice(DialogIcon::Warning, request)
    }

    /// See [`DialogManager::error`].
    pub fn error(&self, request: DialogRequest) -> DialogTicket {
        self.notice(DialogIcon::Error, request)
    }

    /// See [`DialogManager::clear`].
    pub fn clear(&self) {
        if let Some(inner) = self.inner.upgrade() {
            clear(&inner);
        }
    }

    fn notice(&self, icon: DialogIcon, request: DialogRequest) -> DialogTicket {
        match self.inner.upgrade() {
            Some(inner) => spawn(&inner, &self.defaults, notice_defaults(icon), request),
            None => DialogTicket::closed(),
        }
    }
}

impl std::fmt::Debug for ManagerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerHandle")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

fn show_defaults() -> DialogRequest {
    DialogRequest::new().flags(Flag::OK | Flag::CANCEL | Flag::CLOSE)
}

fn confirm_defaults() -> DialogRequest {
    DialogRequest::new()
        .flags(Flag::OK | Flag::CANCEL | Flag::CLOSE)
        .icon(DialogIcon::Warning)
        .simple(true)
}

fn notice_defaults(icon: DialogIcon) -> DialogRequest {
    DialogRequest::new().flags(Flag::OK).icon(icon).simple(true)
}

fn spawn(
    inner: &Rc<RefCell<Registry>>,
    manager_defaults: &DialogRequest,
    method_defaults: DialogRequest,
    request: DialogRequest,
) -> DialogTicket {
    let merged = request
        .merged_over(&method_defaults)
        .merged_over(manager_defaults);

    let flags = merged.effective_flags();
    for skipped in flags.non_button_entries() {
        if skipped != Flag::CLOSE {
            warn!(flag = skipped.bits(), "ordered flag entry has no button, skipped");
        }
    }
    let direction = merged.direction.unwrap_or_default();
    let buttons = derive_buttons(&flags, direction, &merged.buttons);

    let (resolver, receiver) = oneshot::channel();
    let (id, handle, hub) = {
        let mut registry = inner.borrow_mut();
        let id = DialogId(registry.next_id);
        registry.next_id += 1;

        let state = InstanceState {
            id,
            title: merged.title.clone(),
            icon: merged.icon.clone(),
            content: merged.effective_content().map(str::to_owned),
            simple: merged.simple.unwrap_or(false),
            direction,
            buttons,
            closable: flags.closable(),
            mask_closable: merged.mask_closable.unwrap_or(false),
            phase: DialogPhase::Open,
            visible: true,
            final_flag: None,
            resolver: Some(resolver),
            on_close: merged.on_close,
            state_ref: merged.state_ref,
        };
        let handle = DialogHandle {
            state: Rc::new(RefCell::new(state)),
            registry: Rc::downgrade(inner),
        };
        registry.active.push(handle.clone());
        (id, handle, registry.hub.clone())
    };

    debug!(id = id.value(), title = ?handle.snapshot().title, "dialog opened");
    hub.emit(&DialogSignal::Opened(id));
    DialogTicket::new(id, receiver)
}

fn clear(inner: &Rc<RefCell<Registry>>) {
    let (handles, hub) = {
        let mut registry = inner.borrow_mut();
        let handles = std::mem::take(&mut registry.active);
        (handles, registry.hub.clone())
    };
    for handle in &handles {
        handle.state.borrow_mut().force_resolve(Flag::CLOSE);
    }
    debug!(count = handles.len(), "cleared all dialogs");
    hub.emit(&DialogSignal::Cleared);
}

#[cfg(test)]
mod tests {
    use super::*;
    use modalkit_core::FlagSet;

    fn click(
        handle: &DialogHandle,
        flag: Flag,
    ) -> Result<crate::CloseOutcome, crate::DialogError> {
        // Interceptor-free triggers complete synchronously.
        use std::task::{Context, Poll, Waker};
        let fut = handle.trigger(flag);
        let mut fut = std::pin::pin!(fut);
        let mut cx = Context::from_waker(Waker::noop());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(outcome) => outcome,
            Poll::Pending => panic!("interceptor-free trigger did not finish synchronously"),
        }
    }

    #[test]
    fn show_appends_instance() {
        let manager = DialogManager::new();
        assert!(manager.is_empty());

        let ticket = manager.show(DialogRequest::new().title("hello"));
        assert_eq!(manager.size(), 1);

        let id = ticket.id().unwrap();
        let handle = manager.dialog(id).unwrap();
        assert_eq!(handle.snapshot().title.as_deref(), Some("hello"));
    }

    #[test]
    fn ids_are_monotonic() {
        let manager = DialogManager::new();
        let first = manager.show(DialogRequest::new()).id().unwrap();
        let second = manager.show(DialogRequest::new()).id().unwrap();
        assert!(first < second);
    }

    #[test]
    fn show_defaults_to_ok_cancel_close() {
        let manager = DialogManager::new();
        manager.show(DialogRequest::new());
        let snapshot = manager.dialogs()[0].snapshot();
        let row: Vec<Flag> = snapshot.buttons.iter().map(|b| b.flag).collect();
        assert_eq!(row, vec![Flag::OK, Flag::CANCEL]);
        assert!(snapshot.closable);
    }

    #[test]
    fn confirm_defaults() {
        let manager = DialogManager::new();
        manager.confirm(DialogRequest::new());
        let snapshot = manager.dialogs()[0].snapshot();
        let row: Vec<Flag> = snapshot.buttons.iter().map(|b| b.flag).collect();
        assert_eq!(row, vec![Flag::OK, Flag::CANCEL]);
        assert!(snapshot.closable);
        assert_eq!(snapshot.icon, Some(DialogIcon::Warning));
        assert!(snapshot.simple);
    }

    #[test]
    fn notice_defaults_per_method() {
        let manager = DialogManager::new();
        manager.info(DialogRequest::new());
        manager.success(DialogRequest::new());
        manager.warning(DialogRequest::new());
        manager.error(DialogRequest::new());

        let icons: Vec<Option<DialogIcon>> = manager
            .dialogs()
            .iter()
            .map(|h| h.snapshot().icon)
            .collect();
        assert_eq!(
            icons,
            vec![
                Some(DialogIcon::Info),
                Some(DialogIcon::Success),
                Some(DialogIcon::Warning),
                Some(DialogIcon::Error),
            ]
        );
        for handle in manager.dialogs() {
            let snapshot = handle.snapshot();
            let row: Vec<Flag> = snapshot.buttons.iter().map(|b| b.flag).collect();
            assert_eq!(row, vec![Flag::OK]);
            assert!(!snapshot.closable);
            assert!(snapshot.simple);
        }
    }

    #[test]
    fn per_call_beats_method_and_manager_defaults() {
        let manager =
            DialogManager::with_defaults(DialogRequest::new().title("default").simple(false));
        manager.confirm(
            DialogRequest::new()
                .title("call")
                .icon(DialogIcon::Custom("skull".to_owned())),
        );
        let snapshot = manager.dialogs()[0].snapshot();
        assert_eq!(snapshot.title.as_deref(), Some("call"));
        assert_eq!(snapshot.icon, Some(DialogIcon::Custom("skull".to_owned())));
        // Method default survives where the call is silent.
        assert!(snapshot.simple);
    }

    #[test]
    fn method_flag_defaults_beat_manager_defaults() {
        let manager = DialogManager::with_defaults(DialogRequest::new().flags(Flag::YES));
        manager.show(DialogRequest::new());
        let snapshot = manager.dialogs()[0].snapshot();
        let row: Vec<Flag> = snapshot.buttons.iter().map(|b| b.flag).collect();
        assert_eq!(row, vec![Flag::OK, Flag::CANCEL]);
    }

    #[test]
    fn manager_defaults_fill_silent_fields() {
        let manager = DialogManager::with_defaults(DialogRequest::new().ok_label("Proceed"));
        manager.show(DialogRequest::new());
        let snapshot = manager.dialogs()[0].snapshot();
        assert_eq!(snapshot.buttons[0].label, "Proceed");
    }

    #[test]
    fn ordered_flags_render_verbatim() {
        let manager = DialogManager::new();
        manager.show(
            DialogRequest::new().flags(vec![Flag::YES, Flag::NO, Flag::OK, Flag::CANCEL]),
        );
        let snapshot = manager.dialogs()[0].snapshot();
        let row: Vec<Flag> = snapshot.buttons.iter().map(|b| b.flag).collect();
        assert_eq!(row, vec![Flag::YES, Flag::NO, Flag::OK, Flag::CANCEL]);
        // CLOSE absent from the ordered list: no close control.
        assert!(!snapshot.closable);
    }

    #[test]
    fn ordered_close_enables_control_without_button() {
        let manager = DialogManager::new();
        manager.show(DialogRequest::new().flags(vec![Flag::CLOSE]));
        let snapshot = manager.dialogs()[0].snapshot();
        assert!(snapshot.buttons.is_empty());
        assert!(snapshot.closable);
        assert_eq!(
            manager.dialogs()[0].snapshot().buttons.len(),
            0,
            "CLOSE must not render a button"
        );
        // FlagSet sanity: the request kept its ordered representation.
        assert!(matches!(
            DialogRequest::new().flags(vec![Flag::CLOSE]).flags,
            Some(FlagSet::Ordered(_))
        ));
    }

    #[test]
    fn clear_resolves_everything_synchronously() {
        let manager = DialogManager::new();
        let mut first = manager.show(DialogRequest::new());
        let mut second = manager.confirm(DialogRequest::new());
        assert_eq!(manager.size(), 2);

        manager.clear();
        assert_eq!(manager.size(), 0);

        // Both tickets already hold CLOSE without any event-loop turn.
        use std::task::{Context, Poll, Waker};
        let mut cx = Context::from_waker(Waker::noop());
        let first = std::pin::Pin::new(&mut first).poll(&mut cx);
        let second = std::pin::Pin::new(&mut second).poll(&mut cx);
        match (first, second) {
            (Poll::Ready(Ok(a)), Poll::Ready(Ok(b))) => {
                assert_eq!(a, Flag::CLOSE);
                assert_eq!(b, Flag::CLOSE);
            }
            other => panic!("tickets not settled synchronously: {other:?}"),
        }
    }

    #[test]
    fn destroyed_dialog_leaves_set_only_after_exit() {
        let manager = DialogManager::new();
        manager.show(DialogRequest::new());
        let handle = manager.dialogs()[0].clone();

        let outcome = click(&handle, Flag::OK).unwrap();
        assert_eq!(outcome, crate::CloseOutcome::Closed(Flag::OK));
        // Closing, but still active until the exit transition completes.
        assert_eq!(manager.size(), 1);
        assert!(!handle.is_visible());

        handle.finish_exit();
        assert_eq!(manager.size(), 0);

        // Idempotent.
        handle.finish_exit();
        assert_eq!(manager.size(), 0);
    }

    #[test]
    fn dead_handle_is_noop() {
        let manager = DialogManager::new();
        let weak = manager.handle();
        drop(manager);

        assert_eq!(weak.size(), 0);
        weak.clear();
        let ticket = weak.show(DialogRequest::new());
        assert!(ticket.id().is_none());
    }

    #[test]
    fn live_handle_spawns_dialogs() {
        let manager = DialogManager::new();
        let weak = manager.handle();
        let ticket = weak.confirm(DialogRequest::new());
        assert!(ticket.id().is_some());
        assert_eq!(manager.size(), 1);
        assert_eq!(weak.size(), 1);
    }

    #[test]
    fn signals_on_open_and_clear() {
        use std::cell::RefCell;

        let manager = DialogManager::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = manager.subscribe(move |signal| sink.borrow_mut().push(*signal));

        let id = manager.show(DialogRequest::new()).id().unwrap();
        manager.clear();

        assert_eq!(
            *seen.borrow(),
            vec![DialogSignal::Opened(id), DialogSignal::Cleared]
        );
    }
}
