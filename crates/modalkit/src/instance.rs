#![forbid(unsafe_code)]

//! One live dialog and its finalize state machine.
//!
//! A dialog moves through four phases:
//!
//! ```text
//! Open -> ActionPending(flag) -> Open      (rejected or retained)
//!                             -> Closing   (finalized, resolver fired)
//! Closing -> Destroyed                     (host reported exit complete)
//! ```
//!
//! # Invariants
//!
//! - The resolver fires at most once per dialog: only the finalizing
//!   transition consumes it, and only `Closing`/`Destroyed` are reachable
//!   afterwards.
//! - `ActionPending` is an exclusive lock: while an interceptor is in
//!   flight, every further action attempt on the dialog is ignored. No
//!   queuing, no cancellation.
//! - A dialog leaves the manager's active set only from `finish_exit` (after
//!   the host's exit transition) or from `clear`, never from `trigger`.
//! - Interceptor results arriving after the dialog was cleared are dropped.
//!
//! # Failure Modes
//!
//! - A failing interceptor reopens the dialog, emits a shake, and surfaces
//!   the error to the `trigger` caller.
//! - Calls on a handle whose manager is gone return `ManagerClosed` (for
//!   `trigger`) or are no-ops (for `finish_exit`).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use modalkit_core::{ButtonSpec, DialogIcon, Direction, Flag};
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::error::DialogError;
use crate::intercept::{OnClose, StateRef};
use crate::manager::Registry;
use crate::observe::{DialogId, DialogSignal};

/// Lifecycle phase of one dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    /// Visible, no action in flight.
    Open,
    /// A close attempt for this flag is running its interceptor.
    ActionPending(Flag),
    /// Finalized; the host is playing the exit transition.
    Closing,
    /// Removed from the active set. Terminal.
    Destroyed,
}

/// How a `trigger` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The dialog finalized with this flag; the ticket has settled.
    Closed(Flag),
    /// The close was vetoed (REJECT); the dialog stays open and shakes.
    Rejected,
    /// No selection bit survived (NONE / PREVENT_DEFAULT); the dialog stays
    /// open without shaking.
    Retained,
    /// Another action was already in flight, or the dialog is past `Open`;
    /// the attempt was a no-op.
    Ignored,
    /// The dialog was cleared (or the manager dropped) while the
    /// interceptor ran; the late result was discarded.
    Orphaned,
}

pub(crate) struct InstanceState {
    pub(crate) id: DialogId,
    pub(crate) title: Option<String>,
    pub(crate) icon: Option<DialogIcon>,
    pub(crate) content: Option<String>,
    pub(crate) simple: bool,
    pub(crate) direction: Direction,
    pub(crate) buttons: Vec<ButtonSpec>,
    pub(crate) closable: bool,
    pub(crate) mask_closable: bool,
    pub(crate) phase: DialogPhase,
    pub(crate) visible: bool,
    pub(crate) final_flag: Option<Flag>,
    pub(crate) resolver: Option<oneshot::Sender<Flag>>,
    pub(crate) on_close: Option<OnClose>,
    pub(crate) state_ref: Option<StateRef>,
}

/// Render-ready view of one dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSnapshot {
    pub id: DialogId,
    pub title: Option<String>,
    pub icon: Option<DialogIcon>,
    pub content: Option<String>,
    /// Plain visual variant hint.
    pub simple: bool,
    pub direction: Direction,
    /// False once the dialog finalized; drives the host's exit transition.
    pub visible: bool,
    /// Whether the close control is rendered (CLOSE was requested).
    pub closable: bool,
    /// Whether a mask click should dismiss the dialog.
    pub mask_closable: bool,
    /// The flag whose action is in flight, if any.
    pub busy: Option<Flag>,
    /// The derived button row, already direction-ordered.
    pub buttons: Vec<ButtonSpec>,
}

impl DialogSnapshot {
    /// Whether the button for `flag` should show a busy indicator.
    #[must_use]
    pub fn is_button_busy(&self, flag: Flag) -> bool {
        self.busy == Some(flag)
    }
}

/// Shared handle to one live dialog.
///
/// The presentation layer holds these (via
/// [`DialogManager::dialogs`](crate::DialogManager::dialogs)) to render
/// snapshots, forward user actions, and report exit transitions.
#[derive(Clone)]
pub struct DialogHandle {
    pub(crate) state: Rc<RefCell<InstanceState>>,
    pub(crate) registry: Weak<RefCell<Registry>>,
}

impl DialogHandle {
    /// This dialog's creation-order identity.
    #[must_use]
    pub fn id(&self) -> DialogId {
        self.state.borrow().id
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> DialogPhase {
        self.state.borrow().phase
    }

    /// Whether the dialog is still visible (not yet finalized).
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// The flag whose action is currently in flight, if any.
    #[must_use]
    pub fn busy(&self) -> Option<Flag> {
        match self.state.borrow().phase {
            DialogPhase::ActionPending(flag) => Some(flag),
            _ => None,
        }
    }

    /// The flag the dialog resolved with; only meaningful after closing.
    #[must_use]
    pub fn final_flag(&self) -> Option<Flag> {
        self.state.borrow().final_flag
    }

    /// A render-ready copy of the dialog's presentation state.
    #[must_use]
    pub fn snapshot(&self) -> DialogSnapshot {
        let state = self.state.borrow();
        DialogSnapshot {
            id: state.id,
            title: state.title.clone(),
            icon: state.icon.clone(),
            content: state.content.clone(),
            simple: state.simple,
            direction: state.direction,
            visible: state.visible,
            closable: state.closable,
            mask_closable: state.mask_closable,
            busy: match state.phase {
                DialogPhase::ActionPending(flag) => Some(flag),
                _ => None,
            },
            buttons: state.buttons.clone(),
        }
    }

    /// Run the finalize state machine for one action.
    ///
    /// This is the single entry point for button clicks, the close control,
    /// mask dismissal, and programmatic closes. The returned future must be
    /// driven on the UI event loop; the dialog stays action-pending until
    /// the interceptor (if any) settles.
    pub async fn trigger(&self, flag: Flag) -> Result<CloseOutcome, DialogError> {
        let id;
        let (hook, state_ref, hub) = {
            let Some(registry) = self.registry.upgrade() else {
                return Err(DialogError::ManagerClosed);
            };
            let hub = registry.borrow().hub.clone();
            let mut state = self.state.borrow_mut();
            id = state.id;
            match state.phase {
                DialogPhase::Open => {}
                phase => {
                    trace!(id = id.value(), ?phase, "action ignored, dialog not open");
                    return Ok(CloseOutcome::Ignored);
                }
            }
            state.phase = DialogPhase::ActionPending(flag);
            (state.on_close.clone(), state.state_ref.clone(), hub)
        };
        hub.emit(&DialogSignal::Changed(id));

        let mut effective = flag;
        if let Some(hook) = hook {
            let verdict = hook.call(flag, state_ref).await;
            if self.is_orphaned(id) {
                debug!(id = id.value(), "late interceptor result dropped");
                return Ok(CloseOutcome::Orphaned);
            }
            match verdict {
                Ok(Some(replacement)) => effective = replacement,
                Ok(None) => {}
                Err(source) => {
                    self.state.borrow_mut().phase = DialogPhase::Open;
                    hub.emit(&DialogSignal::Changed(id));
                    hub.emit(&DialogSignal::Shake(id));
                    return Err(DialogError::Interceptor(source));
                }
            }
        }

        if effective.contains(Flag::REJECT) {
            self.state.borrow_mut().phase = DialogPhase::Open;
            debug!(id = id.value(), "close rejected");
            hub.emit(&DialogSignal::Changed(id));
            hub.emit(&DialogSignal::Shake(id));
            return Ok(CloseOutcome::Rejected);
        }

        if effective.is_final() {
            {
                let mut state = self.state.borrow_mut();
                if let Some(resolver) = state.resolver.take() {
                    let _ = resolver.send(effective);
                }
                state.final_flag = Some(effective);
                state.visible = false;
                state.phase = DialogPhase::Closing;
            }
            debug!(id = id.value(), flag = effective.bits(), "dialog closing");
            hub.emit(&DialogSignal::Closing(id));
            return Ok(CloseOutcome::Closed(effective));
        }

        // NONE or a bare policy bit: nothing to resolve, stay open.
        self.state.borrow_mut().phase = DialogPhase::Open;
        hub.emit(&DialogSignal::Changed(id));
        Ok(CloseOutcome::Retained)
    }

    /// Programmatic close with the default flag (CANCEL).
    pub async fn close(&self) -> Result<CloseOutcome, DialogError> {
        self.trigger(Flag::CANCEL).await
    }

    /// Programmatic close with an explicit flag.
    pub async fn close_with(&self, flag: Flag) -> Result<CloseOutcome, DialogError> {
        self.trigger(flag).await
    }

    /// The close-control / mask path: a CLOSE-flag close attempt. Honored
    /// regardless of whether CLOSE was requested; the control itself is only
    /// rendered when [`DialogSnapshot::closable`] is true.
    pub async fn dismiss(&self) -> Result<CloseOutcome, DialogError> {
        self.trigger(Flag::CLOSE).await
    }

    /// The mask-click path: a CLOSE-flag close attempt, honored only when
    /// the dialog was configured mask-closable; otherwise a no-op.
    pub async fn mask_click(&self) -> Result<CloseOutcome, DialogError> {
        if !self.state.borrow().mask_closable {
            return Ok(CloseOutcome::Ignored);
        }
        self.trigger(Flag::CLOSE).await
    }

    /// Report that the host's exit transition finished.
    ///
    /// Transitions `Closing` to `Destroyed`, removes the dialog from the
    /// active set, and emits [`DialogSignal::Destroyed`]. Idempotent: a
    /// no-op in any phase but `Closing`.
    pub fn finish_exit(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let (id, flag) = {
            let mut state = self.state.borrow_mut();
            if state.phase != DialogPhase::Closing {
                return;
            }
            state.phase = DialogPhase::Destroyed;
            (state.id, state.final_flag.unwrap_or(Flag::CLOSE))
        };
        let hub = {
            let mut registry = registry.borrow_mut();
            registry
                .active
                .retain(|handle| !Rc::ptr_eq(&handle.state, &self.state));
            registry.hub.clone()
        };
        debug!(id = id.value(), flag = flag.bits(), "dialog destroyed");
        hub.emit(&DialogSignal::Destroyed { id, flag });
    }

    /// Whether this dialog is no longer in a live manager's active set.
    fn is_orphaned(&self, id: DialogId) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return true;
        };
        let registry = registry.borrow();
        !registry
            .active
            .iter()
            .any(|handle| handle.state.borrow().id == id)
    }
}

impl std::fmt::Debug for DialogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("DialogHandle")
            .field("id", &state.id)
            .field("phase", &state.phase)
            .field("visible", &state.visible)
            .finish_non_exhaustive()
    }
}

impl InstanceState {
    pub(crate) fn force_resolve(&mut self, flag: Flag) {
        if let Some(resolver) = self.resolver.take() {
            let _ = resolver.send(flag);
        }
        self.final_flag.get_or_insert(flag);
        self.visible = false;
        self.phase = DialogPhase::Destroyed;
    }
}

// The lifecycle is exercised end to end (manager + instance together) in
// manager.rs unit tests and tests/lifecycle.rs.
