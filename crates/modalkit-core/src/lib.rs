#![forbid(unsafe_code)]

//! Presentation-independent primitives for the modalkit dialog manager.
//!
//! This crate owns everything about dialogs that does not require a manager
//! or an event loop: the [`Flag`] result bitflags, the [`FlagSet`] tagged
//! union (bitmask or explicit ordered list), button-row derivation with
//! LTR/RTL support, icon presets, and the rejection-shake keyframes.

pub mod button;
pub mod flag;
pub mod icon;
pub mod shake;

pub use button::{
    ButtonOverrides, ButtonProps, ButtonSpec, CANONICAL_BUTTON_ORDER, Direction, derive_buttons,
};
pub use flag::{Flag, FlagSet};
pub use icon::DialogIcon;
pub use shake::{SHAKE_AMPLITUDE, SHAKE_DURATION, keyframes, offset_at};
