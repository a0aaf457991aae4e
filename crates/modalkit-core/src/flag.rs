#![forbid(unsafe_code)]

//! Dialog result flags and the requested-flag set.
//!
//! A dialog resolves with a [`Flag`]: the bitwise OR of zero or more action
//! bits plus policy bits. The low 24 bits are selection bits; everything
//! above is policy ([`Flag::PREVENT_DEFAULT`], [`Flag::REJECT`]).
//!
//! # Invariants
//!
//! - A flag is *final* (closes the dialog) iff it has at least one selection
//!   bit and does not have `REJECT` set.
//! - `REJECT` dominates: when present, the selection bits are ignored for
//!   closing purposes.
//! - Policy bits live above bit 23, so they can never make a flag final on
//!   their own.

use bitflags::bitflags;

bitflags! {
    /// One user/programmatic dialog action, or an OR-combination of them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flag: u32 {
        /// Affirmative choice.
        const YES = 1 << 0;
        /// Negative choice.
        const NO = 1 << 1;
        /// Confirm choice.
        const OK = 1 << 2;
        /// Cancel choice.
        const CANCEL = 1 << 3;
        /// Dismissed via the close control or the mask.
        const CLOSE = 1 << 4;
        /// Suppress the default close behavior while signaling no selection.
        const PREVENT_DEFAULT = 1 << 24;
        /// Veto bit: the dialog stays open and plays a rejection shake.
        const REJECT = 1 << 25;
    }
}

impl Flag {
    /// No selection.
    pub const NONE: Self = Self::empty();

    /// Bits that count as an actual selection.
    const SELECTION_MASK: u32 = 0x00ff_ffff;

    /// The selection bits of this flag (policy bits stripped).
    #[must_use]
    pub const fn selection(self) -> Self {
        Self::from_bits_retain(self.bits() & Self::SELECTION_MASK)
    }

    /// Whether this flag closes the dialog: at least one selection bit and
    /// no `REJECT`.
    #[must_use]
    pub const fn is_final(self) -> bool {
        self.bits() & Self::REJECT.bits() == 0 && self.bits() & Self::SELECTION_MASK != 0
    }

    /// Whether this is exactly one of the four button flags.
    #[must_use]
    pub fn is_button(self) -> bool {
        self == Self::YES || self == Self::NO || self == Self::OK || self == Self::CANCEL
    }
}

/// The set of flags a dialog was requested with.
///
/// Modeled as a tagged union rather than an overloaded field: a bitmask
/// yields buttons in canonical order, an explicit list yields them verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagSet {
    /// Unordered bitmask; buttons derive in canonical order.
    Mask(Flag),
    /// Explicit ordered list; buttons derive in list order, duplicates
    /// producing duplicate buttons.
    Ordered(Vec<Flag>),
}

impl FlagSet {
    /// Whether the close control should be rendered (CLOSE requested).
    #[must_use]
    pub fn closable(&self) -> bool {
        match self {
            Self::Mask(mask) => mask.contains(Flag::CLOSE),
            Self::Ordered(flags) => flags.contains(&Flag::CLOSE),
        }
    }

    /// The button flags in render order, before any direction reversal.
    ///
    /// Mask sets filter the canonical order; ordered sets keep their input
    /// order, skipping entries that are not single button flags (CLOSE in an
    /// ordered set still drives [`FlagSet::closable`], it just has no
    /// button).
    #[must_use]
    pub fn ordered_buttons(&self) -> Vec<Flag> {
        match self {
            Self::Mask(mask) => crate::button::CANONICAL_BUTTON_ORDER
                .iter()
                .copied()
                .filter(|flag| mask.contains(*flag))
                .collect(),
            Self::Ordered(flags) => flags
                .iter()
                .copied()
                .filter(|flag| flag.is_button())
                .collect(),
        }
    }

    /// Entries of an ordered set that will not produce a button.
    #[must_use]
    pub fn non_button_entries(&self) -> Vec<Flag> {
        match self {
            Self::Mask(_) => Vec::new(),
            Self::Ordered(flags) => flags
                .iter()
                .copied()
                .filter(|flag| !flag.is_button())
                .collect(),
        }
    }
}

impl From<Flag> for FlagSet {
    fn from(mask: Flag) -> Self {
        Self::Mask(mask)
    }
}

impl From<Vec<Flag>> for FlagSet {
    fn from(flags: Vec<Flag>) -> Self {
        Self::Ordered(flags)
    }
}

impl<const N: usize> From<[Flag; N]> for FlagSet {
    fn from(flags: [Flag; N]) -> Self {
        Self::Ordered(flags.to_vec())
    }
}
