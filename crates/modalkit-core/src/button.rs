#![forbid(unsafe_code)]

//! Button-row derivation from a requested flag set.
//!
//! Each button flag maps to one button; labels and presentation props come
//! from per-flag overrides merged over flag-specific defaults (OK defaults
//! to the primary emphasis). The finished row is reversed end-to-end for
//! right-to-left layouts.
//!
//! # Invariants
//!
//! - A mask-derived row is a subsequence of [`CANONICAL_BUTTON_ORDER`].
//! - An ordered-list-derived row preserves the input order, duplicates
//!   included.
//! - Direction reversal is a pure end-to-end reverse of the row.

use unicode_width::UnicodeWidthStr;

use crate::flag::{Flag, FlagSet};

/// Canonical render order for mask-derived button rows.
pub const CANONICAL_BUTTON_ORDER: [Flag; 4] = [Flag::OK, Flag::CANCEL, Flag::NO, Flag::YES];

/// Layout direction of the button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Left to right (default).
    #[default]
    Ltr,
    /// Right to left; the row is reversed end-to-end.
    Rtl,
}

/// Per-button presentation overrides. Unset fields fall back to the
/// flag-specific defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonProps {
    /// Primary/emphasized style.
    pub primary: Option<bool>,
    /// Danger style.
    pub danger: Option<bool>,
    /// Render disabled.
    pub disabled: Option<bool>,
}

impl ButtonProps {
    /// Create empty props (all defaults).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary: None,
            danger: None,
            disabled: None,
        }
    }

    /// Set the primary style.
    #[must_use]
    pub const fn primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Set the danger style.
    #[must_use]
    pub const fn danger(mut self, danger: bool) -> Self {
        self.danger = Some(danger);
        self
    }

    /// Set the disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Merge `self` over `base`: set fields win, unset fields fall through.
    #[must_use]
    pub fn merged_over(self, base: Self) -> Self {
        Self {
            primary: self.primary.or(base.primary),
            danger: self.danger.or(base.danger),
            disabled: self.disabled.or(base.disabled),
        }
    }
}

/// Per-flag label and props overrides for the four button flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonOverrides {
    pub yes_label: Option<String>,
    pub no_label: Option<String>,
    pub ok_label: Option<String>,
    pub cancel_label: Option<String>,
    pub yes_props: Option<ButtonProps>,
    pub no_props: Option<ButtonProps>,
    pub ok_props: Option<ButtonProps>,
    pub cancel_props: Option<ButtonProps>,
}

impl ButtonOverrides {
    /// The effective label for a button flag.
    #[must_use]
    pub fn label_for(&self, flag: Flag) -> &str {
        if flag == Flag::YES {
            self.yes_label.as_deref().unwrap_or("Yes")
        } else if flag == Flag::NO {
            self.no_label.as_deref().unwrap_or("No")
        } else if flag == Flag::OK {
            self.ok_label.as_deref().unwrap_or("OK")
        } else if flag == Flag::CANCEL {
            self.cancel_label.as_deref().unwrap_or("Cancel")
        } else {
            ""
        }
    }

    /// The caller-supplied props for a button flag, if any.
    #[must_use]
    pub fn props_for(&self, flag: Flag) -> ButtonProps {
        let props = if flag == Flag::YES {
            self.yes_props
        } else if flag == Flag::NO {
            self.no_props
        } else if flag == Flag::OK {
            self.ok_props
        } else if flag == Flag::CANCEL {
            self.cancel_props
        } else {
            None
        };
        props.unwrap_or_default()
    }

    /// Merge `self` over `base`, field by field.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            yes_label: self.yes_label.clone().or_else(|| base.yes_label.clone()),
            no_label: self.no_label.clone().or_else(|| base.no_label.clone()),
            ok_label: self.ok_label.clone().or_else(|| base.ok_label.clone()),
            cancel_label: self
                .cancel_label
                .clone()
                .or_else(|| base.cancel_label.clone()),
            yes_props: merge_props(self.yes_props, base.yes_props),
            no_props: merge_props(self.no_props, base.no_props),
            ok_props: merge_props(self.ok_props, base.ok_props),
            cancel_props: merge_props(self.cancel_props, base.cancel_props),
        }
    }
}

fn merge_props(over: Option<ButtonProps>, base: Option<ButtonProps>) -> Option<ButtonProps> {
    match (over, base) {
        (Some(over), Some(base)) => Some(over.merged_over(base)),
        (over, base) => over.or(base),
    }
}

/// One resolved button in a dialog's row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    /// The flag this button triggers.
    pub flag: Flag,
    /// Display label.
    pub label: String,
    /// Primary/emphasized style.
    pub primary: bool,
    /// Danger style.
    pub danger: bool,
    /// Render disabled.
    pub disabled: bool,
}

impl ButtonSpec {
    /// Display width of the button including its `[ ]` frame.
    #[must_use]
    pub fn display_width(&self) -> usize {
        UnicodeWidthStr::width(self.label.as_str()) + 4
    }
}

/// Derive the rendered button row for a requested flag set.
///
/// Mask sets follow [`CANONICAL_BUTTON_ORDER`] filtered to present bits;
/// ordered sets render verbatim. The row is reversed iff `direction` is
/// [`Direction::Rtl`].
#[must_use]
pub fn derive_buttons(
    flags: &FlagSet,
    direction: Direction,
    overrides: &ButtonOverrides,
) -> Vec<ButtonSpec> {
    let mut row: Vec<ButtonSpec> = flags
        .ordered_buttons()
        .into_iter()
        .map(|flag| {
            let props = overrides.props_for(flag);
            ButtonSpec {
                flag,
                label: overrides.label_for(flag).to_owned(),
                primary: props.primary.unwrap_or(flag == Flag::OK),
                danger: props.danger.unwrap_or(false),
                disabled: props.disabled.unwrap_or(false),
            }
        })
        .collect();
    if direction == Direction::Rtl {
        row.reverse();
    }
    row
}
