#![forbid(unsafe_code)]

//! Dialog requests and defaults merging.
//!
//! A [`DialogRequest`] is the caller-supplied configuration for one dialog.
//! Every field is optional; the effective configuration is the per-call
//! request merged over the entry point's defaults merged over the defaults
//! the manager was constructed with, leftmost layer winning.

use std::fmt;

use modalkit_core::{ButtonOverrides, ButtonProps, DialogIcon, Direction, Flag, FlagSet};

use crate::intercept::{OnClose, StateRef};

/// Configuration for one dialog, or a defaults layer.
#[derive(Clone, Default)]
pub struct DialogRequest {
    pub title: Option<String>,
    pub icon: Option<DialogIcon>,
    /// Body content; wins over `body` when both are set.
    pub content: Option<String>,
    /// Fallback body content (the "children" slot).
    pub body: Option<String>,
    pub flags: Option<FlagSet>,
    pub direction: Option<Direction>,
    /// Plain visual variant hint for the host.
    pub simple: Option<bool>,
    /// Whether clicking the mask dismisses the dialog (default false).
    pub mask_closable: Option<bool>,
    pub buttons: ButtonOverrides,
    pub on_close: Option<OnClose>,
    /// Opaque caller state forwarded into the interceptor.
    pub state_ref: Option<StateRef>,
}

impl DialogRequest {
    /// An empty request; every field falls through to the defaults layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: DialogIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The requested flag set: a bitmask (`Flag` value) or an explicit
    /// ordered list (`Vec<Flag>` / array).
    #[must_use]
    pub fn flags(mut self, flags: impl Into<FlagSet>) -> Self {
        self.flags = Some(flags.into());
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn simple(mut self, simple: bool) -> Self {
        self.simple = Some(simple);
        self
    }

    #[must_use]
    pub fn mask_closable(mut self, mask_closable: bool) -> Self {
        self.mask_closable = Some(mask_closable);
        self
    }

    #[must_use]
    pub fn yes_label(mut self, label: impl Into<String>) -> Self {
        self.buttons.yes_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn no_label(mut self, label: impl Into<String>) -> Self {
        self.buttons.no_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn ok_label(mut self, label: impl Into<String>) -> Self {
        self.buttons.ok_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.buttons.cancel_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn yes_props(mut self, props: ButtonProps) -> Self {
        self.buttons.yes_props = Some(props);
        self
    }

    #[must_use]
    pub fn no_props(mut self, props: ButtonProps) -> Self {
        self.buttons.no_props = Some(props);
        self
    }

    #[must_use]
    pub fn ok_props(mut self, props: ButtonProps) -> Self {
        self.buttons.ok_props = Some(props);
        self
    }

    #[must_use]
    pub fn cancel_props(mut self, props: ButtonProps) -> Self {
        self.buttons.cancel_props = Some(props);
        self
    }

    #[must_use]
    pub fn on_close(mut self, hook: OnClose) -> Self {
        self.on_close = Some(hook);
        self
    }

    #[must_use]
    pub fn state_ref(mut self, state: StateRef) -> Self {
        self.state_ref = Some(state);
        self
    }

    /// Merge `self` over a lower-precedence layer, field by field.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            title: self.title.clone().or_else(|| base.title.clone()),
            icon: self.icon.clone().or_else(|| base.icon.clone()),
            content: self.content.clone().or_else(|| base.content.clone()),
            body: self.body.clone().or_else(|| base.body.clone()),
            flags: self.flags.clone().or_else(|| base.flags.clone()),
            direction: self.direction.or(base.direction),
            simple: self.simple.or(base.simple),
            mask_closable: self.mask_closable.or(base.mask_closable),
            buttons: self.buttons.merged_over(&base.buttons),
            on_close: self.on_close.clone().or_else(|| base.on_close.clone()),
            state_ref: self.state_ref.clone().or_else(|| base.state_ref.clone()),
        }
    }

    /// Effective body content: `content` falling back to `body`.
    #[must_use]
    pub fn effective_content(&self) -> Option<&str> {
        self.content.as_deref().or(self.body.as_deref())
    }

    /// Effective flag set; `show`'s default when no layer set one.
    #[must_use]
    pub(crate) fn effective_flags(&self) -> FlagSet {
        self.flags
            .clone()
            .unwrap_or_else(|| FlagSet::Mask(Flag::OK | Flag::CANCEL | Flag::CLOSE))
    }
}

impl fmt::Debug for DialogRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogRequest")
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("content", &self.content)
            .field("body", &self.body)
            .field("flags", &self.flags)
            .field("direction", &self.direction)
            .field("simple", &self.simple)
            .field("mask_closable", &self.mask_closable)
            .field("buttons", &self.buttons)
            .field("on_close", &self.on_close)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_upper_layer() {
        let base = DialogRequest::new()
            .title("base title")
            .content("base content")
            .simple(true);
        let call = DialogRequest::new().title("call title");

        let merged = call.merged_over(&base);
        assert_eq!(merged.title.as_deref(), Some("call title"));
        assert_eq!(merged.content.as_deref(), Some("base content"));
        assert_eq!(merged.simple, Some(true));
    }

    #[test]
    fn content_wins_over_body() {
        let request = DialogRequest::new().content("content").body("body");
        assert_eq!(request.effective_content(), Some("content"));

        let request = DialogRequest::new().body("body");
        assert_eq!(request.effective_content(), Some("body"));
    }

    #[test]
    fn body_survives_merge_independently() {
        let base = DialogRequest::new().body("base body");
        let merged = DialogRequest::new().merged_over(&base);
        assert_eq!(merged.effective_content(), Some("base body"));
    }

    #[test]
    fn flags_accept_mask_and_list() {
        let mask = DialogRequest::new().flags(Flag::OK | Flag::CANCEL);
        assert_eq!(mask.flags, Some(FlagSet::Mask(Flag::OK | Flag::CANCEL)));

        let list = DialogRequest::new().flags(vec![Flag::YES, Flag::NO]);
        assert_eq!(
            list.flags,
            Some(FlagSet::Ordered(vec![Flag::YES, Flag::NO]))
        );
    }

    #[test]
    fn default_flags_are_ok_cancel_close() {
        let flags = DialogRequest::new().effective_flags();
        assert_eq!(
            flags,
            FlagSet::Mask(Flag::OK | Flag::CANCEL | Flag::CLOSE)
        );
    }

    #[test]
    fn button_overrides_merge_through_layers() {
        let base = DialogRequest::new().ok_label("Proceed");
        let call = DialogRequest::new().cancel_label("Back");
        let merged = call.merged_over(&base);
        assert_eq!(merged.buttons.label_for(Flag::OK), "Proceed");
        assert_eq!(merged.buttons.label_for(Flag::CANCEL), "Back");
    }
}
