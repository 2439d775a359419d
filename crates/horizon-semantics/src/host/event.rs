//! Accessibility events delivered to the host.

use crate::semantics::NodeId;

/// Scroll state reported with a view-scrolled event.
///
/// Only the axis the node scrolls along is set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrollChange {
    pub scroll_x: Option<i32>,
    pub scroll_y: Option<i32>,
    pub max_scroll_x: Option<i32>,
    pub max_scroll_y: Option<i32>,
    /// Number of scrollable children, when the node reports them.
    pub item_count: Option<i32>,
    /// First visible child index.
    pub from_index: Option<i32>,
    /// Last visible child index.
    pub to_index: Option<i32>,
}

/// An edit of a text field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub before_text: String,
    pub text: String,
    /// Index of the first changed character.
    pub from_index: i32,
    pub added_count: i32,
    pub removed_count: i32,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEventKind {
    WindowContentChanged,
    /// A new route became active, or a tooltip appeared.
    WindowStateChanged { text: Option<String> },
    ViewScrolled(ScrollChange),
    ViewSelected { text: Option<String> },
    ViewTextChanged(TextChange),
    ViewTextSelectionChanged {
        text: String,
        from_index: i32,
        to_index: i32,
        item_count: i32,
    },
    HoverEnter,
    HoverExit,
    AccessibilityFocused,
    AccessibilityFocusCleared,
    ViewClicked,
    ViewLongClicked,
    Announcement { message: String },
}

/// An accessibility event and the node it originates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub source: NodeId,
    pub kind: HostEventKind,
}

impl HostEvent {
    pub fn new(source: NodeId, kind: HostEventKind) -> Self {
        Self { source, kind }
    }

    /// Content-changed event on the root.
    pub fn root_content_changed() -> Self {
        Self::new(NodeId::ROOT, HostEventKind::WindowContentChanged)
    }
}
