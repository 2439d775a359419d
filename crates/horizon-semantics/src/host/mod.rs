//! The host side of the bridge.
//!
//! Types the host platform exchanges with the bridge: action ids and
//! arguments, node descriptions, events, and the traits behind which the
//! engine and the host's accessibility service sit.

mod action;
#[cfg(feature = "accesskit")]
mod accesskit_adapter;
mod event;
mod node_info;
mod service;

pub use action::{
    ACTION_ACCESSIBILITY_FOCUS, ACTION_CLEAR_ACCESSIBILITY_FOCUS, ACTION_CLEAR_FOCUS,
    ACTION_CLEAR_SELECTION, ACTION_CLICK, ACTION_COPY, ACTION_CUT, ACTION_DISMISS, ACTION_FOCUS,
    ACTION_LONG_CLICK, ACTION_NEXT_AT_MOVEMENT_GRANULARITY, ACTION_PASTE,
    ACTION_PREVIOUS_AT_MOVEMENT_GRANULARITY, ACTION_SCROLL_BACKWARD, ACTION_SCROLL_FORWARD,
    ACTION_SELECT, ACTION_SET_SELECTION, ACTION_SHOW_ON_SCREEN, ActionArgs, ActionArguments,
    FocusType, HostAction, HoverAction, MovementGranularity,
};
#[cfg(feature = "accesskit")]
pub use accesskit_adapter::{
    build_tree_update, from_accesskit_id, host_action_for_request, to_accesskit_id,
};
pub use event::{HostEvent, HostEventKind, ScrollChange, TextChange};
pub use node_info::{CollectionInfo, HOST_VIEW_ID, NodeClass, NodeInfo, NodeInfoAction};
pub use service::{
    AccessibilityChangeListener, AccessibilityNodeProvider, HostAccessibilityService,
    SemanticsEngine,
};
