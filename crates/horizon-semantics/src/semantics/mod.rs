//! The semantics model and the pure logic that runs on it.
//!
//! Everything here operates on a [`SemanticsTree`] and returns data or
//! [`HostEvent`](crate::host::HostEvent)s; nothing talks to the engine or
//! the host directly. The [`AccessibilityBridge`](crate::AccessibilityBridge)
//! ties the pieces together.

mod debug;
mod decoder;
mod diff;
mod dispatch;
mod encoder;
mod flags;
mod focus;
mod geometry;
mod hit_test;
mod node;
mod tree;

pub use debug::SemanticsTreeDebug;
pub use decoder::{CustomActionRecord, NodeRecord, decode_custom_actions, decode_nodes};
pub use diff::{EventSynthesizer, text_change};
pub use dispatch::{Dispatch, resolve_action};
pub use encoder::{EncodedUpdate, SemanticsUpdateBuilder};
pub use flags::{
    AccessibilityFeatures, SemanticsAction, SemanticsActions, SemanticsFlags, TextDirection,
};
pub use focus::{FocusTracker, RouteTracker};
pub use node::{
    CustomAccessibilityAction, FIRST_HOST_ACTION_ID, NodeId, NodeSnapshot, SemanticsNode,
};
pub use tree::{SemanticsTree, UpdateOutcome};
