//! Horizon Semantics - a semantics-tree cache and accessibility protocol
//! engine for UI frameworks that draw their own surface.
//!
//! The engine describes its widgets as a semantics tree and streams it to
//! the bridge as compact binary updates. The bridge caches the tree,
//! resolves geometry, answers the host accessibility service's queries and
//! turns changes into host events.
//!
//! # Example
//!
//! ```no_run
//! use horizon_semantics::{
//!     AccessibilityBridge, AccessibilityNodeProvider, BridgeConfig, NodeId, NodeRecord,
//!     SemanticsFlags, SemanticsUpdateBuilder,
//! };
//! # use horizon_semantics::{
//! #     AccessibilityFeatures, ActionArgs, HostAccessibilityService, HostEvent, SemanticsAction,
//! #     SemanticsEngine,
//! # };
//! # struct Engine;
//! # impl SemanticsEngine for Engine {
//! #     fn dispatch_action(&mut self, _: NodeId, _: SemanticsAction, _: Option<ActionArgs>) {}
//! #     fn set_accessibility_features(&mut self, _: AccessibilityFeatures) {}
//! #     fn set_semantics_enabled(&mut self, _: bool) {}
//! # }
//! # struct Host;
//! # impl HostAccessibilityService for Host {
//! #     fn is_accessibility_enabled(&self) -> bool { true }
//! #     fn is_touch_exploration_enabled(&self) -> bool { false }
//! #     fn send_event(&mut self, _: HostEvent) {}
//! # }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bridge =
//!         AccessibilityBridge::new(Box::new(Engine), Box::new(Host), BridgeConfig::default());
//!
//!     let mut update = SemanticsUpdateBuilder::new();
//!     update
//!         .add_node(&NodeRecord::new(0).with_children([1]))
//!         .add_node(&NodeRecord::new(1).with_label("Play").with_flags(SemanticsFlags::IS_BUTTON));
//!     let update = update.build();
//!     bridge.apply_update(&update.nodes, &update.strings)?;
//!
//!     let info = bridge.provide_node_info(NodeId(1));
//!     assert_eq!(info.and_then(|info| info.text).as_deref(), Some("Play"));
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod host;
pub mod semantics;

pub use horizon_semantics_core::*;

/// Geometry primitives.
pub mod geometry {
    pub use horizon_semantics_geometry::*;
}

pub use bridge::{AccessibilityBridge, ChannelMessage, Fault, FaultHandler};
pub use host::{
    AccessibilityNodeProvider, ActionArgs, ActionArguments, FocusType, HOST_VIEW_ID,
    HostAccessibilityService, HostAction, HostEvent, HostEventKind, HoverAction,
    MovementGranularity, NodeClass, NodeInfo, SemanticsEngine,
};
pub use semantics::{
    AccessibilityFeatures, CustomAccessibilityAction, CustomActionRecord, FIRST_HOST_ACTION_ID,
    NodeId, NodeRecord, SemanticsAction, SemanticsActions, SemanticsFlags, SemanticsNode,
    SemanticsTree, SemanticsTreeDebug, SemanticsUpdateBuilder,
};
