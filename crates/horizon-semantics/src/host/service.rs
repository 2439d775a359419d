//! Seams to the engine and the host platform.

use horizon_semantics_geometry::Point;

use crate::semantics::{AccessibilityFeatures, NodeId, SemanticsAction};

use super::action::{ActionArgs, ActionArguments, FocusType, HoverAction};
use super::event::HostEvent;
use super::node_info::NodeInfo;

/// The UI engine that owns the semantics tree.
///
/// Calls arrive on the bridge's thread. Implementations typically post a
/// message to the engine and return immediately.
pub trait SemanticsEngine {
    /// Ask the engine to perform `action` on node `id`.
    fn dispatch_action(&mut self, id: NodeId, action: SemanticsAction, args: Option<ActionArgs>);

    /// Tell the engine which accessibility features the user has enabled.
    fn set_accessibility_features(&mut self, features: AccessibilityFeatures);

    /// Turn semantics tree production on or off.
    fn set_semantics_enabled(&mut self, enabled: bool);
}

/// The host platform's accessibility service.
pub trait HostAccessibilityService {
    fn is_accessibility_enabled(&self) -> bool;

    fn is_touch_exploration_enabled(&self) -> bool;

    /// Deliver an event to the host.
    fn send_event(&mut self, event: HostEvent);
}

/// Queries and requests the host makes against the cached tree.
pub trait AccessibilityNodeProvider {
    /// Describe node `id`. [`HOST_VIEW_ID`](super::HOST_VIEW_ID) describes
    /// the hosting view.
    fn provide_node_info(&self, id: NodeId) -> Option<NodeInfo>;

    /// Perform a host action. Returns `false` when the node cannot handle it.
    fn perform_action(&mut self, id: NodeId, action: i32, args: &ActionArguments) -> bool;

    /// Describe the node holding the requested kind of focus.
    fn find_focus(&self, focus: FocusType) -> Option<NodeInfo>;

    /// Route a hover event in host view coordinates. Returns whether the
    /// event was consumed.
    fn on_hover_event(&mut self, point: Point, action: HoverAction) -> bool;
}

/// Notified when the host's accessibility or touch exploration state changes.
pub type AccessibilityChangeListener = Box<dyn FnMut(bool, bool)>;
