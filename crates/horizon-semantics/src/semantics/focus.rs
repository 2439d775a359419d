//! Focus, hover and route tracking.
//!
//! Three independent references into the cache are tracked: accessibility
//! focus (moved by the host's screen reader), input focus (reported by the
//! engine through the `IS_FOCUSED` flag) and the hovered node (touch
//! exploration). Each may be absent. The route tracker remembers which
//! route-scoping node was announced last.

use crate::host::{HostEvent, HostEventKind};

use super::node::NodeId;

/// Focus and hover state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTracker {
    accessibility_focused: Option<NodeId>,
    input_focused: Option<NodeId>,
    hovered: Option<NodeId>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accessibility_focused(&self) -> Option<NodeId> {
        self.accessibility_focused
    }

    pub fn input_focused(&self) -> Option<NodeId> {
        self.input_focused
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Check if `id` holds accessibility focus.
    pub fn is_accessibility_focused(&self, id: NodeId) -> bool {
        self.accessibility_focused == Some(id)
    }

    /// Check if `id` holds input focus.
    pub fn is_input_focused(&self, id: NodeId) -> bool {
        self.input_focused == Some(id)
    }

    /// Record an input focus report from an update.
    ///
    /// A node reporting focus takes it; the focused node reporting no focus
    /// gives it up.
    pub fn report_input_focus(&mut self, id: NodeId, focused: bool) {
        if focused {
            self.input_focused = Some(id);
        } else if self.input_focused == Some(id) {
            self.input_focused = None;
        }
    }

    /// Give accessibility focus to `id`.
    ///
    /// A different previous holder gets focus-cleared before `id` gets
    /// focused.
    pub fn set_accessibility_focus(&mut self, id: NodeId) -> Vec<HostEvent> {
        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.accessibility_focused.replace(id)
            && previous != id
        {
            events.push(HostEvent::new(previous, HostEventKind::AccessibilityFocusCleared));
        }
        events.push(HostEvent::new(id, HostEventKind::AccessibilityFocused));
        events
    }

    /// Take accessibility focus from `id`.
    pub fn clear_accessibility_focus(&mut self, id: NodeId) -> HostEvent {
        if self.accessibility_focused == Some(id) {
            self.accessibility_focused = None;
        }
        HostEvent::new(id, HostEventKind::AccessibilityFocusCleared)
    }

    /// Move the hover target.
    ///
    /// Emits hover-exit on the old node, then hover-enter on the new one.
    /// Nothing is emitted when the target does not change.
    pub fn hover_to(&mut self, target: Option<NodeId>) -> Vec<HostEvent> {
        if target == self.hovered {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(old) = self.hovered {
            events.push(HostEvent::new(old, HostEventKind::HoverExit));
        }
        if let Some(new) = target {
            events.push(HostEvent::new(new, HostEventKind::HoverEnter));
        }
        self.hovered = target;
        events
    }

    /// End hovering.
    pub fn hover_exit(&mut self) -> Option<HostEvent> {
        self.hovered
            .take()
            .map(|old| HostEvent::new(old, HostEventKind::HoverExit))
    }

    /// Drop every reference to an evicted node.
    ///
    /// Returns the focus-cleared event if the node held accessibility focus.
    pub fn forget(&mut self, id: NodeId) -> Option<HostEvent> {
        if self.input_focused == Some(id) {
            self.input_focused = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        (self.accessibility_focused == Some(id)).then(|| {
            self.accessibility_focused = None;
            HostEvent::new(id, HostEventKind::AccessibilityFocusCleared)
        })
    }

    /// Drop every reference.
    ///
    /// Returns the focus-cleared event if a node held accessibility focus.
    pub fn reset(&mut self) -> Option<HostEvent> {
        self.input_focused = None;
        self.hovered = None;
        self.accessibility_focused
            .take()
            .map(|id| HostEvent::new(id, HostEventKind::AccessibilityFocusCleared))
    }
}

/// Tracks the active route across update cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTracker {
    previous_routes: Vec<NodeId>,
    active_route: NodeId,
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self {
            previous_routes: Vec::new(),
            active_route: NodeId::ROOT,
        }
    }
}

impl RouteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The route announced last; the root until a route is announced.
    pub fn active_route(&self) -> NodeId {
        self.active_route
    }

    /// Routes seen in the previous cycle, in traversal order.
    pub fn routes(&self) -> &[NodeId] {
        &self.previous_routes
    }

    /// Record this cycle's routes.
    ///
    /// The newest route is the last one absent from the previous cycle,
    /// or else the last one listed. Returns it when it differs from the
    /// active route.
    pub fn update(&mut self, routes: Vec<NodeId>) -> Option<NodeId> {
        let newest = routes
            .iter()
            .rev()
            .find(|id| !self.previous_routes.contains(id))
            .or_else(|| routes.last())
            .copied();

        let changed = match newest {
            Some(id) if id != self.active_route => {
                self.active_route = id;
                Some(id)
            }
            _ => None,
        };
        self.previous_routes = routes;
        changed
    }

    /// Forget every route.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
