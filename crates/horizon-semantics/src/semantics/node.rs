//! Cached semantics nodes and custom actions.

use std::fmt;

use horizon_semantics_geometry::{Rect, Transform3D};

use super::flags::{SemanticsAction, SemanticsActions, SemanticsFlags, TextDirection};

/// Identifier of a semantics node, assigned by the engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub i32);

impl NodeId {
    /// The permanent root node.
    pub const ROOT: NodeId = NodeId(0);

    /// Check if this is the root id.
    #[inline]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for NodeId {
    fn from(id: i32) -> Self {
        NodeId(id)
    }
}

/// Offset added to a custom action id to form its host action id.
///
/// Chosen above every built-in host action id so the two ranges never
/// collide.
pub const FIRST_HOST_ACTION_ID: i32 = 267_386_881;

/// A custom accessibility action defined by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAccessibilityAction {
    /// Engine-side id of the action.
    pub id: i32,
    /// Built-in action this one relabels, if any.
    pub override_action: Option<SemanticsAction>,
    pub label: Option<String>,
    pub hint: Option<String>,
}

impl CustomAccessibilityAction {
    /// A placeholder for an id that was referenced before it was defined.
    pub fn new(id: i32) -> Self {
        Self {
            id,
            override_action: None,
            label: None,
            hint: None,
        }
    }

    /// The id the host uses to request this action.
    #[inline]
    pub fn host_action_id(&self) -> i32 {
        self.id.wrapping_add(FIRST_HOST_ACTION_ID)
    }
}

/// Mutable fields captured at the start of each update of a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeSnapshot {
    pub flags: SemanticsFlags,
    pub actions: SemanticsActions,
    pub text_selection_base: i32,
    pub text_selection_extent: i32,
    pub scroll_position: f32,
    pub scroll_extent_max: f32,
    pub scroll_extent_min: f32,
    pub label: Option<String>,
    pub value: Option<String>,
}

impl NodeSnapshot {
    #[inline]
    pub fn has_flag(&self, flag: SemanticsFlags) -> bool {
        self.flags.contains(flag)
    }

    #[inline]
    pub fn has_action(&self, action: SemanticsAction) -> bool {
        self.actions.contains(action)
    }
}

/// Derived geometry of a node, recomputed when dirty.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeGeometry {
    pub(crate) global_transform: Transform3D,
    pub(crate) global_bounds: Rect,
    pub(crate) geometry_dirty: bool,
    pub(crate) inverse_transform: Transform3D,
    pub(crate) inverse_dirty: bool,
}

impl Default for NodeGeometry {
    fn default() -> Self {
        Self {
            global_transform: Transform3D::IDENTITY,
            global_bounds: Rect::ZERO,
            geometry_dirty: true,
            inverse_transform: Transform3D::IDENTITY,
            inverse_dirty: true,
        }
    }
}

/// One addressable accessible element of the engine's semantics tree.
///
/// Nodes are owned by the [`SemanticsTree`](super::SemanticsTree); links
/// between nodes are ids resolved through the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticsNode {
    pub(crate) id: NodeId,
    pub(crate) flags: SemanticsFlags,
    pub(crate) actions: SemanticsActions,
    pub(crate) text_selection_base: i32,
    pub(crate) text_selection_extent: i32,
    pub(crate) scroll_children: i32,
    pub(crate) scroll_index: i32,
    pub(crate) scroll_position: f32,
    pub(crate) scroll_extent_max: f32,
    pub(crate) scroll_extent_min: f32,
    pub(crate) label: Option<String>,
    pub(crate) value: Option<String>,
    pub(crate) increased_value: Option<String>,
    pub(crate) decreased_value: Option<String>,
    pub(crate) hint: Option<String>,
    pub(crate) text_direction: TextDirection,
    pub(crate) rect: Rect,
    pub(crate) transform: Transform3D,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children_in_traversal_order: Vec<NodeId>,
    pub(crate) children_in_hit_test_order: Vec<NodeId>,
    pub(crate) custom_actions: Vec<i32>,
    pub(crate) tap_override: Option<i32>,
    pub(crate) long_press_override: Option<i32>,
    pub(crate) populated: bool,
    pub(crate) previous: Option<NodeSnapshot>,
    pub(crate) geometry: NodeGeometry,
}

impl SemanticsNode {
    /// Create an empty node, as when a child id is referenced before its
    /// own record arrives.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            flags: SemanticsFlags::NONE,
            actions: SemanticsActions::NONE,
            text_selection_base: -1,
            text_selection_extent: -1,
            scroll_children: 0,
            scroll_index: 0,
            scroll_position: f32::NAN,
            scroll_extent_max: f32::NAN,
            scroll_extent_min: f32::NAN,
            label: None,
            value: None,
            increased_value: None,
            decreased_value: None,
            hint: None,
            text_direction: TextDirection::Unknown,
            rect: Rect::ZERO,
            transform: Transform3D::IDENTITY,
            parent: None,
            children_in_traversal_order: Vec::new(),
            children_in_hit_test_order: Vec::new(),
            custom_actions: Vec::new(),
            tap_override: None,
            long_press_override: None,
            populated: false,
            previous: None,
            geometry: NodeGeometry::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn flags(&self) -> SemanticsFlags {
        self.flags
    }

    pub fn actions(&self) -> SemanticsActions {
        self.actions
    }

    #[inline]
    pub fn has_flag(&self, flag: SemanticsFlags) -> bool {
        self.flags.contains(flag)
    }

    #[inline]
    pub fn has_action(&self, action: SemanticsAction) -> bool {
        self.actions.contains(action)
    }

    /// Check if the node is cached but suppressed from the host.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.has_flag(SemanticsFlags::IS_HIDDEN)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn increased_value(&self) -> Option<&str> {
        self.increased_value.as_deref()
    }

    pub fn decreased_value(&self) -> Option<&str> {
        self.decreased_value.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn text_direction(&self) -> TextDirection {
        self.text_direction
    }

    /// Text selection as (base, extent); -1 when unset.
    pub fn text_selection(&self) -> (i32, i32) {
        (self.text_selection_base, self.text_selection_extent)
    }

    pub fn scroll_position(&self) -> f32 {
        self.scroll_position
    }

    pub fn scroll_extent_max(&self) -> f32 {
        self.scroll_extent_max
    }

    pub fn scroll_extent_min(&self) -> f32 {
        self.scroll_extent_min
    }

    /// Number of scrollable children, or 0.
    pub fn scroll_children(&self) -> i32 {
        self.scroll_children
    }

    /// Index of the first visible scrollable child.
    pub fn scroll_index(&self) -> i32 {
        self.scroll_index
    }

    /// Bounds in the node's own coordinate space.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Node-to-parent transform.
    pub fn transform(&self) -> Transform3D {
        self.transform
    }

    /// Accumulated node-to-root transform.
    pub fn global_transform(&self) -> Transform3D {
        self.geometry.global_transform
    }

    /// Axis-aligned bounds in root coordinates.
    pub fn global_bounds(&self) -> Rect {
        self.geometry.global_bounds
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children_in_traversal_order(&self) -> &[NodeId] {
        &self.children_in_traversal_order
    }

    pub fn children_in_hit_test_order(&self) -> &[NodeId] {
        &self.children_in_hit_test_order
    }

    /// Ids of the custom actions listed on this node, overrides excluded.
    pub fn custom_actions(&self) -> &[i32] {
        &self.custom_actions
    }

    /// Custom action relabelling the tap action.
    pub fn tap_override(&self) -> Option<i32> {
        self.tap_override
    }

    /// Custom action relabelling the long-press action.
    pub fn long_press_override(&self) -> Option<i32> {
        self.long_press_override
    }

    /// State captured at the start of the latest update, if the node had
    /// been populated by an earlier one.
    pub fn previous(&self) -> Option<&NodeSnapshot> {
        self.previous.as_ref()
    }

    /// Check if the node received its own record at least once.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub(crate) fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            flags: self.flags,
            actions: self.actions,
            text_selection_base: self.text_selection_base,
            text_selection_extent: self.text_selection_extent,
            scroll_position: self.scroll_position,
            scroll_extent_max: self.scroll_extent_max,
            scroll_extent_min: self.scroll_extent_min,
            label: self.label.clone(),
            value: self.value.clone(),
        }
    }

    /// Text announced for the node: value, label and hint joined by ", ".
    pub fn value_label_hint(&self) -> Option<String> {
        let parts: Vec<&str> = [self.value(), self.label(), self.hint()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }

    /// Whether the host should treat the node as focusable.
    pub fn is_focusable(&self) -> bool {
        if self.has_flag(SemanticsFlags::SCOPES_ROUTE) {
            return false;
        }
        !self.actions.without_scrolling().is_empty()
            || !self.flags.is_empty()
            || [self.label(), self.value(), self.hint()]
                .into_iter()
                .flatten()
                .any(|s| !s.is_empty())
    }

    pub(crate) fn mark_geometry_dirty(&mut self) {
        self.geometry.geometry_dirty = true;
        self.geometry.inverse_dirty = true;
    }
}
