//! AccessKit adapter.
//!
//! Presents the cached tree to platforms served by
//! [AccessKit](https://accesskit.dev/) and maps AccessKit action requests
//! back to host action ids, so an AccessKit backend can drive the bridge
//! through [`AccessibilityNodeProvider`](super::AccessibilityNodeProvider).
//!
//! ```ignore
//! let update = build_tree_update(bridge.tree(), bridge.focus());
//! adapter.update_if_active(|| update);
//!
//! if let Some((id, action)) = host_action_for_request(&request) {
//!     bridge.perform_action(id, action, &ActionArguments::default());
//! }
//! ```

use std::collections::HashSet;

use accesskit::{
    Action, ActionData, ActionRequest, Live, Node, NodeId as AccessKitNodeId, Role, Toggled,
    Tree, TreeUpdate,
};
use horizon_semantics_geometry::PixelRect;

use crate::semantics::{FIRST_HOST_ACTION_ID, FocusTracker, NodeId, SemanticsTree};

use super::action::{
    ACTION_ACCESSIBILITY_FOCUS, ACTION_CLEAR_ACCESSIBILITY_FOCUS, ACTION_CLICK,
    ACTION_SCROLL_BACKWARD, ACTION_SCROLL_FORWARD, ACTION_SET_SELECTION,
};
use super::node_info::{HOST_VIEW_ID, NodeClass, NodeInfo};

/// Convert a node id to an AccessKit id.
pub fn to_accesskit_id(id: NodeId) -> AccessKitNodeId {
    AccessKitNodeId(u64::from(id.0 as u32))
}

/// Convert an AccessKit id back to a node id.
///
/// Returns `None` for ids this adapter never produced.
pub fn from_accesskit_id(id: AccessKitNodeId) -> Option<NodeId> {
    u32::try_from(id.0).ok().map(|raw| NodeId(raw as i32))
}

impl NodeClass {
    /// The closest AccessKit role.
    pub fn to_accesskit_role(self) -> Role {
        match self {
            NodeClass::View => Role::GenericContainer,
            NodeClass::EditText => Role::TextInput,
            NodeClass::Button => Role::Button,
            NodeClass::ImageView => Role::Image,
            NodeClass::ScrollView | NodeClass::HorizontalScrollView => Role::ScrollView,
            NodeClass::SeekBar => Role::Slider,
            NodeClass::CheckBox => Role::CheckBox,
            NodeClass::RadioButton => Role::RadioButton,
            NodeClass::Switch => Role::Switch,
        }
    }
}

impl From<NodeClass> for Role {
    fn from(class: NodeClass) -> Self {
        class.to_accesskit_role()
    }
}

fn to_accesskit_rect(rect: PixelRect) -> accesskit::Rect {
    accesskit::Rect {
        x0: rect.left as f64,
        y0: rect.top as f64,
        x1: rect.right as f64,
        y1: rect.bottom as f64,
    }
}

impl NodeInfo {
    /// Build the AccessKit node for this description.
    pub fn to_accesskit_node(&self) -> Node {
        let role = if self.id == HOST_VIEW_ID {
            Role::Window
        } else if self.class == NodeClass::View && self.collection_info.is_some() {
            Role::List
        } else {
            self.class.to_accesskit_role()
        };
        let mut node = Node::new(role);

        if let Some(label) = self.content_description.as_ref().or(self.text.as_ref()) {
            node.set_label(label.clone());
        }
        node.set_bounds(to_accesskit_rect(self.bounds_in_screen));

        if self.checkable {
            node.set_toggled(if self.checked {
                Toggled::True
            } else {
                Toggled::False
            });
        }
        if self.selected {
            node.set_selected(true);
        }
        if !self.enabled {
            node.set_disabled();
        }
        if !self.visible {
            node.set_hidden();
        }
        if self.live_region {
            node.set_live(Live::Polite);
        }

        let horizontal = self.class == NodeClass::HorizontalScrollView
            || self.collection_info.is_some_and(|info| info.columns > 0);
        for action in &self.actions {
            let mapped = match action.id {
                ACTION_CLICK => Some(Action::Click),
                ACTION_ACCESSIBILITY_FOCUS => Some(Action::Focus),
                ACTION_CLEAR_ACCESSIBILITY_FOCUS => Some(Action::Blur),
                ACTION_SET_SELECTION => Some(Action::SetTextSelection),
                ACTION_SCROLL_FORWARD if self.class == NodeClass::SeekBar => Some(Action::Increment),
                ACTION_SCROLL_BACKWARD if self.class == NodeClass::SeekBar => Some(Action::Decrement),
                ACTION_SCROLL_FORWARD if horizontal => Some(Action::ScrollLeft),
                ACTION_SCROLL_BACKWARD if horizontal => Some(Action::ScrollRight),
                ACTION_SCROLL_FORWARD => Some(Action::ScrollUp),
                ACTION_SCROLL_BACKWARD => Some(Action::ScrollDown),
                id if id >= FIRST_HOST_ACTION_ID => Some(Action::CustomAction),
                _ => None,
            };
            if let Some(mapped) = mapped {
                node.add_action(mapped);
            }
        }

        if !self.children.is_empty() {
            node.set_children(
                self.children
                    .iter()
                    .map(|&child| to_accesskit_id(child))
                    .collect::<Vec<_>>(),
            );
        }
        node
    }
}

/// Build a full AccessKit tree update from the cache.
///
/// The tree is rooted at the host view. Hidden nodes are left out.
pub fn build_tree_update(tree: &SemanticsTree, focus: &FocusTracker) -> TreeUpdate {
    let host_view = NodeInfo::host_view(tree.root().is_some());
    let mut nodes = vec![(to_accesskit_id(HOST_VIEW_ID), host_view.to_accesskit_node())];

    let mut seen = HashSet::new();
    let mut stack = host_view.children;
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let Some(info) = NodeInfo::from_tree(tree, focus, id) else {
            continue;
        };
        nodes.push((to_accesskit_id(id), info.to_accesskit_node()));
        stack.extend(info.children.iter().rev().copied());
    }

    let focus = focus
        .accessibility_focused()
        .or(focus.input_focused())
        .filter(|&id| tree.contains(id))
        .unwrap_or(HOST_VIEW_ID);

    TreeUpdate {
        nodes,
        tree: Some(Tree::new(to_accesskit_id(HOST_VIEW_ID))),
        focus: to_accesskit_id(focus),
    }
}

/// Map an AccessKit action request to a node and host action id.
///
/// Returns `None` for actions the bridge has no host equivalent for.
pub fn host_action_for_request(request: &ActionRequest) -> Option<(NodeId, i32)> {
    let id = from_accesskit_id(request.target)?;
    let action = match request.action {
        Action::Click => ACTION_CLICK,
        Action::Focus => ACTION_ACCESSIBILITY_FOCUS,
        Action::Blur => ACTION_CLEAR_ACCESSIBILITY_FOCUS,
        Action::SetTextSelection => ACTION_SET_SELECTION,
        Action::Increment | Action::ScrollUp | Action::ScrollLeft => ACTION_SCROLL_FORWARD,
        Action::Decrement | Action::ScrollDown | Action::ScrollRight => ACTION_SCROLL_BACKWARD,
        Action::CustomAction => match request.data {
            Some(ActionData::CustomAction(host_id)) => host_id,
            _ => return None,
        },
        _ => return None,
    };
    Some((id, action))
}
