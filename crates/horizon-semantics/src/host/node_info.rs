//! Host-facing node descriptions.
//!
//! The host never sees [`SemanticsNode`]s. It asks for a [`NodeInfo`] per
//! id and gets a flattened view: a widget class, state bits, pixel bounds,
//! the host actions it may request and the visible children.

use horizon_semantics_geometry::PixelRect;

use crate::semantics::{
    FocusTracker, NodeId, SemanticsAction, SemanticsFlags, SemanticsNode, SemanticsTree,
};

use super::action::{
    ACTION_ACCESSIBILITY_FOCUS, ACTION_CLEAR_ACCESSIBILITY_FOCUS, ACTION_CLICK, ACTION_COPY,
    ACTION_CUT, ACTION_DISMISS, ACTION_LONG_CLICK, ACTION_NEXT_AT_MOVEMENT_GRANULARITY,
    ACTION_PASTE, ACTION_PREVIOUS_AT_MOVEMENT_GRANULARITY, ACTION_SCROLL_BACKWARD,
    ACTION_SCROLL_FORWARD, ACTION_SET_SELECTION, MovementGranularity,
};

/// Id the host uses for the view hosting the whole tree.
pub const HOST_VIEW_ID: NodeId = NodeId(-1);

/// Native widget class a node is presented as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeClass {
    #[default]
    View,
    EditText,
    Button,
    ImageView,
    ScrollView,
    HorizontalScrollView,
    SeekBar,
    CheckBox,
    RadioButton,
    Switch,
}

/// List dimensions announced for implicitly scrolling containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionInfo {
    pub rows: i32,
    pub columns: i32,
}

/// A host action a node offers, with an optional custom label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfoAction {
    pub id: i32,
    pub label: Option<String>,
}

/// Description of one node for the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeInfo {
    pub id: NodeId,
    pub class: NodeClass,
    /// Parent id; [`HOST_VIEW_ID`] for the root, `None` for the host view.
    pub parent: Option<NodeId>,
    pub bounds_in_parent: PixelRect,
    pub bounds_in_screen: PixelRect,
    pub visible: bool,
    pub enabled: bool,
    pub focusable: bool,
    pub focused: bool,
    pub accessibility_focused: bool,
    pub password: bool,
    pub editable: bool,
    pub text_selection: Option<(i32, i32)>,
    pub movement_granularities: Vec<MovementGranularity>,
    pub live_region: bool,
    pub dismissable: bool,
    pub clickable: bool,
    pub long_clickable: bool,
    pub scrollable: bool,
    pub collection_info: Option<CollectionInfo>,
    pub checkable: bool,
    pub checked: bool,
    pub selected: bool,
    pub text: Option<String>,
    pub content_description: Option<String>,
    pub actions: Vec<NodeInfoAction>,
    pub children: Vec<NodeId>,
}

impl NodeInfo {
    /// Info for the host view itself. Its only child is the root, when the
    /// root is cached.
    pub fn host_view(root_cached: bool) -> Self {
        Self {
            id: HOST_VIEW_ID,
            visible: true,
            enabled: true,
            children: if root_cached { vec![NodeId::ROOT] } else { Vec::new() },
            ..Default::default()
        }
    }

    /// Describe the cached node `id`.
    pub fn from_tree(tree: &SemanticsTree, focus: &FocusTracker, id: NodeId) -> Option<Self> {
        let node = tree.get(id)?;
        let mut info = NodeInfo {
            id,
            focusable: node.is_focusable(),
            focused: focus.is_input_focused(id),
            accessibility_focused: focus.is_accessibility_focused(id),
            ..Default::default()
        };

        if node.has_flag(SemanticsFlags::IS_TEXT_FIELD) {
            info.describe_text_field(node, focus);
        }

        for (action, host_action) in [
            (SemanticsAction::SetSelection, ACTION_SET_SELECTION),
            (SemanticsAction::Copy, ACTION_COPY),
            (SemanticsAction::Cut, ACTION_CUT),
            (SemanticsAction::Paste, ACTION_PASTE),
        ] {
            if node.has_action(action) {
                info.add_action(host_action, None);
            }
        }

        if node.has_flag(SemanticsFlags::IS_BUTTON) {
            info.class = NodeClass::Button;
        }
        if node.has_flag(SemanticsFlags::IS_IMAGE) {
            info.class = NodeClass::ImageView;
        }
        if node.has_action(SemanticsAction::Dismiss) {
            info.dismissable = true;
            info.add_action(ACTION_DISMISS, None);
        }

        info.describe_position(tree, node);
        info.visible = true;
        info.enabled = !node.has_flag(SemanticsFlags::HAS_ENABLED_STATE)
            || node.has_flag(SemanticsFlags::IS_ENABLED);

        if node.has_action(SemanticsAction::Tap) {
            info.clickable = true;
            info.add_action(ACTION_CLICK, override_hint(tree, node.tap_override()));
        }
        if node.has_action(SemanticsAction::LongPress) {
            info.long_clickable = true;
            info.add_action(
                ACTION_LONG_CLICK,
                override_hint(tree, node.long_press_override()),
            );
        }

        info.describe_scrolling(tree, focus, node);

        if node.has_flag(SemanticsFlags::IS_LIVE_REGION) {
            info.live_region = true;
        }

        let has_checked_state = node.has_flag(SemanticsFlags::HAS_CHECKED_STATE);
        let has_toggled_state = node.has_flag(SemanticsFlags::HAS_TOGGLED_STATE);
        info.checkable = has_checked_state || has_toggled_state;
        if has_checked_state {
            info.checked = node.has_flag(SemanticsFlags::IS_CHECKED);
            info.content_description = node.value_label_hint();
            info.class = if node.has_flag(SemanticsFlags::IS_IN_MUTUALLY_EXCLUSIVE_GROUP) {
                NodeClass::RadioButton
            } else {
                NodeClass::CheckBox
            };
        } else if has_toggled_state {
            info.checked = node.has_flag(SemanticsFlags::IS_TOGGLED);
            info.content_description = node.value_label_hint();
            info.class = NodeClass::Switch;
        } else {
            info.text = node.value_label_hint();
        }

        info.selected = node.has_flag(SemanticsFlags::IS_SELECTED);

        if info.accessibility_focused {
            info.add_action(ACTION_CLEAR_ACCESSIBILITY_FOCUS, None);
        } else {
            info.add_action(ACTION_ACCESSIBILITY_FOCUS, None);
        }

        for &action_id in node.custom_actions() {
            if let Some(custom) = tree.custom_action(action_id) {
                info.add_action(custom.host_action_id(), custom.label.clone());
            }
        }

        info.children = node
            .children_in_traversal_order()
            .iter()
            .copied()
            .filter(|&child| tree.get(child).is_some_and(|child| !child.is_hidden()))
            .collect();

        Some(info)
    }

    /// Check if the node offers the host action `id`.
    pub fn has_action(&self, id: i32) -> bool {
        self.actions.iter().any(|action| action.id == id)
    }

    fn add_action(&mut self, id: i32, label: Option<String>) {
        if !self.has_action(id) {
            self.actions.push(NodeInfoAction { id, label });
        }
    }

    fn describe_text_field(&mut self, node: &SemanticsNode, focus: &FocusTracker) {
        self.class = NodeClass::EditText;
        self.password = node.has_flag(SemanticsFlags::IS_OBSCURED);
        self.editable = true;

        let (base, extent) = node.text_selection();
        if base != -1 && extent != -1 {
            self.text_selection = Some((base, extent));
        }
        if focus.is_accessibility_focused(node.id()) {
            self.live_region = true;
        }

        for (action, host_action, granularity) in [
            (
                SemanticsAction::MoveCursorForwardByCharacter,
                ACTION_NEXT_AT_MOVEMENT_GRANULARITY,
                MovementGranularity::Character,
            ),
            (
                SemanticsAction::MoveCursorBackwardByCharacter,
                ACTION_PREVIOUS_AT_MOVEMENT_GRANULARITY,
                MovementGranularity::Character,
            ),
            (
                SemanticsAction::MoveCursorForwardByWord,
                ACTION_NEXT_AT_MOVEMENT_GRANULARITY,
                MovementGranularity::Word,
            ),
            (
                SemanticsAction::MoveCursorBackwardByWord,
                ACTION_PREVIOUS_AT_MOVEMENT_GRANULARITY,
                MovementGranularity::Word,
            ),
        ] {
            if node.has_action(action) {
                self.add_action(host_action, None);
                if !self.movement_granularities.contains(&granularity) {
                    self.movement_granularities.push(granularity);
                }
            }
        }
    }

    fn describe_position(&mut self, tree: &SemanticsTree, node: &SemanticsNode) {
        let bounds = node.global_bounds().round();
        self.bounds_in_screen = bounds;
        match node.parent().and_then(|parent| tree.get(parent)) {
            Some(parent) => {
                let origin = parent.global_bounds().round();
                self.parent = Some(parent.id());
                self.bounds_in_parent = bounds.offset(-origin.left, -origin.top);
            }
            None => {
                self.parent = Some(HOST_VIEW_ID);
                self.bounds_in_parent = bounds;
            }
        }
    }

    fn describe_scrolling(
        &mut self,
        tree: &SemanticsTree,
        focus: &FocusTracker,
        node: &SemanticsNode,
    ) {
        let forward = node.has_action(SemanticsAction::ScrollUp)
            || node.has_action(SemanticsAction::ScrollLeft);
        let backward = node.has_action(SemanticsAction::ScrollDown)
            || node.has_action(SemanticsAction::ScrollRight);
        if forward || backward {
            self.scrollable = true;
            if node.has_flag(SemanticsFlags::HAS_IMPLICIT_SCROLLING) {
                let horizontal = node.has_action(SemanticsAction::ScrollLeft)
                    || node.has_action(SemanticsAction::ScrollRight);
                let announce_collection = should_set_collection_info(tree, focus, node);
                match (horizontal, announce_collection) {
                    (true, true) => {
                        self.collection_info = Some(CollectionInfo {
                            rows: 0,
                            columns: node.scroll_children(),
                        })
                    }
                    (true, false) => self.class = NodeClass::HorizontalScrollView,
                    (false, true) => {
                        self.collection_info = Some(CollectionInfo {
                            rows: node.scroll_children(),
                            columns: 0,
                        })
                    }
                    (false, false) => self.class = NodeClass::ScrollView,
                }
            }
            if forward {
                self.add_action(ACTION_SCROLL_FORWARD, None);
            }
            if backward {
                self.add_action(ACTION_SCROLL_BACKWARD, None);
            }
        }

        let increase = node.has_action(SemanticsAction::Increase);
        let decrease = node.has_action(SemanticsAction::Decrease);
        if increase || decrease {
            self.class = NodeClass::SeekBar;
            if increase {
                self.add_action(ACTION_SCROLL_FORWARD, None);
            }
            if decrease {
                self.add_action(ACTION_SCROLL_BACKWARD, None);
            }
        }
    }
}

/// Announce list dimensions only for the list holding accessibility focus,
/// or when focus is outside every implicitly scrolling container.
fn should_set_collection_info(
    tree: &SemanticsTree,
    focus: &FocusTracker,
    node: &SemanticsNode,
) -> bool {
    if node.scroll_children() <= 0 {
        return false;
    }
    let Some(focused) = focus.accessibility_focused() else {
        return true;
    };
    tree.find_ancestor(focused, |ancestor| ancestor.id() == node.id())
        .is_some()
        || tree
            .find_ancestor(focused, |ancestor| {
                ancestor.has_flag(SemanticsFlags::HAS_IMPLICIT_SCROLLING)
            })
            .is_none()
}

fn override_hint(tree: &SemanticsTree, action_id: Option<i32>) -> Option<String> {
    action_id
        .and_then(|id| tree.custom_action(id))
        .and_then(|action| action.hint.clone())
}
