//! Host event synthesis from node changes.
//!
//! After each update cycle every node that was populated before the cycle
//! is compared with its snapshot, and the differences the host cares about
//! become accessibility events: scrolling, live-region changes, selection,
//! and text edits in the focused text field.

use horizon_semantics_core::BridgeConfig;
use horizon_semantics_core::logging::targets;

use crate::host::{HostEvent, HostEventKind, ScrollChange, TextChange};

use super::flags::{SemanticsAction, SemanticsFlags};
use super::focus::FocusTracker;
use super::node::{NodeId, NodeSnapshot, SemanticsNode};
use super::tree::SemanticsTree;

/// Turns node snapshots into host events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventSynthesizer {
    scroll_extent_for_infinity: f32,
    scroll_position_cap_for_infinity: f32,
}

impl Default for EventSynthesizer {
    fn default() -> Self {
        Self::from_config(&BridgeConfig::default())
    }
}

impl EventSynthesizer {
    /// Create a synthesizer using the configured scroll substitutions.
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            scroll_extent_for_infinity: config.scroll_extent_for_infinity,
            scroll_position_cap_for_infinity: config.scroll_position_cap_for_infinity,
        }
    }

    /// Events for one updated node, in emission order.
    pub fn node_events(
        &self,
        tree: &SemanticsTree,
        id: NodeId,
        focus: &FocusTracker,
    ) -> Vec<HostEvent> {
        let mut events = Vec::new();
        let Some(node) = tree.get(id) else {
            return events;
        };
        let Some(previous) = node.previous() else {
            return events;
        };
        if node.is_hidden() {
            return events;
        }

        if did_scroll(node, previous) {
            events.push(HostEvent::new(
                id,
                HostEventKind::ViewScrolled(self.scroll_change(tree, node, previous)),
            ));
        }

        let label_changed = node.label() != previous.label.as_deref();
        if node.has_flag(SemanticsFlags::IS_LIVE_REGION) {
            if label_changed || !previous.has_flag(SemanticsFlags::IS_LIVE_REGION) {
                events.push(HostEvent::new(id, HostEventKind::WindowContentChanged));
            }
        } else if node.has_flag(SemanticsFlags::IS_TEXT_FIELD)
            && label_changed
            && focus.is_input_focused(id)
        {
            events.push(HostEvent::new(id, HostEventKind::WindowContentChanged));
        }

        if focus.is_accessibility_focused(id)
            && !previous.has_flag(SemanticsFlags::IS_SELECTED)
            && node.has_flag(SemanticsFlags::IS_SELECTED)
        {
            events.push(HostEvent::new(
                id,
                HostEventKind::ViewSelected {
                    text: node.label().map(str::to_owned),
                },
            ));
        }

        let accessibility_focus_compatible = match focus.accessibility_focused() {
            None => true,
            Some(focused) => focus.input_focused() == Some(focused),
        };
        if focus.is_input_focused(id)
            && previous.has_flag(SemanticsFlags::IS_TEXT_FIELD)
            && node.has_flag(SemanticsFlags::IS_TEXT_FIELD)
            && accessibility_focus_compatible
        {
            let old_value = previous.value.as_deref().unwrap_or_default();
            let new_value = node.value().unwrap_or_default();
            if let Some(change) = text_change(old_value, new_value) {
                events.push(HostEvent::new(id, HostEventKind::ViewTextChanged(change)));
            }

            let (base, extent) = node.text_selection();
            if previous.text_selection_base != base || previous.text_selection_extent != extent {
                events.push(HostEvent::new(
                    id,
                    HostEventKind::ViewTextSelectionChanged {
                        text: new_value.to_owned(),
                        from_index: base,
                        to_index: extent,
                        item_count: new_value.chars().count() as i32,
                    },
                ));
            }
        }

        if !events.is_empty() {
            tracing::trace!(target: targets::EVENTS, ?id, count = events.len(), "synthesized node events");
        }
        events
    }

    fn scroll_change(
        &self,
        tree: &SemanticsTree,
        node: &SemanticsNode,
        previous: &NodeSnapshot,
    ) -> ScrollChange {
        let mut position = node.scroll_position();
        let mut max = node.scroll_extent_max();

        if node.scroll_extent_max().is_infinite() {
            max = self.scroll_extent_for_infinity;
            if position > self.scroll_position_cap_for_infinity {
                position = self.scroll_position_cap_for_infinity;
            }
        }
        if node.scroll_extent_min().is_infinite() {
            max += self.scroll_extent_for_infinity;
            if position < -self.scroll_position_cap_for_infinity {
                position = -self.scroll_position_cap_for_infinity;
            }
            position += self.scroll_extent_for_infinity;
        } else {
            max -= node.scroll_extent_min();
            position -= node.scroll_extent_min();
        }

        let mut change = ScrollChange::default();
        if previous.has_action(SemanticsAction::ScrollUp)
            || previous.has_action(SemanticsAction::ScrollDown)
        {
            change.scroll_y = Some(position as i32);
            change.max_scroll_y = Some(max as i32);
        } else if previous.has_action(SemanticsAction::ScrollLeft)
            || previous.has_action(SemanticsAction::ScrollRight)
        {
            change.scroll_x = Some(position as i32);
            change.max_scroll_x = Some(max as i32);
        }

        if node.scroll_children() > 0 {
            let visible = node
                .children_in_hit_test_order()
                .iter()
                .filter(|&&child| tree.get(child).is_some_and(|c| !c.is_hidden()))
                .count() as i32;
            change.item_count = Some(node.scroll_children());
            change.from_index = Some(node.scroll_index());
            change.to_index = Some(node.scroll_index().saturating_add(visible - 1));
        }
        change
    }
}

fn did_scroll(node: &SemanticsNode, previous: &NodeSnapshot) -> bool {
    let now = node.scroll_position();
    let before = previous.scroll_position;
    !now.is_nan() && !before.is_nan() && now != before
}

/// Describe the edit turning `old` into `new`.
///
/// The changed span is found by trimming the common prefix, then the common
/// suffix of what remains. Indices count characters. Returns `None` when the
/// texts are equal.
pub fn text_change(old: &str, new: &str) -> Option<TextChange> {
    if old == new {
        return None;
    }
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();

    let first_difference = old_chars
        .iter()
        .zip(&new_chars)
        .take_while(|(a, b)| a == b)
        .count();

    let mut old_end = old_chars.len();
    let mut new_end = new_chars.len();
    while old_end > first_difference
        && new_end > first_difference
        && old_chars[old_end - 1] == new_chars[new_end - 1]
    {
        old_end -= 1;
        new_end -= 1;
    }

    Some(TextChange {
        before_text: old.to_owned(),
        text: new.to_owned(),
        from_index: first_difference as i32,
        added_count: (new_end - first_difference) as i32,
        removed_count: (old_end - first_difference) as i32,
    })
}
