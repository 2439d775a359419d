//! Host action resolution.
//!
//! [`resolve_action`] decides what a host action request means for a cached
//! node without touching any state. The bridge carries out the result:
//! forwarding the action to the engine, adjusting a value, or moving
//! accessibility focus.

use horizon_semantics_core::logging::targets;

use crate::host::{ActionArgs, ActionArguments, HostAction, MovementGranularity};

use super::flags::SemanticsAction;
use super::node::SemanticsNode;
use super::tree::SemanticsTree;

/// What a host action request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The node cannot perform the request.
    Unhandled,
    /// Send `action` to the engine.
    Forward {
        action: SemanticsAction,
        args: Option<ActionArgs>,
    },
    /// Step an adjustable node with [`SemanticsAction::Increase`] or
    /// [`SemanticsAction::Decrease`]. The cached value moves to the
    /// increased or decreased value before the action is sent.
    Adjust(SemanticsAction),
    GainAccessibilityFocus,
    ClearAccessibilityFocus,
}

impl Dispatch {
    fn forward(action: SemanticsAction) -> Self {
        Dispatch::Forward { action, args: None }
    }

    /// Check if the request was handled.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Dispatch::Unhandled)
    }
}

/// Resolve a host action request against `node`.
pub fn resolve_action(
    tree: &SemanticsTree,
    node: &SemanticsNode,
    action: HostAction,
    args: &ActionArguments,
) -> Dispatch {
    let dispatch = match action {
        HostAction::Click => Dispatch::forward(SemanticsAction::Tap),
        HostAction::LongClick => Dispatch::forward(SemanticsAction::LongPress),
        HostAction::ScrollForward => scroll_or_adjust(
            node,
            [SemanticsAction::ScrollUp, SemanticsAction::ScrollLeft],
            SemanticsAction::Increase,
        ),
        HostAction::ScrollBackward => scroll_or_adjust(
            node,
            [SemanticsAction::ScrollDown, SemanticsAction::ScrollRight],
            SemanticsAction::Decrease,
        ),
        HostAction::NextAtMovementGranularity => move_cursor(node, true, args),
        HostAction::PreviousAtMovementGranularity => move_cursor(node, false, args),
        HostAction::SetSelection => {
            let (base, extent) = match (args.selection_start, args.selection_end) {
                (Some(start), Some(end)) => (start, end),
                _ => {
                    let extent = node.text_selection().1;
                    (extent, extent)
                }
            };
            Dispatch::Forward {
                action: SemanticsAction::SetSelection,
                args: Some(ActionArgs::Selection { base, extent }),
            }
        }
        HostAction::Copy => Dispatch::forward(SemanticsAction::Copy),
        HostAction::Cut => Dispatch::forward(SemanticsAction::Cut),
        HostAction::Paste => Dispatch::forward(SemanticsAction::Paste),
        HostAction::Dismiss => Dispatch::forward(SemanticsAction::Dismiss),
        HostAction::ShowOnScreen => Dispatch::forward(SemanticsAction::ShowOnScreen),
        HostAction::AccessibilityFocus => Dispatch::GainAccessibilityFocus,
        HostAction::ClearAccessibilityFocus => Dispatch::ClearAccessibilityFocus,
        other => match tree.custom_action_for_host_id(other.id()) {
            Some(custom) => Dispatch::Forward {
                action: SemanticsAction::CustomAction,
                args: Some(ActionArgs::CustomAction(custom.id)),
            },
            None => Dispatch::Unhandled,
        },
    };

    tracing::trace!(
        target: targets::DISPATCH,
        id = ?node.id(),
        host_action = action.id(),
        ?dispatch,
        "resolved host action"
    );
    dispatch
}

fn scroll_or_adjust(
    node: &SemanticsNode,
    scrolls: [SemanticsAction; 2],
    adjust: SemanticsAction,
) -> Dispatch {
    if let Some(scroll) = scrolls.into_iter().find(|&action| node.has_action(action)) {
        Dispatch::forward(scroll)
    } else if node.has_action(adjust) {
        Dispatch::Adjust(adjust)
    } else {
        Dispatch::Unhandled
    }
}

fn move_cursor(node: &SemanticsNode, forward: bool, args: &ActionArguments) -> Dispatch {
    let action = match (args.movement_granularity, forward) {
        (Some(MovementGranularity::Character), true) => {
            SemanticsAction::MoveCursorForwardByCharacter
        }
        (Some(MovementGranularity::Character), false) => {
            SemanticsAction::MoveCursorBackwardByCharacter
        }
        (Some(MovementGranularity::Word), true) => SemanticsAction::MoveCursorForwardByWord,
        (Some(MovementGranularity::Word), false) => SemanticsAction::MoveCursorBackwardByWord,
        _ => return Dispatch::Unhandled,
    };
    if !node.has_action(action) {
        return Dispatch::Unhandled;
    }
    Dispatch::Forward {
        action,
        args: Some(ActionArgs::ExtendSelection(args.extend_selection)),
    }
}
