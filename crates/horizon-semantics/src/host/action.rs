//! Host action requests.
//!
//! The host addresses actions by integer id. Built-in ids are fixed by the
//! host platform; custom actions are addressed by
//! [`FIRST_HOST_ACTION_ID`](crate::FIRST_HOST_ACTION_ID) plus the custom
//! action's own id.

use static_assertions::const_assert;

use crate::semantics::FIRST_HOST_ACTION_ID;

pub const ACTION_FOCUS: i32 = 0x0000_0001;
pub const ACTION_CLEAR_FOCUS: i32 = 0x0000_0002;
pub const ACTION_SELECT: i32 = 0x0000_0004;
pub const ACTION_CLEAR_SELECTION: i32 = 0x0000_0008;
pub const ACTION_CLICK: i32 = 0x0000_0010;
pub const ACTION_LONG_CLICK: i32 = 0x0000_0020;
pub const ACTION_ACCESSIBILITY_FOCUS: i32 = 0x0000_0040;
pub const ACTION_CLEAR_ACCESSIBILITY_FOCUS: i32 = 0x0000_0080;
pub const ACTION_NEXT_AT_MOVEMENT_GRANULARITY: i32 = 0x0000_0100;
pub const ACTION_PREVIOUS_AT_MOVEMENT_GRANULARITY: i32 = 0x0000_0200;
pub const ACTION_SCROLL_FORWARD: i32 = 0x0000_1000;
pub const ACTION_SCROLL_BACKWARD: i32 = 0x0000_2000;
pub const ACTION_COPY: i32 = 0x0000_4000;
pub const ACTION_PASTE: i32 = 0x0000_8000;
pub const ACTION_CUT: i32 = 0x0001_0000;
pub const ACTION_SET_SELECTION: i32 = 0x0002_0000;
pub const ACTION_DISMISS: i32 = 0x0010_0000;
pub const ACTION_SHOW_ON_SCREEN: i32 = 16_908_342;

const_assert!(FIRST_HOST_ACTION_ID > ACTION_SHOW_ON_SCREEN);
const_assert!(FIRST_HOST_ACTION_ID > ACTION_DISMISS);

/// An action requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostAction {
    Focus,
    ClearFocus,
    Select,
    ClearSelection,
    Click,
    LongClick,
    AccessibilityFocus,
    ClearAccessibilityFocus,
    NextAtMovementGranularity,
    PreviousAtMovementGranularity,
    ScrollForward,
    ScrollBackward,
    Copy,
    Paste,
    Cut,
    SetSelection,
    Dismiss,
    ShowOnScreen,
    /// Any other id, including custom actions.
    Other(i32),
}

impl HostAction {
    /// Decode a host action id.
    pub fn from_id(id: i32) -> Self {
        match id {
            ACTION_FOCUS => HostAction::Focus,
            ACTION_CLEAR_FOCUS => HostAction::ClearFocus,
            ACTION_SELECT => HostAction::Select,
            ACTION_CLEAR_SELECTION => HostAction::ClearSelection,
            ACTION_CLICK => HostAction::Click,
            ACTION_LONG_CLICK => HostAction::LongClick,
            ACTION_ACCESSIBILITY_FOCUS => HostAction::AccessibilityFocus,
            ACTION_CLEAR_ACCESSIBILITY_FOCUS => HostAction::ClearAccessibilityFocus,
            ACTION_NEXT_AT_MOVEMENT_GRANULARITY => HostAction::NextAtMovementGranularity,
            ACTION_PREVIOUS_AT_MOVEMENT_GRANULARITY => HostAction::PreviousAtMovementGranularity,
            ACTION_SCROLL_FORWARD => HostAction::ScrollForward,
            ACTION_SCROLL_BACKWARD => HostAction::ScrollBackward,
            ACTION_COPY => HostAction::Copy,
            ACTION_PASTE => HostAction::Paste,
            ACTION_CUT => HostAction::Cut,
            ACTION_SET_SELECTION => HostAction::SetSelection,
            ACTION_DISMISS => HostAction::Dismiss,
            ACTION_SHOW_ON_SCREEN => HostAction::ShowOnScreen,
            other => HostAction::Other(other),
        }
    }

    /// The host action id.
    pub fn id(self) -> i32 {
        match self {
            HostAction::Focus => ACTION_FOCUS,
            HostAction::ClearFocus => ACTION_CLEAR_FOCUS,
            HostAction::Select => ACTION_SELECT,
            HostAction::ClearSelection => ACTION_CLEAR_SELECTION,
            HostAction::Click => ACTION_CLICK,
            HostAction::LongClick => ACTION_LONG_CLICK,
            HostAction::AccessibilityFocus => ACTION_ACCESSIBILITY_FOCUS,
            HostAction::ClearAccessibilityFocus => ACTION_CLEAR_ACCESSIBILITY_FOCUS,
            HostAction::NextAtMovementGranularity => ACTION_NEXT_AT_MOVEMENT_GRANULARITY,
            HostAction::PreviousAtMovementGranularity => ACTION_PREVIOUS_AT_MOVEMENT_GRANULARITY,
            HostAction::ScrollForward => ACTION_SCROLL_FORWARD,
            HostAction::ScrollBackward => ACTION_SCROLL_BACKWARD,
            HostAction::Copy => ACTION_COPY,
            HostAction::Paste => ACTION_PASTE,
            HostAction::Cut => ACTION_CUT,
            HostAction::SetSelection => ACTION_SET_SELECTION,
            HostAction::Dismiss => ACTION_DISMISS,
            HostAction::ShowOnScreen => ACTION_SHOW_ON_SCREEN,
            HostAction::Other(id) => id,
        }
    }
}

impl From<i32> for HostAction {
    fn from(id: i32) -> Self {
        HostAction::from_id(id)
    }
}

/// Unit of cursor movement requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementGranularity {
    Character,
    Word,
    Line,
    Paragraph,
    Page,
}

impl MovementGranularity {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(MovementGranularity::Character),
            2 => Some(MovementGranularity::Word),
            4 => Some(MovementGranularity::Line),
            8 => Some(MovementGranularity::Paragraph),
            16 => Some(MovementGranularity::Page),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            MovementGranularity::Character => 1,
            MovementGranularity::Word => 2,
            MovementGranularity::Line => 4,
            MovementGranularity::Paragraph => 8,
            MovementGranularity::Page => 16,
        }
    }
}

/// Arguments accompanying a host action request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionArguments {
    pub movement_granularity: Option<MovementGranularity>,
    pub extend_selection: bool,
    pub selection_start: Option<i32>,
    pub selection_end: Option<i32>,
}

impl ActionArguments {
    /// Arguments for a cursor movement.
    pub fn movement(granularity: MovementGranularity, extend_selection: bool) -> Self {
        Self {
            movement_granularity: Some(granularity),
            extend_selection,
            ..Default::default()
        }
    }

    /// Arguments for an explicit selection.
    pub fn selection(start: i32, end: i32) -> Self {
        Self {
            selection_start: Some(start),
            selection_end: Some(end),
            ..Default::default()
        }
    }
}

/// Which focus the host asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusType {
    Input,
    Accessibility,
}

/// Hover phase reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverAction {
    Enter,
    Move,
    Exit,
    /// Any other pointer action; ignored.
    Other(i32),
}

/// Arguments sent to the engine along with a semantics action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionArgs {
    /// Cursor movements: whether to extend the selection.
    ExtendSelection(bool),
    /// Set-selection: the new selection bounds.
    Selection { base: i32, extent: i32 },
    /// Custom actions: the custom action's own id.
    CustomAction(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_action_ids() {
        assert_eq!(HostAction::from_id(16), HostAction::Click);
        assert_eq!(HostAction::from_id(16_908_342), HostAction::ShowOnScreen);
        assert_eq!(HostAction::Click.id(), ACTION_CLICK);

        let custom = FIRST_HOST_ACTION_ID + 4;
        assert_eq!(HostAction::from_id(custom), HostAction::Other(custom));
        assert_eq!(HostAction::Other(custom).id(), custom);
    }

    #[test]
    fn test_granularity_ids() {
        assert_eq!(MovementGranularity::from_id(2), Some(MovementGranularity::Word));
        assert_eq!(MovementGranularity::from_id(3), None);
        assert_eq!(MovementGranularity::Page.id(), 16);
    }
}
