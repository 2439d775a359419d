//! Semantics flags, actions and accessibility features.
//!
//! All three are bit sets whose bit positions are part of the wire protocol
//! shared with the engine. Unknown bits are retained so a newer engine does
//! not lose information passing through an older bridge.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

macro_rules! bit_set_ops {
    ($name:ident) => {
        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self::Output {
                $name(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self::Output {
                $name(self.0 & rhs.0)
            }
        }
    };
}

/// Boolean properties of a semantics node.
///
/// # Example
///
/// ```
/// use horizon_semantics::SemanticsFlags;
///
/// let flags = SemanticsFlags::IS_BUTTON | SemanticsFlags::IS_ENABLED;
/// assert!(flags.contains(SemanticsFlags::IS_BUTTON));
/// assert!(!flags.contains(SemanticsFlags::IS_HIDDEN));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SemanticsFlags(u32);

impl SemanticsFlags {
    /// No flags.
    pub const NONE: SemanticsFlags = SemanticsFlags(0);
    pub const HAS_CHECKED_STATE: SemanticsFlags = SemanticsFlags(1 << 0);
    pub const IS_CHECKED: SemanticsFlags = SemanticsFlags(1 << 1);
    pub const IS_SELECTED: SemanticsFlags = SemanticsFlags(1 << 2);
    pub const IS_BUTTON: SemanticsFlags = SemanticsFlags(1 << 3);
    pub const IS_TEXT_FIELD: SemanticsFlags = SemanticsFlags(1 << 4);
    /// The node holds input focus.
    pub const IS_FOCUSED: SemanticsFlags = SemanticsFlags(1 << 5);
    pub const HAS_ENABLED_STATE: SemanticsFlags = SemanticsFlags(1 << 6);
    pub const IS_ENABLED: SemanticsFlags = SemanticsFlags(1 << 7);
    pub const IS_IN_MUTUALLY_EXCLUSIVE_GROUP: SemanticsFlags = SemanticsFlags(1 << 8);
    pub const IS_HEADER: SemanticsFlags = SemanticsFlags(1 << 9);
    /// Text content must not be read out (passwords).
    pub const IS_OBSCURED: SemanticsFlags = SemanticsFlags(1 << 10);
    /// The node is the root of a route.
    pub const SCOPES_ROUTE: SemanticsFlags = SemanticsFlags(1 << 11);
    /// The node's label names the enclosing route.
    pub const NAMES_ROUTE: SemanticsFlags = SemanticsFlags(1 << 12);
    /// Cached but not exposed to the host.
    pub const IS_HIDDEN: SemanticsFlags = SemanticsFlags(1 << 13);
    pub const IS_IMAGE: SemanticsFlags = SemanticsFlags(1 << 14);
    pub const IS_LIVE_REGION: SemanticsFlags = SemanticsFlags(1 << 15);
    pub const HAS_TOGGLED_STATE: SemanticsFlags = SemanticsFlags(1 << 16);
    pub const IS_TOGGLED: SemanticsFlags = SemanticsFlags(1 << 17);
    /// The node scrolls without explicit scroll actions (lists, grids).
    pub const HAS_IMPLICIT_SCROLLING: SemanticsFlags = SemanticsFlags(1 << 18);

    const NAMES: [(SemanticsFlags, &'static str); 19] = [
        (Self::HAS_CHECKED_STATE, "hasCheckedState"),
        (Self::IS_CHECKED, "isChecked"),
        (Self::IS_SELECTED, "isSelected"),
        (Self::IS_BUTTON, "isButton"),
        (Self::IS_TEXT_FIELD, "isTextField"),
        (Self::IS_FOCUSED, "isFocused"),
        (Self::HAS_ENABLED_STATE, "hasEnabledState"),
        (Self::IS_ENABLED, "isEnabled"),
        (Self::IS_IN_MUTUALLY_EXCLUSIVE_GROUP, "isInMutuallyExclusiveGroup"),
        (Self::IS_HEADER, "isHeader"),
        (Self::IS_OBSCURED, "isObscured"),
        (Self::SCOPES_ROUTE, "scopesRoute"),
        (Self::NAMES_ROUTE, "namesRoute"),
        (Self::IS_HIDDEN, "isHidden"),
        (Self::IS_IMAGE, "isImage"),
        (Self::IS_LIVE_REGION, "isLiveRegion"),
        (Self::HAS_TOGGLED_STATE, "hasToggledState"),
        (Self::IS_TOGGLED, "isToggled"),
        (Self::HAS_IMPLICIT_SCROLLING, "hasImplicitScrolling"),
    ];

    /// Create from raw wire bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        SemanticsFlags(bits)
    }

    /// The raw wire bits.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Check if every flag in `flags` is set.
    #[inline]
    pub const fn contains(&self, flags: SemanticsFlags) -> bool {
        (self.0 & flags.0) == flags.0
    }

    /// Check if any flag in `flags` is set.
    #[inline]
    pub const fn intersects(&self, flags: SemanticsFlags) -> bool {
        (self.0 & flags.0) != 0
    }

    /// Check if no flag is set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Set or clear `flags`.
    #[inline]
    pub fn set(&mut self, flags: SemanticsFlags, value: bool) {
        if value {
            self.0 |= flags.0;
        } else {
            self.0 &= !flags.0;
        }
    }

    /// Names of the known flags that are set.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

bit_set_ops!(SemanticsFlags);

impl fmt::Debug for SemanticsFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// A single action the engine can perform on a node.
///
/// The discriminant is the action's wire bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SemanticsAction {
    Tap = 1 << 0,
    LongPress = 1 << 1,
    ScrollLeft = 1 << 2,
    ScrollRight = 1 << 3,
    ScrollUp = 1 << 4,
    ScrollDown = 1 << 5,
    Increase = 1 << 6,
    Decrease = 1 << 7,
    ShowOnScreen = 1 << 8,
    MoveCursorForwardByCharacter = 1 << 9,
    MoveCursorBackwardByCharacter = 1 << 10,
    SetSelection = 1 << 11,
    Copy = 1 << 12,
    Cut = 1 << 13,
    Paste = 1 << 14,
    DidGainAccessibilityFocus = 1 << 15,
    DidLoseAccessibilityFocus = 1 << 16,
    CustomAction = 1 << 17,
    Dismiss = 1 << 18,
    MoveCursorForwardByWord = 1 << 19,
    MoveCursorBackwardByWord = 1 << 20,
}

impl SemanticsAction {
    const ALL: [SemanticsAction; 21] = [
        Self::Tap,
        Self::LongPress,
        Self::ScrollLeft,
        Self::ScrollRight,
        Self::ScrollUp,
        Self::ScrollDown,
        Self::Increase,
        Self::Decrease,
        Self::ShowOnScreen,
        Self::MoveCursorForwardByCharacter,
        Self::MoveCursorBackwardByCharacter,
        Self::SetSelection,
        Self::Copy,
        Self::Cut,
        Self::Paste,
        Self::DidGainAccessibilityFocus,
        Self::DidLoseAccessibilityFocus,
        Self::CustomAction,
        Self::Dismiss,
        Self::MoveCursorForwardByWord,
        Self::MoveCursorBackwardByWord,
    ];

    /// The action's wire bit.
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Look up the action carrying exactly this wire bit.
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.bits() == bits)
    }

    /// Iterate over every action.
    pub fn all() -> impl Iterator<Item = SemanticsAction> {
        Self::ALL.into_iter()
    }

    /// Whether this is one of the four directional scroll actions.
    pub fn is_scroll(self) -> bool {
        SemanticsActions::SCROLLING.contains(self)
    }
}

/// The set of actions a node supports.
///
/// # Example
///
/// ```
/// use horizon_semantics::{SemanticsAction, SemanticsActions};
///
/// let actions = SemanticsActions::from(SemanticsAction::Tap) | SemanticsAction::Increase.into();
/// assert!(actions.contains(SemanticsAction::Increase));
/// assert!(!actions.contains(SemanticsAction::ScrollUp));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SemanticsActions(u32);

impl SemanticsActions {
    /// No actions.
    pub const NONE: SemanticsActions = SemanticsActions(0);

    /// The four directional scroll actions.
    pub const SCROLLING: SemanticsActions = SemanticsActions(
        SemanticsAction::ScrollLeft.bits()
            | SemanticsAction::ScrollRight.bits()
            | SemanticsAction::ScrollUp.bits()
            | SemanticsAction::ScrollDown.bits(),
    );

    /// Create from raw wire bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        SemanticsActions(bits)
    }

    /// The raw wire bits.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Check if the set contains `action`.
    #[inline]
    pub const fn contains(&self, action: SemanticsAction) -> bool {
        (self.0 & action.bits()) != 0
    }

    /// Check if any action in `actions` is present.
    #[inline]
    pub const fn intersects(&self, actions: SemanticsActions) -> bool {
        (self.0 & actions.0) != 0
    }

    /// Check if the set is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Add an action.
    #[inline]
    pub fn insert(&mut self, action: SemanticsAction) {
        self.0 |= action.bits();
    }

    /// Remove an action.
    #[inline]
    pub fn remove(&mut self, action: SemanticsAction) {
        self.0 &= !action.bits();
    }

    /// The set without the scroll actions.
    #[inline]
    pub const fn without_scrolling(&self) -> SemanticsActions {
        SemanticsActions(self.0 & !Self::SCROLLING.0)
    }

    /// Iterate over the known actions in the set.
    pub fn iter(&self) -> impl Iterator<Item = SemanticsAction> + '_ {
        SemanticsAction::all().filter(|&action| self.contains(action))
    }
}

bit_set_ops!(SemanticsActions);

impl From<SemanticsAction> for SemanticsActions {
    fn from(action: SemanticsAction) -> Self {
        SemanticsActions(action.bits())
    }
}

impl FromIterator<SemanticsAction> for SemanticsActions {
    fn from_iter<I: IntoIterator<Item = SemanticsAction>>(iter: I) -> Self {
        let mut actions = SemanticsActions::NONE;
        for action in iter {
            actions.insert(action);
        }
        actions
    }
}

impl fmt::Debug for SemanticsActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Host accessibility features reported to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessibilityFeatures(u32);

impl AccessibilityFeatures {
    /// No features.
    pub const NONE: AccessibilityFeatures = AccessibilityFeatures(0);
    /// A screen reader or similar navigation service is exploring by touch.
    pub const ACCESSIBLE_NAVIGATION: AccessibilityFeatures = AccessibilityFeatures(1 << 0);
    /// Colors are inverted by the host.
    pub const INVERT_COLORS: AccessibilityFeatures = AccessibilityFeatures(1 << 1);
    /// The host asked for animations to be disabled.
    pub const DISABLE_ANIMATIONS: AccessibilityFeatures = AccessibilityFeatures(1 << 2);

    /// The raw wire bits.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Check if every feature in `features` is set.
    #[inline]
    pub const fn contains(&self, features: AccessibilityFeatures) -> bool {
        (self.0 & features.0) == features.0
    }

    /// Set or clear `features`.
    #[inline]
    pub fn set(&mut self, features: AccessibilityFeatures, value: bool) {
        if value {
            self.0 |= features.0;
        } else {
            self.0 &= !features.0;
        }
    }
}

bit_set_ops!(AccessibilityFeatures);

/// Reading direction of a node's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    #[default]
    Unknown,
    Rtl,
    Ltr,
}

impl TextDirection {
    /// Decode the wire value: 1 is right-to-left, 2 is left-to-right.
    pub fn from_wire(value: i32) -> Self {
        match value {
            1 => TextDirection::Rtl,
            2 => TextDirection::Ltr,
            _ => TextDirection::Unknown,
        }
    }

    /// The wire value (0 for unknown).
    pub fn to_wire(self) -> i32 {
        match self {
            TextDirection::Unknown => 0,
            TextDirection::Rtl => 1,
            TextDirection::Ltr => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits_are_wire_positions() {
        assert_eq!(SemanticsFlags::HAS_CHECKED_STATE.bits(), 1);
        assert_eq!(SemanticsFlags::IS_HIDDEN.bits(), 1 << 13);
        assert_eq!(SemanticsFlags::HAS_IMPLICIT_SCROLLING.bits(), 1 << 18);
    }

    #[test]
    fn test_flags_set_and_clear() {
        let mut flags = SemanticsFlags::IS_BUTTON;
        flags.set(SemanticsFlags::IS_ENABLED, true);
        assert!(flags.contains(SemanticsFlags::IS_BUTTON | SemanticsFlags::IS_ENABLED));
        flags.set(SemanticsFlags::IS_BUTTON, false);
        assert!(!flags.intersects(SemanticsFlags::IS_BUTTON));
        assert!(!flags.is_empty());
    }

    #[test]
    fn test_flags_debug_lists_names() {
        let flags = SemanticsFlags::IS_HEADER | SemanticsFlags::SCOPES_ROUTE;
        assert_eq!(format!("{:?}", flags), "{\"isHeader\", \"scopesRoute\"}");
    }

    #[test]
    fn test_unknown_bits_retained() {
        let flags = SemanticsFlags::from_bits(1 << 30 | 1);
        assert_eq!(flags.bits(), 1 << 30 | 1);
        assert!(flags.contains(SemanticsFlags::HAS_CHECKED_STATE));
    }

    #[test]
    fn test_action_from_bits() {
        assert_eq!(SemanticsAction::from_bits(1), Some(SemanticsAction::Tap));
        assert_eq!(
            SemanticsAction::from_bits(1 << 20),
            Some(SemanticsAction::MoveCursorBackwardByWord)
        );
        assert_eq!(SemanticsAction::from_bits(3), None);
        assert_eq!(SemanticsAction::from_bits(1 << 21), None);
    }

    #[test]
    fn test_actions_without_scrolling() {
        let actions: SemanticsActions = [SemanticsAction::ScrollUp, SemanticsAction::ScrollLeft]
            .into_iter()
            .collect();
        assert!(actions.without_scrolling().is_empty());
        assert!(SemanticsAction::ScrollDown.is_scroll());
        assert!(!SemanticsAction::Tap.is_scroll());

        let mut mixed = actions;
        mixed.insert(SemanticsAction::Tap);
        assert_eq!(
            mixed.without_scrolling(),
            SemanticsActions::from(SemanticsAction::Tap)
        );
        mixed.remove(SemanticsAction::Tap);
        assert_eq!(mixed, actions);
    }

    #[test]
    fn test_features() {
        let mut features = AccessibilityFeatures::NONE;
        features.set(AccessibilityFeatures::ACCESSIBLE_NAVIGATION, true);
        features.set(AccessibilityFeatures::DISABLE_ANIMATIONS, true);
        assert_eq!(features.bits(), 0b101);
        features.set(AccessibilityFeatures::ACCESSIBLE_NAVIGATION, false);
        assert_eq!(features, AccessibilityFeatures::DISABLE_ANIMATIONS);
    }

    #[test]
    fn test_text_direction_wire() {
        assert_eq!(TextDirection::from_wire(1), TextDirection::Rtl);
        assert_eq!(TextDirection::from_wire(2), TextDirection::Ltr);
        assert_eq!(TextDirection::from_wire(0), TextDirection::Unknown);
        assert_eq!(TextDirection::from_wire(9), TextDirection::Unknown);
        assert_eq!(TextDirection::Ltr.to_wire(), 2);
    }
}
