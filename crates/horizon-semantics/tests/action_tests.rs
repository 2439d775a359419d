//! Integration tests for host requests: actions, hover, channel messages and
//! host state changes.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::Harness;
use horizon_semantics::geometry::{Point, Rect};
use horizon_semantics::host::{
    ACTION_CLICK, ACTION_LONG_CLICK, ACTION_SCROLL_BACKWARD, ACTION_SCROLL_FORWARD,
    ACTION_SET_SELECTION,
};
use horizon_semantics::{
    AccessibilityFeatures, AccessibilityNodeProvider, ActionArgs, ActionArguments,
    ChannelMessage, CustomActionRecord, FIRST_HOST_ACTION_ID, Fault, HostEvent, HostEventKind,
    HoverAction, NodeId, NodeRecord, SemanticsAction, SemanticsActions, SemanticsFlags,
    SemanticsUpdateBuilder,
};

fn screen() -> NodeRecord {
    NodeRecord::new(0).with_rect(Rect::new(0.0, 0.0, 100.0, 100.0))
}

#[test]
fn test_click_and_long_click() {
    let mut harness = Harness::new();
    let actions: SemanticsActions = [SemanticsAction::Tap, SemanticsAction::LongPress]
        .into_iter()
        .collect();
    harness.update(&[screen().with_children([1]), NodeRecord::new(1).with_actions(actions)]);

    let args = ActionArguments::default();
    assert!(harness.bridge.perform_action(NodeId(1), ACTION_CLICK, &args));
    assert!(harness.bridge.perform_action(NodeId(1), ACTION_LONG_CLICK, &args));
    assert!(!harness.bridge.perform_action(NodeId(9), ACTION_CLICK, &args));

    assert_eq!(
        harness.take_dispatched(),
        vec![
            (NodeId(1), SemanticsAction::Tap, None),
            (NodeId(1), SemanticsAction::LongPress, None),
        ]
    );
}

#[test]
fn test_slider_adjustment() {
    let mut harness = Harness::new();
    let actions: SemanticsActions = [SemanticsAction::Increase, SemanticsAction::Decrease]
        .into_iter()
        .collect();
    harness.update(&[
        screen().with_children([1]),
        NodeRecord::new(1)
            .with_actions(actions)
            .with_value("50%")
            .with_adjusted_values("60%", "40%"),
    ]);
    harness.take_events();

    let args = ActionArguments::default();
    assert!(harness.bridge.perform_action(NodeId(1), ACTION_SCROLL_FORWARD, &args));

    assert_eq!(harness.take_dispatched(), vec![(NodeId(1), SemanticsAction::Increase, None)]);
    assert_eq!(
        harness.take_events(),
        vec![HostEvent::new(
            NodeId(1),
            HostEventKind::ViewSelected {
                text: Some("60%".to_owned())
            }
        )]
    );
    assert_eq!(harness.bridge.tree().get(NodeId(1)).unwrap().value(), Some("60%"));

    assert!(harness.bridge.perform_action(NodeId(1), ACTION_SCROLL_BACKWARD, &args));
    assert_eq!(harness.bridge.tree().get(NodeId(1)).unwrap().value(), Some("40%"));
}

#[test]
fn test_unsupported_scroll_is_rejected() {
    let mut harness = Harness::new();
    harness.update(&[screen()]);
    assert!(!harness.bridge.perform_action(
        NodeId::ROOT,
        ACTION_SCROLL_FORWARD,
        &ActionArguments::default()
    ));
    assert!(harness.take_dispatched().is_empty());
}

#[test]
fn test_set_selection_updates_cache() {
    let mut harness = Harness::new();
    harness.update(&[
        screen().with_children([1]),
        NodeRecord::new(1)
            .with_flags(SemanticsFlags::IS_TEXT_FIELD)
            .with_actions(SemanticsAction::SetSelection)
            .with_value("hello world")
            .with_text_selection(0, 0),
    ]);

    assert!(harness.bridge.perform_action(
        NodeId(1),
        ACTION_SET_SELECTION,
        &ActionArguments::selection(6, 11)
    ));

    assert_eq!(
        harness.take_dispatched(),
        vec![(
            NodeId(1),
            SemanticsAction::SetSelection,
            Some(ActionArgs::Selection { base: 6, extent: 11 })
        )]
    );
    assert_eq!(harness.bridge.tree().get(NodeId(1)).unwrap().text_selection(), (6, 11));
}

#[test]
fn test_custom_action_round_trip() {
    let mut harness = Harness::new();
    let mut builder = SemanticsUpdateBuilder::new();
    builder.add_custom_action(&CustomActionRecord::new(5, "Archive"));
    let update = builder.build();
    harness
        .bridge
        .apply_custom_action_update(&update.custom_actions, &update.strings)
        .unwrap();
    harness.update(&[screen().with_children([1]), NodeRecord::new(1).with_custom_actions([5])]);

    let info = harness.bridge.provide_node_info(NodeId(1)).unwrap();
    let offered = info
        .actions
        .iter()
        .find(|action| action.id == FIRST_HOST_ACTION_ID + 5)
        .unwrap();
    assert_eq!(offered.label.as_deref(), Some("Archive"));

    let args = ActionArguments::default();
    assert!(harness.bridge.perform_action(NodeId(1), FIRST_HOST_ACTION_ID + 5, &args));
    assert!(!harness.bridge.perform_action(NodeId(1), FIRST_HOST_ACTION_ID + 6, &args));
    assert_eq!(
        harness.take_dispatched(),
        vec![(
            NodeId(1),
            SemanticsAction::CustomAction,
            Some(ActionArgs::CustomAction(5))
        )]
    );
}

#[test]
fn test_accessibility_focus_on_slider_selects() {
    let mut harness = Harness::new();
    harness.update(&[
        screen().with_children([1]),
        NodeRecord::new(1)
            .with_actions(SemanticsAction::Increase)
            .with_value("3"),
    ]);
    harness.take_events();

    let args = ActionArguments::default();
    assert!(harness.bridge.perform_action(
        NodeId(1),
        horizon_semantics::host::ACTION_ACCESSIBILITY_FOCUS,
        &args
    ));
    assert_eq!(
        harness.take_events(),
        vec![
            HostEvent::new(NodeId(1), HostEventKind::AccessibilityFocused),
            HostEvent::new(
                NodeId(1),
                HostEventKind::ViewSelected {
                    text: Some("3".to_owned())
                }
            ),
        ]
    );

    let info = harness.bridge.provide_node_info(NodeId(1)).unwrap();
    assert!(info.accessibility_focused);
    assert!(info.has_action(horizon_semantics::host::ACTION_CLEAR_ACCESSIBILITY_FOCUS));

    assert!(harness.bridge.perform_action(
        NodeId(1),
        horizon_semantics::host::ACTION_CLEAR_ACCESSIBILITY_FOCUS,
        &args
    ));
    assert_eq!(
        harness.take_dispatched(),
        vec![
            (NodeId(1), SemanticsAction::DidGainAccessibilityFocus, None),
            (NodeId(1), SemanticsAction::DidLoseAccessibilityFocus, None),
        ]
    );
    assert_eq!(harness.bridge.focus().accessibility_focused(), None);
}

#[test]
fn test_engine_panic_is_contained() {
    let mut harness = Harness::new();
    harness.update(&[screen().with_actions(SemanticsAction::Tap)]);

    let faults = Rc::new(RefCell::new(Vec::new()));
    let sink = faults.clone();
    harness
        .bridge
        .set_fault_handler(move |fault: &Fault| sink.borrow_mut().push(fault.clone()));
    *harness.panic_on_dispatch.lock() = true;

    assert!(!harness.bridge.perform_action(
        NodeId::ROOT,
        ACTION_CLICK,
        &ActionArguments::default()
    ));

    let faults = faults.borrow();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].operation, "engine.dispatch_action");
    assert_eq!(faults[0].message, "engine detached");

    *harness.panic_on_dispatch.lock() = false;
    assert!(harness.bridge.perform_action(
        NodeId::ROOT,
        ACTION_CLICK,
        &ActionArguments::default()
    ));
}

#[test]
fn test_hover_moves_between_nodes() {
    let mut harness = Harness::new();
    harness.update(&[
        screen().with_children([1, 2]),
        NodeRecord::new(1).with_rect(Rect::new(0.0, 0.0, 50.0, 100.0)),
        NodeRecord::new(2).with_rect(Rect::new(50.0, 0.0, 50.0, 100.0)),
    ]);
    harness.take_events();

    assert!(harness.bridge.on_hover_event(Point::new(10.0, 10.0), HoverAction::Enter));
    assert!(harness.bridge.on_hover_event(Point::new(20.0, 10.0), HoverAction::Move));
    assert!(harness.bridge.on_hover_event(Point::new(60.0, 10.0), HoverAction::Move));
    assert!(harness.bridge.on_hover_event(Point::new(60.0, 10.0), HoverAction::Exit));
    assert!(!harness.bridge.on_hover_event(Point::new(60.0, 10.0), HoverAction::Other(3)));

    assert_eq!(
        harness.take_events(),
        vec![
            HostEvent::new(NodeId(1), HostEventKind::HoverEnter),
            HostEvent::new(NodeId(1), HostEventKind::HoverExit),
            HostEvent::new(NodeId(2), HostEventKind::HoverEnter),
            HostEvent::new(NodeId(2), HostEventKind::HoverExit),
        ]
    );
}

#[test]
fn test_hover_ignored_without_touch_exploration() {
    let mut harness = Harness::new();
    harness.update(&[screen()]);
    harness.state.lock().touch_exploration_enabled = false;

    assert!(!harness.bridge.on_hover_event(Point::new(10.0, 10.0), HoverAction::Enter));
    assert_eq!(harness.bridge.focus().hovered(), None);
}

#[test]
fn test_channel_messages() {
    let mut harness = Harness::new();
    harness.update(&[screen().with_children([1]), NodeRecord::new(1)]);
    harness.take_events();

    harness.bridge.handle_channel_message(ChannelMessage::Announce {
        message: "Saved".to_owned(),
    });
    harness
        .bridge
        .handle_channel_message(ChannelMessage::Tap { id: NodeId(1) });
    harness
        .bridge
        .handle_channel_message(ChannelMessage::LongPress { id: NodeId(1) });
    harness.bridge.handle_channel_message(ChannelMessage::Tooltip {
        message: "Delete".to_owned(),
    });

    assert_eq!(
        harness.take_events(),
        vec![
            HostEvent::new(
                NodeId::ROOT,
                HostEventKind::Announcement {
                    message: "Saved".to_owned()
                }
            ),
            HostEvent::new(NodeId(1), HostEventKind::ViewClicked),
            HostEvent::new(NodeId(1), HostEventKind::ViewLongClicked),
            HostEvent::new(
                NodeId::ROOT,
                HostEventKind::WindowStateChanged {
                    text: Some("Delete".to_owned())
                }
            ),
        ]
    );

    harness.state.lock().accessibility_enabled = false;
    harness.bridge.handle_channel_message(ChannelMessage::Announce {
        message: "Unheard".to_owned(),
    });
    assert!(harness.take_events().is_empty());
}

#[test]
fn test_host_state_changes() {
    let mut harness = Harness::new();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    harness
        .bridge
        .set_accessibility_change_listener(move |enabled, touch| sink.borrow_mut().push((enabled, touch)));

    harness.update(&[screen()]);
    harness.bridge.on_hover_event(Point::new(5.0, 5.0), HoverAction::Enter);
    harness.take_events();

    harness.state.lock().touch_exploration_enabled = false;
    harness.bridge.on_touch_exploration_state_changed(false);
    assert_eq!(
        harness.take_events(),
        vec![HostEvent::new(NodeId::ROOT, HostEventKind::HoverExit)]
    );
    assert!(
        !harness
            .bridge
            .features()
            .contains(AccessibilityFeatures::ACCESSIBLE_NAVIGATION)
    );
    assert_eq!(
        harness.recording.lock().features.last().copied(),
        Some(harness.bridge.features())
    );

    harness.state.lock().accessibility_enabled = false;
    harness.bridge.on_accessibility_state_changed(false);

    assert_eq!(changes.borrow().as_slice(), [(true, false), (false, false)]);
    assert_eq!(harness.recording.lock().semantics_enabled, vec![true, false]);
}

#[test]
fn test_listener_panic_is_contained() {
    let mut harness = Harness::new();
    let faults = Rc::new(RefCell::new(Vec::new()));
    let sink = faults.clone();
    harness
        .bridge
        .set_fault_handler(move |fault: &Fault| sink.borrow_mut().push(fault.operation));
    harness
        .bridge
        .set_accessibility_change_listener(|_, _| panic!("listener failed"));

    harness.bridge.on_accessibility_state_changed(true);

    assert_eq!(faults.borrow().as_slice(), ["accessibility_change_listener"]);
    assert_eq!(harness.recording.lock().semantics_enabled, vec![true, true]);
}
