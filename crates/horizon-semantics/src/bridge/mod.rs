//! The accessibility bridge.
//!
//! [`AccessibilityBridge`] owns the semantics cache and sits between the
//! engine and the host's accessibility service:
//!
//! - the engine pushes tree updates through [`apply_update`] and
//!   [`apply_custom_action_update`], and channel messages through
//!   [`handle_channel_message`];
//! - the host queries nodes and requests actions through the
//!   [`AccessibilityNodeProvider`] implementation;
//! - host state changes arrive through the `on_*_changed` methods.
//!
//! Every call must come from the thread that created the bridge.
//!
//! [`apply_update`]: AccessibilityBridge::apply_update
//! [`apply_custom_action_update`]: AccessibilityBridge::apply_custom_action_update
//! [`handle_channel_message`]: AccessibilityBridge::handle_channel_message

mod channel;
mod fault;

pub use channel::ChannelMessage;
pub use fault::{Fault, FaultHandler};

use horizon_semantics_core::logging::{span_names, targets};
use horizon_semantics_core::{
    BridgeConfig, BridgeResult, PerfSpan, ThreadAffinity, TreeFormatOptions,
};
use horizon_semantics_geometry::{Point, Transform3D};

use crate::host::{
    AccessibilityChangeListener, AccessibilityNodeProvider, ActionArgs, ActionArguments,
    FocusType, HOST_VIEW_ID, HostAccessibilityService, HostAction, HostEvent, HostEventKind,
    HoverAction, NodeInfo, SemanticsEngine,
};
use crate::semantics::{
    AccessibilityFeatures, Dispatch, EventSynthesizer, FocusTracker, NodeId, RouteTracker,
    SemanticsAction, SemanticsTree, SemanticsTreeDebug, decode_custom_actions, decode_nodes,
    resolve_action,
};

use fault::FaultBoundary;

/// Bridge between a UI engine's semantics tree and a host accessibility
/// service.
pub struct AccessibilityBridge {
    engine: Box<dyn SemanticsEngine>,
    host: Box<dyn HostAccessibilityService>,
    config: BridgeConfig,
    tree: SemanticsTree,
    focus: FocusTracker,
    routes: RouteTracker,
    synthesizer: EventSynthesizer,
    root_transform: Transform3D,
    features: AccessibilityFeatures,
    listener: Option<AccessibilityChangeListener>,
    faults: FaultBoundary,
    affinity: ThreadAffinity,
}

impl std::fmt::Debug for AccessibilityBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessibilityBridge")
            .field("nodes", &self.tree.len())
            .field("focus", &self.focus)
            .field("active_route", &self.routes.active_route())
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

impl AccessibilityBridge {
    /// Create a bridge and sync it with the host's current state.
    ///
    /// Semantics are enabled on the engine if the host's accessibility
    /// service is on, and the accessible-navigation feature follows touch
    /// exploration.
    pub fn new(
        engine: Box<dyn SemanticsEngine>,
        host: Box<dyn HostAccessibilityService>,
        config: BridgeConfig,
    ) -> Self {
        let mut bridge = Self {
            engine,
            host,
            synthesizer: EventSynthesizer::from_config(&config),
            config,
            tree: SemanticsTree::new(),
            focus: FocusTracker::new(),
            routes: RouteTracker::new(),
            root_transform: Transform3D::IDENTITY,
            features: AccessibilityFeatures::default(),
            listener: None,
            faults: FaultBoundary::default(),
            affinity: ThreadAffinity::current(),
        };

        let accessibility_enabled = bridge.accessibility_enabled();
        bridge.on_accessibility_state_changed(accessibility_enabled);
        let touch_exploration = bridge.touch_exploration_enabled();
        bridge.on_touch_exploration_state_changed(touch_exploration);

        tracing::debug!(
            target: targets::BRIDGE,
            accessibility_enabled,
            touch_exploration,
            "created accessibility bridge"
        );
        bridge
    }

    /// The semantics cache.
    pub fn tree(&self) -> &SemanticsTree {
        &self.tree
    }

    /// Focus and hover state.
    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Accessibility features last sent to the engine.
    pub fn features(&self) -> AccessibilityFeatures {
        self.features
    }

    /// The route announced last.
    pub fn active_route(&self) -> NodeId {
        self.routes.active_route()
    }

    pub fn root_transform(&self) -> Transform3D {
        self.root_transform
    }

    /// Position the root within the host view and re-resolve geometry.
    pub fn set_root_transform(&mut self, transform: Transform3D) {
        self.check_thread();
        self.root_transform = transform;
        self.tree.mark_dirty(NodeId::ROOT);
        self.tree.resolve_geometry(&transform);
    }

    /// Replace the fault handler. The default logs each fault at error level.
    pub fn set_fault_handler(&mut self, handler: impl FnMut(&Fault) + 'static) {
        self.faults.set_handler(Box::new(handler));
    }

    /// Register the listener told about accessibility and touch exploration
    /// state changes, as `(accessibility_enabled, touch_exploration_enabled)`.
    pub fn set_accessibility_change_listener(&mut self, listener: impl FnMut(bool, bool) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_accessibility_change_listener(&mut self) {
        self.listener = None;
    }

    /// Apply a semantics update from the engine.
    ///
    /// The buffer is fully decoded before anything is applied; a malformed
    /// buffer leaves the cache untouched.
    pub fn apply_update<S: AsRef<str>>(&mut self, buffer: &[u8], strings: &[S]) -> BridgeResult<()> {
        self.check_thread();
        let _span = PerfSpan::new(span_names::UPDATE);

        let records = decode_nodes(buffer, strings)?;
        let outcome = self.tree.apply_update(records, &self.root_transform);

        for &(id, focused) in &outcome.input_focus {
            self.focus.report_input_focus(id, focused);
        }

        let mut events = Vec::new();
        if let Some(route) = self.routes.update(self.tree.collect_routes()) {
            let text = self.tree.route_name(route);
            tracing::debug!(target: targets::BRIDGE, ?route, ?text, "route changed");
            events.push(HostEvent::new(route, HostEventKind::WindowStateChanged { text }));
        }
        events.extend(outcome.evicted.iter().filter_map(|&id| self.focus.forget(id)));
        events.push(HostEvent::root_content_changed());
        for &id in &outcome.updated {
            events.extend(self.synthesizer.node_events(&self.tree, id, &self.focus));
        }
        self.send_events(events);

        if self.config.log_tree {
            let dump = SemanticsTreeDebug::with_options(TreeFormatOptions::with_style(
                self.config.tree_style,
            ))
            .format_tree(&self.tree);
            tracing::debug!(target: targets::TREE, "\n{dump}");
        }
        Ok(())
    }

    /// Apply custom action definitions from the engine.
    pub fn apply_custom_action_update<S: AsRef<str>>(
        &mut self,
        buffer: &[u8],
        strings: &[S],
    ) -> BridgeResult<()> {
        self.check_thread();
        let _span = PerfSpan::new(span_names::CUSTOM_ACTIONS);

        let records = decode_custom_actions(buffer, strings)?;
        tracing::debug!(target: targets::BRIDGE, count = records.len(), "applying custom actions");
        self.tree.apply_custom_actions(records);
        Ok(())
    }

    /// Drop the whole cache, e.g. after the engine restarts.
    pub fn reset(&mut self) {
        self.check_thread();
        self.tree.clear();
        self.routes.reset();
        let mut events: Vec<HostEvent> = self.focus.reset().into_iter().collect();
        events.push(HostEvent::root_content_changed());
        self.send_events(events);
        tracing::debug!(target: targets::BRIDGE, "reset semantics cache");
    }

    /// Describe a node for the host. [`HOST_VIEW_ID`] describes the host
    /// view.
    pub fn create_node_info(&self, id: NodeId) -> Option<NodeInfo> {
        self.check_thread();
        if id == HOST_VIEW_ID {
            return Some(NodeInfo::host_view(self.tree.contains(NodeId::ROOT)));
        }
        NodeInfo::from_tree(&self.tree, &self.focus, id)
    }

    /// Handle a message the engine sends over the accessibility channel.
    ///
    /// Ignored while the host's accessibility service is off.
    pub fn handle_channel_message(&mut self, message: ChannelMessage) {
        self.check_thread();
        if !self.accessibility_enabled() {
            tracing::trace!(target: targets::BRIDGE, ?message, "accessibility off; dropping message");
            return;
        }
        let event = match message {
            ChannelMessage::Announce { message } => {
                HostEvent::new(NodeId::ROOT, HostEventKind::Announcement { message })
            }
            ChannelMessage::Tap { id } => HostEvent::new(id, HostEventKind::ViewClicked),
            ChannelMessage::LongPress { id } => HostEvent::new(id, HostEventKind::ViewLongClicked),
            ChannelMessage::Tooltip { message } => HostEvent::new(
                NodeId::ROOT,
                HostEventKind::WindowStateChanged {
                    text: Some(message),
                },
            ),
        };
        self.send_events([event]);
    }

    /// The host's accessibility service was turned on or off.
    pub fn on_accessibility_state_changed(&mut self, enabled: bool) {
        self.check_thread();
        let engine = &mut self.engine;
        self.faults.run("engine.set_semantics_enabled", || {
            engine.set_semantics_enabled(enabled)
        });
        let touch_exploration = self.touch_exploration_enabled();
        self.notify_listener(enabled, touch_exploration);
    }

    /// Touch exploration was turned on or off.
    pub fn on_touch_exploration_state_changed(&mut self, enabled: bool) {
        self.check_thread();
        if !enabled {
            let exit = self.focus.hover_exit();
            self.send_events(exit);
        }
        self.features
            .set(AccessibilityFeatures::ACCESSIBLE_NAVIGATION, enabled);
        self.send_features();
        let accessibility_enabled = self.accessibility_enabled();
        self.notify_listener(accessibility_enabled, enabled);
    }

    /// The host's animation scale changed. A scale of zero disables
    /// animations.
    pub fn on_animation_scale_changed(&mut self, scale: f32) {
        self.check_thread();
        self.features
            .set(AccessibilityFeatures::DISABLE_ANIMATIONS, scale == 0.0);
        self.send_features();
    }

    fn check_thread(&self) {
        if self.config.enforce_thread_affinity {
            self.affinity.check("AccessibilityBridge");
        } else {
            self.affinity.debug_check("AccessibilityBridge");
        }
    }

    fn accessibility_enabled(&mut self) -> bool {
        let host = &self.host;
        self.faults
            .run("host.is_accessibility_enabled", || host.is_accessibility_enabled())
            .unwrap_or(false)
    }

    fn touch_exploration_enabled(&mut self) -> bool {
        let host = &self.host;
        self.faults
            .run("host.is_touch_exploration_enabled", || {
                host.is_touch_exploration_enabled()
            })
            .unwrap_or(false)
    }

    fn send_events(&mut self, events: impl IntoIterator<Item = HostEvent>) {
        let mut events = events.into_iter().peekable();
        if events.peek().is_none() {
            return;
        }
        if !self.accessibility_enabled() {
            tracing::trace!(target: targets::EVENTS, "accessibility off; dropping events");
            return;
        }
        for event in events {
            tracing::trace!(target: targets::EVENTS, source = ?event.source, kind = ?event.kind, "sending event");
            let host = &mut self.host;
            self.faults.run("host.send_event", || host.send_event(event));
        }
    }

    fn send_features(&mut self) {
        let engine = &mut self.engine;
        let features = self.features;
        self.faults.run("engine.set_accessibility_features", || {
            engine.set_accessibility_features(features)
        });
    }

    fn notify_listener(&mut self, accessibility_enabled: bool, touch_exploration: bool) {
        if let Some(listener) = self.listener.as_mut() {
            self.faults.run("accessibility_change_listener", || {
                listener(accessibility_enabled, touch_exploration)
            });
        }
    }

    /// Send an action to the engine. Returns `false` if the engine panicked.
    fn dispatch(&mut self, id: NodeId, action: SemanticsAction, args: Option<ActionArgs>) -> bool {
        tracing::debug!(target: targets::DISPATCH, ?id, ?action, ?args, "dispatching action");
        let engine = &mut self.engine;
        self.faults
            .run("engine.dispatch_action", || {
                engine.dispatch_action(id, action, args)
            })
            .is_some()
    }

    fn adjust(&mut self, id: NodeId, action: SemanticsAction) -> bool {
        let Some(node) = self.tree.get_mut(id) else {
            return false;
        };
        let value = if action == SemanticsAction::Increase {
            node.increased_value.clone()
        } else {
            node.decreased_value.clone()
        };
        node.value = value.clone();
        self.send_events([HostEvent::new(
            id,
            HostEventKind::ViewSelected { text: value },
        )]);
        self.dispatch(id, action, None)
    }

    fn gain_accessibility_focus(&mut self, id: NodeId) -> bool {
        let dispatched = self.dispatch(id, SemanticsAction::DidGainAccessibilityFocus, None);
        let mut events = self.focus.set_accessibility_focus(id);
        if let Some(node) = self.tree.get(id)
            && (node.has_action(SemanticsAction::Increase)
                || node.has_action(SemanticsAction::Decrease))
        {
            events.push(HostEvent::new(
                id,
                HostEventKind::ViewSelected {
                    text: node.value().map(str::to_owned),
                },
            ));
        }
        self.send_events(events);
        dispatched
    }

    fn clear_accessibility_focus(&mut self, id: NodeId) -> bool {
        let dispatched = self.dispatch(id, SemanticsAction::DidLoseAccessibilityFocus, None);
        let event = self.focus.clear_accessibility_focus(id);
        self.send_events([event]);
        dispatched
    }
}

impl AccessibilityNodeProvider for AccessibilityBridge {
    fn provide_node_info(&self, id: NodeId) -> Option<NodeInfo> {
        self.create_node_info(id)
    }

    fn perform_action(&mut self, id: NodeId, action: i32, args: &ActionArguments) -> bool {
        self.check_thread();
        let _span = PerfSpan::new(span_names::ACTION);

        let Some(node) = self.tree.get(id) else {
            tracing::debug!(target: targets::DISPATCH, ?id, action, "action on unknown node");
            return false;
        };
        match resolve_action(&self.tree, node, HostAction::from_id(action), args) {
            Dispatch::Unhandled => false,
            Dispatch::Forward { action, args } => {
                if let Some(ActionArgs::Selection { base, extent }) = args
                    && let Some(node) = self.tree.get_mut(id)
                {
                    node.text_selection_base = base;
                    node.text_selection_extent = extent;
                }
                self.dispatch(id, action, args)
            }
            Dispatch::Adjust(action) => self.adjust(id, action),
            Dispatch::GainAccessibilityFocus => self.gain_accessibility_focus(id),
            Dispatch::ClearAccessibilityFocus => self.clear_accessibility_focus(id),
        }
    }

    fn find_focus(&self, focus: FocusType) -> Option<NodeInfo> {
        self.check_thread();
        let input = match focus {
            FocusType::Input => self.focus.input_focused(),
            FocusType::Accessibility => None,
        };
        input
            .and_then(|id| self.create_node_info(id))
            .or_else(|| {
                self.focus
                    .accessibility_focused()
                    .and_then(|id| self.create_node_info(id))
            })
    }

    fn on_hover_event(&mut self, point: Point, action: HoverAction) -> bool {
        self.check_thread();
        let _span = PerfSpan::new(span_names::HOVER);

        if !self.touch_exploration_enabled() {
            return false;
        }
        match action {
            HoverAction::Enter | HoverAction::Move => {
                let target = self.tree.hit_test(point);
                let events = self.focus.hover_to(target);
                self.send_events(events);
                true
            }
            HoverAction::Exit => {
                let exit = self.focus.hover_exit();
                self.send_events(exit);
                true
            }
            HoverAction::Other(code) => {
                tracing::trace!(target: targets::BRIDGE, code, "ignoring pointer action");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::semantics::{NodeRecord, SemanticsUpdateBuilder};

    #[derive(Default)]
    struct Log {
        dispatched: Vec<(NodeId, SemanticsAction, Option<ActionArgs>)>,
        features: Vec<AccessibilityFeatures>,
        semantics_enabled: Vec<bool>,
        events: Vec<HostEvent>,
    }

    struct Engine(Rc<RefCell<Log>>);

    impl SemanticsEngine for Engine {
        fn dispatch_action(&mut self, id: NodeId, action: SemanticsAction, args: Option<ActionArgs>) {
            self.0.borrow_mut().dispatched.push((id, action, args));
        }

        fn set_accessibility_features(&mut self, features: AccessibilityFeatures) {
            self.0.borrow_mut().features.push(features);
        }

        fn set_semantics_enabled(&mut self, enabled: bool) {
            self.0.borrow_mut().semantics_enabled.push(enabled);
        }
    }

    struct Host {
        log: Rc<RefCell<Log>>,
        enabled: bool,
    }

    impl HostAccessibilityService for Host {
        fn is_accessibility_enabled(&self) -> bool {
            self.enabled
        }

        fn is_touch_exploration_enabled(&self) -> bool {
            self.enabled
        }

        fn send_event(&mut self, event: HostEvent) {
            self.log.borrow_mut().events.push(event);
        }
    }

    fn bridge(enabled: bool) -> (AccessibilityBridge, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let bridge = AccessibilityBridge::new(
            Box::new(Engine(log.clone())),
            Box::new(Host {
                log: log.clone(),
                enabled,
            }),
            BridgeConfig::default(),
        );
        (bridge, log)
    }

    fn update(bridge: &mut AccessibilityBridge, records: &[NodeRecord]) {
        let mut builder = SemanticsUpdateBuilder::new();
        for record in records {
            builder.add_node(record);
        }
        let encoded = builder.build();
        bridge.apply_update(&encoded.nodes, &encoded.strings).unwrap();
    }

    #[test]
    fn test_construction_syncs_host_state() {
        let (bridge, log) = bridge(true);
        let log = log.borrow();
        assert_eq!(log.semantics_enabled, vec![true]);
        assert_eq!(
            log.features.last().copied(),
            Some(bridge.features())
        );
        assert!(bridge.features().contains(AccessibilityFeatures::ACCESSIBLE_NAVIGATION));
    }

    #[test]
    fn test_events_dropped_while_disabled() {
        let (mut bridge, log) = bridge(false);
        update(&mut bridge, &[NodeRecord::new(0)]);
        bridge.handle_channel_message(ChannelMessage::Announce {
            message: "hello".to_owned(),
        });
        assert!(log.borrow().events.is_empty());
        assert_eq!(bridge.tree().len(), 1);
    }

    #[test]
    fn test_malformed_update_keeps_cache() {
        let (mut bridge, log) = bridge(true);
        update(&mut bridge, &[NodeRecord::new(0).with_label("Home")]);
        let before = log.borrow().events.len();

        let result = bridge.apply_update(&[1, 0, 0], &[] as &[&str]);

        assert!(result.is_err());
        assert_eq!(bridge.tree().len(), 1);
        assert_eq!(log.borrow().events.len(), before);
    }

    #[test]
    fn test_reset_clears_focus() {
        let (mut bridge, log) = bridge(true);
        update(&mut bridge, &[NodeRecord::new(0)]);
        assert!(bridge.perform_action(NodeId::ROOT, crate::host::ACTION_ACCESSIBILITY_FOCUS, &ActionArguments::default()));
        log.borrow_mut().events.clear();

        bridge.reset();

        assert!(bridge.tree().is_empty());
        assert_eq!(bridge.focus().accessibility_focused(), None);
        assert_eq!(
            log.borrow().events,
            vec![
                HostEvent::new(NodeId::ROOT, HostEventKind::AccessibilityFocusCleared),
                HostEvent::root_content_changed(),
            ]
        );
    }

    #[test]
    fn test_tree_logged_after_update() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut bridge = AccessibilityBridge::new(
            Box::new(Engine(log.clone())),
            Box::new(Host {
                log: log.clone(),
                enabled: true,
            }),
            BridgeConfig {
                log_tree: true,
                ..BridgeConfig::default()
            },
        );
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            update(&mut bridge, &[NodeRecord::new(0).with_children([1]), NodeRecord::new(1).with_label("Play")]);
        });

        assert_eq!(bridge.tree().len(), 2);
        assert_eq!(log.borrow().events, vec![HostEvent::root_content_changed()]);
    }

    #[test]
    fn test_animation_scale() {
        let (mut bridge, _log) = bridge(true);
        bridge.on_animation_scale_changed(0.0);
        assert!(bridge.features().contains(AccessibilityFeatures::DISABLE_ANIMATIONS));
        bridge.on_animation_scale_changed(1.0);
        assert!(!bridge.features().contains(AccessibilityFeatures::DISABLE_ANIMATIONS));
    }

    #[test]
    fn test_host_view_info() {
        let (mut bridge, _log) = bridge(true);
        assert!(bridge.create_node_info(HOST_VIEW_ID).unwrap().children.is_empty());
        update(&mut bridge, &[NodeRecord::new(0)]);
        assert_eq!(
            bridge.create_node_info(HOST_VIEW_ID).unwrap().children,
            vec![NodeId::ROOT]
        );
    }
}
