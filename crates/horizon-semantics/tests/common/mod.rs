//! Recording engine and host doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use horizon_semantics::{
    AccessibilityBridge, AccessibilityFeatures, ActionArgs, BridgeConfig,
    HostAccessibilityService, HostEvent, NodeId, NodeRecord, SemanticsAction, SemanticsEngine,
    SemanticsUpdateBuilder,
};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

/// Everything the bridge sent out.
#[derive(Debug, Default)]
pub struct Recording {
    pub dispatched: Vec<(NodeId, SemanticsAction, Option<ActionArgs>)>,
    pub features: Vec<AccessibilityFeatures>,
    pub semantics_enabled: Vec<bool>,
    pub events: Vec<HostEvent>,
}

/// Host switches the tests can flip.
#[derive(Debug, Clone, Copy)]
pub struct HostState {
    pub accessibility_enabled: bool,
    pub touch_exploration_enabled: bool,
}

pub struct RecordingEngine {
    recording: Arc<Mutex<Recording>>,
    panic_on_dispatch: Arc<Mutex<bool>>,
}

impl SemanticsEngine for RecordingEngine {
    fn dispatch_action(&mut self, id: NodeId, action: SemanticsAction, args: Option<ActionArgs>) {
        if *self.panic_on_dispatch.lock() {
            panic!("engine detached");
        }
        self.recording.lock().dispatched.push((id, action, args));
    }

    fn set_accessibility_features(&mut self, features: AccessibilityFeatures) {
        self.recording.lock().features.push(features);
    }

    fn set_semantics_enabled(&mut self, enabled: bool) {
        self.recording.lock().semantics_enabled.push(enabled);
    }
}

pub struct RecordingHost {
    recording: Arc<Mutex<Recording>>,
    state: Arc<Mutex<HostState>>,
}

impl HostAccessibilityService for RecordingHost {
    fn is_accessibility_enabled(&self) -> bool {
        self.state.lock().accessibility_enabled
    }

    fn is_touch_exploration_enabled(&self) -> bool {
        self.state.lock().touch_exploration_enabled
    }

    fn send_event(&mut self, event: HostEvent) {
        self.recording.lock().events.push(event);
    }
}

/// A bridge wired to recording doubles.
pub struct Harness {
    pub bridge: AccessibilityBridge,
    pub recording: Arc<Mutex<Recording>>,
    pub state: Arc<Mutex<HostState>>,
    pub panic_on_dispatch: Arc<Mutex<bool>>,
}

impl Harness {
    /// Accessibility and touch exploration both on.
    pub fn new() -> Self {
        Self::with_state(HostState {
            accessibility_enabled: true,
            touch_exploration_enabled: true,
        })
    }

    pub fn with_state(state: HostState) -> Self {
        init_tracing();
        let recording = Arc::new(Mutex::new(Recording::default()));
        let state = Arc::new(Mutex::new(state));
        let panic_on_dispatch = Arc::new(Mutex::new(false));
        let bridge = AccessibilityBridge::new(
            Box::new(RecordingEngine {
                recording: recording.clone(),
                panic_on_dispatch: panic_on_dispatch.clone(),
            }),
            Box::new(RecordingHost {
                recording: recording.clone(),
                state: state.clone(),
            }),
            BridgeConfig::default(),
        );
        Self {
            bridge,
            recording,
            state,
            panic_on_dispatch,
        }
    }

    /// Encode `records` and apply them as one update.
    pub fn update(&mut self, records: &[NodeRecord]) {
        let mut builder = SemanticsUpdateBuilder::new();
        for record in records {
            builder.add_node(record);
        }
        let update = builder.build();
        self.bridge
            .apply_update(&update.nodes, &update.strings)
            .expect("update should decode");
    }

    /// Events sent since the last call.
    pub fn take_events(&self) -> Vec<HostEvent> {
        std::mem::take(&mut self.recording.lock().events)
    }

    /// Actions dispatched since the last call.
    pub fn take_dispatched(&self) -> Vec<(NodeId, SemanticsAction, Option<ActionArgs>)> {
        std::mem::take(&mut self.recording.lock().dispatched)
    }
}

/// Route bridge logs to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
