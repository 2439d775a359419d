//! Tracing targets, span names and the tree dump layout.
//!
//! Every layer of the bridge logs under its own target so a host can turn
//! on one subsystem at a time, e.g. with `tracing_subscriber`:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_semantics::decoder=trace,horizon_semantics::events=debug")
//!     .init();
//! ```

use serde::{Deserialize, Serialize};

/// Names recorded on [`PerfSpan`]s.
pub mod span_names {
    /// One full semantics update cycle.
    pub const UPDATE: &str = "horizon_semantics::update";
    /// Custom action registry update.
    pub const CUSTOM_ACTIONS: &str = "horizon_semantics::custom_actions";
    /// Host action dispatch.
    pub const ACTION: &str = "horizon_semantics::action";
    /// Hover / touch exploration.
    pub const HOVER: &str = "horizon_semantics::hover";
}

/// `tracing` targets, one per subsystem.
pub mod targets {
    pub const BRIDGE: &str = "horizon_semantics::bridge";
    /// Wire buffer decoding.
    pub const DECODER: &str = "horizon_semantics::decoder";
    /// The node cache and its debug dump.
    pub const TREE: &str = "horizon_semantics::tree";
    /// Transform resolution and hit testing.
    pub const GEOMETRY: &str = "horizon_semantics::geometry";
    /// Events sent to the host.
    pub const EVENTS: &str = "horizon_semantics::events";
    pub const DISPATCH: &str = "horizon_semantics::dispatch";
    pub const PERF: &str = "horizon_semantics::perf";
}

/// Branch characters used by the tree dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStyle {
    /// `+--` and `` `-- ``.
    Ascii,
    /// Box-drawing characters.
    #[default]
    Unicode,
    /// Plain `- ` bullets with properties on the node line.
    Compact,
}

/// What the tree dump prints and how it lays it out.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    pub show_ids: bool,
    /// Print each node's rect and transform.
    pub show_geometry: bool,
    /// Print flags and actions.
    pub show_properties: bool,
    /// Stop descending below this depth.
    pub max_depth: Option<usize>,
    /// Spaces per level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_geometry: false,
            show_properties: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Everything, geometry included.
    pub fn detailed() -> Self {
        Self {
            show_geometry: true,
            ..Default::default()
        }
    }

    /// Labels and structure only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_geometry: false,
            show_properties: false,
            ..Default::default()
        }
    }

    pub fn with_style(style: TreeStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    /// Prefix for the line of a node at `depth`.
    pub fn node_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last) = match self.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => (
                "\u{2502}",
                "\u{251c}\u{2500}\u{2500} ",
                "\u{2514}\u{2500}\u{2500} ",
            ),
            TreeStyle::Compact => ("", "- ", "- "),
        };

        let mut prefix = self.indent(depth - 1, branch);
        prefix.push_str(if is_last { last } else { corner });
        prefix
    }

    /// Prefix for the detail lines under a node at `depth`.
    pub fn detail_prefix(&self, depth: usize) -> String {
        let branch = match self.style {
            TreeStyle::Ascii => "|",
            TreeStyle::Unicode => "\u{2502}",
            TreeStyle::Compact => "",
        };
        self.indent(depth, branch)
    }

    fn indent(&self, levels: usize, branch: &str) -> String {
        let unit = format!("{branch}{:width$}", "", width = self.indent_size);
        unit.repeat(levels)
    }
}

/// Keeps a `perf` span entered for the guard's lifetime, so subscribers
/// that record span timings see how long the operation took.
#[derive(Debug)]
pub struct PerfSpan {
    _entered: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(operation: &'static str) -> Self {
        Self {
            _entered: tracing::info_span!(target: targets::PERF, "perf", operation).entered(),
        }
    }
}
