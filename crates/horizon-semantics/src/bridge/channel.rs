//! Messages the engine sends over its accessibility channel.

use crate::semantics::NodeId;

/// A message from the engine's accessibility channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelMessage {
    /// Speak `message` without moving focus.
    Announce { message: String },
    /// Node `id` was tapped.
    Tap { id: NodeId },
    /// Node `id` was long-pressed.
    LongPress { id: NodeId },
    /// A tooltip with `message` appeared.
    Tooltip { message: String },
}
