//! Encoding of semantics update buffers.
//!
//! [`SemanticsUpdateBuilder`] is the producer side of the
//! [`decoder`](super::decoder) layout. Engines written in Rust use it to ship
//! updates to the bridge; it is also how tests describe trees.
//!
//! ```
//! use horizon_semantics::semantics::{NodeRecord, SemanticsUpdateBuilder};
//!
//! let mut builder = SemanticsUpdateBuilder::new();
//! builder.add_node(&NodeRecord::new(0).with_label("Home").with_children([1]));
//! builder.add_node(&NodeRecord::new(1).with_label("Home"));
//! let update = builder.build();
//!
//! // Repeated strings share one table entry
//! assert_eq!(update.strings, vec!["Home".to_string()]);
//! ```

use std::collections::HashMap;

use bytes::{BufMut, Bytes, BytesMut};

use super::decoder::{CustomActionRecord, NodeRecord};

/// Encoded buffers of one semantics update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodedUpdate {
    /// Node records.
    pub nodes: Bytes,
    /// Custom action records.
    pub custom_actions: Bytes,
    /// String table shared by both buffers.
    pub strings: Vec<String>,
}

/// Builds the buffers of a semantics update.
#[derive(Debug, Default)]
pub struct SemanticsUpdateBuilder {
    nodes: BytesMut,
    custom_actions: BytesMut,
    strings: Vec<String>,
    string_index: HashMap<String, i32>,
}

impl SemanticsUpdateBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node record.
    pub fn add_node(&mut self, record: &NodeRecord) -> &mut Self {
        let label = self.intern(record.label.as_deref());
        let value = self.intern(record.value.as_deref());
        let increased_value = self.intern(record.increased_value.as_deref());
        let decreased_value = self.intern(record.decreased_value.as_deref());
        let hint = self.intern(record.hint.as_deref());

        let buf = &mut self.nodes;
        buf.put_i32_le(record.id.0);
        buf.put_i32_le(record.flags.bits() as i32);
        buf.put_i32_le(record.actions.bits() as i32);
        buf.put_i32_le(record.text_selection_base);
        buf.put_i32_le(record.text_selection_extent);
        buf.put_i32_le(record.scroll_children);
        buf.put_i32_le(record.scroll_index);
        buf.put_f32_le(record.scroll_position);
        buf.put_f32_le(record.scroll_extent_max);
        buf.put_f32_le(record.scroll_extent_min);
        buf.put_i32_le(label);
        buf.put_i32_le(value);
        buf.put_i32_le(increased_value);
        buf.put_i32_le(decreased_value);
        buf.put_i32_le(hint);
        buf.put_i32_le(record.text_direction.to_wire());
        buf.put_f32_le(record.rect.left);
        buf.put_f32_le(record.rect.top);
        buf.put_f32_le(record.rect.right);
        buf.put_f32_le(record.rect.bottom);
        for v in record.transform.to_cols_array() {
            buf.put_f32_le(v);
        }

        debug_assert_eq!(
            record.children_in_traversal_order.len(),
            record.children_in_hit_test_order.len(),
            "both child orders must list the same nodes"
        );
        buf.put_i32_le(record.children_in_traversal_order.len() as i32);
        for child in &record.children_in_traversal_order {
            buf.put_i32_le(child.0);
        }
        for child in &record.children_in_hit_test_order {
            buf.put_i32_le(child.0);
        }

        buf.put_i32_le(record.custom_actions.len() as i32);
        for id in &record.custom_actions {
            buf.put_i32_le(*id);
        }
        self
    }

    /// Append a custom action definition.
    pub fn add_custom_action(&mut self, record: &CustomActionRecord) -> &mut Self {
        let label = self.intern(record.label.as_deref());
        let hint = self.intern(record.hint.as_deref());

        let buf = &mut self.custom_actions;
        buf.put_i32_le(record.id);
        buf.put_i32_le(record.override_action_id);
        buf.put_i32_le(label);
        buf.put_i32_le(hint);
        self
    }

    /// Finish the update.
    pub fn build(self) -> EncodedUpdate {
        EncodedUpdate {
            nodes: self.nodes.freeze(),
            custom_actions: self.custom_actions.freeze(),
            strings: self.strings,
        }
    }

    fn intern(&mut self, text: Option<&str>) -> i32 {
        let Some(text) = text else {
            return -1;
        };
        if let Some(&index) = self.string_index.get(text) {
            return index;
        }
        let index = self.strings.len() as i32;
        self.strings.push(text.to_owned());
        self.string_index.insert(text.to_owned(), index);
        index
    }
}
