//! Decoding of semantics update buffers.
//!
//! An update is a flat little-endian stream of 32-bit integers and floats
//! plus a table of strings referenced by index. Each node record is laid out
//! as:
//!
//! ```text
//! id
//! flags, actions
//! textSelectionBase, textSelectionExtent
//! scrollChildren, scrollIndex                      (i32)
//! scrollPosition, scrollExtentMax, scrollExtentMin (f32)
//! label, value, increasedValue, decreasedValue, hint (string index, -1 = none)
//! textDirection
//! left, top, right, bottom                         (f32)
//! transform[16]                                    (f32, column-major)
//! childCount, traversalIds[childCount], hitTestIds[childCount]
//! customActionCount, customActionIds[customActionCount]
//! ```
//!
//! Records repeat until the buffer is exhausted. Custom action buffers hold
//! `id, overrideActionId, label, hint` records the same way.
//!
//! Decoding is a pure, single pass. Any fault aborts the whole buffer so a
//! malformed update never reaches the cache.

use bytes::Buf;
use horizon_semantics_core::DecodeError;
use horizon_semantics_core::logging::targets;
use horizon_semantics_geometry::{Rect, Transform3D};

use super::flags::{SemanticsActions, SemanticsFlags, TextDirection};
use super::node::NodeId;

/// Bytes per wire field.
const FIELD_SIZE: usize = 4;

/// Every field delivered for one node in an update.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub flags: SemanticsFlags,
    pub actions: SemanticsActions,
    pub text_selection_base: i32,
    pub text_selection_extent: i32,
    pub scroll_children: i32,
    pub scroll_index: i32,
    pub scroll_position: f32,
    pub scroll_extent_max: f32,
    pub scroll_extent_min: f32,
    pub label: Option<String>,
    pub value: Option<String>,
    pub increased_value: Option<String>,
    pub decreased_value: Option<String>,
    pub hint: Option<String>,
    pub text_direction: TextDirection,
    pub rect: Rect,
    pub transform: Transform3D,
    pub children_in_traversal_order: Vec<NodeId>,
    pub children_in_hit_test_order: Vec<NodeId>,
    pub custom_actions: Vec<i32>,
}

impl NodeRecord {
    /// A record with no flags, actions, text or children.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            flags: SemanticsFlags::NONE,
            actions: SemanticsActions::NONE,
            text_selection_base: -1,
            text_selection_extent: -1,
            scroll_children: 0,
            scroll_index: 0,
            scroll_position: f32::NAN,
            scroll_extent_max: f32::NAN,
            scroll_extent_min: f32::NAN,
            label: None,
            value: None,
            increased_value: None,
            decreased_value: None,
            hint: None,
            text_direction: TextDirection::Unknown,
            rect: Rect::ZERO,
            transform: Transform3D::IDENTITY,
            children_in_traversal_order: Vec::new(),
            children_in_hit_test_order: Vec::new(),
            custom_actions: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: SemanticsFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_actions(mut self, actions: impl Into<SemanticsActions>) -> Self {
        self.actions = actions.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Set the values shown after an increase and a decrease.
    pub fn with_adjusted_values(
        mut self,
        increased: impl Into<String>,
        decreased: impl Into<String>,
    ) -> Self {
        self.increased_value = Some(increased.into());
        self.decreased_value = Some(decreased.into());
        self
    }

    pub fn with_text_selection(mut self, base: i32, extent: i32) -> Self {
        self.text_selection_base = base;
        self.text_selection_extent = extent;
        self
    }

    /// Set the scroll position and extents.
    pub fn with_scroll(mut self, position: f32, min: f32, max: f32) -> Self {
        self.scroll_position = position;
        self.scroll_extent_min = min;
        self.scroll_extent_max = max;
        self
    }

    /// Set the scrollable child count and first visible index.
    pub fn with_scroll_children(mut self, count: i32, index: i32) -> Self {
        self.scroll_children = count;
        self.scroll_index = index;
        self
    }

    pub fn with_text_direction(mut self, direction: TextDirection) -> Self {
        self.text_direction = direction;
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    /// Set children, using the same order for traversal and hit testing.
    pub fn with_children(mut self, children: impl IntoIterator<Item = i32>) -> Self {
        self.children_in_traversal_order = children.into_iter().map(NodeId).collect();
        self.children_in_hit_test_order = self.children_in_traversal_order.clone();
        self
    }

    /// Set a distinct hit-test order. Must list the same ids as traversal.
    pub fn with_hit_test_order(mut self, children: impl IntoIterator<Item = i32>) -> Self {
        self.children_in_hit_test_order = children.into_iter().map(NodeId).collect();
        self
    }

    pub fn with_custom_actions(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.custom_actions = ids.into_iter().collect();
        self
    }
}

/// One custom action definition in a custom action update.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomActionRecord {
    pub id: i32,
    /// Wire bit of the built-in action this overrides, or -1.
    pub override_action_id: i32,
    pub label: Option<String>,
    pub hint: Option<String>,
}

impl CustomActionRecord {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            override_action_id: -1,
            label: Some(label.into()),
            hint: None,
        }
    }
}

/// Sequential reader over the wire fields of one buffer.
struct FieldReader<'a, S> {
    buf: &'a [u8],
    total: usize,
    strings: &'a [S],
}

impl<'a, S: AsRef<str>> FieldReader<'a, S> {
    fn new(buf: &'a [u8], strings: &'a [S]) -> Self {
        Self {
            buf,
            total: buf.len(),
            strings,
        }
    }

    fn offset(&self) -> usize {
        self.total - self.buf.remaining()
    }

    fn has_remaining(&self) -> bool {
        self.buf.has_remaining()
    }

    fn ensure(&self, field: &'static str, needed: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < needed {
            return Err(DecodeError::Truncated {
                field,
                offset: self.offset(),
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    fn i32(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        self.ensure(field, FIELD_SIZE)?;
        Ok(self.buf.get_i32_le())
    }

    fn f32(&mut self, field: &'static str) -> Result<f32, DecodeError> {
        self.ensure(field, FIELD_SIZE)?;
        Ok(self.buf.get_f32_le())
    }

    /// Read a length prefix for `lists` lists of that many fields.
    fn count(&mut self, field: &'static str, lists: usize) -> Result<usize, DecodeError> {
        let offset = self.offset();
        let count = self.i32(field)?;
        let count = usize::try_from(count).map_err(|_| DecodeError::NegativeCount {
            field,
            count,
            offset,
        })?;
        self.ensure(field, count.saturating_mul(lists * FIELD_SIZE))?;
        Ok(count)
    }

    fn string(&mut self, field: &'static str) -> Result<Option<String>, DecodeError> {
        let index = self.i32(field)?;
        if index == -1 {
            return Ok(None);
        }
        usize::try_from(index)
            .ok()
            .and_then(|i| self.strings.get(i))
            .map(|s| Some(s.as_ref().to_owned()))
            .ok_or(DecodeError::StringIndexOutOfRange {
                field,
                index,
                len: self.strings.len(),
            })
    }

    fn ids(&mut self, field: &'static str, count: usize) -> Result<Vec<NodeId>, DecodeError> {
        (0..count).map(|_| self.i32(field).map(NodeId)).collect()
    }

    fn node(&mut self) -> Result<NodeRecord, DecodeError> {
        let id = NodeId(self.i32("id")?);
        let flags = SemanticsFlags::from_bits(self.i32("flags")? as u32);
        let actions = SemanticsActions::from_bits(self.i32("actions")? as u32);
        let text_selection_base = self.i32("textSelectionBase")?;
        let text_selection_extent = self.i32("textSelectionExtent")?;
        let scroll_children = self.i32("scrollChildren")?;
        let scroll_index = self.i32("scrollIndex")?;
        let scroll_position = self.f32("scrollPosition")?;
        let scroll_extent_max = self.f32("scrollExtentMax")?;
        let scroll_extent_min = self.f32("scrollExtentMin")?;
        let label = self.string("label")?;
        let value = self.string("value")?;
        let increased_value = self.string("increasedValue")?;
        let decreased_value = self.string("decreasedValue")?;
        let hint = self.string("hint")?;
        let text_direction = TextDirection::from_wire(self.i32("textDirection")?);

        let left = self.f32("left")?;
        let top = self.f32("top")?;
        let right = self.f32("right")?;
        let bottom = self.f32("bottom")?;

        let mut matrix = [0.0f32; 16];
        for slot in matrix.iter_mut() {
            *slot = self.f32("transform")?;
        }

        let child_count = self.count("childCount", 2)?;
        let children_in_traversal_order = self.ids("childrenInTraversalOrder", child_count)?;
        let children_in_hit_test_order = self.ids("childrenInHitTestOrder", child_count)?;

        let action_count = self.count("customActionCount", 1)?;
        let custom_actions = (0..action_count)
            .map(|_| self.i32("customActionId"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NodeRecord {
            id,
            flags,
            actions,
            text_selection_base,
            text_selection_extent,
            scroll_children,
            scroll_index,
            scroll_position,
            scroll_extent_max,
            scroll_extent_min,
            label,
            value,
            increased_value,
            decreased_value,
            hint,
            text_direction,
            rect: Rect::from_ltrb(left, top, right, bottom),
            transform: Transform3D::from_cols_array(&matrix),
            children_in_traversal_order,
            children_in_hit_test_order,
            custom_actions,
        })
    }

    fn custom_action(&mut self) -> Result<CustomActionRecord, DecodeError> {
        Ok(CustomActionRecord {
            id: self.i32("id")?,
            override_action_id: self.i32("overrideActionId")?,
            label: self.string("label")?,
            hint: self.string("hint")?,
        })
    }
}

/// Decode every node record in `buffer`.
pub fn decode_nodes<S: AsRef<str>>(
    buffer: &[u8],
    strings: &[S],
) -> Result<Vec<NodeRecord>, DecodeError> {
    let mut reader = FieldReader::new(buffer, strings);
    let mut records = Vec::new();
    while reader.has_remaining() {
        match reader.node() {
            Ok(record) => {
                tracing::trace!(target: targets::DECODER, id = ?record.id, flags = ?record.flags, "decoded node");
                records.push(record);
            }
            Err(err) => {
                tracing::error!(target: targets::DECODER, error = %err, decoded = records.len(), "rejecting semantics update");
                return Err(err);
            }
        }
    }
    Ok(records)
}

/// Decode every custom action record in `buffer`.
pub fn decode_custom_actions<S: AsRef<str>>(
    buffer: &[u8],
    strings: &[S],
) -> Result<Vec<CustomActionRecord>, DecodeError> {
    let mut reader = FieldReader::new(buffer, strings);
    let mut records = Vec::new();
    while reader.has_remaining() {
        match reader.custom_action() {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::error!(target: targets::DECODER, error = %err, "rejecting custom action update");
                return Err(err);
            }
        }
    }
    Ok(records)
}
