//! Relationships and the orthogonal segment chains that draw them.
//!
//! A [`Relationship`] is the logical connector between two elements. It is
//! drawn as an ordered chain of axis-aligned [`Segment`]s running from the
//! tail (origin end) to the head (arrow end). Every segment knows its place in
//! the chain through its [`SegmentRole`].
//!
//! A well-formed chain satisfies:
//!
//! - the end point of segment `k` equals the anchor of segment `k + 1`;
//! - consecutive segments never share an [`Axis`];
//! - the first anchor is the relationship tail and the last end point is its head.
//!
//! [`validate_chain`](crate::chain::validate_chain) checks all of these.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Axis, Point},
    identifier::{ElementId, RelationshipId, SegmentId},
};

/// The kind of connector. It only affects the head glyph, never the route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    #[default]
    Association,
    Aggregation,
    Composition,
    Extension,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Association => "association",
            Self::Aggregation => "aggregation",
            Self::Composition => "composition",
            Self::Extension => "extension",
        };
        f.write_str(name)
    }
}

impl FromStr for RelationshipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "association" => Ok(Self::Association),
            "aggregation" => Ok(Self::Aggregation),
            "composition" => Ok(Self::Composition),
            "extension" => Ok(Self::Extension),
            _ => Err(format!("Unknown relationship kind: {s}")),
        }
    }
}

/// Horizontal direction from tail to head, fixed when the relationship is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// `Left` when the tail lies strictly right of the head, `Right` otherwise.
    pub fn between(tail: Point, head: Point) -> Self {
        if tail.x() > head.x() {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Position of a segment within its chain, carrying its neighbour keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum SegmentRole {
    /// First segment; anchored at the relationship tail.
    Start { next: SegmentId },
    /// Segment with neighbours on both sides.
    Interior { prev: SegmentId, next: SegmentId },
    /// Last segment; ends at the relationship head.
    End { prev: SegmentId },
}

impl SegmentRole {
    pub fn prev(self) -> Option<SegmentId> {
        match self {
            Self::Start { .. } => None,
            Self::Interior { prev, .. } | Self::End { prev } => Some(prev),
        }
    }

    pub fn next(self) -> Option<SegmentId> {
        match self {
            Self::End { .. } => None,
            Self::Start { next } | Self::Interior { next, .. } => Some(next),
        }
    }
}

/// One axis-aligned stroke of a relationship.
///
/// The segment starts at its anchor `(x, y)` and runs by the signed delta
/// `(line_to_x, line_to_y)`. Only the delta on the segment's own axis may be
/// non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    id: SegmentId,
    relationship_id: RelationshipId,
    role: SegmentRole,
    axis: Axis,
    x: f32,
    y: f32,
    line_to_x: f32,
    line_to_y: f32,
}

impl Segment {
    /// Creates a segment anchored at `anchor` and spanning `length` along `axis`.
    pub fn new(
        id: SegmentId,
        relationship_id: RelationshipId,
        role: SegmentRole,
        axis: Axis,
        anchor: Point,
        length: f32,
    ) -> Self {
        let delta = Point::default().with_along(axis, length);
        Self {
            id,
            relationship_id,
            role,
            axis,
            x: anchor.x(),
            y: anchor.y(),
            line_to_x: delta.x(),
            line_to_y: delta.y(),
        }
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn relationship_id(&self) -> RelationshipId {
        self.relationship_id
    }

    pub fn role(&self) -> SegmentRole {
        self.role
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn line_to_x(&self) -> f32 {
        self.line_to_x
    }

    pub fn line_to_y(&self) -> f32 {
        self.line_to_y
    }

    /// Returns true for the first segment of the chain
    pub fn is_start(&self) -> bool {
        matches!(self.role, SegmentRole::Start { .. })
    }

    /// Returns true for the last segment of the chain
    pub fn is_end(&self) -> bool {
        matches!(self.role, SegmentRole::End { .. })
    }

    /// Key of the previous segment, `None` for the start segment
    pub fn from_segment_id(&self) -> Option<SegmentId> {
        self.role.prev()
    }

    /// Key of the next segment, `None` for the end segment
    pub fn to_segment_id(&self) -> Option<SegmentId> {
        self.role.next()
    }

    /// The pixel the segment starts at
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The signed delta from anchor to end point
    pub fn line_to(&self) -> Point {
        Point::new(self.line_to_x, self.line_to_y)
    }

    /// The pixel the segment ends at
    pub fn end_point(&self) -> Point {
        self.anchor().add_point(self.line_to())
    }

    /// Signed length along the segment's own axis
    pub fn length(&self) -> f32 {
        self.line_to().along(self.axis)
    }

    pub fn set_role(&mut self, role: SegmentRole) {
        self.role = role;
    }

    /// Moves the anchor, leaving the delta untouched (the end point moves too).
    pub fn set_anchor(&mut self, anchor: Point) {
        self.x = anchor.x();
        self.y = anchor.y();
    }

    /// Sets the signed length along the segment's own axis.
    pub fn set_length(&mut self, length: f32) {
        let line_to = Point::default().with_along(self.axis, length);
        self.line_to_x = line_to.x();
        self.line_to_y = line_to.y();
    }

    /// Extends the end point by `delta` along `axis`, keeping the anchor.
    pub fn stretch(&mut self, axis: Axis, delta: f32) {
        let line_to = self.line_to().offset_along(axis, delta);
        self.line_to_x = line_to.x();
        self.line_to_y = line_to.y();
    }

    /// Moves the anchor by `delta` along `axis`, keeping the end point.
    pub fn shift_anchor(&mut self, axis: Axis, delta: f32) {
        self.set_anchor(self.anchor().offset_along(axis, delta));
        self.stretch(axis, -delta);
    }

    /// Moves the whole segment by `delta` along `axis`.
    pub fn translate_along(&mut self, axis: Axis, delta: f32) {
        self.set_anchor(self.anchor().offset_along(axis, delta));
    }
}

/// A connector between two diagram elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    id: RelationshipId,
    kind: RelationshipKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from_element: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to_element: Option<ElementId>,
    direction: Direction,
    head: Point,
    tail: Point,
    segment_ids: Vec<SegmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Relationship {
    /// Creates a relationship record. The caller provides the chain keys in
    /// tail-to-head order.
    pub fn new(
        id: RelationshipId,
        kind: RelationshipKind,
        tail: Point,
        head: Point,
        segment_ids: Vec<SegmentId>,
    ) -> Self {
        Self {
            id,
            kind,
            from_element: None,
            to_element: None,
            direction: Direction::between(tail, head),
            head,
            tail,
            segment_ids,
            label: None,
        }
    }

    /// Attaches the tail end to an element (builder style)
    pub fn with_from_element(mut self, element: Option<ElementId>) -> Self {
        self.from_element = element;
        self
    }

    /// Attaches the head end to an element (builder style)
    pub fn with_to_element(mut self, element: Option<ElementId>) -> Self {
        self.to_element = element;
        self
    }

    /// Sets the label, typically a transition event (builder style)
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn id(&self) -> RelationshipId {
        self.id
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn from_element(&self) -> Option<ElementId> {
        self.from_element
    }

    pub fn to_element(&self) -> Option<ElementId> {
        self.to_element
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The arrow end
    pub fn head(&self) -> Point {
        self.head
    }

    /// The origin end
    pub fn tail(&self) -> Point {
        self.tail
    }

    /// Segment keys in chain order, tail to head
    pub fn segment_ids(&self) -> &[SegmentId] {
        &self.segment_ids
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_head(&mut self, head: Point) {
        self.head = head;
    }

    pub fn set_tail(&mut self, tail: Point) {
        self.tail = tail;
    }

    /// Registers a new first segment.
    pub fn prepend_segment(&mut self, id: SegmentId) {
        self.segment_ids.insert(0, id);
    }

    /// Registers a new last segment.
    pub fn append_segment(&mut self, id: SegmentId) {
        self.segment_ids.push(id);
    }
}
