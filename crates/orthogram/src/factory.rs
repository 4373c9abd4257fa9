//! Creation of new relationships.
//!
//! A fresh relationship is always a three-segment "Z" (or "S") shape: a
//! horizontal run from the tail to a vertical channel, the vertical channel
//! itself, and a horizontal run into the head. The channel sits halfway
//! between tail and head, shifted by an optional center offset that the layout
//! importer uses to fan out parallel connectors.

use log::trace;

use orthogram_core::{
    element::Element,
    geometry::{Axis, Point},
    identifier::{ElementId, RelationshipId, SegmentId},
    relationship::{Relationship, RelationshipKind, Segment, SegmentRole},
};

use crate::route::Route;

/// Builder for a new relationship between a tail and a head point.
///
/// # Examples
///
/// ```
/// use orthogram::{factory::NewRelationship, RelationshipKind};
/// use orthogram_core::{geometry::Point, relationship::Direction};
///
/// let route = NewRelationship::new(
///     RelationshipKind::Association,
///     Point::new(100.0, 100.0),
///     Point::new(300.0, 200.0),
/// )
/// .with_label("go")
/// .build();
///
/// assert_eq!(route.segments().len(), 3);
/// assert_eq!(route.relationship().direction(), Direction::Right);
/// assert_eq!(route.segments()[1].line_to_y(), 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct NewRelationship {
    kind: RelationshipKind,
    tail: Point,
    head: Point,
    from_element: Option<ElementId>,
    to_element: Option<ElementId>,
    center_offset: f32,
    label: Option<String>,
}

impl NewRelationship {
    /// Starts a relationship from `tail` (origin end) to `head` (arrow end).
    pub fn new(kind: RelationshipKind, tail: Point, head: Point) -> Self {
        Self {
            kind,
            tail,
            head,
            from_element: None,
            to_element: None,
            center_offset: 0.0,
            label: None,
        }
    }

    /// Attaches the tail end to an element
    pub fn from_element(mut self, element: ElementId) -> Self {
        self.from_element = Some(element);
        self
    }

    /// Attaches the head end to an element
    pub fn to_element(mut self, element: ElementId) -> Self {
        self.to_element = Some(element);
        self
    }

    /// Shifts the vertical channel horizontally by `offset`
    pub fn with_center_offset(mut self, offset: f32) -> Self {
        self.center_offset = offset;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets or clears the label
    pub fn with_optional_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Builds the relationship and its three-segment chain.
    ///
    /// The middle segment spans the full vertical distance between tail and
    /// head. Degenerate input such as coincident points yields zero-length
    /// segments, never an error.
    pub fn build(self) -> Route {
        let Self {
            kind,
            tail,
            head,
            from_element,
            to_element,
            center_offset,
            label,
        } = self;

        let relationship_id = RelationshipId::new();
        let start_id = SegmentId::new();
        let middle_id = SegmentId::new();
        let end_id = SegmentId::new();

        let channel_x = tail.x() - (tail.x() - head.x()) / 2.0 + center_offset;
        let height = head.y() - tail.y();

        let start = Segment::new(
            start_id,
            relationship_id,
            SegmentRole::Start { next: middle_id },
            Axis::Horizontal,
            tail,
            channel_x - tail.x(),
        );
        let middle = Segment::new(
            middle_id,
            relationship_id,
            SegmentRole::Interior {
                prev: start_id,
                next: end_id,
            },
            Axis::Vertical,
            Point::new(channel_x, tail.y()),
            height,
        );
        let end = Segment::new(
            end_id,
            relationship_id,
            SegmentRole::End { prev: middle_id },
            Axis::Horizontal,
            Point::new(channel_x, tail.y() + height),
            head.x() - channel_x,
        );

        let relationship = Relationship::new(
            relationship_id,
            kind,
            tail,
            head,
            vec![start_id, middle_id, end_id],
        )
        .with_from_element(from_element)
        .with_to_element(to_element)
        .with_label(label);

        trace!(
            relationship_id:% = relationship_id,
            kind:% = kind,
            channel_x;
            "Created relationship"
        );

        Route::new(relationship, vec![start, middle, end])
    }
}

/// Creates an unattached relationship from `tail` to `head`.
pub fn create_relationship(kind: RelationshipKind, tail: Point, head: Point) -> Route {
    NewRelationship::new(kind, tail, head).build()
}

/// Creates a relationship between two elements.
///
/// When the target lies to the right of the source the connector leaves the
/// source's upper-right anchor and enters the target's upper-left anchor;
/// otherwise it leaves the upper-left anchor and enters the upper-right one.
pub fn connect_elements(kind: RelationshipKind, from: &Element, to: &Element) -> Route {
    let (tail, head) = if to.frame().x() > from.frame().x() {
        (from.upper_right_anchor(), to.upper_left_anchor())
    } else {
        (from.upper_left_anchor(), to.upper_right_anchor())
    };

    NewRelationship::new(kind, tail, head)
        .from_element(from.id())
        .to_element(to.id())
        .build()
}
