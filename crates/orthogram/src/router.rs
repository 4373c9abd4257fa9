//! Incremental re-routing of an existing segment chain.
//!
//! Every function here is pure: it takes a snapshot of the relationship, the
//! segment being dragged and its chain neighbours, and returns a [`Route`]
//! holding the updated copies. Storage is left to the caller, which merges the
//! route by updating known segment keys and inserting unseen ones.
//!
//! Three gestures are supported:
//!
//! - [`reroute`] drags any segment across its own axis. Dragging a boundary
//!   segment (the first or the last) splits off a new segment so the fixed
//!   endpoint stays where it is.
//! - [`reroute_endpoint`] drags the head, sliding the end segment.
//! - [`reroute_start`] drags the tail, sliding the start segment.

use log::{debug, trace};

use orthogram_core::{
    geometry::Point,
    identifier::SegmentId,
    relationship::{Relationship, Segment, SegmentRole},
};

use crate::route::Route;

/// Drags `moving` so that it passes through `coordinates`.
///
/// A segment can only travel across its own axis: a horizontal segment moves
/// up or down, a vertical one left or right. The component of `coordinates`
/// along the segment's own axis is ignored.
///
/// The predecessor in `dependents` (if any) is stretched so its end follows the
/// moved anchor; the successor (if any) has its anchor shifted so its far end
/// stays put. When `moving` is the chain start a new start segment is inserted
/// in front of it bridging the tail and the moved segment; when it is the chain
/// end a new end segment is appended bridging the moved segment and the head.
/// Interior segments are never split.
///
/// The returned route lists the moving segment first, then the dependents in
/// the order given, then the inserted segment if one was created. Dependents
/// that are not chain neighbours of `moving` are returned unchanged. A drag
/// with no displacement across the axis returns the input unchanged.
pub fn reroute(
    coordinates: Point,
    relationship: &Relationship,
    moving: &Segment,
    dependents: &[Segment],
) -> Route {
    let across = moving.axis().orthogonal();
    let delta = coordinates.along(across) - moving.anchor().along(across);

    let mut relationship = relationship.clone();
    let mut moving = moving.clone();
    let mut dependents = dependents.to_vec();

    if delta == 0.0 {
        trace!(segment_id:% = moving.id(); "Segment did not move across its axis");
        return collect(relationship, moving, dependents, None);
    }

    for dependent in &mut dependents {
        if Some(dependent.id()) == moving.from_segment_id() {
            dependent.stretch(across, delta);
        } else if Some(dependent.id()) == moving.to_segment_id() {
            dependent.shift_anchor(across, delta);
        }
    }

    let inserted = match moving.role() {
        SegmentRole::Start { next } => {
            let id = SegmentId::new();
            let bridge = Segment::new(
                id,
                relationship.id(),
                SegmentRole::Start { next: moving.id() },
                across,
                moving.anchor(),
                delta,
            );
            moving.set_role(SegmentRole::Interior { prev: id, next });
            relationship.prepend_segment(id);
            Some(bridge)
        }
        SegmentRole::End { prev } => {
            let id = SegmentId::new();
            let bridge = Segment::new(
                id,
                relationship.id(),
                SegmentRole::End { prev: moving.id() },
                across,
                moving.end_point().offset_along(across, delta),
                -delta,
            );
            moving.set_role(SegmentRole::Interior { prev, next: id });
            relationship.append_segment(id);
            Some(bridge)
        }
        SegmentRole::Interior { .. } => None,
    };

    moving.translate_along(across, delta);

    debug!(
        relationship_id:% = relationship.id(),
        segment_id:% = moving.id(),
        delta,
        split = inserted.is_some();
        "Rerouted segment"
    );

    collect(relationship, moving, dependents, inserted)
}

/// Drags the head of the chain to `coordinates`.
///
/// `moving` must be the end segment; any other segment yields an unchanged
/// route. The end segment keeps its axis: it is moved across that axis to meet
/// `coordinates` and its length is set so that its far end lands exactly on
/// them. Its predecessor is stretched to stay attached. No segment is ever
/// inserted.
pub fn reroute_endpoint(
    coordinates: Point,
    relationship: &Relationship,
    moving: &Segment,
    dependents: &[Segment],
) -> Route {
    let mut relationship = relationship.clone();
    let mut moving = moving.clone();
    let mut dependents = dependents.to_vec();

    if !moving.is_end() {
        debug!(segment_id:% = moving.id(); "Head drag ignored, segment is not the chain end");
        return collect(relationship, moving, dependents, None);
    }

    let axis = moving.axis();
    let across = axis.orthogonal();
    let delta = coordinates.along(across) - moving.anchor().along(across);

    if let Some(predecessor) = dependents
        .iter_mut()
        .find(|dependent| Some(dependent.id()) == moving.from_segment_id())
    {
        predecessor.stretch(across, delta);
    }

    moving.set_anchor(moving.anchor().with_along(across, coordinates.along(across)));
    moving.set_length(coordinates.along(axis) - moving.anchor().along(axis));
    relationship.set_head(coordinates);

    trace!(
        relationship_id:% = relationship.id(),
        head_x = coordinates.x(),
        head_y = coordinates.y();
        "Moved relationship head"
    );

    collect(relationship, moving, dependents, None)
}

/// Drags the tail of the chain to `coordinates`.
///
/// `moving` must be the start segment; any other segment yields an unchanged
/// route. The start segment's anchor moves onto `coordinates` while its far end
/// keeps its position along the segment's axis. Its successor has its anchor
/// shifted to stay attached, keeping its own far end fixed.
pub fn reroute_start(
    coordinates: Point,
    relationship: &Relationship,
    moving: &Segment,
    dependents: &[Segment],
) -> Route {
    let mut relationship = relationship.clone();
    let mut moving = moving.clone();
    let mut dependents = dependents.to_vec();

    if !moving.is_start() {
        debug!(segment_id:% = moving.id(); "Tail drag ignored, segment is not the chain start");
        return collect(relationship, moving, dependents, None);
    }

    let axis = moving.axis();
    let across = axis.orthogonal();
    let end = moving.end_point();
    let delta = coordinates.along(across) - moving.anchor().along(across);

    if let Some(successor) = dependents
        .iter_mut()
        .find(|dependent| Some(dependent.id()) == moving.to_segment_id())
    {
        successor.shift_anchor(across, delta);
    }

    moving.set_anchor(coordinates);
    moving.set_length(end.along(axis) - coordinates.along(axis));
    relationship.set_tail(coordinates);

    trace!(
        relationship_id:% = relationship.id(),
        tail_x = coordinates.x(),
        tail_y = coordinates.y();
        "Moved relationship tail"
    );

    collect(relationship, moving, dependents, None)
}

fn collect(
    relationship: Relationship,
    moving: Segment,
    dependents: Vec<Segment>,
    inserted: Option<Segment>,
) -> Route {
    let mut segments = Vec::with_capacity(dependents.len() + 2);
    segments.push(moving);
    segments.extend(dependents);
    segments.extend(inserted);
    Route::new(relationship, segments)
}
