//! Keeps attached relationships glued to an element that moves.

use indexmap::IndexMap;
use log::{debug, warn};

use orthogram_core::{
    geometry::Point,
    identifier::{ElementId, SegmentId},
    relationship::{Relationship, Segment},
};

use crate::{
    route::Route,
    router::{reroute_endpoint, reroute_start},
};

/// Computes the routes of every relationship attached to a moved element.
///
/// `new_position` and `previous_position` are any pair of points that moved
/// with the element (typically its frame's top-left corner before and after
/// the move). Every attached endpoint is translated by exactly their
/// difference: incoming relationships (`to_element == element_id`) have their
/// head dragged through [`reroute_endpoint`], outgoing ones
/// (`from_element == element_id`) have their tail dragged through
/// [`reroute_start`]. A relationship attached at both ends gets both updates,
/// the second one applied on top of the first.
///
/// This reads the element's previous position, so callers must run it before
/// overwriting the element's frame in storage.
///
/// Each returned route carries the updated relationship and the segments that
/// changed, in chain order. Relationships whose boundary segments are missing
/// from `segments` are logged and skipped.
pub fn on_element_moved<'a, I>(
    element_id: ElementId,
    new_position: Point,
    previous_position: Point,
    relationships: I,
    segments: &IndexMap<SegmentId, Segment>,
) -> Vec<Route>
where
    I: IntoIterator<Item = &'a Relationship>,
{
    let delta = new_position.sub_point(previous_position);
    if delta.is_zero() {
        return Vec::new();
    }

    let routes = relationships
        .into_iter()
        .filter(|relationship| {
            relationship.from_element() == Some(element_id)
                || relationship.to_element() == Some(element_id)
        })
        .filter_map(|relationship| follow_element(element_id, delta, relationship, segments))
        .collect::<Vec<_>>();

    debug!(
        element_id:% = element_id,
        dx = delta.x(),
        dy = delta.y(),
        routes = routes.len();
        "Propagated element move"
    );

    routes
}

fn follow_element(
    element_id: ElementId,
    delta: Point,
    relationship: &Relationship,
    segments: &IndexMap<SegmentId, Segment>,
) -> Option<Route> {
    let mut relationship = relationship.clone();
    let mut touched: IndexMap<SegmentId, Segment> = IndexMap::new();

    if relationship.to_element() == Some(element_id) {
        let end_id = *relationship.segment_ids().last()?;
        let (moving, dependents) = boundary(end_id, &relationship, segments, &touched)?;
        let route = reroute_endpoint(
            relationship.head().add_point(delta),
            &relationship,
            &moving,
            &dependents,
        );
        merge(&mut relationship, &mut touched, route);
    }

    if relationship.from_element() == Some(element_id) {
        let start_id = *relationship.segment_ids().first()?;
        let (moving, dependents) = boundary(start_id, &relationship, segments, &touched)?;
        let route = reroute_start(
            relationship.tail().add_point(delta),
            &relationship,
            &moving,
            &dependents,
        );
        merge(&mut relationship, &mut touched, route);
    }

    let changed = relationship
        .segment_ids()
        .iter()
        .filter_map(|id| touched.swap_remove(id))
        .collect();
    Some(Route::new(relationship, changed))
}

/// Looks up a boundary segment and its single chain neighbour, preferring
/// copies already updated during this move.
fn boundary(
    id: SegmentId,
    relationship: &Relationship,
    segments: &IndexMap<SegmentId, Segment>,
    touched: &IndexMap<SegmentId, Segment>,
) -> Option<(Segment, Vec<Segment>)> {
    let lookup = |id: SegmentId| touched.get(&id).or_else(|| segments.get(&id)).cloned();

    let Some(moving) = lookup(id) else {
        warn!(
            relationship_id:% = relationship.id(),
            segment_id:% = id;
            "Boundary segment missing, relationship left in place"
        );
        return None;
    };

    let neighbour = moving.from_segment_id().or(moving.to_segment_id());
    let dependents = neighbour.and_then(lookup).into_iter().collect();
    Some((moving, dependents))
}

fn merge(
    relationship: &mut Relationship,
    touched: &mut IndexMap<SegmentId, Segment>,
    route: Route,
) {
    let (updated, segments) = route.into_parts();
    *relationship = updated;
    for segment in segments {
        touched.insert(segment.id(), segment);
    }
}
