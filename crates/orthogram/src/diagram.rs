//! In-memory tables of elements, relationships and segments.
//!
//! The routing functions never touch storage: they return [`Route`] snapshots.
//! [`Diagram`] is the caller side of that contract. It looks up the inputs a
//! gesture needs, runs the pure function and merges the result back, updating
//! segments whose keys it already holds and inserting the rest.

use indexmap::IndexMap;
use log::{debug, trace};

use orthogram_core::{
    chain::validate_chain,
    element::Element,
    geometry::Point,
    identifier::{ElementId, RelationshipId, SegmentId},
    relationship::{Relationship, Segment},
};

use crate::{
    error::OrthogramError,
    layout::{ImportedLayout, SkippedTransition},
    propagate::on_element_moved,
    route::Route,
    router::{reroute, reroute_endpoint, reroute_start},
};

/// A diagram: elements and the relationships between them.
///
/// # Examples
///
/// ```
/// use orthogram::{Diagram, RelationshipKind, factory::create_relationship};
/// use orthogram_core::geometry::Point;
///
/// let mut diagram = Diagram::new();
/// let route = create_relationship(
///     RelationshipKind::Association,
///     Point::new(100.0, 100.0),
///     Point::new(250.0, 200.0),
/// );
/// let id = diagram.insert_route(route);
///
/// diagram.drag_head(id, Point::new(250.0, 260.0))?;
/// assert_eq!(diagram.relationship(id).unwrap().head(), Point::new(250.0, 260.0));
/// diagram.validate()?;
/// # Ok::<(), orthogram::OrthogramError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    elements: IndexMap<ElementId, Element>,
    relationships: IndexMap<RelationshipId, Relationship>,
    segments: IndexMap<SegmentId, Segment>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element and returns its key.
    pub fn add_element(&mut self, element: impl Into<Element>) -> ElementId {
        let element = element.into();
        let id = element.id();
        self.elements.insert(id, element);
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Finds a state or final-state element by name.
    pub fn element_named(&self, name: &str) -> Option<&Element> {
        self.elements
            .values()
            .find(|element| element.name().is_some_and(|element_name| element_name == name))
    }

    /// Elements in insertion order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    /// Relationships in insertion order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(&id)
    }

    /// All segments, grouped by the order their relationships were created in
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// Relationships whose tail is attached to `element`
    pub fn relationships_from(&self, element: ElementId) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .values()
            .filter(move |relationship| relationship.from_element() == Some(element))
    }

    /// Relationships whose head is attached to `element`
    pub fn relationships_to(&self, element: ElementId) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .values()
            .filter(move |relationship| relationship.to_element() == Some(element))
    }

    /// Stores a freshly built route and returns the relationship key.
    pub fn insert_route(&mut self, route: Route) -> RelationshipId {
        let (relationship, segments) = route.into_parts();
        let id = relationship.id();
        for segment in segments {
            self.segments.insert(segment.id(), segment);
        }
        self.relationships.insert(id, relationship);
        id
    }

    /// Merges a route computed for a stored relationship.
    ///
    /// Segments with a known key replace the stored copy; unseen keys are
    /// inserted. Returns the keys that were inserted.
    pub fn apply_route(&mut self, route: Route) -> Vec<SegmentId> {
        let (relationship, segments) = route.into_parts();
        let mut inserted = Vec::new();
        for segment in segments {
            let id = segment.id();
            if self.segments.insert(id, segment).is_none() {
                inserted.push(id);
            }
        }
        trace!(
            relationship_id:% = relationship.id(),
            inserted = inserted.len();
            "Applied route"
        );
        self.relationships.insert(relationship.id(), relationship);
        inserted
    }

    /// Returns the segments of a relationship in chain order.
    ///
    /// # Errors
    ///
    /// Returns [`OrthogramError::MissingRelationship`] or
    /// [`OrthogramError::MissingSegment`] if a lookup fails.
    pub fn chain(&self, id: RelationshipId) -> Result<Vec<&Segment>, OrthogramError> {
        let relationship = self.find_relationship(id)?;
        relationship
            .segment_ids()
            .iter()
            .map(|segment_id| self.find_segment(*segment_id))
            .collect()
    }

    /// Checks the chain invariants of every relationship.
    ///
    /// # Errors
    ///
    /// Returns the first lookup or [`OrthogramError::Chain`] failure.
    pub fn validate(&self) -> Result<(), OrthogramError> {
        for relationship in self.relationships.values() {
            let segments = self
                .chain(relationship.id())?
                .into_iter()
                .cloned()
                .collect::<Vec<_>>();
            validate_chain(relationship, &segments)?;
        }
        Ok(())
    }

    /// Drags a segment across its axis to `coordinates`.
    ///
    /// Returns the keys of segments inserted by the drag (one when a boundary
    /// segment was split, none otherwise).
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the segment or its relationship is unknown.
    pub fn drag_segment(
        &mut self,
        segment_id: SegmentId,
        coordinates: Point,
    ) -> Result<Vec<SegmentId>, OrthogramError> {
        let moving = self.find_segment(segment_id)?.clone();
        let relationship = self.find_relationship(moving.relationship_id())?;
        let dependents = self.neighbours(&moving)?;

        let route = reroute(coordinates, relationship, &moving, &dependents);
        Ok(self.apply_route(route))
    }

    /// Drags the head of a relationship to `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the relationship or its end segment is unknown.
    pub fn drag_head(&mut self, id: RelationshipId, coordinates: Point) -> Result<(), OrthogramError> {
        let relationship = self.find_relationship(id)?;
        let end_id = *relationship
            .segment_ids()
            .last()
            .ok_or(OrthogramError::MissingRelationship(id))?;
        let moving = self.find_segment(end_id)?.clone();
        let dependents = self.neighbours(&moving)?;

        let route = reroute_endpoint(coordinates, relationship, &moving, &dependents);
        self.apply_route(route);
        Ok(())
    }

    /// Drags the tail of a relationship to `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the relationship or its start segment is unknown.
    pub fn drag_tail(&mut self, id: RelationshipId, coordinates: Point) -> Result<(), OrthogramError> {
        let relationship = self.find_relationship(id)?;
        let start_id = *relationship
            .segment_ids()
            .first()
            .ok_or(OrthogramError::MissingRelationship(id))?;
        let moving = self.find_segment(start_id)?.clone();
        let dependents = self.neighbours(&moving)?;

        let route = reroute_start(coordinates, relationship, &moving, &dependents);
        self.apply_route(route);
        Ok(())
    }

    /// Moves an element so its frame's top-left corner lands on `top_left`.
    ///
    /// Attached relationships are rerouted against the element's stored
    /// position first; the frame is overwritten afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`OrthogramError::MissingElement`] if the element is unknown.
    pub fn move_element(&mut self, id: ElementId, top_left: Point) -> Result<(), OrthogramError> {
        let previous = self
            .elements
            .get(&id)
            .ok_or(OrthogramError::MissingElement(id))?
            .frame()
            .top_left();

        let routes = on_element_moved(
            id,
            top_left,
            previous,
            self.relationships.values(),
            &self.segments,
        );
        for route in routes {
            self.apply_route(route);
        }

        if let Some(element) = self.elements.get_mut(&id) {
            element.translate(top_left.sub_point(previous));
        }
        debug!(element_id:% = id, x = top_left.x(), y = top_left.y(); "Moved element");
        Ok(())
    }

    /// Removes a relationship together with its segments.
    ///
    /// # Errors
    ///
    /// Returns [`OrthogramError::MissingRelationship`] if the key is unknown.
    pub fn remove_relationship(&mut self, id: RelationshipId) -> Result<Relationship, OrthogramError> {
        let relationship = self
            .relationships
            .shift_remove(&id)
            .ok_or(OrthogramError::MissingRelationship(id))?;
        for segment_id in relationship.segment_ids() {
            self.segments.shift_remove(segment_id);
        }
        Ok(relationship)
    }

    /// Removes an element and every relationship attached to it.
    ///
    /// # Errors
    ///
    /// Returns [`OrthogramError::MissingElement`] if the key is unknown.
    pub fn remove_element(&mut self, id: ElementId) -> Result<Element, OrthogramError> {
        let element = self
            .elements
            .shift_remove(&id)
            .ok_or(OrthogramError::MissingElement(id))?;
        let attached = self
            .relationships
            .values()
            .filter(|relationship| {
                relationship.from_element() == Some(id) || relationship.to_element() == Some(id)
            })
            .map(Relationship::id)
            .collect::<Vec<_>>();
        for relationship_id in attached {
            self.remove_relationship(relationship_id)?;
        }
        Ok(element)
    }

    /// Adds everything an import produced and returns the skipped transitions.
    pub fn merge_import(&mut self, layout: ImportedLayout) -> Vec<SkippedTransition> {
        let (elements, relationships, segments, skipped) = layout.into_parts();
        for element in elements {
            self.add_element(element);
        }
        for segment in segments {
            self.segments.insert(segment.id(), segment);
        }
        for relationship in relationships {
            self.relationships.insert(relationship.id(), relationship);
        }
        skipped
    }

    fn find_relationship(&self, id: RelationshipId) -> Result<&Relationship, OrthogramError> {
        self.relationships
            .get(&id)
            .ok_or(OrthogramError::MissingRelationship(id))
    }

    fn find_segment(&self, id: SegmentId) -> Result<&Segment, OrthogramError> {
        self.segments.get(&id).ok_or(OrthogramError::MissingSegment(id))
    }

    /// The chain neighbours of `segment`, predecessor first.
    fn neighbours(&self, segment: &Segment) -> Result<Vec<Segment>, OrthogramError> {
        [segment.from_segment_id(), segment.to_segment_id()]
            .into_iter()
            .flatten()
            .map(|id| self.find_segment(id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use orthogram_core::{
        element::StateElement,
        geometry::{Frame, Size},
        identifier::Id,
        relationship::RelationshipKind,
    };

    use super::*;
    use crate::factory::{connect_elements, create_relationship};

    fn state(name: &str, x: f32, y: f32) -> StateElement {
        let frame = Frame::new(Point::new(x, y), Size::new(160.0, 80.0)).unwrap();
        StateElement::new(Id::new(name), frame, 10.0)
    }

    fn connected() -> (Diagram, ElementId, ElementId, RelationshipId) {
        let mut diagram = Diagram::new();
        let a = diagram.add_element(state("a", 0.0, 0.0));
        let b = diagram.add_element(state("b", 400.0, 200.0));
        let route = connect_elements(
            RelationshipKind::Association,
            diagram.element(a).unwrap(),
            diagram.element(b).unwrap(),
        );
        let relationship = diagram.insert_route(route);
        (diagram, a, b, relationship)
    }

    #[test]
    fn test_drag_head_scenario() {
        let mut diagram = Diagram::new();
        let id = diagram.insert_route(create_relationship(
            RelationshipKind::Association,
            Point::new(100.0, 100.0),
            Point::new(250.0, 200.0),
        ));
        let middle_before = diagram.chain(id).unwrap()[1].line_to_y();

        diagram.drag_head(id, Point::new(250.0, 260.0)).unwrap();

        let chain = diagram.chain(id).unwrap();
        assert_approx_eq!(f32, chain[2].y(), 260.0);
        assert_approx_eq!(f32, chain[1].line_to_y(), middle_before + 60.0);
        assert_approx_eq!(f32, diagram.relationship(id).unwrap().head().y(), 260.0);
        diagram.validate().unwrap();
    }

    #[test]
    fn test_drag_boundary_segment_inserts() {
        let (mut diagram, _, _, id) = connected();
        let start = diagram.chain(id).unwrap()[0].id();

        let inserted = diagram.drag_segment(start, Point::new(0.0, 60.0)).unwrap();

        assert_eq!(inserted.len(), 1);
        assert_eq!(diagram.chain(id).unwrap().len(), 4);
        assert_eq!(diagram.relationship(id).unwrap().segment_ids()[0], inserted[0]);
        diagram.validate().unwrap();
    }

    #[test]
    fn test_drag_interior_segment_does_not_insert() {
        let (mut diagram, _, _, id) = connected();
        let middle = diagram.chain(id).unwrap()[1].id();

        let inserted = diagram.drag_segment(middle, Point::new(300.0, 0.0)).unwrap();

        assert!(inserted.is_empty());
        assert_approx_eq!(f32, diagram.segment(middle).unwrap().x(), 300.0);
        diagram.validate().unwrap();
    }

    #[test]
    fn test_drag_tail() {
        let (mut diagram, _, _, id) = connected();
        diagram.drag_tail(id, Point::new(150.0, 30.0)).unwrap();

        assert_eq!(diagram.relationship(id).unwrap().tail(), Point::new(150.0, 30.0));
        diagram.validate().unwrap();
    }

    #[test]
    fn test_move_element_translates_endpoints() {
        let (mut diagram, a, b, id) = connected();
        let head = diagram.relationship(id).unwrap().head();
        let tail = diagram.relationship(id).unwrap().tail();

        diagram.move_element(b, Point::new(450.0, 150.0)).unwrap();
        assert_eq!(diagram.relationship(id).unwrap().head(), head.add_point(Point::new(50.0, -50.0)));
        assert_eq!(diagram.element(b).unwrap().frame().top_left(), Point::new(450.0, 150.0));

        diagram.move_element(a, Point::new(-10.0, 20.0)).unwrap();
        assert_eq!(diagram.relationship(id).unwrap().tail(), tail.add_point(Point::new(-10.0, 20.0)));
        diagram.validate().unwrap();
    }

    #[test]
    fn test_attachment_queries() {
        let (diagram, a, b, id) = connected();

        assert_eq!(diagram.relationships_from(a).map(Relationship::id).collect::<Vec<_>>(), [id]);
        assert_eq!(diagram.relationships_to(b).map(Relationship::id).collect::<Vec<_>>(), [id]);
        assert_eq!(diagram.relationships_to(a).count(), 0);
        assert_eq!(diagram.element_named("b").map(Element::id), Some(b));
    }

    #[test]
    fn test_remove_relationship_cascades() {
        let (mut diagram, _, _, id) = connected();
        diagram.remove_relationship(id).unwrap();

        assert!(diagram.relationship(id).is_none());
        assert_eq!(diagram.segments().count(), 0);
        assert!(matches!(
            diagram.remove_relationship(id),
            Err(OrthogramError::MissingRelationship(_))
        ));
    }

    #[test]
    fn test_remove_element_drops_attached_relationships() {
        let (mut diagram, a, _, _) = connected();
        diagram.remove_element(a).unwrap();

        assert_eq!(diagram.relationships().count(), 0);
        assert_eq!(diagram.elements().count(), 1);
    }

    #[test]
    fn test_missing_lookups() {
        let mut diagram = Diagram::new();
        assert!(matches!(
            diagram.drag_segment(SegmentId::new(), Point::default()),
            Err(OrthogramError::MissingSegment(_))
        ));
        assert!(matches!(
            diagram.drag_head(RelationshipId::new(), Point::default()),
            Err(OrthogramError::MissingRelationship(_))
        ));
        assert!(matches!(
            diagram.move_element(ElementId::new(), Point::default()),
            Err(OrthogramError::MissingElement(_))
        ));
    }
}
