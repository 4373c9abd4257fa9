//! The snapshot exchanged between routing functions and their callers.

use orthogram_core::{
    chain::{ChainError, validate_chain},
    identifier::SegmentId,
    relationship::{Relationship, Segment},
};

/// A relationship together with segments computed for it.
///
/// The factory returns a route holding the complete chain. The router returns
/// only the segments it touched: the moving segment first, then its dependents,
/// then any segment it inserted. Callers merge a route into storage by
/// updating the segments whose keys they already hold and inserting the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    relationship: Relationship,
    segments: Vec<Segment>,
}

impl Route {
    pub fn new(relationship: Relationship, segments: Vec<Segment>) -> Self {
        Self {
            relationship,
            segments,
        }
    }

    pub fn relationship(&self) -> &Relationship {
        &self.relationship
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the segment with the given key, if the route carries it.
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.id() == id)
    }

    /// Splits the route into its relationship and segments.
    pub fn into_parts(self) -> (Relationship, Vec<Segment>) {
        (self.relationship, self.segments)
    }

    /// Checks the chain invariants, assuming the route carries the full chain.
    ///
    /// # Errors
    ///
    /// Returns a [`ChainError`] if a segment is missing or an invariant is broken.
    pub fn validate(&self) -> Result<(), ChainError> {
        let ordered = self
            .relationship
            .segment_ids()
            .iter()
            .filter_map(|id| self.segment(*id).cloned())
            .collect::<Vec<_>>();
        validate_chain(&self.relationship, &ordered)
    }
}
