//! Structural checks for relationship segment chains.
//!
//! The factory and router keep chains well-formed by construction; this
//! module states the invariants as a checkable function so stores and tests
//! can confirm a snapshot before and after every mutation.

use log::trace;
use thiserror::Error;

use crate::{
    geometry::{Axis, Point},
    identifier::{RelationshipId, SegmentId},
    relationship::{Relationship, Segment, SegmentRole},
};

/// Maximum coordinate drift, in pixels, tolerated by the connectivity checks.
///
/// Chains are rebuilt from `f32` sums on every drag; the tolerance absorbs the
/// rounding of a long interaction on a large canvas.
pub const CHAIN_TOLERANCE: f32 = 1e-2;

/// A violated chain invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("relationship {0} has no segments")]
    Empty(RelationshipId),

    #[error("relationship lists {expected} segments but {actual} were supplied")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("segment at position {index} is {found}, relationship lists {expected}")]
    OrderMismatch {
        index: usize,
        expected: SegmentId,
        found: SegmentId,
    },

    #[error("segment {segment} belongs to relationship {owner}")]
    ForeignSegment {
        segment: SegmentId,
        owner: RelationshipId,
    },

    #[error("segment {segment} has role {role:?} at position {index}")]
    RoleMismatch {
        segment: SegmentId,
        index: usize,
        role: SegmentRole,
    },

    #[error("segments {first} and {second} are both {axis:?}")]
    SameAxis {
        first: SegmentId,
        second: SegmentId,
        axis: Axis,
    },

    #[error("segment {0} has a non-zero delta off its own axis")]
    OffAxis(SegmentId),

    #[error("segment {first} ends at {end:?} but {second} starts at {anchor:?}")]
    Disconnected {
        first: SegmentId,
        second: SegmentId,
        end: Point,
        anchor: Point,
    },

    #[error("first segment starts at {anchor:?} but the tail is {tail:?}")]
    TailMismatch { anchor: Point, tail: Point },

    #[error("last segment ends at {end:?} but the head is {head:?}")]
    HeadMismatch { end: Point, head: Point },
}

/// Checks every chain invariant for `relationship` and its `segments`.
///
/// `segments` must be given in chain order (tail to head), i.e. in the order of
/// [`Relationship::segment_ids`].
///
/// # Errors
///
/// Returns the first [`ChainError`] found.
///
/// # Examples
///
/// ```
/// use orthogram_core::{
///     chain::validate_chain,
///     geometry::{Axis, Point},
///     identifier::{RelationshipId, SegmentId},
///     relationship::{Relationship, RelationshipKind, Segment, SegmentRole},
/// };
///
/// let rel_id = RelationshipId::new();
/// let (a, b) = (SegmentId::new(), SegmentId::new());
/// let first = Segment::new(a, rel_id, SegmentRole::Start { next: b }, Axis::Horizontal, Point::new(0.0, 0.0), 50.0);
/// let second = Segment::new(b, rel_id, SegmentRole::End { prev: a }, Axis::Vertical, Point::new(50.0, 0.0), 20.0);
/// let relationship = Relationship::new(
///     rel_id,
///     RelationshipKind::Association,
///     Point::new(0.0, 0.0),
///     Point::new(50.0, 20.0),
///     vec![a, b],
/// );
///
/// assert!(validate_chain(&relationship, &[first, second]).is_ok());
/// ```
pub fn validate_chain(relationship: &Relationship, segments: &[Segment]) -> Result<(), ChainError> {
    let ids = relationship.segment_ids();
    if ids.is_empty() || segments.is_empty() {
        return Err(ChainError::Empty(relationship.id()));
    }
    if ids.len() != segments.len() {
        return Err(ChainError::LengthMismatch {
            expected: ids.len(),
            actual: segments.len(),
        });
    }

    let last = segments.len() - 1;
    for (index, (segment, expected)) in segments.iter().zip(ids).enumerate() {
        if segment.id() != *expected {
            return Err(ChainError::OrderMismatch {
                index,
                expected: *expected,
                found: segment.id(),
            });
        }
        if segment.relationship_id() != relationship.id() {
            return Err(ChainError::ForeignSegment {
                segment: segment.id(),
                owner: segment.relationship_id(),
            });
        }

        let prev = (index > 0).then(|| ids[index - 1]);
        let next = (index < last).then(|| ids[index + 1]);
        if segment.from_segment_id() != prev || segment.to_segment_id() != next {
            return Err(ChainError::RoleMismatch {
                segment: segment.id(),
                index,
                role: segment.role(),
            });
        }

        if segment.line_to().along(segment.axis().orthogonal()) != 0.0 {
            return Err(ChainError::OffAxis(segment.id()));
        }
    }

    for pair in segments.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if first.axis() == second.axis() {
            return Err(ChainError::SameAxis {
                first: first.id(),
                second: second.id(),
                axis: first.axis(),
            });
        }
        if !first
            .end_point()
            .approx_eq(second.anchor(), CHAIN_TOLERANCE)
        {
            return Err(ChainError::Disconnected {
                first: first.id(),
                second: second.id(),
                end: first.end_point(),
                anchor: second.anchor(),
            });
        }
    }

    let anchor = segments[0].anchor();
    if !anchor.approx_eq(relationship.tail(), CHAIN_TOLERANCE) {
        return Err(ChainError::TailMismatch {
            anchor,
            tail: relationship.tail(),
        });
    }
    let end = segments[last].end_point();
    if !end.approx_eq(relationship.head(), CHAIN_TOLERANCE) {
        return Err(ChainError::HeadMismatch {
            end,
            head: relationship.head(),
        });
    }

    trace!(relationship_id:% = relationship.id(), segments = segments.len(); "Chain is well-formed");
    Ok(())
}
