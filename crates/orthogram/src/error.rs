//! Error types for Orthogram operations.
//!
//! This module provides the main error type [`OrthogramError`]. Routing never
//! fails; errors come from building the import graph, from looking up
//! entities in a [`Diagram`](crate::Diagram), and from chain validation.

use thiserror::Error;

use orthogram_core::{
    chain::ChainError,
    geometry::FrameError,
    identifier::{ElementId, RelationshipId, SegmentId},
};

/// The main error type for Orthogram operations.
#[derive(Debug, Error)]
pub enum OrthogramError {
    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Invalid frame: {0}")]
    Frame(#[from] FrameError),

    #[error("Broken relationship chain: {0}")]
    Chain(#[from] ChainError),

    #[error("Element {0} not found")]
    MissingElement(ElementId),

    #[error("Relationship {0} not found")]
    MissingRelationship(RelationshipId),

    #[error("Segment {0} not found")]
    MissingSegment(SegmentId),
}
