//! Orthogram Core Types and Definitions
//!
//! This crate provides the data model shared by the Orthogram connector
//! engine. It includes:
//!
//! - **Geometry**: Points, sizes, element frames and segment axes ([`geometry`] module)
//! - **Identifiers**: Interned state names and UUID entity keys ([`identifier`] module)
//! - **Elements**: State, final-state and generic box elements ([`element`] module)
//! - **Relationships**: Connectors and their orthogonal segment chains ([`relationship`] module)
//! - **Chains**: Validation of the chain invariants ([`chain`] module)

pub mod chain;
pub mod element;
pub mod geometry;
pub mod identifier;
pub mod relationship;
