//! Layered auto-layout of an imported state machine.
//!
//! The importer turns a parsed [`StateGraph`] into positioned state and
//! final-state elements plus one relationship per transition, ready to be
//! merged into a [`Diagram`](crate::Diagram).
//!
//! # Pipeline
//!
//! ```text
//! StateGraph
//!     ↓ graph     (petgraph digraph, unknown targets reported)
//! TransitionGraph
//!     ↓ layers    (breadth-first layers, centred on the canvas middle row)
//! Placements
//!     ↓ connect   (three-segment connectors with fan-out offsets)
//! ImportedLayout
//! ```
//!
//! # Submodules
//!
//! - [`graph`] - Input types and the transition graph
//! - `cursor` - The walking position and fan-out accumulators
//! - `layers` - Layer assignment and node placement
//! - `connect` - Connector routing per transition

mod connect;
mod cursor;
pub mod graph;
mod layers;

pub use graph::{FinalNode, StateGraph, StateKind, StateNode, Transition};

use indexmap::IndexMap;
use log::{debug, info};
use petgraph::graph::NodeIndex;
use serde::Serialize;

use orthogram_core::{
    element::{Element, FinalStateElement, StateElement},
    geometry::{Frame, Size},
    identifier::Id,
    relationship::{Relationship, Segment},
};

use crate::{config::LayoutConfig, error::OrthogramError};
use graph::{NodeShape, TransitionGraph};

/// A transition that could not be routed because its target does not exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTransition {
    source: Id,
    target: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<String>,
}

impl SkippedTransition {
    pub(crate) fn new(source: Id, target: Id, event: Option<String>) -> Self {
        Self {
            source,
            target,
            event,
        }
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }
}

/// The result of [`import_layout`].
#[derive(Debug, Clone, Default)]
pub struct ImportedLayout {
    states: Vec<StateElement>,
    finals: Vec<FinalStateElement>,
    relationships: Vec<Relationship>,
    segments: Vec<Segment>,
    skipped: Vec<SkippedTransition>,
}

impl ImportedLayout {
    /// State elements in placement order
    pub fn states(&self) -> &[StateElement] {
        &self.states
    }

    /// Final-state elements in placement order
    pub fn finals(&self) -> &[FinalStateElement] {
        &self.finals
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Transitions left out because their target is unknown
    pub fn skipped(&self) -> &[SkippedTransition] {
        &self.skipped
    }

    /// Finds a state or final-state element by node id.
    pub fn element_named(&self, name: &str) -> Option<Element> {
        self.states
            .iter()
            .find(|state| state.name() == name)
            .cloned()
            .map(Element::from)
            .or_else(|| {
                self.finals
                    .iter()
                    .find(|final_state| final_state.name() == name)
                    .cloned()
                    .map(Element::from)
            })
    }

    /// Returns true when nothing was placed
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.finals.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<Element>, Vec<Relationship>, Vec<Segment>, Vec<SkippedTransition>) {
        let elements = self
            .states
            .into_iter()
            .map(Element::from)
            .chain(self.finals.into_iter().map(Element::from))
            .collect();
        (elements, self.relationships, self.segments, self.skipped)
    }
}

/// Lays out `state_graph` on a canvas of extent `canvas`.
///
/// The initial node is placed with its top-left corner at the canvas middle;
/// every later layer sits `layer_distance` further right. Each transition
/// becomes a three-segment association labelled with its event. Transitions
/// to unknown ids are skipped and listed in [`ImportedLayout::skipped`].
///
/// The layout is a pure function of its inputs: running it twice on the same
/// graph yields identical coordinates (only generated keys differ).
///
/// # Errors
///
/// Returns [`OrthogramError::Graph`] if two nodes share an id, or
/// [`OrthogramError::Frame`] if the configured element sizes are not positive.
///
/// # Examples
///
/// ```
/// use orthogram::{
///     config::LayoutConfig,
///     layout::{StateGraph, StateNode, import_layout},
/// };
/// use orthogram_core::geometry::Size;
///
/// let graph = StateGraph::new().with_state(StateNode::new("idle"));
/// let layout = import_layout(&graph, Size::new(800.0, 600.0), &LayoutConfig::default())?;
///
/// assert_eq!(layout.states().len(), 1);
/// assert_eq!(layout.states()[0].frame().x(), 400.0);
/// assert!(layout.relationships().is_empty());
/// # Ok::<(), orthogram::OrthogramError>(())
/// ```
pub fn import_layout(
    state_graph: &StateGraph,
    canvas: Size,
    config: &LayoutConfig,
) -> Result<ImportedLayout, OrthogramError> {
    let graph = TransitionGraph::build(state_graph)?;
    let placements = layers::place_nodes(&graph, canvas, config);

    let mut elements: IndexMap<NodeIndex, Element> = IndexMap::with_capacity(placements.len());
    for placement in &placements {
        let node = graph.node(placement.node());
        let frame = Frame::new(placement.top_left(), placement.size())?;
        let element: Element = match node.shape() {
            NodeShape::State => {
                StateElement::new(node.id(), frame, config.state_corner_radius()).into()
            }
            NodeShape::Final => FinalStateElement::new(node.id(), frame).into(),
        };
        debug!(
            node:% = node.id(),
            layer = placement.layer(),
            x = frame.x(),
            y = frame.y();
            "Placed node"
        );
        elements.insert(placement.node(), element);
    }

    let routes = connect::route_transitions(&graph, &elements, config);

    let mut layout = ImportedLayout {
        skipped: graph.skipped().to_vec(),
        ..ImportedLayout::default()
    };
    for element in elements.into_values() {
        match element {
            Element::State(state) => layout.states.push(state),
            Element::FinalState(final_state) => layout.finals.push(final_state),
            Element::Block(_) => {}
        }
    }
    for route in routes {
        let (relationship, segments) = route.into_parts();
        layout.relationships.push(relationship);
        layout.segments.extend(segments);
    }

    info!(
        states = layout.states.len(),
        finals = layout.finals.len(),
        relationships = layout.relationships.len(),
        skipped = layout.skipped.len();
        "Imported state graph"
    );

    Ok(layout)
}
