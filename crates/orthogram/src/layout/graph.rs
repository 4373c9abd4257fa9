//! The parsed state machine consumed by the importer, and its transition graph.
//!
//! [`StateGraph`] is the shape an external parser (for instance of an SCXML
//! document) produces: ordinary and parallel states that may nest children,
//! a separate list of final states and the transitions between them. The
//! importer turns it into a transition graph, a `petgraph` digraph whose
//! node order follows the input and whose edges keep declaration order.

use std::collections::HashMap;

use log::{trace, warn};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};

use orthogram_core::identifier::Id;

use super::SkippedTransition;
use crate::error::OrthogramError;

/// A parsed hierarchical state machine.
///
/// # Examples
///
/// ```
/// use orthogram::layout::{FinalNode, StateGraph, StateNode};
///
/// let graph = StateGraph::new()
///     .with_initial("idle")
///     .with_state(StateNode::new("idle").with_transition("busy", Some("start")))
///     .with_state(StateNode::new("busy").with_transition("done", None))
///     .with_final(FinalNode::new("done"));
///
/// assert_eq!(graph.states().len(), 2);
/// assert_eq!(graph.finals().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial: Option<Id>,
    #[serde(default)]
    states: Vec<StateNode>,
    #[serde(default)]
    finals: Vec<FinalNode>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the initial node
    pub fn with_initial(mut self, id: impl Into<Id>) -> Self {
        self.initial = Some(id.into());
        self
    }

    pub fn with_state(mut self, state: StateNode) -> Self {
        self.states.push(state);
        self
    }

    pub fn with_final(mut self, final_node: FinalNode) -> Self {
        self.finals.push(final_node);
        self
    }

    pub fn initial(&self) -> Option<Id> {
        self.initial
    }

    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    pub fn finals(&self) -> &[FinalNode] {
        &self.finals
    }

    /// Returns true when the graph has neither states nor final states
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.finals.is_empty()
    }
}

/// Flavour of a non-final state. Both are drawn and laid out the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateKind {
    #[default]
    State,
    Parallel,
}

/// An ordinary or parallel state with its outgoing transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateNode {
    id: Id,
    #[serde(default)]
    kind: StateKind,
    #[serde(default)]
    initial: bool,
    #[serde(default, rename = "transition")]
    transitions: Vec<Transition>,
    #[serde(default, rename = "child")]
    children: Vec<StateNode>,
}

impl StateNode {
    pub fn new(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            kind: StateKind::State,
            initial: false,
            transitions: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a parallel state
    pub fn parallel(id: impl Into<Id>) -> Self {
        Self {
            kind: StateKind::Parallel,
            ..Self::new(id)
        }
    }

    /// Flags this state as the initial one
    pub fn as_initial(mut self) -> Self {
        self.initial = true;
        self
    }

    pub fn with_transition(mut self, target: impl Into<Id>, event: Option<&str>) -> Self {
        self.transitions.push(Transition {
            target: target.into(),
            event: event.map(str::to_string),
        });
        self
    }

    pub fn with_child(mut self, child: StateNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn children(&self) -> &[StateNode] {
        &self.children
    }
}

/// A directed, optionally labelled transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    target: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event: Option<String>,
}

impl Transition {
    pub fn target(&self) -> Id {
        self.target
    }

    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }
}

/// A terminal state. It never has outgoing transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalNode {
    id: Id,
}

impl FinalNode {
    pub fn new(id: impl Into<Id>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> Id {
        self.id
    }
}

/// Whether a graph node is drawn as a state box or a final-state circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeShape {
    State,
    Final,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct GraphNode {
    id: Id,
    shape: NodeShape,
    initial: bool,
}

impl GraphNode {
    pub(crate) fn id(&self) -> Id {
        self.id
    }

    pub(crate) fn shape(&self) -> NodeShape {
        self.shape
    }
}

/// The transition graph the importer walks.
///
/// Node indices follow input order: states depth-first (a parent before its
/// children), then final states. Edges whose target is unknown are left out
/// and reported through [`TransitionGraph::skipped`].
#[derive(Debug)]
pub(crate) struct TransitionGraph {
    graph: DiGraph<GraphNode, Option<String>>,
    node_id_map: HashMap<Id, NodeIndex>,
    declared_initial: Option<Id>,
    skipped: Vec<SkippedTransition>,
}

impl TransitionGraph {
    /// Builds the transition graph of `state_graph`.
    ///
    /// # Errors
    ///
    /// Returns [`OrthogramError::Graph`] if two nodes share an id.
    pub(crate) fn build(state_graph: &StateGraph) -> Result<Self, OrthogramError> {
        let mut graph = Self {
            graph: DiGraph::new(),
            node_id_map: HashMap::new(),
            declared_initial: state_graph.initial(),
            skipped: Vec::new(),
        };

        let mut states = Vec::new();
        flatten(state_graph.states(), &mut states);

        for state in &states {
            graph.add_node(state.id(), NodeShape::State, state.is_initial())?;
        }
        for final_node in state_graph.finals() {
            graph.add_node(final_node.id(), NodeShape::Final, false)?;
        }

        for state in &states {
            let source = graph.node_id_map[&state.id()];
            for transition in state.transitions() {
                match graph.node_id_map.get(&transition.target()) {
                    Some(&target) => {
                        graph
                            .graph
                            .add_edge(source, target, transition.event.clone());
                    }
                    None => {
                        warn!(
                            source:% = state.id(),
                            target:% = transition.target();
                            "Transition target not found, skipping edge"
                        );
                        graph.skipped.push(SkippedTransition::new(
                            state.id(),
                            transition.target(),
                            transition.event.clone(),
                        ));
                    }
                }
            }
        }

        trace!(
            nodes = graph.graph.node_count(),
            edges = graph.graph.edge_count();
            "Built transition graph"
        );

        Ok(graph)
    }

    fn add_node(&mut self, id: Id, shape: NodeShape, initial: bool) -> Result<(), OrthogramError> {
        if self.node_id_map.contains_key(&id) {
            return Err(OrthogramError::Graph(format!(
                "Duplicate state id `{id}`"
            )));
        }
        let index = self.graph.add_node(GraphNode { id, shape, initial });
        self.node_id_map.insert(id, index);
        Ok(())
    }

    pub(crate) fn node(&self, index: NodeIndex) -> GraphNode {
        self.graph[index]
    }

    pub(crate) fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Node indices in input order
    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// Outgoing transitions of `source` in declaration order, as
    /// `(target, event)` pairs.
    pub(crate) fn outgoing(&self, source: NodeIndex) -> Vec<(NodeIndex, Option<&str>)> {
        let mut edges = self
            .graph
            .edges_directed(source, Direction::Outgoing)
            .collect::<Vec<_>>();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| (edge.target(), edge.weight().as_deref()))
            .collect()
    }

    /// Picks the node the layout starts from.
    ///
    /// The declared initial id wins; an unknown declared id is logged and
    /// ignored. Otherwise the first state flagged initial, then the first
    /// state, then the first final state. `None` only for an empty graph.
    pub(crate) fn initial(&self) -> Option<NodeIndex> {
        if let Some(declared) = self.declared_initial {
            match self.node_id_map.get(&declared) {
                Some(&index) => return Some(index),
                None => warn!(initial:% = declared; "Declared initial state not found, falling back"),
            }
        }

        let nodes = || self.graph.node_indices();
        nodes()
            .find(|&index| self.graph[index].initial)
            .or_else(|| nodes().find(|&index| self.graph[index].shape == NodeShape::State))
            .or_else(|| nodes().next())
    }

    /// Transitions dropped because their target does not exist
    pub(crate) fn skipped(&self) -> &[SkippedTransition] {
        &self.skipped
    }
}

/// Collects `states` and their nested children depth-first, parent first.
fn flatten<'a>(states: &'a [StateNode], out: &mut Vec<&'a StateNode>) {
    for state in states {
        out.push(state);
        flatten(state.children(), out);
    }
}
