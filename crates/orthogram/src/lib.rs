//! Orthogram - Orthogonal connector routing and layered layout for state diagrams.
//!
//! Relationships between diagram elements are drawn as chains of axis-aligned
//! segments. This crate creates those chains, re-routes them while their ends,
//! their segments or the attached elements are dragged, and lays out a parsed
//! state machine as positioned elements joined by such chains.
//!
//! Every routing function takes a snapshot and returns a [`Route`]; the
//! [`Diagram`] tables merge routes back into storage.

pub mod config;
pub mod factory;
pub mod layout;
pub mod propagate;
pub mod router;

mod diagram;
mod error;
mod route;

pub use orthogram_core::{chain, element, geometry, identifier, relationship};

pub use diagram::Diagram;
pub use error::OrthogramError;
pub use orthogram_core::relationship::RelationshipKind;
pub use route::Route;

use log::{debug, info};

use config::AppConfig;
use layout::{ImportedLayout, SkippedTransition, StateGraph};

/// Builder for importing state machines into diagrams.
///
/// # Examples
///
/// ```
/// use orthogram::{
///     DiagramBuilder,
///     config::AppConfig,
///     layout::{FinalNode, StateGraph, StateNode},
/// };
///
/// let graph = StateGraph::new()
///     .with_state(StateNode::new("idle").with_transition("done", Some("finish")))
///     .with_final(FinalNode::new("done"));
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let (diagram, skipped) = builder.import(&graph).expect("Failed to import");
///
/// assert_eq!(diagram.elements().count(), 2);
/// assert_eq!(diagram.relationships().count(), 1);
/// assert!(skipped.is_empty());
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and canvas settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Lay out a state graph without storing it.
    ///
    /// # Errors
    ///
    /// Returns `OrthogramError` for duplicate node ids or invalid element sizes.
    pub fn layout(&self, graph: &StateGraph) -> Result<ImportedLayout, OrthogramError> {
        info!(
            states = graph.states().len(),
            finals = graph.finals().len();
            "Laying out state graph"
        );
        layout::import_layout(graph, self.config.canvas().size(), self.config.layout())
    }

    /// Lay out a state graph and merge the result into a fresh [`Diagram`].
    ///
    /// Transitions to unknown states are not drawn. They are returned next to
    /// the diagram, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `OrthogramError` for duplicate node ids or invalid element sizes.
    pub fn import(
        &self,
        graph: &StateGraph,
    ) -> Result<(Diagram, Vec<SkippedTransition>), OrthogramError> {
        let layout = self.layout(graph)?;
        let mut diagram = Diagram::new();
        let skipped = diagram.merge_import(layout);
        debug!(skipped = skipped.len(); "State graph merged into diagram");
        Ok((diagram, skipped))
    }
}
