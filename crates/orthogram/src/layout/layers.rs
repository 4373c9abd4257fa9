//! Breadth-first layer assignment and placement of the graph nodes.

use log::{debug, trace};
use petgraph::graph::NodeIndex;

use orthogram_core::geometry::{Point, Size};

use super::{
    cursor::LayoutCursor,
    graph::{NodeShape, TransitionGraph},
};
use crate::config::LayoutConfig;

/// Where a node was placed and in which layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placement {
    node: NodeIndex,
    layer: usize,
    top_left: Point,
    size: Size,
}

impl Placement {
    pub(crate) fn node(&self) -> NodeIndex {
        self.node
    }

    pub(crate) fn layer(&self) -> usize {
        self.layer
    }

    pub(crate) fn top_left(&self) -> Point {
        self.top_left
    }

    pub(crate) fn size(&self) -> Size {
        self.size
    }
}

/// Places every node of `graph`, layer by layer, starting at the canvas middle.
///
/// Layer 0 holds the initial node alone. Each following layer collects the
/// not-yet-placed targets of the previous layer's transitions, in declaration
/// order and without repeats, and sits one layer distance further right,
/// vertically centred on the middle row. A node reachable from several
/// layers is placed once, in the first. When a layer comes out empty while
/// nodes remain, the first unplaced node in input order seeds it.
///
/// Placements are returned in placement order; an empty graph yields none.
pub(crate) fn place_nodes(graph: &TransitionGraph, canvas: Size, config: &LayoutConfig) -> Vec<Placement> {
    let Some(initial) = graph.initial() else {
        debug!("Empty state graph, nothing to place");
        return Vec::new();
    };

    let mut placed = vec![false; graph.node_count()];
    let mut placements = Vec::with_capacity(graph.node_count());
    let mut cursor = LayoutCursor::new(canvas.middle());

    placed[initial.index()] = true;
    placements.push(Placement {
        node: initial,
        layer: 0,
        top_left: cursor.position(),
        size: node_size(graph, initial, config),
    });

    let mut previous = vec![initial];
    let mut remaining = graph.node_count() - 1;
    let mut layer_number = 0;

    while remaining > 0 {
        layer_number += 1;
        cursor.next_layer(config.layer_distance());

        let mut layer: Vec<NodeIndex> = Vec::new();
        for &source in &previous {
            for (target, _) in graph.outgoing(source) {
                if !placed[target.index()] && !layer.contains(&target) {
                    layer.push(target);
                }
            }
        }

        if layer.is_empty() {
            let Some(seed) = graph.node_indices().find(|index| !placed[index.index()]) else {
                break;
            };
            debug!(
                layer = layer_number,
                seed:% = graph.node(seed).id();
                "No reachable nodes left, seeding layer"
            );
            layer.push(seed);
        }

        cursor.center_layer(layer.len(), config.element_distance());
        for &node in &layer {
            let size = node_size(graph, node, config);
            placements.push(Placement {
                node,
                layer: layer_number,
                top_left: cursor.position(),
                size,
            });
            placed[node.index()] = true;
            cursor.advance(config.element_distance(), size.height());
        }
        cursor.reset_row();

        trace!(layer = layer_number, nodes = layer.len(); "Placed layer");
        remaining -= layer.len();
        previous = layer;
    }

    placements
}

fn node_size(graph: &TransitionGraph, node: NodeIndex, config: &LayoutConfig) -> Size {
    match graph.node(node).shape() {
        NodeShape::State => config.state_size(),
        NodeShape::Final => config.final_state_size(),
    }
}
