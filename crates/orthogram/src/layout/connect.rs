//! Routing one relationship per transition between placed nodes.
//!
//! Connectors leave a state from its right edge and enter their target on the
//! side facing back towards the source. The relative position of the two
//! frames selects one of four quadrants:
//!
//! | target is       | tail                     | head                       | fan-out from         |
//! |-----------------|--------------------------|----------------------------|----------------------|
//! | right, above    | source upper-right       | target upper-left          | source, up side      |
//! | right, below    | source lower-right       | target upper-left          | source, down side    |
//! | left, above     | source left, one joint   | target right, two joints   | target, up side      |
//! | left, below     | source left, one joint   | target right, one joint    | target, down side    |
//!
//! A target in the same column (including the source itself) is joined with a
//! fixed bulge instead of a fanned-out channel.

use indexmap::IndexMap;
use log::trace;
use petgraph::graph::NodeIndex;

use orthogram_core::{
    element::Element,
    geometry::Point,
    relationship::{Direction, RelationshipKind},
};

use super::{
    cursor::FanOut,
    graph::{NodeShape, TransitionGraph},
};
use crate::{config::LayoutConfig, factory::NewRelationship, route::Route};

/// Builds a route for every transition of every state in `elements`.
///
/// `elements` maps each placed node to its element. Sources are visited in
/// input order and their transitions in declaration order, so repeated runs
/// on the same input give the same offsets.
pub(crate) fn route_transitions(
    graph: &TransitionGraph,
    elements: &IndexMap<NodeIndex, Element>,
    config: &LayoutConfig,
) -> Vec<Route> {
    let mut incoming: IndexMap<NodeIndex, FanOut> = elements
        .keys()
        .map(|&node| (node, FanOut::default()))
        .collect();
    let mut routes = Vec::new();

    for source in graph.node_indices() {
        if graph.node(source).shape() == NodeShape::Final {
            continue;
        }
        let Some(from) = elements.get(&source) else {
            continue;
        };
        let mut outgoing = FanOut::default();

        for (target, event) in graph.outgoing(source) {
            let Some(to) = elements.get(&target) else {
                continue;
            };
            let target_fan_out = incoming.entry(target).or_default();
            let connector = Connector::new(from, to);
            let offset = connector.center_offset(&mut outgoing, target_fan_out, config);
            let (tail, head, center_offset) = connector.endpoints(offset, config);

            trace!(
                source:% = graph.node(source).id(),
                target:% = graph.node(target).id(),
                center_offset;
                "Routing transition"
            );

            let route = NewRelationship::new(RelationshipKind::Association, tail, head)
                .from_element(from.id())
                .to_element(to.id())
                .with_center_offset(center_offset)
                .with_optional_label(event.map(str::to_string))
                .build();
            routes.push(route);
        }
    }

    routes
}

/// Relative placement of a transition's two ends.
struct Connector<'a> {
    from: &'a Element,
    to: &'a Element,
    horizontal: Direction,
    upward: bool,
}

impl<'a> Connector<'a> {
    fn new(from: &'a Element, to: &'a Element) -> Self {
        let (source, target) = (from.frame(), to.frame());
        Self {
            from,
            to,
            horizontal: if source.x() > target.x() {
                Direction::Left
            } else {
                Direction::Right
            },
            upward: source.y() >= target.y(),
        }
    }

    fn same_column(&self) -> bool {
        self.from.frame().x() == self.to.frame().x()
    }

    /// Advances the accumulator of the quadrant and returns its new value.
    fn center_offset(&self, outgoing: &mut FanOut, incoming: &mut FanOut, config: &LayoutConfig) -> f32 {
        let (step, limit) = (config.fan_out_step(), config.fan_out_limit());
        match (self.upward, self.horizontal) {
            (true, Direction::Right) => outgoing.next_up(-step, limit),
            (true, Direction::Left) => incoming.next_up(step, limit),
            (false, Direction::Right) => outgoing.next_down(-step, limit),
            (false, Direction::Left) => incoming.next_down(step, limit),
        }
    }

    /// Returns the tail, the head and the channel offset of the connector.
    fn endpoints(&self, offset: f32, config: &LayoutConfig) -> (Point, Point, f32) {
        let joint = self.to.joint_spacing();
        let snap = self.to.upper_left_anchor();
        let right_side = if self.upward {
            self.from.upper_right_anchor()
        } else {
            self.from.lower_right_anchor()
        };

        if self.same_column() {
            let head_y = if self.upward {
                snap.y() + joint * 3.0
            } else {
                snap.y()
            };
            return (
                right_side,
                Point::new(self.to.frame().right(), head_y),
                config.same_column_offset(),
            );
        }

        match self.horizontal {
            Direction::Left => {
                let tail = Point::new(
                    self.from.frame().x(),
                    self.from.upper_right_anchor().y() + joint,
                );
                let head_y = if self.upward {
                    snap.y() + joint * 2.0
                } else {
                    snap.y() + joint
                };
                (tail, Point::new(self.to.frame().right(), head_y), offset)
            }
            Direction::Right => (right_side, snap, offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use orthogram_core::{
        element::{FinalStateElement, StateElement},
        geometry::{Frame, Size},
        identifier::Id,
    };

    use super::*;
    use crate::layout::graph::{FinalNode, StateGraph, StateNode};

    fn state(name: &str, x: f32, y: f32) -> Element {
        let frame = Frame::new(Point::new(x, y), Size::new(160.0, 80.0)).unwrap();
        StateElement::new(Id::new(name), frame, 10.0).into()
    }

    fn final_state(name: &str, x: f32, y: f32) -> Element {
        let frame = Frame::new(Point::new(x, y), Size::new(30.0, 30.0)).unwrap();
        FinalStateElement::new(Id::new(name), frame).into()
    }

    /// Builds the graph and pairs its nodes with `elements`, in input order.
    fn routes(input: &StateGraph, elements: Vec<Element>) -> Vec<Route> {
        let graph = TransitionGraph::build(input).unwrap();
        let elements = graph.node_indices().zip(elements).collect();
        route_transitions(&graph, &elements, &LayoutConfig::default())
    }

    #[test]
    fn test_right_quadrants_fan_out_from_source() {
        let input = StateGraph::new()
            .with_state(
                StateNode::new("a")
                    .with_transition("b", Some("up"))
                    .with_transition("c", Some("down"))
                    .with_transition("d", Some("further")),
            )
            .with_state(StateNode::new("b"))
            .with_state(StateNode::new("c"))
            .with_state(StateNode::new("d"));
        let routes = routes(
            &input,
            vec![
                state("a", 200.0, 342.0),
                state("b", 500.0, 222.0),
                state("c", 500.0, 422.0),
                state("d", 500.0, 622.0),
            ],
        );

        assert_eq!(routes.len(), 3);
        let up = &routes[0];
        assert_eq!(up.relationship().tail(), Point::new(360.0, 352.0));
        assert_eq!(up.relationship().head(), Point::new(500.0, 232.0));
        assert_approx_eq!(f32, up.segments()[1].x(), 415.0);
        assert_eq!(up.relationship().label(), Some("up"));

        let down = &routes[1];
        assert_eq!(down.relationship().tail(), Point::new(360.0, 412.0));
        assert_approx_eq!(f32, down.segments()[1].x(), 415.0);

        let further = &routes[2];
        assert_approx_eq!(f32, further.segments()[1].x(), 400.0);
        for route in &routes {
            route.validate().unwrap();
        }
    }

    #[test]
    fn test_left_quadrant_fans_out_at_target() {
        let input = StateGraph::new()
            .with_state(StateNode::new("a"))
            .with_state(StateNode::new("b").with_transition("a", Some("back")))
            .with_state(StateNode::new("c").with_transition("a", Some("also back")));
        let routes = routes(
            &input,
            vec![
                state("a", 200.0, 342.0),
                state("b", 500.0, 342.0),
                state("c", 500.0, 142.0),
            ],
        );

        let back = &routes[0];
        assert_eq!(back.relationship().tail(), Point::new(500.0, 372.0));
        assert_eq!(back.relationship().head(), Point::new(360.0, 392.0));
        assert_approx_eq!(f32, back.segments()[1].x(), 445.0);

        let also_back = &routes[1];
        assert_eq!(also_back.relationship().head(), Point::new(360.0, 372.0));
        assert_approx_eq!(f32, also_back.segments()[1].x(), 445.0);
    }

    #[test]
    fn test_self_loop_uses_same_column_bulge() {
        let input = StateGraph::new().with_state(StateNode::new("a").with_transition("a", None));
        let routes = routes(&input, vec![state("a", 100.0, 100.0)]);

        let relationship = routes[0].relationship();
        assert_eq!(relationship.tail(), Point::new(260.0, 110.0));
        assert_eq!(relationship.head(), Point::new(260.0, 170.0));
        assert_approx_eq!(f32, routes[0].segments()[1].x(), 280.0);
        assert_eq!(relationship.from_element(), relationship.to_element());
        routes[0].validate().unwrap();
    }

    #[test]
    fn test_same_column_requires_equal_x() {
        let input = StateGraph::new()
            .with_state(
                StateNode::new("a")
                    .with_transition("b", Some("stacked"))
                    .with_transition("c", Some("offset")),
            )
            .with_state(StateNode::new("b"))
            .with_state(StateNode::new("c"));
        let routes = routes(
            &input,
            vec![
                state("a", 200.0, 342.0),
                state("b", 200.0, 142.0),
                state("c", 200.5, 142.0),
            ],
        );

        let stacked = routes[0].relationship();
        assert_eq!(stacked.tail(), Point::new(360.0, 352.0));
        assert_eq!(stacked.head(), Point::new(360.0, 212.0));
        assert_approx_eq!(f32, routes[0].segments()[1].x(), 380.0);

        let offset = routes[1].relationship();
        assert_eq!(offset.head(), Point::new(200.5, 152.0));
        assert_eq!(offset.direction(), Direction::Left);
    }

    #[test]
    fn test_final_target_attaches_at_circle_center() {
        let input = StateGraph::new()
            .with_state(StateNode::new("a").with_transition("end", None))
            .with_final(FinalNode::new("end"));
        let routes = routes(&input, vec![state("a", 200.0, 342.0), final_state("end", 500.0, 342.0)]);

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].relationship().tail(), Point::new(360.0, 352.0));
        assert_eq!(routes[0].relationship().head(), Point::new(500.0, 357.0));
        assert_eq!(routes[0].relationship().kind(), RelationshipKind::Association);
    }
}
