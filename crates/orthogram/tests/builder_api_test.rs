//! Integration tests for the DiagramBuilder API
//!
//! These tests import small state machines and interact with the resulting
//! diagram through the public API only.

use orthogram::{
    DiagramBuilder, OrthogramError,
    config::{AppConfig, CanvasConfig, LayoutConfig},
    geometry::{Point, Size},
    layout::{FinalNode, StateGraph, StateNode},
};

fn order_flow() -> StateGraph {
    StateGraph::new()
        .with_initial("cart")
        .with_state(StateNode::new("cart").with_transition("checkout", Some("pay")))
        .with_state(
            StateNode::new("checkout")
                .with_transition("shipped", Some("confirm"))
                .with_transition("cart", Some("cancel")),
        )
        .with_state(StateNode::new("shipped").with_transition("delivered", None))
        .with_final(FinalNode::new("delivered"))
}

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_import_produces_valid_chains() {
    let builder = DiagramBuilder::default();
    let (diagram, _) = builder.import(&order_flow()).expect("Failed to import");

    assert_eq!(diagram.elements().count(), 4);
    assert_eq!(diagram.relationships().count(), 4);
    assert_eq!(diagram.segments().count(), 12);
    diagram.validate().expect("Imported chains should be well-formed");
}

#[test]
fn test_builder_with_config() {
    let mut layout = LayoutConfig::default();
    layout.set_layer_distance(200.0);
    let config = AppConfig::new(layout, CanvasConfig::new(Size::new(1000.0, 800.0)));

    let builder = DiagramBuilder::new(config);
    let (diagram, _) = builder.import(&order_flow()).expect("Failed to import");

    let cart = diagram.element_named("cart").expect("cart is placed");
    let checkout = diagram.element_named("checkout").expect("checkout is placed");
    assert_eq!(cart.frame().top_left(), Point::new(500.0, 400.0));
    assert_eq!(checkout.frame().x(), 700.0);
}

#[test]
fn test_dragging_an_imported_state_keeps_chains_valid() {
    let builder = DiagramBuilder::default();
    let (mut diagram, _) = builder.import(&order_flow()).expect("Failed to import");

    let checkout = diagram.element_named("checkout").expect("checkout is placed");
    let id = checkout.id();
    let target = checkout.frame().top_left().add_point(Point::new(35.0, -120.0));
    let heads_before = diagram
        .relationships_to(id)
        .map(|relationship| relationship.head())
        .collect::<Vec<_>>();

    diagram.move_element(id, target).expect("Failed to move");

    let heads_after = diagram
        .relationships_to(id)
        .map(|relationship| relationship.head())
        .collect::<Vec<_>>();
    for (before, after) in heads_before.iter().zip(&heads_after) {
        assert_eq!(*after, before.add_point(Point::new(35.0, -120.0)));
    }
    diagram.validate().expect("Chains should survive the move");
}

#[test]
fn test_skipped_transitions_are_reported() {
    let graph = StateGraph::new()
        .with_state(StateNode::new("a").with_transition("nowhere", Some("lost")))
        .with_state(StateNode::new("b"));

    let layout = DiagramBuilder::default().layout(&graph).expect("Failed to lay out");
    assert_eq!(layout.skipped().len(), 1);
    assert_eq!(layout.skipped()[0].event(), Some("lost"));
    assert!(layout.relationships().is_empty());
}

#[test]
fn test_import_returns_skipped_transitions() {
    let graph = StateGraph::new()
        .with_state(StateNode::new("running").with_transition("paused", Some("pause")))
        .with_state(StateNode::new("paused").with_transition("hibernating", Some("resume")));

    let (diagram, skipped) = DiagramBuilder::default().import(&graph).expect("Failed to import");

    assert_eq!(diagram.elements().count(), 2);
    assert_eq!(diagram.relationships().count(), 1);
    diagram.validate().expect("Drawn transitions should be well-formed");

    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].source(), "paused");
    assert_eq!(skipped[0].target(), "hibernating");
    assert_eq!(skipped[0].event(), Some("resume"));
}

#[test]
fn test_import_without_dangling_transitions_skips_nothing() {
    let (_, skipped) = DiagramBuilder::default().import(&order_flow()).expect("Failed to import");
    assert!(skipped.is_empty());
}

#[test]
fn test_duplicate_ids_return_error() {
    let graph = StateGraph::new()
        .with_state(StateNode::new("same"))
        .with_final(FinalNode::new("same"));

    let result = DiagramBuilder::default().import(&graph);
    assert!(matches!(result, Err(OrthogramError::Graph(_))));
}

#[test]
fn test_builder_reusability() {
    let builder = DiagramBuilder::default();

    let (first, _) = builder.import(&order_flow()).expect("Failed to import first");
    let (second, _) = builder.import(&order_flow()).expect("Failed to import second");

    let frames = |diagram: &orthogram::Diagram| {
        diagram
            .elements()
            .map(|element| element.frame().top_left())
            .collect::<Vec<_>>()
    };
    assert_eq!(frames(&first), frames(&second));
}
