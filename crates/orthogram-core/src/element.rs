//! Diagram elements as seen by the connector engine.
//!
//! Routing only cares about an element's key and its [`Frame`]. The element
//! kinds below add the one extra measurement the anchors need: the vertical
//! inset of the attachment points from the top and bottom edges.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Frame, Point},
    identifier::{ElementId, Id},
};

/// A state box with rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateElement {
    id: ElementId,
    name: Id,
    frame: Frame,
    corner_radius: f32,
}

impl StateElement {
    pub fn new(name: Id, frame: Frame, corner_radius: f32) -> Self {
        Self {
            id: ElementId::new(),
            name,
            frame,
            corner_radius,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }
}

/// A terminal state drawn as a circle inscribed in its frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalStateElement {
    id: ElementId,
    name: Id,
    frame: Frame,
}

impl FinalStateElement {
    pub fn new(name: Id, frame: Frame) -> Self {
        Self {
            id: ElementId::new(),
            name,
            frame,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Radius of the circle
    pub fn radius(&self) -> f32 {
        self.frame.width() / 2.0
    }
}

/// Any other box-shaped element (class, interface, enumeration, ...).
///
/// Its text layout is owned by the view layer; routing only reads the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockElement {
    id: ElementId,
    frame: Frame,
}

impl BlockElement {
    pub fn new(frame: Frame) -> Self {
        Self {
            id: ElementId::new(),
            frame,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

/// A diagram element of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    State(StateElement),
    FinalState(FinalStateElement),
    Block(BlockElement),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Self::State(state) => state.id,
            Self::FinalState(final_state) => final_state.id,
            Self::Block(block) => block.id,
        }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            Self::State(state) => &state.frame,
            Self::FinalState(final_state) => &final_state.frame,
            Self::Block(block) => &block.frame,
        }
    }

    /// Returns the state name for state-like elements.
    pub fn name(&self) -> Option<Id> {
        match self {
            Self::State(state) => Some(state.name),
            Self::FinalState(final_state) => Some(final_state.name),
            Self::Block(_) => None,
        }
    }

    /// Replaces the frame with one moved by `offset`.
    pub fn translate(&mut self, offset: Point) {
        let frame = match self {
            Self::State(state) => &mut state.frame,
            Self::FinalState(final_state) => &mut final_state.frame,
            Self::Block(block) => &mut block.frame,
        };
        *frame = frame.translate(offset);
    }

    /// Vertical distance between the top (or bottom) edge and the
    /// attachment points on the left and right edges.
    pub fn anchor_inset(&self) -> f32 {
        match self {
            Self::State(state) => state.corner_radius,
            Self::FinalState(final_state) => final_state.radius(),
            Self::Block(_) => 0.0,
        }
    }

    /// Spacing between the joints along a side edge.
    ///
    /// The straight part of the edge (between the corner insets) is split in
    /// three; incoming connectors attach one or two steps below the upper anchor.
    /// Circles have a single joint, so their spacing is zero.
    pub fn joint_spacing(&self) -> f32 {
        (self.frame().height() - self.anchor_inset() * 2.0) / 3.0
    }

    /// Upper attachment point on the right edge
    pub fn upper_right_anchor(&self) -> Point {
        let frame = self.frame();
        Point::new(frame.right(), frame.y() + self.anchor_inset())
    }

    /// Lower attachment point on the right edge
    pub fn lower_right_anchor(&self) -> Point {
        let frame = self.frame();
        Point::new(frame.right(), frame.bottom() - self.anchor_inset())
    }

    /// Upper attachment point on the left edge
    pub fn upper_left_anchor(&self) -> Point {
        let frame = self.frame();
        Point::new(frame.x(), frame.y() + self.anchor_inset())
    }
}

impl From<StateElement> for Element {
    fn from(state: StateElement) -> Self {
        Self::State(state)
    }
}

impl From<FinalStateElement> for Element {
    fn from(final_state: FinalStateElement) -> Self {
        Self::FinalState(final_state)
    }
}

impl From<BlockElement> for Element {
    fn from(block: BlockElement) -> Self {
        Self::Block(block)
    }
}
