//! Explicit walking state of the layered layout.

use orthogram_core::geometry::Point;

/// The position where the next node of the layout is placed.
///
/// The cursor walks right one layer at a time and down within a layer. Every
/// layer starts from the canvas middle row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LayoutCursor {
    x: f32,
    y: f32,
    middle_y: f32,
}

impl LayoutCursor {
    pub(crate) fn new(origin: Point) -> Self {
        Self {
            x: origin.x(),
            y: origin.y(),
            middle_y: origin.y(),
        }
    }

    pub(crate) fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Moves to the column of the next layer
    pub(crate) fn next_layer(&mut self, layer_distance: f32) {
        self.x += layer_distance;
    }

    /// Raises the cursor so a layer of `count` nodes straddles the middle row.
    ///
    /// An even count raises by `count / 2` slots, an odd count above one by
    /// `(count - 1) / 2` slots, a single node is not raised.
    pub(crate) fn center_layer(&mut self, count: usize, element_distance: f32) {
        let slots = if count % 2 == 0 { count / 2 } else { (count - 1) / 2 };
        self.y -= element_distance * slots as f32;
    }

    /// Steps below a node of `height` just placed at the cursor
    pub(crate) fn advance(&mut self, element_distance: f32, height: f32) {
        self.y += element_distance + height;
    }

    /// Returns to the middle row
    pub(crate) fn reset_row(&mut self) {
        self.y = self.middle_y;
    }
}

/// Pair of accumulators spreading connectors that share a side of a node.
///
/// Each call to [`FanOut::next_up`] or [`FanOut::next_down`] moves the
/// matching accumulator one step further, until it has reached the limit,
/// and returns the new value. The sign of the step decides the direction
/// of the spread.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FanOut {
    up: f32,
    down: f32,
}

impl FanOut {
    pub(crate) fn next_up(&mut self, step: f32, limit: f32) -> f32 {
        advance(&mut self.up, step, limit)
    }

    pub(crate) fn next_down(&mut self, step: f32, limit: f32) -> f32 {
        advance(&mut self.down, step, limit)
    }
}

fn advance(value: &mut f32, step: f32, limit: f32) -> f32 {
    if value.abs() < limit {
        *value += step;
    }
    *value
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_layer_centering() {
        let expectations = [(0, 0.0), (1, 0.0), (2, -120.0), (3, -120.0), (4, -240.0), (5, -240.0)];
        for (count, expected) in expectations {
            let mut cursor = LayoutCursor::new(Point::new(0.0, 0.0));
            cursor.center_layer(count, 120.0);
            assert_approx_eq!(f32, cursor.position().y(), expected);
        }
    }

    #[test]
    fn test_walk_and_reset() {
        let mut cursor = LayoutCursor::new(Point::new(100.0, 500.0));
        cursor.next_layer(300.0);
        cursor.center_layer(2, 120.0);
        cursor.advance(120.0, 80.0);

        assert_eq!(cursor.position(), Point::new(400.0, 580.0));
        cursor.reset_row();
        assert_eq!(cursor.position(), Point::new(400.0, 500.0));
    }

    #[test]
    fn test_fan_out_saturates() {
        let mut fan_out = FanOut::default();
        let ups = (0..8).map(|_| fan_out.next_up(-15.0, 80.0)).collect::<Vec<_>>();
        assert_eq!(ups, [-15.0, -30.0, -45.0, -60.0, -75.0, -90.0, -90.0, -90.0]);

        let downs = (0..3).map(|_| fan_out.next_down(15.0, 80.0)).collect::<Vec<_>>();
        assert_eq!(downs, [15.0, 30.0, 45.0]);
    }
}
