//! Configuration types for Orthogram layout.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! configuration file. Missing fields fall back to the defaults below.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and canvas settings.
//! - [`LayoutConfig`] - Spacing and sizing constants of the layered importer.
//! - [`CanvasConfig`] - The canvas extent used to seed the initial placement.
//!
//! # Example
//!
//! ```
//! # use orthogram::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().layer_distance(), 300.0);
//! assert_eq!(config.canvas().size().width(), 4400.0);
//! ```

use serde::Deserialize;

use orthogram_core::geometry::Size;

/// Top-level configuration combining layout and canvas settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Canvas configuration section.
    #[serde(default)]
    canvas: CanvasConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, canvas: CanvasConfig) -> Self {
        Self { layout, canvas }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }
}

/// Spacing and sizing used by the layered auto-layout importer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal distance between consecutive layers.
    layer_distance: f32,

    /// Vertical gap between elements of the same layer.
    element_distance: f32,

    /// Increment applied to a fan-out accumulator per connector.
    fan_out_step: f32,

    /// Spread at which fan-out accumulators stop growing.
    fan_out_limit: f32,

    /// Bulge of a connector whose ends sit in the same layer.
    same_column_offset: f32,

    /// Width of a generated state box.
    state_width: f32,

    /// Height of a generated state box.
    state_height: f32,

    /// Corner radius of a generated state box.
    state_corner_radius: f32,

    /// Radius of a generated final-state circle.
    final_state_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_distance: 300.0,
            element_distance: 120.0,
            fan_out_step: 15.0,
            fan_out_limit: 80.0,
            same_column_offset: 20.0,
            state_width: 160.0,
            state_height: 80.0,
            state_corner_radius: 10.0,
            final_state_radius: 15.0,
        }
    }
}

impl LayoutConfig {
    pub fn layer_distance(&self) -> f32 {
        self.layer_distance
    }

    pub fn element_distance(&self) -> f32 {
        self.element_distance
    }

    pub fn fan_out_step(&self) -> f32 {
        self.fan_out_step
    }

    pub fn fan_out_limit(&self) -> f32 {
        self.fan_out_limit
    }

    pub fn same_column_offset(&self) -> f32 {
        self.same_column_offset
    }

    /// Size of a generated state box.
    pub fn state_size(&self) -> Size {
        Size::new(self.state_width, self.state_height)
    }

    pub fn state_corner_radius(&self) -> f32 {
        self.state_corner_radius
    }

    /// Size of the square frame around a final-state circle.
    pub fn final_state_size(&self) -> Size {
        let diameter = self.final_state_radius * 2.0;
        Size::new(diameter, diameter)
    }

    /// Set the horizontal distance between layers
    pub fn set_layer_distance(&mut self, distance: f32) -> &mut Self {
        self.layer_distance = distance;
        self
    }

    /// Set the vertical gap between elements of a layer
    pub fn set_element_distance(&mut self, distance: f32) -> &mut Self {
        self.element_distance = distance;
        self
    }

    /// Set the size of generated state boxes
    pub fn set_state_size(&mut self, size: Size) -> &mut Self {
        self.state_width = size.width();
        self.state_height = size.height();
        self
    }
}

/// Canvas extent used to seed the initial placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    width: f32,
    height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 4400.0,
            height: 4684.0,
        }
    }
}

impl CanvasConfig {
    pub fn new(size: Size) -> Self {
        Self {
            width: size.width(),
            height: size.height(),
        }
    }

    /// Returns the canvas extent.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutConfig::default();
        assert_approx_eq!(f32, layout.element_distance(), 120.0);
        assert_approx_eq!(f32, layout.fan_out_step(), 15.0);
        assert_approx_eq!(f32, layout.fan_out_limit(), 80.0);
        assert_approx_eq!(f32, layout.same_column_offset(), 20.0);
        assert_eq!(layout.final_state_size(), Size::new(30.0, 30.0));
    }

    #[test]
    fn test_setters_chain() {
        let mut layout = LayoutConfig::default();
        layout
            .set_layer_distance(200.0)
            .set_element_distance(50.0)
            .set_state_size(Size::new(100.0, 60.0));

        assert_approx_eq!(f32, layout.layer_distance(), 200.0);
        assert_approx_eq!(f32, layout.element_distance(), 50.0);
        assert_eq!(layout.state_size(), Size::new(100.0, 60.0));
    }

    #[test]
    fn test_canvas_new() {
        let canvas = CanvasConfig::new(Size::new(800.0, 600.0));
        assert_eq!(canvas.size(), Size::new(800.0, 600.0));
    }
}
