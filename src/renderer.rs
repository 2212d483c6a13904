/*!
Drawing contract between the simulation loop and a frontend.

The crate draws nothing itself. Once per rendered frame the simulator
calls `begin_frame`, pushes every visible shape and closes the frame
with `end_frame`; a frontend implements these calls with whatever
toolkit it uses. [`NullRenderer`] discards everything and backs
headless runs.
*/

use nalgebra::Vector2;
use serde_derive::{Deserialize, Serialize};

/// What the camera looks at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Frame the whole world.
    World,
    /// Follow one robot by index.
    Robot(usize),
}

/// View flags and camera state, mutated by view commands.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ViewSettings {
    pub show_grid: bool,
    pub show_sensors: bool,
    pub show_tracks: bool,
    pub show_supervisors: bool,
    /// Magnification relative to the fit-to-focus scale.
    pub zoom: f32,
    pub focus: Focus,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            show_grid: false,
            show_sensors: true,
            show_tracks: true,
            show_supervisors: false,
            zoom: 1.,
            focus: Focus::World,
        }
    }
}

pub trait Renderer: Send {
    fn begin_frame(&mut self, view: &ViewSettings);
    /// Draws a closed polygon. `color` is 0xRRGGBB.
    fn draw_polygon(&mut self, points: &[Vector2<f32>], color: u32, filled: bool);
    /// Draws an open chain of segments.
    fn draw_polyline(&mut self, points: &[Vector2<f32>], color: u32);
    fn end_frame(&mut self);
}

/// Discards every call. Backs headless runs and most tests.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn begin_frame(&mut self, _view: &ViewSettings) {}

    fn draw_polygon(&mut self, _points: &[Vector2<f32>], _color: u32, _filled: bool) {}

    fn draw_polyline(&mut self, _points: &[Vector2<f32>], _color: u32) {}

    fn end_frame(&mut self) {}
}
