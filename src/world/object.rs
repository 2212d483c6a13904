/*!
Envelope-bearing entity of the simulated world.
*/

use nalgebra::Vector2;

use crate::errors::SimResult;
use crate::geometry::{Polygon, Pose, Rect};

/// Pose, local envelope and color of a world object.
///
/// The local envelope is hulled once at construction and never changes.
/// The world-space envelope is a value derived from the pose; `set_pose`
/// is the only mutation point and keeps it in sync, so every query runs
/// on an up-to-date polygon.
#[derive(Debug, Clone)]
pub struct Body {
    pose: Pose,
    local: Polygon,
    world: Polygon,
    color: u32,
}

impl Body {
    /// ## Arguments
    /// * `pose` -- World pose of the object frame.
    /// * `points` -- Envelope in the object frame, hulled here.
    /// * `color` -- Draw color, `0xRRGGBB`.
    pub fn new(pose: Pose, points: Vec<Vector2<f32>>, color: u32) -> SimResult<Self> {
        let local = Polygon::new(points)?;
        let world = local.transformed(&pose);
        Ok(Self {
            pose,
            local,
            world,
            color,
        })
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.world = self.local.transformed(&pose);
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn local_envelope(&self) -> &Polygon {
        &self.local
    }

    pub fn world_envelope(&self) -> &Polygon {
        &self.world
    }

    /// Axis-aligned bounds of the world envelope, for broad-phase queries.
    pub fn bounding_rect(&self) -> Rect {
        self.world.bounding_rect()
    }

    /// Separating-axis test between the world envelopes.
    pub fn collides_with(&self, other: &Body) -> bool {
        self.world.collides(&other.world)
    }

    /// Crossing points between the two world envelopes.
    pub fn contact_points(&self, other: &Body) -> Vec<Vector2<f32>> {
        self.world.intersection_points(&other.world)
    }
}
