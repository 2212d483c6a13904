/*!
Planar pose with frame-composition operators.
*/

use std::ops::{Shl, Shr};

use nalgebra::Vector2;
use serde_derive::{Deserialize, Serialize};

use super::mod2pi;

/// Position and heading in the plane. Angles are counter-clockwise
/// positive, in radians.
///
/// Poses compose with the shift operators: `local >> frame` expresses a
/// pose given in `frame` coordinates in the coordinates of the parent of
/// `frame`, and `world << frame` is the inverse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub theta: f32,
}

impl Pose {
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self { x, y, theta }
    }

    /// Position part of the pose.
    pub fn position(&self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }

    /// Same pose with the heading wrapped to `(-PI, PI]`.
    pub fn normalized(self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            theta: mod2pi(self.theta),
        }
    }

    /// Expresses a point of this frame in parent coordinates.
    pub fn transform_point(&self, point: Vector2<f32>) -> Vector2<f32> {
        let (sin, cos) = self.theta.sin_cos();
        Vector2::new(
            self.x + point.x * cos - point.y * sin,
            self.y + point.x * sin + point.y * cos,
        )
    }

    /// Expresses a parent-coordinates point in this frame.
    pub fn transform_inverse(&self, point: Vector2<f32>) -> Vector2<f32> {
        let (sin, cos) = self.theta.sin_cos();
        let dx = point.x - self.x;
        let dy = point.y - self.y;
        Vector2::new(dx * cos + dy * sin, -dx * sin + dy * cos)
    }
}

impl Shr for Pose {
    type Output = Pose;

    /// `self` is local in `reference`; the result is `self` in the frame
    /// `reference` lives in.
    fn shr(self, reference: Pose) -> Pose {
        let position = reference.transform_point(self.position());
        Pose {
            x: position.x,
            y: position.y,
            theta: mod2pi(self.theta + reference.theta),
        }
    }
}

impl Shl for Pose {
    type Output = Pose;

    /// `self` is expressed in the frame `reference` lives in; the result is
    /// `self` local to `reference`. Inverse of `>>`.
    fn shl(self, reference: Pose) -> Pose {
        let position = reference.transform_inverse(self.position());
        Pose {
            x: position.x,
            y: position.y,
            theta: mod2pi(self.theta - reference.theta),
        }
    }
}
