/*!
Proximity sensing.

A proximity sensor is a cone-shaped beam attached to a robot. Every tick
the simulator refreshes the sensor's world envelope from the robot pose,
resets the reading to the maximum range and narrows it against every
nearby obstacle and robot, keeping the minimum distance seen.
*/

use std::f32::consts::PI;

use nalgebra::Vector2;
use serde_derive::{Deserialize, Serialize};

use crate::errors::SimResult;
use crate::geometry::{Polygon, Pose, Rect, segments_intersection};

/// Snapshot of one sensor, handed to supervisors inside the robot info.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityReading {
    /// Mount pose in the robot frame.
    pub mount: Pose,
    /// Measured distance from the sensor apex, `max_range` when clear.
    pub distance: f32,
    pub max_range: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ProximitySensorConfig {
    /// Mount pose in the robot frame.
    pub pose: Pose,
    /// Blind distance under which the sensor saturates, in meters.
    pub min_range: f32,
    /// Largest measurable distance, in meters.
    pub max_range: f32,
    /// Full opening angle of the beam, in radians.
    pub beam_angle: f32,
}

impl Default for ProximitySensorConfig {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            min_range: 0.02, // m
            max_range: 0.3,  // m
            beam_angle: PI / 6.,
        }
    }
}

/// Cone proximity sensor. Readings are distances from the apex, clamped
/// to `[min_range, max_range]`.
#[derive(Debug, Clone)]
pub struct ProximitySensor {
    mount: Pose,
    min_range: f32,
    max_range: f32,
    half_angle: f32,
    local_cone: Polygon,
    world_pose: Pose,
    world_cone: Polygon,
    reading: f32,
}

impl ProximitySensor {
    pub fn from_config(config: &ProximitySensorConfig) -> SimResult<Self> {
        let half = config.beam_angle / 2.;
        let (sin, cos) = half.sin_cos();
        let near = config.min_range;
        let far = config.max_range;
        let local_cone = Polygon::new(vec![
            Vector2::new(near * cos, -near * sin),
            Vector2::new(far * cos, -far * sin),
            Vector2::new(far, 0.),
            Vector2::new(far * cos, far * sin),
            Vector2::new(near * cos, near * sin),
        ])?;
        let world_cone = local_cone.clone();
        Ok(Self {
            mount: config.pose,
            min_range: near,
            max_range: far,
            half_angle: half,
            local_cone,
            world_pose: config.pose,
            world_cone,
            reading: far,
        })
    }

    /// Recomputes the world pose and envelope from the carrying robot.
    pub fn update_pose(&mut self, robot_pose: Pose) {
        self.world_pose = self.mount >> robot_pose;
        self.world_cone = self.local_cone.transformed(&self.world_pose);
    }

    /// Returns the reading to "nothing in range".
    pub fn reset(&mut self) {
        self.reading = self.max_range;
    }

    /// Narrows the reading against one candidate envelope.
    ///
    /// Casts the center and the two boundary rays of the beam from the
    /// apex and intersects them with the candidate's edges; the reading
    /// keeps the minimum distance seen since the last [`reset`].
    ///
    /// ## Return
    /// `true` when the candidate is inside the measured range.
    pub fn update_distance(&mut self, target: &Polygon) -> bool {
        let points = target.points();
        let n = points.len();
        if n < 2 {
            // a lone point has no edges to hit
            return false;
        }
        let apex = self.world_pose.position();
        let mut closest: Option<f32> = None;
        for ray_angle in [-self.half_angle, 0., self.half_angle] {
            let end = self.world_pose.transform_point(Vector2::new(
                self.max_range * ray_angle.cos(),
                self.max_range * ray_angle.sin(),
            ));
            for i in 0..n {
                let b1 = points[i];
                let b2 = points[(i + 1) % n];
                if let Some(hit) = segments_intersection(&apex, &end, &b1, &b2) {
                    let d = (hit - apex).norm();
                    closest = Some(match closest {
                        Some(best) => best.min(d),
                        None => d,
                    });
                }
            }
        }
        match closest {
            Some(d) => {
                let d = d.clamp(self.min_range, self.max_range);
                if d < self.reading {
                    self.reading = d;
                }
                true
            }
            None => false,
        }
    }

    /// Measured distance, `max_range` when nothing was seen.
    pub fn distance(&self) -> f32 {
        self.reading
    }

    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    pub fn mount(&self) -> Pose {
        self.mount
    }

    pub fn world_pose(&self) -> Pose {
        self.world_pose
    }

    /// Beam envelope in world coordinates.
    pub fn world_envelope(&self) -> &Polygon {
        &self.world_cone
    }

    /// Bounds of the beam envelope, for broad-phase queries.
    pub fn bounding_rect(&self) -> Rect {
        self.world_cone.bounding_rect()
    }

    pub fn reading(&self) -> ProximityReading {
        ProximityReading {
            mount: self.mount,
            distance: self.reading,
            max_range: self.max_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use nalgebra::Vector2;

    use super::{ProximitySensor, ProximitySensorConfig};
    use crate::geometry::{Polygon, Pose};

    fn sensor_at(pose: Pose) -> ProximitySensor {
        let mut sensor = ProximitySensor::from_config(&ProximitySensorConfig {
            pose,
            min_range: 0.02,
            max_range: 0.3,
            beam_angle: PI / 6.,
        })
        .unwrap();
        sensor.update_pose(Pose::default());
        sensor
    }

    fn wall(x: f32) -> Polygon {
        Polygon::new(vec![
            Vector2::new(x, -0.5),
            Vector2::new(x + 0.05, -0.5),
            Vector2::new(x + 0.05, 0.5),
            Vector2::new(x, 0.5),
        ])
        .unwrap()
    }

    #[test]
    fn measures_the_facing_wall() {
        let mut sensor = sensor_at(Pose::default());
        sensor.reset();
        assert!(sensor.update_distance(&wall(0.15)));
        assert!(
            (sensor.distance() - 0.15).abs() < 1e-3,
            "distance = {}",
            sensor.distance()
        );
    }

    #[test]
    fn clear_view_keeps_max_range() {
        let mut sensor = sensor_at(Pose::default());
        sensor.reset();
        assert!(!sensor.update_distance(&wall(2.)));
        assert_eq!(sensor.distance(), 0.3);
    }

    #[test]
    fn keeps_the_minimum_over_candidates() {
        let mut sensor = sensor_at(Pose::default());
        sensor.reset();
        sensor.update_distance(&wall(0.25));
        sensor.update_distance(&wall(0.1));
        sensor.update_distance(&wall(0.2));
        assert!((sensor.distance() - 0.1).abs() < 1e-3);
    }

    #[test]
    fn blind_zone_saturates_to_min_range() {
        let mut sensor = sensor_at(Pose::default());
        sensor.reset();
        sensor.update_distance(&wall(0.005));
        assert!((sensor.distance() - 0.02).abs() < 1e-4);
    }

    #[test]
    fn follows_the_robot_frame() {
        // mounted a quarter turn left, robot at (1, 1)
        let mut sensor = sensor_at(Pose::new(0., 0., FRAC_PI_2));
        sensor.update_pose(Pose::new(1., 1., 0.));
        sensor.reset();
        // wall above the robot: local +x of the sensor points to +y world
        let above = Polygon::new(vec![
            Vector2::new(0.5, 1.2),
            Vector2::new(1.5, 1.2),
            Vector2::new(1.5, 1.25),
            Vector2::new(0.5, 1.25),
        ])
        .unwrap();
        assert!(sensor.update_distance(&above));
        assert!(
            (sensor.distance() - 0.2).abs() < 1e-3,
            "distance = {}",
            sensor.distance()
        );
    }
}
