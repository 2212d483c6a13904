/*!
Two-wheel differential-drive robot.

Wheel speeds map to a forward and an angular velocity; the pose then
advances in closed form, along a straight segment or along an arc of
radius `v / omega`, so the integration is exact for constant inputs.
*/

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use libm::atan2f;
use nalgebra::Vector2;
use serde_derive::{Deserialize, Serialize};

use crate::errors::SimResult;
use crate::geometry::{GEOM_EPS, Pose};
use crate::robots::{MotionCommand, Robot, RobotInfo, WheelSpeeds};
use crate::sensors::{ProximitySensor, ProximitySensorConfig};
use crate::world::Body;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct DifferentialConfig {
    /// Wheel radius, in meters.
    pub wheel_radius: f32,
    /// Distance between the wheel contact points, in meters.
    pub wheel_base: f32,
    /// Envelope corners in the robot frame, in meters.
    pub envelope: Vec<[f32; 2]>,
    /// Proximity sensor ring.
    pub sensors: Vec<ProximitySensorConfig>,
}

impl Default for DifferentialConfig {
    fn default() -> Self {
        Self {
            wheel_radius: 0.0325, // m
            wheel_base: 0.1,      // m
            envelope: vec![
                [-0.05, -0.05],
                [0.05, -0.05],
                [0.07, 0.],
                [0.05, 0.05],
                [-0.05, 0.05],
            ],
            sensors: default_sensor_ring(),
        }
    }
}

/// Five sensors looking right, half-right, ahead, half-left and left.
fn default_sensor_ring() -> Vec<ProximitySensorConfig> {
    [-FRAC_PI_2, -FRAC_PI_4, 0., FRAC_PI_4, FRAC_PI_2]
        .iter()
        .map(|&angle| ProximitySensorConfig {
            pose: Pose::new(0.06 * angle.cos(), 0.06 * angle.sin(), angle),
            ..ProximitySensorConfig::default()
        })
        .collect()
}

#[derive(Debug)]
pub struct DifferentialRobot {
    wheel_radius: f32,
    wheel_base: f32,
    wheel_speeds: WheelSpeeds,
    body: Body,
    sensors: Vec<ProximitySensor>,
}

impl DifferentialRobot {
    pub fn from_config(config: &DifferentialConfig, pose: Pose, color: u32) -> SimResult<Self> {
        let points = config
            .envelope
            .iter()
            .map(|&[x, y]| Vector2::new(x, y))
            .collect();
        let body = Body::new(pose, points, color)?;
        let mut sensors = Vec::with_capacity(config.sensors.len());
        for sensor_config in &config.sensors {
            sensors.push(ProximitySensor::from_config(sensor_config)?);
        }
        let mut robot = Self {
            wheel_radius: config.wheel_radius,
            wheel_base: config.wheel_base,
            wheel_speeds: WheelSpeeds::default(),
            body,
            sensors,
        };
        robot.refresh_sensors();
        Ok(robot)
    }

    /// Forward and angular velocity for the current wheel speeds.
    fn unicycle_velocities(&self) -> (f32, f32) {
        let velocity = self.wheel_radius * (self.wheel_speeds.left + self.wheel_speeds.right) / 2.;
        let omega =
            self.wheel_radius * (self.wheel_speeds.right - self.wheel_speeds.left) / self.wheel_base;
        (velocity, omega)
    }
}

impl Robot for DifferentialRobot {
    fn step(&mut self, dt: f32) {
        let (velocity, omega) = self.unicycle_velocities();
        let pose = self.body.pose();
        let theta = pose.theta;
        let next = if omega.abs() < GEOM_EPS {
            // straight segment
            Pose::new(
                pose.x + velocity * theta.cos() * dt,
                pose.y + velocity * theta.sin() * dt,
                theta,
            )
        } else {
            // arc of radius velocity / omega
            let half_turn = omega * dt / 2.;
            let chord = 2. * velocity / omega * half_turn.sin();
            let heading = theta + omega * dt;
            Pose::new(
                pose.x + chord * (theta + half_turn).cos(),
                pose.y + chord * (theta + half_turn).sin(),
                atan2f(heading.sin(), heading.cos()),
            )
        };
        self.body.set_pose(next);
    }

    fn pose(&self) -> Pose {
        self.body.pose()
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn refresh_sensors(&mut self) {
        let pose = self.body.pose();
        for sensor in &mut self.sensors {
            sensor.update_pose(pose);
            sensor.reset();
        }
    }

    fn sensors(&self) -> &[ProximitySensor] {
        &self.sensors
    }

    fn sensors_mut(&mut self) -> &mut [ProximitySensor] {
        &mut self.sensors
    }

    fn info(&self) -> RobotInfo {
        RobotInfo {
            pose: self.body.pose(),
            wheel_speeds: (self.wheel_speeds.left, self.wheel_speeds.right),
            proximity: self.sensors.iter().map(|sensor| sensor.reading()).collect(),
        }
    }

    fn set_inputs(&mut self, command: &MotionCommand) {
        match command {
            MotionCommand::Differential(speeds) => self.wheel_speeds = *speeds,
        }
    }
}
