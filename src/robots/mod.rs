/*!
Robots.

A robot owns its kinematics, its body and its sensor ring. Supervisors
drive it through [`MotionCommand`]s; everything they may look at in
return is collected into a [`RobotInfo`] snapshot once per tick.
*/

use std::fmt::Debug;

use serde_derive::{Deserialize, Serialize};

use crate::errors::SimResult;
use crate::geometry::Pose;
use crate::robots::differential::{DifferentialConfig, DifferentialRobot};
use crate::sensors::{ProximityReading, ProximitySensor};
use crate::world::Body;

pub mod differential;

/// Wheel angular speeds, in rad/s.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WheelSpeeds {
    pub left: f32,
    pub right: f32,
}

impl Default for WheelSpeeds {
    fn default() -> Self {
        Self {
            left: 0.,
            right: 0.,
        }
    }
}

/// Actuation request produced by a supervisor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum MotionCommand {
    Differential(WheelSpeeds),
}

/// Snapshot of one robot, handed to its supervisor every tick.
#[derive(Debug, Clone)]
pub struct RobotInfo {
    pub pose: Pose,
    /// Current wheel speeds, in rad/s.
    pub wheel_speeds: (f32, f32),
    pub proximity: Vec<ProximityReading>,
}

impl RobotInfo {
    /// Smallest proximity reading, `None` when the robot has no sensors.
    pub fn min_proximity(&self) -> Option<f32> {
        self.proximity
            .iter()
            .map(|reading| reading.distance)
            .min_by(|a, b| a.total_cmp(b))
    }
}

pub trait Robot: Debug + Send {
    /// Advances the kinematics by `dt` seconds.
    fn step(&mut self, dt: f32);
    fn pose(&self) -> Pose;
    /// Body carrying the world-space envelope.
    fn body(&self) -> &Body;
    /// Recomputes sensor world envelopes from the current pose and
    /// returns every reading to "nothing in range".
    fn refresh_sensors(&mut self);
    fn sensors(&self) -> &[ProximitySensor];
    fn sensors_mut(&mut self) -> &mut [ProximitySensor];
    fn info(&self) -> RobotInfo;
    fn set_inputs(&mut self, command: &MotionCommand);
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum RobotConfig {
    Differential(DifferentialConfig),
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig::Differential(DifferentialConfig::default())
    }
}

/// Helper function to make the right [`Robot`] from the given
/// configuration.
pub fn make_robot_from_config(
    config: &RobotConfig,
    pose: Pose,
    color: u32,
) -> SimResult<Box<dyn Robot>> {
    match config {
        RobotConfig::Differential(cfg) => {
            Ok(Box::new(DifferentialRobot::from_config(cfg, pose, color)?) as Box<dyn Robot>)
        }
    }
}
