/*!
Low-level control strategies. Supervisors own controller values and
decide which one runs on a given tick.
*/

use std::fmt::Debug;

use crate::robots::{MotionCommand, RobotInfo, WheelSpeeds};

/// Computes one actuation request per tick from the robot snapshot.
pub trait Controller: Debug + Send {
    fn execute(&mut self, info: &RobotInfo, dt: f32) -> MotionCommand;
    /// Drops any accumulated state.
    fn restart(&mut self);
}

/// Holds both wheels at fixed speeds.
#[derive(Debug, Clone)]
pub struct Cruise {
    speeds: WheelSpeeds,
}

impl Cruise {
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            speeds: WheelSpeeds { left, right },
        }
    }

    pub fn set_speeds(&mut self, left: f32, right: f32) {
        self.speeds = WheelSpeeds { left, right };
    }
}

impl Controller for Cruise {
    fn execute(&mut self, _info: &RobotInfo, _dt: f32) -> MotionCommand {
        MotionCommand::Differential(self.speeds)
    }

    fn restart(&mut self) {}
}

/// Stops the robot.
#[derive(Debug, Clone, Default)]
pub struct Halt;

impl Controller for Halt {
    fn execute(&mut self, _info: &RobotInfo, _dt: f32) -> MotionCommand {
        MotionCommand::Differential(WheelSpeeds::default())
    }

    fn restart(&mut self) {}
}
