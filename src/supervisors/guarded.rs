use std::f32::consts::PI;

use nalgebra::Vector2;
use serde_derive::{Deserialize, Serialize};

use crate::errors::{SimError, SimErrorTypes, SimResult};
use crate::geometry::Pose;
use crate::renderer::Renderer;
use crate::robots::{MotionCommand, RobotInfo};
use crate::supervisors::controllers::{Controller, Cruise, Halt};
use crate::supervisors::{Supervisor, SupervisorParams};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct GuardedParams {
    /// Wheel speed of both wheels while cruising, in rad/s.
    pub cruise_speed: f32,
    /// Proximity reading under which the robot latches to a halt, in
    /// meters.
    pub stop_distance: f32,
}

impl Default for GuardedParams {
    fn default() -> Self {
        Self {
            cruise_speed: 20.,   // rad/s
            stop_distance: 0.05, // m
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    Cruising,
    Halted,
}

/// Two-state guard: cruise straight ahead until a proximity reading
/// drops under the stop distance, then hold still. The halt latches;
/// only a parameter change re-arms the guard.
#[derive(Debug)]
pub struct GuardedSupervisor {
    params: GuardedParams,
    state: GuardState,
    cruise: Cruise,
    halt: Halt,
    last_pose: Option<Pose>,
}

impl GuardedSupervisor {
    pub fn from_params(params: GuardedParams) -> Self {
        Self {
            cruise: Cruise::new(params.cruise_speed, params.cruise_speed),
            halt: Halt,
            state: GuardState::Cruising,
            last_pose: None,
            params,
        }
    }

    pub fn is_halted(&self) -> bool {
        self.state == GuardState::Halted
    }
}

impl Supervisor for GuardedSupervisor {
    fn execute(&mut self, info: &RobotInfo, dt: f32) -> SimResult<MotionCommand> {
        self.last_pose = Some(info.pose);
        if self.state == GuardState::Cruising {
            if let Some(closest) = info.min_proximity() {
                if closest < self.params.stop_distance {
                    self.state = GuardState::Halted;
                    self.cruise.restart();
                }
            }
        }
        match self.state {
            GuardState::Cruising => Ok(self.cruise.execute(info, dt)),
            GuardState::Halted => Ok(self.halt.execute(info, dt)),
        }
    }

    fn parameters(&self) -> SupervisorParams {
        SupervisorParams::Guarded(self.params)
    }

    fn apply_parameters(&mut self, params: SupervisorParams) -> SimResult<()> {
        match params {
            SupervisorParams::Guarded(params) => {
                self.params = params;
                self.cruise
                    .set_speeds(params.cruise_speed, params.cruise_speed);
                // a parameter change re-arms the guard
                self.state = GuardState::Cruising;
                Ok(())
            }
            other => Err(SimError::new(
                SimErrorTypes::SupervisorError,
                format!("Guarded supervisor cannot take parameters {:?}", other),
            )),
        }
    }

    /// Ring at the stop distance around the robot, red once halted.
    fn draw(&self, renderer: &mut dyn Renderer) {
        let pose = match self.last_pose {
            Some(pose) => pose,
            None => return,
        };
        let color = match self.state {
            GuardState::Cruising => 0x888888,
            GuardState::Halted => 0xFF0000,
        };
        let mut ring = Vec::with_capacity(17);
        for i in 0..=16 {
            let angle = i as f32 * PI / 8.;
            ring.push(Vector2::new(
                pose.x + self.params.stop_distance * angle.cos(),
                pose.y + self.params.stop_distance * angle.sin(),
            ));
        }
        renderer.draw_polyline(&ring, color);
    }
}
