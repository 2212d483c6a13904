use serde_derive::{Deserialize, Serialize};

use crate::errors::{SimError, SimErrorTypes, SimResult};
use crate::robots::{MotionCommand, RobotInfo};
use crate::supervisors::controllers::{Controller, Cruise};
use crate::supervisors::{Supervisor, SupervisorParams};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct CruiseParams {
    /// Left wheel speed, in rad/s.
    pub left: f32,
    /// Right wheel speed, in rad/s.
    pub right: f32,
}

impl Default for CruiseParams {
    fn default() -> Self {
        Self {
            left: 20.,  // rad/s
            right: 20., // rad/s
        }
    }
}

/// Keeps both wheels at the configured speeds, unconditionally.
#[derive(Debug)]
pub struct CruiseSupervisor {
    params: CruiseParams,
    controller: Cruise,
}

impl CruiseSupervisor {
    pub fn from_params(params: CruiseParams) -> Self {
        Self {
            controller: Cruise::new(params.left, params.right),
            params,
        }
    }
}

impl Supervisor for CruiseSupervisor {
    fn execute(&mut self, info: &RobotInfo, dt: f32) -> SimResult<MotionCommand> {
        Ok(self.controller.execute(info, dt))
    }

    fn parameters(&self) -> SupervisorParams {
        SupervisorParams::Cruise(self.params)
    }

    fn apply_parameters(&mut self, params: SupervisorParams) -> SimResult<()> {
        match params {
            SupervisorParams::Cruise(params) => {
                self.params = params;
                self.controller.set_speeds(params.left, params.right);
                Ok(())
            }
            other => Err(SimError::new(
                SimErrorTypes::SupervisorError,
                format!("Cruise supervisor cannot take parameters {:?}", other),
            )),
        }
    }
}
