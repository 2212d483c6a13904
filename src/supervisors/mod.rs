/*!
Supervisors.

A supervisor owns the decision logic of one robot: every tick the
simulator hands it the fresh [`RobotInfo`] snapshot and expects one
[`MotionCommand`] back. Supervisors hold [`Controller`](controllers::Controller)
values and pick which one runs; their tunable parameters cross the
thread boundary as [`SupervisorParams`] values.
*/

pub mod controllers;
mod cruise;
mod guarded;

pub use cruise::{CruiseParams, CruiseSupervisor};
pub use guarded::{GuardedParams, GuardedSupervisor};

use std::fmt::Debug;

use serde_derive::{Deserialize, Serialize};

use crate::errors::SimResult;
use crate::renderer::Renderer;
use crate::robots::{MotionCommand, RobotInfo};

pub trait Supervisor: Debug + Send {
    /// Chooses the actuation for this tick.
    ///
    /// ## Arguments
    /// * `info` - Snapshot of the supervised robot, sensors refreshed.
    /// * `dt` - Tick duration, in seconds.
    fn execute(&mut self, info: &RobotInfo, dt: f32) -> SimResult<MotionCommand>;

    /// Current tunable parameters.
    fn parameters(&self) -> SupervisorParams;

    /// Replaces the tunable parameters. Handing over the wrong variant
    /// is an error and leaves the supervisor unchanged.
    fn apply_parameters(&mut self, params: SupervisorParams) -> SimResult<()>;

    /// Draws supervisor internals when the view asks for them.
    fn draw(&self, _renderer: &mut dyn Renderer) {}
}

/// Tunable parameters of every supervisor kind.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum SupervisorParams {
    Cruise(CruiseParams),
    Guarded(GuardedParams),
}

/// Enumerates the supervisor configurations. The configuration of a
/// supervisor is exactly its parameter set.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum SupervisorConfig {
    Cruise(CruiseParams),
    Guarded(GuardedParams),
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig::Guarded(GuardedParams::default())
    }
}

/// Helper function to make the right [`Supervisor`] from the given
/// configuration.
pub fn make_supervisor_from_config(config: &SupervisorConfig) -> Box<dyn Supervisor> {
    match config {
        SupervisorConfig::Cruise(params) => {
            Box::new(CruiseSupervisor::from_params(*params)) as Box<dyn Supervisor>
        }
        SupervisorConfig::Guarded(params) => {
            Box::new(GuardedSupervisor::from_params(*params)) as Box<dyn Supervisor>
        }
    }
}
