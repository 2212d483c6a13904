/*!
Typed traffic between the simulation loop and its frontend.

Commands flow in, events flow out, each side draining its queue at its
own pace. Both enums are closed on purpose: a frontend matches
exhaustively and the compiler tracks every message kind.
*/

use std::path::PathBuf;

use crate::errors::SimError;
use crate::supervisors::SupervisorParams;

/// Requests a frontend may send to the simulation loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run continuously.
    Start,
    Pause,
    /// Advance one tick, then pause again. Ignored while running.
    Step,
    /// Rebuild the world from the current description. Supervisor
    /// parameters survive, matched by robot name.
    Reset,
    /// Load a new world file and start it fresh.
    LoadWorld(PathBuf),
    ShowGrid(bool),
    ShowSensors(bool),
    ShowTracks(bool),
    ShowSupervisors(bool),
    FocusOnWorld,
    FocusOnRobot(usize),
    /// Scales the current zoom by the given positive factor.
    AdjustZoom(f32),
    /// Scales the wall-clock pacing; the integration step never
    /// changes.
    SetTimeMultiplier(f32),
    ApplyParameters {
        robot: usize,
        parameters: SupervisorParams,
    },
    AddPlotable(Plotable),
    /// Redraw the current frame without advancing time.
    Refresh,
    /// Leave the loop.
    Stop,
}

/// Notifications the simulation loop sends to its frontend.
#[derive(Debug, Clone)]
pub enum Event {
    Log { source: String, message: String },
    PlotUpdate(Vec<PlotSample>),
    /// A frame is ready; acknowledge it to unblock the loop.
    UpdateView,
    Running,
    Paused,
    /// A world was (re)built and time restarted at zero.
    Reset,
    Stopped,
    Exception(SimError),
    /// Ask the frontend for a parameter window for one robot.
    MakeParamWindow {
        robot: usize,
        name: String,
        parameters: SupervisorParams,
    },
}

/// Per-tick expressions a frontend may subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plotable {
    RobotX(usize),
    RobotY(usize),
    RobotHeading(usize),
    /// Smallest proximity reading of one robot.
    MinProximity(usize),
}

impl Plotable {
    /// Index of the robot this expression reads.
    pub fn robot_index(&self) -> usize {
        match self {
            Plotable::RobotX(index)
            | Plotable::RobotY(index)
            | Plotable::RobotHeading(index)
            | Plotable::MinProximity(index) => *index,
        }
    }
}

/// One plotted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSample {
    pub source: Plotable,
    /// Simulation time, in seconds.
    pub time: f32,
    pub value: f32,
}
