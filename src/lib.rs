/*!
Differential drive robot simulator with a fixed time step.

The simulator advances a small 2D world of robots, obstacles and markers by
[`constants::SIM_TICK`] seconds per tick, on its own thread. A frontend drives
it over channels and draws the frames it publishes.

The main components are:
- The [`geometry`] module carries the convex polygon toolbox: hulls,
separating axis tests, closest point queries and raycasts.
- The [`quadtree`] module indexes axis aligned rectangles and narrows the
candidate pairs of the collision and sensing passes.
- The [`world`] module builds robots, obstacles and markers from a YAML
description, see [`world::WorldConfig`].
- The [`robots`] and [`sensors`] modules hold the differential drive
kinematics and the proximity ring.
- The [`supervisors`] module decides the wheel speeds of each robot every
tick and is the place to plug new behaviors.

The entry point is [`simulator`], whose [`simulator::Simulator`] schedules
everything and talks to the frontend. For example, an embedding frontend can
be wired as follows:
```no_run
use std::path::Path;
use roversim::renderer::NullRenderer;
use roversim::simulator::{Command, Event, Simulator};

// Initialize the console logging
Simulator::init_environment();
let handle = Simulator::spawn_from_path(
    Path::new("worlds/arena.yaml"),
    Box::new(NullRenderer),
).unwrap();
handle.send(Command::Start);
loop {
    while let Some(event) = handle.poll_event() {
        match event {
            // Paint the frame, then let the loop continue.
            Event::UpdateView => handle.acknowledge_frame(),
            Event::Stopped => return,
            _ => (),
        }
    }
}
```

*/

pub mod geometry;
pub mod logger;
pub mod quadtree;
pub mod renderer;
pub mod robots;
pub mod sensors;
pub mod simulator;
pub mod supervisors;
pub mod world;

pub mod constants;
pub mod errors;

#[cfg(test)]
mod integration_tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
