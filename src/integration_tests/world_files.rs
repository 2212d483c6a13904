use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;

use crate::renderer::NullRenderer;
use crate::simulator::{Event, FrameSync, Simulator};
use crate::supervisors::{CruiseParams, Supervisor, SupervisorParams};

#[test]
fn the_demo_world_loads_and_runs() {
    Simulator::init_environment();
    let (_command_sender, command_receiver) = mpsc::channel();
    let (event_sender, event_receiver) = mpsc::channel();
    let mut simulator = Simulator::from_config_path(
        Path::new("worlds/arena.yaml"),
        Box::new(NullRenderer),
        command_receiver,
        event_sender,
        Arc::new(FrameSync::new()),
    )
    .unwrap();

    let names: Vec<&str> = simulator
        .world()
        .robots
        .iter()
        .map(|slot| slot.name.as_str())
        .collect();
    assert_eq!(names, ["scout", "rover"]);
    assert_eq!(simulator.world().obstacles.len(), 3);
    assert_eq!(simulator.world().markers.len(), 1);
    assert_eq!(
        simulator.world().robots[0].supervisor.parameters(),
        SupervisorParams::Cruise(CruiseParams {
            left: 10.,
            right: 10.,
        })
    );

    while event_receiver.try_recv().is_ok() {}
    for _ in 0..10 {
        simulator.step();
    }
    assert!(simulator.time() > 0.19);

    let received: Vec<Event> = std::iter::from_fn(|| event_receiver.try_recv().ok()).collect();
    assert!(!received
        .iter()
        .any(|event| matches!(event, Event::Exception(_))));
}
