use std::f32::consts::PI;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::geometry::Pose;
use crate::renderer::NullRenderer;
use crate::robots::differential::DifferentialConfig;
use crate::robots::{Robot, RobotConfig};
use crate::simulator::{Command, Event, FrameSync, Plotable, RunState, Simulator};
use crate::supervisors::{CruiseParams, GuardedParams, SupervisorConfig};
use crate::world::{ObjectEntry, RobotEntry, WorldConfig};

fn sync_simulator(config: WorldConfig) -> (Simulator, Sender<Command>, Receiver<Event>) {
    let (command_sender, command_receiver) = mpsc::channel();
    let (event_sender, event_receiver) = mpsc::channel();
    let simulator = Simulator::from_config(
        config,
        Box::new(NullRenderer),
        command_receiver,
        event_sender,
        Arc::new(FrameSync::new()),
    )
    .unwrap();
    (simulator, command_sender, event_receiver)
}

fn drain(events: &Receiver<Event>) -> Vec<Event> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

fn square(half_side: f32) -> Vec<[f32; 2]> {
    vec![
        [-half_side, -half_side],
        [half_side, -half_side],
        [half_side, half_side],
        [-half_side, half_side],
    ]
}

/// A robot driving 1 m/s straight ahead, without any sensor.
fn blind_rusher(name: &str, pose: Pose) -> RobotEntry {
    RobotEntry {
        name: String::from(name),
        pose,
        robot: RobotConfig::Differential(DifferentialConfig {
            wheel_radius: 0.5,
            wheel_base: 0.5,
            envelope: square(0.1),
            sensors: Vec::new(),
        }),
        supervisor: SupervisorConfig::Cruise(CruiseParams {
            left: 2.,
            right: 2.,
        }),
        ..RobotEntry::default()
    }
}

#[test]
fn driving_into_a_wall_pauses_the_simulation() {
    let config = WorldConfig {
        robots: vec![blind_rusher("rover", Pose::default())],
        obstacles: vec![ObjectEntry {
            pose: Pose::new(1., 0., 0.),
            points: square(0.5),
            ..ObjectEntry::default()
        }],
        ..WorldConfig::default()
    };
    let (mut simulator, commands, events) = sync_simulator(config);
    drain(&events);

    commands.send(Command::Start).unwrap();
    assert!(simulator.process_pending());

    let mut ticks = 0;
    while simulator.is_running() && ticks < 25 {
        simulator.step();
        ticks += 1;
    }

    assert!(ticks < 25, "no collision after {} ticks", ticks);
    assert_eq!(simulator.run_state(), RunState::Pause);
    assert!(simulator.world().robots[0].robot.pose().x > 0.3);

    let received = drain(&events);
    assert!(received.iter().any(|event| matches!(
        event,
        Event::Log { source, message }
            if source == "rover" && message.contains("Collision with obstacle")
    )));
    assert!(received
        .iter()
        .any(|event| matches!(event, Event::Paused)));
}

#[test]
fn robots_report_a_mutual_collision_once() {
    let config = WorldConfig {
        robots: vec![
            blind_rusher("west", Pose::new(-0.5, 0., 0.)),
            blind_rusher("east", Pose::new(0.5, 0., PI)),
        ],
        ..WorldConfig::default()
    };
    let (mut simulator, commands, events) = sync_simulator(config);
    drain(&events);

    commands.send(Command::Start).unwrap();
    assert!(simulator.process_pending());

    let mut ticks = 0;
    while simulator.is_running() && ticks < 30 {
        simulator.step();
        ticks += 1;
    }

    assert_eq!(simulator.run_state(), RunState::Pause);
    let logs: Vec<(String, String)> = drain(&events)
        .into_iter()
        .filter_map(|event| match event {
            Event::Log { source, message } => Some((source, message)),
            _ => None,
        })
        .collect();
    assert_eq!(logs.len(), 1, "expected one collision line: {:?}", logs);
    assert_eq!(logs[0].0, "west");
    assert_eq!(logs[0].1, "Collision with east");
}

#[test]
fn the_guard_halts_short_of_the_wall() {
    let config = WorldConfig {
        robots: vec![RobotEntry {
            name: String::from("rover"),
            supervisor: SupervisorConfig::Guarded(GuardedParams {
                cruise_speed: 20.,
                stop_distance: 0.1,
            }),
            ..RobotEntry::default()
        }],
        obstacles: vec![ObjectEntry {
            pose: Pose::new(1., 0., 0.),
            points: square(0.5),
            ..ObjectEntry::default()
        }],
        ..WorldConfig::default()
    };
    let (mut simulator, commands, events) = sync_simulator(config);
    drain(&events);

    commands.send(Command::Start).unwrap();
    commands
        .send(Command::AddPlotable(Plotable::MinProximity(0)))
        .unwrap();
    assert!(simulator.process_pending());

    for _ in 0..150 {
        simulator.step();
    }
    assert!(simulator.is_running());

    let pose = simulator.world().robots[0].robot.pose();
    // The default envelope nose sits 0.07 ahead of the robot center.
    assert!(pose.x + 0.07 < 0.5, "drove into the wall: {:?}", pose);
    assert!(pose.x > 0.2, "never approached the wall: {:?}", pose);

    let received = drain(&events);
    assert!(!received.iter().any(|event| matches!(
        event,
        Event::Log { message, .. } if message.contains("Collision")
    )));
    let last_minimum = received
        .iter()
        .rev()
        .find_map(|event| match event {
            Event::PlotUpdate(samples) => samples
                .iter()
                .find(|sample| sample.source == Plotable::MinProximity(0))
                .map(|sample| sample.value),
            _ => None,
        })
        .unwrap();
    assert!(last_minimum < 0.1, "still far away: {}", last_minimum);

    // Latched: the robot stays where it stopped.
    for _ in 0..10 {
        simulator.step();
    }
    let settled = simulator.world().robots[0].robot.pose();
    assert!((settled.x - pose.x).abs() < 1e-6);
}
