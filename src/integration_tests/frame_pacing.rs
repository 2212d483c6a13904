use std::thread;
use std::time::{Duration, Instant};

use crate::renderer::NullRenderer;
use crate::simulator::{Command, Event, Simulator, SimulatorHandle};
use crate::world::{RobotEntry, WorldConfig};

fn one_robot_world() -> WorldConfig {
    WorldConfig {
        robots: vec![RobotEntry::default()],
        ..WorldConfig::default()
    }
}

fn wait_for_frame(handle: &SimulatorHandle) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        while let Some(event) = handle.poll_event() {
            if matches!(event, Event::UpdateView) {
                return true;
            }
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn frames_wait_for_their_acknowledgement() {
    let handle = Simulator::spawn(one_robot_world(), Box::new(NullRenderer)).unwrap();

    // The initial frame comes without any command.
    assert!(wait_for_frame(&handle));
    handle.acknowledge_frame();

    handle.send(Command::Start);
    assert!(wait_for_frame(&handle));

    // Unacknowledged, so the loop must hold the next frame back.
    thread::sleep(Duration::from_millis(100));
    let mut held_back = true;
    while let Some(event) = handle.poll_event() {
        if matches!(event, Event::UpdateView) {
            held_back = false;
        }
    }
    assert!(held_back);

    handle.acknowledge_frame();
    assert!(wait_for_frame(&handle));

    handle.join();
}

#[test]
fn stopping_releases_a_blocked_loop() {
    let handle = Simulator::spawn(one_robot_world(), Box::new(NullRenderer)).unwrap();
    handle.send(Command::Start);

    // Leave every frame unacknowledged; the loop is blocked when we stop it.
    assert!(wait_for_frame(&handle));
    let before = Instant::now();
    handle.join();
    assert!(before.elapsed() < Duration::from_secs(2));
}
