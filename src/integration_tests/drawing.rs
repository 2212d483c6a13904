use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use nalgebra::Vector2;

use crate::geometry::Pose;
use crate::renderer::{Renderer, ViewSettings};
use crate::simulator::{Command, Event, FrameSync, Simulator};
use crate::world::{ObjectEntry, RobotEntry, WorldConfig};

/// Draw calls of one frame, split by shape kind.
#[derive(Debug, Default, Clone, Copy)]
struct FrameRecord {
    filled: usize,
    outlined: usize,
    polylines: usize,
}

/// Renderer counting its calls into a list shared with the test.
#[derive(Debug)]
struct RecordingRenderer {
    frames: Arc<Mutex<Vec<FrameRecord>>>,
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, _view: &ViewSettings) {
        self.frames.lock().unwrap().push(FrameRecord::default());
    }

    fn draw_polygon(&mut self, _points: &[Vector2<f32>], _color: u32, filled: bool) {
        let mut frames = self.frames.lock().unwrap();
        let frame = frames.last_mut().expect("draw call outside a frame");
        if filled {
            frame.filled += 1;
        } else {
            frame.outlined += 1;
        }
    }

    fn draw_polyline(&mut self, _points: &[Vector2<f32>], _color: u32) {
        let mut frames = self.frames.lock().unwrap();
        let frame = frames.last_mut().expect("draw call outside a frame");
        frame.polylines += 1;
    }

    fn end_frame(&mut self) {}
}

fn recording_simulator(
    config: WorldConfig,
) -> (
    Simulator,
    Sender<Command>,
    Receiver<Event>,
    Arc<Mutex<Vec<FrameRecord>>>,
) {
    let frames = Arc::new(Mutex::new(Vec::new()));
    let (command_sender, command_receiver) = mpsc::channel();
    let (event_sender, event_receiver) = mpsc::channel();
    let simulator = Simulator::from_config(
        config,
        Box::new(RecordingRenderer {
            frames: frames.clone(),
        }),
        command_receiver,
        event_sender,
        Arc::new(FrameSync::new()),
    )
    .unwrap();
    (simulator, command_sender, event_receiver, frames)
}

#[test]
fn view_flags_gate_the_drawn_shapes() {
    let config = WorldConfig {
        robots: vec![RobotEntry::default()],
        obstacles: vec![ObjectEntry {
            pose: Pose::new(3., 0., 0.),
            ..ObjectEntry::default()
        }],
        markers: vec![ObjectEntry {
            pose: Pose::new(0., 2., 0.),
            ..ObjectEntry::default()
        }],
    };
    let (mut simulator, commands, _events, frames) = recording_simulator(config);

    commands.send(Command::Step).unwrap();
    assert!(simulator.process_pending());
    simulator.step();

    // The default view draws sensors and tracks.
    {
        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        let first = frames[0];
        assert_eq!(first.filled, 3, "obstacle, marker and robot body");
        assert_eq!(first.outlined, 5, "the default sensor ring");
        assert_eq!(first.polylines, 1, "the track of the only robot");
    }

    commands.send(Command::ShowSensors(false)).unwrap();
    commands.send(Command::ShowTracks(false)).unwrap();
    commands.send(Command::Step).unwrap();
    assert!(simulator.process_pending());
    simulator.step();

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 2);
    let second = frames[1];
    assert_eq!(second.filled, 3);
    assert_eq!(second.outlined, 0);
    assert_eq!(second.polylines, 0);
}
