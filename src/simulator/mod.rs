/*!
Fixed step simulation loop.

[`Simulator`] owns a [`World`] and advances it by
[`SIM_TICK`](crate::constants::SIM_TICK) seconds per tick. A frontend drives
the loop through [`Command`] messages and listens to [`Event`] notifications;
[`Simulator::spawn`] wires both over channels and runs the loop on its own
thread, while [`FrameSync`] keeps it from racing ahead of the drawing.
*/
mod frame_sync;
mod messages;

pub use frame_sync::FrameSync;
pub use messages::{Command, Event, PlotSample, Plotable};

use crate::constants::{DEFAULT_TIME_MULTIPLIER, IDLE_SLEEP_MS, SIM_TICK};
use crate::errors::{SimError, SimErrorTypes, SimResult};
use crate::geometry::{Polygon, Rect};
use crate::quadtree::QuadTree;
use crate::renderer::{Focus, Renderer, ViewSettings};
use crate::robots::Robot;
use crate::supervisors::{Supervisor, SupervisorParams};
use crate::world::{World, WorldConfig};
use log::{debug, info, warn};
use nalgebra::Vector2;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Scheduler states of the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Time is frozen; the loop idles until a command arrives.
    Pause,
    /// Ticks advance continuously, paced to wall time.
    Run,
    /// One tick runs, then the loop pauses again.
    RunOnce,
    /// One frame renders without advancing time, then the loop pauses.
    DrawOnce,
}

/// Collects log lines raised during a tick so they can be forwarded to the
/// frontend once the world borrow ends.
#[derive(Debug, Default)]
struct LogSink {
    lines: Vec<(String, String)>,
}

impl LogSink {
    fn log(&mut self, source: &str, message: String) {
        info!("{}: {}", source, message);
        self.lines.push((source.to_string(), message));
    }

    fn drain_into(&mut self, events: &Sender<Event>) {
        for (source, message) in self.lines.drain(..) {
            let _ = events.send(Event::Log { source, message });
        }
    }
}

fn obstacle_tree_of(world: &World) -> QuadTree {
    let bounds: Vec<Rect> = world
        .obstacles
        .iter()
        .map(|obstacle| obstacle.body().bounding_rect())
        .collect();
    QuadTree::new(&bounds)
}

/// The simulation scheduler.
///
/// Owns the world, the renderer and the communication endpoints. The loop
/// never panics out of [`Simulator::run`]: broken commands are reported as
/// warning [`Event::Log`]s and failed world constructions as
/// [`Event::Exception`]s, after which the loop pauses and waits for the next
/// command.
pub struct Simulator {
    world: World,
    world_config: WorldConfig,
    state: RunState,
    /// Simulation time, in seconds.
    time: f32,
    time_multiplier: f32,
    view: ViewSettings,
    plotables: Vec<Plotable>,
    /// Spatial index over the obstacles, rebuilt when the world changes.
    obstacle_tree: QuadTree,
    commands: Receiver<Command>,
    events: Sender<Event>,
    frame_sync: Arc<FrameSync>,
    renderer: Box<dyn Renderer>,
    log: LogSink,
}

impl Simulator {
    /// Makes a [`Simulator`] over a fresh world built from the given
    /// configuration.
    ///
    /// ## Arguments
    /// * `config` - World description, kept for later resets
    /// * `renderer` - Drawing backend receiving one frame per tick
    /// * `commands` - Receiving end of the frontend command queue
    /// * `events` - Sending end of the notification queue
    /// * `frame_sync` - Frame acknowledgement shared with the frontend
    ///
    /// ## Return
    /// The simulator, paused on its first frame, or the world construction
    /// error.
    pub fn from_config(
        config: WorldConfig,
        renderer: Box<dyn Renderer>,
        commands: Receiver<Command>,
        events: Sender<Event>,
        frame_sync: Arc<FrameSync>,
    ) -> SimResult<Simulator> {
        let world = World::from_config(&config)?;
        let obstacle_tree = obstacle_tree_of(&world);
        let simulator = Simulator {
            world,
            world_config: config,
            state: RunState::DrawOnce,
            time: 0.,
            time_multiplier: DEFAULT_TIME_MULTIPLIER,
            view: ViewSettings::default(),
            plotables: Vec::new(),
            obstacle_tree,
            commands,
            events,
            frame_sync,
            renderer,
            log: LogSink::default(),
        };
        simulator.announce_world();
        Ok(simulator)
    }

    /// Like [`Simulator::from_config`] but loading the world file first.
    pub fn from_config_path(
        path: &Path,
        renderer: Box<dyn Renderer>,
        commands: Receiver<Command>,
        events: Sender<Event>,
        frame_sync: Arc<FrameSync>,
    ) -> SimResult<Simulator> {
        let config = WorldConfig::load_from_path(path)?;
        Simulator::from_config(config, renderer, commands, events, frame_sync)
    }

    /// Runs a simulation on its own thread.
    ///
    /// The configuration is validated before the thread starts, so a broken
    /// world fails here rather than behind the channel.
    pub fn spawn(config: WorldConfig, renderer: Box<dyn Renderer>) -> SimResult<SimulatorHandle> {
        let (command_sender, command_receiver) = mpsc::channel();
        let (event_sender, event_receiver) = mpsc::channel();
        let frame_sync = Arc::new(FrameSync::new());
        let mut simulator = Simulator::from_config(
            config,
            renderer,
            command_receiver,
            event_sender,
            frame_sync.clone(),
        )?;
        let thread = thread::Builder::new()
            .name(String::from("simulator"))
            .spawn(move || simulator.run())
            .map_err(|error| {
                SimError::new(
                    SimErrorTypes::UnknownError,
                    format!("Cannot spawn the simulation thread : {}", error),
                )
            })?;
        Ok(SimulatorHandle {
            commands: command_sender,
            events: event_receiver,
            frame_sync,
            thread: Some(thread),
        })
    }

    /// Like [`Simulator::spawn`] but loading the world file first.
    pub fn spawn_from_path(path: &Path, renderer: Box<dyn Renderer>) -> SimResult<SimulatorHandle> {
        let config = WorldConfig::load_from_path(path)?;
        Simulator::spawn(config, renderer)
    }

    /// Initializes the process environment, that is the console logging.
    pub fn init_environment() {
        crate::logger::init_log(&crate::logger::LoggerConfig::default());
    }

    /// The simulation loop.
    ///
    /// Leaves on [`Command::Stop`], on a raised stop flag or when the command
    /// channel closes, and sends [`Event::Stopped`] on the way out.
    pub fn run(&mut self) {
        info!("Simulation loop started");
        loop {
            if self.frame_sync.is_stopping() || !self.process_pending() {
                break;
            }
            match self.state {
                RunState::Pause => {
                    thread::sleep(Duration::from_millis(IDLE_SLEEP_MS));
                }
                RunState::DrawOnce => {
                    self.render();
                    self.frame_sync.wait_acknowledged();
                    self.pause();
                }
                RunState::Run | RunState::RunOnce => {
                    self.step();
                    self.frame_sync.wait_acknowledged();
                    if self.state == RunState::Run {
                        thread::sleep(Duration::from_secs_f32(SIM_TICK / self.time_multiplier));
                    }
                }
            }
        }
        let _ = self.events.send(Event::Stopped);
        info!("Simulation loop stopped");
    }

    /// Advances the world by one tick.
    ///
    /// Runs the robot kinematics, the sensing and collision pass, the
    /// supervisors and the plot subscriptions, then renders the frame unless
    /// the loop paused meanwhile. A detected collision or a supervisor fault
    /// pauses the loop; it is never resumed on its own.
    pub fn step(&mut self) {
        self.time += SIM_TICK;
        for slot in self.world.robots.iter_mut() {
            slot.robot.step(SIM_TICK);
            slot.tracker.append(self.time, slot.robot.pose());
            slot.robot.refresh_sensors();
        }
        if self.collision_pass() {
            self.state = RunState::DrawOnce;
        }
        self.log.drain_into(&self.events);
        if !self.run_supervisors() {
            return;
        }
        self.evaluate_plotables();
        if self.state != RunState::Pause {
            self.render();
        }
        if self.state == RunState::RunOnce || self.state == RunState::DrawOnce {
            self.pause();
        }
    }

    /// Updates every proximity sensor and detects body overlaps.
    ///
    /// Returns true when at least one robot touches an obstacle or another
    /// robot. Every contact raises one log line, robot pairs only once.
    fn collision_pass(&mut self) -> bool {
        let robot_rects: Vec<Rect> = self
            .world
            .robots
            .iter()
            .map(|slot| slot.robot.body().bounding_rect())
            .collect();
        let robot_tree = QuadTree::new(&robot_rects);
        let robot_envelopes: Vec<Polygon> = self
            .world
            .robots
            .iter()
            .map(|slot| slot.robot.body().world_envelope().clone())
            .collect();

        for (index, slot) in self.world.robots.iter_mut().enumerate() {
            for sensor in slot.robot.sensors_mut() {
                let beam = sensor.bounding_rect();
                for obstacle_id in self.obstacle_tree.find_items(&beam) {
                    sensor
                        .update_distance(self.world.obstacles[obstacle_id].body().world_envelope());
                }
                for other in robot_tree.find_items(&beam) {
                    if other == index {
                        continue;
                    }
                    sensor.update_distance(&robot_envelopes[other]);
                }
            }
        }

        let mut obstacle_hits: Vec<(usize, usize)> = Vec::new();
        let mut contacts: BTreeSet<(usize, usize)> = BTreeSet::new();
        for (index, slot) in self.world.robots.iter().enumerate() {
            let body = slot.robot.body();
            let query = body.bounding_rect();
            for obstacle_id in self.obstacle_tree.find_items(&query) {
                if body.collides_with(self.world.obstacles[obstacle_id].body()) {
                    obstacle_hits.push((index, obstacle_id));
                }
            }
            for other in robot_tree.find_items(&query) {
                if other <= index {
                    continue;
                }
                if body.world_envelope().collides(&robot_envelopes[other]) {
                    contacts.insert((index, other));
                }
            }
        }
        for &(index, obstacle_id) in &obstacle_hits {
            let message = format!("Collision with obstacle {}", obstacle_id);
            self.log.log(&self.world.robots[index].name, message);
        }
        for &(first, second) in &contacts {
            let message = format!("Collision with {}", self.world.robots[second].name);
            self.log.log(&self.world.robots[first].name, message);
        }
        !obstacle_hits.is_empty() || !contacts.is_empty()
    }

    /// Polls every supervisor for its next motion command.
    ///
    /// The first failing supervisor pauses the loop and raises an
    /// [`Event::Exception`]; the remaining supervisors are not polled that
    /// tick.
    fn run_supervisors(&mut self) -> bool {
        let mut fault: Option<SimError> = None;
        for slot in self.world.robots.iter_mut() {
            let info = slot.robot.info();
            match slot.supervisor.execute(&info, SIM_TICK) {
                Ok(command) => slot.robot.set_inputs(&command),
                Err(error) => {
                    fault = Some(error.chain(format!("In the supervisor of {}", slot.name)));
                    break;
                }
            }
        }
        match fault {
            None => true,
            Some(error) => {
                warn!("{}", error.detailed_error());
                self.pause();
                let _ = self.events.send(Event::Exception(error));
                false
            }
        }
    }

    fn evaluate_plotables(&mut self) {
        if self.plotables.is_empty() {
            return;
        }
        let mut samples = Vec::with_capacity(self.plotables.len());
        for plotable in &self.plotables {
            let slot = &self.world.robots[plotable.robot_index()];
            let value = match plotable {
                Plotable::RobotX(_) => slot.robot.pose().x,
                Plotable::RobotY(_) => slot.robot.pose().y,
                Plotable::RobotHeading(_) => slot.robot.pose().theta,
                Plotable::MinProximity(_) => match slot.robot.info().min_proximity() {
                    Some(distance) => distance,
                    None => continue,
                },
            };
            samples.push(PlotSample {
                source: *plotable,
                time: self.time,
                value,
            });
        }
        if !samples.is_empty() {
            let _ = self.events.send(Event::PlotUpdate(samples));
        }
    }

    /// Draws the world and publishes the frame to the frontend.
    fn render(&mut self) {
        self.renderer.begin_frame(&self.view);
        for obstacle in &self.world.obstacles {
            let body = obstacle.body();
            self.renderer
                .draw_polygon(body.world_envelope().points(), body.color(), true);
        }
        for marker in &self.world.markers {
            let body = marker.body();
            self.renderer
                .draw_polygon(body.world_envelope().points(), body.color(), true);
        }
        for slot in &self.world.robots {
            if self.view.show_tracks && slot.tracker.len() >= 2 {
                let track: Vec<Vector2<f32>> = slot
                    .tracker
                    .points()
                    .iter()
                    .map(|(_, pose)| pose.position())
                    .collect();
                self.renderer.draw_polyline(&track, slot.robot.body().color());
            }
            let body = slot.robot.body();
            self.renderer
                .draw_polygon(body.world_envelope().points(), body.color(), true);
            if self.view.show_sensors {
                for sensor in slot.robot.sensors() {
                    let reading = sensor.reading();
                    let color = if reading.distance < reading.max_range {
                        0xFF4040
                    } else {
                        0x80C080
                    };
                    self.renderer
                        .draw_polygon(sensor.world_envelope().points(), color, false);
                }
            }
            if self.view.show_supervisors {
                slot.supervisor.draw(self.renderer.as_mut());
            }
        }
        self.renderer.end_frame();
        self.frame_sync.publish();
        let _ = self.events.send(Event::UpdateView);
    }

    /// Freezes the loop; repeated pause requests stay silent.
    fn pause(&mut self) {
        if self.state != RunState::Pause {
            self.state = RunState::Pause;
            let _ = self.events.send(Event::Paused);
        }
    }

    /// Drains every queued command.
    ///
    /// ## Return
    /// false when the loop must leave, on [`Command::Stop`] or a closed
    /// channel.
    pub fn process_pending(&mut self) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    debug!("Command: {:?}", command);
                    if command == Command::Stop {
                        return false;
                    }
                    self.process_command(command);
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn process_command(&mut self, command: Command) {
        match command {
            Command::Start => {
                if self.state != RunState::Run {
                    self.state = RunState::Run;
                    let _ = self.events.send(Event::Running);
                }
            }
            Command::Pause => self.pause(),
            Command::Step => {
                if self.state != RunState::Run {
                    self.state = RunState::RunOnce;
                }
            }
            Command::Reset => self.rebuild_world(),
            Command::LoadWorld(path) => self.load_world(&path),
            Command::ShowGrid(on) => {
                self.view.show_grid = on;
                self.refresh_view();
            }
            Command::ShowSensors(on) => {
                self.view.show_sensors = on;
                self.refresh_view();
            }
            Command::ShowTracks(on) => {
                self.view.show_tracks = on;
                self.refresh_view();
            }
            Command::ShowSupervisors(on) => {
                self.view.show_supervisors = on;
                self.refresh_view();
            }
            Command::FocusOnWorld => {
                self.view.focus = Focus::World;
                self.refresh_view();
            }
            Command::FocusOnRobot(index) => {
                if index < self.world.robots.len() {
                    self.view.focus = Focus::Robot(index);
                    self.refresh_view();
                } else {
                    self.warn(format!("Cannot focus on the unknown robot {}", index));
                }
            }
            Command::AdjustZoom(factor) => {
                if factor > 0. {
                    self.view.zoom *= factor;
                    self.refresh_view();
                } else {
                    self.warn(format!("Ignoring the non positive zoom factor {}", factor));
                }
            }
            Command::SetTimeMultiplier(multiplier) => {
                if multiplier > 0. {
                    self.time_multiplier = multiplier;
                } else {
                    self.warn(format!(
                        "Ignoring the non positive time multiplier {}",
                        multiplier
                    ));
                }
            }
            Command::ApplyParameters { robot, parameters } => {
                self.apply_parameters(robot, parameters)
            }
            Command::AddPlotable(plotable) => {
                if plotable.robot_index() < self.world.robots.len() {
                    if !self.plotables.contains(&plotable) {
                        self.plotables.push(plotable);
                    }
                } else {
                    self.warn(format!(
                        "Cannot plot for the unknown robot {}",
                        plotable.robot_index()
                    ));
                }
            }
            Command::Refresh => self.refresh_view(),
            // Handled by the caller.
            Command::Stop => (),
        }
    }

    fn apply_parameters(&mut self, robot: usize, parameters: SupervisorParams) {
        let outcome = match self.world.robots.get_mut(robot) {
            Some(slot) => slot.supervisor.apply_parameters(parameters).map_err(|error| {
                error.chain(format!("While applying parameters to {}", slot.name))
            }),
            None => Err(SimError::new(
                SimErrorTypes::CommandError,
                format!("Cannot apply parameters to the unknown robot {}", robot),
            )),
        };
        if let Err(error) = outcome {
            self.warn(error.detailed_error());
        }
    }

    /// Reports a rejected command to the log and the frontend.
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        let _ = self.events.send(Event::Log {
            source: String::from("simulator"),
            message,
        });
    }

    /// Redraws once if the loop is paused; running states draw anyway.
    fn refresh_view(&mut self) {
        if self.state == RunState::Pause {
            self.state = RunState::DrawOnce;
        }
    }

    /// Rebuilds the world from the stored configuration.
    ///
    /// Supervisor parameters survive the rebuild for robots keeping their
    /// name; on failure the previous world stays in place.
    fn rebuild_world(&mut self) {
        let carried = self.world.harvest_parameters();
        match World::from_config(&self.world_config) {
            Ok(mut world) => {
                for (name, parameters) in carried {
                    match world.robots.iter_mut().find(|slot| slot.name == name) {
                        Some(slot) => {
                            if let Err(error) = slot.supervisor.apply_parameters(parameters) {
                                warn!(
                                    "Dropping parameters of {}: {}",
                                    name,
                                    error.detailed_error()
                                );
                            }
                        }
                        None => warn!("Dropping parameters of the removed robot {}", name),
                    }
                }
                self.install_world(world);
            }
            Err(error) => {
                self.construction_failed(error.chain(String::from("While resetting the world")))
            }
        }
    }

    /// Replaces the world with the one described by another file.
    ///
    /// On failure the previous world stays in place.
    fn load_world(&mut self, path: &Path) {
        let loaded = WorldConfig::load_from_path(path)
            .and_then(|config| World::from_config(&config).map(|world| (config, world)));
        match loaded {
            Ok((config, world)) => {
                self.world_config = config;
                self.install_world(world);
            }
            Err(error) => self.construction_failed(
                error.chain(format!("While loading the world file {}", path.display())),
            ),
        }
    }

    fn install_world(&mut self, world: World) {
        self.world = world;
        self.obstacle_tree = obstacle_tree_of(&self.world);
        self.time = 0.;
        let robots = self.world.robots.len();
        self.plotables
            .retain(|plotable| plotable.robot_index() < robots);
        self.state = RunState::DrawOnce;
        self.announce_world();
    }

    fn construction_failed(&mut self, error: SimError) {
        warn!("{}", error.detailed_error());
        self.pause();
        let _ = self.events.send(Event::Exception(error));
    }

    fn announce_world(&self) {
        for (index, slot) in self.world.robots.iter().enumerate() {
            let _ = self.events.send(Event::MakeParamWindow {
                robot: index,
                name: slot.name.clone(),
                parameters: slot.supervisor.parameters(),
            });
        }
        let _ = self.events.send(Event::Reset);
    }

    /// Simulation time, in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// True while ticks advance continuously.
    pub fn is_running(&self) -> bool {
        self.state == RunState::Run
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    pub fn time_multiplier(&self) -> f32 {
        self.time_multiplier
    }
}

/// Frontend handle over a running simulation thread.
#[derive(Debug)]
pub struct SimulatorHandle {
    commands: Sender<Command>,
    events: Receiver<Event>,
    frame_sync: Arc<FrameSync>,
    thread: Option<JoinHandle<()>>,
}

impl SimulatorHandle {
    /// Queues a command for the simulation thread.
    pub fn send(&self, command: Command) {
        let _ = self.commands.send(command);
    }

    /// Next pending notification, if any.
    pub fn poll_event(&self) -> Option<Event> {
        self.events.try_recv().ok()
    }

    /// Tells the loop the last published frame was consumed.
    pub fn acknowledge_frame(&self) {
        self.frame_sync.acknowledge();
    }

    /// Asks the loop to leave, without waiting for it.
    pub fn stop(&self) {
        self.frame_sync.raise_stop();
        let _ = self.commands.send(Command::Stop);
    }

    /// Stops the loop and waits for the thread to finish.
    pub fn join(mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NullRenderer;
    use crate::supervisors::{GuardedParams, SupervisorParams};
    use crate::world::RobotEntry;

    fn one_robot_config() -> WorldConfig {
        WorldConfig {
            robots: vec![RobotEntry::default()],
            ..WorldConfig::default()
        }
    }

    fn test_simulator(config: WorldConfig) -> (Simulator, Sender<Command>, Receiver<Event>) {
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

    #[test]
    fn start_and_pause_drive_the_state_machine() {
        let (mut simulator, commands, events) = test_simulator(one_robot_config());
        drain(&events);

        commands.send(Command::Start).unwrap();
        assert!(simulator.process_pending());
        assert!(simulator.is_running());
        let after_start = drain(&events);
        assert!(matches!(after_start.as_slice(), [Event::Running]));

        commands.send(Command::Pause).unwrap();
        commands.send(Command::Pause).unwrap();
        assert!(simulator.process_pending());
        assert_eq!(simulator.run_state(), RunState::Pause);
        let paused = drain(&events)
            .iter()
            .filter(|event| matches!(event, Event::Paused))
            .count();
        assert_eq!(paused, 1);
    }

    #[test]
    fn one_requested_step_runs_then_pauses() {
        let (mut simulator, commands, events) = test_simulator(one_robot_config());
        drain(&events);

        commands.send(Command::Step).unwrap();
        assert!(simulator.process_pending());
        assert_eq!(simulator.run_state(), RunState::RunOnce);

        simulator.step();
        assert_eq!(simulator.time(), SIM_TICK);
        assert_eq!(simulator.run_state(), RunState::Pause);
        let after_step = drain(&events);
        assert!(after_step
            .iter()
            .any(|event| matches!(event, Event::UpdateView)));
        assert!(after_step
            .iter()
            .any(|event| matches!(event, Event::Paused)));
    }

    #[test]
    fn step_requests_are_ignored_while_running() {
        let (mut simulator, commands, events) = test_simulator(one_robot_config());
        drain(&events);

        commands.send(Command::Start).unwrap();
        commands.send(Command::Step).unwrap();
        assert!(simulator.process_pending());
        assert!(simulator.is_running());
    }

    #[test]
    fn broken_payloads_raise_warnings_and_change_nothing() {
        let (mut simulator, commands, events) = test_simulator(one_robot_config());
        drain(&events);

        commands.send(Command::AdjustZoom(-1.)).unwrap();
        commands.send(Command::SetTimeMultiplier(0.)).unwrap();
        commands.send(Command::FocusOnRobot(99)).unwrap();
        commands
            .send(Command::AddPlotable(Plotable::RobotX(7)))
            .unwrap();
        assert!(simulator.process_pending());

        assert_eq!(simulator.view().zoom, 1.);
        assert_eq!(simulator.time_multiplier(), 1.);
        assert_eq!(simulator.run_state(), RunState::DrawOnce);
        let warnings = drain(&events);
        assert_eq!(warnings.len(), 4);
        assert!(warnings
            .iter()
            .all(|event| matches!(event, Event::Log { source, .. } if source == "simulator")));
    }

    #[test]
    fn reset_restores_time_and_keeps_parameters() {
        let (mut simulator, commands, events) = test_simulator(one_robot_config());
        drain(&events);

        commands.send(Command::Start).unwrap();
        assert!(simulator.process_pending());
        simulator.step();
        simulator.step();
        assert!(simulator.time() > 0.);

        let tuned = SupervisorParams::Guarded(GuardedParams {
            cruise_speed: 5.,
            stop_distance: 0.2,
        });
        commands
            .send(Command::ApplyParameters {
                robot: 0,
                parameters: tuned,
            })
            .unwrap();
        commands.send(Command::Reset).unwrap();
        assert!(simulator.process_pending());

        assert_eq!(simulator.time(), 0.);
        assert_eq!(simulator.run_state(), RunState::DrawOnce);
        assert_eq!(simulator.world().robots[0].supervisor.parameters(), tuned);
        assert!(drain(&events)
            .iter()
            .any(|event| matches!(event, Event::Reset)));
    }

    #[test]
    fn loading_a_bad_world_keeps_the_current_one() {
        let (mut simulator, commands, events) = test_simulator(one_robot_config());
        drain(&events);

        // An absent file deserializes to an empty world, which cannot be
        // built.
        let path = std::env::temp_dir().join("roversim_missing_world.yaml");
        let _ = std::fs::remove_file(&path);
        commands.send(Command::LoadWorld(path.clone())).unwrap();
        assert!(simulator.process_pending());

        assert_eq!(simulator.world().robots.len(), 1);
        assert!(drain(&events)
            .iter()
            .any(|event| matches!(event, Event::Exception(_))));
        simulator.step();
        assert_eq!(simulator.time(), SIM_TICK);
    }
}
