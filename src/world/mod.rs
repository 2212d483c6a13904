/*!
World model.

A world is one complete simulated scene: robots paired with their
supervisors and path trackers, solid obstacles and visual-only markers.
Worlds are described by a [`WorldConfig`] loaded from a YAML file and
built atomically: any error during construction yields nothing, so the
caller keeps its previous world intact.
*/

use std::path::Path;

use nalgebra::Vector2;
use serde_derive::{Deserialize, Serialize};

use crate::errors::{SimError, SimErrorTypes, SimResult};
use crate::geometry::{Pose, Rect};
use crate::robots::{make_robot_from_config, Robot, RobotConfig};
use crate::supervisors::{
    make_supervisor_from_config, Supervisor, SupervisorConfig, SupervisorParams,
};

mod object;
mod path_tracker;

pub use object::Body;
pub use path_tracker::PathTracker;

/// One robot line of the world file.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct RobotEntry {
    pub name: String,
    /// Starting pose in the world frame.
    pub pose: Pose,
    /// Body color, 0xRRGGBB.
    pub color: u32,
    pub robot: RobotConfig,
    pub supervisor: SupervisorConfig,
}

impl Default for RobotEntry {
    fn default() -> Self {
        Self {
            name: String::from("robot"),
            pose: Pose::default(),
            color: 0x0000FF,
            robot: RobotConfig::default(),
            supervisor: SupervisorConfig::default(),
        }
    }
}

/// One obstacle or marker line of the world file.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ObjectEntry {
    pub pose: Pose,
    /// Corners in the object frame, in meters.
    pub points: Vec<[f32; 2]>,
    /// Color, 0xRRGGBB.
    pub color: u32,
}

impl Default for ObjectEntry {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            points: vec![[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]],
            color: 0x808080,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    pub robots: Vec<RobotEntry>,
    pub obstacles: Vec<ObjectEntry>,
    pub markers: Vec<ObjectEntry>,
}

impl WorldConfig {
    /// Load the world description from the given `path`.
    pub fn load_from_path(path: &Path) -> SimResult<WorldConfig> {
        let config: WorldConfig = match confy::load_path(path) {
            Ok(config) => config,
            Err(error) => {
                return Err(SimError::new(
                    SimErrorTypes::ConfigError,
                    format!(
                        "Error from Confy while loading the world file {} : {}",
                        path.display(),
                        error
                    ),
                ));
            }
        };
        Ok(config)
    }
}

/// Solid scene object: robots collide with it and sensors see it.
#[derive(Debug, Clone)]
pub struct Obstacle(Body);

impl Obstacle {
    pub fn body(&self) -> &Body {
        &self.0
    }
}

/// Visual-only scene object, invisible to sensors and collisions.
#[derive(Debug, Clone)]
pub struct Marker(Body);

impl Marker {
    pub fn body(&self) -> &Body {
        &self.0
    }
}

/// One robot with everything attached to it.
#[derive(Debug)]
pub struct RobotSlot {
    pub name: String,
    pub robot: Box<dyn Robot>,
    pub supervisor: Box<dyn Supervisor>,
    pub tracker: PathTracker,
}

#[derive(Debug)]
pub struct World {
    pub robots: Vec<RobotSlot>,
    pub obstacles: Vec<Obstacle>,
    pub markers: Vec<Marker>,
}

impl World {
    /// Builds the whole scene, or nothing.
    pub fn from_config(config: &WorldConfig) -> SimResult<World> {
        if config.robots.is_empty() {
            return Err(SimError::new(
                SimErrorTypes::WorldError,
                String::from("A world needs at least one robot"),
            ));
        }
        let mut robots = Vec::with_capacity(config.robots.len());
        for entry in &config.robots {
            let robot = make_robot_from_config(&entry.robot, entry.pose, entry.color)
                .map_err(|error| error.chain(format!("While building robot {}", entry.name)))?;
            let supervisor = make_supervisor_from_config(&entry.supervisor);
            robots.push(RobotSlot {
                name: entry.name.clone(),
                robot,
                supervisor,
                tracker: PathTracker::new(entry.pose),
            });
        }
        let obstacles = build_bodies(&config.obstacles, "obstacle")?
            .into_iter()
            .map(Obstacle)
            .collect();
        let markers = build_bodies(&config.markers, "marker")?
            .into_iter()
            .map(Marker)
            .collect();
        Ok(World {
            robots,
            obstacles,
            markers,
        })
    }

    /// Bounds of every body in the scene.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let robots = self.robots.iter().map(|slot| slot.robot.body().bounding_rect());
        let obstacles = self.obstacles.iter().map(|obstacle| obstacle.body().bounding_rect());
        let markers = self.markers.iter().map(|marker| marker.body().bounding_rect());
        Rect::sum(robots.chain(obstacles).chain(markers))
    }

    /// Supervisor parameters per robot name, harvested before a rebuild
    /// so they survive it.
    pub fn harvest_parameters(&self) -> Vec<(String, SupervisorParams)> {
        self.robots
            .iter()
            .map(|slot| (slot.name.clone(), slot.supervisor.parameters()))
            .collect()
    }
}

fn build_bodies(entries: &[ObjectEntry], kind: &str) -> SimResult<Vec<Body>> {
    let mut bodies = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let points = entry
            .points
            .iter()
            .map(|&[x, y]| Vector2::new(x, y))
            .collect();
        let body = Body::new(entry.pose, points, entry.color)
            .map_err(|error| error.chain(format!("While building {} {}", kind, index)))?;
        bodies.push(body);
    }
    Ok(bodies)
}
