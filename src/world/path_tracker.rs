use crate::geometry::Pose;

/// Timestamped trail of the poses a robot went through, drawn as its
/// track. Reset on world reconstruction.
#[derive(Debug, Clone)]
pub struct PathTracker {
    path: Vec<(f32, Pose)>,
}

impl PathTracker {
    pub fn new(start: Pose) -> Self {
        Self {
            path: vec![(0., start)],
        }
    }

    pub fn append(&mut self, time: f32, pose: Pose) {
        self.path.push((time, pose));
    }

    pub fn points(&self) -> &[(f32, Pose)] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}
