/// Duration of one physics step, in seconds. Fixed: the time multiplier only
/// scales the real-time sleep between ticks, never the integration step.
pub const SIM_TICK: f32 = 0.02;

/// Sleep between two command polls while the simulation is paused, in ms.
pub const IDLE_SLEEP_MS: u64 = 10;

/// Wait slice while blocking on the frame acknowledgement, in ms. The wait
/// re-checks the stop flag at this period so shutdown cannot deadlock.
pub const FRAME_WAIT_SLICE_MS: u64 = 10;

/// Default maximum subdivision depth of the spatial index.
pub const QUADTREE_MAX_DEPTH: usize = 8;

/// Side length of the fallback world rect used when a spatial index is
/// built over an empty item set, in meters.
pub const DEFAULT_WORLD_SIDE: f32 = 100.;

/// Default real-time multiplier.
pub const DEFAULT_TIME_MULTIPLIER: f32 = 1.;
