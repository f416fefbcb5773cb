//! Default tuning values shared across the simulation.
//!
//! Distances are in world pixels and durations are in simulation ticks.
//! `SimConfig::default()` is built from these values.

/// Side length of a grid tile.
pub const TILE_SIZE: f32 = 32.0;
/// Animation frames advance once every this many ticks.
pub const FRAME_DIVISOR: u64 = 5;
/// Bezier samples per curve segment when smoothing a path.
pub const BEZIER_RESOLUTION: u32 = 4;

/// Distance the dog covers per tick.
pub const DOG_SPEED: f32 = 0.3;
/// The dog advances to the next path point once it is this close.
pub const DOG_ARRIVE_EPSILON: f32 = 1.0;
/// The dog waits when the player falls further behind than this.
pub const DOG_LEASH_DISTANCE: f32 = 160.0;
/// Zombies closer than this set the dog barking.
pub const DOG_BARK_RANGE: f32 = 96.0;
/// Minimum ticks between two barks.
pub const DOG_BARK_COOLDOWN_TICKS: u64 = 120;

/// Distance a normal zombie covers per tick.
pub const ZOMBIE_NORMAL_SPEED: f32 = 0.2;
/// Distance a sprinter covers per tick.
pub const ZOMBIE_SPRINTER_SPEED: f32 = 0.4;
/// Distance a crawler covers per tick.
pub const ZOMBIE_CRAWLER_SPEED: f32 = 0.1;
/// Distance the boss covers per tick before it sprints.
pub const ZOMBIE_BIG_SPEED: f32 = 0.2;
/// Hits a normal zombie takes before dying.
pub const ZOMBIE_NORMAL_HITS: i32 = 2;
/// Hits a sprinter takes before dying.
pub const ZOMBIE_SPRINTER_HITS: i32 = 1;
/// Hits a crawler takes before dying.
pub const ZOMBIE_CRAWLER_HITS: i32 = 3;
/// Hits the boss starts with across both phases.
pub const ZOMBIE_BIG_HITS: i32 = 10;
/// Zombies start chasing a target closer than this.
pub const ZOMBIE_SIGHT_RANGE: f32 = 200.0;
/// Side length of a zombie collision footprint.
pub const ZOMBIE_SIZE: f32 = 16.0;
/// Side length of the boss collision footprint.
pub const BOSS_SIZE: f32 = 28.0;

/// Distance the player covers per tick.
pub const PLAYER_SPEED: f32 = 1.0;
/// Side length of the player collision footprint.
pub const PLAYER_SIZE: f32 = 16.0;
/// Width of the dog collision footprint.
pub const DOG_WIDTH: f32 = 15.0;
/// Height of the dog collision footprint.
pub const DOG_HEIGHT: f32 = 8.0;

/// Furthest distance a shot travels.
pub const FIRE_RANGE: f32 = 320.0;
/// Rounds in a full magazine.
pub const AMMO_CAPACITY: u32 = 6;
/// Duration of a reload.
pub const RELOAD_TICKS: u32 = 90;
/// Recovery time after a shot before the trigger responds again.
pub const SHOT_TICKS: u32 = 10;
/// Recovery time after an empty click.
pub const DRY_FIRE_TICKS: u32 = 10;

/// Cell size of the reference spatial index.
pub const SPATIAL_CELL_SIZE: f32 = 16.0;
