//! Simulation constants and default tuning parameters.
//!
//! These seed `SessionConfig::default()`; balancing files override them.

/// Default fixed timestep in milliseconds (~60 Hz).
pub const DEFAULT_TICK_MS: u64 = 16;

/// Default RNG seed for spawn placement.
pub const DEFAULT_SEED: u64 = 42;

// --- Arena ---

pub const ARENA_WIDTH: f32 = 1024.0;
pub const ARENA_HEIGHT: f32 = 768.0;

/// Bodies this far outside the arena are discarded by cleanup.
pub const ARENA_OOB_MARGIN: f32 = 64.0;

// --- Player ---

pub const PLAYER_MAX_HEALTH: f64 = 100.0;
pub const PLAYER_DAMAGE_COOLDOWN_MS: u64 = 250;
pub const PLAYER_HALF_EXTENT: f32 = 16.0;
pub const PLAYER_SPEED: f32 = 200.0;
pub const PLAYER_SHOT_DAMAGE: f64 = 10.0;
pub const PLAYER_SHOT_SPEED: f32 = 600.0;

// --- Defended target ---

pub const TARGET_MAX_HEALTH: f64 = 500.0;
/// Blocks duplicate hits from several rule rows in the same tick.
pub const TARGET_DAMAGE_COOLDOWN_MS: u64 = 100;
pub const TARGET_HALF_EXTENT: f32 = 32.0;

// --- Turrets ---

pub const TURRET_DAMAGE_COOLDOWN_MS: u64 = 100;
pub const TURRET_HALF_EXTENT: f32 = 16.0;

pub const SMALL_TURRET_MAX_HEALTH: f64 = 100.0;
pub const SMALL_TURRET_RANGE: f32 = 500.0;
pub const SMALL_TURRET_DAMAGE: f64 = 5.0;
pub const SMALL_TURRET_VOLLEY: u32 = 1;
pub const SMALL_TURRET_INTERVAL_MS: u64 = 1000;

pub const LARGE_TURRET_MAX_HEALTH: f64 = 150.0;
pub const LARGE_TURRET_RANGE: f32 = 300.0;
pub const LARGE_TURRET_DAMAGE: f64 = 8.0;
pub const LARGE_TURRET_VOLLEY: u32 = 3;
pub const LARGE_TURRET_INTERVAL_MS: u64 = 1500;

pub const TURRET_PROJECTILE_SPEED: f32 = 500.0;

/// Angle between projectiles of a multi-shot volley (radians).
pub const VOLLEY_SPREAD: f32 = 0.15;

// --- Enemies ---

pub const LIGHT_ENEMY_MAX_HEALTH: f64 = 10.0;
pub const LIGHT_ENEMY_SPEED: f32 = 80.0;
pub const LIGHT_ENEMY_HALF_EXTENT: f32 = 14.0;

pub const HEAVY_ENEMY_MAX_HEALTH: f64 = 40.0;
pub const HEAVY_ENEMY_SPEED: f32 = 45.0;
pub const HEAVY_ENEMY_HALF_EXTENT: f32 = 20.0;

pub const RANGED_ENEMY_MAX_HEALTH: f64 = 20.0;
pub const RANGED_ENEMY_SPEED: f32 = 55.0;
pub const RANGED_ENEMY_HALF_EXTENT: f32 = 16.0;
pub const RANGED_ENEMY_RANGE: f32 = 350.0;
pub const RANGED_ENEMY_INTERVAL_MS: u64 = 2000;
pub const RANGED_ENEMY_SHOT_DAMAGE: f64 = 10.0;
pub const ENEMY_PROJECTILE_SPEED: f32 = 250.0;

// --- Projectiles, hazards, drops ---

pub const PROJECTILE_HALF_EXTENT: f32 = 4.0;
pub const PROJECTILE_LIFETIME_MS: u64 = 2000;
pub const HAZARD_HALF_EXTENT: f32 = 12.0;
pub const DROP_HALF_EXTENT: f32 = 10.0;

// --- Wave cadence ---

/// Spawn interval at cadence tier 1.
pub const BASE_SPAWN_INTERVAL_MS: u64 = 1500;
/// Floor for high cadence tiers.
pub const MIN_SPAWN_INTERVAL_MS: u64 = 200;

// --- Economy ---

pub const STARTING_POINTS: u32 = 100;

pub const SMALL_TURRET_COST: u32 = 100;
pub const LARGE_TURRET_COST: u32 = 200;
pub const REPAIR_HAMMER_COST: u32 = 50;
pub const FIRST_AID_COST: u32 = 40;

pub const FIRST_AID_HEAL: f64 = 50.0;

pub const LIGHT_KILL_REWARD: u32 = 30;
pub const HEAVY_KILL_REWARD: u32 = 40;
pub const RANGED_KILL_REWARD: u32 = 50;
