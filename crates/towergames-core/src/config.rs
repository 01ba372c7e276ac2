//! Session configuration and balancing tables.
//!
//! Everything a designer tunes lives here as data: wave definitions, shop
//! costs, kill rewards, entity profiles, the collision policy table and the
//! arena layout. Every struct is `#[serde(default)]`, so a JSON file only
//! needs to name the values it overrides.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::Role;
use crate::constants::*;
use crate::enums::*;
use crate::error::GameError;
use crate::types::Rect;

/// Complete configuration for one play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// RNG seed for spawn placement. Same seed = same session.
    pub seed: u64,
    /// Fixed timestep in milliseconds.
    pub tick_ms: u64,
    /// Number of waves selected by the session collaborator. `None` plays
    /// the full sequence.
    pub wave_count: Option<usize>,
    pub waves: Vec<Wave>,
    pub starting_points: u32,
    pub costs: CostTable,
    pub rewards: EnemyTable<u32>,
    pub profiles: EntityProfiles,
    /// Collision rule rows, evaluated in this order every tick.
    pub collision: Vec<CollisionRule>,
    pub arena: ArenaLayout,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tick_ms: DEFAULT_TICK_MS,
            wave_count: None,
            waves: default_waves(),
            starting_points: STARTING_POINTS,
            costs: CostTable::default(),
            rewards: EnemyTable {
                light: LIGHT_KILL_REWARD,
                heavy: HEAVY_KILL_REWARD,
                ranged: RANGED_KILL_REWARD,
            },
            profiles: EntityProfiles::default(),
            collision: default_collision_rules(),
            arena: ArenaLayout::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep defaults.
    pub fn from_json(text: &str) -> Result<Self, GameError> {
        let config: SessionConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Structural checks that do not depend on the selected wave count.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.tick_ms == 0 {
            return Err(GameError::Config("tick_ms must be positive".into()));
        }
        if self.arena.spawn_points.is_empty() {
            return Err(GameError::Config("arena needs at least one spawn point".into()));
        }
        if !is_amount(self.profiles.first_aid_heal) {
            return Err(GameError::Config(format!(
                "first_aid_heal must be a non-negative number, got {}",
                self.profiles.first_aid_heal
            )));
        }
        for (row, rule) in self.collision.iter().enumerate() {
            let damage = match rule.mode {
                CollisionMode::Blocking { effect } => effect.map(|e| e.damage),
                CollisionMode::Consuming { damage } => Some(damage),
            };
            if damage.is_some_and(|d| !d.is_valid()) {
                return Err(GameError::Config(format!(
                    "collision row {row} ({:?} vs {:?}) has an invalid damage amount",
                    rule.a, rule.b
                )));
            }
        }
        Ok(())
    }

    /// The wave sequence for this session: the configured list truncated to
    /// `wave_count`. Order is never changed.
    pub fn selected_waves(&self) -> Result<Vec<Wave>, GameError> {
        let available = self.waves.len();
        let requested = self.wave_count.unwrap_or(available);
        if requested == 0 || requested > available {
            return Err(GameError::InvalidWaveCount {
                requested,
                available,
            });
        }
        Ok(self.waves[..requested].to_vec())
    }
}

/// One round of the session: enemy composition and spawn cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    pub enemy_counts: BTreeMap<EnemyKind, u32>,
    /// Higher tier = faster cadence.
    pub cadence_tier: u32,
}

impl Wave {
    pub fn new(counts: &[(EnemyKind, u32)], cadence_tier: u32) -> Self {
        Self {
            enemy_counts: counts.iter().copied().collect(),
            cadence_tier,
        }
    }

    pub fn count(&self, kind: EnemyKind) -> u32 {
        self.enemy_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_enemies(&self) -> u32 {
        self.enemy_counts.values().sum()
    }
}

/// The mini-game's built-in eleven-wave sequence.
pub fn default_waves() -> Vec<Wave> {
    use EnemyKind::*;
    // (heavy, ranged, light, cadence)
    let table: [(u32, u32, u32, u32); 11] = [
        (1, 1, 2, 1),
        (1, 1, 0, 1),
        (1, 1, 1, 1),
        (1, 1, 1, 2),
        (1, 1, 1, 3),
        (10, 10, 10, 3),
        (20, 20, 20, 4),
        (10, 20, 20, 4),
        (10, 10, 40, 4),
        (40, 40, 40, 5),
        (40, 40, 40, 7),
    ];
    table
        .iter()
        .map(|&(heavy, ranged, light, cadence)| {
            Wave::new(&[(Heavy, heavy), (Ranged, ranged), (Light, light)], cadence)
        })
        .collect()
}

/// A value per enemy subtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTable<T> {
    pub light: T,
    pub heavy: T,
    pub ranged: T,
}

impl<T> EnemyTable<T> {
    pub fn get(&self, kind: EnemyKind) -> &T {
        match kind {
            EnemyKind::Light => &self.light,
            EnemyKind::Heavy => &self.heavy,
            EnemyKind::Ranged => &self.ranged,
        }
    }
}

/// Shop prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTable {
    pub small_turret: u32,
    pub large_turret: u32,
    pub repair_hammer: u32,
    pub first_aid: u32,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            small_turret: SMALL_TURRET_COST,
            large_turret: LARGE_TURRET_COST,
            repair_hammer: REPAIR_HAMMER_COST,
            first_aid: FIRST_AID_COST,
        }
    }
}

impl CostTable {
    pub fn cost(&self, item: ItemKind) -> u32 {
        match item {
            ItemKind::SmallTurret => self.small_turret,
            ItemKind::LargeTurret => self.large_turret,
            ItemKind::RepairHammer => self.repair_hammer,
            ItemKind::FirstAid => self.first_aid,
        }
    }
}

// --- Collision policy ---

fn is_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// How much damage a matched pair deals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DamageSpec {
    #[default]
    None,
    Flat { amount: f64 },
    /// Looked up by the attacking enemy's subtype.
    PerEnemy(EnemyTable<f64>),
    /// Whatever the attacking projectile carries.
    Carried,
}

impl DamageSpec {
    /// Every configured amount is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        match self {
            DamageSpec::None | DamageSpec::Carried => true,
            DamageSpec::Flat { amount } => is_amount(*amount),
            DamageSpec::PerEnemy(table) => {
                is_amount(table.light) && is_amount(table.heavy) && is_amount(table.ranged)
            }
        }
    }

    /// Resolve the amount dealt by `attacker`. Zero means "no damage".
    pub fn resolve(&self, attacker: &Role) -> f64 {
        match self {
            DamageSpec::None => 0.0,
            DamageSpec::Flat { amount } => *amount,
            DamageSpec::PerEnemy(table) => attacker
                .enemy_kind()
                .map(|kind| *table.get(kind))
                .unwrap_or(0.0),
            DamageSpec::Carried => attacker.carried_damage().unwrap_or(0.0),
        }
    }
}

/// Side effect of a blocking contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactEffect {
    /// Side that takes `damage`; the other side is the attacker.
    pub damaged: Side,
    pub damage: DamageSpec,
    /// Side that is forcibly removed after the damage is applied.
    #[serde(default)]
    pub destroyed: Option<Side>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CollisionMode {
    /// Solid contact, bodies do not interpenetrate. The effect fires once
    /// per contact.
    Blocking {
        #[serde(default)]
        effect: Option<ContactEffect>,
    },
    /// Overlap consumes side `a` and damages side `b`.
    Consuming {
        #[serde(default)]
        damage: DamageSpec,
    },
}

/// One row of the collision table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionRule {
    pub a: Group,
    pub b: Group,
    pub mode: CollisionMode,
}

impl CollisionRule {
    pub fn blocking(a: Group, b: Group) -> Self {
        Self {
            a,
            b,
            mode: CollisionMode::Blocking { effect: None },
        }
    }

    pub fn blocking_with(a: Group, b: Group, effect: ContactEffect) -> Self {
        Self {
            a,
            b,
            mode: CollisionMode::Blocking {
                effect: Some(effect),
            },
        }
    }

    pub fn consuming(a: Group, b: Group, damage: DamageSpec) -> Self {
        Self {
            a,
            b,
            mode: CollisionMode::Consuming { damage },
        }
    }
}

fn per_enemy(light: f64, heavy: f64, ranged: f64) -> DamageSpec {
    DamageSpec::PerEnemy(EnemyTable {
        light,
        heavy,
        ranged,
    })
}

/// The default rule table, in evaluation order.
pub fn default_collision_rules() -> Vec<CollisionRule> {
    use Group::*;
    vec![
        CollisionRule::blocking(Player, Obstacles),
        CollisionRule::blocking(Player, Turrets),
        CollisionRule::blocking(Player, DefendedTargets),
        CollisionRule::blocking_with(
            Player,
            Enemies,
            ContactEffect {
                damaged: Side::A,
                damage: per_enemy(10.0, 20.0, 5.0),
                destroyed: Some(Side::B),
            },
        ),
        CollisionRule::consuming(PlayerProjectiles, Obstacles, DamageSpec::None),
        CollisionRule::consuming(PlayerProjectiles, DefendedTargets, DamageSpec::None),
        CollisionRule::consuming(PlayerProjectiles, Enemies, DamageSpec::Carried),
        CollisionRule::blocking(Enemies, Obstacles),
        CollisionRule::blocking_with(
            DefendedTargets,
            Enemies,
            ContactEffect {
                damaged: Side::A,
                damage: per_enemy(20.0, 30.0, 10.0),
                destroyed: Some(Side::B),
            },
        ),
        CollisionRule::blocking_with(
            Enemies,
            Turrets,
            ContactEffect {
                damaged: Side::B,
                damage: per_enemy(10.0, 20.0, 5.0),
                destroyed: Some(Side::A),
            },
        ),
        CollisionRule::consuming(EnemyProjectiles, Obstacles, DamageSpec::None),
        CollisionRule::consuming(
            EnemyProjectiles,
            DefendedTargets,
            DamageSpec::Flat { amount: 10.0 },
        ),
        CollisionRule::consuming(EnemyProjectiles, Turrets, DamageSpec::Flat { amount: 5.0 }),
        CollisionRule::consuming(EnemyProjectiles, Player, DamageSpec::Flat { amount: 5.0 }),
        CollisionRule::consuming(Hazards, Enemies, DamageSpec::Flat { amount: 25.0 }),
        CollisionRule::consuming(Drops, Player, DamageSpec::None),
    ]
}

// --- Entity profiles ---

/// Automatic weapon stats for turrets and ranged enemies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub damage: f64,
    pub range: f32,
    pub interval_ms: u64,
    pub volley: u32,
    pub projectile_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub max_health: f64,
    pub cooldown_ms: u64,
    pub half_extent: f32,
    pub speed: f32,
    pub shot_damage: f64,
    pub shot_speed: f32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            cooldown_ms: PLAYER_DAMAGE_COOLDOWN_MS,
            half_extent: PLAYER_HALF_EXTENT,
            speed: PLAYER_SPEED,
            shot_damage: PLAYER_SHOT_DAMAGE,
            shot_speed: PLAYER_SHOT_SPEED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    pub max_health: f64,
    pub cooldown_ms: u64,
    pub half_extent: f32,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            max_health: TARGET_MAX_HEALTH,
            cooldown_ms: TARGET_DAMAGE_COOLDOWN_MS,
            half_extent: TARGET_HALF_EXTENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurretProfile {
    pub max_health: f64,
    pub cooldown_ms: u64,
    pub half_extent: f32,
    pub weapon: WeaponProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub max_health: f64,
    pub cooldown_ms: u64,
    pub half_extent: f32,
    pub speed: f32,
    #[serde(default)]
    pub weapon: Option<WeaponProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityProfiles {
    pub player: PlayerProfile,
    pub target: TargetProfile,
    pub small_turret: TurretProfile,
    pub large_turret: TurretProfile,
    pub enemies: EnemyTable<EnemyProfile>,
    pub projectile_half_extent: f32,
    pub projectile_lifetime_ms: u64,
    pub hazard_half_extent: f32,
    pub drop_half_extent: f32,
    pub first_aid_heal: f64,
}

impl Default for EntityProfiles {
    fn default() -> Self {
        Self {
            player: PlayerProfile::default(),
            target: TargetProfile::default(),
            small_turret: TurretProfile {
                max_health: SMALL_TURRET_MAX_HEALTH,
                cooldown_ms: TURRET_DAMAGE_COOLDOWN_MS,
                half_extent: TURRET_HALF_EXTENT,
                weapon: WeaponProfile {
                    damage: SMALL_TURRET_DAMAGE,
                    range: SMALL_TURRET_RANGE,
                    interval_ms: SMALL_TURRET_INTERVAL_MS,
                    volley: SMALL_TURRET_VOLLEY,
                    projectile_speed: TURRET_PROJECTILE_SPEED,
                },
            },
            large_turret: TurretProfile {
                max_health: LARGE_TURRET_MAX_HEALTH,
                cooldown_ms: TURRET_DAMAGE_COOLDOWN_MS,
                half_extent: TURRET_HALF_EXTENT,
                weapon: WeaponProfile {
                    damage: LARGE_TURRET_DAMAGE,
                    range: LARGE_TURRET_RANGE,
                    interval_ms: LARGE_TURRET_INTERVAL_MS,
                    volley: LARGE_TURRET_VOLLEY,
                    projectile_speed: TURRET_PROJECTILE_SPEED,
                },
            },
            enemies: EnemyTable {
                light: EnemyProfile {
                    max_health: LIGHT_ENEMY_MAX_HEALTH,
                    cooldown_ms: 0,
                    half_extent: LIGHT_ENEMY_HALF_EXTENT,
                    speed: LIGHT_ENEMY_SPEED,
                    weapon: None,
                },
                heavy: EnemyProfile {
                    max_health: HEAVY_ENEMY_MAX_HEALTH,
                    cooldown_ms: 0,
                    half_extent: HEAVY_ENEMY_HALF_EXTENT,
                    speed: HEAVY_ENEMY_SPEED,
                    weapon: None,
                },
                ranged: EnemyProfile {
                    max_health: RANGED_ENEMY_MAX_HEALTH,
                    cooldown_ms: 0,
                    half_extent: RANGED_ENEMY_HALF_EXTENT,
                    speed: RANGED_ENEMY_SPEED,
                    weapon: Some(WeaponProfile {
                        damage: RANGED_ENEMY_SHOT_DAMAGE,
                        range: RANGED_ENEMY_RANGE,
                        interval_ms: RANGED_ENEMY_INTERVAL_MS,
                        volley: 1,
                        projectile_speed: ENEMY_PROJECTILE_SPEED,
                    }),
                },
            },
            projectile_half_extent: PROJECTILE_HALF_EXTENT,
            projectile_lifetime_ms: PROJECTILE_LIFETIME_MS,
            hazard_half_extent: HAZARD_HALF_EXTENT,
            drop_half_extent: DROP_HALF_EXTENT,
            first_aid_heal: FIRST_AID_HEAL,
        }
    }
}

impl EntityProfiles {
    pub fn turret(&self, kind: TurretKind) -> &TurretProfile {
        match kind {
            TurretKind::Small => &self.small_turret,
            TurretKind::Large => &self.large_turret,
        }
    }
}

// --- Arena ---

/// A pick-up placed at session start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropSpawn {
    pub position: Vec2,
    pub value: u32,
}

/// Static layout of the play field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    pub width: f32,
    pub height: f32,
    pub player_spawn: Vec2,
    pub target_position: Vec2,
    /// Enemy entry points.
    pub spawn_points: Vec<Vec2>,
    pub obstacles: Vec<Rect>,
    pub hazards: Vec<Vec2>,
    pub drops: Vec<DropSpawn>,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        let (w, h) = (ARENA_WIDTH, ARENA_HEIGHT);
        Self {
            width: w,
            height: h,
            player_spawn: Vec2::new(w * 0.5, h * 0.5 + 96.0),
            target_position: Vec2::new(w * 0.5, h * 0.5),
            spawn_points: vec![
                Vec2::new(32.0, h * 0.5),
                Vec2::new(w - 32.0, h * 0.5),
                Vec2::new(w * 0.5, 32.0),
                Vec2::new(w * 0.5, h - 32.0),
            ],
            obstacles: vec![
                Rect::new(Vec2::new(192.0, 160.0), Vec2::new(48.0, 32.0)),
                Rect::new(Vec2::new(w - 192.0, 160.0), Vec2::new(48.0, 32.0)),
                Rect::new(Vec2::new(192.0, h - 160.0), Vec2::new(48.0, 32.0)),
                Rect::new(Vec2::new(w - 192.0, h - 160.0), Vec2::new(48.0, 32.0)),
            ],
            hazards: Vec::new(),
            drops: Vec::new(),
        }
    }
}

impl ArenaLayout {
    /// Play field bounds as a rectangle.
    pub fn bounds(&self) -> Rect {
        let half = Vec2::new(self.width * 0.5, self.height * 0.5);
        Rect::new(half, half)
    }
}
