//! Collision resolution: evaluates the rule table against the registry.
//!
//! Rows run in declared order and pairs within a row follow registry
//! insertion order, so identical inputs resolve identically. An entity that
//! stops being alive partway through the tick is skipped by every later pair.

use std::collections::HashSet;

use hecs::Entity;
use log::{debug, warn};

use towergames_core::components::Role;
use towergames_core::config::{CollisionMode, CollisionRule, ContactEffect, DamageSpec, EnemyTable};
use towergames_core::enums::{Group, Shooter, Side};
use towergames_core::events::GameEvent;
use towergames_core::types::Body;

use crate::economy::EconomyLedger;
use crate::lifecycle::{self, DamageOutcome, DeathEffect};
use crate::physics::Physics;
use crate::registry::Registry;
use crate::waves::WaveScheduler;

type ContactKey = (usize, Entity, Entity);

/// Blocking contacts seen on the previous and current tick. A blocking
/// effect fires only for pairs that were not already touching.
#[derive(Debug, Default, Clone)]
pub struct ContactSet {
    previous: HashSet<ContactKey>,
    current: HashSet<ContactKey>,
}

impl ContactSet {
    fn begin(&mut self) {
        self.current.clear();
    }

    fn finish(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
    }

    /// Record a contact and report whether it just began.
    fn touch(&mut self, key: ContactKey) -> bool {
        self.current.insert(key);
        !self.previous.contains(&key)
    }
}

/// Session state the collision pass writes to.
pub struct CollisionContext<'a> {
    pub rewards: &'a EnemyTable<u32>,
    pub scheduler: &'a mut WaveScheduler,
    pub ledger: &'a mut EconomyLedger,
    pub events: &'a mut Vec<GameEvent>,
    pub now_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// The defended target died this tick.
    pub target_destroyed: bool,
}

pub fn run<P: Physics + ?Sized>(
    registry: &mut Registry,
    physics: &P,
    rules: &[CollisionRule],
    contacts: &mut ContactSet,
    ctx: &mut CollisionContext<'_>,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    contacts.begin();

    for (row, rule) in rules.iter().enumerate() {
        registry.for_each_pair(rule.a, rule.b, |registry, a, b| {
            if !registry.is_alive(a) || !registry.is_alive(b) {
                return;
            }
            let (Some(role_a), Some(role_b), Some(body_a), Some(body_b)) = (
                registry.role(a),
                registry.role(b),
                registry.body(a),
                registry.body(b),
            ) else {
                return;
            };
            let pair = Pair {
                a,
                b,
                role_a,
                role_b,
                body_a,
                body_b,
            };
            if rule.b == Group::Obstacles && rule.a.is_projectile() {
                remove_on_obstacle(registry, physics, &pair);
                return;
            }
            match rule.mode {
                CollisionMode::Blocking { effect } => resolve_blocking(
                    registry,
                    physics,
                    contacts,
                    ctx,
                    &mut report,
                    row,
                    &pair,
                    effect,
                ),
                CollisionMode::Consuming { damage } => {
                    resolve_consuming(registry, physics, ctx, &mut report, rule, &pair, damage)
                }
            }
        });
    }

    contacts.finish();
    report
}

struct Pair {
    a: Entity,
    b: Entity,
    role_a: Role,
    role_b: Role,
    body_a: Body,
    body_b: Body,
}

impl Pair {
    fn side(&self, side: Side) -> (Entity, Role) {
        match side {
            Side::A => (self.a, self.role_a),
            Side::B => (self.b, self.role_b),
        }
    }
}

/// Projectiles touching a static obstacle on any face are gone, whatever
/// mode the row declares.
fn remove_on_obstacle<P: Physics + ?Sized>(registry: &mut Registry, physics: &P, pair: &Pair) {
    let hit = physics.solid_contact(&pair.body_a, &pair.body_b).any()
        || physics.overlaps(&pair.body_a, &pair.body_b);
    if !hit {
        return;
    }
    if let Some(handle) = registry.killable(pair.a) {
        if let Err(err) = lifecycle::kill(registry, handle) {
            debug!("removal of {:?} on obstacle failed: {err}", pair.a);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_blocking<P: Physics + ?Sized>(
    registry: &mut Registry,
    physics: &P,
    contacts: &mut ContactSet,
    ctx: &mut CollisionContext<'_>,
    report: &mut CollisionReport,
    row: usize,
    pair: &Pair,
    effect: Option<ContactEffect>,
) {
    if !physics.solid_contact(&pair.body_a, &pair.body_b).any() {
        return;
    }
    let began = contacts.touch((row, pair.a, pair.b));

    let destroys = effect.and_then(|e| e.destroyed).is_some();
    if !destroys {
        registry.set_body(pair.a, physics.separate(&pair.body_a, &pair.body_b));
    }

    let Some(effect) = effect else {
        return;
    };
    if !began {
        return;
    }

    let (victim, _) = pair.side(effect.damaged);
    let (_, attacker_role) = pair.side(match effect.damaged {
        Side::A => Side::B,
        Side::B => Side::A,
    });
    let amount = effect.damage.resolve(&attacker_role);
    if amount != 0.0 {
        apply_damage(registry, ctx, report, victim, amount);
    }
    if let Some(side) = effect.destroyed {
        let (doomed, _) = pair.side(side);
        force_remove(registry, ctx, doomed);
    }
}

fn resolve_consuming<P: Physics + ?Sized>(
    registry: &mut Registry,
    physics: &P,
    ctx: &mut CollisionContext<'_>,
    report: &mut CollisionReport,
    rule: &CollisionRule,
    pair: &Pair,
    damage: DamageSpec,
) {
    if !physics.overlaps(&pair.body_a, &pair.body_b) {
        return;
    }

    if let Some(handle) = registry.killable(pair.a) {
        if let Err(err) = lifecycle::kill(registry, handle) {
            debug!("consume of {:?} failed: {err}", pair.a);
        }
    }

    match pair.role_a {
        Role::Drop { value } => {
            ctx.ledger.credit(value);
            ctx.events.push(GameEvent::DropCollected { value });
        }
        Role::PlayerProjectile {
            shooter: Shooter::Player,
            ..
        } if rule.b == Group::Enemies => {
            ctx.scheduler.record_hit();
            ctx.events.push(GameEvent::ShotHit);
        }
        _ => {}
    }

    let amount = damage.resolve(&pair.role_a);
    if amount != 0.0 {
        apply_damage(registry, ctx, report, pair.b, amount);
    }
}

/// Run a damage call and turn its outcome into events, rewards and the
/// loss flag. Invalid amounts are rejected and logged by `lifecycle::damage`.
fn apply_damage(
    registry: &mut Registry,
    ctx: &mut CollisionContext<'_>,
    report: &mut CollisionReport,
    victim: Entity,
    amount: f64,
) {
    let Some(role) = registry.role(victim) else {
        return;
    };
    let group = role.group();
    match lifecycle::damage(registry, victim, amount, ctx.now_ms) {
        Ok(DamageOutcome::Applied { remaining }) => {
            ctx.events.push(GameEvent::EntityDamaged {
                group,
                amount,
                remaining,
            });
        }
        Ok(DamageOutcome::Died { effect }) => {
            ctx.events.push(GameEvent::EntityDamaged {
                group,
                amount,
                remaining: 0.0,
            });
            ctx.events.push(GameEvent::EntityDied { group });
            match effect {
                DeathEffect::Reward(kind) => {
                    let points = *ctx.rewards.get(kind);
                    ctx.ledger.credit(points);
                    ctx.events.push(GameEvent::RewardEarned { points });
                }
                DeathEffect::SessionLoss => report.target_destroyed = true,
                DeathEffect::Removal => {}
            }
        }
        Ok(DamageOutcome::Rejected) => {}
        Err(err) => debug!("damage to {victim:?} not applied: {err}"),
    }
}

fn force_remove(registry: &mut Registry, ctx: &mut CollisionContext<'_>, entity: Entity) {
    let Some(handle) = registry.killable(entity) else {
        warn!("{entity:?} cannot be removed by contact");
        return;
    };
    let group = registry.role(entity).map(|r| r.group());
    match (lifecycle::kill(registry, handle), group) {
        (Ok(true), Some(group)) => ctx.events.push(GameEvent::EntityDied { group }),
        (Err(err), _) => debug!("forced removal of {entity:?} failed: {err}"),
        _ => {}
    }
}
