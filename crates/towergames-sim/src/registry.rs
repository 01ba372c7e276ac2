//! Entity registry: the hecs component store plus per-group membership.
//!
//! The registry is the only owner of entity lifetime. Groups keep insertion
//! order so that pair iteration, and therefore collision outcomes, are
//! reproducible from one run to the next.

use hecs::{DynamicBundle, Entity, EntityBuilder, World};

use towergames_core::components::{Health, Life, Role};
use towergames_core::enums::Group;
use towergames_core::types::Body;
use towergames_core::GameError;

/// Capability to forcibly remove an entity.
///
/// Only [`Registry::killable`] issues these, and it refuses for roles that
/// must leave `Alive` through damage alone (the defended target).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Killable(Entity);

impl Killable {
    pub fn entity(&self) -> Entity {
        self.0
    }
}

/// Component store and role-group membership.
pub struct Registry {
    world: World,
    groups: [Vec<Entity>; Group::COUNT],
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            groups: Default::default(),
        }
    }

    /// Spawn an entity with its role, a fresh `Alive` state, a body and any
    /// extra components, and register it in the role's group.
    pub fn spawn(&mut self, role: Role, body: Body, extra: impl DynamicBundle) -> Entity {
        let mut builder = EntityBuilder::new();
        builder.add(role).add(Life::default()).add(body).add_bundle(extra);
        let entity = self.world.spawn(builder.build());
        self.add(entity, role.group());
        entity
    }

    /// Remove an entity from its group and from the component store.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), GameError> {
        let group = self.role(entity).map(|r| r.group());
        if let Some(group) = group {
            self.remove(entity, group);
        }
        self.world
            .despawn(entity)
            .map_err(|_| GameError::StaleEntityReference)
    }

    /// Add an entity to a group. Adding twice is a no-op.
    pub fn add(&mut self, entity: Entity, group: Group) {
        let members = &mut self.groups[group.index()];
        if !members.contains(&entity) {
            members.push(entity);
        }
    }

    /// Remove an entity from a group, keeping the order of the rest.
    /// Absent entities are ignored.
    pub fn remove(&mut self, entity: Entity, group: Group) {
        self.groups[group.index()].retain(|&e| e != entity);
    }

    /// Current members of a group in insertion order.
    pub fn members(&self, group: Group) -> &[Entity] {
        &self.groups[group.index()]
    }

    pub fn count(&self, group: Group) -> usize {
        self.groups[group.index()].len()
    }

    /// Visit every `(a, b)` pair with `a` in `group_a` (outer) and `b` in
    /// `group_b` (inner). Both memberships are copied before the walk starts,
    /// so the callback may add or remove entities freely.
    pub fn for_each_pair<F>(&mut self, group_a: Group, group_b: Group, mut f: F)
    where
        F: FnMut(&mut Registry, Entity, Entity),
    {
        let outer = self.groups[group_a.index()].clone();
        let inner = self.groups[group_b.index()].clone();
        for &a in &outer {
            for &b in &inner {
                if a != b {
                    f(self, a, b);
                }
            }
        }
    }

    /// Drop every entity and replace each group container with a new one.
    /// Copies taken earlier by a pair walk are unaffected.
    pub fn purge(&mut self) {
        self.groups = Default::default();
        self.world = World::new();
    }

    /// Issue a forced-removal capability, or `None` for roles that only die
    /// through damage.
    pub fn killable(&self, entity: Entity) -> Option<Killable> {
        let role = self.role(entity)?;
        role.permits_forced_removal().then_some(Killable(entity))
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn role(&self, entity: Entity) -> Option<Role> {
        self.world.get::<&Role>(entity).ok().map(|r| *r)
    }

    pub fn body(&self, entity: Entity) -> Option<Body> {
        self.world.get::<&Body>(entity).ok().map(|b| *b)
    }

    pub fn health(&self, entity: Entity) -> Option<Health> {
        self.world.get::<&Health>(entity).ok().map(|h| *h)
    }

    /// True if the entity exists and is in the `Alive` state.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world
            .get::<&Life>(entity)
            .map(|life| life.is_alive())
            .unwrap_or(false)
    }

    /// Overwrite an entity's body. Stale entities are ignored.
    pub fn set_body(&mut self, entity: Entity, body: Body) {
        if let Ok(slot) = self.world.query_one_mut::<&mut Body>(entity) {
            *slot = body;
        }
    }

    /// Number of alive members in a group.
    pub fn alive_count(&self, group: Group) -> usize {
        self.members(group)
            .iter()
            .filter(|&&e| self.is_alive(e))
            .count()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
