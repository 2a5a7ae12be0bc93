//! Game World
//!
//! The world is the entity registry: one generational pool per entity
//! kind, behind a kind-polymorphic create/destroy/get facade. It is a
//! plain value with no global state - construct as many as you want
//! (tests do), drop them when done.
//!
//! Lookups through the shared `get` never return null: an invalid or
//! unknown handle resolves to a shared default record, so call sites
//! can dereference unconditionally. The default is only ever handed out
//! immutably; mutation goes through `get_mut`, which keeps the explicit
//! `Option`.

use crate::config::EngineConfig;
use crate::pool::HandlePool;
use crate::serial::{Deserialize, Deserializer, Serialize, Serializer};

use super::entity::{Entity, EntityHandle, EntityKind};

/// Entities per kind when no configuration is supplied.
pub const DEFAULT_ENTITY_CAPACITY: u32 = 256;

/// The entity registry: per-kind pools plus the shared default record.
pub struct World {
    players: HandlePool<Entity>,
    enemies: HandlePool<Entity>,
    projectiles: HandlePool<Entity>,
    items: HandlePool<Entity>,
    default_entity: Entity,
}

impl World {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ENTITY_CAPACITY)
    }

    /// Create a world whose pools each hold up to `capacity_per_kind`
    /// entities. Capacities are fixed for the world's lifetime.
    pub fn with_capacity(capacity_per_kind: u32) -> Self {
        Self {
            players: HandlePool::new(capacity_per_kind),
            enemies: HandlePool::new(capacity_per_kind),
            projectiles: HandlePool::new(capacity_per_kind),
            items: HandlePool::new(capacity_per_kind),
            default_entity: Entity::default(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_capacity(config.entity_capacity)
    }

    fn pool(&self, kind: EntityKind) -> Option<&HandlePool<Entity>> {
        match kind {
            EntityKind::None => None,
            EntityKind::Player => Some(&self.players),
            EntityKind::Enemy => Some(&self.enemies),
            EntityKind::Projectile => Some(&self.projectiles),
            EntityKind::Item => Some(&self.items),
        }
    }

    fn pool_mut(&mut self, kind: EntityKind) -> Option<&mut HandlePool<Entity>> {
        match kind {
            EntityKind::None => None,
            EntityKind::Player => Some(&mut self.players),
            EntityKind::Enemy => Some(&mut self.enemies),
            EntityKind::Projectile => Some(&mut self.projectiles),
            EntityKind::Item => Some(&mut self.items),
        }
    }

    /// Create a default-constructed entity of the given kind.
    ///
    /// Returns [`EntityHandle::NULL`] for the `None` kind or when that
    /// kind's pool is full.
    pub fn create(&mut self, kind: EntityKind) -> EntityHandle {
        let Some(pool) = self.pool_mut(kind) else {
            return EntityHandle::NULL;
        };

        let value = pool.allocate(Entity::default());
        if value.is_null() {
            return EntityHandle::NULL;
        }
        if let Some(e) = pool.get_mut(value) {
            e.kind = kind;
        }
        EntityHandle { kind, value }
    }

    /// Destroy the entity a handle refers to. No-op for unknown kinds
    /// and stale handles.
    pub fn destroy(&mut self, handle: EntityHandle) {
        if let Some(pool) = self.pool_mut(handle.kind) {
            pool.free(handle.value);
        }
    }

    /// Resolve a handle to its record.
    ///
    /// Never returns null: an unknown kind or a stale handle resolves
    /// to the shared default record, which is read-only by construction.
    pub fn get(&self, handle: EntityHandle) -> &Entity {
        match self.pool(handle.kind) {
            Some(pool) => pool.get(handle.value).unwrap_or(&self.default_entity),
            None => &self.default_entity,
        }
    }

    /// Resolve a handle for mutation. `None` for anything invalid.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.pool_mut(handle.kind)?.get_mut(handle.value)
    }

    /// Check whether a handle still refers to a live entity.
    pub fn is_valid(&self, handle: EntityHandle) -> bool {
        self.pool(handle.kind)
            .map(|pool| pool.is_valid(handle.value))
            .unwrap_or(false)
    }

    /// Total live entities across all kinds.
    pub fn count(&self) -> u32 {
        EntityKind::ALL
            .iter()
            .filter_map(|&kind| self.pool(kind))
            .map(|pool| pool.count())
            .sum()
    }

    /// Destroy every entity, keeping pool memory for reuse. All
    /// outstanding handles become stale.
    pub fn clear(&mut self) {
        for kind in EntityKind::ALL {
            if let Some(pool) = self.pool_mut(kind) {
                pool.reset_keeping_memory();
            }
        }
    }

    /// Visit every enabled entity, pools in kind declaration order.
    pub fn for_each_enabled(&mut self, f: impl FnMut(&mut Entity)) {
        self.for_each_enabled_in(&EntityKind::ALL, f);
    }

    /// Like [`for_each_enabled`](Self::for_each_enabled), restricted to
    /// a set of kinds. Visit order is still kind declaration order, not
    /// the order of `kinds`.
    pub fn for_each_enabled_in(&mut self, kinds: &[EntityKind], mut f: impl FnMut(&mut Entity)) {
        for kind in EntityKind::ALL {
            if !kinds.contains(&kind) {
                continue;
            }
            let Some(pool) = self.pool_mut(kind) else {
                continue;
            };
            for e in pool.iter_mut() {
                if e.enabled {
                    f(e);
                }
            }
        }
    }

    /// Re-create an entity from a loaded record. Records with an
    /// unknown kind, or whose pool is full, are dropped with a warning.
    fn spawn_record(&mut self, record: Entity) -> EntityHandle {
        if record.kind == EntityKind::None {
            log::warn!("world load: dropping entity with unrecognized kind");
            return EntityHandle::NULL;
        }

        let handle = self.create(record.kind);
        if handle.is_null() {
            log::warn!(
                "world load: dropping entity, {} pool is full",
                record.kind.as_str()
            );
            return handle;
        }

        if let Some(e) = self.get_mut(handle) {
            *e = record;
        }
        handle
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for World {
    fn serialize(&self, s: &mut Serializer) {
        s.begin_block();
        for kind in EntityKind::ALL {
            let Some(pool) = self.pool(kind) else { continue };
            for e in pool.iter() {
                s.field("entity", e);
            }
        }
        s.end_block();
    }
}

impl Deserialize for World {
    /// Appends the loaded population to the world. Unknown fields are
    /// skipped; a malformed entity block aborts the load.
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        if !d.enter_block() {
            return false;
        }
        while !d.peek_block_end() {
            if d.is_at_end() {
                return false;
            }
            let key = d.read_key();
            if key == "entity" {
                let mut record = Entity::default();
                if !record.deserialize(d) {
                    return false;
                }
                self.spawn_record(record);
            } else {
                d.skip_field();
            }
        }
        d.exit_block()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_create_stamps_kind() {
        let mut world = World::new();
        let h = world.create(EntityKind::Player);
        assert!(!h.is_null());
        assert_eq!(world.get(h).kind, EntityKind::Player);
        assert_eq!(world.count(), 1);
    }

    #[test]
    fn test_create_none_kind_is_null() {
        let mut world = World::new();
        assert_eq!(world.create(EntityKind::None), EntityHandle::NULL);
        assert_eq!(world.count(), 0);
    }

    #[test]
    fn test_destroy_then_get_returns_default() {
        let mut world = World::new();
        let h = world.create(EntityKind::Enemy);
        world.get_mut(h).unwrap().sprite = 42;

        world.destroy(h);
        assert!(!world.is_valid(h));

        // The stale handle resolves to the read-only default record.
        let e = world.get(h);
        assert_eq!(e.kind, EntityKind::None);
        assert_eq!(e.sprite, 0);
        assert!(world.get_mut(h).is_none());
    }

    #[test]
    fn test_destroy_is_noop_for_stale_and_null() {
        let mut world = World::new();
        let h = world.create(EntityKind::Item);
        world.destroy(h);
        world.destroy(h);
        world.destroy(EntityHandle::NULL);
        assert_eq!(world.count(), 0);
    }

    #[test]
    fn test_capacity_exhaustion_returns_null() {
        let mut world = World::with_capacity(2);
        assert!(!world.create(EntityKind::Player).is_null());
        assert!(!world.create(EntityKind::Player).is_null());
        assert!(world.create(EntityKind::Player).is_null());

        // Other kinds have their own pools.
        assert!(!world.create(EntityKind::Enemy).is_null());
    }

    #[test]
    fn test_for_each_enabled_skips_disabled() {
        let mut world = World::new();
        let a = world.create(EntityKind::Player);
        let b = world.create(EntityKind::Enemy);
        let _c = world.create(EntityKind::Enemy);
        world.get_mut(b).unwrap().enabled = false;
        world.get_mut(a).unwrap().sprite = 1;

        let mut visited = 0;
        world.for_each_enabled(|e| {
            assert!(e.enabled);
            visited += 1;
        });
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_for_each_visits_kinds_in_declaration_order() {
        let mut world = World::new();
        // Created out of order on purpose.
        world.create(EntityKind::Item);
        world.create(EntityKind::Player);
        world.create(EntityKind::Projectile);

        let mut kinds = Vec::new();
        world.for_each_enabled(|e| kinds.push(e.kind));
        assert_eq!(
            kinds,
            vec![EntityKind::Player, EntityKind::Projectile, EntityKind::Item]
        );
    }

    #[test]
    fn test_for_each_enabled_in_subset() {
        let mut world = World::new();
        world.create(EntityKind::Player);
        world.create(EntityKind::Enemy);
        world.create(EntityKind::Item);

        let mut kinds = Vec::new();
        world.for_each_enabled_in(&[EntityKind::Item, EntityKind::Enemy], |e| {
            kinds.push(e.kind)
        });
        assert_eq!(kinds, vec![EntityKind::Enemy, EntityKind::Item]);
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut world = World::new();
        let h = world.create(EntityKind::Player);
        world.clear();
        assert_eq!(world.count(), 0);
        assert!(!world.is_valid(h));
    }

    #[test]
    fn test_population_round_trip() {
        let mut world = World::new();
        let p = world.create(EntityKind::Player);
        world.get_mut(p).unwrap().pos = Vec3::new(1.0, 2.0, 0.0);
        world.get_mut(p).unwrap().sprite = 5;
        let e = world.create(EntityKind::Enemy);
        world.get_mut(e).unwrap().enabled = false;

        let mut s = Serializer::new();
        world.serialize(&mut s);
        let text = s.finish();

        let mut loaded = World::new();
        let mut d = Deserializer::new(&text);
        assert!(loaded.deserialize(&mut d));
        assert_eq!(loaded.count(), 2);

        let mut player = None;
        let mut enemy = None;
        loaded.for_each_enabled_in(&[EntityKind::Player], |e| player = Some(e.clone()));
        assert_eq!(player.as_ref().map(|e| e.sprite), Some(5));
        assert_eq!(
            player.as_ref().map(|e| e.pos),
            Some(Vec3::new(1.0, 2.0, 0.0))
        );

        // The disabled enemy was loaded too; for_each_enabled skips it.
        loaded.for_each_enabled_in(&[EntityKind::Enemy], |e| enemy = Some(e.clone()));
        assert!(enemy.is_none());
    }

    #[test]
    fn test_load_skips_unknown_document_fields() {
        let text = "{\n\
                    \x20   format_version: 9\n\
                    \x20   entity: \n\
                    \x20   {\n\
                    \x20       kind: Player\n\
                    \x20       sprite: 3\n\
                    \x20   }\n\
                    \n\
                    }\n";
        let mut world = World::new();
        let mut d = Deserializer::new(text);
        assert!(world.deserialize(&mut d));
        assert_eq!(world.count(), 1);
    }

    #[test]
    fn test_load_drops_unknown_kind_records() {
        let text = "{\n\
                    \x20   entity: \n\
                    \x20   {\n\
                    \x20       kind: Dragon\n\
                    \x20   }\n\
                    \n\
                    \x20   entity: \n\
                    \x20   {\n\
                    \x20       kind: Item\n\
                    \x20   }\n\
                    \n\
                    }\n";
        let mut world = World::new();
        let mut d = Deserializer::new(text);
        assert!(world.deserialize(&mut d));
        assert_eq!(world.count(), 1);
    }

    #[test]
    fn test_load_into_full_pool_drops_overflow() {
        let mut world = World::with_capacity(1);
        let mut source = World::new();
        source.create(EntityKind::Enemy);
        source.create(EntityKind::Enemy);

        let mut s = Serializer::new();
        source.serialize(&mut s);
        let text = s.finish();

        let mut d = Deserializer::new(&text);
        assert!(world.deserialize(&mut d));
        assert_eq!(world.count(), 1);
    }
}
