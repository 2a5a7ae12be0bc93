//! Entities
//!
//! An entity is a plain tagged record: a kind, a couple of flags, a
//! transform, a tint, and a sprite cell. There is no inheritance and no
//! virtual dispatch - the kind tag is a closed enum, and the world keeps
//! one pool per kind, so storage stays contiguous per variant and
//! dispatch is a single match.
//!
//! Entities reference their texture through a weak pool [`Handle`], not
//! a pointer: if the texture is freed first the handle simply stops
//! resolving. Keeping it alive is the caller's job.

use glam::{Vec3, Vec4};

use crate::pool::Handle;
use crate::serial::{Deserialize, Deserializer, Serialize, Serializer};

/// The closed set of entity variants. Each kind owns one pool in the
/// [`World`](crate::game::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    #[default]
    None,
    Player,
    Enemy,
    Projectile,
    Item,
}

impl EntityKind {
    /// Every real kind, in declaration order. Registry iteration and
    /// serialization both follow this order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Player,
        EntityKind::Enemy,
        EntityKind::Projectile,
        EntityKind::Item,
    ];

    /// Name used in save files.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::None => "None",
            EntityKind::Player => "Player",
            EntityKind::Enemy => "Enemy",
            EntityKind::Projectile => "Projectile",
            EntityKind::Item => "Item",
        }
    }

    /// Inverse of [`as_str`](Self::as_str). Unrecognized names map to
    /// `None`, which load paths treat as "drop this record".
    pub fn from_str(name: &str) -> EntityKind {
        match name {
            "Player" => EntityKind::Player,
            "Enemy" => EntityKind::Enemy,
            "Projectile" => EntityKind::Projectile,
            "Item" => EntityKind::Item,
            _ => EntityKind::None,
        }
    }
}

/// A game object record.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Which pool this record lives in
    pub kind: EntityKind,
    /// Disabled entities are skipped by world passes
    pub enabled: bool,
    /// Hidden entities still update but should not be drawn
    pub visible: bool,
    pub pos: Vec3,
    pub rot: Vec3,
    pub scl: Vec3,
    pub tint: Vec4,
    /// Sprite cell index within the texture's tile grid
    pub sprite: i32,
    /// Weak reference into a texture registry. Runtime-only: not
    /// serialized, re-resolved by name after a load.
    pub texture: Handle,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            kind: EntityKind::None,
            enabled: true,
            visible: true,
            pos: Vec3::ZERO,
            rot: Vec3::ZERO,
            scl: Vec3::ONE,
            tint: Vec4::ONE,
            sprite: 0,
            texture: Handle::NULL,
        }
    }
}

impl Entity {
    /// Emit this record's fields into an already-open block.
    pub fn write_fields(&self, s: &mut Serializer) {
        s.field("kind", self.kind.as_str());
        s.field("enabled", &self.enabled);
        s.field("visible", &self.visible);
        s.field("pos", &self.pos);
        s.field("rot", &self.rot);
        s.field("scl", &self.scl);
        s.field("tint", &self.tint);
        s.field("sprite", &self.sprite);
    }

    /// Decode one field by key. Returns true when the key was
    /// recognized (and its value consumed), false to let the caller
    /// skip it. This is the single-scan field matcher the block reader
    /// loops over.
    pub fn read_field(&mut self, key: &str, d: &mut Deserializer<'_>) -> bool {
        match key {
            "kind" => {
                let mut name = String::new();
                name.deserialize(d);
                self.kind = EntityKind::from_str(name.trim());
                true
            }
            "enabled" => {
                self.enabled.deserialize(d);
                true
            }
            "visible" => {
                self.visible.deserialize(d);
                true
            }
            "pos" => {
                self.pos.deserialize(d);
                true
            }
            "rot" => {
                self.rot.deserialize(d);
                true
            }
            "scl" => {
                self.scl.deserialize(d);
                true
            }
            "tint" => {
                self.tint.deserialize(d);
                true
            }
            "sprite" => {
                self.sprite.deserialize(d);
                true
            }
            _ => false,
        }
    }
}

impl Serialize for Entity {
    fn serialize(&self, s: &mut Serializer) {
        s.begin_block();
        self.write_fields(s);
        s.end_block();
    }
}

impl Deserialize for Entity {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        if !d.enter_block() {
            return false;
        }
        while !d.peek_block_end() {
            if d.is_at_end() {
                return false;
            }
            let key = d.read_key();
            if !self.read_field(key, d) {
                d.skip_field();
            }
        }
        d.exit_block()
    }
}

/// A kind tag paired with a pool-local handle.
///
/// A bare [`Handle`] is ambiguous once there is one pool per kind; the
/// kind half routes it to the right pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EntityHandle {
    pub kind: EntityKind,
    pub value: Handle,
}

impl EntityHandle {
    /// The "no entity" sentinel.
    pub const NULL: EntityHandle = EntityHandle {
        kind: EntityKind::None,
        value: Handle::NULL,
    };

    pub fn is_null(&self) -> bool {
        self.kind == EntityKind::None || self.value.is_null()
    }
}
