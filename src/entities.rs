/// All game entity types — pure data, no logic.
///
/// Nothing in here knows about the broad-phase index; entities carry an
/// `EntityId` and the index keeps its own id → shape side table.

use crate::spatial::{Aabb, SpatialIndex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Pressed-key snapshot, sampled once at the start of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub restart: bool,
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Stable identity of a bullet or enemy for the lifetime of one world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Player, bullet or enemy: an axis-aligned box with a velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub vx: f64,
    /// Pixels per frame; negative moves up.
    pub vy: f64,
    pub alive: bool,
}

impl Entity {
    pub fn new(id: EntityId, x: f64, y: f64, w: f64, h: f64) -> Self {
        Entity {
            id,
            x,
            y,
            w,
            h,
            vx: 0.0,
            vy: 0.0,
            alive: true,
        }
    }

    pub fn with_velocity(self, vx: f64, vy: f64) -> Self {
        Entity { vx, vy, ..self }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.w, self.h)
    }
}

// ── Master world state ────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so the step functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct World {
    pub player: Entity,
    /// Live bullets in firing order.
    pub bullets: Vec<Entity>,
    /// Live enemies in spawn order.
    pub enemies: Vec<Entity>,
    /// Broad-phase shapes for every bullet and enemy in the lists above.
    pub shapes: SpatialIndex,
    pub frame: u64,
    pub last_shot_frame: u64,
    pub score: u32,
    pub lives: i32,
    pub status: GameStatus,
    /// Vertical offset of the scrolling background, in world pixels.
    pub bg_scroll_y: f64,
    pub(crate) next_id: u64,
}

impl World {
    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Hand out the next entity id.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }
}
