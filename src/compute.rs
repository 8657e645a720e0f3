/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current `World`
/// (plus the `GameConfig`, and where needed an RNG handle) and returns a
/// brand-new `World`.  Side effects are limited to the injected RNG.
///
/// One frame of play runs the phases in this order:
/// input → spawn → bullets → enemies → collisions → cleanup → background.

use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Entity, EntityId, GameStatus, InputState, World};
use crate::spatial::SpatialIndex;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh world: player centred near the bottom, nothing else alive.
pub fn init_world(config: &GameConfig) -> World {
    let player = Entity::new(
        EntityId(0),
        config.screen_width / 2.0 - config.player_width / 2.0,
        config.screen_height - config.player_bottom_margin,
        config.player_width,
        config.player_height,
    );
    World {
        player,
        bullets: Vec::new(),
        enemies: Vec::new(),
        shapes: SpatialIndex::new(config.broadphase_cell_size),
        frame: 0,
        last_shot_frame: 0,
        score: 0,
        lives: config.starting_lives,
        status: GameStatus::Playing,
        bg_scroll_y: 0.0,
        next_id: 1,
    }
}

/// Throw the whole world away and start over.
pub fn restart(config: &GameConfig) -> World {
    info!("restarting with {} lives", config.starting_lives);
    init_world(config)
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Apply held directions, clamp to the screen, then fire if the cooldown
/// allows it.
pub fn handle_input(state: &World, input: &InputState, config: &GameConfig) -> World {
    let mut next = state.clone();

    let mut x = next.player.x;
    if input.left {
        x -= config.player_speed;
    }
    if input.right {
        x += config.player_speed;
    }
    next.player.x = x.clamp(0.0, config.screen_width - next.player.w);

    if input.fire && next.frame.saturating_sub(next.last_shot_frame) >= config.shoot_cooldown {
        next = fire(&next, config);
    }
    next
}

/// Spawn one bullet centred above the player and reset the cooldown.
/// Does not check the cooldown itself.
pub fn fire(state: &World, config: &GameConfig) -> World {
    let mut next = state.clone();
    let id = next.allocate_id();
    let bullet = Entity::new(
        id,
        next.player.x + next.player.w / 2.0 - config.bullet_width / 2.0,
        next.player.y - config.bullet_height,
        config.bullet_width,
        config.bullet_height,
    )
    .with_velocity(0.0, -config.bullet_speed);

    next.shapes.insert(id, bullet.bounds());
    next.bullets.push(bullet);
    next.last_shot_frame = next.frame;
    next
}

// ── Per-frame phases ─────────────────────────────────────────────────────────

/// On every `spawn_every`-th frame add one enemy just above the top edge.
pub fn spawn_enemies(state: &World, config: &GameConfig, rng: &mut impl Rng) -> World {
    if state.frame % config.spawn_every != 0 {
        return state.clone();
    }
    let mut next = state.clone();
    let id = next.allocate_id();

    let max_x = (config.screen_width - config.enemy_width).floor() as i64;
    let x = rng.gen_range(0..max_x.max(1)) as f64;
    let step = rng.gen_range(0..config.enemy_speed_steps);
    let vy = config.enemy_speed + f64::from(step) * config.enemy_speed_step;

    let enemy = Entity::new(id, x, -config.enemy_height, config.enemy_width, config.enemy_height)
        .with_velocity(0.0, vy);
    debug!("frame {}: spawned enemy {:?} at x={} vy={}", next.frame, id, x, vy);

    next.shapes.insert(id, enemy.bounds());
    next.enemies.push(enemy);
    next
}

/// Move bullets and sync their shapes; bullets fully above the screen die.
pub fn update_bullets(state: &World) -> World {
    let mut next = state.clone();
    for bullet in next.bullets.iter_mut().filter(|b| b.alive) {
        bullet.x += bullet.vx;
        bullet.y += bullet.vy;
        next.shapes.update(bullet.id, bullet.bounds());
        if bullet.y + bullet.h < 0.0 {
            bullet.alive = false;
        }
    }
    next
}

/// Move enemies and sync their shapes.  An enemy that falls past the bottom
/// edge dies and costs a life; running out of lives ends the game.
pub fn update_enemies(state: &World, config: &GameConfig) -> World {
    let mut next = state.clone();
    for enemy in next.enemies.iter_mut().filter(|e| e.alive) {
        enemy.x += enemy.vx;
        enemy.y += enemy.vy;
        next.shapes.update(enemy.id, enemy.bounds());
        if enemy.y > config.screen_height {
            enemy.alive = false;
            next.lives -= 1;
            if next.lives <= 0 && next.status == GameStatus::Playing {
                next.status = GameStatus::GameOver;
                info!("game over at frame {} with score {}", next.frame, next.score);
            }
        }
    }
    next
}

/// Bullets against enemies.  Each bullet kills at most the first enemy (in
/// list order) it overlaps.  The player is never hit.
pub fn resolve_collisions(state: &World, config: &GameConfig) -> World {
    let mut next = state.clone();
    let World {
        bullets,
        enemies,
        shapes,
        score,
        ..
    } = &mut next;

    for bullet in bullets.iter_mut().filter(|b| b.alive) {
        let bounds = bullet.bounds();
        let candidates = shapes.query(&bounds);
        if candidates.is_empty() {
            continue;
        }
        let hit = enemies
            .iter_mut()
            .filter(|e| e.alive && candidates.contains(&e.id))
            .find(|e| bounds.intersects(&e.bounds()));
        if let Some(enemy) = hit {
            bullet.alive = false;
            enemy.alive = false;
            *score += config.score_per_kill;
            debug!("bullet {:?} destroyed enemy {:?}", bullet.id, enemy.id);
        }
    }
    next
}

/// Keep only live bullets and enemies, in order, and deregister the shapes of
/// everything dropped.
pub fn cleanup(state: &World) -> World {
    let mut next = state.clone();
    let World {
        bullets,
        enemies,
        shapes,
        ..
    } = &mut next;

    *bullets = retain_live(bullets, shapes);
    *enemies = retain_live(enemies, shapes);
    next
}

fn retain_live(entities: &[Entity], shapes: &mut SpatialIndex) -> Vec<Entity> {
    let (live, dead): (Vec<Entity>, Vec<Entity>) =
        entities.iter().cloned().partition(|e| e.alive);
    for entity in &dead {
        shapes.remove(entity.id);
    }
    live
}

/// Advance the background offset, wrapping after one screen height.
pub fn scroll_background(state: &World, config: &GameConfig) -> World {
    let mut bg_scroll_y = state.bg_scroll_y + config.background_scroll_speed;
    if bg_scroll_y > config.screen_height {
        bg_scroll_y = 0.0;
    }
    World {
        bg_scroll_y,
        ..state.clone()
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// While the game is over only the restart action is honoured.
pub fn step(
    state: &World,
    input: &InputState,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> World {
    if state.status == GameStatus::GameOver {
        return if input.restart {
            restart(config)
        } else {
            state.clone()
        };
    }

    let mut next = World {
        frame: state.frame + 1,
        ..state.clone()
    };
    next = handle_input(&next, input, config);
    next = spawn_enemies(&next, config, rng);
    next = update_bullets(&next);
    next = update_enemies(&next, config);
    next = resolve_collisions(&next, config);
    next = cleanup(&next);
    scroll_background(&next, config)
}
