use scroll_shooter::compute::init_world;
use scroll_shooter::config::GameConfig;
use scroll_shooter::entities::*;
use scroll_shooter::spatial::Aabb;

#[test]
fn status_and_input_equality() {
    assert_eq!(GameStatus::Playing, GameStatus::Playing);
    assert_ne!(GameStatus::Playing, GameStatus::GameOver);

    let idle = InputState::default();
    assert!(!idle.left && !idle.right && !idle.fire && !idle.restart);
    assert_ne!(idle, InputState { fire: true, ..idle });
}

#[test]
fn entity_bounds_match_fields() {
    let e = Entity::new(EntityId(3), 98.0, 104.0, 28.0, 18.0).with_velocity(0.0, 2.5);
    assert!(e.alive);
    assert_eq!(e.vy, 2.5);
    assert_eq!(e.bounds(), Aabb::new(98.0, 104.0, 28.0, 18.0));
    assert_eq!(e.bounds().right(), 126.0);
    assert_eq!(e.bounds().bottom(), 122.0);
}

#[test]
fn allocated_ids_are_unique() {
    let mut world = init_world(&GameConfig::default());
    let a = world.allocate_id();
    let b = world.allocate_id();
    assert_ne!(a, b);
    assert_ne!(a, world.player.id);
    assert_ne!(b, world.player.id);
}

#[test]
fn world_clone_is_independent() {
    let original = init_world(&GameConfig::default());
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99.0;
    cloned.score = 999;
    let id = cloned.allocate_id();
    let enemy = Entity::new(id, 5.0, 5.0, 28.0, 18.0);
    cloned.shapes.insert(id, enemy.bounds());
    cloned.enemies.push(enemy);

    assert_eq!(original.player.x, 224.0);
    assert_eq!(original.score, 0);
    assert!(original.enemies.is_empty());
    assert!(original.shapes.is_empty());
}
