use std::cell::RefCell;
use std::rc::Rc;

use scroll_shooter::audio::{SilentTrack, Soundtrack};
use scroll_shooter::config::GameConfig;
use scroll_shooter::entities::*;
use scroll_shooter::game::Game;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Records every call so tests can check what the game asked of the music.
#[derive(Clone, Default)]
struct RecordingTrack {
    calls: Rc<RefCell<Vec<&'static str>>>,
    paused: bool,
}

impl Soundtrack for RecordingTrack {
    fn pause(&mut self) {
        self.paused = true;
        self.calls.borrow_mut().push("pause");
    }

    fn resume(&mut self) {
        self.paused = false;
        self.calls.borrow_mut().push("resume");
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

/// A config where the first enemy falls off screen quickly and one life ends
/// the game.
fn quick_loss() -> GameConfig {
    GameConfig {
        screen_height: 40.0,
        player_bottom_margin: 30.0,
        spawn_every: 1,
        enemy_speed: 20.0,
        starting_lives: 1,
        ..GameConfig::default()
    }
}

fn run_until_game_over<S: Soundtrack>(game: &mut Game<S>, rng: &mut StdRng) {
    for _ in 0..100 {
        game.update(&InputState::default(), rng);
        if game.world().is_game_over() {
            return;
        }
    }
    panic!("game never ended");
}

#[test]
fn music_pauses_on_game_over() {
    let track = RecordingTrack::default();
    let calls = track.calls.clone();
    let mut game = Game::new(quick_loss(), track);
    let mut rng = StdRng::seed_from_u64(7);

    run_until_game_over(&mut game, &mut rng);
    assert_eq!(game.world().lives, 0);
    assert!(game.soundtrack().is_paused());
    assert_eq!(*calls.borrow(), vec!["pause"]);

    // Idle frames while over do not touch the music again.
    for _ in 0..5 {
        game.update(&InputState::default(), &mut rng);
    }
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn restart_resumes_music_and_resets_world() {
    let track = RecordingTrack::default();
    let calls = track.calls.clone();
    let mut game = Game::new(quick_loss(), track);
    let mut rng = StdRng::seed_from_u64(7);

    run_until_game_over(&mut game, &mut rng);
    game.update(&InputState { restart: true, ..InputState::default() }, &mut rng);

    let world = game.world();
    assert_eq!(world.status, GameStatus::Playing);
    assert_eq!(world.lives, 1);
    assert_eq!(world.score, 0);
    assert_eq!(world.frame, 0);
    assert!(world.enemies.is_empty());
    assert!(world.bullets.is_empty());
    assert!(!game.soundtrack().is_paused());
    assert_eq!(*calls.borrow(), vec!["pause", "resume"]);
}

#[test]
fn silent_track_plays_identically() {
    let config = quick_loss();
    let mut with_music = Game::new(config.clone(), RecordingTrack::default());
    let mut silent = Game::new(config, SilentTrack::new());
    let mut rng_a = StdRng::seed_from_u64(11);
    let mut rng_b = StdRng::seed_from_u64(11);

    for _ in 0..20 {
        let input = InputState { right: true, fire: true, ..InputState::default() };
        with_music.update(&input, &mut rng_a);
        silent.update(&input, &mut rng_b);
        let (a, b) = (with_music.world(), silent.world());
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.player, b.player);
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.bullets, b.bullets);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.status, b.status);
    }
}
