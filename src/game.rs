/// A play session: one `World` plus the process-owned soundtrack.

use rand::Rng;

use crate::audio::Soundtrack;
use crate::compute::{init_world, step};
use crate::config::GameConfig;
use crate::entities::{GameStatus, InputState, World};

pub struct Game<S: Soundtrack> {
    config: GameConfig,
    world: World,
    soundtrack: S,
}

impl<S: Soundtrack> Game<S> {
    pub fn new(config: GameConfig, soundtrack: S) -> Self {
        let world = init_world(&config);
        log::info!(
            "new game: {}x{} screen, {} lives",
            config.screen_width,
            config.screen_height,
            world.lives
        );
        Game {
            config,
            world,
            soundtrack,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn soundtrack(&self) -> &S {
        &self.soundtrack
    }

    /// Run one frame.  Music pauses when the game ends and resumes after a
    /// restart.
    pub fn update(&mut self, input: &InputState, rng: &mut impl Rng) {
        let before = self.world.status;
        self.world = step(&self.world, input, &self.config, rng);
        match (before, self.world.status) {
            (GameStatus::Playing, GameStatus::GameOver) => self.soundtrack.pause(),
            (GameStatus::GameOver, GameStatus::Playing) => self.soundtrack.resume(),
            _ => {}
        }
    }
}
