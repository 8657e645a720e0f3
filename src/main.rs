mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use scroll_shooter::assets::load_background;
use scroll_shooter::audio::{open_soundtrack, Soundtrack};
use scroll_shooter::config::GameConfig;
use scroll_shooter::entities::InputState;
use scroll_shooter::game::Game;

use display::Renderer;

const CONFIG_ENV: &str = "SCROLL_SHOOTER_CONFIG";
const LOG_FILE: &str = "scroll_shooter.log";

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  Covers terminals that don't emit key-release events: the OS
/// key-repeat rate is ≥ 15 Hz, so ~133 ms is always refreshed before expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// Returns true if `key` was seen within the last `window` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64, window: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= window)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64, window: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame, window))
}

/// Sample the held keys into this frame's input snapshot.
fn sample_input(key_frame: &HashMap<KeyCode, u64>, frame: u64, window: u64) -> InputState {
    InputState {
        left: any_held(
            key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
            window,
        ),
        right: any_held(
            key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
            window,
        ),
        fire: is_held(key_frame, &KeyCode::Char(' '), frame, window),
        restart: any_held(key_frame, &[KeyCode::Char('r'), KeyCode::Char('R')], frame, window),
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Log to a file: stderr belongs to the alternate screen while we run.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("cannot create {}: {}, logging to stderr", LOG_FILE, e),
    }
    builder.init();
}

fn load_config() -> GameConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return GameConfig::default();
    };
    match GameConfig::load(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path);
            config
        }
        Err(e) => {
            warn!("Ignoring {}: {}; using defaults", path, e);
            GameConfig::default()
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh" and
/// hand the simulation one `InputState` snapshot.  This allows Space + A/D to
/// be held at the same time with no interference.
fn game_loop<W: Write, S: Soundtrack>(
    out: &mut W,
    game: &mut Game<S>,
    renderer: &mut Renderer,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let tick = Duration::from_millis(game.config().tick_millis);
    let window = (HOLD_WINDOW.as_millis() / tick.as_millis().max(1)).max(1) as u64;

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {}
                    }
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = sample_input(&key_frame, frame, window);
        game.update(&input, &mut rng);
        renderer.render(out, game.world(), game.config())?;

        let elapsed = frame_start.elapsed();
        if elapsed < tick {
            thread::sleep(tick - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();
    let config = load_config();

    // Assets are optional; either may be missing without affecting play.
    let background = load_background(config.background_image.as_deref());
    let soundtrack = open_soundtrack(config.music_track.as_deref());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut game = Game::new(config, soundtrack);
    let mut renderer = Renderer::new(background);
    let result = game_loop(&mut out, &mut game, &mut renderer, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("exiting with score {}", game.world().score);
    result
}
