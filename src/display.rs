/// Rendering layer — all terminal I/O lives here.
///
/// The world is simulated in pixels; this module scales it onto the
/// character grid.  Row 0 is the HUD, the last row holds the controls hint,
/// everything in between is the play field.  No game logic is performed.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use scroll_shooter::assets::{Background, Rgb};
use scroll_shooter::config::GameConfig;
use scroll_shooter::entities::{Entity, World};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::Rgb { r: 80, g: 200, b: 255 };
const C_BULLET: Color = Color::Rgb { r: 255, g: 240, b: 120 };
const C_ENEMY: Color = Color::Rgb { r: 255, g: 80, b: 120 };
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

// ── Scaling ───────────────────────────────────────────────────────────────────

/// Maps world pixels onto the play-field cells.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    cols: u16,
    rows: u16,
    /// First terminal row of the play field.
    top: u16,
    sx: f64,
    sy: f64,
}

impl Viewport {
    fn new(config: &GameConfig, width: u16, height: u16) -> Self {
        let rows = height.saturating_sub(2).max(1);
        Viewport {
            cols: width.max(1),
            rows,
            top: 1,
            sx: width.max(1) as f64 / config.screen_width,
            sy: rows as f64 / config.screen_height,
        }
    }

    /// Columns and rows covered by an entity, clipped to the play field.
    fn cells(&self, e: &Entity) -> Option<((u16, u16), (u16, u16))> {
        let cols = span(e.x, e.w, self.sx, self.cols)?;
        let rows = span(e.y, e.h, self.sy, self.rows)?;
        Some((cols, rows))
    }
}

/// Inclusive cell range covered by `[pos, pos + size)` at `scale`, or `None`
/// when it lies entirely outside `0..limit`.  Anything on screen covers at
/// least one cell.
fn span(pos: f64, size: f64, scale: f64, limit: u16) -> Option<(u16, u16)> {
    let start = (pos * scale).floor();
    let end = ((pos + size) * scale).ceil() - 1.0;
    let end = end.max(start);
    if end < 0.0 || start >= limit as f64 {
        return None;
    }
    let first = start.max(0.0) as u16;
    let last = end.min(limit as f64 - 1.0) as u16;
    Some((first, last))
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Owns the optional background and its cell-resolution cache.
pub struct Renderer {
    background: Option<Background>,
    cached: Option<((u16, u16), Vec<Vec<Rgb>>)>,
}

impl Renderer {
    pub fn new(background: Option<Background>) -> Self {
        Renderer {
            background,
            cached: None,
        }
    }

    /// Render one complete frame.
    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        world: &World,
        config: &GameConfig,
    ) -> std::io::Result<()> {
        let (width, height) = terminal::size()?;
        let view = Viewport::new(config, width, height);

        out.queue(style::ResetColor)?;
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.draw_background(out, world, &view)?;

        draw_rect(out, &view, &world.player, C_PLAYER)?;
        for bullet in world.bullets.iter().filter(|b| b.alive) {
            draw_rect(out, &view, bullet, C_BULLET)?;
        }
        for enemy in world.enemies.iter().filter(|e| e.alive) {
            draw_rect(out, &view, enemy, C_ENEMY)?;
        }

        draw_hud(out, world, width)?;
        draw_controls_hint(out, height)?;

        if world.is_game_over() {
            draw_game_over(out, world, &view)?;
        }

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
        out.flush()?;
        Ok(())
    }

    // ── Background ────────────────────────────────────────────────────────────

    /// Draw the picture shifted down by the scroll offset, wrapping the rows
    /// that fall off the bottom back to the top.  Dimmed while the game is over.
    fn draw_background<W: Write>(
        &mut self,
        out: &mut W,
        world: &World,
        view: &Viewport,
    ) -> std::io::Result<()> {
        let Some(bg) = &self.background else {
            return Ok(());
        };
        let key = (view.cols, view.rows);
        if self.cached.as_ref().map(|(k, _)| *k) != Some(key) {
            self.cached = Some((key, bg.cells(view.cols, view.rows)));
        }
        let Some((_, grid)) = &self.cached else {
            return Ok(());
        };

        let rows = view.rows as i64;
        let offset = (world.bg_scroll_y * view.sy).round() as i64;
        let dim = world.is_game_over();

        for row in 0..view.rows {
            let src = (row as i64 - offset).rem_euclid(rows) as usize;
            let Some(line) = grid.get(src) else {
                continue;
            };
            out.queue(cursor::MoveTo(0, view.top + row))?;
            // Batch runs of equal colour into one Print.
            let mut run: Option<(Rgb, usize)> = None;
            for &rgb in line {
                match run {
                    Some((c, n)) if c == rgb => run = Some((c, n + 1)),
                    _ => {
                        if let Some((c, n)) = run {
                            paint_run(out, c, n, dim)?;
                        }
                        run = Some((rgb, 1));
                    }
                }
            }
            if let Some((c, n)) = run {
                paint_run(out, c, n, dim)?;
            }
        }
        out.queue(style::ResetColor)?;
        Ok(())
    }
}

fn paint_run<W: Write>(out: &mut W, rgb: Rgb, n: usize, dim: bool) -> std::io::Result<()> {
    let [r, g, b] = if dim { rgb.map(|c| c / 3) } else { rgb };
    out.queue(style::SetBackgroundColor(Color::Rgb { r, g, b }))?;
    out.queue(Print(" ".repeat(n)))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_rect<W: Write>(
    out: &mut W,
    view: &Viewport,
    entity: &Entity,
    color: Color,
) -> std::io::Result<()> {
    let Some(((c0, c1), (r0, r1))) = view.cells(entity) else {
        return Ok(());
    };
    let fill = "█".repeat((c1 - c0 + 1) as usize);
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, view.top + row))?;
        out.queue(Print(&fill))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &World, width: u16) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", world.score)))?;

    let lives_str = format!("Lives:{}", "♥".repeat(world.lives.max(0) as usize));
    let rx = width.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   R : Restart   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, world: &World, view: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", world.score);
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        ("Press R to restart", Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = view.top + (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    out.queue(style::ResetColor)?;
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_covers_at_least_one_cell() {
        // A 4px bullet on a 480px wide world squeezed into 80 columns.
        assert_eq!(span(96.0, 4.0, 80.0 / 480.0, 80), Some((16, 16)));
    }

    #[test]
    fn span_clips_to_field() {
        assert_eq!(span(-18.0, 28.0, 0.5, 40), Some((0, 4)));
        assert_eq!(span(470.0, 28.0, 0.1, 48), Some((47, 47)));
    }

    #[test]
    fn span_off_screen_is_none() {
        assert_eq!(span(-20.0, 10.0, 1.0, 40), None);
        assert_eq!(span(700.0, 18.0, 0.05, 30), None);
    }
}
