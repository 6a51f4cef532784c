// SPDX-License-Identifier: MIT
//
// tcanvas: demo of the canvas engine.
//
// Runs an unattended animation for a fixed number of frames:
//
//   ┌──────────────────────────────────────────┐
//   │  ()→        ####                        │  ball bounces off the walls,
//   │           pulsing block                 │  the divider and the block
//   ├──────────────────────────────────────────┤
//   │   _____________________                  │
//   │  |   >==o                |               │  fish sweeps inside the tank
//   │  *-----------------------*               │
//   └──────────────────────────────────────────┘
//
// Usage: tcanvas [frames]    (default 600)
//
// Logs go to the file named by TCANVAS_LOG, since stdout is the canvas.

use std::env;
use std::fs::File;
use std::process;
use std::sync::Mutex;

use tcanvas_figure::{Axis, Block, Colors, Figure, Group, Point, join};
use tcanvas_term::script::{self, ScriptOptions};
use tcanvas_term::terminal::Terminal;
use tcanvas_term::timing::{self, DelayMode};
use tcanvas_term::{Coord, Direction, Error, Restore, Result, Screen, ScreenConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FRAMES: u32 = 600;
const FRAME_MS: u64 = 30;
const TANK_H: i32 = 8;
const PULSE_MAX: i32 = 12;

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install a file subscriber when `TCANVAS_LOG` names a file.
fn init_tracing() {
    let Some(path) = env::var_os("TCANVAS_LOG") else {
        return;
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("tcanvas: cannot open log file {}: {e}", path.to_string_lossy());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

// ─── Scene ──────────────────────────────────────────────────────────────────

/// Fixed layout derived from the screen bounds.
struct Layout {
    width: i32,
    height: i32,
    divider: i32,
    tank_top: i32,
    tank_left: i32,
    tank_width: i32,
}

impl Layout {
    fn new(width: i32, height: i32) -> Self {
        let tank_top = height - TANK_H;
        Self {
            width,
            height,
            divider: tank_top - 1,
            tank_top,
            tank_left: 4,
            tank_width: (width - 8).min(60),
        }
    }

    const fn tank_right(&self) -> i32 {
        self.tank_left + self.tank_width - 1
    }
}

/// Walls around the screen and the divider above the tank.
fn draw_walls(screen: &mut Screen, l: &Layout) -> Result<()> {
    screen.set_color(Some("SKY"), None)?;
    join(screen, Coord::new(1, 1), Coord::new(1, l.width), '#')?;
    join(screen, Coord::new(l.height, 1), Coord::new(l.height, l.width), '#')?;
    join(screen, Coord::new(1, 1), Coord::new(l.height, 1), '#')?;
    join(screen, Coord::new(1, l.width), Coord::new(l.height, l.width), '#')?;
    join(screen, Coord::new(l.divider, 2), Coord::new(l.divider, l.width - 1), '-')
}

/// The tank outline, drawn with an escape script.
fn draw_tank(screen: &mut Screen, l: &Layout) -> Result<()> {
    let (w, inner) = (l.tank_width, l.tank_width - 2);
    let mut src = format!("({};{}) OCHRE ' ' '_'_{inner} ' '", l.tank_top, l.tank_left);
    for _ in 0..TANK_H - 3 {
        src.push_str(&format!(" d l{w} '|' ' '_{inner} '|'"));
    }
    src.push_str(&format!(" d l{w} '*' '-'_{inner} '*' -"));
    script::draw(screen, &src, ScriptOptions::default())
}

fn spawn_fish(screen: &mut Screen, l: &Layout) -> Result<Group> {
    let row = l.tank_top + 3;
    let col = l.tank_left + 2;
    let colors = Colors::fg("YELLOW");
    let tail = Point::new(screen, Coord::new(row, col), colors, '>')?;
    let body = Block::new(screen, "=", 2, Some(1), Coord::new(row, col + 1), colors)?;
    let head = Point::new(screen, Coord::new(row, col + 3), Colors::fg("PINK"), 'o')?;
    let members: Vec<Box<dyn Figure>> = vec![Box::new(tail), Box::new(body), Box::new(head)];
    Ok(Group::new(members, Some(0)))
}

/// Reverse `v` on each axis where `ball` is about to leave its box.
fn bounce_off_walls(ball: &mut Block, v: &mut Coord, l: &Layout) {
    let hits = [
        (Coord::new(1, 1), Axis::Horizontal, Direction::DOWN),
        (Coord::new(l.divider, 1), Axis::Horizontal, Direction::UP),
        (Coord::new(1, 1), Axis::Vertical, Direction::RIGHT),
        (Coord::new(1, l.width), Axis::Vertical, Direction::LEFT),
    ];
    for (wall, axis, side) in hits {
        if ball.collides_with_point(wall, axis, 1) != side {
            continue;
        }
        if side == Direction::DOWN {
            v.row = v.row.abs();
        } else if side == Direction::UP {
            v.row = -v.row.abs();
        } else if side == Direction::RIGHT {
            v.col = v.col.abs();
        } else {
            v.col = -v.col.abs();
        }
    }
}

fn run(frames: u32) -> Result<()> {
    let mut term = Terminal::new();
    let size = term.size();
    let config = ScreenConfig::default()
        .with_delay_mode(DelayMode::Hybrid {
            spin_below: timing::millis(1),
        });
    if !size.fits(&config) {
        warn!(cols = size.cols, rows = size.rows, "terminal smaller than the default canvas");
    }
    let width = config.width.min(i32::from(size.cols));
    let height = config.height.min(i32::from(size.rows));
    if width < 40 || height < 20 {
        return Err(Error::InvalidResize { width, height });
    }
    let config = config.with_size(width, height);
    let layout = Layout::new(width, height);

    term.enter()?;
    let mut screen = Screen::new(config);
    screen.paint("CONSOLE")?;
    draw_walls(&mut screen, &layout)?;
    draw_tank(&mut screen, &layout)?;

    let mut ball = Block::new(&mut screen, "()", 2, Some(1), Coord::new(3, 5), Colors::fg("RED"))?;
    let mut pulser = Block::new(
        &mut screen,
        "+-",
        1,
        Some(2),
        Coord::new(layout.divider / 2, width / 2),
        Colors::fg("LAVENDER"),
    )?;
    let mut fish = spawn_fish(&mut screen, &layout)?;

    let mut v = Coord::new(1, 1);
    let mut pulse = 1;
    let mut swim = 1;
    info!(frames, width, height, "demo started");

    for frame in 0..frames {
        bounce_off_walls(&mut ball, &mut v, &layout);
        let hit = ball.collides_with(&mut pulser, 1);
        if hit.intersects(Direction::UP | Direction::DOWN) {
            v.row = -v.row;
        }
        if hit.intersects(Direction::LEFT | Direction::RIGHT) {
            v.col = -v.col;
        }

        let row = fish.position().row;
        let left = fish.collides_with_point(Coord::new(row, layout.tank_left), Axis::Both, 1);
        let right = fish.collides_with_point(Coord::new(row, layout.tank_right()), Axis::Both, 1);
        if (swim < 0 && left.contains(Direction::RIGHT)) || (swim > 0 && right.contains(Direction::LEFT)) {
            swim = -swim;
        }

        screen.preserve(Restore::DEFAULT, |s| {
            ball.move_by(s, v, Restore::empty())?;
            fish.move_by(s, Coord::new(0, swim), Restore::empty())?;
            if frame % 4 == 0 {
                if pulser.width() >= PULSE_MAX && pulse > 0 {
                    pulse = -pulse;
                }
                match pulser.reframe(s, Coord::new(0, pulse), Restore::empty()) {
                    Err(Error::InvalidResize { .. }) => pulse = -pulse,
                    other => other?,
                }
            }
            Ok(())
        })?;
        screen.pause(timing::millis(FRAME_MS))?;
    }

    Box::new(ball).erase(&mut screen, Restore::COORD)?;
    Box::new(fish).erase(&mut screen, Restore::COORD)?;
    screen.reset_attributes()?;
    screen.flush()?;
    info!("demo finished");
    Ok(())
}

fn main() {
    init_tracing();

    let frames = match env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            eprintln!("tcanvas: frame count must be a number, got {arg:?}");
            process::exit(2);
        }),
        None => DEFAULT_FRAMES,
    };

    if let Err(e) = run(frames) {
        eprintln!("tcanvas: {e}");
        process::exit(1);
    }
}
