//! Line-based input scripts.
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! week 2
//! tap add 0          # "+" on Monday
//! answer Goblet Squat
//! answer 4
//! tap 120 300        # raw device-pixel coordinates
//! drag 60 200 +196   # press, move in steps, release
//! wheel 120
//! cancel
//! ```
//!
//! Named targets (`tab N`, `add DAY`, `preset`, `custom`, `rename`, `top`)
//! are looked up in the current frame's hit regions.

use std::time::Duration;

use anyhow::{Context, anyhow, bail};

use gymplan_core::{InputEvent, PointerEvent, Vec2, Viewport};
use gymplan_ui::{ButtonAction, Hit, Planner};

/// Drag moves are split into this many pointer-move events.
const DRAG_STEPS: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    At(Vec2),
    Tab(usize),
    Add(usize),
    Button(ButtonAction),
    Rename,
    ScrollTop,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
    Tap(Target),
    Drag { from: Vec2, dy: f32 },
    Wheel(f32),
    /// Empty text is a valid (blank) answer.
    Answer(String),
    Cancel,
    Week(usize),
    Resize(Viewport),
}

pub fn parse(source: &str) -> anyhow::Result<Vec<Command>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(n, raw)| {
            let line = raw.split('#').next().unwrap_or("").trim();
            (!line.is_empty()).then(|| parse_line(line).with_context(|| format!("line {}: {raw}", n + 1)))
        })
        .collect()
}

fn parse_line(line: &str) -> anyhow::Result<Command> {
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();
    let cmd = match verb {
        "down" => Command::Down(point(&args)?),
        "move" => Command::Move(point(&args)?),
        "up" => Command::Up(point(&args)?),
        "tap" => Command::Tap(target(&args)?),
        "drag" => match args.as_slice() {
            [x, y, dy] => Command::Drag {
                from: Vec2 { x: num(x)?, y: num(y)? },
                dy: num(dy)?,
            },
            _ => bail!("expected `drag X Y DY`"),
        },
        "wheel" => match args.as_slice() {
            [dy] => Command::Wheel(num(dy)?),
            _ => bail!("expected `wheel DY`"),
        },
        "answer" => Command::Answer(rest.trim().to_string()),
        "cancel" => Command::Cancel,
        "week" => match args.as_slice() {
            [n] => Command::Week(index(n)?),
            _ => bail!("expected `week N`"),
        },
        "resize" => match args.as_slice() {
            [w, h] => Command::Resize(Viewport::new(num(w)?, num(h)?, 1.0)),
            [w, h, s] => Command::Resize(Viewport::new(num(w)?, num(h)?, num(s)?)),
            _ => bail!("expected `resize W H [SCALE]`"),
        },
        other => bail!("unknown command `{other}`"),
    };
    Ok(cmd)
}

fn num(s: &str) -> anyhow::Result<f32> {
    s.parse::<f32>().map_err(|_| anyhow!("`{s}` is not a number"))
}

fn index(s: &str) -> anyhow::Result<usize> {
    s.parse::<usize>().map_err(|_| anyhow!("`{s}` is not an index"))
}

fn point(args: &[&str]) -> anyhow::Result<Vec2> {
    match args {
        [x, y] => Ok(Vec2 { x: num(x)?, y: num(y)? }),
        _ => bail!("expected `X Y`"),
    }
}

fn target(args: &[&str]) -> anyhow::Result<Target> {
    Ok(match args {
        ["tab", n] => Target::Tab(index(n)?),
        ["add", day] => Target::Add(index(day)?),
        ["preset"] => Target::Button(ButtonAction::AddPreset),
        ["custom"] => Target::Button(ButtonAction::AddCustom),
        ["rename"] => Target::Rename,
        ["top"] => Target::ScrollTop,
        _ => Target::At(point(args)?),
    })
}

/// Replays `commands` against `planner`, letting image jobs settle after
/// each step so the final frame shows every thumbnail that could load.
pub fn replay(planner: &mut Planner, commands: &[Command], settle: Duration) -> anyhow::Result<()> {
    for (n, cmd) in commands.iter().enumerate() {
        log::debug!("step {}: {cmd:?}", n + 1);
        run(planner, cmd).with_context(|| format!("step {}: {cmd:?}", n + 1))?;
        planner.settle_images(settle);
    }
    Ok(())
}

fn run(planner: &mut Planner, cmd: &Command) -> anyhow::Result<()> {
    match cmd {
        Command::Down(p) => {
            planner.handle(PointerEvent::down(p.x, p.y).into());
        }
        Command::Move(p) => {
            planner.handle(PointerEvent::moved(p.x, p.y).into());
        }
        Command::Up(p) => {
            planner.handle(PointerEvent::up(p.x, p.y).into());
        }
        Command::Tap(t) => {
            let p = resolve(planner, t)?;
            planner.handle(PointerEvent::down(p.x, p.y).into());
            planner.handle(PointerEvent::up(p.x, p.y).into());
        }
        Command::Drag { from, dy } => {
            planner.handle(PointerEvent::down(from.x, from.y).into());
            for step in 1..=DRAG_STEPS {
                let y = from.y + dy * step as f32 / DRAG_STEPS as f32;
                planner.handle(PointerEvent::moved(from.x, y).into());
            }
            planner.handle(PointerEvent::up(from.x, from.y + dy).into());
        }
        Command::Wheel(dy) => {
            planner.handle(InputEvent::Wheel { delta_y: *dy });
        }
        Command::Answer(text) => {
            if !planner.has_dialog() {
                bail!("no dialog is waiting for an answer");
            }
            planner.answer(Some(text.clone()));
        }
        Command::Cancel => {
            if !planner.has_dialog() {
                log::warn!("cancel with no dialog open");
            }
            planner.answer(None);
        }
        Command::Week(n) => {
            planner.select_week(*n);
        }
        Command::Resize(v) => planner.resize(*v),
    }
    Ok(())
}

fn resolve(planner: &Planner, target: &Target) -> anyhow::Result<Vec2> {
    let want = match target {
        Target::At(p) => return Ok(*p),
        Target::Tab(n) => Hit::WeekTab(*n),
        Target::Add(day) => Hit::AddItem { day: *day },
        Target::Button(b) => Hit::Button(*b),
        Target::Rename => Hit::RenameWeek,
        Target::ScrollTop => Hit::ScrollTop,
    };
    planner
        .hits()
        .iter()
        .rev()
        .find(|r| r.payload == want)
        .map(|r| r.rect.center())
        .ok_or_else(|| anyhow!("{want:?} is not on screen"))
}
