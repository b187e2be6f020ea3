//! Text-entry dialogs as request/response flows.
//!
//! A flow asks one [`Prompt`] at a time and collects the answers. Nothing is
//! applied until the last answer is in: the flow then yields an [`Effect`]
//! the planner applies in one step. Cancelling (or leaving a required answer
//! empty) at any point aborts with no mutation.
//!
//! Hosts answer either asynchronously (`Planner::prompt` / `Planner::answer`)
//! or through a blocking [`Dialog`] implementation.

use std::collections::VecDeque;
use std::path::PathBuf;

use gymplan_model::{ImageRef, Item, PRESETS, Plan, SetCount, Weekday, preset};

use crate::images::ImageSource;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub message: String,
    /// Prefilled answer; empty for none.
    pub default: String,
}

impl Prompt {
    fn new(message: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: default.into(),
        }
    }
}

/// Blocking answer source. `None` cancels.
pub trait Dialog {
    fn ask(&mut self, prompt: &Prompt) -> Option<String>;
}

impl<F> Dialog for F
where
    F: FnMut(&Prompt) -> Option<String>,
{
    fn ask(&mut self, prompt: &Prompt) -> Option<String> {
        self(prompt)
    }
}

/// Replays queued answers; cancels once they run out.
#[derive(Clone, Debug, Default)]
pub struct Scripted {
    answers: VecDeque<Option<String>>,
    asked: Vec<Prompt>,
}

impl Scripted {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            asked: Vec::new(),
        }
    }

    /// Every prompt seen so far, in order.
    pub fn asked(&self) -> &[Prompt] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Dialog for Scripted {
    fn ask(&mut self, prompt: &Prompt) -> Option<String> {
        self.asked.push(prompt.clone());
        self.answers.pop_front().flatten()
    }
}

/// Which conversation is running. Items are addressed by id so an answer can
/// never land on a different row than the one that opened the dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowKind {
    RenameWeek { week: usize },
    EditItem { id: String },
    AddCustom { week: usize },
    PresetPicker { week: usize },
    ImageMenu { id: String },
    ItemMenu { id: String },
}

/// Mutation produced by a completed flow.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    RenameWeek {
        week: usize,
        name: String,
    },
    UpdateItem {
        id: String,
        title: String,
        sets: SetCount,
        reps: String,
        weight: String,
        notes: String,
    },
    AddItem {
        week: usize,
        day: usize,
        item: Item,
    },
    AddPreset {
        week: usize,
        day: usize,
        preset: usize,
    },
    SetImage {
        id: String,
        image: Option<ImageRef>,
    },
    AcquireImage {
        id: String,
        source: ImageSource,
    },
    DeleteItem {
        id: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Ask(Prompt),
    Apply(Effect),
    /// Continue with a different flow; nothing has been applied.
    Switch(FlowKind),
    Abort,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogFlow {
    pub kind: FlowKind,
    answers: Vec<String>,
}

const IMAGE_MENU: &str = "Image:\n1) Built-in icon (biceps/pullups/dumbbells/legs)\n2) Use image URL\n3) Load from file\n4) Clear image\n\nType 1, 2, 3, or 4:";
const ITEM_MENU: &str = "Exercise:\n1) Change image\n2) Delete\n\nType 1 or 2:";

impl DialogFlow {
    pub fn new(kind: FlowKind) -> Self {
        Self {
            kind,
            answers: Vec::new(),
        }
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Records an answer; `None` cancels the flow.
    pub fn answer(&mut self, answer: Option<String>) -> Option<()> {
        self.answers.push(answer?);
        Some(())
    }

    /// What happens next given the answers so far. Defaults are read from
    /// `plan` at the time of asking.
    pub fn step(&self, plan: &Plan) -> Step {
        let a = &self.answers;
        match &self.kind {
            FlowKind::RenameWeek { week } => {
                let Some(w) = plan.week(*week) else {
                    return Step::Abort;
                };
                match a.first() {
                    None => Step::Ask(Prompt::new("Rename week to:", w.name.clone())),
                    Some(name) if name.is_empty() => Step::Abort,
                    Some(name) => Step::Apply(Effect::RenameWeek {
                        week: *week,
                        name: name.clone(),
                    }),
                }
            }

            FlowKind::EditItem { id } => {
                let Some(item) = plan.item(id) else {
                    return Step::Abort;
                };
                match a.len() {
                    0 => Step::Ask(Prompt::new("Exercise name:", item.title.clone())),
                    1 => Step::Ask(Prompt::new("Sets:", item.sets.as_input())),
                    2 => Step::Ask(Prompt::new("Reps:", item.reps.clone())),
                    3 => Step::Ask(Prompt::new("Weight (optional):", item.weight.clone())),
                    4 => Step::Ask(Prompt::new("Notes (optional):", item.notes.clone())),
                    _ => Step::Apply(Effect::UpdateItem {
                        id: id.clone(),
                        title: a[0].clone(),
                        sets: SetCount::parse(&a[1]),
                        reps: a[2].clone(),
                        weight: a[3].clone(),
                        notes: a[4].clone(),
                    }),
                }
            }

            FlowKind::AddCustom { week } => match a.len() {
                0 => Step::Ask(Prompt::new("Add to which day? 1=Mon .. 7=Sun", "1")),
                1 if a[0].is_empty() => Step::Abort,
                1 => Step::Ask(Prompt::new("Exercise name:", "New Exercise")),
                2 if a[1].is_empty() => Step::Abort,
                2 => Step::Ask(Prompt::new("Sets:", "3")),
                3 => Step::Ask(Prompt::new("Reps:", "10")),
                _ => {
                    let day = parse_int(&a[0]).map_or(0, |n| (n.clamp(1, 7) - 1) as usize);
                    Step::Apply(Effect::AddItem {
                        week: *week,
                        day,
                        item: Item::new(a[1].clone(), SetCount::parse(&a[2]), a[3].clone()),
                    })
                }
            },

            FlowKind::PresetPicker { week } => match a.first() {
                None => Step::Ask(Prompt::new(preset_picker_message(), "")),
                Some(s) if s.is_empty() => Step::Abort,
                Some(s) => {
                    let (day, preset) = parse_preset_choice(s);
                    Step::Apply(Effect::AddPreset {
                        week: *week,
                        day,
                        preset,
                    })
                }
            },

            FlowKind::ImageMenu { id } => {
                let Some(item) = plan.item(id) else {
                    return Step::Abort;
                };
                let Some(choice) = a.first() else {
                    return Step::Ask(Prompt::new(IMAGE_MENU, ""));
                };
                let value = a.get(1);
                match (choice.trim(), value) {
                    ("1", None) => Step::Ask(Prompt::new(
                        "Type one: biceps, pullups, dumbbells, legs",
                        item.preset_key().unwrap_or("dumbbells"),
                    )),
                    ("2", None) => Step::Ask(Prompt::new("Paste image URL:", "")),
                    ("3", None) => Step::Ask(Prompt::new("Image file path:", "")),
                    ("4", _) => Step::Apply(Effect::SetImage {
                        id: id.clone(),
                        image: None,
                    }),
                    (_, Some(v)) if v.trim().is_empty() => Step::Abort,
                    ("1", Some(key)) => Step::Apply(Effect::SetImage {
                        id: id.clone(),
                        image: Some(ImageRef::Preset(key.trim().to_string())),
                    }),
                    ("2", Some(url)) => Step::Apply(Effect::AcquireImage {
                        id: id.clone(),
                        source: ImageSource::Url(url.trim().to_string()),
                    }),
                    ("3", Some(path)) => Step::Apply(Effect::AcquireImage {
                        id: id.clone(),
                        source: ImageSource::File(PathBuf::from(path.trim())),
                    }),
                    _ => Step::Abort,
                }
            }

            FlowKind::ItemMenu { id } => {
                if plan.item(id).is_none() {
                    return Step::Abort;
                }
                match a.first().map(|s| s.trim()) {
                    None => Step::Ask(Prompt::new(ITEM_MENU, "")),
                    Some("1") => Step::Switch(FlowKind::ImageMenu { id: id.clone() }),
                    Some("2") => Step::Apply(Effect::DeleteItem { id: id.clone() }),
                    Some(_) => Step::Abort,
                }
            }
        }
    }
}

fn preset_picker_message() -> String {
    format!(
        "Pick a preset to add to a day (type day number then preset number):\n\nDays: 1=Mon .. 7=Sun\n{}\n\nExample: \"1 2\" to add {} to {}",
        preset::menu_lines(),
        PRESETS.get(1).map_or("a preset", |p| p.name),
        Weekday::Mon.label(),
    )
}

/// Leading integer of `s`, the way a lenient number field reads it
/// (`"3x"` is 3, `"x3"` is nothing).
fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

/// `"<day> <preset>"`, both 1-based; missing or unreadable numbers mean 1,
/// out-of-range ones are clamped.
pub fn parse_preset_choice(s: &str) -> (usize, usize) {
    let mut tokens = s.split_whitespace();
    let mut pick = |max: usize| {
        let n = tokens.next().and_then(parse_int).unwrap_or(1);
        (n.clamp(1, max as i64) - 1) as usize
    };
    let day = pick(7);
    let preset = pick(PRESETS.len());
    (day, preset)
}
