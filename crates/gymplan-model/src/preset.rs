//! Built-in workout presets.

use crate::item::{ImageRef, Item, SetCount};

/// Icon keys that have a procedural thumbnail.
pub const ICON_KEYS: [&str; 4] = ["biceps", "pullups", "dumbbells", "legs"];

#[derive(Clone, Copy, Debug)]
pub struct PresetItem {
    pub title: &'static str,
    pub sets: u32,
    pub reps: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub name: &'static str,
    pub icon: &'static str,
    pub notes: &'static str,
    pub items: &'static [PresetItem],
}

impl Preset {
    /// Fresh items (no ids yet) carrying the preset's icon.
    pub fn instantiate(&self) -> Vec<Item> {
        self.items
            .iter()
            .map(|p| Item {
                id: String::new(),
                title: p.title.to_string(),
                sets: SetCount::from(p.sets),
                reps: p.reps.to_string(),
                weight: String::new(),
                notes: String::new(),
                image: Some(ImageRef::Preset(self.icon.to_string())),
            })
            .collect()
    }
}

const fn item(title: &'static str, sets: u32, reps: &'static str) -> PresetItem {
    PresetItem { title, sets, reps }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Push A",
        icon: "biceps",
        notes: "Chest/Triceps/Shoulders",
        items: &[
            item("Bench Press", 4, "6–10"),
            item("Incline DB Press", 3, "8–12"),
            item("Tricep Dips", 3, "AMRAP"),
        ],
    },
    Preset {
        name: "Pull A",
        icon: "pullups",
        notes: "Back/Biceps",
        items: &[
            item("Pull-Ups", 4, "6–10"),
            item("Barbell Row", 3, "8–12"),
            item("Face Pulls", 3, "12–15"),
        ],
    },
    Preset {
        name: "Legs A",
        icon: "legs",
        notes: "Quads/Hams/Glutes",
        items: &[
            item("Back Squat", 4, "5–8"),
            item("RDL", 3, "6–10"),
            item("Walking Lunges", 3, "10/leg"),
        ],
    },
    Preset {
        name: "Dumbbell Full",
        icon: "dumbbells",
        notes: "DB full body",
        items: &[
            item("DB Shoulder Press", 3, "8–12"),
            item("DB Row", 3, "8–12"),
            item("Goblet Squat", 3, "10–15"),
        ],
    },
];

/// `"1) Push A — Chest/Triceps/Shoulders"`, one line per preset.
pub fn menu_lines() -> String {
    PRESETS
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}) {} — {}", i + 1, p.name, p.notes))
        .collect::<Vec<_>>()
        .join("\n")
}
