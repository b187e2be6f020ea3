use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::IdGen;
use crate::item::{ImageRef, Item};

/// Number of week tabs in a plan.
pub const MAX_WEEKS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Day {
    #[serde(rename = "day")]
    pub label: Weekday,
    pub items: Vec<Item>,
}

impl Day {
    pub fn new(label: Weekday) -> Self {
        Self {
            label,
            items: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "WeekWire")]
pub struct Week {
    pub name: String,
    pub days: Vec<Day>,
}

#[derive(Deserialize)]
struct WeekWire {
    #[serde(default)]
    name: String,
    #[serde(default)]
    days: Vec<DayWire>,
}

#[derive(Deserialize)]
struct DayWire {
    #[serde(default)]
    day: String,
    #[serde(default)]
    items: Vec<Item>,
}

/// Days are re-slotted by label into Mon..Sun; unknown labels are dropped.
impl From<WeekWire> for Week {
    fn from(w: WeekWire) -> Self {
        let mut days: Vec<Day> = Weekday::ALL.into_iter().map(Day::new).collect();
        for day in w.days {
            match Weekday::from_label(&day.day) {
                Some(label) => days[label.index()].items.extend(day.items),
                None => log::warn!(
                    "dropping day '{}' ({} items) from week '{}'",
                    day.day,
                    day.items.len(),
                    w.name
                ),
            }
        }
        Week { name: w.name, days }
    }
}

impl Week {
    /// `"Week {index + 1}"` with seven empty days.
    pub fn new(index: usize) -> Self {
        Self {
            name: format!("Week {}", index + 1),
            days: Weekday::ALL.into_iter().map(Day::new).collect(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.days.iter().map(|d| d.items.len()).sum()
    }
}

/// Where an item lives inside a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemLocation {
    pub week: usize,
    pub day: usize,
    pub index: usize,
}

/// Root of the persisted state.
///
/// Completion entries and stored images are keyed by item id / store id and
/// are left in place when the item they belonged to goes away.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub weeks: Vec<Week>,
    /// Item id -> completed.
    #[serde(default, rename = "progress")]
    pub completion: BTreeMap<String, bool>,
    /// Store id -> data URL.
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

impl Default for Plan {
    fn default() -> Self {
        Self::new_default()
    }
}

impl Plan {
    pub fn new_default() -> Self {
        Self {
            weeks: (0..MAX_WEEKS).map(Week::new).collect(),
            completion: BTreeMap::new(),
            images: BTreeMap::new(),
        }
    }

    /// Brings a loaded plan back in line with the structural invariants:
    /// `MAX_WEEKS` named weeks and unique ids. Day slots are already fixed
    /// while deserializing.
    /// Returns `true` if anything changed.
    pub fn repair(&mut self) -> bool {
        let mut changed = false;

        if self.weeks.len() > MAX_WEEKS {
            log::warn!("plan has {} weeks; truncating to {MAX_WEEKS}", self.weeks.len());
            self.weeks.truncate(MAX_WEEKS);
            changed = true;
        }
        while self.weeks.len() < MAX_WEEKS {
            self.weeks.push(Week::new(self.weeks.len()));
            changed = true;
        }

        for (i, week) in self.weeks.iter_mut().enumerate() {
            if week.name.is_empty() {
                week.name = Week::new(i).name;
                changed = true;
            }
        }

        let mut seen = HashSet::new();
        for item in self.items_mut() {
            if item.has_id() && !seen.insert(item.id.clone()) {
                log::warn!("duplicate item id '{}'; reassigning", item.id);
                item.id.clear();
                changed = true;
            }
        }

        changed
    }

    /// Gives every item without an id a fresh one. Returns how many were assigned.
    pub fn ensure_ids(&mut self, ids: &mut IdGen) -> usize {
        let mut taken: HashSet<String> = self.items().filter(|i| i.has_id()).map(|i| i.id.clone()).collect();
        let mut assigned = 0;
        for item in self.items_mut() {
            if !item.has_id() {
                let id = ids.next_unique(&taken);
                taken.insert(id.clone());
                item.id = id;
                assigned += 1;
            }
        }
        assigned
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .flat_map(|d| d.items.iter())
    }

    fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.weeks
            .iter_mut()
            .flat_map(|w| w.days.iter_mut())
            .flat_map(|d| d.items.iter_mut())
    }

    pub fn week(&self, week: usize) -> Option<&Week> {
        self.weeks.get(week)
    }

    pub fn day(&self, week: usize, day: usize) -> Option<&Day> {
        self.weeks.get(week)?.days.get(day)
    }

    pub fn day_mut(&mut self, week: usize, day: usize) -> Option<&mut Day> {
        self.weeks.get_mut(week)?.days.get_mut(day)
    }

    pub fn locate(&self, id: &str) -> Option<ItemLocation> {
        if id.is_empty() {
            return None;
        }
        for (w, week) in self.weeks.iter().enumerate() {
            for (d, day) in week.days.iter().enumerate() {
                if let Some(i) = day.items.iter().position(|it| it.id == id) {
                    return Some(ItemLocation {
                        week: w,
                        day: d,
                        index: i,
                    });
                }
            }
        }
        None
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        let loc = self.locate(id)?;
        self.weeks[loc.week].days[loc.day].items.get(loc.index)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        let loc = self.locate(id)?;
        self.weeks[loc.week].days[loc.day].items.get_mut(loc.index)
    }

    /// Appends `item` to a day, assigning an id if it has none. Returns the id,
    /// or `None` when the week/day does not exist.
    pub fn push_item(&mut self, week: usize, day: usize, mut item: Item, ids: &mut IdGen) -> Option<String> {
        self.day(week, day)?;
        if !item.has_id() || self.locate(&item.id).is_some() {
            let taken: HashSet<String> = self.items().map(|i| i.id.clone()).collect();
            item.id = ids.next_unique(&taken);
        }
        let id = item.id.clone();
        self.day_mut(week, day)?.items.push(item);
        Some(id)
    }

    /// Removes an item. Its completion entry and stored image stay behind.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        let loc = self.locate(id)?;
        Some(self.weeks[loc.week].days[loc.day].items.remove(loc.index))
    }

    /// Moves the item at `from` to `to` within one day. `to` is clamped to the
    /// list; returns `true` if the order changed.
    pub fn reorder_items(&mut self, week: usize, day: usize, from: usize, to: usize) -> bool {
        let Some(day) = self.day_mut(week, day) else {
            return false;
        };
        let len = day.items.len();
        if from >= len {
            return false;
        }
        let to = to.min(len - 1);
        if to == from {
            return false;
        }
        let item = day.items.remove(from);
        day.items.insert(to, item);
        true
    }

    /// Flips completion for `id`, creating the entry on first use. Returns the
    /// new state.
    pub fn toggle_completion(&mut self, id: &str) -> bool {
        let entry = self.completion.entry(id.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completion.get(id).copied().unwrap_or(false)
    }

    /// Replaces (or clears) an item's image reference. The previously stored
    /// blob, if any, is not removed from `images`.
    pub fn set_image(&mut self, id: &str, image: Option<ImageRef>) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.image = image;
                true
            }
            None => false,
        }
    }

    /// Inserts a blob into the image store and points the item at it.
    /// Returns the new store id, or `None` if the item no longer exists.
    pub fn attach_stored_image(&mut self, id: &str, data_url: String, ids: &mut IdGen) -> Option<String> {
        self.locate(id)?;
        let taken: HashSet<String> = self.images.keys().cloned().collect();
        let store_id = ids.next_unique(&taken);
        self.images.insert(store_id.clone(), data_url);
        self.set_image(id, Some(ImageRef::Stored(store_id.clone())));
        Some(store_id)
    }

    pub fn image_blob(&self, store_id: &str) -> Option<&str> {
        self.images.get(store_id).map(String::as_str)
    }
}
