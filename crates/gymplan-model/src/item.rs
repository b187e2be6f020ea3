use std::fmt;

use serde::{Deserialize, Serialize};

/// Set count as typed by the user: a number when it reads as one, free text
/// otherwise (`"AMRAP"`, `"3-4"`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SetCount {
    Count(f64),
    Text(String),
}

impl SetCount {
    /// A finite, non-zero number becomes `Count`; anything else is kept as text.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() && n != 0.0 => SetCount::Count(n),
            _ => SetCount::Text(raw.to_string()),
        }
    }

    /// Text shown in the edit prompt.
    pub fn as_input(&self) -> String {
        match self {
            SetCount::Count(n) => format_number(*n),
            SetCount::Text(s) => s.clone(),
        }
    }
}

impl Default for SetCount {
    fn default() -> Self {
        SetCount::Count(3.0)
    }
}

impl From<u32> for SetCount {
    fn from(n: u32) -> Self {
        SetCount::Count(n as f64)
    }
}

impl From<&str> for SetCount {
    fn from(s: &str) -> Self {
        SetCount::parse(s)
    }
}

/// Empty and zero values display as `0`.
impl fmt::Display for SetCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetCount::Count(n) if *n != 0.0 => f.write_str(&format_number(*n)),
            SetCount::Text(s) if !s.is_empty() => f.write_str(s),
            _ => f.write_str("0"),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Thumbnail source of an item. One variant at a time, so an item can never
/// point at a preset icon and a stored image simultaneously.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageRef {
    /// Symbolic icon key (`biceps`, `pullups`, ...).
    Preset(String),
    /// Key into [`Plan::images`](crate::Plan::images).
    Stored(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemWire", into = "ItemWire")]
pub struct Item {
    /// Empty until assigned; immutable afterwards.
    pub id: String,
    pub title: String,
    pub sets: SetCount,
    pub reps: String,
    pub weight: String,
    pub notes: String,
    pub image: Option<ImageRef>,
}

impl Item {
    pub fn new(title: impl Into<String>, sets: impl Into<SetCount>, reps: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            sets: sets.into(),
            reps: reps.into(),
            weight: String::new(),
            notes: String::new(),
            image: None,
        }
    }

    /// The blank exercise appended by a day's `+` button.
    pub fn blank() -> Self {
        Self::new("New Exercise", 3, "10")
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Exercise"
        } else {
            &self.title
        }
    }

    /// `"4 sets × 6–10  •  80kg  •  slow"`, with placeholders for blanks.
    pub fn meta_line(&self) -> String {
        let reps = if self.reps.is_empty() { "-" } else { &self.reps };
        let weight = if self.weight.is_empty() {
            "—"
        } else {
            &self.weight
        };
        format!("{} sets × {}  •  {}  •  {}", self.sets, reps, weight, self.notes)
    }

    pub fn preset_key(&self) -> Option<&str> {
        match &self.image {
            Some(ImageRef::Preset(k)) => Some(k),
            _ => None,
        }
    }

    pub fn store_id(&self) -> Option<&str> {
        match &self.image {
            Some(ImageRef::Stored(id)) => Some(id),
            _ => None,
        }
    }
}

/// Persisted shape: the two image fields live side by side, as in the
/// browser localStorage payload.
#[derive(Serialize, Deserialize)]
struct ItemWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default = "wire_default_sets")]
    sets: SetCount,
    #[serde(default)]
    reps: String,
    #[serde(default)]
    weight: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    img: Option<String>,
    #[serde(default, rename = "imgCustom")]
    img_custom: Option<String>,
}

fn wire_default_sets() -> SetCount {
    SetCount::Count(0.0)
}

impl From<ItemWire> for Item {
    fn from(w: ItemWire) -> Self {
        // A stored image takes precedence when a payload carries both.
        let image = match (w.img_custom, w.img) {
            (Some(id), _) if !id.is_empty() => Some(ImageRef::Stored(id)),
            (_, Some(key)) if !key.is_empty() => Some(ImageRef::Preset(key)),
            _ => None,
        };
        Item {
            id: w.id.unwrap_or_default(),
            title: w.title,
            sets: w.sets,
            reps: w.reps,
            weight: w.weight,
            notes: w.notes,
            image,
        }
    }
}

impl From<Item> for ItemWire {
    fn from(i: Item) -> Self {
        let (img, img_custom) = match i.image {
            Some(ImageRef::Preset(k)) => (Some(k), None),
            Some(ImageRef::Stored(id)) => (None, Some(id)),
            None => (None, None),
        };
        ItemWire {
            id: (!i.id.is_empty()).then_some(i.id),
            title: i.title,
            sets: i.sets,
            reps: i.reps,
            weight: i.weight,
            notes: i.notes,
            img,
            img_custom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_parse_keeps_freeform_text() {
        assert_eq!(SetCount::parse("4"), SetCount::Count(4.0));
        assert_eq!(SetCount::parse(" 2.5 "), SetCount::Count(2.5));
        assert_eq!(SetCount::parse("AMRAP"), SetCount::Text("AMRAP".into()));
        assert_eq!(SetCount::parse("0"), SetCount::Text("0".into()));
        assert_eq!(SetCount::parse(""), SetCount::Text(String::new()));
    }

    #[test]
    fn sets_display() {
        assert_eq!(SetCount::Count(4.0).to_string(), "4");
        assert_eq!(SetCount::Count(2.5).to_string(), "2.5");
        assert_eq!(SetCount::Text(String::new()).to_string(), "0");
        assert_eq!(SetCount::Text("AMRAP".into()).to_string(), "AMRAP");
    }

    #[test]
    fn meta_line_placeholders() {
        let item = Item::new("Row", 3, "");
        assert_eq!(item.meta_line(), "3 sets × -  •  —  •  ");
    }

    #[test]
    fn wire_prefers_custom_image() {
        let json = r#"{"title":"Curl","sets":3,"reps":"10","img":"biceps","imgCustom":"abc"}"#;
        let item: Item = serde_json::from_str(json).expect("parse");
        assert_eq!(item.image, Some(ImageRef::Stored("abc".into())));
        assert!(!item.has_id());
    }

    #[test]
    fn wire_keeps_numeric_and_text_sets() {
        let a: Item = serde_json::from_str(r#"{"title":"A","sets":4}"#).expect("parse");
        let b: Item = serde_json::from_str(r#"{"title":"B","sets":"AMRAP"}"#).expect("parse");
        assert_eq!(a.sets, SetCount::Count(4.0));
        assert_eq!(b.sets, SetCount::Text("AMRAP".into()));

        let out = serde_json::to_value(&a).expect("serialize");
        assert_eq!(out["sets"], serde_json::json!(4.0));
        assert_eq!(out["img"], serde_json::Value::Null);
    }
}
