use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SpecimenRecord {
    pub display_name: String,
    pub bone_name: Option<String>,
    pub viewer_id: String,
}

impl SpecimenRecord {
    pub fn new(display_name: &str, bone_name: Option<&str>, viewer_id: &str) -> Self {
        Self {
            display_name: display_name.trim().to_string(),
            bone_name: bone_name
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            viewer_id: viewer_id.trim().to_string(),
        }
    }

    pub fn bone_label(&self) -> &str {
        self.bone_name.as_deref().unwrap_or_default()
    }

    pub fn title(&self) -> String {
        title_case(&self.display_name)
    }
}

// (name, file) pairs of the built-in collection; viewer ids are "{name}-{file}".
pub const STATIC_SPECIMENS: &[(&str, &str)] = &[
    ("alligator", "skull"),
    ("alpaca", "cranium"),
    ("bear", "skull"),
    ("beaver", "w21-skull"),
    ("cat", "cranium"),
    ("caribou", "cranium"),
    ("coyote", "cranium"),
    ("deer", "cranium"),
];

pub fn static_specimens() -> Vec<SpecimenRecord> {
    STATIC_SPECIMENS
        .iter()
        .map(|(name, file)| SpecimenRecord::new(name, Some(file), &format!("{name}-{file}")))
        .collect()
}

fn viewer_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").ok())
        .as_ref()
}

/// Viewer ids end up in iframe URL paths, so only path-safe ids are accepted.
pub fn is_valid_viewer_id(id: &str) -> bool {
    viewer_id_pattern().is_some_and(|re| re.is_match(id))
}

/// Upper-cases the first character and leaves the rest untouched.
pub fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "deer-cranium" -> "Deer Cranium", "beaver-w21-skull.html" -> "Beaver W21 Skull".
pub fn model_title(viewer_id: &str) -> String {
    viewer_id
        .trim_end_matches(".html")
        .split('-')
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}
