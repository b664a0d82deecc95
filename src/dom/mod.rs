use std::str::FromStr;

use thiserror::Error;

use crate::source::GroupKind;

pub mod id {
    pub const CONTENT_AREA: &str = "content-area";
    pub const SPECIMEN_SEARCH: &str = "specimen-search";
    pub const SPECIMENS_GRID: &str = "specimens-grid";
    pub const HOME_LINK: &str = "home-link";
    pub const LAB_LINK: &str = "lab-link";
    pub const SCANS_LINK: &str = "scans-link";
    pub const ANIMAL_SEARCH_LINK: &str = "animal-search-link";
    pub const BONE_SEARCH_LINK: &str = "bone-search-link";
    pub const ANIMAL_DROPDOWN: &str = "animal-dropdown";
    pub const BONE_DROPDOWN: &str = "bone-dropdown";
}

pub mod class {
    pub const SCAN_BUTTON: &str = "scan-button";
    pub const SUBMENU_ITEM: &str = "submenu-item";
    pub const ANIMAL_ITEM: &str = "animal-item";
    pub const BONE_ITEM: &str = "bone-item";
    pub const DROPDOWN_SUBMENU: &str = "dropdown-submenu";
    pub const BACK_BUTTON: &str = "back-button";
    pub const SCAN_VIEWER_SECTION: &str = "scan-viewer-section";
    pub const ACTIVE: &str = "active";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClickPart {
    #[default]
    Text,
    Icon,
}

/// What the host knows about a clicked element: its hooks plus where it sits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickTarget {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub model: Option<String>,
    pub key: Option<String>,
    pub part: ClickPart,
    pub in_dropdown: bool,
    pub in_model_viewer: bool,
}

impl ClickTarget {
    pub fn element(element_id: &str) -> Self {
        Self {
            id: Some(element_id.to_string()),
            in_dropdown: matches!(
                element_id,
                id::SCANS_LINK | id::ANIMAL_SEARCH_LINK | id::BONE_SEARCH_LINK
            ),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, name: &str) -> Self {
        self.classes.push(name.to_string());
        self
    }

    pub fn scan_button(viewer_id: &str) -> Self {
        Self {
            model: Some(viewer_id.to_string()),
            ..Default::default()
        }
        .with_class(class::SCAN_BUTTON)
    }

    pub fn submenu_item(viewer_id: &str) -> Self {
        Self {
            model: Some(viewer_id.to_string()),
            in_dropdown: true,
            ..Default::default()
        }
        .with_class(class::SUBMENU_ITEM)
    }

    pub fn group_item(kind: GroupKind, key: &str, part: ClickPart) -> Self {
        let hook = match kind {
            GroupKind::Animal => class::ANIMAL_ITEM,
            GroupKind::Bone => class::BONE_ITEM,
        };
        Self {
            key: Some(key.to_string()),
            part,
            in_dropdown: true,
            ..Default::default()
        }
        .with_class(hook)
    }

    pub fn back_button() -> Self {
        Self {
            in_model_viewer: true,
            ..Default::default()
        }
        .with_class(class::BACK_BUTTON)
    }

    pub fn inside_viewer() -> Self {
        Self {
            in_model_viewer: true,
            ..Default::default()
        }
        .with_class(class::SCAN_VIEWER_SECTION)
    }

    pub fn outside() -> Self {
        Self::default()
    }

    pub fn is(&self, element_id: &str) -> bool {
        self.id.as_deref() == Some(element_id)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Click(ClickTarget),
    KeyDown { key: String },
    Input { value: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventParseError {
    #[error("empty event")]
    Empty,

    #[error("unknown event kind '{0}' (expected click, type or key)")]
    UnknownKind(String),

    #[error("missing argument for '{0}'")]
    MissingArgument(String),

    #[error("unknown click target '{0}'")]
    UnknownTarget(String),
}

fn parse_group_item(kind: GroupKind, rest: &str) -> Result<ClickTarget, EventParseError> {
    let (key, part) = match rest.strip_suffix(":icon") {
        Some(key) => (key, ClickPart::Icon),
        None => (rest, ClickPart::Text),
    };
    if key.is_empty() {
        return Err(EventParseError::MissingArgument(kind.label().to_string()));
    }
    Ok(ClickTarget::group_item(kind, key, part))
}

fn parse_click(target: &str) -> Result<ClickTarget, EventParseError> {
    let (head, rest) = match target.split_once(':') {
        Some((head, rest)) => (head, Some(rest)),
        None => (target, None),
    };
    let arg = |name: &str| {
        rest.filter(|r| !r.is_empty())
            .ok_or_else(|| EventParseError::MissingArgument(name.to_string()))
    };
    match head {
        id::HOME_LINK | id::LAB_LINK | id::SCANS_LINK | id::ANIMAL_SEARCH_LINK
        | id::BONE_SEARCH_LINK => Ok(ClickTarget::element(head)),
        class::SCAN_BUTTON => Ok(ClickTarget::scan_button(arg(head)?)),
        class::SUBMENU_ITEM => Ok(ClickTarget::submenu_item(arg(head)?)),
        class::ANIMAL_ITEM => parse_group_item(GroupKind::Animal, arg(head)?),
        class::BONE_ITEM => parse_group_item(GroupKind::Bone, arg(head)?),
        "back" => Ok(ClickTarget::back_button()),
        "viewer" => Ok(ClickTarget::inside_viewer()),
        "outside" => Ok(ClickTarget::outside()),
        other => Err(EventParseError::UnknownTarget(other.to_string())),
    }
}

/// Script syntax: `click:<target>`, `type:<text>`, `key:<name>`.
impl FromStr for UiEvent {
    type Err = EventParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(EventParseError::Empty);
        }
        let (kind, rest) = line.split_once(':').unwrap_or((line, ""));
        match kind.trim() {
            "click" => parse_click(rest.trim()).map(UiEvent::Click),
            "type" => Ok(UiEvent::Input {
                value: rest.to_string(),
            }),
            "key" if !rest.trim().is_empty() => Ok(UiEvent::KeyDown {
                key: rest.trim().to_string(),
            }),
            "key" => Err(EventParseError::MissingArgument("key".to_string())),
            other => Err(EventParseError::UnknownKind(other.to_string())),
        }
    }
}
