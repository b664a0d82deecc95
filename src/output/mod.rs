use serde::Serialize;

use crate::render::ViewerUrls;
use crate::specimen::SpecimenRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub name: String,
    pub bone: Option<String>,
    pub viewer_id: String,
    pub viewer_url: String,
}

pub fn build_records(records: &[SpecimenRecord], urls: &ViewerUrls) -> Vec<OutputRecord> {
    records
        .iter()
        .map(|r| OutputRecord {
            name: r.display_name.clone(),
            bone: r.bone_name.clone(),
            viewer_id: r.viewer_id.clone(),
            viewer_url: urls.model_url(&r.viewer_id),
        })
        .collect()
}

pub fn render_text(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        out.push_str(&r.viewer_id);
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(records: &[OutputRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}

/// The content area's markup, optionally preceded by the dropdown menus.
pub fn render_html(content: &str, menus: Option<&str>) -> Vec<u8> {
    let mut out = String::new();
    if let Some(menus) = menus {
        out.push_str("<nav class=\"dropdowns\">\n");
        out.push_str(menus);
        out.push_str("\n</nav>\n");
    }
    out.push_str(&format!(
        "<div id=\"{}\">{}</div>\n",
        crate::dom::id::CONTENT_AREA,
        content
    ));
    out.into_bytes()
}
