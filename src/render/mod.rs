pub mod panels;

use crate::specimen::SpecimenRecord;

pub const DEFAULT_VIEWER_BASE: &str = "https://3dviewer.sites.carleton.edu/carcas/html-files";

pub const NO_RESULTS_HTML: &str = r#"
<div class="no-results">
    <i class="fas fa-search no-results-icon"></i>
    <p>No matching specimens found</p>
</div>
"#;

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewerUrls {
    base: String,
}

impl ViewerUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn model_url(&self, viewer_id: &str) -> String {
        format!("{}/{}.html", self.base, viewer_id)
    }

    pub fn preview_url(&self, viewer_id: &str) -> String {
        format!("{}?preview=true", self.model_url(viewer_id))
    }
}

impl Default for ViewerUrls {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWER_BASE)
    }
}

fn render_card(record: &SpecimenRecord, urls: &ViewerUrls) -> String {
    let title = record.title();
    let frame_title = format!("{} {}", title, record.bone_label());
    format!(
        r#"
<div class="scan-item">
    <div class="preview-frame">
        <iframe src="{preview}" loading="lazy" class="preview-iframe" title="{frame_title}"></iframe>
    </div>
    <div class="scan-info">
        <h4>{title}</h4>
        <button class="scan-button" data-model="{viewer_id}">View Model</button>
    </div>
</div>
"#,
        preview = escape_html(&urls.preview_url(&record.viewer_id)),
        frame_title = escape_html(frame_title.trim()),
        title = escape_html(&title),
        viewer_id = escape_html(&record.viewer_id),
    )
}

/// One card per record in input order, or the fixed no-results fragment.
pub fn render_specimens(records: &[SpecimenRecord], urls: &ViewerUrls) -> String {
    if records.is_empty() {
        return NO_RESULTS_HTML.to_string();
    }
    records.iter().map(|r| render_card(r, urls)).collect()
}
