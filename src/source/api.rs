use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{DataSource, SourceError};
use crate::specimen::{self, SpecimenRecord};

pub const LIVE_STATUS: &str = "live on website";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiRow {
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "Common Name", default)]
    pub common_name: Option<String>,
    #[serde(rename = "Bone name", default)]
    pub bone_name: Option<String>,
    #[serde(rename = "Link to 3D Viewer", default)]
    pub link: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl ApiRow {
    pub fn into_record(self) -> Option<SpecimenRecord> {
        if non_empty(self.status.as_deref()) != Some(LIVE_STATUS) {
            return None;
        }
        let name = non_empty(self.common_name.as_deref())?;
        let link = non_empty(self.link.as_deref())?;
        let viewer_id = viewer_id_from_link(link)?;
        Some(SpecimenRecord::new(
            name,
            self.bone_name.as_deref(),
            &viewer_id,
        ))
    }
}

/// Last path segment of the viewer link without query, fragment or `.html`.
pub fn viewer_id_from_link(link: &str) -> Option<String> {
    let path = link.split(['?', '#']).next().unwrap_or_default();
    let segment = path.split('/').filter(|s| !s.is_empty()).last()?;
    let id = segment.strip_suffix(".html").unwrap_or(segment);
    specimen::is_valid_viewer_id(id).then(|| id.to_string())
}

pub fn parse_rows(url: &str, body: &str) -> Result<Vec<SpecimenRecord>, SourceError> {
    let rows: Vec<ApiRow> =
        serde_json::from_str(body).map_err(|source| SourceError::Malformed {
            url: url.to_string(),
            source,
        })?;
    let total = rows.len();
    let records: Vec<SpecimenRecord> = rows.into_iter().filter_map(ApiRow::into_record).collect();
    debug!(total, kept = records.len(), "parsed spreadsheet rows");
    Ok(records)
}

#[derive(Clone, Debug)]
pub struct ApiSource {
    url: String,
    client: reqwest::Client,
}

impl ApiSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("carcas/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|source| SourceError::HttpClientBuild { source })?;
        Ok(Self {
            url: url.trim().to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DataSource for ApiSource {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn load(&self) -> Result<Vec<SpecimenRecord>, SourceError> {
        let resp = self
            .client
            .get(self.url.as_str())
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: self.url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().await.map_err(|source| SourceError::Request {
            url: self.url.clone(),
            source,
        })?;
        parse_rows(&self.url, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Catalog;

    const ROWS: &str = r#"[
        {"Status": "live on website", "Common Name": "Deer", "Bone name": "cranium",
         "Link to 3D Viewer": "https://3dviewer.sites.carleton.edu/carcas/html-files/deer-cranium.html"},
        {"Status": "in progress", "Common Name": "Wolf", "Bone name": "skull",
         "Link to 3D Viewer": "https://3dviewer.sites.carleton.edu/carcas/html-files/wolf-skull.html"},
        {"Status": "live on website", "Common Name": "", "Bone name": "femur",
         "Link to 3D Viewer": "https://example.org/x/femur.html"},
        {"Status": "live on website", "Common Name": "Bear", "Bone name": "skull",
         "Link to 3D Viewer": "  "},
        {"Status": " live on website ", "Common Name": "Bear", "Bone name": "",
         "Link to 3D Viewer": "bear-skull.html?preview=true", "Notes": "extra column"}
    ]"#;

    #[test]
    fn keeps_only_live_rows_with_name_and_link() {
        let records = parse_rows("http://sheet", ROWS).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.viewer_id.as_str()).collect();
        assert_eq!(ids, vec!["deer-cranium", "bear-skull"]);
        assert_eq!(records[0].bone_name.as_deref(), Some("cranium"));
        assert_eq!(records[1].bone_name, None);
    }

    #[test]
    fn non_live_row_is_absent_from_groupings() {
        let catalog = Catalog::from_records(parse_rows("http://sheet", ROWS).unwrap());
        assert!(catalog.all().iter().all(|r| r.display_name != "Wolf"));
        assert!(!catalog.by_animal().contains_key("Wolf"));
        assert!(catalog
            .by_bone()
            .values()
            .flatten()
            .all(|r| r.viewer_id != "wolf-skull"));
    }

    #[test]
    fn non_array_body_is_malformed() {
        let err = parse_rows("http://sheet", r#"{"error": "quota"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
        assert!(parse_rows("http://sheet", "<html>").is_err());
    }

    #[test]
    fn missing_columns_are_treated_as_empty() {
        let records = parse_rows("http://sheet", r#"[{"Status": "live on website"}]"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn viewer_id_from_various_links() {
        assert_eq!(
            viewer_id_from_link("https://host/carcas/html-files/deer-cranium.html").as_deref(),
            Some("deer-cranium")
        );
        assert_eq!(
            viewer_id_from_link("deer-cranium.html#top").as_deref(),
            Some("deer-cranium")
        );
        assert_eq!(
            viewer_id_from_link("https://host/models/cat-cranium/").as_deref(),
            Some("cat-cranium")
        );
        assert_eq!(viewer_id_from_link("https://host/a%20b.html"), None);
        assert_eq!(viewer_id_from_link("?x=1"), None);
    }

    #[test]
    fn client_builds_with_timeout() {
        let source = ApiSource::new(" https://sheet.invalid/rows ", Duration::from_secs(5)).unwrap();
        assert_eq!(source.url(), "https://sheet.invalid/rows");
        assert_eq!(source.name(), "api");
    }
}
