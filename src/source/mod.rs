pub mod api;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, warn};

use crate::specimen::{self, SpecimenRecord};

pub use api::ApiSource;

pub const UNSPECIFIED_BONE: &str = "unspecified";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed specimen data from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn load(&self) -> Result<Vec<SpecimenRecord>, SourceError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StaticSource;

#[async_trait]
impl DataSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn load(&self) -> Result<Vec<SpecimenRecord>, SourceError> {
        Ok(specimen::static_specimens())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKind {
    Animal,
    Bone,
}

impl GroupKind {
    pub fn key(self, record: &SpecimenRecord) -> String {
        match self {
            GroupKind::Animal => record.display_name.clone(),
            GroupKind::Bone => record
                .bone_name
                .clone()
                .unwrap_or_else(|| UNSPECIFIED_BONE.to_string()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupKind::Animal => "animal",
            GroupKind::Bone => "bone",
        }
    }
}

pub type Groups = HashMap<String, Vec<SpecimenRecord>>;

pub fn group_by<F>(records: &[SpecimenRecord], key_fn: F) -> Groups
where
    F: Fn(&SpecimenRecord) -> String,
{
    let mut groups: Groups = HashMap::new();
    for record in records {
        groups.entry(key_fn(record)).or_default().push(record.clone());
    }
    groups
}

pub fn sorted_keys(groups: &Groups) -> Vec<&str> {
    groups.keys().map(String::as_str).sorted().collect()
}

/// Immutable snapshot produced by one load. Groupings are rebuilt wholesale,
/// never patched.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    all: Vec<SpecimenRecord>,
    by_animal: Groups,
    by_bone: Groups,
}

impl Catalog {
    pub fn from_records(records: Vec<SpecimenRecord>) -> Self {
        let by_animal = group_by(&records, |r| GroupKind::Animal.key(r));
        let by_bone = group_by(&records, |r| GroupKind::Bone.key(r));
        Self {
            all: records,
            by_animal,
            by_bone,
        }
    }

    pub fn all(&self) -> &[SpecimenRecord] {
        &self.all
    }

    pub fn by_animal(&self) -> &Groups {
        &self.by_animal
    }

    pub fn by_bone(&self) -> &Groups {
        &self.by_bone
    }

    pub fn groups(&self, kind: GroupKind) -> &Groups {
        match kind {
            GroupKind::Animal => &self.by_animal,
            GroupKind::Bone => &self.by_bone,
        }
    }

    pub fn find(&self, viewer_id: &str) -> Option<&SpecimenRecord> {
        self.all.iter().find(|r| r.viewer_id == viewer_id)
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Loads once. A failing source is logged and degrades to an empty catalog;
/// there is no retry.
pub async fn load_catalog<S>(source: &S) -> Arc<Catalog>
where
    S: DataSource + ?Sized,
{
    match source.load().await {
        Ok(records) => {
            debug!(source = source.name(), count = records.len(), "specimens loaded");
            Arc::new(Catalog::from_records(records))
        }
        Err(e) => {
            warn!(source = source.name(), error = %e, "specimen fetch failed, showing an empty collection");
            Arc::new(Catalog::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    struct BrokenSource;

    #[async_trait]
    impl DataSource for BrokenSource {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn load(&self) -> Result<Vec<SpecimenRecord>, SourceError> {
            let source = serde_json::from_str::<Vec<String>>("{not json").unwrap_err();
            Err(SourceError::Malformed {
                url: "http://sheet.invalid/rows".to_string(),
                source,
            })
        }
    }

    fn flatten(groups: &Groups) -> Vec<SpecimenRecord> {
        groups.values().flatten().cloned().collect()
    }

    #[test]
    fn group_by_preserves_every_record() {
        let records = specimen::static_specimens();
        for n in 0..=records.len() {
            let slice = &records[..n];
            for kind in [GroupKind::Animal, GroupKind::Bone] {
                let groups = group_by(slice, |r| kind.key(r));
                let mut flat = flatten(&groups);
                assert_eq!(flat.len(), n);
                flat.sort_by(|a, b| a.viewer_id.cmp(&b.viewer_id));
                let mut expected = slice.to_vec();
                expected.sort_by(|a, b| a.viewer_id.cmp(&b.viewer_id));
                assert_eq!(flat, expected);
            }
        }
    }

    fn arb_records() -> impl Strategy<Value = Vec<SpecimenRecord>> {
        let names = prop::sample::select(vec!["fox", "bear", "owl", "Fox"]);
        let bones = prop::option::of(prop::sample::select(vec!["skull", "femur", "  "]));
        prop::collection::vec((names, bones), 0..40).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (name, bone))| SpecimenRecord::new(name, bone, &format!("{name}-{i}")))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn group_by_partitions_arbitrary_records(records in arb_records()) {
            for kind in [GroupKind::Animal, GroupKind::Bone] {
                let groups = group_by(&records, |r| kind.key(r));
                let total: usize = groups.values().map(Vec::len).sum();
                prop_assert_eq!(total, records.len());
                for (key, members) in &groups {
                    prop_assert!(!members.is_empty());
                    prop_assert!(members.iter().all(|r| &kind.key(r) == key));
                    let in_order: Vec<&SpecimenRecord> =
                        records.iter().filter(|r| &kind.key(r) == key).collect();
                    prop_assert_eq!(members.iter().collect::<Vec<_>>(), in_order);
                }
            }
        }
    }

    #[test]
    fn bone_grouping_keeps_records_without_bone() {
        let records = vec![
            SpecimenRecord::new("fox", None, "fox-skull"),
            SpecimenRecord::new("fox", Some("femur"), "fox-femur"),
        ];
        let catalog = Catalog::from_records(records);
        assert_eq!(catalog.by_bone()[UNSPECIFIED_BONE].len(), 1);
        assert_eq!(catalog.by_bone()["femur"].len(), 1);
        assert_eq!(catalog.by_animal()["fox"].len(), 2);
    }

    #[test]
    fn sorted_keys_are_lexicographic() {
        let catalog = Catalog::from_records(specimen::static_specimens());
        let keys = sorted_keys(catalog.by_bone());
        assert_eq!(keys, vec!["cranium", "skull", "w21-skull"]);
        let animals: HashSet<_> = sorted_keys(catalog.by_animal()).into_iter().collect();
        assert_eq!(animals.len(), 8);
    }

    #[tokio::test]
    async fn static_source_loads_full_catalog() {
        let catalog = load_catalog(&StaticSource).await;
        assert_eq!(catalog.len(), 8);
        assert!(catalog.find("deer-cranium").is_some());
        assert!(catalog.find("deer").is_none());
    }

    #[tokio::test]
    async fn failing_source_degrades_to_empty_catalog() {
        let catalog = load_catalog(&BrokenSource).await;
        assert!(catalog.is_empty());
        assert!(catalog.by_animal().is_empty());
        assert!(catalog.by_bone().is_empty());
    }
}
