use crate::source::{group_by, GroupKind, Groups};
use crate::specimen::SpecimenRecord;

pub const ENTER_KEY: &str = "Enter";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchScope {
    Names,
    NamesAndBones,
}

pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

fn matches(record: &SpecimenRecord, needle: &str, scope: SearchScope) -> bool {
    if record.display_name.to_lowercase().contains(needle) {
        return true;
    }
    scope == SearchScope::NamesAndBones
        && record
            .bone_name
            .as_deref()
            .is_some_and(|bone| bone.to_lowercase().contains(needle))
}

/// Filters without mutating the loaded list; an empty term keeps everything.
pub fn search_in(records: &[SpecimenRecord], term: &str, scope: SearchScope) -> Vec<SpecimenRecord> {
    let needle = normalize_term(term);
    records
        .iter()
        .filter(|r| needle.is_empty() || matches(r, &needle, scope))
        .cloned()
        .collect()
}

pub fn search(records: &[SpecimenRecord], term: &str) -> Vec<SpecimenRecord> {
    search_in(records, term, SearchScope::Names)
}

pub fn search_grouped(records: &[SpecimenRecord], term: &str) -> Vec<SpecimenRecord> {
    search_in(records, term, SearchScope::NamesAndBones)
}

pub fn search_groups(records: &[SpecimenRecord], term: &str, kind: GroupKind) -> Groups {
    group_by(&search_grouped(records, term), |r| kind.key(r))
}

/// Tracks the search box and decides when a search runs: on Enter, or when
/// the box is cleared. Other keystrokes never re-render.
#[derive(Clone, Debug, Default)]
pub struct SearchController {
    value: String,
    applied: String,
}

impl SearchController {
    pub fn on_input(&mut self, value: &str) -> Option<String> {
        self.value = value.to_string();
        if value.trim().is_empty() {
            self.applied.clear();
            return Some(String::new());
        }
        None
    }

    pub fn on_keydown(&mut self, key: &str) -> Option<String> {
        if key != ENTER_KEY {
            return None;
        }
        self.applied = normalize_term(&self.value);
        Some(self.applied.clone())
    }

    pub fn prefill(&mut self, term: &str) {
        self.value = term.to_string();
        self.applied = normalize_term(term);
    }

    /// Puts back the term that was applied before a search that could not
    /// run.
    pub fn restore(&mut self, applied: &str) {
        self.applied = applied.to_string();
    }

    pub fn reset(&mut self) {
        self.value.clear();
        self.applied.clear();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn applied_term(&self) -> &str {
        &self.applied
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::source::api::parse_rows;
    use crate::specimen::static_specimens;

    fn names(records: &[SpecimenRecord]) -> Vec<&str> {
        records.iter().map(|r| r.display_name.as_str()).collect()
    }

    #[test]
    fn bea_finds_bear_then_beaver() {
        let out = search(&static_specimens(), "bea");
        assert_eq!(names(&out), vec!["bear", "beaver"]);
    }

    #[test]
    fn empty_term_is_identity_for_both_sources() {
        let stat = static_specimens();
        assert_eq!(search(&stat, ""), stat);
        assert_eq!(search(&stat, "   "), stat);

        let api = parse_rows(
            "http://sheet",
            r#"[{"Status": "live on website", "Common Name": "Deer", "Bone name": "cranium",
                 "Link to 3D Viewer": "deer-cranium.html"},
                {"Status": "live on website", "Common Name": "Cat", "Bone name": "femur",
                 "Link to 3D Viewer": "cat-femur.html"}]"#,
        )
        .unwrap();
        assert_eq!(search_grouped(&api, ""), api);
        assert_eq!(search(&api, ""), api);
    }

    #[test]
    fn term_is_trimmed_and_lowercased() {
        let out = search(&static_specimens(), "  CAT ");
        assert_eq!(names(&out), vec!["cat"]);
    }

    #[test]
    fn grouped_scope_also_matches_bones() {
        let records = static_specimens();
        assert!(search(&records, "skull").is_empty());
        let out = search_grouped(&records, "skull");
        assert_eq!(names(&out), vec!["alligator", "bear", "beaver"]);
    }

    #[test]
    fn search_groups_regroups_matches() {
        let groups = search_groups(&static_specimens(), "cranium", GroupKind::Bone);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["cranium"].len(), 5);
    }

    #[test]
    fn controller_only_fires_on_enter_or_clear() {
        let mut c = SearchController::default();
        assert_eq!(c.on_input("b"), None);
        assert_eq!(c.on_input("be"), None);
        assert_eq!(c.on_keydown("a"), None);
        assert_eq!(c.on_keydown(ENTER_KEY), Some("be".to_string()));
        assert_eq!(c.applied_term(), "be");
        assert_eq!(c.on_input("  "), Some(String::new()));
        assert_eq!(c.applied_term(), "");
    }

    #[test]
    fn controller_normalizes_before_reporting() {
        let mut c = SearchController::default();
        c.on_input(" Deer ");
        assert_eq!(c.on_keydown(ENTER_KEY), Some("deer".to_string()));
        assert_eq!(c.value(), " Deer ");
        c.reset();
        assert_eq!(c.value(), "");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(term in "[ a-zA-Z\\-]{0,12}") {
            let records = static_specimens();
            prop_assert_eq!(
                search(&records, &term),
                search(&records, &term.trim().to_lowercase())
            );
            prop_assert_eq!(
                search_grouped(&records, &term),
                search_grouped(&records, &normalize_term(&term))
            );
        }

        #[test]
        fn results_are_an_ordered_subsequence(term in "[a-z]{0,4}") {
            let records = static_specimens();
            let out = search(&records, &term);
            let mut it = records.iter();
            for r in &out {
                prop_assert!(it.any(|x| x == r));
            }
        }
    }
}
