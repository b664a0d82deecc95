use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::render::panels;
use crate::render::{render_specimens, ViewerUrls};
use crate::search::{search, search_grouped, search_groups};
use crate::source::{Catalog, GroupKind};
use crate::specimen::SpecimenRecord;
use crate::swap::ContentSink;

const HISTORY_LIMIT: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Lab,
    Grid,
    ModelViewer(String),
    AnimalSearch,
    BoneSearch,
}

impl View {
    pub fn group_kind(&self) -> Option<GroupKind> {
        match self {
            View::AnimalSearch => Some(GroupKind::Animal),
            View::BoneSearch => Some(GroupKind::Bone),
            _ => None,
        }
    }

    pub fn for_group(kind: GroupKind) -> Self {
        match kind {
            GroupKind::Animal => View::AnimalSearch,
            GroupKind::Bone => View::BoneSearch,
        }
    }

    pub fn is_searchable(&self) -> bool {
        matches!(self, View::Grid | View::AnimalSearch | View::BoneSearch)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Home => f.write_str("home"),
            View::Lab => f.write_str("lab"),
            View::Grid => f.write_str("grid"),
            View::ModelViewer(id) => write!(f, "model:{id}"),
            View::AnimalSearch => f.write_str("animals"),
            View::BoneSearch => f.write_str("bones"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dropdown {
    Scans,
    Menu(GroupKind),
    Submenu(GroupKind, String),
}

/// Ephemeral "active" flags, kept apart from the navigation state.
#[derive(Clone, Debug, Default)]
pub struct DropdownState {
    open: BTreeSet<Dropdown>,
}

impl DropdownState {
    pub fn toggle(&mut self, dropdown: Dropdown) -> bool {
        if self.open.remove(&dropdown) {
            false
        } else {
            self.open.insert(dropdown);
            true
        }
    }

    pub fn is_open(&self, dropdown: &Dropdown) -> bool {
        self.open.contains(dropdown)
    }

    pub fn close_all(&mut self) -> bool {
        let any = !self.open.is_empty();
        self.open.clear();
        any
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

pub struct NavController<S> {
    catalog: Arc<Catalog>,
    urls: ViewerUrls,
    sink: S,
    current: View,
    history: VecDeque<View>,
    dropdowns: DropdownState,
}

impl<S: ContentSink> NavController<S> {
    pub fn new(catalog: Arc<Catalog>, urls: ViewerUrls, sink: S) -> Self {
        Self {
            catalog,
            urls,
            sink,
            current: View::Home,
            history: VecDeque::new(),
            dropdowns: DropdownState::default(),
        }
    }

    pub fn start(&mut self) {
        self.history.clear();
        self.current = View::Home;
        let html = self.render(&View::Home, "");
        self.sink.swap(html);
    }

    pub fn navigate(&mut self, view: View) {
        self.navigate_with(view, "");
    }

    /// Shows `view` with the search box pre-filled with `term`. Each call
    /// swaps exactly once, even when the view does not change.
    pub fn navigate_with(&mut self, view: View, term: &str) {
        if view != self.current {
            let previous = std::mem::replace(&mut self.current, view);
            self.history.push_back(previous);
            if self.history.len() > HISTORY_LIMIT {
                self.history.pop_front();
            }
        }
        debug!(view = %self.current, term, "navigating");
        let html = self.render(&self.current, term);
        self.sink.swap(html);
    }

    /// Pops the back-stack; with nothing to go back to, the collection grid
    /// is shown.
    pub fn back(&mut self) -> View {
        self.current = self.history.pop_back().unwrap_or(View::Grid);
        let html = self.render(&self.current, "");
        self.sink.swap(html);
        self.current.clone()
    }

    pub fn render(&self, view: &View, term: &str) -> String {
        let all = self.catalog.all();
        match view {
            View::Home => panels::home_panel(),
            View::Lab => panels::lab_panel(),
            View::Grid => panels::grid_page(&search(all, term), &self.urls, term),
            View::ModelViewer(id) => panels::model_viewer_page(id, &self.urls),
            View::AnimalSearch | View::BoneSearch => {
                let kind = view.group_kind().unwrap_or(GroupKind::Animal);
                let groups = search_groups(all, term, kind);
                panels::group_page(kind, &groups, &self.urls, term)
            }
        }
    }

    /// Markup for the results region of the current view, if it has one.
    pub fn render_results(&self, term: &str) -> Option<String> {
        let all = self.catalog.all();
        match &self.current {
            View::Grid => Some(render_specimens(&search(all, term), &self.urls)),
            view => view
                .group_kind()
                .map(|kind| panels::render_groups(&search_groups(all, term, kind), &self.urls)),
        }
    }

    pub fn displayed(&self, term: &str) -> Vec<SpecimenRecord> {
        let all = self.catalog.all();
        match &self.current {
            View::Grid => search(all, term),
            View::AnimalSearch | View::BoneSearch => search_grouped(all, term),
            View::ModelViewer(id) => self.catalog.find(id).cloned().into_iter().collect(),
            View::Home | View::Lab => Vec::new(),
        }
    }

    pub fn menus(&self) -> String {
        [GroupKind::Animal, GroupKind::Bone]
            .into_iter()
            .map(|kind| {
                panels::dropdown_menu(
                    kind,
                    self.catalog.groups(kind),
                    self.dropdowns.is_open(&Dropdown::Menu(kind)),
                    |key| {
                        self.dropdowns
                            .is_open(&Dropdown::Submenu(kind, key.to_string()))
                    },
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn toggle_dropdown(&mut self, dropdown: Dropdown) -> bool {
        self.dropdowns.toggle(dropdown)
    }

    pub fn close_dropdowns(&mut self) -> bool {
        self.dropdowns.close_all()
    }

    pub fn dropdowns(&self) -> &DropdownState {
        &self.dropdowns
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    pub fn history(&self) -> &VecDeque<View> {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
