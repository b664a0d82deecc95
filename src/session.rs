use std::sync::Arc;

use tracing::debug;

use crate::dom::{class, id, ClickPart, ClickTarget, UiEvent};
use crate::nav::{Dropdown, NavController, View};
use crate::render::ViewerUrls;
use crate::search::SearchController;
use crate::source::{Catalog, GroupKind};
use crate::specimen::{self, SpecimenRecord};
use crate::swap::ContentSink;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Navigated(View),
    Toggled { dropdown: Dropdown, open: bool },
    Searched { term: String, matches: usize },
    DropdownsClosed,
    Ignored,
}

/// Binds host events to the controllers. Holds no markup of its own; every
/// visible change goes through the sink.
pub struct Session<S> {
    nav: NavController<S>,
    search: SearchController,
}

impl<S: ContentSink> Session<S> {
    pub fn new(catalog: Arc<Catalog>, urls: ViewerUrls, sink: S) -> Self {
        Self {
            nav: NavController::new(catalog, urls, sink),
            search: SearchController::default(),
        }
    }

    pub fn start(&mut self) -> Outcome {
        self.search.reset();
        self.nav.start();
        Outcome::Navigated(View::Home)
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Outcome {
        let previous = self.search.applied_term().to_string();
        let outcome = match event {
            UiEvent::Click(target) => self.on_click(&target),
            UiEvent::KeyDown { key } => match self.search.on_keydown(&key) {
                Some(term) => self.run_search(term, &previous),
                None => Outcome::Ignored,
            },
            UiEvent::Input { value } => match self.search.on_input(&value) {
                Some(term) => self.run_search(term, &previous),
                None => Outcome::Ignored,
            },
        };
        debug!(?outcome, view = %self.nav.current(), "event handled");
        outcome
    }

    fn on_click(&mut self, target: &ClickTarget) -> Outcome {
        let in_viewer = target.in_model_viewer && self.viewer_shown();
        let outside =
            !target.in_dropdown && !in_viewer && !target.has_class(class::SCAN_BUTTON);
        let closed = outside && self.nav.close_dropdowns();

        match self.route_click(target) {
            Outcome::Ignored if closed => Outcome::DropdownsClosed,
            outcome => outcome,
        }
    }

    fn route_click(&mut self, target: &ClickTarget) -> Outcome {
        if target.is(id::HOME_LINK) {
            return self.go(View::Home);
        }
        if target.is(id::LAB_LINK) {
            return self.go(View::Lab);
        }
        if target.is(id::SCANS_LINK) {
            self.nav.toggle_dropdown(Dropdown::Scans);
            return self.go(View::Grid);
        }
        if target.is(id::ANIMAL_SEARCH_LINK) {
            self.nav.toggle_dropdown(Dropdown::Menu(GroupKind::Animal));
            return self.go(View::AnimalSearch);
        }
        if target.is(id::BONE_SEARCH_LINK) {
            self.nav.toggle_dropdown(Dropdown::Menu(GroupKind::Bone));
            return self.go(View::BoneSearch);
        }
        if target.has_class(class::SCAN_BUTTON) || target.has_class(class::SUBMENU_ITEM) {
            return match target.model.as_deref() {
                Some(model) if specimen::is_valid_viewer_id(model) => {
                    self.go(View::ModelViewer(model.to_string()))
                }
                _ => Outcome::Ignored,
            };
        }
        if target.has_class(class::BACK_BUTTON) {
            if !self.viewer_shown() {
                return Outcome::Ignored;
            }
            self.search.reset();
            return Outcome::Navigated(self.nav.back());
        }

        let kind = if target.has_class(class::ANIMAL_ITEM) {
            GroupKind::Animal
        } else if target.has_class(class::BONE_ITEM) {
            GroupKind::Bone
        } else {
            return Outcome::Ignored;
        };
        let Some(key) = target.key.as_deref() else {
            return Outcome::Ignored;
        };
        match target.part {
            ClickPart::Icon => {
                let dropdown = Dropdown::Submenu(kind, key.to_string());
                let open = self.nav.toggle_dropdown(dropdown.clone());
                Outcome::Toggled { dropdown, open }
            }
            ClickPart::Text => {
                let view = View::for_group(kind);
                self.search.prefill(key);
                self.nav.navigate_with(view.clone(), key);
                Outcome::Navigated(view)
            }
        }
    }

    fn go(&mut self, view: View) -> Outcome {
        self.search.reset();
        self.nav.navigate(view.clone());
        Outcome::Navigated(view)
    }

    fn viewer_shown(&self) -> bool {
        matches!(self.nav.current(), View::ModelViewer(_))
    }

    /// Filters the results region in place. While the region's page is still
    /// fading in there is nothing to filter, so the term is not applied.
    fn run_search(&mut self, term: String, previous: &str) -> Outcome {
        let Some(html) = self.nav.render_results(&term) else {
            self.search.restore(previous);
            return Outcome::Ignored;
        };
        if !self.nav.sink().replace_region(id::SPECIMENS_GRID, &html) {
            debug!(term = %term, "results region not on screen yet, search dropped");
            self.search.restore(previous);
            return Outcome::Ignored;
        }
        let matches = self.nav.displayed(&term).len();
        Outcome::Searched { term, matches }
    }

    pub fn current_view(&self) -> &View {
        self.nav.current()
    }

    pub fn search_term(&self) -> &str {
        self.search.applied_term()
    }

    pub fn displayed(&self) -> Vec<SpecimenRecord> {
        self.nav.displayed(self.search.applied_term())
    }

    pub fn menus(&self) -> String {
        self.nav.menus()
    }

    pub fn nav(&self) -> &NavController<S> {
        &self.nav
    }
}
