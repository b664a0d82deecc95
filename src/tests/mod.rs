use std::sync::Arc;
use std::time::Duration;

use crate::dom::UiEvent;
use crate::nav::View;
use crate::render::ViewerUrls;
use crate::search;
use crate::session::{Outcome, Session};
use crate::source::{api, load_catalog, Catalog, StaticSource};
use crate::swap::testing::RecordingSink;
use crate::swap::ContentSwapper;

const SHEET_ROWS: &str = r#"[
    {"Status": "live on website", "Common Name": "Bobcat", "Bone name": "Mandible",
     "Link to 3D Viewer": "https://3dviewer.sites.carleton.edu/carcas/html-files/bobcat-mandible.html"},
    {"Status": "in progress", "Common Name": "Moose", "Bone name": "Antler",
     "Link to 3D Viewer": "https://3dviewer.sites.carleton.edu/carcas/html-files/moose-antler.html"},
    {"Status": " live on website ", "Common Name": "Raccoon", "Bone name": "",
     "Link to 3D Viewer": "https://3dviewer.sites.carleton.edu/carcas/html-files/raccoon-skull.html?x=1"},
    {"Status": "live on website", "Common Name": "", "Bone name": "Femur",
     "Link to 3D Viewer": "https://3dviewer.sites.carleton.edu/carcas/html-files/blank.html"}
]"#;

fn script(lines: &[&str]) -> Vec<UiEvent> {
    lines
        .iter()
        .map(|l| l.parse::<UiEvent>().unwrap())
        .collect()
}

#[tokio::test]
async fn static_search_for_bea_keeps_load_order() {
    let catalog = load_catalog(&StaticSource).await;
    let hits = search::search(catalog.all(), "bea");
    let names: Vec<&str> = hits.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["bear", "beaver"]);
    assert_eq!(search::search(catalog.all(), "").len(), catalog.len());
}

#[test]
fn sheet_rows_that_are_not_live_are_excluded_everywhere() {
    let records = api::parse_rows("fixture", SHEET_ROWS).unwrap();
    let catalog = Catalog::from_records(records);

    let ids: Vec<&str> = catalog.all().iter().map(|r| r.viewer_id.as_str()).collect();
    assert_eq!(ids, vec!["bobcat-mandible", "raccoon-skull"]);
    assert!(!catalog.by_animal().contains_key("Moose"));
    assert!(!catalog.by_bone().contains_key("Antler"));
    assert!(catalog.by_bone().contains_key(crate::source::UNSPECIFIED_BONE));
    assert_eq!(search::search(catalog.all(), "").len(), 2);
}

#[test]
fn scripted_viewer_click_swaps_once() {
    let sink = Arc::new(RecordingSink::default());
    let mut session = Session::new(
        Arc::new(Catalog::from_records(crate::specimen::static_specimens())),
        ViewerUrls::default(),
        Arc::clone(&sink),
    );
    for event in script(&["click:scan-button:deer-cranium"]) {
        session.dispatch(event);
    }
    assert_eq!(
        session.current_view(),
        &View::ModelViewer("deer-cranium".to_string())
    );
    let swaps = sink.swaps();
    assert_eq!(swaps.len(), 1);
    assert!(swaps[0].contains("deer-cranium"));
}

#[tokio::test(start_paused = true)]
async fn full_session_settles_on_filtered_grid() {
    let catalog = load_catalog(&StaticSource).await;
    let swapper = ContentSwapper::new(Duration::from_millis(300));
    let mut session = Session::new(catalog, ViewerUrls::default(), swapper.clone());

    session.start();
    swapper.settle().await;
    assert!(swapper.html().contains("CARCAS"));

    let outcomes: Vec<Outcome> = script(&["click:lab-link", "click:scans-link"])
        .into_iter()
        .map(|e| session.dispatch(e))
        .collect();
    assert_eq!(outcomes.last(), Some(&Outcome::Navigated(View::Grid)));
    swapper.settle().await;
    assert_eq!(swapper.html().matches("scan-button").count(), 8);

    for event in script(&["type:  BEA ", "key:Enter"]) {
        session.dispatch(event);
    }
    let html = swapper.html();
    assert_eq!(html.matches("scan-button").count(), 2);
    assert!(html.contains("bear-skull"));
    assert!(html.contains("beaver-w21-skull"));
    assert_eq!(swapper.snapshot().opacity(), 1.0);
}

#[tokio::test(start_paused = true)]
async fn rapid_navigation_ends_on_latest_view() {
    let catalog = load_catalog(&StaticSource).await;
    let swapper = ContentSwapper::new(Duration::from_millis(300));
    let mut session = Session::new(catalog, ViewerUrls::default(), swapper.clone());

    for event in script(&[
        "click:scans-link",
        "click:scan-button:cat-cranium",
        "click:back",
    ]) {
        session.dispatch(event);
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    swapper.settle().await;

    assert_eq!(session.current_view(), &View::Grid);
    assert!(swapper.html().contains("specimens-grid"));
    assert!(!swapper.html().contains("back-button"));
}

#[tokio::test(start_paused = true)]
async fn search_before_grid_lands_leaves_output_consistent() {
    let catalog = load_catalog(&StaticSource).await;
    let swapper = ContentSwapper::new(Duration::from_millis(300));
    let mut session = Session::new(catalog, ViewerUrls::default(), swapper.clone());
    session.start();
    swapper.settle().await;

    let outcomes: Vec<Outcome> = script(&["click:scans-link", "type:bea", "key:Enter"])
        .into_iter()
        .map(|e| session.dispatch(e))
        .collect();
    assert_eq!(outcomes.last(), Some(&Outcome::Ignored));
    swapper.settle().await;

    let on_screen = swapper.html().matches("scan-button").count();
    assert_eq!(on_screen, 8);
    assert_eq!(session.displayed().len(), on_screen);

    for event in script(&["type:bea", "key:Enter"]) {
        session.dispatch(event);
    }
    assert_eq!(swapper.html().matches("scan-button").count(), 2);
    assert_eq!(session.displayed().len(), 2);
}
