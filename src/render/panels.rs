use itertools::Itertools;

use super::{escape_html, render_specimens, ViewerUrls, NO_RESULTS_HTML};
use crate::dom::{class, id};
use crate::source::{sorted_keys, GroupKind, Groups};
use crate::specimen::{model_title, title_case, SpecimenRecord};

const LAB_RESOURCES: &[(&str, &str, &str)] = &[
    ("fa-bug", "Dermestid Beetle Colony", "Natural skeletal preparation facility"),
    ("fa-bone", "Osteological Collection", "Comprehensive reference materials"),
    ("fa-microscope", "Stereo Microscopes", "High-precision sorting and analysis equipment"),
    ("fa-camera", "Microscope Photography", "Specialized equipment and software for documentation"),
    ("fa-balance-scale", "Precision Balances", "Analytical measurement instruments"),
    ("fa-box", "Storage Facilities", "Controlled environment for specimen preservation"),
];

pub fn home_panel() -> String {
    r#"
<div class="home-content">
    <header class="home-header">
        <img src="carcas.png" alt="CARCAS Logo" class="main-logo">
        <h1 class="site-title">Carleton Comparative Archaeological Research Collection</h1>
    </header>
    <div class="home-description">
        The <strong>Carleton Archaeological Research Collection of Animal Specimens</strong> (CARCAS) is an osteological comparative collection, dermestid beetle colony, and 3D digital repository of animal skeletons located at Carleton College and directed by professor Sarah Kennedy.
        <br><br>
        Established by Sarah Kennedy in 2021, CARCAS is dedicated to understanding the relationship between humans, animals, and the environment. In our lab, we focus on the curation, analysis, storage, and interpretation of archaeological animal remains. We use dermestid beetles to skeletonize animal carcasses of birds and mammals, and the cleaned skeletons become part of our osteological reference collection. This collection is then used by students and professors as reference material to help identify animal bones found in archaeological excavations around the world.
    </div>
    <img src="lab.jpeg" alt="CARCAS Laboratory" class="lab-image">
</div>
"#
    .to_string()
}

pub fn lab_panel() -> String {
    let items: String = LAB_RESOURCES
        .iter()
        .map(|(icon, heading, blurb)| {
            format!(
                r#"
            <div class="resource-item">
                <div class="resource-icon">
                    <i class="fas {icon}"></i>
                </div>
                <div class="resource-content">
                    <h3>{heading}</h3>
                    <p>{blurb}</p>
                </div>
            </div>"#
            )
        })
        .collect();
    format!(
        r#"
<div class="lab-section">
    <h2>Laboratory Facilities</h2>
    <p class="lab-description">Our laboratory resources form the foundation of CARCAS's research capabilities</p>
    <div class="resources-container">
        <div class="resource-list">{items}
        </div>
    </div>
</div>
"#
    )
}

fn search_box(value: &str, placeholder: &str) -> String {
    format!(
        r#"<div class="search-container">
        <div class="search-wrapper">
            <i class="fas fa-search search-icon"></i>
            <input type="text" id="{input_id}" placeholder="{placeholder}" class="search-input" value="{value}">
        </div>
    </div>"#,
        input_id = id::SPECIMEN_SEARCH,
        placeholder = escape_html(placeholder),
        value = escape_html(value),
    )
}

pub fn grid_page(records: &[SpecimenRecord], urls: &ViewerUrls, search_value: &str) -> String {
    format!(
        r#"
<div class="scans-section">
    <h2>Digital Osteological Collection</h2>
    <p class="collection-description">Explore our open-access 3D models of comparative specimens:</p>
    {search}
    <div class="grid" id="{grid_id}">{cards}</div>
</div>
"#,
        search = search_box(search_value, "Search specimens..."),
        grid_id = id::SPECIMENS_GRID,
        cards = render_specimens(records, urls),
    )
}

pub fn model_viewer_page(viewer_id: &str, urls: &ViewerUrls) -> String {
    format!(
        r#"
<div class="{section}">
    <h1 class="model-title">{title}</h1>
    <div class="model-viewer-container">
        <button class="{back}">&larr; Back to Collection</button>
        <iframe src="{src}" style="border:0; width:100%; height:100%;" name="model-viewer" scrolling="no" frameborder="0" allowfullscreen></iframe>
    </div>
</div>
"#,
        section = class::SCAN_VIEWER_SECTION,
        title = escape_html(&model_title(viewer_id)),
        back = class::BACK_BUTTON,
        src = escape_html(&urls.model_url(viewer_id)),
    )
}

fn group_heading(kind: GroupKind) -> &'static str {
    match kind {
        GroupKind::Animal => "Browse by Animal",
        GroupKind::Bone => "Browse by Bone",
    }
}

/// Groups in lexicographic key order; an empty grouping gives the no-results
/// fragment like an empty grid does.
pub fn render_groups(groups: &Groups, urls: &ViewerUrls) -> String {
    if groups.is_empty() {
        return NO_RESULTS_HTML.to_string();
    }
    sorted_keys(groups)
        .into_iter()
        .map(|key| {
            format!(
                r#"
<section class="specimen-group" data-key="{key}">
    <h3>{title}</h3>
    <div class="group-items">{cards}</div>
</section>"#,
                key = escape_html(key),
                title = escape_html(&title_case(key)),
                cards = render_specimens(&groups[key], urls),
            )
        })
        .collect()
}

pub fn group_page(kind: GroupKind, groups: &Groups, urls: &ViewerUrls, search_value: &str) -> String {
    let placeholder = match kind {
        GroupKind::Animal => "Search animals...",
        GroupKind::Bone => "Search bones...",
    };
    format!(
        r#"
<div class="group-search-section" data-group="{group}">
    <h2>{heading}</h2>
    {search}
    <div class="grid" id="{grid_id}">{groups}</div>
</div>
"#,
        group = kind.label(),
        heading = group_heading(kind),
        search = search_box(search_value, placeholder),
        grid_id = id::SPECIMENS_GRID,
        groups = render_groups(groups, urls),
    )
}

pub fn dropdown_menu<F>(kind: GroupKind, groups: &Groups, menu_active: bool, submenu_open: F) -> String
where
    F: Fn(&str) -> bool,
{
    let (menu_id, item_class) = match kind {
        GroupKind::Animal => (id::ANIMAL_DROPDOWN, class::ANIMAL_ITEM),
        GroupKind::Bone => (id::BONE_DROPDOWN, class::BONE_ITEM),
    };
    let active = |on: bool| if on { format!(" {}", class::ACTIVE) } else { String::new() };

    let items = sorted_keys(groups)
        .into_iter()
        .map(|key| {
            let links = groups[key]
                .iter()
                .map(|r| {
                    let label = match kind {
                        GroupKind::Animal => title_case(r.bone_label()),
                        GroupKind::Bone => r.title(),
                    };
                    let label = if label.is_empty() { model_title(&r.viewer_id) } else { label };
                    format!(
                        r##"<li><a href="#" class="{submenu_item}" data-model="{viewer_id}">{label}</a></li>"##,
                        submenu_item = class::SUBMENU_ITEM,
                        viewer_id = escape_html(&r.viewer_id),
                        label = escape_html(&label),
                    )
                })
                .join("");
            format!(
                r#"
    <li class="{item_class}" data-key="{key}">
        <span class="item-text">{title}</span>
        <i class="fas fa-chevron-right item-icon"></i>
        <ul class="{submenu}{open}">{links}</ul>
    </li>"#,
                key = escape_html(key),
                title = escape_html(&title_case(key)),
                submenu = class::DROPDOWN_SUBMENU,
                open = active(submenu_open(key)),
            )
        })
        .join("");

    format!(
        r#"<ul id="{menu_id}" class="dropdown-menu{menu_active}">{items}
</ul>"#,
        menu_active = active(menu_active),
    )
}
