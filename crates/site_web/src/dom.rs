//! Markup contract: where each `Target` lives in the document.

use shared::{
    domain::{PageId, SolutionId},
    protocol::Target,
};
use site_core::SiteLayout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node};

pub const PAGE: &str = ".page";
pub const NAV_LINK: &str = ".nav-link";
pub const NAVBAR: &str = ".navbar";
pub const PROBLEM_CARD: &str = ".problem-card";
pub const SOLUTION_PANEL: &str = ".solution-content";
pub const ROADMAP_CONTAINER: &str = ".roadmap-container";
pub const ROADMAP_STEP: &str = ".roadmap-step";
pub const GALLERY: &str = ".product-gallery";
pub const PRODUCT_BUTTON: &str = ".product-btn";
pub const CONSTRUCTION_SECTION: &str = ".construction-bases-section";
pub const CONSTRUCTION_ITEM: &str = ".construction-item";
pub const CONSTRUCTION_HEADER: &str = ".construction-header";

pub const NAV_MENU_ID: &str = "nav-menu";
pub const NAV_TOGGLE_ID: &str = "nav-toggle";
pub const PRODUCT_IMAGE_ID: &str = "mainProductImage";
pub const PRODUCT_TITLE_ID: &str = "productTitle";
pub const PRODUCT_DESC_ID: &str = "productDesc";

pub const DATA_PAGE: &str = "data-page";
pub const DATA_SOLUTION: &str = "data-solution";

pub fn query(scope: &Element, selector: &str) -> Option<HtmlElement> {
    scope
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

pub fn query_document(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

pub fn query_all(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

fn nth(document: &Document, selector: &str, index: usize) -> Option<HtmlElement> {
    query_all(document, selector).into_iter().nth(index)
}

fn with_data(document: &Document, selector: &str, name: &str, value: &str) -> Option<HtmlElement> {
    query_all(document, selector)
        .into_iter()
        .find(|element| element.get_attribute(name).as_deref() == Some(value))
}

/// Resolves a target against the current document. `None` means the markup
/// does not carry it and the caller skips the operation.
pub fn find(document: &Document, target: &Target) -> Option<HtmlElement> {
    match target {
        Target::Page(id) => by_id(document, id.as_str()),
        Target::NavLink(id) => with_data(document, NAV_LINK, DATA_PAGE, id.as_str()),
        Target::NavMenu => by_id(document, NAV_MENU_ID),
        Target::NavToggle => by_id(document, NAV_TOGGLE_ID),
        Target::Navbar => query_document(document, NAVBAR),
        Target::ProblemCard(id) => with_data(document, PROBLEM_CARD, DATA_SOLUTION, id.as_str()),
        Target::SolutionPanel(id) => {
            with_data(document, SOLUTION_PANEL, DATA_SOLUTION, id.as_str())
        }
        Target::RoadmapContainer => query_document(document, ROADMAP_CONTAINER),
        Target::RoadmapStep(i) => nth(document, ROADMAP_STEP, *i),
        Target::Gallery => query_document(document, GALLERY),
        Target::ImageFrame => by_id(document, PRODUCT_IMAGE_ID)
            .and_then(|image| image.parent_element())
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok()),
        Target::ProductImage => by_id(document, PRODUCT_IMAGE_ID),
        Target::ProductTitle => by_id(document, PRODUCT_TITLE_ID),
        Target::ProductDesc => by_id(document, PRODUCT_DESC_ID),
        Target::ProductButton(i) => nth(document, PRODUCT_BUTTON, *i),
        Target::ConstructionSection => query_document(document, CONSTRUCTION_SECTION),
        Target::ConstructionItem(i) => nth(document, CONSTRUCTION_ITEM, *i),
        Target::ConstructionHeader(i) => {
            nth(document, CONSTRUCTION_ITEM, *i).and_then(|item| query(&item, CONSTRUCTION_HEADER))
        }
    }
}

/// Reverse lookup for the focusable targets keyboard handlers care about.
pub fn identify(document: &Document, element: &Element) -> Option<Target> {
    let node: &Node = element;
    let headers = query_all(document, CONSTRUCTION_ITEM)
        .into_iter()
        .map(|item| query(&item, CONSTRUCTION_HEADER));
    for (i, header) in headers.enumerate() {
        if header.is_some_and(|header| header.is_same_node(Some(node))) {
            return Some(Target::ConstructionHeader(i));
        }
    }
    query_all(document, PRODUCT_BUTTON)
        .iter()
        .position(|button| button.is_same_node(Some(node)))
        .map(Target::ProductButton)
}

/// Describes which parts of the markup contract this document carries.
pub fn discover(document: &Document) -> SiteLayout {
    let pages = query_all(document, PAGE)
        .iter()
        .map(|page| page.id())
        .filter(|id| !id.is_empty())
        .map(PageId::new)
        .collect();
    let solutions = query_all(document, PROBLEM_CARD)
        .iter()
        .filter_map(|card| card.get_attribute(DATA_SOLUTION))
        .map(SolutionId::new)
        .collect();

    SiteLayout {
        pages,
        solutions,
        has_solution_panels: query_document(document, SOLUTION_PANEL).is_some(),
        roadmap_steps: query_all(document, ROADMAP_STEP).len(),
        product_buttons: query_all(document, PRODUCT_BUTTON).len(),
        has_product_image: by_id(document, PRODUCT_IMAGE_ID).is_some(),
        construction_items: query_all(document, CONSTRUCTION_ITEM).len(),
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
#[path = "tests/dom_tests.rs"]
mod tests;
