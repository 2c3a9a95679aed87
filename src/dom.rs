//! DOM Helpers
//!
//! Reading the server-rendered markup and projecting model changes back
//! onto it.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node, NodeList};

use chain_reorder::config::CONFIG_ELEMENT_ID;
use chain_reorder::{EditorConfig, EditorResult, Row};

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// Page-provided configuration overrides, if the page has any
pub fn read_config() -> Option<EditorResult<EditorConfig>> {
    let element = document()?.get_element_by_id(CONFIG_ELEMENT_ID)?;
    let json = element.text_content().unwrap_or_default();
    Some(EditorConfig::from_json(&json))
}

fn elements(list: NodeList) -> Vec<HtmlElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// All matches of `selector` under `root`; invalid selectors match nothing
pub fn query_all(root: &Element, selector: &str) -> Vec<HtmlElement> {
    match root.query_selector_all(selector) {
        Ok(list) => elements(list),
        Err(_) => {
            log::warn!("invalid selector {:?}", selector);
            Vec::new()
        }
    }
}

pub fn query(root: &Element, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Row model from the `data-*` attributes of a `<tr>`
pub fn read_row(tr: &Element) -> EditorResult<Row> {
    Row::from_attributes(
        tr.get_attribute("data-task-id"),
        tr.get_attribute("data-chain"),
        tr.get_attribute("data-rank"),
    )
}

pub fn set_visible(el: &HtmlElement, visible: bool) {
    let display = if visible { "inline-block" } else { "none" };
    let _ = el.style().set_property("display", display);
}

pub fn set_disabled(el: &HtmlElement, disabled: bool) {
    let _ = if disabled {
        el.set_attribute("disabled", "")
    } else {
        el.remove_attribute("disabled")
    };
}

/// Drop the drag affordances of a row once its gesture is over
pub fn clear_drag_affordances(el: &HtmlElement) {
    let _ = el.remove_attribute("draggable");
    let _ = el.style().remove_property("cursor");
    let _ = el.class_list().remove_1("dragging");
}

pub fn show_drag_affordances(el: &HtmlElement) {
    let _ = el.style().set_property("cursor", "grabbing");
    let _ = el.class_list().add_1("dragging");
}

/// Index of the child node the rows are re-inserted before: the node
/// right after the last row. `None` appends to the end.
pub fn anchor_index(is_row: &[bool]) -> Option<usize> {
    let last_row = is_row.iter().rposition(|row| *row)?;
    let anchor = last_row + 1;
    (anchor < is_row.len()).then_some(anchor)
}

/// Reorder `rows` inside `tbody` to match the given order. Non-row
/// children that follow the rows stay after them.
pub fn project_rows(tbody: &HtmlElement, rows: &[HtmlElement], ordered: &[&HtmlElement]) {
    let children = tbody.child_nodes();
    let nodes: Vec<Node> = (0..children.length())
        .filter_map(|i| children.get(i))
        .collect();
    let is_row: Vec<bool> = nodes
        .iter()
        .map(|node| rows.iter().any(|row| row.is_same_node(Some(node))))
        .collect();
    let anchor = anchor_index(&is_row).map(|i| &nodes[i]);

    for row in ordered {
        if let Err(err) = tbody.insert_before(row, anchor) {
            log::error!("failed to move row: {:?}", err);
        }
    }
}

pub fn reload_page() {
    let Some(window) = web_sys::window() else { return };
    if let Err(err) = window.location().reload() {
        log::error!("page reload failed: {:?}", err);
    }
}

/// Browser confirmation dialog; a blocked dialog counts as refusal
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
