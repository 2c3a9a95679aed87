//! Task Chain Editor
//!
//! Binds one `<tbody>` of task rows to a [`ReorderSession`]. Browser drag
//! events drive the session, and the table is re-projected from the
//! session's order after every move.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, DragEvent, Element, Event, EventTarget, HtmlElement, MouseEvent,
};

use chain_reorder::{
    commit, EditorConfig, EditorError, EditorResult, Placement, Rank, ReorderSession,
    ReorderTransport,
};

use crate::dom;
use crate::http::GlooTransport;
use crate::notify::Notifier;

/// What the apply/discard controls should look like
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ControlsView {
    visible: bool,
    in_flight: bool,
}

fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static)
where
    E: FromWasmAbi + 'static,
{
    let cb = Closure::<dyn FnMut(E)>::new(handler);
    if target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()).is_err() {
        warn!("could not listen to {}", event);
    }
    cb.forget();
}

fn listen_passive<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static)
where
    E: FromWasmAbi + 'static,
{
    let cb = Closure::<dyn FnMut(E)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    if target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            cb.as_ref().unchecked_ref(),
            &options,
        )
        .is_err()
    {
        warn!("could not listen to {}", event);
    }
    cb.forget();
}

/// Attach an editor to every task table in the page. Returns how many
/// tables became editable.
pub fn attach_all(config: &EditorConfig, notifier: Notifier) -> usize {
    let Some(root) = dom::document().and_then(|d| d.document_element()) else {
        return 0;
    };
    let transport = Rc::new(GlooTransport::new(config.endpoint.clone()));

    let mut attached = 0;
    for tbody in dom::query_all(&root, "table tbody") {
        match ChainEditor::attach(&root, tbody, config, transport.clone(), notifier) {
            Ok(Some(editor)) => {
                info!(
                    "[{}] reorder editor attached ({} tasks, rule {})",
                    editor.chain(),
                    editor.rows.len(),
                    editor.session.borrow().rule_id()
                );
                attached += 1;
            }
            Ok(None) => {}
            Err(err) => warn!("task table left read-only: {}", err),
        }
    }
    attached
}

/// Drag-and-drop editor for one task chain
#[derive(Clone)]
pub struct ChainEditor {
    session: Rc<RefCell<ReorderSession>>,
    tbody: HtmlElement,
    /// Row elements, in the same order as `session.rows()`
    rows: Rc<Vec<HtmlElement>>,
    view: RwSignal<ControlsView>,
    transport: Rc<GlooTransport>,
    notifier: Notifier,
}

impl ChainEditor {
    /// `Ok(None)` when the table holds no task rows
    fn attach(
        root: &Element,
        tbody: HtmlElement,
        config: &EditorConfig,
        transport: Rc<GlooTransport>,
        notifier: Notifier,
    ) -> EditorResult<Option<Self>> {
        let mut rows = Vec::new();
        let mut models = Vec::new();
        for tr in dom::query_all(&tbody, &config.row_selector) {
            match dom::read_row(&tr) {
                Ok(row) => {
                    models.push(row);
                    rows.push(tr);
                }
                Err(err) => warn!("ignoring task row: {}", err),
            }
        }
        if rows.is_empty() {
            return Ok(None);
        }

        let container = tbody
            .closest(&config.container_selector)
            .ok()
            .flatten()
            .unwrap_or_else(|| root.clone());
        let rule_id = container
            .get_attribute("data-rule-id")
            .and_then(|v| v.trim().parse().ok());
        let session = ReorderSession::new(models, rule_id)?;

        let controls = dom::query(&container, &config.controls_selector);
        let cancel = controls.as_ref().and_then(|c| dom::query(c, &config.cancel_selector));
        let apply = controls.as_ref().and_then(|c| dom::query(c, &config.apply_selector));

        let editor = Self {
            session: Rc::new(RefCell::new(session)),
            tbody,
            rows: Rc::new(rows),
            view: RwSignal::new(ControlsView::default()),
            transport,
            notifier,
        };
        editor.bind_controls(controls, cancel, apply);
        editor.bind_rows(config);
        Ok(Some(editor))
    }

    fn chain(&self) -> String {
        self.session.borrow().chain().to_string()
    }

    fn rank_of(&self, slot: usize) -> Rank {
        self.session.borrow().rows()[slot].rank
    }

    fn slot_of(&self, rank: Rank) -> Option<usize> {
        self.session.borrow().rows().iter().position(|r| r.rank == rank)
    }

    fn bind_controls(
        &self,
        controls: Option<HtmlElement>,
        cancel: Option<HtmlElement>,
        apply: Option<HtmlElement>,
    ) {
        let view = self.view;
        let apply_button = apply.clone();
        Effect::new(move |_| {
            let current = view.get();
            if let Some(controls) = &controls {
                dom::set_visible(controls, current.visible);
            }
            if let Some(button) = &apply_button {
                dom::set_disabled(button, current.in_flight);
            }
        });

        if let Some(cancel) = cancel {
            let editor = self.clone();
            listen(&cancel, "click", move |_: MouseEvent| editor.cancel());
        }
        if let Some(apply) = apply {
            let editor = self.clone();
            listen(&apply, "click", move |_: MouseEvent| editor.apply());
        }
    }

    fn bind_rows(&self, config: &EditorConfig) {
        let mut armed_rows = Vec::new();

        for (slot, row) in self.rows.iter().enumerate() {
            // Rows only become draggable while their handle is held
            if let Some(handle) = dom::query(row, &config.handle_selector) {
                let arm = {
                    let row = row.clone();
                    move |_: Event| {
                        let _ = row.set_attribute("draggable", "true");
                    }
                };
                listen(&handle, "mousedown", arm.clone());
                listen_passive(&handle, "touchstart", arm);
                armed_rows.push(row.clone());
            }

            if let Some(button) = dom::query(row, &config.delete_selector) {
                let editor = self.clone();
                let confirm_message = button.get_attribute("data-confirm");
                listen(&button, "click", move |ev: MouseEvent| {
                    ev.prevent_default();
                    ev.stop_propagation();
                    editor.delete(slot, confirm_message.as_deref());
                });
            }

            let editor = self.clone();
            listen(row, "dragstart", move |ev: DragEvent| editor.on_drag_start(slot, &ev));
            let editor = self.clone();
            listen(row, "dragover", move |ev: DragEvent| editor.on_drag_over(slot, &ev));
            let editor = self.clone();
            listen(row, "drop", move |ev: DragEvent| editor.on_drop(slot, &ev));
            let editor = self.clone();
            listen(row, "dragend", move |_: DragEvent| editor.on_drag_end(slot));
        }

        if armed_rows.is_empty() {
            return;
        }
        let Some(document) = dom::document() else { return };
        let disarm = move |_: Event| {
            for row in &armed_rows {
                let _ = row.remove_attribute("draggable");
            }
        };
        listen(&document, "mouseup", disarm.clone());
        listen_passive(&document, "touchend", disarm.clone());
        listen_passive(&document, "touchcancel", disarm);
    }

    fn sync(&self) {
        let session = self.session.borrow();
        self.view.set(ControlsView {
            visible: session.controls_visible(),
            in_flight: session.is_in_flight(),
        });
    }

    fn project(&self) {
        let order = self.session.borrow().order().to_vec();
        let ordered: Vec<&HtmlElement> = order
            .iter()
            .filter_map(|rank| self.slot_of(*rank))
            .map(|slot| &self.rows[slot])
            .collect();
        dom::project_rows(&self.tbody, &self.rows, &ordered);
    }

    fn on_drag_start(&self, slot: usize, ev: &DragEvent) {
        let rank = self.rank_of(slot);
        if let Err(err) = self.session.borrow_mut().begin_drag(rank) {
            warn!("drag start refused: {}", err);
            return;
        }
        if let Some(transfer) = ev.data_transfer() {
            transfer.set_effect_allowed("move");
            // Firefox only starts the drag when some data is set
            let _ = transfer.set_data("text/plain", "");
        }
        dom::show_drag_affordances(&self.rows[slot]);
        self.sync();
    }

    fn on_drag_over(&self, slot: usize, ev: &DragEvent) {
        // Allows the drop
        ev.prevent_default();
        if !self.session.borrow().is_dragging() {
            return;
        }
        if let Some(transfer) = ev.data_transfer() {
            transfer.set_drop_effect("move");
        }

        let rect = self.rows[slot].get_bounding_client_rect();
        let pointer_y = f64::from(ev.client_y());
        let placement = Placement::from_pointer(pointer_y, rect.top(), rect.height());
        let target = self.rank_of(slot);
        let moved = self.session.borrow_mut().drag_over(target, placement);
        match moved {
            Ok(true) => self.project(),
            Ok(false) => {}
            Err(err) => warn!("drag over rank {} ignored: {}", target, err),
        }
    }

    fn on_drop(&self, slot: usize, ev: &DragEvent) {
        ev.prevent_default();
        let target = self.rank_of(slot);
        let dragged = self.session.borrow().dragged();
        let outcome = self.session.borrow_mut().drop_on(target);
        debug!("drop on rank {}: {:?}", target, outcome);

        if let Some(source) = dragged.and_then(|rank| self.slot_of(rank)) {
            dom::clear_drag_affordances(&self.rows[source]);
        }
        self.sync();
    }

    fn on_drag_end(&self, slot: usize) {
        let outcome = self.session.borrow_mut().drag_end();
        debug!("drag end: {:?}", outcome);
        dom::clear_drag_affordances(&self.rows[slot]);
        self.sync();
    }

    /// Restore the rendered order and reload the page from the server
    fn cancel(&self) {
        self.session.borrow_mut().cancel();
        self.project();
        self.sync();
        info!("[{}] changes discarded, reloading", self.chain());
        dom::reload_page();
    }

    fn apply(&self) {
        if self.session.borrow().is_in_flight() {
            warn!("[{}] apply ignored, previous request still pending", self.chain());
            return;
        }
        self.view.update(|v| v.in_flight = true);

        let editor = self.clone();
        spawn_local(async move {
            match commit(&editor.session, editor.transport.as_ref()).await {
                Ok(renumbered) => {
                    debug!("[{}] {} tasks renumbered", editor.chain(), renumbered.len());
                    editor.write_ranks();
                }
                Err(EditorError::Apply(err)) => {
                    editor.notifier.error(err.user_message("reorder the tasks"))
                }
                Err(err) => editor.notifier.error(err.to_string()),
            }
            editor.sync();
        });
    }

    /// Mirror the session's ranks into the rows' `data-rank` attributes
    fn write_ranks(&self) {
        let session = self.session.borrow();
        for (row, model) in self.rows.iter().zip(session.rows()) {
            let _ = row.set_attribute("data-rank", &model.rank.to_string());
        }
    }

    fn delete(&self, slot: usize, confirm_message: Option<&str>) {
        if !dom::confirm(confirm_message.unwrap_or("Delete this task?")) {
            return;
        }

        let rank = self.rank_of(slot);
        let request = match self.session.borrow().delete_request(rank) {
            Ok(request) => request,
            Err(EditorError::ApplyInFlight) => {
                self.notifier
                    .error("Wait for the new task order to be saved before deleting a task");
                return;
            }
            Err(err) => {
                self.notifier.error(err.to_string());
                return;
            }
        };

        let editor = self.clone();
        spawn_local(async move {
            match editor.transport.delete_task(&request).await {
                Ok(()) => {
                    info!("[{}] task {} deleted, reloading", request.chain, request.rank);
                    dom::reload_page();
                }
                Err(err) => editor.notifier.error(err.user_message("delete the task")),
            }
        });
    }
}
