//! Leptos DragDrop Utilities
//!
//! Simple list-to-list drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag.
//!
//! Items live in zones (columns) keyed by `Z`. Dropping reports a
//! [`DropResult`] with the source location and an optional destination,
//! where `None` means the drag was released outside every zone.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// A position inside a zone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragLocation<Z> {
    pub zone: Z,
    pub index: usize,
}

impl<Z> DragLocation<Z> {
    pub fn new(zone: Z, index: usize) -> Self {
        Self { zone, index }
    }
}

/// Outcome of a finished drag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropResult<Z> {
    pub source: DragLocation<Z>,
    pub destination: Option<DragLocation<Z>>,
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals<Z: Send + Sync + 'static> {
    pub dragging_read: ReadSignal<Option<DragLocation<Z>>>,
    pub dragging_write: WriteSignal<Option<DragLocation<Z>>>,
    /// Hovered insertion point, in display indices (before removal of the dragged item)
    pub drop_target_read: ReadSignal<Option<DragLocation<Z>>>,
    pub drop_target_write: WriteSignal<Option<DragLocation<Z>>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending source (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<DragLocation<Z>>>,
    pub pending_write: WriteSignal<Option<DragLocation<Z>>>,
    /// Start position for movement detection
    pub start_x_read: ReadSignal<i32>,
    pub start_x_write: WriteSignal<i32>,
    pub start_y_read: ReadSignal<i32>,
    pub start_y_write: WriteSignal<i32>,
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

pub fn create_dnd_signals<Z>() -> DndSignals<Z>
where
    Z: Copy + Send + Sync + 'static,
{
    let (dragging_read, dragging_write) = signal(None::<DragLocation<Z>>);
    let (drop_target_read, drop_target_write) = signal(None::<DragLocation<Z>>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None::<DragLocation<Z>>);
    let (start_x_read, start_x_write) = signal(0i32);
    let (start_y_read, start_y_write) = signal(0i32);
    DndSignals {
        dragging_read,
        dragging_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_read,
        pending_write,
        start_x_read,
        start_x_write,
        start_y_read,
        start_y_write,
    }
}

/// Convert a hovered insertion point into the final index after the dragged
/// item has been removed from its source list.
///
/// Hovering item `i` means "insert before item `i`" as currently displayed.
/// Within the same zone every display index past the source shifts down by one.
pub fn resolve_destination<Z: PartialEq>(
    source: &DragLocation<Z>,
    hovered: DragLocation<Z>,
) -> DragLocation<Z> {
    if hovered.zone == source.zone && hovered.index > source.index {
        DragLocation::new(hovered.zone, hovered.index - 1)
    } else {
        hovered
    }
}

/// True while something is dragged over the given zone
pub fn is_over_zone<Z>(dnd: &DndSignals<Z>, zone: Z) -> bool
where
    Z: Copy + PartialEq + Send + Sync + 'static,
{
    dnd.dragging_read.get().is_some()
        && matches!(dnd.drop_target_read.get(), Some(target) if target.zone == zone)
}

/// Outcome of a mouseup: a drop for real drags, `None` for plain clicks.
///
/// Only a real drag suppresses the click that follows the mouseup.
pub fn finish_drag<Z: Copy + PartialEq>(
    dragging: Option<DragLocation<Z>>,
    hovered: Option<DragLocation<Z>>,
) -> Option<DropResult<Z>> {
    dragging.map(|source| DropResult {
        source,
        destination: hovered.map(|target| resolve_destination(&source, target)),
    })
}

/// End drag operation
pub fn end_drag<Z>(dnd: &DndSignals<Z>)
where
    Z: Copy + Send + Sync + 'static,
{
    dnd.dragging_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_write.set(None);
}

/// Swallow clicks for a short moment after a real drag
fn suppress_next_click<Z>(dnd: &DndSignals<Z>)
where
    Z: Copy + Send + Sync + 'static,
{
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable items
/// Records pending drag with start position
pub fn make_on_mousedown<Z>(dnd: DndSignals<Z>, source: DragLocation<Z>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Z: Copy + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() == 0 {
            // Ignore if target is input or button
            if let Some(target) = ev.target() {
                if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
                if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            }
            dnd.pending_write.set(Some(source));
            dnd.start_x_write.set(ev.client_x());
            dnd.start_y_write.set(ev.client_y());
        }
    }
}

/// Create mousemove handler for document - starts drag if moved enough
pub fn bind_global_mousemove<Z>(dnd: DndSignals<Z>)
where
    Z: Copy + Send + Sync + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_read.get_untracked();

        if pending.is_some() && dnd.dragging_read.get_untracked().is_none() {
            let dx = (ev.client_x() - dnd.start_x_read.get_untracked()).abs();
            let dy = (ev.client_y() - dnd.start_y_read.get_untracked()).abs();

            if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                dnd.dragging_write.set(pending);
            }
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        }
    }
    on_mousemove.forget();
}

/// Create mouseenter handler for items: hovering item `index` targets the slot before it
pub fn make_on_item_mouseenter<Z>(dnd: DndSignals<Z>, zone: Z, index: usize) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Z: Copy + Send + Sync + 'static,
{
    make_on_zone_mouseenter(dnd, zone, index)
}

/// Create mouseenter handler for zones and trailing placeholders
pub fn make_on_zone_mouseenter<Z>(dnd: DndSignals<Z>, zone: Z, index: usize) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Z: Copy + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.drop_target_write.set(Some(DragLocation::new(zone, index)));
        }
    }
}

/// Create mouseleave handler for zones; leaving a zone clears the target
pub fn make_on_mouseleave<Z>(dnd: DndSignals<Z>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Z: Copy + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection.
///
/// `on_drag_end` runs once per real drag (not for plain clicks), with
/// `destination: None` when released outside any zone.
pub fn bind_global_mouseup<Z, F>(dnd: DndSignals<Z>, on_drag_end: F)
where
    Z: Copy + PartialEq + Send + Sync + 'static,
    F: Fn(DropResult<Z>) + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let outcome = finish_drag(
            dnd.dragging_read.get_untracked(),
            dnd.drop_target_read.get_untracked(),
        );
        end_drag(&dnd);

        // Plain clicks fall through to the element's click handler
        if let Some(result) = outcome {
            suppress_next_click(&dnd);
            on_drag_end(result);
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        }
    }
    on_mouseup.forget();

    // Also bind global mousemove
    bind_global_mousemove(dnd);
}
