//! Todo Board Component
//!
//! Three drop-zone columns (To-Do, In progress, Done) wired to the shared
//! mouse-driven drag-and-drop signals.

use leptos::prelude::*;
use leptos_dragdrop::*;
use log::debug;

use crate::components::TodoItem;
use crate::context::AppContext;
use crate::models::{TodosStatus, TodosView};
use crate::store::{store_list, store_list_len, BoardStore, BoardStateStoreFields};

/// One column of the board
#[component]
fn TodoColumn(
    store: BoardStore,
    zone: TodosStatus,
    dnd: DndSignals<TodosStatus>,
) -> impl IntoView {
    let column_class = move || {
        if is_over_zone(&dnd, zone) { "todo-column dragging-over" } else { "todo-column" }
    };

    // Hovering the trailing slot targets the end of the list
    let on_tail_enter = move |ev: web_sys::MouseEvent| {
        make_on_zone_mouseenter(dnd, zone, store_list_len(&store, zone))(ev)
    };

    let tail_class = move || {
        let len = store_list_len(&store, zone);
        let targeted = dnd.dragging_read.get().is_some()
            && dnd.drop_target_read.get() == Some(DragLocation::new(zone, len));
        if targeted { "todo-placeholder active" } else { "todo-placeholder" }
    };

    view! {
        <section
            class=column_class
            data-zone=zone.as_str()
            on:mouseleave=make_on_mouseleave(dnd)
        >
            <h3 class="todo-column-title">{zone.title()}</h3>
            <div class="todo-column-items">
                <For
                    each=move || store_list(&store, zone).into_iter().enumerate()
                    key=|(index, todo)| (todo.id.clone(), todo.name.clone(), *index)
                    children=move |(index, todo)| {
                        view! { <TodoItem todo=todo zone=zone index=index dnd=dnd /> }
                    }
                />
                <div class=tail_class on:mouseenter=on_tail_enter></div>
            </div>
        </section>
    }
}

/// The Kanban board; renders nothing in the weekly view
#[component]
pub fn TodoBoard(store: BoardStore) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let dnd = create_dnd_signals::<TodosStatus>();
    bind_global_mouseup(dnd, move |result| {
        debug!("[DND] Drop {:?} -> {:?}", result.source, result.destination);
        ctx.apply_and_sync(|c| c.drag_end(&result));
    });

    view! {
        <Show when=move || store.view().get() == TodosView::KanbanView>
            <div class="todo-board">
                {TodosStatus::ALL.into_iter().map(|zone| view! {
                    <TodoColumn store=store zone=zone dnd=dnd />
                }).collect_view()}
            </div>
        </Show>
    }
}
