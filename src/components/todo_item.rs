//! Todo Item Component
//!
//! One draggable row: name (or inline editor) plus edit, delete and done buttons.

use leptos::html;
use leptos::prelude::*;
use leptos_dragdrop::*;

use crate::board::can_begin_edit;
use crate::context::AppContext;
use crate::models::{Todo, TodosStatus};

/// A single todo row inside a column
#[component]
pub fn TodoItem(
    todo: Todo,
    zone: TodosStatus,
    index: usize,
    dnd: DndSignals<TodosStatus>,
    #[prop(default = true)] has_done_icon: bool,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let name = todo.name.clone();
    let item = StoredValue::new(todo);
    let (editing, set_editing) = signal(false);
    let (edit_name, set_edit_name) = signal(name.clone());
    let input_ref = NodeRef::<html::Input>::new();

    // Focus the inline editor once it is mounted
    Effect::new(move |_| {
        if editing.get() {
            if let Some(input) = input_ref.get() {
                let _ = input.focus();
            }
        }
    });

    let begin_edit = move |_| {
        // The click that ends a drag is not an edit request
        if dnd.drag_just_ended_read.get_untracked() {
            return;
        }
        if item.with_value(|t| can_begin_edit(t, editing.get_untracked())) {
            set_edit_name.set(item.with_value(|t| t.name.clone()));
            set_editing.set(true);
        }
    };

    let submit_rename = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let id = item.with_value(|t| t.id.clone());
        let new_name = edit_name.get_untracked();
        ctx.apply_and_sync(|c| c.rename(&id, &new_name));
        set_editing.set(false);
    };

    let delete = move |_| {
        let id = item.with_value(|t| t.id.clone());
        ctx.apply_and_sync(|c| c.delete(&id));
    };

    let toggle_done = move |_| {
        let id = item.with_value(|t| t.id.clone());
        ctx.apply_and_sync(|c| c.toggle_done(&id));
    };

    // DnD handlers
    let here = DragLocation::new(zone, index);
    let on_mousedown = make_on_mousedown(dnd, here);
    let on_mouseenter = make_on_item_mouseenter(dnd, zone, index);

    let row_class = move || {
        let mut c = String::from("todo-item");
        if dnd.dragging_read.get() == Some(here) { c.push_str(" dragging"); }
        if dnd.dragging_read.get().is_some() && dnd.drop_target_read.get() == Some(here) {
            c.push_str(" drop-before");
        }
        if editing.get() { c.push_str(" editing"); }
        c
    };

    let done_title = if zone == TodosStatus::CompletedTodos { "Reopen" } else { "Mark done" };

    view! {
        <form
            class=row_class
            on:submit=submit_rename
            on:mousedown=on_mousedown
            on:mouseenter=on_mouseenter
        >
            {move || if editing.get() {
                view! {
                    <input
                        node_ref=input_ref
                        class="todo-edit-input"
                        type="text"
                        prop:value=move || edit_name.get()
                        on:input=move |ev| set_edit_name.set(event_target_value(&ev))
                    />
                }.into_any()
            } else {
                view! { <span class="todo-name">{name.clone()}</span> }.into_any()
            }}
            <div class="todo-actions">
                <button type="button" class="todo-action edit" title="Edit" on:click=begin_edit>"✎"</button>
                <button type="button" class="todo-action delete" title="Delete" on:click=delete>"🗑"</button>
                {has_done_icon.then(|| view! {
                    <button type="button" class="todo-action done" title=done_title on:click=toggle_done>"✓"</button>
                })}
            </div>
        </form>
    }
}
