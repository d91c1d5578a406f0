//! New Item Form Component
//!
//! Text input plus submit button that appends a todo to the backlog.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::AppContext;

/// Form for creating new backlog items
#[component]
pub fn NewItemForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (name, set_name) = signal(String::new());

    let add_todo = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = name.get_untracked();
        // Shown immediately; the input clears once the remote write lands
        if let Some(intent) = ctx.apply(|c| c.add_item(&text)) {
            ctx.sync(intent, move || set_name.set(String::new()));
        }
    };

    view! {
        <form class="new-item-form" on:submit=add_todo>
            <div class="new-item-row">
                <input
                    type="text"
                    placeholder="Add a new todo"
                    prop:value=move || name.get()
                    on:input=move |ev| {
                        if let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) {
                            set_name.set(input.value());
                        }
                    }
                />
                <button type="submit">"Add"</button>
            </div>
        </form>
    }
}
