//! View Selector Component
//!
//! Buttons switching between board layouts.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::TodosView;
use crate::store::{BoardState, BoardStateStoreFields};

/// View selector buttons
#[component]
pub fn ViewSelector(store: Store<BoardState>) -> impl IntoView {
    view! {
        <div class="view-selector">
            {TodosView::ALL.into_iter().map(|view| {
                let is_selected = move || store.view().get() == view;
                view! {
                    <button
                        type="button"
                        class=move || if is_selected() { "view-btn active" } else { "view-btn" }
                        on:click=move |_| store.view().set(view)
                    >
                        {view.label()}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
