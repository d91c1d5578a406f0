//! Sync Banner Component
//!
//! Shows the last remote write that failed and was reverted.

use leptos::prelude::*;
use log::Level;

use crate::context::AppContext;

#[component]
pub fn SyncBanner() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (show_details, set_show_details) = signal(false);

    // Recent warnings and errors from the in-memory log buffer
    let details = move || {
        rolling_logger::recent_records()
            .into_iter()
            .rev()
            .filter(|entry| entry.level <= Level::Warn)
            .take(5)
            .map(|entry| view! { <li>{entry.format_line("Todo")}</li> })
            .collect_view()
    };

    view! {
        <Show when=move || ctx.sync_error.get().is_some()>
            <div class="sync-banner" role="alert">
                <span class="sync-banner-message">
                    {move || ctx.sync_error.get().unwrap_or_default()}
                </span>
                <button
                    type="button"
                    class="sync-banner-details"
                    on:click=move |_| set_show_details.update(|v| *v = !*v)
                >
                    {move || if show_details.get() { "Hide details" } else { "Details" }}
                </button>
                <button
                    type="button"
                    class="sync-banner-dismiss"
                    on:click=move |_| {
                        set_show_details.set(false);
                        ctx.dismiss_sync_error();
                    }
                >
                    "×"
                </button>
                <Show when=move || show_details.get()>
                    <ul class="sync-banner-log">{details}</ul>
                </Show>
            </div>
        </Show>
    }
}
