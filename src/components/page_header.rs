//! Page Header Component
//!
//! Title with the two logos.

use leptos::prelude::*;

/// Served from `public/`, copied into the bundle by Trunk
const LEFT_LOGO: &str = "public/website_logo.png";
const RIGHT_LOGO: &str = "public/O_LOGO.png";

#[component]
pub fn PageHeader() -> impl IntoView {
    view! {
        <header class="page-header">
            <div class="page-header-brand">
                <img src=LEFT_LOGO class="page-header-logo" alt="Left Logo" width="50" height="50" />
                <h2 class="page-header-title">"To-do"</h2>
            </div>
            <img src=RIGHT_LOGO class="page-header-logo" alt="Right Logo" width="50" height="50" />
        </header>
    }
}
