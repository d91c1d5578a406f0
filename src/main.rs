//! Kanban Todo Frontend Entry Point

mod app;
mod board;
mod components;
mod config;
mod context;
mod controller;
mod error;
mod models;
mod repository;
mod storage;
mod store;
mod sync;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match AppConfig::from_document() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Err(e) = rolling_logger::init_logger("Todo", config.log_capacity, config.level_filter()) {
        web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
    }
    if let Some(e) = config_error {
        log::warn!("[CONFIG] {}; using defaults", e);
    }

    mount_to_body(move || view! { <App config=config.clone() /> });
}
