//! Kanban Todo App
//!
//! Root component: wires storage, the remote repository and the store
//! together, then lays out header, form and board.

use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use reactive_stores::Store;

use crate::board::Board;
use crate::components::{NewItemForm, PageHeader, SyncBanner, TodoBoard, ViewSelector};
use crate::config::AppConfig;
use crate::context::{AppContext, Controller};
use crate::repository::{FirestoreRepository, MemoryRepository, TodoRepository};
use crate::storage::{BrowserStorage, KeyValueStore, MemoryStorage};
use crate::store::{store_total, BoardState};

const DOCUMENT_TITLE: &str = "Dr.Tail Work Progress";

fn open_storage() -> Box<dyn KeyValueStore> {
    match BrowserStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            warn!("[STORAGE] {}; keeping the board in memory only", e);
            Box::new(MemoryStorage::new())
        }
    }
}

/// Firestore when configured, otherwise an in-memory collection seeded from
/// the local board so the first snapshot does not clear it
fn connect_repository(config: &AppConfig, board: &Board) -> Rc<dyn TodoRepository> {
    if let Some(firebase) = &config.firebase {
        match FirestoreRepository::connect(firebase, &config.collection) {
            Ok(repo) => {
                info!("[SYNC] Connected to collection '{}'", config.collection);
                return Rc::new(repo);
            }
            Err(e) => warn!("[SYNC] {}; running local-only", e),
        }
    } else {
        info!("[SYNC] No remote configured; running local-only");
    }
    Rc::new(MemoryRepository::seeded(board))
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        doc.set_title(DOCUMENT_TITLE);
    }

    let controller = Controller::new(open_storage());
    let repository = connect_repository(&config, controller.board());

    let store = Store::new(BoardState::default());
    let ctx = AppContext::new(controller, repository, config.sync, store, signal(None));
    provide_context(ctx);
    ctx.publish();

    // Live remote query for the lifetime of the app
    let subscription = StoredValue::new_local(ctx.subscribe());
    on_cleanup(move || {
        if let Some(sub) = subscription.try_update_value(Option::take).flatten() {
            sub.unsubscribe();
        }
    });

    view! {
        <div class="app-layout">
            <PageHeader />
            <main class="main-content">
                <NewItemForm />
                <ViewSelector store=store />
                <SyncBanner />
                <TodoBoard store=store />
            </main>
            <footer class="app-footer">
                {move || format!("{} todos", store_total(&store))}
            </footer>
        </div>
    }
}
