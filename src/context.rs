//! Application Context
//!
//! Shared state provided via Leptos Context API: the board controller, the
//! injected remote repository and the rendered store.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};

use crate::controller::BoardController;
use crate::repository::{Subscription, TodoRepository};
use crate::storage::KeyValueStore;
use crate::store::{store_set_board, BoardStore};
use crate::sync::{self, SyncPolicy, WriteIntent};

pub type Controller = BoardController<Box<dyn KeyValueStore>>;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    controller: StoredValue<Controller, LocalStorage>,
    repository: StoredValue<Rc<dyn TodoRepository>, LocalStorage>,
    policy: SyncPolicy,
    /// Rendered board
    pub store: BoardStore,
    /// Last remote write that failed and was reverted - read
    pub sync_error: ReadSignal<Option<String>>,
    /// Last remote write that failed and was reverted - write
    set_sync_error: WriteSignal<Option<String>>,
}

impl AppContext {
    pub fn new(
        controller: Controller,
        repository: Rc<dyn TodoRepository>,
        policy: SyncPolicy,
        store: BoardStore,
        sync_error: (ReadSignal<Option<String>>, WriteSignal<Option<String>>),
    ) -> Self {
        Self {
            controller: StoredValue::new_local(controller),
            repository: StoredValue::new_local(repository),
            policy,
            store,
            sync_error: sync_error.0,
            set_sync_error: sync_error.1,
        }
    }

    /// Push the controller's board into the store
    pub fn publish(&self) {
        if let Some(board) = self.controller.try_with_value(|c| c.board().clone()) {
            store_set_board(&self.store, board);
        }
    }

    /// Run one board edit, publish the result and return its remote write
    pub fn apply(&self, edit: impl FnOnce(&mut Controller) -> Option<WriteIntent>) -> Option<WriteIntent> {
        let intent = self.controller.try_update_value(edit).flatten();
        if intent.is_some() {
            self.publish();
        }
        intent
    }

    /// Apply an edit and persist it remotely in the background
    pub fn apply_and_sync(&self, edit: impl FnOnce(&mut Controller) -> Option<WriteIntent>) {
        if let Some(intent) = self.apply(edit) {
            self.sync(intent, || {});
        }
    }

    /// Send `intent` with retries. On success run `on_synced`; on final
    /// failure revert the edit and surface the error.
    pub fn sync(&self, intent: WriteIntent, on_synced: impl FnOnce() + 'static) {
        let ctx = *self;
        let Some(repo) = self.repository.try_get_value() else {
            return;
        };
        spawn_local(async move {
            let sleep = |ms| gloo_timers::future::TimeoutFuture::new(ms);
            match sync::dispatch(repo.as_ref(), &intent, &ctx.policy, sleep).await {
                Ok(_) => on_synced(),
                Err(failure) => {
                    let reverted = ctx
                        .controller
                        .try_update_value(|c| c.rollback(&failure.intent))
                        .unwrap_or(false);
                    if reverted {
                        ctx.publish();
                    }
                    ctx.set_sync_error.set(Some(failure.to_string()));
                }
            }
        });
    }

    /// Live query over the remote collection; every snapshot replaces the board
    pub fn subscribe(&self) -> Option<Subscription> {
        let ctx = *self;
        let repo = self.repository.try_get_value()?;
        let result = repo.subscribe(Box::new(move |snapshot| {
            let changed = ctx
                .controller
                .try_update_value(|c| c.apply_snapshot(snapshot))
                .unwrap_or(false);
            if changed {
                ctx.publish();
            }
        }));

        match result {
            Ok(subscription) => {
                info!("[SYNC] Subscribed to remote todos");
                Some(subscription)
            }
            Err(e) => {
                error!("[SYNC] Could not subscribe: {}", e);
                None
            }
        }
    }

    pub fn dismiss_sync_error(&self) {
        self.set_sync_error.set(None);
    }
}
