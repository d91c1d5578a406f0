//! Firestore Repository
//!
//! Bindings to the Firebase compat SDK (`firebase.firestore()`), which the
//! host page loads before the wasm module.

use async_trait::async_trait;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::document::TodoDocument;
use super::traits::{Snapshot, Subscription, SnapshotCallback, TodoRepository};
use crate::board::Placement;
use crate::error::{TodoError, TodoResult};
use crate::models::{Status, Todo, TodoId};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = firebase, js_name = initializeApp, catch)]
    fn initialize_app(config: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = firebase, js_name = firestore, catch)]
    fn firestore() -> Result<Firestore, JsValue>;

    type Firestore;

    #[wasm_bindgen(method)]
    fn collection(this: &Firestore, path: &str) -> CollectionReference;

    #[wasm_bindgen(method)]
    fn batch(this: &Firestore) -> WriteBatch;

    type CollectionReference;

    #[wasm_bindgen(method)]
    fn doc(this: &CollectionReference, id: &str) -> DocumentReference;

    #[wasm_bindgen(method, js_name = onSnapshot)]
    fn on_snapshot(
        this: &CollectionReference,
        on_next: &Closure<dyn FnMut(QuerySnapshot)>,
        on_error: &Closure<dyn FnMut(JsValue)>,
    ) -> js_sys::Function;

    type DocumentReference;

    #[wasm_bindgen(method, catch, js_name = set)]
    async fn set_doc(this: &DocumentReference, data: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = update)]
    async fn update_doc(this: &DocumentReference, data: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = delete)]
    async fn delete_doc(this: &DocumentReference) -> Result<JsValue, JsValue>;

    type QuerySnapshot;

    #[wasm_bindgen(method, getter)]
    fn docs(this: &QuerySnapshot) -> js_sys::Array;

    type QueryDocumentSnapshot;

    #[wasm_bindgen(method, getter)]
    fn id(this: &QueryDocumentSnapshot) -> String;

    #[wasm_bindgen(method)]
    fn data(this: &QueryDocumentSnapshot) -> JsValue;

    type WriteBatch;

    #[wasm_bindgen(method, js_name = update)]
    fn update_in_batch(this: &WriteBatch, doc: &DocumentReference, data: JsValue) -> WriteBatch;

    #[wasm_bindgen(method, catch)]
    async fn commit(this: &WriteBatch) -> Result<JsValue, JsValue>;
}

/// Firebase web app settings, as given by the Firebase console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl FirebaseConfig {
    pub fn validate(&self) -> TodoResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(TodoError::Config("firebase.projectId is empty".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(TodoError::Config("firebase.apiKey is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct NameUpdate<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct PlacementUpdate {
    status: Status,
    position: u32,
    #[serde(rename = "isDone")]
    is_done: bool,
}

fn js_error(e: JsValue) -> TodoError {
    let message = e
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(&e, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", e));
    TodoError::Remote(message)
}

fn decode_snapshot(snapshot: &QuerySnapshot) -> Snapshot {
    snapshot
        .docs()
        .iter()
        .filter_map(|value| {
            let doc: QueryDocumentSnapshot = value.unchecked_into();
            let id = doc.id();
            match serde_wasm_bindgen::from_value::<TodoDocument>(doc.data()) {
                Ok(fields) => Some(fields.into_todo(TodoId::new(id))),
                Err(e) => {
                    warn!("[SYNC] Skipping malformed document {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

/// The `todos` collection of a Firebase project
pub struct FirestoreRepository {
    db: Firestore,
    collection: CollectionReference,
}

impl FirestoreRepository {
    /// Initialize the Firebase app once at startup and open `collection`
    pub fn connect(config: &FirebaseConfig, collection: &str) -> TodoResult<Self> {
        config.validate()?;
        let js_config = serde_wasm_bindgen::to_value(config)?;
        initialize_app(js_config).map_err(js_error)?;
        let db = firestore().map_err(js_error)?;
        let collection = db.collection(collection);
        Ok(Self { db, collection })
    }

    fn doc(&self, id: &TodoId) -> DocumentReference {
        self.collection.doc(id.as_str())
    }
}

#[async_trait(?Send)]
impl TodoRepository for FirestoreRepository {
    async fn add(&self, todo: &Todo, position: u32) -> TodoResult<()> {
        let data = serde_wasm_bindgen::to_value(&TodoDocument::from_todo(todo, position))?;
        self.doc(&todo.id).set_doc(data).await.map_err(js_error)?;
        Ok(())
    }

    async fn rename(&self, id: &TodoId, name: &str) -> TodoResult<()> {
        let data = serde_wasm_bindgen::to_value(&NameUpdate { name })?;
        self.doc(id).update_doc(data).await.map_err(js_error)?;
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> TodoResult<()> {
        self.doc(id).delete_doc().await.map_err(js_error)?;
        Ok(())
    }

    async fn save_placements(&self, placements: &[Placement]) -> TodoResult<()> {
        if placements.is_empty() {
            return Ok(());
        }
        let batch = self.db.batch();
        for placement in placements {
            let data = serde_wasm_bindgen::to_value(&PlacementUpdate {
                status: placement.status,
                position: placement.position,
                is_done: placement.is_done,
            })?;
            batch.update_in_batch(&self.doc(&placement.id), data);
        }
        batch.commit().await.map_err(js_error)?;
        Ok(())
    }

    fn subscribe(&self, on_snapshot: SnapshotCallback) -> TodoResult<Subscription> {
        let on_next = Closure::<dyn FnMut(QuerySnapshot)>::new(move |snapshot: QuerySnapshot| {
            on_snapshot(decode_snapshot(&snapshot));
        });
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |e: JsValue| {
            error!("[SYNC] Live query failed: {}", js_error(e));
        });

        let unsubscribe = self.collection.on_snapshot(&on_next, &on_error);

        // The closures must outlive the listener
        Ok(Subscription::new(move || {
            let _ = unsubscribe.call0(&JsValue::NULL);
            drop(on_next);
            drop(on_error);
        }))
    }
}
