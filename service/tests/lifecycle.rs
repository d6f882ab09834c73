//! Store lifetime across a served process.
//!
//! Wraps `MemoryStore` in a store that counts `close` calls and records
//! whether any operation ran after close, then drives real HTTP requests
//! through `serve` before triggering shutdown.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use todo_service::config::{AuthSettings, ReplaceSuccess, TokenCheck};
use todo_service::store::{MemoryStore, ReplaceOutcome, StoreError, TodoStore};
use todo_service::{AppState, TodoId, TodoItem};

#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    operations: AtomicUsize,
    closes: AtomicUsize,
    used_after_close: AtomicBool,
}

impl CountingStore {
    fn record(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
        if self.closes.load(Ordering::SeqCst) > 0 {
            self.used_after_close.store(true, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl TodoStore for CountingStore {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        self.record();
        self.inner.list().await
    }

    async fn insert(&self, item: TodoItem) -> Result<TodoId, StoreError> {
        self.record();
        self.inner.insert(item).await
    }

    async fn find(&self, id: TodoId) -> Result<Option<TodoItem>, StoreError> {
        self.record();
        self.inner.find(id).await
    }

    async fn replace(&self, id: TodoId, item: TodoItem) -> Result<ReplaceOutcome, StoreError> {
        self.record();
        self.inner.replace(id, item).await
    }

    async fn delete(&self, id: TodoId) -> Result<u64, StoreError> {
        self.record();
        self.inner.delete(id).await
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn store_closed_once_after_shutdown() {
    let store = Arc::new(CountingStore::default());
    let auth = AuthSettings {
        username: "admin".to_string(),
        password: "hunter2".to_string(),
        access_token: "secret_token".to_string(),
        token_check: TokenCheck::Exact,
    };
    let state = AppState::new(store.clone(), auth, ReplaceSuccess::Matched);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(todo_service::serve(listener, state, async move {
        stop_rx.await.ok();
    }));

    tokio::task::spawn_blocking(move || {
        for n in 0..3 {
            let body = format!(r#"{{"n":{n}}}"#);
            ureq::post(&format!("{base}/todos"))
                .header("authorization", "Bearer secret_token")
                .content_type("application/json")
                .send(body.as_bytes())
                .unwrap();
        }
        let mut response = ureq::get(&format!("{base}/todos"))
            .header("authorization", "Bearer secret_token")
            .call()
            .unwrap();
        let body = response.body_mut().read_to_string().unwrap();
        let todos: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(todos.len(), 3);
    })
    .await
    .unwrap();

    assert_eq!(store.closes.load(Ordering::SeqCst), 0, "closed while serving");
    assert_eq!(store.operations.load(Ordering::SeqCst), 4);

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();

    assert_eq!(store.closes.load(Ordering::SeqCst), 1);
    assert!(!store.used_after_close.load(Ordering::SeqCst));
}
