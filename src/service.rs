//! The five todo operations over an injected [`TodoStore`].
//!
//! Each mutating operation runs load → mutate → save under one async gate,
//! so two requests in this process never interleave and lose an update.
//! Several processes sharing a file are still last-write-wins.
//!
//! Store calls block, so every load/save sequence runs on tokio's blocking
//! pool and the runtime workers keep serving other connections.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::ApiError;
use crate::store::TodoStore;
use crate::todo::{self, Todo};

pub struct Todos<S> {
    store: Arc<S>,
    /// Serializes mutations; holds the last id handed out.
    write_gate: Mutex<u64>,
}

impl<S: TodoStore> Todos<S> {
    pub fn new(store: S) -> Self {
        Self { store: Arc::new(store), write_gate: Mutex::new(0) }
    }

    /// Fails only when the store cannot be read.
    pub async fn check_ready(&self) -> Result<(), ApiError> {
        self.blocking(|store| Ok(store.load().map(drop)?)).await
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        self.blocking(|store| Ok(store.load()?)).await
    }

    pub async fn create(&self, text: Option<&str>) -> Result<Todo, ApiError> {
        let text = todo::clean_text(text).ok_or(ApiError::Validation)?;

        let mut last_issued = self.write_gate.lock().await;
        let floor = *last_issued;
        let created = self
            .blocking(move |store| {
                let mut todos = store.load()?;
                let now = Utc::now();
                let id = todo::next_id(&todos, floor, now).ok_or(ApiError::IdsExhausted)?;
                let created = Todo::new(id, text, now);
                todos.push(created.clone());
                store.save(&todos)?;
                Ok(created)
            })
            .await?;
        *last_issued = created.id;

        debug!(id = created.id, "todo created");
        Ok(created)
    }

    pub async fn toggle(&self, id: u64) -> Result<Todo, ApiError> {
        self.modify(id, |t| t.completed = !t.completed).await
    }

    /// `id` is `None` when the caller's id did not parse. Text is validated
    /// before the lookup, so blank text on any id is a validation error.
    pub async fn update_text(&self, id: Option<u64>, text: Option<&str>) -> Result<Todo, ApiError> {
        let text = todo::clean_text(text).ok_or(ApiError::Validation)?;
        let id = id.ok_or(ApiError::NotFound)?;
        self.modify(id, move |t| t.text = text).await
    }

    /// Returns the removed todo.
    pub async fn delete(&self, id: u64) -> Result<Todo, ApiError> {
        let _gate = self.write_gate.lock().await;
        let removed = self
            .blocking(move |store| {
                let mut todos = store.load()?;
                let idx = todos.iter().position(|t| t.id == id).ok_or(ApiError::NotFound)?;
                let removed = todos.remove(idx);
                store.save(&todos)?;
                Ok(removed)
            })
            .await?;

        debug!(id, "todo deleted");
        Ok(removed)
    }

    async fn modify(
        &self,
        id: u64,
        f: impl FnOnce(&mut Todo) + Send + 'static,
    ) -> Result<Todo, ApiError> {
        let _gate = self.write_gate.lock().await;
        let updated = self
            .blocking(move |store| {
                let mut todos = store.load()?;
                let entry = todos.iter_mut().find(|t| t.id == id).ok_or(ApiError::NotFound)?;
                f(entry);
                let updated = entry.clone();
                store.save(&todos)?;
                Ok(updated)
            })
            .await?;

        debug!(id, completed = updated.completed, "todo updated");
        Ok(updated)
    }

    /// Runs `f` against the store on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, ApiError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(ApiError::Task)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::store::MemoryStore;

    fn todos() -> Todos<MemoryStore> {
        Todos::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn create_trims_and_starts_incomplete() {
        let svc = todos();
        let t = svc.create(Some("  Spaced  ")).await.unwrap();
        assert_eq!(t.text, "Spaced");
        assert!(!t.completed);
        assert_eq!(svc.list().await.unwrap(), vec![t]);
    }

    #[tokio::test]
    async fn create_rejects_missing_or_blank_text() {
        let svc = todos();
        assert!(matches!(svc.create(None).await, Err(ApiError::Validation)));
        assert!(matches!(svc.create(Some(" \t ")).await, Err(ApiError::Validation)));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ids_are_unique_and_order_is_append_order() {
        let svc = todos();
        let a = svc.create(Some("a")).await.unwrap();
        let b = svc.create(Some("b")).await.unwrap();
        let c = svc.create(Some("c")).await.unwrap();
        assert!(a.id < b.id && b.id < c.id);

        let texts: Vec<_> = svc.list().await.unwrap().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn toggle_twice_restores_state() {
        let svc = todos();
        let t = svc.create(Some("flip")).await.unwrap();
        assert!(svc.toggle(t.id).await.unwrap().completed);
        assert!(!svc.toggle(t.id).await.unwrap().completed);
    }

    #[tokio::test]
    async fn update_text_keeps_other_fields() {
        let svc = todos();
        let t = svc.create(Some("old")).await.unwrap();
        svc.toggle(t.id).await.unwrap();

        let updated = svc.update_text(Some(t.id), Some("  new ")).await.unwrap();
        assert_eq!(updated.text, "new");
        assert!(updated.completed);
        assert_eq!(updated.created_at, t.created_at);
    }

    #[tokio::test]
    async fn update_text_validates_before_lookup() {
        let svc = todos();
        assert!(matches!(svc.update_text(Some(42), Some("")).await, Err(ApiError::Validation)));
        assert!(matches!(svc.update_text(None, Some(" ")).await, Err(ApiError::Validation)));
        assert!(matches!(svc.update_text(Some(42), Some("x")).await, Err(ApiError::NotFound)));
        assert!(matches!(svc.update_text(None, Some("x")).await, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let svc = todos();
        let a = svc.create(Some("a")).await.unwrap();
        let b = svc.create(Some("b")).await.unwrap();
        let c = svc.create(Some("c")).await.unwrap();

        assert_eq!(svc.delete(b.id).await.unwrap(), b);
        assert_eq!(svc.list().await.unwrap(), vec![a, c]);
        assert!(matches!(svc.delete(b.id).await, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn deleted_max_id_is_not_reused() {
        let svc = todos();
        let first = svc.create(Some("a")).await.unwrap();
        svc.delete(first.id).await.unwrap();
        let second = svc.create(Some("b")).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn create_fails_cleanly_when_max_id_is_taken() {
        let taken = Todo::new(u64::MAX, "last".into(), Utc::now());
        let svc = Todos::new(MemoryStore::with_todos(vec![taken.clone()]));

        assert!(matches!(svc.create(Some("next")).await, Err(ApiError::IdsExhausted)));
        assert_eq!(svc.list().await.unwrap(), vec![taken]);
    }

    /// Remembers which threads touched it.
    #[derive(Default)]
    struct ThreadRecorder {
        inner: MemoryStore,
        threads: std::sync::Mutex<Vec<std::thread::ThreadId>>,
    }

    impl ThreadRecorder {
        fn record(&self) {
            self.threads.lock().unwrap().push(std::thread::current().id());
        }
    }

    impl TodoStore for ThreadRecorder {
        fn load(&self) -> Result<Vec<Todo>, StorageError> {
            self.record();
            self.inner.load()
        }

        fn save(&self, todos: &[Todo]) -> Result<(), StorageError> {
            self.record();
            self.inner.save(todos)
        }
    }

    #[tokio::test]
    async fn store_io_runs_off_the_runtime_thread() {
        let svc = Todos::new(ThreadRecorder::default());
        let t = svc.create(Some("a")).await.unwrap();
        svc.toggle(t.id).await.unwrap();
        svc.update_text(Some(t.id), Some("b")).await.unwrap();
        svc.list().await.unwrap();
        svc.check_ready().await.unwrap();
        svc.delete(t.id).await.unwrap();

        // `#[tokio::test]` drives everything on this one thread.
        let runtime_thread = std::thread::current().id();
        let threads = svc.store.threads.lock().unwrap();
        assert!(!threads.is_empty());
        assert!(threads.iter().all(|id| *id != runtime_thread));
    }

    #[tokio::test]
    async fn concurrent_creates_are_all_kept() {
        let svc = std::sync::Arc::new(todos());
        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..20 {
            let svc = std::sync::Arc::clone(&svc);
            tasks.spawn(async move { svc.create(Some(&format!("todo {i}"))).await });
        }
        while let Some(res) = tasks.join_next().await {
            res.unwrap().unwrap();
        }
        assert_eq!(svc.list().await.unwrap().len(), 20);
    }
}
