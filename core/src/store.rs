//! The authoritative in-memory todo collection and its sync with the service.
//!
//! # Design
//! `TodoStore` merges only records the server has echoed back: a create is
//! prepended once the service returns it, an update replaces the entry with
//! the returned record, a delete prunes the entry once the service confirms.
//! Nothing is applied ahead of the response.
//!
//! State sits behind a `RwLock` that is only taken between awaits, so every
//! operation takes `&self` and several may be in flight at once. Racing
//! responses for the same id are merged in the order they resolve.
//!
//! Every failing operation stores a readable message in `last_error` and
//! returns the original `ApiError` to its caller.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::filter::{filter, group_by_status, Criteria, GroupedTodos, StatusCounts};
use crate::service::TodoService;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTodo, Status, Todo, TodoId, UpdateTodo};

/// What an in-flight mutation is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingKey {
    Create,
    Todo(TodoId),
}

#[derive(Debug)]
struct StoreState {
    todos: Vec<Todo>,
    loads_in_flight: usize,
    settled_once: bool,
    last_error: Option<String>,
    pending: HashMap<PendingKey, usize>,
}

pub struct TodoStore<T> {
    service: TodoService<T>,
    state: RwLock<StoreState>,
}

impl<T: Transport> TodoStore<T> {
    /// An empty store that has not fetched yet. `is_loading` starts out true
    /// until the first `load` settles.
    pub fn new(service: TodoService<T>) -> Self {
        Self {
            service,
            state: RwLock::new(StoreState {
                todos: Vec::new(),
                loads_in_flight: 0,
                settled_once: false,
                last_error: None,
                pending: HashMap::new(),
            }),
        }
    }

    /// Build the store and run the initial fetch once. A failed fetch is
    /// left in `last_error`; it is not retried.
    pub async fn connect(service: TodoService<T>) -> Self {
        let store = Self::new(service);
        if store.load().await.is_err() {
            debug!("initial load failed");
        }
        store
    }

    pub fn service(&self) -> &TodoService<T> {
        &self.service
    }

    /// Replace the collection with the server's list. On failure the
    /// previous collection stays as it was. `is_loading` stays true while
    /// any overlapping `load` is still in flight.
    pub async fn load(&self) -> Result<(), ApiError> {
        let _loading = {
            let mut state = self.write();
            state.loads_in_flight += 1;
            state.last_error = None;
            LoadingGuard { state: &self.state }
        };

        let result = self.service.list().await;

        let mut state = self.write();
        state.settled_once = true;
        match result {
            Ok(todos) => {
                info!(count = todos.len(), "loaded todos");
                state.todos = todos;
                Ok(())
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Create on the server, then prepend the returned record.
    pub async fn create(&self, input: CreateTodo) -> Result<Todo, ApiError> {
        self.clear_error();
        let _pending = self.begin(PendingKey::Create);
        let result = self.service.create(&input).await;
        self.settle(result, |todos, created| todos.insert(0, created.clone()))
    }

    /// Update on the server, then swap the returned record in at the same
    /// position. An id that has since left the collection is not re-added.
    pub async fn update(&self, id: TodoId, input: UpdateTodo) -> Result<Todo, ApiError> {
        self.clear_error();
        let _pending = self.begin(PendingKey::Todo(id));
        let result = self.service.update(id, &input).await;
        self.settle(result, |todos, updated| {
            if let Some(slot) = todos.iter_mut().find(|todo| todo.id == id) {
                *slot = updated.clone();
            }
        })
    }

    pub async fn set_status(&self, id: TodoId, status: Status) -> Result<Todo, ApiError> {
        self.update(id, UpdateTodo::status(status)).await
    }

    /// Delete on the server, then drop the entry locally.
    pub async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        self.clear_error();
        let _pending = self.begin(PendingKey::Todo(id));
        let result = self.service.delete(id).await;
        self.settle(result, |todos, _| todos.retain(|todo| todo.id != id))
    }

    /// Snapshot of the collection.
    pub fn todos(&self) -> Vec<Todo> {
        self.read().todos.clone()
    }

    /// Borrow the collection without cloning it.
    pub fn with_todos<R>(&self, f: impl FnOnce(&[Todo]) -> R) -> R {
        f(&self.read().todos)
    }

    pub fn len(&self) -> usize {
        self.read().todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().todos.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        let state = self.read();
        !state.settled_once || state.loads_in_flight > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    pub fn is_pending(&self, key: PendingKey) -> bool {
        self.read().pending.contains_key(&key)
    }

    pub fn has_pending(&self) -> bool {
        !self.read().pending.is_empty()
    }

    pub fn filtered(&self, criteria: &Criteria) -> Vec<Todo> {
        self.with_todos(|todos| filter(todos, criteria))
    }

    pub fn grouped(&self, criteria: &Criteria) -> GroupedTodos {
        group_by_status(&self.filtered(criteria))
    }

    pub fn counts(&self, criteria: &Criteria) -> StatusCounts {
        StatusCounts::from_todos(&self.filtered(criteria))
    }

    fn clear_error(&self) {
        self.write().last_error = None;
    }

    fn settle<R>(
        &self,
        result: Result<R, ApiError>,
        merge: impl FnOnce(&mut Vec<Todo>, &R),
    ) -> Result<R, ApiError> {
        let mut state = self.write();
        match &result {
            Ok(value) => merge(&mut state.todos, value),
            Err(e) => state.last_error = Some(e.to_string()),
        }
        result
    }

    fn begin(&self, key: PendingKey) -> PendingGuard<'_> {
        *self.write().pending.entry(key).or_insert(0) += 1;
        PendingGuard {
            state: &self.state,
            key,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        write_state(&self.state)
    }
}

impl TodoStore<ReqwestTransport> {
    /// Store over HTTP at the configured base URL, with the initial fetch done.
    pub async fn connect_http(config: &ClientConfig) -> Self {
        let service = TodoService::new(TodoClient::from_config(config), ReqwestTransport::new());
        Self::connect(service).await
    }
}

fn write_state(state: &RwLock<StoreState>) -> RwLockWriteGuard<'_, StoreState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// Counts one `load` as in flight until dropped.
struct LoadingGuard<'a> {
    state: &'a RwLock<StoreState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = write_state(self.state);
        state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
    }
}

/// Marks a key pending until dropped, including when the operation's future
/// is dropped before it resolves.
struct PendingGuard<'a> {
    state: &'a RwLock<StoreState>,
    key: PendingKey,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = write_state(self.state);
        if let Some(count) = state.pending.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                state.pending.remove(&self.key);
            }
        }
    }
}
