//! In-memory todo service speaking the same REST resource as the real
//! backend: collection at `/api/todos/`, items at `/api/todos/{id}/`.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub const TITLE_MAX_LEN: usize = 200;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Pending,
    Completed,
}

impl Status {
    fn display(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Pending => "Pending",
            Status::Completed => "Completed",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub status_display: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
}

#[derive(Default)]
pub struct Db {
    next_id: i64,
    todos: BTreeMap<i64, Todo>,
}

pub type SharedDb = Arc<RwLock<Db>>;

pub fn app() -> Router {
    let db: SharedDb = Arc::new(RwLock::new(Db::default()));
    Router::new()
        .route("/api/todos/", get(list_todos).post(create_todo))
        .route("/api/todos/{id}/", get(get_todo).put(update_todo).delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn validate_title(title: &str) -> Result<String, StatusCode> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_LEN {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(title.to_string())
}

async fn list_todos(State(db): State<SharedDb>) -> Json<Vec<Todo>> {
    let db = db.read().await;
    Json(db.todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<SharedDb>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    let title = validate_title(&input.title)?;
    let mut db = db.write().await;
    db.next_id += 1;
    let now = Utc::now();
    let todo = Todo {
        id: db.next_id,
        title,
        description: input.description.trim().to_string(),
        status: input.status,
        status_display: input.status.display().to_string(),
        created_at: now,
        updated_at: now,
    };
    db.todos.insert(todo.id, todo.clone());
    tracing::debug!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(db): State<SharedDb>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, StatusCode> {
    let db = db.read().await;
    db.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<SharedDb>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let title = input.title.as_deref().map(validate_title).transpose()?;
    let mut db = db.write().await;
    let todo = db.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = description.trim().to_string();
    }
    if let Some(status) = input.status {
        todo.status = status;
        todo.status_display = status.display().to_string();
    }
    todo.updated_at = Utc::now();
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<SharedDb>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut db = db.write().await;
    db.todos
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
