//! JSON endpoints under `/api/todos`.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/api/todos` | 200, all todos in stored order |
//! | POST | `/api/todos` | 201, the created todo |
//! | PUT | `/api/todos/{id}` | 200, the todo with `completed` flipped |
//! | PATCH | `/api/todos/{id}` | 200, the todo with new text |
//! | DELETE | `/api/todos/{id}` | 200, `{"message":"Todo deleted"}` |
//!
//! Failures are `{"error": "..."}` with 400, 404 or 500.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ApiError;
use crate::health;
use crate::method::Method;
use crate::request::Request;
use crate::response::{Json, Response};
use crate::router::Router;
use crate::service::Todos;
use crate::status::Status;
use crate::store::TodoStore;
use crate::todo::Todo;

/// Builds the full application router: todo endpoints plus health checks.
pub fn router<S: TodoStore>(todos: Arc<Todos<S>>) -> Router {
    Router::new()
        .on(Method::Get,    "/api/todos",      with(&todos, list))
        .on(Method::Post,   "/api/todos",      with(&todos, create))
        .on(Method::Put,    "/api/todos/{id}", with(&todos, toggle))
        .on(Method::Patch,  "/api/todos/{id}", with(&todos, update_text))
        .on(Method::Delete, "/api/todos/{id}", with(&todos, delete))
        .on(Method::Get,    "/healthz",        health::liveness)
        .on(Method::Get,    "/readyz",         with(&todos, health::readiness))
}

/// Adapts a handler that takes the shared service into a plain `Fn(Request)`.
pub(crate) fn with<S, F, Fut>(todos: &Arc<Todos<S>>, f: F) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    S: TodoStore,
    F: Fn(Arc<Todos<S>>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
{
    let todos = Arc::clone(todos);
    move |req| f(Arc::clone(&todos), req)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn list<S: TodoStore>(todos: Arc<Todos<S>>, _req: Request) -> Result<Json<Vec<Todo>>, ApiError> {
    todos.list().await.map(Json)
}

async fn create<S: TodoStore>(todos: Arc<Todos<S>>, req: Request) -> Result<(Status, Json<Todo>), ApiError> {
    let body = body(&req)?;
    let created = todos.create(text_field(&body)).await?;
    Ok((Status::Created, Json(created)))
}

async fn toggle<S: TodoStore>(todos: Arc<Todos<S>>, req: Request) -> Result<Json<Todo>, ApiError> {
    let id = id(&req).ok_or(ApiError::NotFound)?;
    todos.toggle(id).await.map(Json)
}

async fn update_text<S: TodoStore>(todos: Arc<Todos<S>>, req: Request) -> Result<Json<Todo>, ApiError> {
    let body = body(&req)?;
    todos.update_text(id(&req), text_field(&body)).await.map(Json)
}

async fn delete<S: TodoStore>(todos: Arc<Todos<S>>, req: Request) -> Result<Response, ApiError> {
    let id = id(&req).ok_or(ApiError::NotFound)?;
    todos.delete(id).await?;
    Ok(Response::json(br#"{"message":"Todo deleted"}"#.to_vec()))
}

// ── Input helpers ─────────────────────────────────────────────────────────────

/// `None` for an id that does not parse; it cannot name a stored todo.
fn id(req: &Request) -> Option<u64> {
    req.param("id").and_then(|raw| raw.parse().ok())
}

fn body(req: &Request) -> Result<Value, ApiError> {
    req.json().map_err(ApiError::InvalidJson)
}

/// `text` when present and a string; anything else counts as missing.
fn text_field(body: &Value) -> Option<&str> {
    body.get("text").and_then(Value::as_str)
}
