//! Handler trait and type erasure.
//!
//! Every todo endpoint in [`crate::api`] takes the shared `Arc<Todos<S>>`
//! alongside the request. `api::with` binds that `Arc` into a closure, so what
//! reaches the router is a plain `Fn(Request) -> Fut`. The router then keeps
//! all of those closures, whatever their concrete type, behind
//! `dyn ErasedHandler`:
//!
//! ```text
//! async fn toggle(todos: Arc<Todos<S>>, req: Request) -> Result<Json<Todo>, ApiError>
//!        ↓ api::with(&todos, toggle)
//! move |req| toggle(Arc::clone(&todos), req)   ← capturing closure, a Handler
//!        ↓ router.on(Method::Put, "/api/todos/{id}", ..)
//! Arc::new(FnHandler(closure))                 ← stored as BoxedHandler
//!        ↓ handler.call(req) per request
//! toggle(..).await.into_response()             ← ApiError becomes 404/400/500
//! ```
//!
//! `health::liveness` needs no state and is registered as a bare `async fn`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A boxed future resolving to a [`Response`]. `Send + 'static` so tokio can
/// move it between worker threads.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared by every connection task.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Satisfied by any `Fn(Request) -> impl Future<Output = impl IntoResponse>`.
/// Stateful endpoints get there by capturing the service in the closure, the
/// way `api::with` does:
///
/// ```rust
/// use std::sync::Arc;
/// use todo_api::{Json, MemoryStore, Method, Request, Router, Todos};
///
/// let todos = Arc::new(Todos::new(MemoryStore::new()));
/// let app = Router::new().on(Method::Get, "/api/todos", move |_req: Request| {
///     let todos = Arc::clone(&todos);
///     async move { todos.list().await.map(Json) }
/// });
/// ```
///
/// The trait is sealed; only the blanket impl below satisfies it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
