//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A path that matches under
//! some other method is answered with `405` and an `allow` header; a path that
//! matches nowhere gets `404`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    // BTreeMap keeps the `allow` header in a stable order.
    routes: BTreeMap<Method, MatchitRouter<BoxedHandler>>,
}

/// Outcome of a route lookup.
pub(crate) enum Route {
    Found(Method, BoxedHandler, HashMap<String, String>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: BTreeMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax and are read with `req.param("name")`.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or collides with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(&self, method: Option<Method>, path: &str) -> Route {
        if let Some(method) = method {
            if let Some(matched) = self.routes.get(&method).and_then(|tree| tree.at(path).ok()) {
                let handler = Arc::clone(matched.value);
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                return Route::Found(method, handler, params);
            }
        }

        let allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        if allowed.is_empty() { Route::NotFound } else { Route::MethodNotAllowed(allowed) }
    }

    /// Routes one buffered request and produces its response.
    pub async fn handle(
        &self,
        method: &http::Method,
        path: &str,
        headers: http::HeaderMap,
        body: Bytes,
    ) -> Response {
        match self.lookup(Method::try_from(method).ok(), path) {
            Route::Found(method, handler, params) => {
                handler.call(Request::new(method, path.to_owned(), headers, body, params)).await
            }
            Route::MethodNotAllowed(allowed) => {
                let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
                let mut res = Response::error(Status::MethodNotAllowed, "Method not allowed");
                res.headers.push(("allow".to_owned(), allow));
                res
            }
            Route::NotFound => Response::error(Status::NotFound, "Not found"),
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
