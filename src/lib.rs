//! # todo-api
//!
//! A small JSON service for a todo list kept in one flat file.
//!
//! The crate carries its own thin HTTP layer: a radix-tree [`Router`] built
//! on [`matchit`], a sealed [`Handler`] trait over plain async functions, and
//! a hyper-based [`Server`] with graceful shutdown. On top of it sit the todo
//! model, the [`TodoStore`] abstraction and the five endpoints in [`api`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use todo_api::{FileStore, Server, Todos, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), todo_api::Error> {
//!     let todos = Arc::new(Todos::new(FileStore::new("todos.json")));
//!     Server::bind("127.0.0.1:3000".parse().unwrap())
//!         .await?
//!         .serve(api::router(todos))
//!         .await
//! }
//! ```
//!
//! Every request loads the collection from the store; every mutation writes
//! the whole collection back. Mutations inside one process are serialized.
//! Separate processes sharing a file are last-write-wins.

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod service;
mod status;
mod store;
mod todo;

pub mod api;
pub mod config;
pub mod health;
pub mod logging;

pub use error::{ApiError, Error, StorageError};
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use service::Todos;
pub use status::Status;
pub use store::{FileStore, MemoryStore, TodoStore};
pub use todo::Todo;
