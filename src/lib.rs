//! # blogs
//!
//! A small server-rendered blog. Posts can be listed, written, read, edited
//! and deleted through eight RESTful routes; see [`blogs`] for the table.
//!
//! The pieces:
//!
//! - An HTTP layer on hyper with radix-tree routing via [`matchit`], a
//!   `_method` override so plain HTML forms can send PUT and DELETE, and
//!   graceful shutdown on SIGTERM / Ctrl-C.
//! - A [`PostStore`] trait with an in-memory and a PostgreSQL backend. The
//!   store is handed to the router explicitly; there is no global
//!   connection.
//! - A [`sanitize`](sanitize::sanitize) pass that strips markup from post
//!   bodies before they are stored, and [`views`] that escape on render.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blogs::{MemoryStore, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = blogs::routes(Arc::new(MemoryStore::new()));
//!     Server::bind("127.0.0.1:3000".parse().unwrap()).serve(app).await.unwrap();
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod blogs;
pub mod config;
pub mod form;
pub mod health;
pub mod logging;
pub mod post;
pub mod sanitize;
pub mod store;
pub mod views;

pub use blogs::{AppError, Store, routes};
pub use error::Error;
pub use handler::{Handler, with_state};
pub use method::Method;
pub use post::{NewPost, Post, PostChanges, PostId};
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{MemoryStore, PgStore, PostStore, StoreError};
