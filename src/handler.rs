//! Handler trait and type erasure.
//!
//! The router stores handlers of different concrete types side by side, so
//! each one is boxed behind [`ErasedHandler`]:
//!
//! ```text
//! async fn index(req: Request, store: Arc<dyn PostStore>) -> … ← handler
//!        ↓ with_state(store, index)
//! move |req| index(req, store.clone())                       ← Fn(Request) -> Fut
//!        ↓ into_boxed_handler()
//! Arc<dyn ErasedHandler>                                     ← stored in the tree
//!        ↓ handler.call(req) at request time
//! Box::pin(async { fut.await.into_response() })
//! ```
//!
//! Per request that costs one `Arc` clone of the handler, one clone of the
//! state and one virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Satisfied automatically by any `async fn(Request) -> impl IntoResponse`
/// (or closure of that shape). Handlers that need shared state are adapted
/// with [`with_state`]. The trait is sealed.
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

/// Binds `state` to a two-argument handler, producing a [`Handler`].
///
/// The state is cloned once per request, so it should be cheap to clone
/// (an `Arc`, a pool handle).
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use blogs::{with_state, Method, Request, Response, Router};
/// async fn hello(_req: Request, greeting: Arc<str>) -> Response {
///     Response::text(greeting.to_string())
/// }
///
/// let greeting: Arc<str> = Arc::from("hi");
/// Router::new().on(Method::Get, "/", with_state(greeting, hello));
/// ```
pub fn with_state<S, F, Fut, R>(state: S, handler: F) -> impl Handler
where
    S: Clone + Send + Sync + 'static,
    F: Fn(Request, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    move |req: Request| handler(req, state.clone())
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
