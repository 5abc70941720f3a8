//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. You register a path, you
//! get a handler. The router also owns the per-request plumbing that sits in
//! front of every handler: the `_method` override shim, 404/405 answers and
//! the one-line access log.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use matchit::Router as MatchitRouter;
use tracing::{Instrument, info, info_span};

use crate::form::Form;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;
use crate::views;

/// Name of the query parameter or form field carrying the override hint.
const OVERRIDE_FIELD: &str = "_method";

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    method_override: bool,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), method_override: true }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    /// Static segments win over parameters, so `/blogs/new` and `/blogs/{id}`
    /// can coexist.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route for
    /// the same method. Routes are fixed at startup, so this is a programming
    /// error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Enables or disables the `_method` override for `POST` requests.
    /// Enabled by default.
    pub fn method_override(mut self, enabled: bool) -> Self {
        self.method_override = enabled;
        self
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Methods that have a route matching `path`, sorted for a stable
    /// `allow` header.
    fn allowed(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();
        methods.sort();
        methods
    }

    /// Resolves the method a request should be routed as.
    ///
    /// Only a physical `POST` can be overridden. The query string is checked
    /// first (that is where HTML forms put it), then the form body.
    fn effective_method(&self, method: Method, query: Option<&str>, body: &[u8]) -> Method {
        if !self.method_override || method != Method::Post {
            return method;
        }
        let from_query = query.and_then(|q| {
            Form::parse(q.as_bytes()).get(OVERRIDE_FIELD).map(str::to_owned)
        });
        let hint = from_query.or_else(|| Form::parse(body).get(OVERRIDE_FIELD).map(str::to_owned));
        hint.as_deref()
            .and_then(Method::from_override)
            .unwrap_or(method)
    }

    /// Routes one buffered request and produces one response. Never fails:
    /// unknown paths become 404, unknown methods 405.
    pub async fn call(&self, req: http::Request<Bytes>) -> Response {
        let started = Instant::now();
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();

        let span = info_span!("request", method = %parts.method, path = %path);
        let response = async {
            let Ok(physical) = Method::try_from(&parts.method) else {
                return not_allowed(self.allowed(&path));
            };
            let method = self.effective_method(physical, parts.uri.query(), &body);

            let found = self.lookup(method, &path).or_else(|| {
                // HEAD falls back to GET; hyper drops the body on the way out.
                (method == Method::Head)
                    .then(|| self.lookup(Method::Get, &path))
                    .flatten()
            });

            match found {
                Some((handler, params)) => {
                    handler.call(Request::new(method, body, params)).await
                }
                None => match self.allowed(&path) {
                    allowed if allowed.is_empty() => error_page(Status::NotFound),
                    allowed => not_allowed(allowed),
                },
            }
        }
        .instrument(span.clone())
        .await;

        span.in_scope(|| {
            info!(
                status = u16::from(response.status_code()),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request completed",
            );
        });
        response
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

pub(crate) fn error_page(status: Status) -> Response {
    Response::builder().status(status).html(views::error(status))
}

fn not_allowed(allowed: Vec<Method>) -> Response {
    let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
    Response::builder()
        .status(Status::MethodNotAllowed)
        .header("allow", &allow)
        .html(views::error(Status::MethodNotAllowed))
}
