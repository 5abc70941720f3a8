//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it. Handlers that can fail
//! return `Result<Response, E>` where `E: IntoResponse`; the error renders
//! itself.

use bytes::Bytes;
use http_body_util::Full;

use crate::status::Status;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content types the blog serves.
enum ContentType {
    Html, // text/html; charset=utf-8
    Text, // text/plain; charset=utf-8
}

impl ContentType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts
///
/// ```rust
/// use blogs::Response;
///
/// Response::html("<h1>Blogs</h1>");
/// Response::text("ok");
/// Response::redirect("/blogs");
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use blogs::{Response, Status};
///
/// Response::builder()
///     .status(Status::NotFound)
///     .html("<h1>Not Found</h1>");
/// ```
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: Status,
}

impl Response {
    /// `200 OK` — `text/html; charset=utf-8`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::bytes_raw(ContentType::Html.as_str(), body.into().into_bytes())
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::bytes_raw(ContentType::Text.as_str(), body.into().into_bytes())
    }

    /// `302 Found` pointing at `location`.
    pub fn redirect(location: &str) -> Self {
        Self::builder()
            .status(Status::Found)
            .header("location", location)
            .no_body()
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok }
    }

    pub fn status_code(&self) -> Status { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn bytes_raw(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            body,
            headers: vec![("content-type".to_owned(), content_type.to_owned())],
            status: Status::Ok,
        }
    }

    /// Converts into the hyper representation. Headers that are not valid
    /// HTTP tokens are dropped with a warning instead of failing the request.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status.into();
        let headers = res.headers_mut();
        for (name, value) in self.headers {
            match (
                http::HeaderName::try_from(name.as_str()),
                http::HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => tracing::warn!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with an HTML body.
    pub fn html(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Html.as_str(), body.into().into_bytes())
    }

    /// Terminate with a plain-text body.
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Text.as_str(), body.into().into_bytes())
    }

    /// Terminate with no body (e.g. a redirect).
    pub fn no_body(self) -> Response {
        Response { body: Vec::new(), headers: self.headers, status: self.status }
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: IntoResponse,
{
    fn into_response(self) -> Response {
        match self {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        }
    }
}
