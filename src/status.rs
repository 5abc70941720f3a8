//! HTTP status codes as a typed enum.
//!
//! Only the codes the blog actually answers with. Use [`Status`] anywhere a
//! status code is accepted, such as `Response::builder().status()`.
//!
//! ```rust
//! use blogs::{Response, Status};
//!
//! Response::builder().status(Status::NotFound).html("<h1>Not Found</h1>");
//! ```

/// HTTP status codes the application produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    Found,               // 302

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,          // 400
    NotFound,            // 404
    MethodNotAllowed,    // 405
    ContentTooLarge,     // 413

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
    ServiceUnavailable,  // 503
}

impl Status {
    /// The canonical reason phrase, used as the heading of error pages.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok                  => "OK",
            Self::Found               => "Found",
            Self::BadRequest          => "Bad Request",
            Self::NotFound            => "Not Found",
            Self::MethodNotAllowed    => "Method Not Allowed",
            Self::ContentTooLarge     => "Content Too Large",
            Self::InternalServerError => "Internal Server Error",
            Self::ServiceUnavailable  => "Service Unavailable",
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::Found               => 302,
            Status::BadRequest          => 400,
            Status::NotFound            => 404,
            Status::MethodNotAllowed    => 405,
            Status::ContentTooLarge     => 413,
            Status::InternalServerError => 500,
            Status::ServiceUnavailable  => 503,
        }
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> http::StatusCode {
        // Every variant maps to a registered code, so this never falls back.
        http::StatusCode::from_u16(s.into()).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}
