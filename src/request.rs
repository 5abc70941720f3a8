//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

use crate::form::Form;
use crate::method::Method;

/// An incoming HTTP request with its body fully buffered and its path
/// parameters resolved by the router.
pub struct Request {
    method: Method,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(method: Method, body: Bytes, params: HashMap<String, String>) -> Self {
        Self { method, body, params }
    }

    /// The effective method, after any `_method` override was applied.
    pub fn method(&self) -> Method { self.method }

    /// Returns a named path parameter.
    ///
    /// For a route `/blogs/{id}`, `req.param("id")` on `/blogs/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the body as `application/x-www-form-urlencoded`.
    ///
    /// The content type is not checked: browsers always send forms this way,
    /// and an empty or foreign body simply yields an empty [`Form`].
    pub fn form(&self) -> Form {
        Form::parse(&self.body)
    }
}
