//! `application/x-www-form-urlencoded` decoding.
//!
//! The blog's HTML forms name their inputs `blog[title]`, `blog[image]` and
//! `blog[body]`. Plain `title`, `image` and `body` are accepted as well so the
//! endpoints stay usable from `curl -d`.

use url::form_urlencoded;

/// Decoded form fields, in the order they appeared on the wire.
#[derive(Debug, Default, Clone)]
pub struct Form {
    pairs: Vec<(String, String)>,
}

impl Form {
    /// Decodes `input`. Invalid percent-escapes and non-UTF-8 bytes are
    /// replaced rather than rejected.
    pub fn parse(input: &[u8]) -> Self {
        let pairs = form_urlencoded::parse(input)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// First value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a post field, preferring `blog[name]` over bare `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.get(&format!("blog[{name}]")).or_else(|| self.get(name))
    }
}

/// The three editable fields of a post as submitted by a client.
///
/// Absent fields are `None`. Nothing here is sanitized yet.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub title: Option<String>,
    pub image: Option<String>,
    pub body: Option<String>,
}

impl From<&Form> for PostForm {
    fn from(form: &Form) -> Self {
        Self {
            title: form.field("title").map(str::to_owned),
            image: form.field("image").map(str::to_owned),
            body: form.field("body").map(str::to_owned),
        }
    }
}
