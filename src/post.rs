//! The blog post entity and its write shapes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::form::PostForm;
use crate::sanitize::sanitize;

/// Store-assigned post identifier. Immutable for the life of the post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct PostId(Uuid);

impl PostId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for PostId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored blog post.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub image: Option<String>,
    /// Already sanitized; contains no markup.
    pub body: String,
    pub created: DateTime<Utc>,
}

impl Post {
    /// Path of the detail page.
    pub fn url(&self) -> String {
        format!("/blogs/{}", self.id)
    }
}

/// Fields for a new post. `id` and `created` are assigned by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub image: Option<String>,
    pub body: String,
}

impl NewPost {
    /// Builds a new post from submitted form fields, sanitizing the body.
    /// Missing fields become empty; an empty image means "no image".
    pub fn from_form(form: PostForm) -> Self {
        Self {
            title: form.title.unwrap_or_default(),
            image: form.image.and_then(non_empty),
            body: sanitize(form.body.as_deref().unwrap_or_default()),
        }
    }
}

/// A partial overwrite of a post. `None` leaves the stored value untouched.
///
/// `image` is doubly optional: `Some(None)` clears the image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub image: Option<Option<String>>,
    pub body: Option<String>,
}

impl PostChanges {
    /// Builds changes from submitted form fields, sanitizing the body.
    pub fn from_form(form: PostForm) -> Self {
        Self {
            title: form.title,
            image: form.image.map(non_empty),
            body: form.body.as_deref().map(sanitize),
        }
    }

    /// Applies the changes in place. `id` and `created` are never touched.
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(image) = self.image {
            post.image = image;
        }
        if let Some(body) = self.body {
            post.body = body;
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_sanitizes_body_and_drops_blank_image() {
        let post = NewPost::from_form(PostForm {
            title: Some("Hi".into()),
            image: Some("   ".into()),
            body: Some("<script>alert(1)</script><b>x</b>".into()),
        });
        assert_eq!(post.title, "Hi");
        assert_eq!(post.image, None);
        assert_eq!(post.body, "x");
    }

    #[test]
    fn changes_only_touch_supplied_fields() {
        let mut post = Post {
            id: PostId::new_v4(),
            title: "old".into(),
            image: Some("http://img/1.png".into()),
            body: "old body".into(),
            created: Utc::now(),
        };
        let before = post.clone();

        PostChanges::from_form(PostForm {
            title: Some("new".into()),
            ..PostForm::default()
        })
        .apply(&mut post);

        assert_eq!(post.title, "new");
        assert_eq!(post.image, before.image);
        assert_eq!(post.body, before.body);
        assert_eq!(post.id, before.id);
        assert_eq!(post.created, before.created);
    }

    #[test]
    fn blank_image_in_changes_clears_it() {
        let changes = PostChanges::from_form(PostForm {
            image: Some(String::new()),
            ..PostForm::default()
        });
        assert_eq!(changes.image, Some(None));
        assert_eq!(changes.title, None);
        assert_eq!(changes.body, None);
    }

    #[test]
    fn id_round_trips_through_display() {
        let id = PostId::new_v4();
        assert_eq!(id.to_string().parse::<PostId>().ok(), Some(id));
        assert!("not-a-uuid".parse::<PostId>().is_err());
    }
}
