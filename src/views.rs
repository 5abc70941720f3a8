//! Server-rendered HTML pages.
//!
//! Every value that came from a client passes through [`escape`] on the way
//! out, bodies included, even though they were sanitized on the way in.

use crate::post::Post;
use crate::status::Status;

/// Characters of body shown per post on the index page.
const SNIPPET_CHARS: usize = 100;

/// Escapes text for use in HTML content and double- or single-quoted
/// attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Only absolute http(s) URLs and site-relative paths are rendered as image
/// sources; anything else (`javascript:`, `data:`) is dropped.
fn safe_image(url: &str) -> Option<&str> {
    let lower = url.trim().to_ascii_lowercase();
    let allowed = lower.starts_with("http://")
        || lower.starts_with("https://")
        || (lower.starts_with('/') && !lower.starts_with("//"));
    allowed.then_some(url.trim())
}

fn image_tag(post: &Post, class: &str) -> String {
    post.image
        .as_deref()
        .and_then(safe_image)
        .map(|src| {
            format!(
                r#"<img class="{class}" src="{}" alt="{}">"#,
                escape(src),
                escape(&post.title),
            )
        })
        .unwrap_or_default()
}

fn date(post: &Post) -> String {
    post.created.format("%a %b %d %Y").to_string()
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Blog App</title>
</head>
<body>
<nav><a href="/blogs">Blog App</a> · <a href="/blogs">Home</a> · <a href="/blogs/new">New Post</a></nav>
<main>
{content}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// `GET /blogs`
pub fn index(posts: &[Post]) -> String {
    let mut content = String::from("<h1>RESTful Blog App</h1>\n");
    if posts.is_empty() {
        content.push_str("<p>No posts yet. <a href=\"/blogs/new\">Write the first one.</a></p>\n");
    }
    for post in posts {
        let snippet: String = post.body.chars().take(SNIPPET_CHARS).collect();
        let ellipsis = if post.body.chars().count() > SNIPPET_CHARS { "..." } else { "" };
        content.push_str(&format!(
            r#"<article class="post">
{image}
<h2><a href="{url}">{title}</a></h2>
<p class="date">{date}</p>
<p>{snippet}{ellipsis}</p>
<a href="{url}">Read more</a>
</article>
"#,
            image = image_tag(post, "thumbnail"),
            url = post.url(),
            title = escape(&post.title),
            date = date(post),
            snippet = escape(&snippet),
        ));
    }
    layout("Blogs", &content)
}

fn post_form(action: &str, post: Option<&Post>, submit: &str) -> String {
    let title = post.map(|p| escape(&p.title)).unwrap_or_default();
    let image = post
        .and_then(|p| p.image.as_deref())
        .map(escape)
        .unwrap_or_default();
    let body = post.map(|p| escape(&p.body)).unwrap_or_default();
    format!(
        r#"<form action="{action}" method="POST">
<label>Title <input type="text" name="blog[title]" value="{title}"></label>
<label>Image <input type="text" name="blog[image]" value="{image}"></label>
<label>Blog Content <textarea name="blog[body]">{body}</textarea></label>
<button type="submit">{submit}</button>
</form>
"#
    )
}

/// `GET /blogs/new`
pub fn new_post() -> String {
    let content = format!("<h1>New Blog</h1>\n{}", post_form("/blogs", None, "Submit"));
    layout("New Blog", &content)
}

/// `GET /blogs/{id}`
pub fn show(post: &Post) -> String {
    let url = post.url();
    let content = format!(
        r#"<article class="post">
<h1>{title}</h1>
{image}
<p class="date">{date}</p>
<div class="body">{body}</div>
<a href="{url}/edit">Edit</a>
<form action="{url}?_method=DELETE" method="POST">
<button type="submit">Delete</button>
</form>
</article>
"#,
        title = escape(&post.title),
        image = image_tag(post, "cover"),
        date = date(post),
        body = escape(&post.body),
    );
    layout(&post.title, &content)
}

/// `GET /blogs/{id}/edit`
pub fn edit(post: &Post) -> String {
    let action = format!("{}?_method=PUT", post.url());
    let content = format!(
        "<h1>Edit {}</h1>\n{}",
        escape(&post.title),
        post_form(&action, Some(post), "Update"),
    );
    layout(&format!("Edit {}", post.title), &content)
}

/// Error page. Deliberately generic: causes are logged, not shown.
pub fn error(status: Status) -> String {
    let message = match status {
        Status::NotFound => "That page or post does not exist.",
        Status::MethodNotAllowed => "That action is not supported here.",
        Status::BadRequest => "The request could not be understood.",
        Status::ContentTooLarge => "That post is too large to accept.",
        _ => "Something went wrong. Please try again later.",
    };
    let content = format!(
        "<h1>{} {}</h1>\n<p>{message}</p>\n<a href=\"/blogs\">Back to all posts</a>\n",
        u16::from(status),
        status.reason(),
    );
    layout(status.reason(), &content)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::post::PostId;

    fn post(title: &str, body: &str, image: Option<&str>) -> Post {
        Post {
            id: PostId::new_v4(),
            title: title.to_owned(),
            image: image.map(str::to_owned),
            body: body.to_owned(),
            created: Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap(),
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn index_truncates_body_and_links_posts() {
        let long = "x".repeat(150);
        let p = post("Long", &long, None);
        let html = index(std::slice::from_ref(&p));
        assert!(html.contains(&format!("{}...", "x".repeat(100))));
        assert!(!html.contains(&"x".repeat(101)));
        assert!(html.contains(&format!("href=\"/blogs/{}\"", p.id)));
    }

    #[test]
    fn index_without_posts_invites_writing() {
        assert!(index(&[]).contains("Write the first one"));
    }

    #[test]
    fn show_escapes_title_and_formats_date() {
        let html = show(&post("<i>t</i>", "1 < 2", None));
        assert!(html.contains("&lt;i&gt;t&lt;/i&gt;"));
        assert!(html.contains("1 &lt; 2"));
        assert!(html.contains("Mon Jan 02 2006"));
        assert!(html.contains("?_method=DELETE"));
    }

    #[test]
    fn unsafe_image_urls_are_not_rendered() {
        let html = show(&post("t", "b", Some("javascript:alert(1)")));
        assert!(!html.contains("<img"));
        let html = show(&post("t", "b", Some("https://img.example/a.png")));
        assert!(html.contains(r#"src="https://img.example/a.png""#));
    }

    #[test]
    fn edit_form_prefills_and_overrides_to_put() {
        let p = post("Title", "Body", Some("/img.png"));
        let html = edit(&p);
        assert!(html.contains(&format!("action=\"/blogs/{}?_method=PUT\"", p.id)));
        assert!(html.contains(r#"name="blog[title]" value="Title""#));
        assert!(html.contains(">Body</textarea>"));
    }

    #[test]
    fn error_page_is_generic() {
        let html = error(Status::InternalServerError);
        assert!(html.contains("500 Internal Server Error"));
        assert!(html.contains("Something went wrong"));
    }

    #[test]
    fn pages_reference_no_local_assets() {
        let html = index(&[post("t", "b", None)]);
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("stylesheet"));
    }

    #[test]
    fn oversized_body_page_names_413() {
        let html = error(Status::ContentTooLarge);
        assert!(html.contains("413 Content Too Large"));
        assert!(html.contains("too large"));
    }
}
