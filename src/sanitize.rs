//! Markup filter applied to post bodies before they are stored.
//!
//! Every tag is removed and the text between tags is kept. `<script>` and
//! `<style>` lose their content too, and comments disappear. A `<` that does
//! not open a tag (`a < b`) survives as text and is escaped when rendered.
//!
//! Removing a tag can splice a kept `<` onto the text after it
//! (`<<b>script>`), so the pass repeats until the output is stable. Every
//! pass that changes anything makes the text shorter, so this terminates,
//! and a stable result contains no tag opener.

/// Elements whose content is dropped together with the tags.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Strips all markup from `input`.
///
/// ```rust
/// use blogs::sanitize::sanitize;
///
/// assert_eq!(sanitize("<p>Hello <b>world</b></p>"), "Hello world");
/// assert_eq!(sanitize("<script>alert(1)</script>ok"), "ok");
/// assert_eq!(sanitize("1 < 2"), "1 < 2");
/// assert_eq!(sanitize("<<b>script>alert(1)<</b>/script>"), "");
/// ```
pub fn sanitize(input: &str) -> String {
    let mut current = strip_once(input);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One left-to-right removal pass.
fn strip_once(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let candidate = &rest[lt..];

        if let Some(comment) = candidate.strip_prefix("<!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        if !opens_tag(candidate) {
            out.push('<');
            rest = &candidate[1..];
            continue;
        }

        // An unterminated tag swallows the remainder.
        let Some(end) = tag_end(candidate) else {
            rest = "";
            break;
        };
        let tag = &candidate[..=end];
        rest = &candidate[end + 1..];

        if let Some(name) = raw_text_element(tag) {
            rest = skip_past_close(rest, name);
        }
    }

    out.push_str(rest);
    out
}

/// Whether `s` (starting at `<`) begins a tag, a closing tag, a declaration
/// or a processing instruction.
fn opens_tag(s: &str) -> bool {
    s[1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Byte index of the `>` closing the tag that starts `s`, honouring quoted
/// attribute values.
fn tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in s.bytes().enumerate().skip(1) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

/// If `tag` opens a `<script>` or `<style>` element (and is not
/// self-closing), returns that element's name.
fn raw_text_element(tag: &str) -> Option<&'static str> {
    let inner = &tag[1..tag.len() - 1];
    if inner.starts_with('/') || inner.trim_end().ends_with('/') {
        return None;
    }
    let name_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let name = &inner[..name_len];
    RAW_TEXT_ELEMENTS
        .into_iter()
        .find(|raw| raw.eq_ignore_ascii_case(name))
}

/// Skips past `</name …>`, case-insensitively. Without a closing tag
/// the rest of the input is content of the element and is dropped.
fn skip_past_close<'a>(s: &'a str, name: &str) -> &'a str {
    let needle = format!("</{name}");
    let lower = s.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find(&needle) {
        let start = from + pos;
        let after = start + needle.len();
        // `</scripty>` is not a close of `<script>`.
        let boundary = lower[after..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_alphanumeric());
        if boundary {
            return match tag_end(&s[start..]) {
                Some(end) => &s[start + end + 1..],
                None => "",
            };
        }
        from = after;
    }
    ""
}
