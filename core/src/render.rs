//! Markdown to sanitized HTML.
//!
//! Documents are authored outside this system, so every rendered fragment goes through an
//! allow-list sanitizer before a UI may insert it. Images live next to the markdown file that
//! references them; relative image paths are rebased onto the folder so they resolve against the
//! per-folder asset route.

use std::borrow::Cow;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

use crate::view::encode_segment;

/// Render `content` from `folder` to HTML that is safe to inject into a page.
pub fn render_markdown(content: &str, folder: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let parser =
        Parser::new_ext(content, markdown_options()).map(|event| rebase_image(event, folder));
    let mut raw = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut raw, parser);
    sanitize(&raw)
}

/// Whether an image URL is relative to the document's folder.
///
/// Absolute paths, `data:` URIs, and anything starting with `http` are left alone.
pub fn is_folder_relative(url: &str) -> bool {
    !url.is_empty()
        && !url.starts_with("http")
        && !url.starts_with('/')
        && !url.starts_with("data:")
}

fn markdown_options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

fn rebase_image<'a>(event: Event<'a>, folder: &str) -> Event<'a> {
    match event {
        Event::Start(Tag::Image { link_type, dest_url, title, id })
            if is_folder_relative(&dest_url) =>
        {
            let dest_url = CowStr::from(format!("{}/{dest_url}", encode_segment(folder)));
            Event::Start(Tag::Image { link_type, dest_url, title, id })
        }
        other => other,
    }
}

fn sanitize(raw: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder
        .add_url_schemes(["data"])
        .add_tags(["input"])
        .add_tag_attributes("input", ["type", "checked", "disabled"])
        .attribute_filter(|element, attribute, value| match (element, attribute) {
            // Inline images only; a data URL anywhere else can carry a document.
            (_, "href" | "src" | "cite") if has_data_scheme(value) => {
                let inline_image = element == "img" && attribute == "src" && is_image_data(value);
                inline_image.then_some(Cow::Borrowed(value))
            }
            ("input", "type") => (value == "checkbox").then_some(Cow::Borrowed(value)),
            _ => Some(Cow::Borrowed(value)),
        });
    builder.clean(raw).to_string()
}

fn has_data_scheme(value: &str) -> bool {
    url_prefix(value, 5).eq_ignore_ascii_case("data:")
}

fn is_image_data(value: &str) -> bool {
    url_prefix(value, 11).eq_ignore_ascii_case("data:image/")
}

/// First `len` chars of `value` as a URL parser reads it: leading C0 controls and spaces are
/// trimmed and ASCII tab, LF and CR are dropped wherever they occur.
fn url_prefix(value: &str, len: usize) -> String {
    value
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .take(len)
        .collect()
}
