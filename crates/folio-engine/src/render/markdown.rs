//! Restricted markdown for short blurbs.
//!
//! Only `p`, `em`, `strong`, `a`, `ul`, `ol`, `li` and `br` are emitted as
//! markup. Headings, quotes and code come out as escaped tags around their
//! text, so `# Title` reads `&lt;h1&gt;Title&lt;/h1&gt;`. Raw HTML in the
//! source is escaped, never passed through.

use html_escape::{encode_double_quoted_attribute, encode_text};
use pulldown_cmark::{Event, Parser, Tag};

/// Renders markdown to the restricted HTML subset. Empty input gives an
/// empty string.
pub fn markdownify(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(text.len() + text.len() / 2);
    // Closing markup for each open tag, in nesting order.
    let mut closers: Vec<String> = Vec::new();

    for event in Parser::new(text) {
        match event {
            Event::Start(tag) => {
                let (open, close) = open_tag(&tag);
                out.push_str(&open);
                closers.push(close);
            }
            Event::End(_) => {
                if let Some(close) = closers.pop() {
                    out.push_str(&close);
                }
            }
            Event::Text(text) => out.push_str(&encode_text(&*text)),
            Event::Code(text) => {
                out.push_str("&lt;code&gt;");
                out.push_str(&encode_text(&*text));
                out.push_str("&lt;/code&gt;");
            }
            Event::Html(html) | Event::InlineHtml(html) => out.push_str(&encode_text(&*html)),
            Event::SoftBreak => out.push('\n'),
            Event::HardBreak => out.push_str("<br>"),
            _ => {}
        }
    }
    out.trim_end().to_string()
}

fn open_tag(tag: &Tag<'_>) -> (String, String) {
    let pair = |open: &str, close: &str| (open.to_string(), close.to_string());
    match tag {
        Tag::Paragraph => pair("<p>", "</p>\n"),
        Tag::Emphasis => pair("<em>", "</em>"),
        Tag::Strong => pair("<strong>", "</strong>"),
        Tag::List(None) => pair("<ul>\n", "</ul>\n"),
        Tag::List(Some(_)) => pair("<ol>\n", "</ol>\n"),
        Tag::Item => pair("<li>", "</li>\n"),
        Tag::Heading { level, .. } => {
            let n = *level as u8;
            (format!("&lt;h{n}&gt;"), format!("&lt;/h{n}&gt;\n"))
        }
        Tag::BlockQuote(_) => pair("&lt;blockquote&gt;\n", "&lt;/blockquote&gt;\n"),
        Tag::CodeBlock(_) => pair("&lt;pre&gt;&lt;code&gt;", "&lt;/code&gt;&lt;/pre&gt;\n"),
        Tag::Link {
            dest_url, title, ..
        } => {
            // Unsafe schemes keep the anchor but lose the href.
            let mut open = String::from("<a");
            if is_safe_href(dest_url) {
                open.push_str(&format!(" href=\"{}\"", encode_double_quoted_attribute(&**dest_url)));
            }
            if !title.is_empty() {
                open.push_str(&format!(
                    " title=\"{}\"",
                    encode_double_quoted_attribute(&**title)
                ));
            }
            open.push('>');
            (open, "</a>".to_string())
        }
        _ => pair("", ""),
    }
}

/// Relative links and http, https or mailto URLs.
fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    match href.split_once(':') {
        None => true,
        Some((scheme, _)) if scheme.contains(['/', '?', '#']) => true,
        Some((scheme, _)) => matches!(
            scheme.to_ascii_lowercase().as_str(),
            "http" | "https" | "mailto"
        ),
    }
}
