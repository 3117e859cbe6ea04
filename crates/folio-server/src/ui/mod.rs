//! Server-rendered HTML pages.
//!
//! Views take already-queried data and build elements; the renderer escapes
//! text and attributes. Only editor HTML and markdown output go in raw.

pub mod about;
pub mod blog;
pub mod pages;
pub mod portfolio;

use dioxus::prelude::*;
use folio_engine::listing::Page;
use folio_engine::models::Tag;

const NAV: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/about/", "About"),
    ("/resume/", "Résumé"),
    ("/blog/", "Blog"),
    ("/portfolio/", "Portfolio"),
    ("/contact/", "Contact"),
];

/// A complete document: the site chrome around `content`.
pub fn render_page(site_title: &str, title: &str, content: Element) -> String {
    let page = rsx! {
        Layout {
            site_title: site_title.to_string(),
            page_title: title.to_string(),
            {content}
        }
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">{}</html>",
        dioxus_ssr::render_element(page)
    )
}

#[component]
fn Layout(site_title: String, page_title: String, children: Element) -> Element {
    let head_title = if page_title.is_empty() || page_title == site_title {
        site_title.clone()
    } else {
        format!("{page_title} | {site_title}")
    };
    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{head_title}" }
        }
        body {
            header { class: "site-header",
                a { class: "site-title", href: "/", "{site_title}" }
                nav {
                    ul {
                        for (href, label) in NAV {
                            li { a { href: *href, "{label}" } }
                        }
                    }
                }
            }
            main { {children} }
        }
    }
}

/// Tag chips linking to `{base}tag/{slug}/`.
#[component]
pub(crate) fn TagList(#[props(into)] base: String, tags: Vec<Tag>) -> Element {
    if tags.is_empty() {
        return rsx! {};
    }
    rsx! {
        ul { class: "tags",
            for tag in tags {
                li {
                    a { class: "tag", href: "{base}tag/{tag.slug}/", "{tag.name}" }
                }
            }
        }
    }
}

/// Previous/next links for a paginated listing rooted at `base`.
pub(crate) fn pagination<T>(base: &str, page: &Page<T>) -> Element {
    if page.num_pages <= 1 {
        return rsx! {};
    }
    let (number, num_pages) = (page.number, page.num_pages);
    let newer = page.previous_page_number().map(|n| {
        rsx! {
            a { rel: "prev", href: "{base}?page={n}", "Newer" }
        }
    });
    let older = page.next_page_number().map(|n| {
        rsx! {
            a { rel: "next", href: "{base}?page={n}", "Older" }
        }
    });
    rsx! {
        nav { class: "pagination",
            {newer}
            span { class: "page-number", "Page {number} of {num_pages}" }
            {older}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_engine::listing::paginate;

    fn html(element: Element) -> String {
        dioxus_ssr::render_element(element)
    }

    #[test]
    fn page_escapes_titles() {
        let page = render_page("Me & Co", "<b>", rsx! { p { "body" } });
        assert!(page.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(page.contains("&lt;b&gt; | Me &amp; Co</title>"));
        assert!(page.contains("<p>body</p>"));
        assert!(!page.contains("<b>"));
    }

    #[test]
    fn home_title_is_not_repeated() {
        let page = render_page("Folio", "Folio", rsx! {});
        assert!(page.contains("<title>Folio</title>"));
    }

    #[test]
    fn tag_names_are_escaped() {
        let tags = vec![Tag::new("C<3"), Tag::new("Rust")];
        let out = html(rsx! { TagList { base: "/blog/", tags } });
        assert!(out.contains("href=\"/blog/tag/c3/\""));
        assert!(out.contains(">C&lt;3</a>"));
        assert!(out.contains("href=\"/blog/tag/rust/\""));
    }

    #[test]
    fn single_page_has_no_pagination() {
        let page = paginate(vec![1, 2], 9, None);
        assert!(!html(pagination("/blog/", &page)).contains("pagination"));
    }

    #[test]
    fn middle_page_links_both_ways() {
        let page = paginate((1..=30).collect(), 9, Some("2"));
        let out = html(pagination("/blog/", &page));
        assert!(out.contains("href=\"/blog/?page=1\""));
        assert!(out.contains("href=\"/blog/?page=3\""));
        assert!(out.contains("Page 2 of 4"));
    }
}
