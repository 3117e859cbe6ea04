use dioxus::prelude::*;
use folio_engine::listing::{BlogListing, Neighbours};
use folio_engine::models::{BlogPost, ImageSource};
use folio_engine::render::body_element;

use super::{TagList, pagination};

fn post_url(post: &BlogPost) -> String {
    format!("/blog/{}/", post.slug)
}

fn card(post: &BlogPost, images: &dyn ImageSource, featured: bool) -> Element {
    let class = if featured {
        "post-card featured"
    } else {
        "post-card"
    };
    let href = post_url(post);
    let hero = post.hero(images).map(|hero| {
        rsx! {
            img { src: "{hero.url}", alt: "{hero.alt}", "loading": "lazy" }
        }
    });
    let date = post.date;
    let pretty_date = post.date.format("%B %-d, %Y").to_string();
    let reading = post
        .reading_time_minutes
        .map(|m| format!(" · {m} min read"))
        .unwrap_or_default();
    rsx! {
        article { class: "{class}",
            a { href: "{href}",
                {hero}
                h2 { "{post.title}" }
            }
            p { class: "meta",
                time { datetime: "{date}", "{pretty_date}" }
                "{reading}"
            }
            p { "{post.intro}" }
            TagList { base: "/blog/", tags: post.tags.clone() }
        }
    }
}

/// The blog index and the tag route share this view.
pub fn index(heading: &str, listing: &BlogListing<'_>, images: &dyn ImageSource) -> Element {
    let (base, filter, featured) = match &listing.filtered_tag_slug {
        Some(slug) => {
            let filter = rsx! {
                p { class: "filter",
                    "Posts tagged "
                    strong { "{slug}" }
                    " · "
                    a { href: "/blog/", "All posts" }
                }
            };
            (format!("/blog/tag/{slug}/"), Some(filter), None)
        }
        None => (
            "/blog/".to_string(),
            None,
            listing.featured_post.map(|post| card(post, images, true)),
        ),
    };
    let cards: Vec<Element> = listing
        .posts
        .items
        .iter()
        .map(|post| card(post, images, false))
        .collect();

    rsx! {
        h1 { "{heading}" }
        {filter}
        {featured}
        if cards.is_empty() {
            p { class: "empty", "No posts yet." }
        } else {
            section { class: "post-grid", {cards.into_iter()} }
        }
        {pagination(&base, &listing.posts)}
    }
}

pub fn post(post: &BlogPost, neighbours: &Neighbours<'_>, images: &dyn ImageSource) -> Element {
    let hero = post.hero_image.and_then(|id| images.resolve(id)).map(|hero| {
        rsx! {
            figure { class: "hero",
                img { src: "{hero.url}", alt: "{hero.alt}" }
                if !post.hero_caption.is_empty() {
                    figcaption { "{post.hero_caption}" }
                }
            }
        }
    });
    let neighbour = |other: Option<&BlogPost>, rel: &'static str, label: &'static str| {
        other.map(|other| {
            let href = post_url(other);
            rsx! {
                a { rel: rel, href: "{href}", "{label}: {other.title}" }
            }
        })
    };
    let date = post.date;
    let pretty_date = post.date.format("%B %-d, %Y").to_string();

    rsx! {
        article { class: "post",
            header {
                h1 { "{post.title}" }
                p { class: "meta",
                    time { datetime: "{date}", "{pretty_date}" }
                }
                TagList { base: "/blog/", tags: post.tags.clone() }
            }
            {hero}
            div { class: "post-body", {body_element(&post.body, images)} }
        }
        nav { class: "post-nav",
            {neighbour(neighbours.previous, "prev", "Previous")}
            {neighbour(neighbours.next, "next", "Next")}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_engine::Site;
    use folio_engine::listing::blog_index;
    use folio_engine::models::{Image, ImageId};
    use relative_path::RelativePathBuf;
    use serde_json::json;

    fn site(titles: &[&str]) -> Site {
        let mut site = Site::new();
        site.add_image(Image {
            id: ImageId(1),
            title: "One".into(),
            file: RelativePathBuf::from("images/one.png"),
            alt: "A \"quoted\" alt".into(),
        });
        for (n, title) in titles.iter().enumerate() {
            let draft = serde_json::from_value(json!({
                "slug": format!("post-{n}"),
                "title": title,
                "date": format!("2024-03-0{}", n + 1),
                "hero_image": 1,
                "tags": ["Rust"],
                "body": [{"type": "quote", "value": "<i>said</i>"}],
                "live": true
            }))
            .unwrap();
            site.save_blog_post(draft).unwrap();
        }
        site
    }

    #[test]
    fn post_page_escapes_text_and_keeps_markup() {
        let site = site(&["Tom & <Jerry>"]);
        let post = site.live_post("post-0").unwrap();
        let html = dioxus_ssr::render_element(super::post(
            post,
            &Neighbours::default(),
            site.library(),
        ));

        assert!(html.contains("<h1>Tom &amp; &lt;Jerry&gt;</h1>"));
        assert!(html.contains("src=\"images/one.png\""));
        assert!(html.contains("alt=\"A &quot;quoted&quot; alt\""));
        assert!(html.contains("<p>&lt;i&gt;said&lt;/i&gt;</p>"));
        assert!(html.contains("href=\"/blog/tag/rust/\""));
    }

    #[test]
    fn unfiltered_index_shows_featured_card() {
        let site = site(&["One", "Two"]);
        let listing = blog_index(site.posts(), 9, None);
        let html = dioxus_ssr::render_element(index("Blog", &listing, site.library()));
        assert!(html.contains("class=\"post-card featured\""));
        assert!(html.contains("href=\"/blog/post-0/\""));
        assert!(!html.contains("Posts tagged"));
    }
}
