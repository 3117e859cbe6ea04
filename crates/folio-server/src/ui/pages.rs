use dioxus::prelude::*;
use folio_engine::models::{BlogPost, HomePage};

use super::about::Profile;
use super::render_page;

pub fn home(page: &HomePage, recent: &[&BlogPost], profile: Option<&Profile<'_>>) -> Element {
    let profile = profile.map(|p| {
        rsx! {
            img { class: "profile", src: "{p.url}", alt: "{p.alt}" }
        }
    });
    let recent: Vec<Element> = recent
        .iter()
        .map(|post| {
            let date = post.date;
            let pretty_date = post.date.format("%b %-d, %Y").to_string();
            rsx! {
                li {
                    a { href: "/blog/{post.slug}/", "{post.title}" }
                    " "
                    time { datetime: "{date}", "{pretty_date}" }
                }
            }
        })
        .collect();

    rsx! {
        section { class: "hero",
            {profile}
            h1 { "{page.title}" }
            p { class: "intro", "{page.intro}" }
        }
        if !recent.is_empty() {
            section { class: "recent-posts",
                h2 { "Latest writing" }
                ul { {recent.into_iter()} }
            }
        }
    }
}

pub fn contact(email: Option<&str>) -> Element {
    rsx! {
        h1 { "Contact" }
        {match email {
            Some(email) => rsx! {
                p {
                    "Write to "
                    a { href: "mailto:{email}", "{email}" }
                    "."
                }
            },
            None => rsx! {
                p { "Contact details are coming soon." }
            },
        }}
    }
}

/// The 404 page, a full document.
pub fn not_found() -> String {
    render_page(
        "Not found",
        "",
        rsx! {
            h1 { "Page not found" }
            p {
                "The page you asked for does not exist. "
                a { href: "/", "Back to the home page" }
                "."
            }
        },
    )
}
