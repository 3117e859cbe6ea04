use dioxus::prelude::*;
use folio_engine::listing::PortfolioListing;
use folio_engine::models::{
    ImageSource, PortfolioCategory, PortfolioIndex, PortfolioItem, Project, Tag,
};
use folio_engine::render::body_element;

use super::TagList;

fn project_card(project: &Project, images: &dyn ImageSource) -> Element {
    let cover = project.cover(images).map(|cover| {
        rsx! {
            img { src: "{cover.url}", alt: "{cover.alt}", "loading": "lazy" }
        }
    });
    rsx! {
        article { class: "project-card",
            a { href: "/portfolio/{project.slug}/",
                {cover}
                h2 { "{project.title}" }
            }
            p { "{project.subtitle}" }
            TagList { base: "/portfolio/", tags: project.tags.clone() }
        }
    }
}

fn item_card(
    item: &PortfolioItem,
    thumb_url: &dyn Fn(&PortfolioItem) -> Option<String>,
) -> Element {
    let thumb = thumb_url(item).map(|url| {
        rsx! {
            img { src: "{url}", alt: "{item.title}", "loading": "lazy" }
        }
    });
    let categories = item.categories.join(" ");
    rsx! {
        article { class: "portfolio-item", "data-categories": "{categories}",
            a { href: "/portfolio/{item.slug}/",
                {thumb}
                h3 { "{item.title}" }
            }
            p { "{item.subtitle}" }
        }
    }
}

/// A filter bar entry; `active` marks the current filter.
fn filter_link(href: String, label: &str, active: bool) -> Element {
    rsx! {
        li { class: active.then_some("active"),
            a { href: "{href}", "{label}" }
        }
    }
}

/// The portfolio index. `tags` feeds the project filter bar, `categories`
/// the one over legacy items.
pub fn index(
    page: &PortfolioIndex,
    listing: &PortfolioListing<'_>,
    tags: &[&Tag],
    categories: &[&PortfolioCategory],
    images: &dyn ImageSource,
    thumb_url: &dyn Fn(&PortfolioItem) -> Option<String>,
) -> Element {
    let tag_filters = tags.iter().map(|tag| {
        let active = listing.active_tag.as_deref() == Some(tag.slug.as_str());
        filter_link(format!("/portfolio/tag/{}/", tag.slug), &tag.name, active)
    });
    let category_filters: Vec<Element> = if listing.active_tag.is_none() {
        categories
            .iter()
            .map(|category| {
                let active = listing.active_category.as_deref() == Some(category.slug.as_str());
                filter_link(
                    format!("/portfolio/?category={}", category.slug),
                    &category.name,
                    active,
                )
            })
            .collect()
    } else {
        Vec::new()
    };
    let projects: Vec<Element> = listing
        .projects
        .iter()
        .map(|project| project_card(project, images))
        .collect();
    let items: Vec<Element> = listing
        .legacy_items
        .iter()
        .map(|item| item_card(item, thumb_url))
        .collect();

    rsx! {
        h1 { "{page.title}" }
        if !page.intro.is_empty() {
            p { class: "intro", "{page.intro}" }
        }
        ul { class: "filters",
            li {
                a { href: "/portfolio/", "All" }
            }
            {tag_filters}
        }
        if projects.is_empty() && items.is_empty() {
            p { class: "empty", "Nothing here yet." }
        } else {
            section { class: "project-grid", {projects.into_iter()} }
            if !category_filters.is_empty() {
                ul { class: "filters categories", {category_filters.into_iter()} }
            }
            if !items.is_empty() {
                section { class: "portfolio-items", {items.into_iter()} }
            }
        }
    }
}

pub fn project(project: &Project, images: &dyn ImageSource) -> Element {
    let links = [
        project.external_url.as_deref().map(|url| ("Visit", url)),
        project.github_url.as_deref().map(|url| ("Source", url)),
    ]
    .into_iter()
    .flatten()
    .map(|(label, url)| {
        rsx! {
            a { class: "btn", href: "{url}", rel: "noopener", "{label}" }
        }
    });

    rsx! {
        article { class: "project",
            header {
                h1 { "{project.title}" }
                p { class: "subtitle", "{project.subtitle}" }
                TagList { base: "/portfolio/", tags: project.tags.clone() }
                p { class: "links", {links} }
            }
            div { class: "project-body", {body_element(&project.body, images)} }
        }
    }
}

/// Detail page for a legacy item. `hero_url` and `lightbox_url` are already
/// resolved against storage. The body is editor HTML and goes in as is.
pub fn legacy_item(
    item: &PortfolioItem,
    hero_url: Option<String>,
    lightbox_url: Option<String>,
) -> Element {
    let hero = hero_url.map(|url| {
        let picture = rsx! {
            img { src: "{url}", alt: "{item.title}" }
        };
        match lightbox_url {
            Some(full) => rsx! {
                figure { class: "hero",
                    a { class: "lightbox", href: "{full}", {picture} }
                }
            },
            None => rsx! {
                figure { class: "hero", {picture} }
            },
        }
    });

    rsx! {
        article { class: "portfolio-detail",
            header {
                h1 { "{item.title}" }
                p { class: "subtitle", "{item.subtitle}" }
                if !item.external_url.is_empty() {
                    p { class: "links",
                        a {
                            class: "btn",
                            href: "{item.external_url}",
                            rel: "noopener",
                            "Visit"
                        }
                    }
                }
            }
            {hero}
            div { class: "portfolio-body", dangerous_inner_html: "{item.body_html}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relative_path::RelativePathBuf;

    fn item(body_html: &str) -> PortfolioItem {
        PortfolioItem {
            id: 1,
            title: "Shop <front>".into(),
            slug: "shop".into(),
            subtitle: String::new(),
            categories: vec!["web".into()],
            image: RelativePathBuf::from("portfolio/shop.png"),
            hero: None,
            lightbox_image: None,
            external_url: String::new(),
            body_html: body_html.into(),
            order: 0,
            active: true,
        }
    }

    #[test]
    fn legacy_body_is_raw_but_title_is_escaped() {
        let html = dioxus_ssr::render_element(legacy_item(
            &item("<p>Built with <strong>care</strong></p>"),
            Some("/media/portfolio/shop.png".into()),
            Some("/media/portfolio/shop-big.png".into()),
        ));
        assert!(html.contains("<h1>Shop &lt;front&gt;</h1>"));
        assert!(html.contains("<p>Built with <strong>care</strong></p>"));
        assert!(html.contains("href=\"/media/portfolio/shop-big.png\""));
        assert!(!html.contains("Visit"));
    }
}
