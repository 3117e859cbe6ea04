//! Turns validated bodies into HTML.
//!
//! Every block kind has a component. Rendering is a pure function of the
//! block and the image source, and an image that no longer resolves drops
//! out of the output instead of failing the page. Text and attributes are
//! escaped by the renderer; only rich text goes in as raw HTML.

pub mod markdown;

use dioxus::prelude::*;
use uuid::Uuid;

use crate::blocks::StreamBlock;
use crate::blocks::choices::{GalleryColumns, HeadingLevel, SectionBackground, SpacerSize};
use crate::blocks::{
    Block, Body, ButtonBlock, CalloutBlock, CodeBlock, EmbedBlock, ImageBlock, LeafBlock,
};
use crate::models::image::{ImageSource, ResolvedImage};

pub use markdown::markdownify;

/// The rendered HTML of one body block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub block_id: Uuid,
    pub block_type: &'static str,
    pub html: String,
}

/// One fragment per block, in body order.
pub fn render_body(body: &Body, images: &dyn ImageSource) -> Vec<Fragment> {
    body.iter()
        .map(|item| Fragment {
            block_id: item.id,
            block_type: item.block.type_name(),
            html: render_block(&item.block, images),
        })
        .collect()
}

/// The whole body as one HTML string.
pub fn render_body_html(body: &Body, images: &dyn ImageSource) -> String {
    render_body(body, images)
        .into_iter()
        .map(|fragment| fragment.html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The whole body as an element, for embedding in a page.
pub fn body_element(body: &Body, images: &dyn ImageSource) -> Element {
    rsx! {
        {body.iter().filter_map(|item| block_element(&item.block, images))}
    }
}

pub fn render_block(block: &Block, images: &dyn ImageSource) -> String {
    block_element(block, images)
        .map(dioxus_ssr::render_element)
        .unwrap_or_default()
}

pub fn render_leaf(leaf: &LeafBlock, images: &dyn ImageSource) -> String {
    leaf_element(leaf, images)
        .map(dioxus_ssr::render_element)
        .unwrap_or_default()
}

/// `None` when the block has nothing left to show.
fn block_element(block: &Block, images: &dyn ImageSource) -> Option<Element> {
    match block {
        Block::Leaf(leaf) => leaf_element(leaf, images),
        Block::Section(section) => {
            let inner: Vec<Element> = section
                .inner
                .iter()
                .filter_map(|item| leaf_element(&item.block, images))
                .collect();
            Some(rsx! {
                Section { background: section.background, {inner.into_iter()} }
            })
        }
    }
}

fn leaf_element(leaf: &LeafBlock, images: &dyn ImageSource) -> Option<Element> {
    let element = match leaf {
        LeafBlock::Heading(heading) => rsx! {
            Heading { level: heading.level, text: heading.text.clone() }
        },
        LeafBlock::Paragraph(rich) => rsx! {
            div { class: "block-paragraph", dangerous_inner_html: rich.as_html() }
        },
        LeafBlock::Image(block) => {
            let image = images.resolve(block.image)?;
            rsx! { Picture { block: block.clone(), image } }
        }
        LeafBlock::Quote(quote) => rsx! {
            blockquote { class: "block-quote", p { "{quote}" } }
        },
        LeafBlock::Embed(embed) => rsx! { Embed { block: embed.clone() } },
        LeafBlock::Callout(callout) => rsx! { Callout { block: callout.clone() } },
        LeafBlock::Code(code) => rsx! { Code { block: code.clone() } },
        LeafBlock::Button(button) => rsx! { Button { block: button.clone() } },
        LeafBlock::Divider => rsx! { hr { class: "block-divider" } },
        LeafBlock::Spacer(size) => rsx! { Spacer { size: *size } },
        LeafBlock::Gallery(gallery) => {
            let resolved: Vec<ResolvedImage> = gallery
                .images
                .iter()
                .filter_map(|id| images.resolve(*id))
                .collect();
            if resolved.is_empty() {
                return None;
            }
            rsx! {
                Gallery {
                    title: gallery.title.clone(),
                    columns: gallery.columns,
                    images: resolved,
                }
            }
        }
    };
    Some(element)
}

#[component]
fn Heading(level: HeadingLevel, text: String) -> Element {
    match level {
        HeadingLevel::H2 => rsx! { h2 { class: "block-heading", "{text}" } },
        HeadingLevel::H3 => rsx! { h3 { class: "block-heading", "{text}" } },
        HeadingLevel::H4 => rsx! { h4 { class: "block-heading", "{text}" } },
    }
}

#[component]
fn Picture(block: ImageBlock, image: ResolvedImage) -> Element {
    let class = format!(
        "block-image align-{} style-{} maxw-{} radius-{} shadow-{} aspect-{}",
        block.alignment, block.style, block.max_width, block.radius, block.shadow, block.aspect,
    );
    let alt = if block.alt_override.is_empty() {
        image.alt.clone()
    } else {
        block.alt_override.clone()
    };
    let img = rsx! { img { src: "{image.url}", alt: "{alt}", "loading": "lazy" } };
    let media = match &block.link_url {
        Some(link) => rsx! {
            a {
                href: "{link}",
                target: block.open_in_new.then_some("_blank"),
                rel: block.open_in_new.then_some("noopener"),
                {img}
            }
        },
        None => img,
    };
    rsx! {
        figure { class: "{class}",
            {media}
            if !block.caption.is_empty() {
                figcaption { "{block.caption}" }
            }
        }
    }
}

/// Embeds render as a captioned link card; nothing is fetched at render time.
#[component]
fn Embed(block: EmbedBlock) -> Element {
    let class = format!(
        "block-embed width-{} align-{} style-{}",
        block.width, block.align, block.style
    );
    rsx! {
        figure { class: "{class}",
            a {
                class: "embed-link",
                href: "{block.url}",
                target: "_blank",
                rel: "noopener",
                "{block.url}"
            }
            if !block.caption.is_empty() {
                figcaption { "{block.caption}" }
            }
        }
    }
}

#[component]
fn Callout(block: CalloutBlock) -> Element {
    rsx! {
        aside { class: "block-callout callout-{block.style}",
            if !block.title.is_empty() {
                p { class: "callout-title", "{block.title}" }
            }
            div { class: "callout-body", dangerous_inner_html: block.text.as_html() }
        }
    }
}

#[component]
fn Code(block: CodeBlock) -> Element {
    rsx! {
        figure { class: "block-code",
            if !block.title.is_empty() {
                figcaption { "{block.title}" }
            }
            pre {
                code { class: "language-{block.language}", "{block.code}" }
            }
        }
    }
}

#[component]
fn Button(block: ButtonBlock) -> Element {
    rsx! {
        p { class: "block-button",
            a { class: "btn btn-{block.variant}", href: "{block.url}", "{block.text}" }
        }
    }
}

#[component]
fn Spacer(size: SpacerSize) -> Element {
    rsx! {
        div { class: "block-spacer spacer-{size}", "aria-hidden": "true" }
    }
}

#[component]
fn Gallery(title: String, columns: GalleryColumns, images: Vec<ResolvedImage>) -> Element {
    rsx! {
        section { class: "block-gallery cols-{columns}",
            if !title.is_empty() {
                h3 { class: "gallery-title", "{title}" }
            }
            div { class: "gallery-grid",
                for image in images {
                    figure {
                        a { href: "{image.url}",
                            img { src: "{image.url}", alt: "{image.alt}", "loading": "lazy" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Section(background: SectionBackground, children: Element) -> Element {
    rsx! {
        section { class: "block-section bg-{background}",
            div { class: "section-inner", {children} }
        }
    }
}
