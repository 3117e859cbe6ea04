//! Page types: the singleton index pages plus blog posts and projects.
//!
//! Posts and projects are generic over their body so the same struct serves
//! as an authoring draft (`RawBody`, straight from JSON) and as validated
//! content (`Body`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::image::{ImageId, ImageSource, ResolvedImage};
use super::tag::{Tag, is_valid_slug};
use crate::blocks::{Body, RawBody, TextRule, ValidationErrors, Validator, read_body};

const TITLE: TextRule = TextRule::required().max(255);
const INTRO: TextRule = TextRule::optional().max(250);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomePage {
    pub title: String,
    pub intro: String,
}

impl Default for HomePage {
    fn default() -> Self {
        Self {
            title: "Home".to_string(),
            intro: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogIndex {
    pub title: String,
}

impl Default for BlogIndex {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioIndex {
    pub title: String,
    pub intro: String,
}

impl Default for PortfolioIndex {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            intro: String::new(),
        }
    }
}

impl HomePage {
    pub fn validate(&self, cx: &mut Validator<'_>) {
        cx.text("title", &self.title, TITLE);
        cx.text("intro", &self.intro, INTRO);
    }
}

impl BlogIndex {
    pub fn validate(&self, cx: &mut Validator<'_>) {
        cx.text("title", &self.title, TITLE);
    }
}

impl PortfolioIndex {
    pub fn validate(&self, cx: &mut Validator<'_>) {
        cx.text("title", &self.title, TITLE);
        cx.text("intro", &self.intro, INTRO);
    }
}

fn validate_slug(cx: &mut Validator<'_>, slug: &str) {
    cx.text("slug", slug, TextRule::required().max(255));
    if !slug.is_empty() && !is_valid_slug(slug) {
        cx.error(
            "slug",
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
        );
    }
}

/// A tag must leave something to put in its URL.
fn validate_tags(cx: &mut Validator<'_>, tags: &[Tag]) {
    for (i, tag) in tags.iter().enumerate() {
        if tag.slug.is_empty() || !is_valid_slug(&tag.slug) {
            cx.error(
                format!("tags[{i}]"),
                "Tag name must contain at least one letter or number.",
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost<B = Body> {
    #[serde(default)]
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    /// Set the first time the post is saved live.
    #[serde(default)]
    pub first_published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub reading_time_minutes: Option<u16>,
    #[serde(default)]
    pub hero_image: Option<ImageId>,
    #[serde(default)]
    pub hero_caption: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub body: B,
    #[serde(default)]
    pub live: bool,
}

/// A post as submitted for saving.
pub type BlogPostDraft = BlogPost<RawBody>;

impl BlogPostDraft {
    pub fn validate(self, cx: &mut Validator<'_>) -> BlogPost {
        validate_slug(cx, &self.slug);
        cx.text("title", &self.title, TITLE);
        cx.text("intro", &self.intro, INTRO);
        cx.text("hero_caption", &self.hero_caption, TextRule::optional().max(200));
        if let Some(hero) = self.hero_image {
            cx.image("hero_image", hero);
        }
        validate_tags(cx, &self.tags);
        let body = read_body(&self.body, cx, "body");
        BlogPost {
            slug: self.slug,
            title: self.title,
            date: self.date,
            first_published_at: self.first_published_at,
            intro: self.intro,
            featured: self.featured,
            reading_time_minutes: self.reading_time_minutes,
            hero_image: self.hero_image,
            hero_caption: self.hero_caption,
            tags: self.tags,
            body,
            live: self.live,
        }
    }

    /// Validates on its own, requiring every image to resolve.
    pub fn into_post(self, images: &dyn ImageSource) -> Result<BlogPost, ValidationErrors> {
        let mut cx = Validator::new(images);
        let post = self.validate(&mut cx);
        cx.finish(post)
    }
}

impl<B> BlogPost<B> {
    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == slug)
    }
}

impl BlogPost {
    /// The header image: `hero_image`, then the first image in the body,
    /// then the first gallery image.
    pub fn hero(&self, images: &dyn ImageSource) -> Option<ResolvedImage> {
        let candidates: Vec<ImageId> = self
            .hero_image
            .into_iter()
            .chain(self.body.image_candidates())
            .collect();
        images.first_resolved(&candidates)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project<B = Body> {
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub cover_image: Option<ImageId>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub body: B,
    #[serde(default)]
    pub first_published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub live: bool,
}

pub type ProjectDraft = Project<RawBody>;

impl ProjectDraft {
    pub fn validate(self, cx: &mut Validator<'_>) -> Project {
        validate_slug(cx, &self.slug);
        cx.text("title", &self.title, TITLE);
        cx.text("subtitle", &self.subtitle, TextRule::optional().max(160));
        if let Some(cover) = self.cover_image {
            cx.image("cover_image", cover);
        }
        let external_url = cx.url("external_url", self.external_url.as_deref().unwrap_or(""), false);
        let github_url = cx.url("github_url", self.github_url.as_deref().unwrap_or(""), false);
        validate_tags(cx, &self.tags);
        let body = read_body(&self.body, cx, "body");
        Project {
            slug: self.slug,
            title: self.title,
            subtitle: self.subtitle,
            cover_image: self.cover_image,
            external_url,
            github_url,
            tags: self.tags,
            body,
            first_published_at: self.first_published_at,
            live: self.live,
        }
    }

    pub fn into_project(self, images: &dyn ImageSource) -> Result<Project, ValidationErrors> {
        let mut cx = Validator::new(images);
        let project = self.validate(&mut cx);
        cx.finish(project)
    }
}

impl<B> Project<B> {
    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == slug)
    }
}

impl Project {
    /// The card image: `cover_image`, then the same body fallback as posts.
    pub fn cover(&self, images: &dyn ImageSource) -> Option<ResolvedImage> {
        let candidates: Vec<ImageId> = self
            .cover_image
            .into_iter()
            .chain(self.body.image_candidates())
            .collect();
        images.first_resolved(&candidates)
    }
}
