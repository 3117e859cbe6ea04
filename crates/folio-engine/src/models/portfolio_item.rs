//! Hand-built portfolio entries that predate block-based projects. They are
//! still listed and served by slug when no project claims it.

use relative_path::{RelativePath, RelativePathBuf};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tag::{is_valid_slug, slugify};
use crate::blocks::{TextRule, Validator};
use crate::media::{FileFields, MediaStorage};

const SLUG_MAX: usize = 160;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioCategory {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl PortfolioCategory {
    /// Fills the slug from the name when blank.
    pub fn ensure_slug(&mut self) {
        if self.slug.is_empty() {
            self.slug = slugify(&self.name);
        }
    }

    pub fn validate(&self, cx: &mut Validator<'_>, rows: &[PortfolioCategory]) {
        cx.text("name", &self.name, TextRule::required().max(60));
        if rows
            .iter()
            .any(|other| other.id != self.id && other.name == self.name)
        {
            cx.error("name", "Portfolio category with this name already exists.");
        }
        if rows
            .iter()
            .any(|other| other.id != self.id && other.slug == self.slug)
        {
            cx.error("slug", "Portfolio category with this slug already exists.");
        }
    }
}

/// Categories by `(order, name)`.
pub fn sort_categories(categories: &mut [PortfolioCategory]) {
    categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    #[serde(default)]
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub subtitle: String,
    /// Category slugs.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Grid thumbnail.
    pub image: RelativePathBuf,
    /// Detail header.
    #[serde(default)]
    pub hero: Option<RelativePathBuf>,
    #[serde(default)]
    pub lightbox_image: Option<RelativePathBuf>,
    #[serde(default)]
    pub external_url: String,
    /// Editor HTML; may reference uploads under `ckeditor/`.
    #[serde(default)]
    pub body_html: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl PortfolioItem {
    /// Fills a blank slug from the title, or a short random one when the
    /// title has nothing sluggable.
    pub fn ensure_slug(&mut self) {
        if !self.slug.is_empty() {
            return;
        }
        let slug: String = slugify(&self.title).chars().take(SLUG_MAX).collect();
        self.slug = if slug.is_empty() {
            Uuid::new_v4().simple().to_string()[..12].to_string()
        } else {
            slug
        };
    }

    pub fn validate(&self, cx: &mut Validator<'_>, rows: &[PortfolioItem]) {
        cx.text("title", &self.title, TextRule::required().max(140));
        cx.text("slug", &self.slug, TextRule::required().max(SLUG_MAX));
        if !self.slug.is_empty() && !is_valid_slug(&self.slug) {
            cx.error(
                "slug",
                "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            );
        }
        if rows
            .iter()
            .any(|other| other.id != self.id && other.slug == self.slug)
        {
            cx.error("slug", "Portfolio item with this slug already exists.");
        }
        cx.text("subtitle", &self.subtitle, TextRule::optional().max(160));
        cx.text("image", self.image.as_str(), TextRule::required());
        cx.url("external_url", &self.external_url, false);
    }

    /// The file a lightbox should open: the dedicated lightbox image, else
    /// the thumbnail.
    pub fn lightbox_file(&self) -> &RelativePath {
        self.lightbox_image
            .as_deref()
            .unwrap_or(self.image.as_relative_path())
    }

    pub fn lightbox_url(&self, storage: &dyn MediaStorage) -> String {
        storage.url(self.lightbox_file())
    }

    pub fn in_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c == slug)
    }
}

impl FileFields for PortfolioItem {
    fn file_names(&self) -> Vec<&RelativePath> {
        let mut names = vec![self.image.as_relative_path()];
        names.extend(self.hero.as_deref());
        names.extend(self.lightbox_image.as_deref());
        names
    }
}

/// Items by `(order, id)`.
pub fn sort_items(items: &mut [PortfolioItem]) {
    items.sort_by_key(|item| (item.order, item.id));
}

fn default_true() -> bool {
    true
}
