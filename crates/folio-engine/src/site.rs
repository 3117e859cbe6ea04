//! The in-memory content store.
//!
//! Every save is whole-entity: the incoming value is validated against the
//! current state first and only then replaces the stored one, so a rejected
//! save leaves the site untouched.
//!
//! Saves that orphan uploaded files hand back a [`Cleanup`] instead of
//! deleting anything, so callers can store the new state before files go.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::blocks::{FieldError, MediaCheck, ValidationErrors, Validator};
use crate::media::Cleanup;
use crate::models::image::{Image, ImageId, MediaLibrary};
use crate::models::page::{
    BlogIndex, BlogPost, BlogPostDraft, HomePage, PortfolioIndex, Project, ProjectDraft,
};
use crate::models::portfolio_item::{
    PortfolioCategory, PortfolioItem, sort_categories, sort_items,
};
use crate::models::resume::{Education, Experience, Skill, active_skills, sort_dated, sort_skills};
use crate::models::site_copy::{AssetKey, CopyKey, SiteAsset, SiteCopy, active_for};

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("No {kind} found for `{key}`")]
    NotFound { kind: &'static str, key: String },
}

impl SiteError {
    fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        SiteError::NotFound {
            kind,
            key: key.into(),
        }
    }
}

/// The content file as stored: pages with bodies in block storage encoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteData {
    pub home: HomePage,
    pub blog_index: BlogIndex,
    pub portfolio_index: PortfolioIndex,
    pub images: Vec<Image>,
    pub posts: Vec<BlogPostDraft>,
    pub projects: Vec<ProjectDraft>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<Skill>,
    pub site_copy: Vec<SiteCopy>,
    pub site_assets: Vec<SiteAsset>,
    pub portfolio_categories: Vec<PortfolioCategory>,
    pub portfolio_items: Vec<PortfolioItem>,
}

/// Borrowed view of a [`Site`] in content-file layout.
#[derive(Serialize)]
pub struct SiteSnapshot<'a> {
    home: &'a HomePage,
    blog_index: &'a BlogIndex,
    portfolio_index: &'a PortfolioIndex,
    images: Vec<&'a Image>,
    posts: &'a [BlogPost],
    projects: &'a [Project],
    education: &'a [Education],
    experience: &'a [Experience],
    skills: &'a [Skill],
    site_copy: &'a [SiteCopy],
    site_assets: &'a [SiteAsset],
    portfolio_categories: &'a [PortfolioCategory],
    portfolio_items: &'a [PortfolioItem],
}

/// Moves every error under `prefix`, e.g. `body[0]` becomes `posts[2].body[0]`.
fn scoped(prefix: &str, errors: ValidationErrors) -> ValidationErrors {
    ValidationErrors {
        errors: errors
            .errors
            .into_iter()
            .map(|e| FieldError {
                path: format!("{prefix}.{}", e.path),
                message: e.message,
            })
            .collect(),
    }
}

fn next_id(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().unwrap_or(0) + 1
}

/// Where a row with `id` goes: `None` for a new row (id 0), else the index of
/// the row it replaces.
fn slot<T>(
    rows: &[T],
    id: u32,
    row_id: impl Fn(&T) -> u32,
    kind: &'static str,
) -> Result<Option<usize>, SiteError> {
    if id == 0 {
        return Ok(None);
    }
    rows.iter()
        .position(|row| row_id(row) == id)
        .map(Some)
        .ok_or_else(|| SiteError::not_found(kind, id.to_string()))
}

fn remove_by_id<T>(
    rows: &mut Vec<T>,
    id: u32,
    row_id: impl Fn(&T) -> u32,
    kind: &'static str,
) -> Result<T, SiteError> {
    let i = rows
        .iter()
        .position(|row| row_id(row) == id)
        .ok_or_else(|| SiteError::not_found(kind, id.to_string()))?;
    Ok(rows.remove(i))
}

fn upsert<T>(rows: &mut Vec<T>, slot: Option<usize>, row: T) {
    match slot {
        Some(i) => rows[i] = row,
        None => rows.push(row),
    }
}

/// Item categories that name no known category.
fn check_item_categories(
    cx: &mut Validator<'_>,
    item: &PortfolioItem,
    categories: &[PortfolioCategory],
) {
    for (i, slug) in item.categories.iter().enumerate() {
        if !categories.iter().any(|c| &c.slug == slug) {
            cx.error(
                format!("categories[{i}]"),
                format!("Unknown portfolio category `{slug}`."),
            );
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Site {
    pub home: HomePage,
    pub blog_index: BlogIndex,
    pub portfolio_index: PortfolioIndex,
    library: MediaLibrary,
    posts: Vec<BlogPost>,
    projects: Vec<Project>,
    education: Vec<Education>,
    experience: Vec<Experience>,
    skills: Vec<Skill>,
    copy: Vec<SiteCopy>,
    assets: Vec<SiteAsset>,
    categories: Vec<PortfolioCategory>,
    items: Vec<PortfolioItem>,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a site from stored content.
    ///
    /// Everything goes through the same checks as an authoring save, except
    /// that image references are not required to resolve: an image deleted
    /// since the content was saved just stops rendering.
    pub fn from_data(data: SiteData) -> Result<Self, SiteError> {
        let mut library = MediaLibrary::new();
        for image in data.images {
            library.add(image);
        }

        let mut errors = Vec::new();
        let mut collect = |prefix: String, result: Result<(), ValidationErrors>| {
            if let Err(e) = result {
                errors.extend(scoped(&prefix, e).errors);
            }
        };

        let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
        data.home.validate(&mut cx);
        collect("home".into(), cx.finish(()));
        let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
        data.blog_index.validate(&mut cx);
        collect("blog_index".into(), cx.finish(()));
        let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
        data.portfolio_index.validate(&mut cx);
        collect("portfolio_index".into(), cx.finish(()));

        let mut posts: Vec<BlogPost> = Vec::with_capacity(data.posts.len());
        for (i, draft) in data.posts.into_iter().enumerate() {
            let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
            let post = draft.validate(&mut cx);
            if posts.iter().any(|p| p.slug == post.slug) {
                cx.error("slug", format!("Duplicate post slug `{}`.", post.slug));
            }
            match cx.finish(post) {
                Ok(post) => posts.push(post),
                Err(e) => collect(format!("posts[{i}]"), Err(e)),
            }
        }

        let mut projects: Vec<Project> = Vec::with_capacity(data.projects.len());
        for (i, draft) in data.projects.into_iter().enumerate() {
            let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
            let project = draft.validate(&mut cx);
            if projects.iter().any(|p| p.slug == project.slug) {
                cx.error("slug", format!("Duplicate project slug `{}`.", project.slug));
            }
            match cx.finish(project) {
                Ok(project) => projects.push(project),
                Err(e) => collect(format!("projects[{i}]"), Err(e)),
            }
        }

        for (i, entry) in data.education.iter().enumerate() {
            let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
            entry.validate(&mut cx);
            collect(format!("education[{i}]"), cx.finish(()));
        }
        for (i, entry) in data.experience.iter().enumerate() {
            let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
            entry.validate(&mut cx);
            collect(format!("experience[{i}]"), cx.finish(()));
        }
        for (i, skill) in data.skills.iter().enumerate() {
            let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
            skill.validate(&mut cx);
            collect(format!("skills[{i}]"), cx.finish(()));
        }
        for (i, copy) in data.site_copy.iter().enumerate() {
            let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
            copy.validate(&mut cx, &data.site_copy[..i]);
            collect(format!("site_copy[{i}]"), cx.finish(()));
        }
        for (i, asset) in data.site_assets.iter().enumerate() {
            let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
            asset.validate(&mut cx, &data.site_assets[..i]);
            collect(format!("site_assets[{i}]"), cx.finish(()));
        }

        let mut categories = data.portfolio_categories;
        for category in &mut categories {
            category.ensure_slug();
        }
        for (i, category) in categories.iter().enumerate() {
            let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
            category.validate(&mut cx, &categories[..i]);
            collect(format!("portfolio_categories[{i}]"), cx.finish(()));
        }

        let mut items = data.portfolio_items;
        for item in &mut items {
            item.ensure_slug();
        }
        for (i, item) in items.iter().enumerate() {
            let mut cx = Validator::with_media_check(&library, MediaCheck::Skip);
            item.validate(&mut cx, &items[..i]);
            check_item_categories(&mut cx, item, &categories);
            collect(format!("portfolio_items[{i}]"), cx.finish(()));
        }

        if !errors.is_empty() {
            return Err(ValidationErrors { errors }.into());
        }

        let mut education = data.education;
        sort_dated(&mut education);
        let mut experience = data.experience;
        sort_dated(&mut experience);
        let mut skills = data.skills;
        sort_skills(&mut skills);
        sort_categories(&mut categories);
        sort_items(&mut items);

        log::info!(
            "Loaded site: {} posts, {} projects, {} images",
            posts.len(),
            projects.len(),
            library.len()
        );

        Ok(Self {
            home: data.home,
            blog_index: data.blog_index,
            portfolio_index: data.portfolio_index,
            library,
            posts,
            projects,
            education,
            experience,
            skills,
            copy: data.site_copy,
            assets: data.site_assets,
            categories,
            items,
        })
    }

    pub fn snapshot(&self) -> SiteSnapshot<'_> {
        SiteSnapshot {
            home: &self.home,
            blog_index: &self.blog_index,
            portfolio_index: &self.portfolio_index,
            images: self.library.images().collect(),
            posts: &self.posts,
            projects: &self.projects,
            education: &self.education,
            experience: &self.experience,
            skills: &self.skills,
            site_copy: &self.copy,
            site_assets: &self.assets,
            portfolio_categories: &self.categories,
            portfolio_items: &self.items,
        }
    }

    pub fn library(&self) -> &MediaLibrary {
        &self.library
    }

    /// Registers an uploaded image and returns its id.
    pub fn add_image(&mut self, image: Image) -> ImageId {
        if self.library.get(image.id).is_some() || image.id.0 == 0 {
            self.library.add_new(image.title, image.file, image.alt)
        } else {
            let id = image.id;
            self.library.add(image);
            id
        }
    }

    // ---- blog ------------------------------------------------------------

    /// Creates or replaces the post with the draft's slug.
    pub fn save_blog_post(&mut self, draft: BlogPostDraft) -> Result<&BlogPost, SiteError> {
        let mut post = {
            let mut cx = Validator::new(&self.library);
            let post = draft.validate(&mut cx);
            cx.finish(post)?
        };

        let existing = self.posts.iter().position(|p| p.slug == post.slug);
        let published = existing.and_then(|i| self.posts[i].first_published_at);
        post.first_published_at = published.or(post.first_published_at);
        if post.live && post.first_published_at.is_none() {
            post.first_published_at = Some(Utc::now());
        }

        log::info!("Saved blog post {}", post.slug);
        let index = match existing {
            Some(i) => {
                self.posts[i] = post;
                i
            }
            None => {
                self.posts.push(post);
                self.posts.len() - 1
            }
        };
        Ok(&self.posts[index])
    }

    /// Removes a post together with its body.
    pub fn delete_blog_post(&mut self, slug: &str) -> Result<BlogPost, SiteError> {
        let i = self
            .posts
            .iter()
            .position(|p| p.slug == slug)
            .ok_or_else(|| SiteError::not_found("blog post", slug))?;
        log::info!("Deleted blog post {slug}");
        Ok(self.posts.remove(i))
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn live_post(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.live && p.slug == slug)
    }

    // ---- projects --------------------------------------------------------

    pub fn save_project(&mut self, draft: ProjectDraft) -> Result<&Project, SiteError> {
        let mut project = {
            let mut cx = Validator::new(&self.library);
            let project = draft.validate(&mut cx);
            cx.finish(project)?
        };

        let existing = self.projects.iter().position(|p| p.slug == project.slug);
        let published = existing.and_then(|i| self.projects[i].first_published_at);
        project.first_published_at = published.or(project.first_published_at);
        if project.live && project.first_published_at.is_none() {
            project.first_published_at = Some(Utc::now());
        }

        log::info!("Saved project {}", project.slug);
        let index = match existing {
            Some(i) => {
                self.projects[i] = project;
                i
            }
            None => {
                self.projects.push(project);
                self.projects.len() - 1
            }
        };
        Ok(&self.projects[index])
    }

    pub fn delete_project(&mut self, slug: &str) -> Result<Project, SiteError> {
        let i = self
            .projects
            .iter()
            .position(|p| p.slug == slug)
            .ok_or_else(|| SiteError::not_found("project", slug))?;
        log::info!("Deleted project {slug}");
        Ok(self.projects.remove(i))
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn live_project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.live && p.slug == slug)
    }

    // ---- legacy portfolio ------------------------------------------------

    /// Creates or replaces a legacy item, matched by id or else by slug.
    /// Returns the files the old version used that nothing needs any more.
    pub fn save_portfolio_item(
        &mut self,
        mut item: PortfolioItem,
    ) -> Result<(u32, Cleanup), SiteError> {
        item.ensure_slug();
        let existing = self
            .items
            .iter()
            .position(|i| item.id != 0 && i.id == item.id)
            .or_else(|| self.items.iter().position(|i| i.slug == item.slug));
        item.id = match existing {
            Some(i) => self.items[i].id,
            None => next_id(self.items.iter().map(|i| i.id)),
        };

        let mut cx = Validator::new(&self.library);
        item.validate(&mut cx, &self.items);
        check_item_categories(&mut cx, &item, &self.categories);
        cx.finish(())?;

        let id = item.id;
        let mut cleanup = Cleanup::new();
        match existing {
            Some(i) => {
                let old = std::mem::replace(&mut self.items[i], item);
                let others: Vec<&PortfolioItem> =
                    self.items.iter().filter(|other| other.id != id).collect();
                cleanup.on_update(&old, &self.items[i], &others);
                cleanup.on_body_update(&old.body_html, &self.items[i].body_html);
            }
            None => self.items.push(item),
        }
        sort_items(&mut self.items);
        log::info!("Saved portfolio item {id}");
        Ok((id, cleanup))
    }

    /// Removes a legacy item. Returns it with every file only it referenced.
    pub fn delete_portfolio_item(
        &mut self,
        slug: &str,
    ) -> Result<(PortfolioItem, Cleanup), SiteError> {
        let i = self
            .items
            .iter()
            .position(|item| item.slug == slug)
            .ok_or_else(|| SiteError::not_found("portfolio item", slug))?;
        let removed = self.items.remove(i);

        let others: Vec<&PortfolioItem> = self.items.iter().collect();
        let mut cleanup = Cleanup::new();
        cleanup.on_delete(&removed, &others);
        cleanup.on_body_delete(&removed.body_html);

        log::info!("Deleted portfolio item {slug}");
        Ok((removed, cleanup))
    }

    /// Items by `(order, id)`, inactive ones included.
    pub fn portfolio_items(&self) -> &[PortfolioItem] {
        &self.items
    }

    pub fn portfolio_item(&self, slug: &str) -> Option<&PortfolioItem> {
        self.items.iter().find(|i| i.active && i.slug == slug)
    }

    /// Creates (id 0) or replaces a category. Items filed under a renamed
    /// slug follow it.
    pub fn save_portfolio_category(
        &mut self,
        mut category: PortfolioCategory,
    ) -> Result<u32, SiteError> {
        let existing = slot(&self.categories, category.id, |c| c.id, "portfolio category")?;
        if existing.is_none() {
            category.id = next_id(self.categories.iter().map(|c| c.id));
        }
        category.ensure_slug();
        let mut cx = Validator::new(&self.library);
        category.validate(&mut cx, &self.categories);
        cx.finish(())?;

        if let Some(i) = existing {
            let old_slug = &self.categories[i].slug;
            if *old_slug != category.slug {
                for slug in self.items.iter_mut().flat_map(|item| &mut item.categories) {
                    if slug == old_slug {
                        slug.clone_from(&category.slug);
                    }
                }
            }
        }

        let id = category.id;
        upsert(&mut self.categories, existing, category);
        sort_categories(&mut self.categories);
        log::info!("Saved portfolio category {id}");
        Ok(id)
    }

    /// Removes a category and files no item under it any more.
    pub fn delete_portfolio_category(&mut self, id: u32) -> Result<PortfolioCategory, SiteError> {
        let removed = remove_by_id(&mut self.categories, id, |c| c.id, "portfolio category")?;
        for item in &mut self.items {
            item.categories.retain(|slug| *slug != removed.slug);
        }
        log::info!("Deleted portfolio category {id}");
        Ok(removed)
    }

    /// Categories by `(order, name)`, inactive ones included.
    pub fn portfolio_categories(&self) -> &[PortfolioCategory] {
        &self.categories
    }

    pub fn active_categories(&self) -> Vec<&PortfolioCategory> {
        self.categories.iter().filter(|c| c.active).collect()
    }

    // ---- site copy and assets --------------------------------------------

    /// Creates (id 0) or replaces a copy entry. At most one entry per key
    /// may be active.
    pub fn save_site_copy(&mut self, mut copy: SiteCopy) -> Result<u32, SiteError> {
        let existing = slot(&self.copy, copy.id, |c| c.id, "site copy")?;
        if existing.is_none() {
            copy.id = next_id(self.copy.iter().map(|c| c.id));
        }
        let mut cx = Validator::new(&self.library);
        copy.validate(&mut cx, &self.copy);
        cx.finish(())?;

        let id = copy.id;
        upsert(&mut self.copy, existing, copy);
        Ok(id)
    }

    pub fn active_copy(&self, key: CopyKey) -> Option<&SiteCopy> {
        active_for(&self.copy, key)
    }

    /// The active text for `key`, or empty.
    pub fn copy_text(&self, key: CopyKey) -> &str {
        self.active_copy(key).map_or("", |c| c.text.as_str())
    }

    /// Creates (id 0) or replaces an asset. Returns the replaced file when
    /// nothing else uses it.
    pub fn save_site_asset(&mut self, mut asset: SiteAsset) -> Result<(u32, Cleanup), SiteError> {
        let existing = slot(&self.assets, asset.id, |a| a.id, "site asset")?;
        if existing.is_none() {
            asset.id = next_id(self.assets.iter().map(|a| a.id));
        }

        let mut cx = Validator::new(&self.library);
        asset.validate(&mut cx, &self.assets);
        cx.finish(())?;

        let id = asset.id;
        let mut cleanup = Cleanup::new();
        match existing {
            Some(i) => {
                let old = std::mem::replace(&mut self.assets[i], asset);
                let others: Vec<&SiteAsset> =
                    self.assets.iter().filter(|other| other.id != id).collect();
                cleanup.on_update(&old, &self.assets[i], &others);
            }
            None => self.assets.push(asset),
        }
        Ok((id, cleanup))
    }

    pub fn delete_site_asset(&mut self, id: u32) -> Result<(SiteAsset, Cleanup), SiteError> {
        let removed = remove_by_id(&mut self.assets, id, |a| a.id, "site asset")?;
        let others: Vec<&SiteAsset> = self.assets.iter().collect();
        let mut cleanup = Cleanup::new();
        cleanup.on_delete(&removed, &others);
        Ok((removed, cleanup))
    }

    pub fn active_asset(&self, key: AssetKey) -> Option<&SiteAsset> {
        active_for(&self.assets, key)
    }

    // ---- résumé ----------------------------------------------------------

    /// Creates (id 0) or replaces an education entry.
    pub fn save_education(&mut self, mut entry: Education) -> Result<u32, SiteError> {
        let existing = slot(&self.education, entry.id, |e| e.id, "education entry")?;
        if existing.is_none() {
            entry.id = next_id(self.education.iter().map(|e| e.id));
        }
        let mut cx = Validator::new(&self.library);
        entry.validate(&mut cx);
        cx.finish(())?;

        let id = entry.id;
        upsert(&mut self.education, existing, entry);
        sort_dated(&mut self.education);
        log::info!("Saved education entry {id}");
        Ok(id)
    }

    pub fn delete_education(&mut self, id: u32) -> Result<Education, SiteError> {
        let removed = remove_by_id(&mut self.education, id, |e| e.id, "education entry")?;
        log::info!("Deleted education entry {id}");
        Ok(removed)
    }

    /// Creates (id 0) or replaces an experience entry with its bullets.
    /// New bullets get ids after the entry's highest.
    pub fn save_experience(&mut self, mut entry: Experience) -> Result<u32, SiteError> {
        let existing = slot(&self.experience, entry.id, |e| e.id, "experience entry")?;
        if existing.is_none() {
            entry.id = next_id(self.experience.iter().map(|e| e.id));
        }
        let mut cx = Validator::new(&self.library);
        entry.validate(&mut cx);
        cx.finish(())?;

        let mut next_bullet = next_id(entry.bullets.iter().map(|b| b.id));
        for bullet in entry.bullets.iter_mut().filter(|b| b.id == 0) {
            bullet.id = next_bullet;
            next_bullet += 1;
        }
        entry.bullets.sort_by_key(|b| (b.order, b.id));

        let id = entry.id;
        upsert(&mut self.experience, existing, entry);
        sort_dated(&mut self.experience);
        log::info!("Saved experience entry {id}");
        Ok(id)
    }

    /// Removes an experience entry together with its bullets.
    pub fn delete_experience(&mut self, id: u32) -> Result<Experience, SiteError> {
        let removed = remove_by_id(&mut self.experience, id, |e| e.id, "experience entry")?;
        log::info!("Deleted experience entry {id}");
        Ok(removed)
    }

    /// Creates (id 0) or replaces a skill.
    pub fn save_skill(&mut self, mut skill: Skill) -> Result<u32, SiteError> {
        let existing = slot(&self.skills, skill.id, |s| s.id, "skill")?;
        if existing.is_none() {
            skill.id = next_id(self.skills.iter().map(|s| s.id));
        }
        let mut cx = Validator::new(&self.library);
        skill.validate(&mut cx);
        cx.finish(())?;

        let id = skill.id;
        upsert(&mut self.skills, existing, skill);
        sort_skills(&mut self.skills);
        log::info!("Saved skill {id}");
        Ok(id)
    }

    pub fn delete_skill(&mut self, id: u32) -> Result<Skill, SiteError> {
        let removed = remove_by_id(&mut self.skills, id, |s| s.id, "skill")?;
        log::info!("Deleted skill {id}");
        Ok(removed)
    }

    pub fn education(&self) -> &[Education] {
        &self.education
    }

    pub fn experience(&self) -> &[Experience] {
        &self.experience
    }

    pub fn active_skills(&self) -> Vec<&Skill> {
        active_skills(&self.skills)
    }
}
