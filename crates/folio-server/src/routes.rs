use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use dioxus::prelude::Element;
use folio_engine::listing::{self, blog::post_tags, portfolio::project_tags};
use folio_engine::models::AssetKey;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::ui::{self, about::Profile};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PortfolioQuery {
    tag: Option<String>,
    /// Narrows legacy items on the unfiltered listing.
    category: Option<String>,
}

fn page(state: &AppState, title: &str, content: Element) -> Html<String> {
    Html(ui::render_page(&state.config.site.title, title, content))
}

fn profile<'a>(state: &AppState, site: &'a folio_engine::Site, key: AssetKey) -> Option<Profile<'a>> {
    let asset = site.active_asset(key)?;
    Some(Profile {
        url: state.file_url(&asset.image)?,
        alt: &asset.alt_text,
    })
}

pub async fn home(State(state): State<AppState>) -> Html<String> {
    let site = state.site.read().await;
    let recent: Vec<_> = listing::live_posts(site.posts()).into_iter().take(3).collect();
    let profile = profile(&state, &site, AssetKey::HomeProfile);
    let content = ui::pages::home(&site.home, &recent, profile.as_ref());
    page(&state, &site.home.title, content)
}

pub async fn about(State(state): State<AppState>) -> Html<String> {
    let site = state.site.read().await;
    let skills = site.active_skills();
    let profile = profile(&state, &site, AssetKey::AboutProfile);
    let content = ui::about::about(&site, &skills, profile.as_ref());
    page(&state, "About", content)
}

pub async fn resume(State(state): State<AppState>) -> Html<String> {
    let site = state.site.read().await;
    let content = ui::about::resume(site.education(), site.experience());
    page(&state, "Résumé", content)
}

pub async fn contact(State(state): State<AppState>) -> Html<String> {
    let content = ui::pages::contact(state.config.site.contact_email.as_deref());
    page(&state, "Contact", content)
}

pub async fn blog_index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let site = state.site.read().await;
    let listing = listing::blog_index(
        site.posts(),
        state.config.site.posts_per_page,
        query.page.as_deref(),
    );
    let images = state.images(&site);
    let content = ui::blog::index(&site.blog_index.title, &listing, images.as_ref());
    page(&state, &site.blog_index.title, content)
}

pub async fn blog_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let site = state.site.read().await;
    let listing = listing::blog_by_tag(
        site.posts(),
        &slug,
        state.config.site.posts_per_page,
        query.page.as_deref(),
    );
    let heading = post_tags(site.posts())
        .into_iter()
        .find(|t| t.slug == slug)
        .map_or(slug.clone(), |t| t.name.clone());
    let images = state.images(&site);
    let content = ui::blog::index(&heading, &listing, images.as_ref());
    page(&state, &heading, content)
}

pub async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let site = state.site.read().await;
    let post = site.live_post(&slug).ok_or(AppError::NotFound)?;
    let neighbours = listing::neighbours(site.posts(), &slug);
    let images = state.images(&site);
    let content = ui::blog::post(post, &neighbours, images.as_ref());
    Ok(page(&state, &post.title, content))
}

async fn portfolio_listing(
    state: &AppState,
    tag: Option<&str>,
    category: Option<&str>,
) -> Html<String> {
    let site = state.site.read().await;
    let listing = listing::portfolio_index(site.projects(), site.portfolio_items(), tag)
        .narrow_to_category(category);
    let tags = project_tags(site.projects());
    let categories = site.active_categories();
    let images = state.images(&site);
    let thumb = |item: &folio_engine::models::PortfolioItem| state.file_url(&item.image);
    let content = ui::portfolio::index(
        &site.portfolio_index,
        &listing,
        &tags,
        &categories,
        images.as_ref(),
        &thumb,
    );
    page(state, &site.portfolio_index.title, content)
}

pub async fn portfolio_index(
    State(state): State<AppState>,
    Query(query): Query<PortfolioQuery>,
) -> Html<String> {
    portfolio_listing(&state, query.tag.as_deref(), query.category.as_deref()).await
}

pub async fn portfolio_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Html<String> {
    portfolio_listing(&state, Some(&slug), None).await
}

/// A project, or failing that a legacy portfolio item with the same slug.
pub async fn portfolio_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let site = state.site.read().await;
    if let Some(project) = site.live_project(&slug) {
        let images = state.images(&site);
        let content = ui::portfolio::project(project, images.as_ref());
        return Ok(page(&state, &project.title, content));
    }

    let item = site.portfolio_item(&slug).ok_or(AppError::NotFound)?;
    let hero = item.hero.as_deref().unwrap_or(item.image.as_relative_path());
    let content = ui::portfolio::legacy_item(
        item,
        state.file_url(hero),
        state.file_url(item.lightbox_file()),
    );
    Ok(page(&state, &item.title, content))
}

/// `/media/*` when storage could not be prepared at startup.
pub async fn media_unavailable() -> AppError {
    AppError::StorageUnavailable
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(ui::pages::not_found()))
}
