//! Authoring endpoints, mounted only when `admin.enabled` is set.
//!
//! Every change goes through [`AppState::update`]: it is applied to a copy
//! of the site, written to the content file, and served only once the write
//! succeeded. Files a change orphans are deleted after that.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::{delete, get, post, put},
};
use folio_engine::media::upload::{MAX_DOC_UPLOAD_MB, MAX_IMAGE_UPLOAD_MB};
use folio_engine::media::{
    MediaStorage, Upload, portfolio_upload_name, site_upload_name, upload_name,
    validate_document, validate_image,
};
use folio_engine::models::{
    BlogPostDraft, Education, Experience, Image, ImageId, PortfolioCategory, PortfolioItem,
    ProjectDraft, SiteAsset, SiteCopy, Skill,
};
use relative_path::RelativePathBuf;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Headroom over the largest accepted upload so oversize files reach the
/// validator and get its message.
const BODY_LIMIT: usize = (if MAX_IMAGE_UPLOAD_MB > MAX_DOC_UPLOAD_MB {
    MAX_IMAGE_UPLOAD_MB
} else {
    MAX_DOC_UPLOAD_MB
} + 1)
    * 1024
    * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cms/blog/{slug}", put(save_blog_post).delete(delete_blog_post))
        .route("/cms/portfolio/{slug}", put(save_project).delete(delete_project))
        .route("/cms/images", post(upload_image))
        .route("/cms/documents", post(upload_document))
        .route(
            "/admin/portfolio-items/{slug}",
            put(save_portfolio_item).delete(delete_portfolio_item),
        )
        .route(
            "/admin/portfolio-categories",
            get(list_portfolio_categories).put(save_portfolio_category),
        )
        .route(
            "/admin/portfolio-categories/{id}",
            delete(delete_portfolio_category),
        )
        .route("/admin/education", put(save_education))
        .route("/admin/education/{id}", delete(delete_education))
        .route("/admin/experience", put(save_experience))
        .route("/admin/experience/{id}", delete(delete_experience))
        .route("/admin/skills", put(save_skill))
        .route("/admin/skills/{id}", delete(delete_skill))
        .route("/admin/site-copy", put(save_site_copy))
        .route("/admin/site-assets", put(save_site_asset))
        .route("/admin/site-assets/{id}", delete(delete_site_asset))
        .route("/admin/uploads/portfolio", post(upload_portfolio_file))
        .route("/admin/uploads/site", post(upload_site_file))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    filename: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    alt: String,
}

#[derive(Debug, Serialize)]
pub struct Saved {
    id: u32,
}

#[derive(Debug, Serialize)]
pub struct Stored {
    name: String,
    url: String,
}

fn read_upload(query: &UploadQuery, headers: &HeaderMap, body: Bytes) -> Result<Upload, AppError> {
    if query.filename.trim().is_empty() {
        return Err(AppError::BadRequest("filename is required".to_string()));
    }
    let upload = Upload::new(query.filename.trim(), body.to_vec());
    Ok(match headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        Some(content_type) => upload.with_content_type(content_type),
        None => upload,
    })
}

// ---- pages ---------------------------------------------------------------

async fn save_blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(mut draft): Json<BlogPostDraft>,
) -> Result<StatusCode, AppError> {
    draft.slug = slug;
    state
        .update(|site| Ok(site.save_blog_post(draft).map(|_| ())?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .update(|site| Ok(site.delete_blog_post(&slug).map(|_| ())?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn save_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(mut draft): Json<ProjectDraft>,
) -> Result<StatusCode, AppError> {
    draft.slug = slug;
    state
        .update(|site| Ok(site.save_project(draft).map(|_| ())?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .update(|site| Ok(site.delete_project(&slug).map(|_| ())?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- media library ---------------------------------------------------------

async fn upload_image(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Saved>), AppError> {
    let storage = state.storage()?;
    let upload = read_upload(&query, &headers, body)?;
    validate_image(&upload)?;

    let name = upload_name("images", &upload.filename);
    storage.save(&name, &upload.bytes).map_err(|e| AppError::Internal(e.into()))?;

    let title = if query.title.is_empty() {
        upload.filename.clone()
    } else {
        query.title.clone()
    };
    let alt = query.alt.clone();
    let ImageId(id) = state
        .update(|site| {
            Ok(site.add_image(Image {
                id: ImageId(0),
                title,
                file: name,
                alt,
            }))
        })
        .await?;
    log::info!("Uploaded image {id}");
    Ok((StatusCode::CREATED, Json(Saved { id })))
}

async fn upload_document(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Stored>), AppError> {
    let storage = state.storage()?;
    let upload = read_upload(&query, &headers, body)?;
    validate_document(&upload)?;
    let name = upload_name("documents", &upload.filename);
    store(storage, name, &upload.bytes)
}

fn store(
    storage: &dyn MediaStorage,
    name: RelativePathBuf,
    bytes: &[u8],
) -> Result<(StatusCode, Json<Stored>), AppError> {
    storage.save(&name, bytes).map_err(|e| AppError::Internal(e.into()))?;
    log::info!("Stored upload {name}");
    Ok((
        StatusCode::CREATED,
        Json(Stored {
            url: storage.url(&name),
            name: name.into_string(),
        }),
    ))
}

// ---- legacy portfolio --------------------------------------------------------

async fn save_portfolio_item(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(mut item): Json<PortfolioItem>,
) -> Result<Json<Saved>, AppError> {
    state.storage()?;
    item.slug = slug;
    let (id, cleanup) = state
        .update(|site| Ok(site.save_portfolio_item(item)?))
        .await?;
    state.clean_up(cleanup).await;
    Ok(Json(Saved { id }))
}

async fn delete_portfolio_item(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.storage()?;
    let (_, cleanup) = state
        .update(|site| Ok(site.delete_portfolio_item(&slug)?))
        .await?;
    state.clean_up(cleanup).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Every category, inactive ones included, in display order.
async fn list_portfolio_categories(
    State(state): State<AppState>,
) -> Json<Vec<PortfolioCategory>> {
    Json(state.site.read().await.portfolio_categories().to_vec())
}

async fn save_portfolio_category(
    State(state): State<AppState>,
    Json(category): Json<PortfolioCategory>,
) -> Result<Json<Saved>, AppError> {
    let id = state
        .update(|site| Ok(site.save_portfolio_category(category)?))
        .await?;
    Ok(Json(Saved { id }))
}

async fn delete_portfolio_category(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    state
        .update(|site| Ok(site.delete_portfolio_category(id).map(|_| ())?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- résumé --------------------------------------------------------------------

async fn save_education(
    State(state): State<AppState>,
    Json(entry): Json<Education>,
) -> Result<Json<Saved>, AppError> {
    let id = state.update(|site| Ok(site.save_education(entry)?)).await?;
    Ok(Json(Saved { id }))
}

async fn delete_education(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    state
        .update(|site| Ok(site.delete_education(id).map(|_| ())?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn save_experience(
    State(state): State<AppState>,
    Json(entry): Json<Experience>,
) -> Result<Json<Saved>, AppError> {
    let id = state.update(|site| Ok(site.save_experience(entry)?)).await?;
    Ok(Json(Saved { id }))
}

async fn delete_experience(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    state
        .update(|site| Ok(site.delete_experience(id).map(|_| ())?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn save_skill(
    State(state): State<AppState>,
    Json(skill): Json<Skill>,
) -> Result<Json<Saved>, AppError> {
    let id = state.update(|site| Ok(site.save_skill(skill)?)).await?;
    Ok(Json(Saved { id }))
}

async fn delete_skill(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    state
        .update(|site| Ok(site.delete_skill(id).map(|_| ())?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- site copy and assets --------------------------------------------------

async fn save_site_copy(
    State(state): State<AppState>,
    Json(copy): Json<SiteCopy>,
) -> Result<Json<Saved>, AppError> {
    let id = state.update(|site| Ok(site.save_site_copy(copy)?)).await?;
    Ok(Json(Saved { id }))
}

async fn save_site_asset(
    State(state): State<AppState>,
    Json(asset): Json<SiteAsset>,
) -> Result<Json<Saved>, AppError> {
    state.storage()?;
    let (id, cleanup) = state
        .update(|site| Ok(site.save_site_asset(asset)?))
        .await?;
    state.clean_up(cleanup).await;
    Ok(Json(Saved { id }))
}

async fn delete_site_asset(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    state.storage()?;
    let (_, cleanup) = state
        .update(|site| Ok(site.delete_site_asset(id)?))
        .await?;
    state.clean_up(cleanup).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_portfolio_file(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Stored>), AppError> {
    let storage = state.storage()?;
    let upload = read_upload(&query, &headers, body)?;
    validate_image(&upload)?;
    store(storage, portfolio_upload_name(&upload.filename), &upload.bytes)
}

async fn upload_site_file(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Stored>), AppError> {
    let storage = state.storage()?;
    let upload = read_upload(&query, &headers, body)?;
    validate_image(&upload)?;
    store(storage, site_upload_name(&upload.filename), &upload.bytes)
}
