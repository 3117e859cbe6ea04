use axum::{Router, routing::get};
use tower_http::services::ServeDir;

pub mod admin;
pub mod error;
pub mod routes;
pub mod state;
pub mod ui;

pub use error::AppError;
pub use state::AppState;

/// The public site, plus the authoring mounts when enabled.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(routes::home))
        .route("/about/", get(routes::about))
        .route("/resume/", get(routes::resume))
        .route("/contact/", get(routes::contact))
        .route("/blog/", get(routes::blog_index))
        .route("/blog/tag/{slug}/", get(routes::blog_tag))
        .route("/blog/{slug}/", get(routes::blog_post))
        .route("/portfolio/", get(routes::portfolio_index))
        .route("/portfolio/tag/{slug}/", get(routes::portfolio_tag))
        .route("/portfolio/{slug}/", get(routes::portfolio_detail));

    app = match state.storage {
        Some(_) => app.nest_service("/media", ServeDir::new(&state.config.media.root)),
        None => app.route("/media/{*path}", get(routes::media_unavailable)),
    };

    if state.config.admin.enabled {
        log::info!("Authoring endpoints enabled under /cms and /admin");
        app = app.merge(admin::router());
    }

    app.fallback(routes::not_found).with_state(state)
}
