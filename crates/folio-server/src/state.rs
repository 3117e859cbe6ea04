use std::sync::Arc;

use folio_config::Config;
use folio_engine::Site;
use folio_engine::media::{Cleanup, MediaStorage};
use folio_engine::models::{ImageId, ImageSource, ResolvedImage};
use relative_path::RelativePath;
use tokio::sync::RwLock;

use crate::error::AppError;

/// Shared by every handler. Reads take the site lock shared. Authoring saves
/// take it exclusively and write the content file back before releasing it.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<RwLock<Site>>,
    /// `None` when the media root could not be prepared at startup.
    pub storage: Option<Arc<dyn MediaStorage>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, site: Site, storage: Option<Arc<dyn MediaStorage>>) -> Self {
        Self {
            site: Arc::new(RwLock::new(site)),
            storage,
            config: Arc::new(config),
        }
    }

    pub fn storage(&self) -> Result<&dyn MediaStorage, AppError> {
        self.storage.as_deref().ok_or(AppError::StorageUnavailable)
    }

    /// Library images resolved to public URLs. Without storage nothing
    /// resolves and pages render without images.
    pub fn images<'a>(&'a self, site: &'a Site) -> Box<dyn ImageSource + 'a> {
        match self.storage.as_deref() {
            Some(storage) => Box::new(site.library().with_storage(storage)),
            None => Box::new(NoImages),
        }
    }

    pub fn file_url(&self, name: &RelativePath) -> Option<String> {
        self.storage.as_deref().map(|storage| storage.url(name))
    }

    /// Applies `change` to a copy of the site, writes the copy to the
    /// content file and only then serves it. A rejected change or a failed
    /// write leaves the served site as it was.
    pub async fn update<T>(
        &self,
        change: impl FnOnce(&mut Site) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut site = self.site.write().await;
        let mut next = site.clone();
        let out = change(&mut next)?;
        *site = self.persist(next).await?;
        Ok(out)
    }

    /// Writes the content file off the async workers and hands the site back.
    async fn persist(&self, site: Site) -> Result<Site, AppError> {
        let path = self.config.content_path.clone();
        tokio::task::spawn_blocking(move || {
            folio_engine::io::save_site(&path, &site).map(|()| site)
        })
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))
    }

    /// Deletes files a stored change left unreferenced. Failures are logged.
    pub async fn clean_up(&self, cleanup: Cleanup) {
        let Some(storage) = self.storage.clone() else {
            return;
        };
        if cleanup.is_empty() {
            return;
        }
        if let Err(e) = tokio::task::spawn_blocking(move || cleanup.run(storage.as_ref())).await {
            log::warn!("Media cleanup did not finish: {e}");
        }
    }
}

struct NoImages;

impl ImageSource for NoImages {
    fn resolve(&self, _id: ImageId) -> Option<ResolvedImage> {
        None
    }
}
