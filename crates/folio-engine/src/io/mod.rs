use crate::site::{Site, SiteData, SiteError};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid content file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid content in {path}: {source}")]
    Content {
        path: PathBuf,
        #[source]
        source: SiteError,
    },
}

/// Read the raw content file.
pub fn read_site_data(path: &Path) -> Result<SiteData, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate the content file.
pub fn load_site(path: &Path) -> Result<Site, IoError> {
    let data = read_site_data(path)?;
    Site::from_data(data).map_err(|source| IoError::Content {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the content file, starting from an empty site when there is none yet.
pub fn load_site_or_default(path: &Path) -> Result<Site, IoError> {
    match load_site(path) {
        Err(IoError::NotFound(missing)) => {
            log::info!("No content file at {}, starting empty", missing.display());
            Ok(Site::new())
        }
        other => other,
    }
}

/// Write the site to `path`.
///
/// The file is written next to its destination and renamed into place, so a
/// crash mid-write leaves the previous content intact.
pub fn save_site(path: &Path, site: &Site) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&site.snapshot()).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    log::debug!("Saved site to {}", path.display());
    Ok(())
}
