use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use relative_path::{RelativePath, RelativePathBuf};

use super::storage::MediaStorage;

/// A row that owns uploaded files.
pub trait FileFields {
    /// The stored file names of every populated file field.
    fn file_names(&self) -> Vec<&RelativePath>;
}

/// `src="/media/ckeditor/..."` or `src="ckeditor/..."`, any case.
static CKEDITOR_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)src="(?:/media/)?ckeditor/([^"]+)""#).expect("valid CKEditor image pattern")
});

/// Editor-uploaded image paths referenced by an HTML body, relative to the
/// `ckeditor/` folder.
pub fn ckeditor_images(html: &str) -> BTreeSet<String> {
    CKEDITOR_IMAGE_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Files that nothing references any more, gathered while a row is saved or
/// deleted and removed by [`Cleanup::run`] once the change is stored.
///
/// Removal is best-effort. Storage failures are logged and never propagate.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cleanup {
    files: BTreeSet<RelativePathBuf>,
}

impl Cleanup {
    pub fn new() -> Self {
        Self::default()
    }

    /// After `old` is replaced by `new`: files `old` had that `new` no longer
    /// has, unless one of `others` still references them.
    pub fn on_update<T: FileFields>(&mut self, old: &T, new: &T, others: &[&T]) {
        let kept: BTreeSet<&RelativePath> = new.file_names().into_iter().collect();
        for name in old.file_names() {
            if !kept.contains(name) {
                self.add_unshared(name, others);
            }
        }
    }

    /// After `removed` is deleted: all its files not shared with `others`.
    pub fn on_delete<T: FileFields>(&mut self, removed: &T, others: &[&T]) {
        for name in removed.file_names() {
            self.add_unshared(name, others);
        }
    }

    /// Editor images that were in `old_html` but not in `new_html`.
    pub fn on_body_update(&mut self, old_html: &str, new_html: &str) {
        let new_images = ckeditor_images(new_html);
        for rel in ckeditor_images(old_html).difference(&new_images) {
            self.add_ckeditor_image(rel);
        }
    }

    /// Every editor image referenced by `html`.
    pub fn on_body_delete(&mut self, html: &str) {
        for rel in ckeditor_images(html) {
            self.add_ckeditor_image(&rel);
        }
    }

    pub fn files(&self) -> impl Iterator<Item = &RelativePath> {
        self.files.iter().map(RelativePathBuf::as_relative_path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Deletes the collected files that still exist.
    pub fn run(self, storage: &dyn MediaStorage) {
        for name in &self.files {
            match storage.exists(name) {
                Ok(true) => match storage.delete(name) {
                    Ok(()) => log::info!("Deleted unreferenced media file {name}"),
                    Err(e) => log::warn!("Failed to delete media file {name}: {e}"),
                },
                Ok(false) => {}
                Err(e) => log::warn!("Failed to check media file {name}: {e}"),
            }
        }
    }

    fn add_unshared<T: FileFields>(&mut self, name: &RelativePath, others: &[&T]) {
        let shared = others
            .iter()
            .any(|other| other.file_names().contains(&name));
        if shared {
            log::debug!("Keeping {name}: still referenced");
            return;
        }
        self.files.insert(name.to_relative_path_buf());
    }

    fn add_ckeditor_image(&mut self, rel: &str) {
        self.files.insert(RelativePathBuf::from("ckeditor").join(rel));
    }
}
