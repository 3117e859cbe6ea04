use std::collections::BTreeMap;
use std::fmt;

use relative_path::RelativePathBuf;
use serde::{Deserialize, Serialize};

use crate::media::MediaStorage;

/// Reference to an image in the media library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u32);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An uploaded image, stored under `file` in media storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub title: String,
    pub file: RelativePathBuf,
    #[serde(default)]
    pub alt: String,
}

/// What a template needs to draw an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: String,
    pub alt: String,
}

/// Resolves image references. A miss means the image is gone; callers
/// degrade to "no image" rather than failing.
pub trait ImageSource {
    fn resolve(&self, id: ImageId) -> Option<ResolvedImage>;

    fn contains(&self, id: ImageId) -> bool {
        self.resolve(id).is_some()
    }

    /// The first candidate that resolves.
    fn first_resolved(&self, candidates: &[ImageId]) -> Option<ResolvedImage> {
        candidates.iter().find_map(|id| self.resolve(*id))
    }
}

/// All images known to the site, ordered by id.
#[derive(Debug, Default, Clone)]
pub struct MediaLibrary {
    images: BTreeMap<ImageId, Image>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, image: Image) {
        self.images.insert(image.id, image);
    }

    /// Adds a new image under the next free id.
    pub fn add_new(&mut self, title: String, file: RelativePathBuf, alt: String) -> ImageId {
        let id = ImageId(self.images.keys().last().map_or(1, |last| last.0 + 1));
        self.add(Image {
            id,
            title,
            file,
            alt,
        });
        id
    }

    pub fn get(&self, id: ImageId) -> Option<&Image> {
        self.images.get(&id)
    }

    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.images.values()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Pairs the library with storage so references resolve to URLs.
    pub fn with_storage<'a>(&'a self, storage: &'a dyn MediaStorage) -> LibraryImages<'a> {
        LibraryImages {
            library: self,
            storage,
        }
    }
}

/// Membership-only view, enough for validating references.
impl ImageSource for MediaLibrary {
    fn resolve(&self, id: ImageId) -> Option<ResolvedImage> {
        self.get(id).map(|image| ResolvedImage {
            url: image.file.to_string(),
            alt: alt_text(image),
        })
    }
}

pub struct LibraryImages<'a> {
    library: &'a MediaLibrary,
    storage: &'a dyn MediaStorage,
}

impl ImageSource for LibraryImages<'_> {
    fn resolve(&self, id: ImageId) -> Option<ResolvedImage> {
        self.library.get(id).map(|image| ResolvedImage {
            url: self.storage.url(&image.file),
            alt: alt_text(image),
        })
    }
}

fn alt_text(image: &Image) -> String {
    if image.alt.is_empty() {
        image.title.clone()
    } else {
        image.alt.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::FileSystemStorage;
    use tempfile::TempDir;

    fn image(id: u32, file: &str) -> Image {
        Image {
            id: ImageId(id),
            title: format!("Image {id}"),
            file: RelativePathBuf::from(file),
            alt: String::new(),
        }
    }

    #[test]
    fn new_library_is_empty() {
        let library = MediaLibrary::new();
        assert!(library.is_empty());
        assert_eq!(library.len(), 0);
    }

    #[test]
    fn add_new_assigns_next_id() {
        let mut library = MediaLibrary::new();
        library.add(image(4, "images/a.png"));
        let id = library.add_new("B".into(), RelativePathBuf::from("images/b.png"), "".into());
        assert_eq!(id, ImageId(5));

        let mut empty = MediaLibrary::new();
        assert_eq!(
            empty.add_new("A".into(), RelativePathBuf::from("a.png"), "".into()),
            ImageId(1)
        );
    }

    #[test]
    fn alt_text_falls_back_to_title() {
        let mut library = MediaLibrary::new();
        library.add(image(1, "images/a.png"));
        library.add(Image {
            alt: "A red bicycle".into(),
            ..image(2, "images/b.png")
        });

        assert_eq!(library.resolve(ImageId(1)).unwrap().alt, "Image 1");
        assert_eq!(library.resolve(ImageId(2)).unwrap().alt, "A red bicycle");
    }

    #[test]
    fn storage_view_resolves_urls() {
        let dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(dir.path(), "/media/").unwrap();
        let mut library = MediaLibrary::new();
        library.add(image(3, "images/c.jpg"));

        let images = library.with_storage(&storage);
        assert_eq!(
            images.resolve(ImageId(3)).unwrap().url,
            "/media/images/c.jpg"
        );
        assert_eq!(images.first_resolved(&[ImageId(9), ImageId(3)]).unwrap().url, "/media/images/c.jpg");
        assert!(images.first_resolved(&[ImageId(9)]).is_none());
    }
}
