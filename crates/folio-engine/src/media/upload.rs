use relative_path::RelativePathBuf;
use uuid::Uuid;

pub const MAX_IMAGE_UPLOAD_MB: usize = 10;
pub const MAX_DOC_UPLOAD_MB: usize = 10;

/// Document extensions accepted for upload, lowercase.
pub const ALLOWED_DOC_EXT: &[&str] = &[".pdf", ".docx", ".txt", ".xlsx", ".pptx"];

const MB: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Image file too large (max {MAX_IMAGE_UPLOAD_MB} MB).")]
    ImageTooLarge,
    #[error("Uploaded file does not appear to be an image.")]
    NotAnImage,
    #[error("Uploaded file is not a valid image.")]
    InvalidImage,
    #[error("Files with extension '{0}' are not allowed.")]
    ExtensionNotAllowed(String),
    #[error("Document too large (max {MAX_DOC_UPLOAD_MB} MB).")]
    DocumentTooLarge,
}

/// An uploaded file as received, before it is stored.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The lowercased extension including its dot, or empty.
    pub fn extension(&self) -> String {
        extension_of(&self.filename)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Sniffs the format from the leading bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::WebP)
        } else {
            None
        }
    }
}

fn extension_of(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rfind('.') {
        Some(0) | None => String::new(),
        Some(i) => name[i..].to_lowercase(),
    }
}

/// Storage name for an upload: `<prefix>/<uuid hex><lowercased ext>`.
pub fn upload_name(prefix: &str, filename: &str) -> RelativePathBuf {
    RelativePathBuf::from(format!(
        "{prefix}/{}{}",
        Uuid::new_v4().simple(),
        extension_of(filename)
    ))
}

pub fn portfolio_upload_name(filename: &str) -> RelativePathBuf {
    upload_name("portfolio", filename)
}

pub fn site_upload_name(filename: &str) -> RelativePathBuf {
    upload_name("site", filename)
}

/// Checks size, the declared content type and the image signature.
pub fn validate_image(upload: &Upload) -> Result<ImageFormat, UploadError> {
    if upload.bytes.len() > MAX_IMAGE_UPLOAD_MB * MB {
        return Err(UploadError::ImageTooLarge);
    }
    if let Some(content_type) = &upload.content_type
        && !content_type.is_empty()
        && !content_type.starts_with("image/")
    {
        return Err(UploadError::NotAnImage);
    }
    ImageFormat::detect(&upload.bytes).ok_or(UploadError::InvalidImage)
}

/// Checks the extension whitelist and size. A name without an extension
/// passes the whitelist.
pub fn validate_document(upload: &Upload) -> Result<(), UploadError> {
    let ext = upload.extension();
    if !ext.is_empty() && !ALLOWED_DOC_EXT.contains(&ext.as_str()) {
        return Err(UploadError::ExtensionNotAllowed(ext));
    }
    if upload.bytes.len() > MAX_DOC_UPLOAD_MB * MB {
        return Err(UploadError::DocumentTooLarge);
    }
    Ok(())
}
