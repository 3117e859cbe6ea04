//! Uploaded files: where they are stored, how uploads are checked and named,
//! and removing files once nothing references them.

pub mod cleanup;
pub mod storage;
pub mod upload;

pub use cleanup::{Cleanup, FileFields, ckeditor_images};
pub use storage::{FileSystemStorage, MediaStorage, StorageError};
pub use upload::{
    ImageFormat, Upload, UploadError, portfolio_upload_name, site_upload_name, upload_name,
    validate_document, validate_image,
};
