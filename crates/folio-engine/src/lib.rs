pub mod blocks;
pub mod io;
pub mod listing;
pub mod media;
pub mod models;
pub mod render;
pub mod site;


// Re-export key types for easier usage
pub use blocks::{Body, FieldError, MediaCheck, RawBlock, RawBody, ValidationErrors, Validator};
pub use io::*;
pub use site::{Site, SiteData, SiteError};
