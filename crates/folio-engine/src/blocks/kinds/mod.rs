//! One module per struct block type.

mod button;
mod callout;
mod code;
mod embed;
mod gallery;
mod heading;
mod image;
mod section;
mod text;

pub use button::ButtonBlock;
pub use callout::CalloutBlock;
pub use code::CodeBlock;
pub use embed::EmbedBlock;
pub use gallery::{GALLERY_MAX_IMAGES, GALLERY_MIN_IMAGES, GalleryBlock};
pub use heading::HeadingBlock;
pub use image::ImageBlock;
pub use section::SectionBlock;
pub use text::RichText;

use super::fields::FieldReader;

/// A block whose value is a struct of named fields.
pub trait StructBlock: Sized {
    /// Reads every field, reporting failures through `fields`.
    ///
    /// Returns `None` only when a required value is missing entirely; any
    /// other failure still yields a value and the recorded errors decide
    /// whether the save goes through.
    fn read(fields: &mut FieldReader<'_, '_, '_>) -> Option<Self>;
}
