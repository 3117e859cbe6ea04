use serde::Serialize;

use super::StructBlock;
use crate::blocks::choices::GalleryColumns;
use crate::blocks::fields::FieldReader;
use crate::blocks::validate::TextRule;
use crate::models::image::ImageId;

pub const GALLERY_MIN_IMAGES: usize = 2;
pub const GALLERY_MAX_IMAGES: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryBlock {
    pub title: String,
    pub columns: GalleryColumns,
    pub images: Vec<ImageId>,
}

impl StructBlock for GalleryBlock {
    fn read(fields: &mut FieldReader<'_, '_, '_>) -> Option<Self> {
        let title = fields.text("title", TextRule::optional().max(120));
        let columns = fields.choice("columns");
        let images = fields.images("images", GALLERY_MIN_IMAGES, GALLERY_MAX_IMAGES);
        Some(Self {
            title,
            columns,
            images,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::blocks::stream::{Body, RawBlock};
    use crate::tests::TestImages;
    use serde_json::json;

    #[test]
    fn empty_gallery_reports_minimum() {
        let images = TestImages::default();
        let err = Body::validate(&[RawBlock::new("gallery", json!({"title": "Trip"}))], &images)
            .unwrap_err();
        assert_eq!(err.errors[0].message, "The minimum number of items is 2");
    }

    #[test]
    fn each_missing_image_is_addressed_by_index() {
        let images = TestImages::with_ids(&[1, 2]);
        let err = Body::validate(
            &[RawBlock::new("gallery", json!({"images": [1, 9, 2, "x"]}))],
            &images,
        )
        .unwrap_err();
        assert_eq!(
            err.paths(),
            vec!["body[0].value.images[1]", "body[0].value.images[3]"]
        );
    }
}
