use serde::Serialize;

use super::StructBlock;
use crate::blocks::choices::{Aspect, ImageAlignment, ImageStyle, MaxWidth, Radius, Shadow};
use crate::blocks::fields::FieldReader;
use crate::blocks::validate::TextRule;
use crate::models::image::ImageId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageBlock {
    pub image: ImageId,
    pub caption: String,
    pub alignment: ImageAlignment,
    pub style: ImageStyle,
    pub max_width: MaxWidth,
    pub radius: Radius,
    pub shadow: Shadow,
    pub aspect: Aspect,
    /// Makes the image clickable when set.
    pub link_url: Option<String>,
    pub open_in_new: bool,
    pub alt_override: String,
}

impl StructBlock for ImageBlock {
    fn read(fields: &mut FieldReader<'_, '_, '_>) -> Option<Self> {
        let image = fields.image("image", true);
        let caption = fields.text("caption", TextRule::optional().max(220));
        let alignment = fields.choice("alignment");
        let style = fields.choice("style");
        let max_width = fields.choice("max_width");
        let radius = fields.choice("radius");
        let shadow = fields.choice("shadow");
        let aspect = fields.choice("aspect");
        let link_url = fields.url("link_url", false);
        let open_in_new = fields.flag("open_in_new");
        let alt_override = fields.text("alt_override", TextRule::optional().max(160));
        Some(Self {
            image: image?,
            caption,
            alignment,
            style,
            max_width,
            radius,
            shadow,
            aspect,
            link_url,
            open_in_new,
            alt_override,
        })
    }
}
