use serde::Serialize;

use super::StructBlock;
use crate::blocks::choices::{EmbedAlign, EmbedStyle, EmbedWidth};
use crate::blocks::fields::FieldReader;
use crate::blocks::validate::TextRule;

/// An external media URL with presentation controls. Resolving the URL to
/// provider markup is left to the page template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedBlock {
    pub url: String,
    pub caption: String,
    pub width: EmbedWidth,
    pub align: EmbedAlign,
    pub style: EmbedStyle,
}

impl StructBlock for EmbedBlock {
    fn read(fields: &mut FieldReader<'_, '_, '_>) -> Option<Self> {
        let url = fields.url("url", true);
        let caption = fields.text("caption", TextRule::optional().max(160));
        let width = fields.choice("width");
        let align = fields.choice("align");
        let style = fields.choice("style");
        Some(Self {
            url: url?,
            caption,
            width,
            align,
            style,
        })
    }
}
