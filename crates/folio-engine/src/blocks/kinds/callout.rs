use serde::Serialize;

use super::{RichText, StructBlock};
use crate::blocks::choices::CalloutStyle;
use crate::blocks::fields::FieldReader;
use crate::blocks::validate::TextRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalloutBlock {
    pub style: CalloutStyle,
    pub title: String,
    pub text: RichText,
}

impl StructBlock for CalloutBlock {
    fn read(fields: &mut FieldReader<'_, '_, '_>) -> Option<Self> {
        let style = fields.choice("style");
        let title = fields.text("title", TextRule::optional().max(80));
        let text = RichText(fields.text("text", TextRule::required()));
        Some(Self { style, title, text })
    }
}
