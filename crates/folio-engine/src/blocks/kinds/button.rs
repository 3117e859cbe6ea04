use serde::Serialize;

use super::StructBlock;
use crate::blocks::choices::ButtonVariant;
use crate::blocks::fields::FieldReader;
use crate::blocks::validate::TextRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonBlock {
    pub text: String,
    pub url: String,
    pub variant: ButtonVariant,
}

impl StructBlock for ButtonBlock {
    fn read(fields: &mut FieldReader<'_, '_, '_>) -> Option<Self> {
        let text = fields.text("text", TextRule::required().max(80));
        let url = fields.url("url", true);
        let variant = fields.choice("variant");
        Some(Self {
            text,
            url: url?,
            variant,
        })
    }
}
