use serde::Serialize;

use super::StructBlock;
use crate::blocks::choices::HeadingLevel;
use crate::blocks::fields::FieldReader;
use crate::blocks::validate::TextRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingBlock {
    pub level: HeadingLevel,
    pub text: String,
}

impl StructBlock for HeadingBlock {
    fn read(fields: &mut FieldReader<'_, '_, '_>) -> Option<Self> {
        let level = fields.choice("level");
        let text = fields.text("text", TextRule::required().max(255));
        Some(Self { level, text })
    }
}
